use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use booking_timeline::{
    parse_short_token, Article, BookingRecord, SourceRole, TimelineEngine, TimelineOptions,
};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::sample;

#[derive(Debug, Parser)]
#[command(
    name = "timeline",
    version,
    about = "Merge booking sources into a timeline and derive reminders"
)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize one date token and print the instant
    Normalize(NormalizeArgs),
    /// Merge booking sources and print the timeline
    Sort(SortArgs),
    /// Print the notification feed for the merged timeline
    Notify(NotifyArgs),
    /// Run the pipeline on built-in sample data
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
struct NowArg {
    /// Reference "now": YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS (default: local clock)
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,
}

impl NowArg {
    fn resolve(&self) -> NaiveDateTime {
        self.now
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// The date token, e.g. 14/07/68
    #[arg(value_name = "TOKEN", allow_hyphen_values = true)]
    token: String,

    /// Reject anything that is not a valid dd/mm/yy date
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    now: NowArg,
}

#[derive(Debug, Args)]
struct SortArgs {
    /// JSON array of booking records, one file per source ('-' for stdin)
    #[arg(long = "input", short, required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Keep only one source role
    #[arg(long, value_enum)]
    role: Option<RoleArg>,

    /// Print at most this many records
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    now: NowArg,
}

#[derive(Debug, Args)]
struct NotifyArgs {
    /// JSON array of booking records, one file per source ('-' for stdin)
    #[arg(long = "input", short, required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// JSON array of articles, newest first
    #[arg(long, value_name = "FILE")]
    articles: Option<PathBuf>,

    /// TOML file with timeline options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    now: NowArg,
}

#[derive(Debug, Args)]
struct DemoArgs {
    #[command(flatten)]
    now: NowArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Farmer,
    Factory,
}

impl From<RoleArg> for SourceRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Farmer => SourceRole::Farmer,
            RoleArg::Factory => SourceRole::Factory,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Normalize(args) => normalize(args),
            Command::Sort(args) => sort(args),
            Command::Notify(args) => notify(args),
            Command::Demo(args) => demo(args),
        }
    }
}

fn normalize(args: NormalizeArgs) -> Result<()> {
    let instant = if args.strict {
        let date = parse_short_token(&args.token)?;
        date.and_hms_opt(0, 0, 0)
            .context("date has no midnight")?
    } else {
        TimelineEngine::for_instant(args.now.resolve()).normalize(&args.token)
    };
    println!("{}", instant.format("%Y-%m-%dT%H:%M:%S"));
    Ok(())
}

fn sort(args: SortArgs) -> Result<()> {
    let engine = TimelineEngine::for_instant(args.now.resolve());
    let sources = read_sources(&args.inputs)?;

    let mut timeline = engine.timeline(&sources);
    if let Some(role) = args.role {
        timeline = timeline.filter_role(role.into());
    }
    tracing::info!(records = timeline.len(), "timeline built");

    match args.limit {
        Some(limit) => print_json(&timeline.window(limit).records),
        None => print_json(&timeline),
    }
}

fn notify(args: NotifyArgs) -> Result<()> {
    let now = args.now.resolve();
    let options = load_options(args.config.as_deref())?;
    let engine = TimelineEngine::for_instant(now).with_options(options)?;

    let sources = read_sources(&args.inputs)?;
    let articles: Vec<Article> = match &args.articles {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let timeline = engine.timeline(&sources);
    let feed = engine.notifications(&timeline, &articles, now);
    tracing::info!(entries = feed.len(), "notification feed derived");
    print_json(&feed)
}

fn demo(args: DemoArgs) -> Result<()> {
    let now = args.now.resolve();
    let engine = TimelineEngine::for_instant(now);
    let sentinels = engine.normalizer().sentinels();

    let farmer = sample::farmer_bookings(sentinels);
    let factory = sample::factory_schedule();
    let articles = sample::knowledge_articles();

    let timeline = engine.timeline([&farmer, &factory]);
    let notifications = engine.notifications(&timeline, &articles, now);

    print_json(&serde_json::json!({
        "timeline": timeline,
        "notifications": notifications,
    }))
}

// ── Input helpers ───────────────────────────────────────────────────────────

fn parse_now(s: &str) -> std::result::Result<NaiveDateTime, String> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got '{s}'"))
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<Vec<BookingRecord>>> {
    paths
        .iter()
        .map(|path| {
            let records: Vec<BookingRecord> = read_json(path)?;
            tracing::debug!(path = %path.display(), records = records.len(), "loaded booking source");
            Ok(records)
        })
        .collect()
}

fn load_options(path: Option<&Path>) -> Result<TimelineOptions> {
    let Some(path) = path else {
        return Ok(TimelineOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
