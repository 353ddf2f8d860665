//! Date token normalization.
//!
//! Turns the date strings found on booking records into comparable
//! [`NaiveDateTime`] instants. Normalization is total: a token that cannot be
//! read becomes the epoch (`1970-01-01T00:00:00`), so malformed records sink
//! to the bottom of a newest-first timeline instead of failing the whole
//! build.
//!
//! Accepted tokens, tried in this order:
//!
//! 1. empty or whitespace-only → unparseable
//! 2. the reference day's "today" token → reference day at midnight
//! 3. the "tomorrow" token → the following day at midnight
//! 4. `dd/mm/yy` Buddhist-era short date (see [`crate::era`]), with day/month
//!    roll-over
//! 5. anything the [`FreeFormParser`] accepts
//!
//! The reference day is always passed in through [`Sentinels`]; nothing here
//! reads the system clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::era::{self, format_short_token, ShortDate};

/// The instant unparseable tokens normalize to.
pub fn epoch() -> NaiveDateTime {
    NaiveDateTime::default()
}

// ── Sentinels ───────────────────────────────────────────────────────────────

/// The caller's reference day and the strings that stand for "today" and
/// "tomorrow" in its display format.
///
/// Built once per request and threaded through every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    today: NaiveDate,
    today_token: String,
    tomorrow_token: String,
}

impl Sentinels {
    /// Sentinels for `today`, with tokens in the dashboards' `dd/mm/yy` form.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use booking_timeline::Sentinels;
    ///
    /// let s = Sentinels::for_day(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
    /// assert_eq!(s.today_token(), "14/07/68");
    /// assert_eq!(s.tomorrow_token(), "15/07/68");
    /// ```
    pub fn for_day(today: NaiveDate) -> Self {
        let tomorrow_token = today.succ_opt().map(format_short_token).unwrap_or_default();
        Self {
            today,
            today_token: format_short_token(today),
            tomorrow_token,
        }
    }

    /// Sentinels for the calendar day of `now`; the time of day is dropped.
    pub fn for_instant(now: NaiveDateTime) -> Self {
        Self::for_day(now.date())
    }

    /// Sentinels with caller-formatted tokens, for display formats other than
    /// `dd/mm/yy`.
    pub fn with_tokens(
        today: NaiveDate,
        today_token: impl Into<String>,
        tomorrow_token: impl Into<String>,
    ) -> Self {
        Self {
            today,
            today_token: today_token.into(),
            tomorrow_token: tomorrow_token.into(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn today_token(&self) -> &str {
        &self.today_token
    }

    pub fn tomorrow_token(&self) -> &str {
        &self.tomorrow_token
    }

    /// Midnight of the reference day.
    pub fn reference_midnight(&self) -> Option<NaiveDateTime> {
        midnight(self.today)
    }

    fn match_token(&self, token: &str) -> Option<NaiveDateTime> {
        if !self.today_token.is_empty() && token == self.today_token {
            midnight(self.today)
        } else if !self.tomorrow_token.is_empty() && token == self.tomorrow_token {
            midnight(self.today.succ_opt()?)
        } else {
            None
        }
    }
}

// ── Free-form parsing ───────────────────────────────────────────────────────

/// Something that can turn an arbitrary string into an instant.
///
/// This is the last step of normalization, after the sentinel and
/// `dd/mm/yy` checks. Swap in a stricter or locale-specific parser without
/// touching the timeline logic. A pair `(A, B)` tries `A` then `B`.
pub trait FreeFormParser {
    fn parse(&self, input: &str) -> Option<NaiveDateTime>;
}

impl<P: FreeFormParser + ?Sized> FreeFormParser for &P {
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        (**self).parse(input)
    }
}

impl<P: FreeFormParser + ?Sized> FreeFormParser for Box<P> {
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        (**self).parse(input)
    }
}

impl<A: FreeFormParser, B: FreeFormParser> FreeFormParser for (A, B) {
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        self.0.parse(input).or_else(|| self.1.parse(input))
    }
}

/// Adapts a closure into a [`FreeFormParser`].
///
/// ```
/// use booking_timeline::normalizer::{FnParser, FreeFormParser};
/// use chrono::NaiveDateTime;
///
/// let never = FnParser(|_: &str| -> Option<NaiveDateTime> { None });
/// assert!(never.parse("2025-07-14").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnParser<F>(pub F);

impl<F> FreeFormParser for FnParser<F>
where
    F: Fn(&str) -> Option<NaiveDateTime>,
{
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        (self.0)(input)
    }
}

/// ISO-style and English month-name dates.
///
/// Accepts RFC 3339 (converted to UTC, offset dropped), `YYYY-MM-DD` with an
/// optional `T` or space separated time, `YYYY/MM/DD`, and forms like
/// `"July 14, 2025"`, `"14 July 2025"` or `"Jul 14 2025"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericParser;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

impl FreeFormParser for GenericParser {
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .and_then(midnight)
            })
    }
}

/// Thai article dates such as `"15 มิ.ย. 2568"`, at midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThaiDateParser;

impl FreeFormParser for ThaiDateParser {
    fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        era::parse_thai_abbreviated(input).and_then(midnight)
    }
}

/// The parser used unless the caller picks another one.
pub type StandardParser = (GenericParser, ThaiDateParser);

// ── Normalization ───────────────────────────────────────────────────────────

/// Resolve a token with an explicit parser, or `None` if it is unparseable.
pub fn resolve_with<P: FreeFormParser>(
    token: &str,
    sentinels: &Sentinels,
    parser: &P,
) -> Option<NaiveDateTime> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(instant) = sentinels.match_token(token) {
        return Some(instant);
    }

    if let Some(short) = ShortDate::split(token) {
        return short.to_civil_date().and_then(midnight);
    }

    parser.parse(token)
}

/// Resolve a token with the [`StandardParser`].
///
/// Returns `None` for empty and unparseable tokens. Use this where
/// "unknown date" must be told apart from a real date.
pub fn resolve(token: &str, sentinels: &Sentinels) -> Option<NaiveDateTime> {
    resolve_with(token, sentinels, &StandardParser::default())
}

/// Normalize a token with the [`StandardParser`]; never fails.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use booking_timeline::{epoch, normalize, Sentinels};
///
/// let sentinels = Sentinels::for_day(NaiveDate::from_ymd_opt(2025, 7, 20).unwrap());
///
/// let instant = normalize("14/07/68", &sentinels);
/// assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
///
/// assert_eq!(normalize("not a date", &sentinels), epoch());
/// ```
pub fn normalize(token: &str, sentinels: &Sentinels) -> NaiveDateTime {
    resolve(token, sentinels).unwrap_or_else(|| fallback(token))
}

fn fallback(token: &str) -> NaiveDateTime {
    if !token.trim().is_empty() {
        tracing::debug!(token, "unparseable date token, sorting as epoch");
    }
    epoch()
}

/// A reference day paired with a free-form parser.
#[derive(Debug, Clone)]
pub struct DateNormalizer<P = StandardParser> {
    sentinels: Sentinels,
    parser: P,
}

impl DateNormalizer<StandardParser> {
    pub fn new(sentinels: Sentinels) -> Self {
        Self::with_parser(sentinels, StandardParser::default())
    }

    /// Normalizer for the calendar day of `now`, with `dd/mm/yy` sentinels.
    pub fn for_instant(now: NaiveDateTime) -> Self {
        Self::new(Sentinels::for_instant(now))
    }
}

impl<P: FreeFormParser> DateNormalizer<P> {
    pub fn with_parser(sentinels: Sentinels, parser: P) -> Self {
        Self { sentinels, parser }
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// See [`resolve`].
    pub fn resolve(&self, token: &str) -> Option<NaiveDateTime> {
        resolve_with(token, &self.sentinels, &self.parser)
    }

    /// See [`normalize`].
    pub fn normalize(&self, token: &str) -> NaiveDateTime {
        self.resolve(token).unwrap_or_else(|| fallback(token))
    }
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

// ── Tests ───────────────────────────────────────────────────────────────────
