//! One-stop facade: a [`DateNormalizer`] plus [`TimelineOptions`].

use chrono::NaiveDateTime;

use crate::booking::BookingRecord;
use crate::error::Result;
use crate::normalizer::{DateNormalizer, FreeFormParser, Sentinels, StandardParser};
use crate::notification::{derive_notifications, derive_reminders, Article, NotificationEntry};
use crate::options::TimelineOptions;
use crate::timeline::{build_timeline, Timeline};

/// Builds timelines and notification feeds for one reference day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use booking_timeline::{BookingRecord, BookingStatus, NotificationCategory, TimelineEngine};
///
/// let now = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let engine = TimelineEngine::for_instant(now);
///
/// let farmer = vec![BookingRecord::farmer("b1", "15/07/68", "ขอรับปุ๋ย", BookingStatus::Pending, "f")];
/// let timeline = engine.timeline([&farmer]);
/// let feed = engine.notifications(&timeline, &[], now);
///
/// assert_eq!(feed[0].category, NotificationCategory::AdminUpdate);
/// assert_eq!(feed[1].id, "n-booking-b1");
/// ```
#[derive(Debug, Clone)]
pub struct TimelineEngine<P = StandardParser> {
    normalizer: DateNormalizer<P>,
    options: TimelineOptions,
}

impl TimelineEngine<StandardParser> {
    pub fn new(sentinels: Sentinels) -> Self {
        Self {
            normalizer: DateNormalizer::new(sentinels),
            options: TimelineOptions::default(),
        }
    }

    /// Engine for the calendar day of `now`, with `dd/mm/yy` sentinels.
    pub fn for_instant(now: NaiveDateTime) -> Self {
        Self::new(Sentinels::for_instant(now))
    }
}

impl<P: FreeFormParser> TimelineEngine<P> {
    pub fn with_normalizer(normalizer: DateNormalizer<P>) -> Self {
        Self {
            normalizer,
            options: TimelineOptions::default(),
        }
    }

    /// Replace the options after validating them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TimelineError::InvalidOptions`] if they contradict
    /// themselves.
    pub fn with_options(mut self, options: TimelineOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn normalizer(&self) -> &DateNormalizer<P> {
        &self.normalizer
    }

    pub fn options(&self) -> &TimelineOptions {
        &self.options
    }

    pub fn normalize(&self, token: &str) -> NaiveDateTime {
        self.normalizer.normalize(token)
    }

    pub fn timeline<I, S>(&self, sources: I) -> Timeline
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[BookingRecord]>,
    {
        build_timeline(sources, &self.normalizer)
    }

    pub fn reminders(&self, timeline: &Timeline, now: NaiveDateTime) -> Vec<NotificationEntry> {
        derive_reminders(
            timeline,
            now,
            &self.normalizer,
            &self.options.reminder_window,
        )
    }

    pub fn notifications(
        &self,
        timeline: &Timeline,
        articles: &[Article],
        now: NaiveDateTime,
    ) -> Vec<NotificationEntry> {
        derive_notifications(timeline, articles, now, &self.normalizer, &self.options)
    }
}
