//! Tunable settings for timelines and notification feeds.
//!
//! Everything has a default matching the dashboards, and every field is
//! `#[serde(default)]` so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::notification::Announcement;

/// Which day offsets (relative to "now", rounded up) get a reminder.
///
/// Both ends are inclusive. The default `0..=2` covers today, tomorrow and
/// the day after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderWindow {
    pub min_days: i64,
    pub max_days: i64,
}

impl Default for ReminderWindow {
    fn default() -> Self {
        Self {
            min_days: 0,
            max_days: 2,
        }
    }
}

impl ReminderWindow {
    pub fn contains(&self, diff_days: i64) -> bool {
        (self.min_days..=self.max_days).contains(&diff_days)
    }
}

/// "Load more" paging for timeline lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paging {
    /// Records shown before the first "load more".
    pub initial: usize,
    /// Records added by each "load more".
    pub step: usize,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            initial: 8,
            step: 5,
        }
    }
}

impl Paging {
    /// How many records are visible after `loads` presses of "load more".
    pub fn visible_after(&self, loads: usize) -> usize {
        self.initial
            .saturating_add(self.step.saturating_mul(loads))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    pub reminder_window: ReminderWindow,
    pub announcement: Announcement,
    pub paging: Paging,
}

impl TimelineOptions {
    /// Check the options for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidOptions`] when the reminder window is
    /// empty (`min_days > max_days`) or paging would never show anything.
    pub fn validate(&self) -> Result<()> {
        let window = &self.reminder_window;
        if window.min_days > window.max_days {
            return Err(TimelineError::InvalidOptions(format!(
                "reminder window min_days ({}) is greater than max_days ({})",
                window.min_days, window.max_days
            )));
        }
        if self.paging.initial == 0 && self.paging.step == 0 {
            return Err(TimelineError::InvalidOptions(
                "paging must show at least one record".to_string(),
            ));
        }
        Ok(())
    }
}
