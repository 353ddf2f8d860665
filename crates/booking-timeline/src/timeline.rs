//! Merging booking sources into one newest-first timeline.
//!
//! Sources (farmer bookings, factory schedule, ...) are concatenated in the
//! order given, then stable-sorted by normalized date, latest first. Records
//! that share a date keep their relative input order, which is the only thing
//! that orders same-day bookings from different sources.

use std::cmp::Reverse;

use serde::Serialize;

use crate::booking::{BookingRecord, SourceRole};
use crate::normalizer::{DateNormalizer, FreeFormParser};
use crate::options::Paging;

/// An ordered, read-only sequence of bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    records: Vec<BookingRecord>,
}

/// A visible prefix of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow<'a> {
    pub records: &'a [BookingRecord],
    /// Whether records remain beyond the window.
    pub has_more: bool,
}

/// Merge `sources` into a timeline sorted by date, latest first.
///
/// Inputs are not modified. Unparseable dates normalize to the epoch and end
/// up last.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use booking_timeline::{build_timeline, BookingRecord, BookingStatus, DateNormalizer, Sentinels};
///
/// let farmer = vec![BookingRecord::farmer("b009", "09/07/68", "pickup", BookingStatus::Pending, "f")];
/// let factory = vec![BookingRecord::factory("fb010", "10/07/68", "pickup", BookingStatus::Pending, "x")];
///
/// let normalizer = DateNormalizer::new(Sentinels::for_day(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
/// let timeline = build_timeline([&farmer, &factory], &normalizer);
///
/// let ids: Vec<&str> = timeline.iter().map(|b| b.id.as_str()).collect();
/// assert_eq!(ids, ["fb010", "b009"]);
/// ```
pub fn build_timeline<I, S, P>(sources: I, normalizer: &DateNormalizer<P>) -> Timeline
where
    I: IntoIterator<Item = S>,
    S: AsRef<[BookingRecord]>,
    P: FreeFormParser,
{
    let mut records: Vec<BookingRecord> = sources
        .into_iter()
        .flat_map(|source| source.as_ref().to_vec())
        .collect();

    // sort_by_cached_key is stable
    records.sort_by_cached_key(|record| Reverse(normalizer.normalize(&record.date)));

    tracing::trace!(records = records.len(), "built booking timeline");
    Timeline { records }
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BookingRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BookingRecord> {
        self.records
    }

    /// Look up a booking by id.
    pub fn get(&self, id: &str) -> Option<&BookingRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Only the bookings from one role, in timeline order.
    pub fn filter_role(&self, role: SourceRole) -> Timeline {
        Timeline {
            records: self
                .records
                .iter()
                .filter(|record| record.source_role == role)
                .cloned()
                .collect(),
        }
    }

    /// The first `visible` records.
    pub fn window(&self, visible: usize) -> TimelineWindow<'_> {
        let end = visible.min(self.records.len());
        TimelineWindow {
            records: &self.records[..end],
            has_more: end < self.records.len(),
        }
    }

    /// The window shown after `loads` presses of "load more".
    pub fn page(&self, paging: &Paging, loads: usize) -> TimelineWindow<'_> {
        self.window(paging.visible_after(loads))
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a BookingRecord;
    type IntoIter = std::slice::Iter<'a, BookingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
