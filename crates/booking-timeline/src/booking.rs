//! Booking records.
//!
//! A booking is immutable once created; timelines only reorder them. New
//! farmer requests go through [`add_booking`], which returns a fresh source
//! collection rather than mutating the old one.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    /// Whether the booking can still produce reminders.
    pub fn is_open(&self) -> bool {
        !matches!(self, BookingStatus::Completed)
    }
}

/// Which dashboard authored a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceRole {
    Farmer,
    Factory,
}

/// One booking as supplied by a source.
///
/// `date` is kept as the raw token so the UI can echo it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    #[serde(default)]
    pub date: String,
    pub description: String,
    pub status: BookingStatus,
    #[serde(alias = "userType")]
    pub source_role: SourceRole,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BookingRecord {
    /// A farmer-authored booking with no factory fields.
    pub fn farmer(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        status: BookingStatus,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            description: description.into(),
            status,
            source_role: SourceRole::Farmer,
            user_name: user_name.into(),
            pickup_location: None,
            estimated_quantity: None,
            farmer_name: None,
            address: None,
        }
    }

    /// A factory pickup. The farmer name, location and quantity are set with
    /// the `with_*` builders.
    pub fn factory(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        status: BookingStatus,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            source_role: SourceRole::Factory,
            ..Self::farmer(id, date, description, status, user_name)
        }
    }

    pub fn with_farmer_name(mut self, name: impl Into<String>) -> Self {
        self.farmer_name = Some(name.into());
        self
    }

    /// Sets both the pickup location and the address, which the factory
    /// schedule always keeps equal.
    pub fn with_pickup_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        self.address = Some(location.clone());
        self.pickup_location = Some(location);
        self
    }

    pub fn with_estimated_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.estimated_quantity = Some(quantity.into());
        self
    }
}

/// What a farmer fills in when requesting a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub description: String,
    pub date: String,
}

impl BookingDraft {
    pub fn new(description: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            date: date.into(),
        }
    }
}

/// Return a new farmer collection with `draft` added in front as a PENDING
/// booking.
///
/// The id is `b{n}-{millis}`, where `n` is the new collection length and
/// `millis` the Unix milliseconds of `now`.
///
/// # Errors
///
/// Returns [`TimelineError::EmptyDescription`] for a blank description, or
/// [`TimelineError::DuplicateId`] if the generated id is already taken.
pub fn add_booking(
    bookings: &[BookingRecord],
    draft: BookingDraft,
    user_name: &str,
    now: NaiveDateTime,
) -> Result<Vec<BookingRecord>> {
    if draft.description.trim().is_empty() {
        return Err(TimelineError::EmptyDescription);
    }

    let id = format!(
        "b{}-{}",
        bookings.len() + 1,
        now.and_utc().timestamp_millis()
    );
    if bookings.iter().any(|b| b.id == id) {
        return Err(TimelineError::DuplicateId(id));
    }

    let record = BookingRecord::farmer(
        id,
        draft.date,
        draft.description,
        BookingStatus::Pending,
        user_name,
    );

    let mut next = Vec::with_capacity(bookings.len() + 1);
    next.push(record);
    next.extend_from_slice(bookings);
    Ok(next)
}
