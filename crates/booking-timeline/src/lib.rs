//! # booking-timeline
//!
//! Deterministic booking timeline computation for the bamboo supply
//! dashboards.
//!
//! Bookings arrive from several sources (farmer-authored requests,
//! factory pickup schedules) with dates written as Thai Buddhist-era short
//! tokens, relative "today"/"tomorrow" strings, or free-form text. This crate
//! turns those tokens into comparable instants, merges the sources into one
//! newest-first timeline, and derives the notification feed shown to users.
//!
//! Every function is pure: the caller supplies the reference day and "now",
//! nothing reads the system clock.
//!
//! ## Modules
//!
//! - [`era`] — Buddhist-era year conversion and short `dd/mm/yy` tokens
//! - [`normalizer`] — Date token → instant, with the epoch fallback
//! - [`booking`] — Booking records, statuses, source roles
//! - [`timeline`] — Merge and stable sort of booking sources, paging
//! - [`notification`] — Reminder derivation and feed composition
//! - [`options`] — Reminder window, paging and announcement settings
//! - [`engine`] — Facade bundling a normalizer with options
//! - [`error`] — Error types

pub mod booking;
pub mod engine;
pub mod era;
pub mod error;
pub mod normalizer;
pub mod notification;
pub mod options;
pub mod timeline;

pub use booking::{add_booking, BookingDraft, BookingRecord, BookingStatus, SourceRole};
pub use engine::TimelineEngine;
pub use era::{format_short_token, parse_short_token, to_buddhist_year, to_civil_year};
pub use error::TimelineError;
pub use normalizer::{
    epoch, normalize, resolve, DateNormalizer, FreeFormParser, GenericParser, Sentinels,
    StandardParser, ThaiDateParser,
};
pub use notification::{
    derive_notifications, derive_reminders, Announcement, Article, NotificationCategory,
    NotificationEntry,
};
pub use options::{Paging, ReminderWindow, TimelineOptions};
pub use timeline::{build_timeline, Timeline, TimelineWindow};
