//! Error types for booking-timeline operations.
//!
//! Date normalization itself never fails; these errors come from the strict
//! helpers and from operations that create new records.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Invalid date token: {0}")]
    InvalidDateToken(String),

    #[error("Duplicate booking id: {0}")]
    DuplicateId(String),

    #[error("Empty booking description")]
    EmptyDescription,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
