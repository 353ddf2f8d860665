//! Thai Buddhist-era calendar helpers.
//!
//! Booking dates in the dashboards are written as short `dd/mm/yy` tokens
//! where `yy` is the last two digits of the Buddhist-era (B.E.) year, so
//! `"14/07/68"` is 14 July B.E. 2568, which is 14 July 2025 A.D. Knowledge
//! articles use a longer form with an abbreviated Thai month name, e.g.
//! `"15 มิ.ย. 2568"`.
//!
//! # Year range
//!
//! A two-digit year is always read as B.E. 25yy, so short tokens cover the
//! civil years 1957 through 2056. A four-digit year component is taken as a
//! full B.E. year. Other widths are not short tokens.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, TimelineError};

/// Years between the Buddhist era and the civil (Gregorian) era.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Century base added to a two-digit B.E. year.
pub const SHORT_YEAR_BASE: i32 = 2500;

/// Abbreviated Thai month names, January first.
pub const THAI_MONTH_ABBREVIATIONS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.",
    "ธ.ค.",
];

// ── Year conversion ─────────────────────────────────────────────────────────

/// Convert a Buddhist-era year to the civil year.
///
/// ```
/// assert_eq!(booking_timeline::to_civil_year(2568), 2025);
/// ```
pub fn to_civil_year(buddhist_year: i32) -> i32 {
    buddhist_year - BUDDHIST_ERA_OFFSET
}

/// Convert a civil year to the Buddhist-era year.
pub fn to_buddhist_year(civil_year: i32) -> i32 {
    civil_year + BUDDHIST_ERA_OFFSET
}

// ── Short tokens (dd/mm/yy) ─────────────────────────────────────────────────

/// The raw components of a `dd/mm/yy` token.
///
/// Day and month are kept exactly as written (they may be out of range);
/// the year is already expanded to a full Buddhist-era year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortDate {
    pub day: i64,
    pub month: i64,
    pub buddhist_year: i32,
}

impl ShortDate {
    /// Split a token into its three components.
    ///
    /// Each component is read as a leading integer (`"07x"` reads 7). Returns
    /// `None` when the token does not have exactly three `/`-separated parts,
    /// when a part has no leading digits, when day or month is wider than two
    /// digits, or when the year has a width other than one, two or four
    /// digits.
    pub fn split(token: &str) -> Option<ShortDate> {
        let mut parts = token.split('/');
        let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let (day, day_width) = leading_int(day)?;
        let (month, month_width) = leading_int(month)?;
        let (year, width) = leading_int(year)?;
        if day_width > 2 || month_width > 2 {
            return None;
        }

        let buddhist_year = match width {
            1 | 2 => SHORT_YEAR_BASE + i32::try_from(year).ok()?,
            4 => i32::try_from(year).ok()?,
            _ => return None,
        };

        Some(ShortDate {
            day,
            month,
            buddhist_year,
        })
    }

    /// The civil date with day/month roll-over.
    ///
    /// Out-of-range components carry into the neighbouring month or year:
    /// day 32 of July is 1 August, day 0 is the last day of the previous
    /// month, month 13 is January of the next year.
    pub fn to_civil_date(&self) -> Option<NaiveDate> {
        rolling_date(to_civil_year(self.buddhist_year), self.month, self.day)
    }

    /// The civil date, or `None` if day or month is out of range.
    pub fn to_civil_date_strict(&self) -> Option<NaiveDate> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        NaiveDate::from_ymd_opt(to_civil_year(self.buddhist_year), month, day)
    }
}

/// Format a civil date as a short Buddhist-era token (`dd/mm/yy`).
///
/// This is the form the dashboards use for "today" and "tomorrow".
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use booking_timeline::format_short_token;
///
/// let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// assert_eq!(format_short_token(date), "14/07/68");
/// ```
pub fn format_short_token(date: NaiveDate) -> String {
    let year = to_buddhist_year(date.year()).rem_euclid(100);
    format!("{:02}/{:02}/{:02}", date.day(), date.month(), year)
}

/// Parse a short token strictly.
///
/// Unlike the normalizer, this rejects out-of-range days and months instead
/// of rolling them over, and requires every component to be all digits.
///
/// # Errors
///
/// Returns [`TimelineError::InvalidDateToken`] if the token is not a valid
/// `dd/mm/yy` (or `dd/mm/yyyy` B.E.) date.
pub fn parse_short_token(token: &str) -> Result<NaiveDate> {
    let invalid = || TimelineError::InvalidDateToken(format!("'{}'", token));

    let all_digits = token
        .split('/')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if !all_digits {
        return Err(invalid());
    }

    ShortDate::split(token)
        .and_then(|short| short.to_civil_date_strict())
        .ok_or_else(invalid)
}

// ── Thai abbreviated dates ──────────────────────────────────────────────────

/// Parse a date like `"15 มิ.ย. 2568"` (day, abbreviated Thai month, B.E. year).
///
/// The month abbreviation may omit its dots (`"มิย"`). A two-digit year is
/// read as B.E. 25yy.
pub fn parse_thai_abbreviated(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month = thai_month_number(parts[1])?;
    let year: i32 = parts[2].parse().ok()?;
    let buddhist_year = match parts[2].len() {
        1 | 2 => SHORT_YEAR_BASE + year,
        4 => year,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(to_civil_year(buddhist_year), month, day)
}

/// Format a civil date in the article post-date style (`"15 มิ.ย. 2568"`).
pub fn format_thai_abbreviated(date: NaiveDate) -> String {
    let month = THAI_MONTH_ABBREVIATIONS[date.month0() as usize];
    format!(
        "{:02} {} {}",
        date.day(),
        month,
        to_buddhist_year(date.year())
    )
}

fn thai_month_number(name: &str) -> Option<u32> {
    let wanted: String = name.chars().filter(|c| *c != '.').collect();
    THAI_MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| abbr.chars().filter(|c| *c != '.').eq(wanted.chars()))
        .map(|i| i as u32 + 1)
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Read a leading integer the lenient way: optional whitespace and sign, then
/// digits, ignoring whatever follows. Returns the value and the digit count.
fn leading_int(s: &str) -> Option<(i64, usize)> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some((sign * value, end))
}

/// Build a date from a year, 1-based month and day, carrying overflow.
fn rolling_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let months = i64::from(year)
        .checked_mul(12)?
        .checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month0 = months.rem_euclid(12) as u32;

    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    first.checked_add_signed(chrono::Duration::try_days(day.checked_sub(1)?)?)
}

// ── Tests ───────────────────────────────────────────────────────────────────
