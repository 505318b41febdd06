use std::fmt;

use thiserror::Error;

use super::{ResolvedDate, YEAR_MAX, YEAR_MIN};

/// Camera/app prefix observed on video filenames (`VID_20230815_120000.mp4`).
pub const VIDEO_PREFIX: &str = "VID_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComponent {
    Year,
    Month,
    Day,
}

impl fmt::Display for DateComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateComponent::Year => write!(f, "year"),
            DateComponent::Month => write!(f, "month"),
            DateComponent::Day => write!(f, "day"),
        }
    }
}

/// Why a filename yielded no date. Always recoverable for the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilenameDateError {
    #[error("date token {0:?} is shorter than 8 characters")]
    TokenTooShort(String),
    #[error("{component} token {token:?} is not numeric")]
    NotNumeric { component: DateComponent, token: String },
    #[error("{component} {value} is out of range")]
    OutOfRange { component: DateComponent, value: u16 },
}

/// Parse a `YYYYMMDD` token at a fixed position in `filename`, after
/// stripping `prefix` when present. Characters 0-3 are the year, 4-5 the
/// month, 6-7 the day. Day is checked against 1-31 only, never against the
/// length of the month.
pub fn parse_filename_date(
    filename: &str,
    prefix: &str,
) -> Result<ResolvedDate, FilenameDateError> {
    let rest = filename.strip_prefix(prefix).unwrap_or(filename);
    let token: Vec<char> = rest.chars().take(8).collect();
    if token.len() < 8 {
        return Err(FilenameDateError::TokenTooShort(rest.to_string()));
    }

    let year = parse_component(&token[0..4], DateComponent::Year)?;
    let month = parse_component(&token[4..6], DateComponent::Month)?;
    let day = parse_component(&token[6..8], DateComponent::Day)?;

    check_range(DateComponent::Year, year, YEAR_MIN as u16, YEAR_MAX as u16)?;
    check_range(DateComponent::Month, month, 1, 12)?;
    check_range(DateComponent::Day, day, 1, 31)?;

    Ok(ResolvedDate {
        year: year as i32,
        month: month as u32,
        day: day as u32,
    })
}

fn parse_component(chars: &[char], component: DateComponent) -> Result<u16, FilenameDateError> {
    let token: String = chars.iter().collect();
    if !chars.iter().all(|c| c.is_ascii_digit()) {
        return Err(FilenameDateError::NotNumeric { component, token });
    }
    token
        .parse()
        .map_err(|_| FilenameDateError::NotNumeric { component, token })
}

fn check_range(
    component: DateComponent,
    value: u16,
    min: u16,
    max: u16,
) -> Result<(), FilenameDateError> {
    if value < min || value > max {
        return Err(FilenameDateError::OutOfRange { component, value });
    }
    Ok(())
}
