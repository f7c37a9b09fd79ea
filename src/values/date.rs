use crate::utils::{ChunkTailError, Result};
use chrono::NaiveDate;

/// Accepted date layouts, tried in order: `DD-MM-YYYY`, then `YYYY-MM-DD`.
pub const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

/// Parses a calendar date using the first accepted format that matches.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ChunkTailError::DateParse(value.to_string()))
}

/// Returns the first format under which every non-blank value parses.
pub fn shared_date_format<'a, I>(values: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let values = values.into_iter().filter(|v| !v.trim().is_empty());
    DATE_FORMATS.iter().copied().find(|fmt| {
        values
            .clone()
            .all(|v| NaiveDate::parse_from_str(v.trim(), fmt).is_ok())
    })
}
