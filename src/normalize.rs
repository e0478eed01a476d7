//! Raw rows to meeting records.
//!
//! Normalization never fails: every field has a default, so a broken row
//! still shows up in the timeline rather than aborting the load.

use crate::config::ColumnConfig;
use crate::parser::RawRow;
use crate::record::{MeetingRecord, NO_INPUTS, NO_TOPIC, UNSPECIFIED_PROJECT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Slash dates are month first, like spreadsheet exports in the default locale.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

fn action_header_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)action\s*(points?|items?|to-?dos?)").unwrap())
}

pub struct Normalizer {
    columns: ColumnConfig,
}

impl Normalizer {
    /// Header names are trimmed the same way the parser trims the header row.
    pub fn new(columns: ColumnConfig) -> Self {
        Normalizer {
            columns: columns.trimmed(),
        }
    }

    /// Cells are trimmed before use, so a whitespace-only date falls through
    /// to the timestamp and an unparsed `date_label` is the trimmed text.
    pub fn normalize(&self, row: &RawRow) -> MeetingRecord {
        let columns = &self.columns;

        let raw_date = cell(row, &columns.date).or_else(|| cell(row, &columns.timestamp));
        let date = raw_date.and_then(parse_date);
        let date_label = match (date, raw_date) {
            (Some(date), _) => date.format("%Y-%m-%d").to_string(),
            (None, Some(raw)) => {
                debug!("could not parse meeting date {:?}", raw);
                raw.to_string()
            }
            (None, None) => String::new(),
        };

        MeetingRecord {
            meeting_id: text(row, &columns.meeting_id, ""),
            date,
            date_label,
            student: text(row, &columns.student, ""),
            project: text(row, &columns.project, UNSPECIFIED_PROJECT),
            topic: text(row, &columns.topic, NO_TOPIC),
            subtopics: cell(row, &columns.subtopics)
                .map(split_list)
                .unwrap_or_default(),
            my_inputs: text(row, &columns.my_inputs, NO_INPUTS),
            link: text(row, &columns.link, ""),
            action_items: self
                .action_cell(row)
                .map(split_list)
                .unwrap_or_default(),
            raw: row.clone(),
        }
    }

    /// Configured action column first, then the first non-blank cell in row
    /// order whose header reads like "action points" / "action items" /
    /// "action todo". The configured header itself is skipped in that scan.
    fn action_cell<'a>(&self, row: &'a RawRow) -> Option<&'a str> {
        let configured = self.columns.action_points.as_str();
        if let Some(value) = cell(row, configured) {
            return Some(value);
        }
        let pattern = action_header_pattern();
        let (header, value) = row
            .iter()
            .filter(|(header, _)| *header != configured && pattern.is_match(header))
            .map(|(header, value)| (header, value.trim()))
            .find(|(_, value)| !value.is_empty())?;
        debug!("using {:?} as the action items column", header);
        Some(value)
    }
}

/// Trimmed, non-empty cell.
fn cell<'a>(row: &'a RawRow, header: &str) -> Option<&'a str> {
    row.get(header).map(str::trim).filter(|v| !v.is_empty())
}

fn text(row: &RawRow, header: &str, default: &str) -> String {
    cell(row, header).unwrap_or(default).to_string()
}

/// Splits a list cell on semicolons and newlines. Commas stay inside items.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Tries RFC 3339, then the datetime formats, then the date-only formats.
/// Offsets are converted to UTC; date-only values land on midnight. Input is
/// trimmed first.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
