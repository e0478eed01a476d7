use crate::error::Result;
use csv::ReaderBuilder;
use log::{debug, warn};
use std::io;

/// One CSV line keyed by the header row, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        RawRow { fields: Vec::new() }
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.push((header.into(), value.into()));
    }

    /// Cell under `header`. With duplicate headers the first one wins.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (header, value) in iter {
            row.insert(header, value);
        }
        row
    }
}

/// Reads the whole payload into rows. Blank lines are skipped and ragged
/// rows are accepted; cells past the header are dropped, missing cells are
/// simply absent from the row.
pub fn parse_rows<R: io::Read>(source: R) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        warn!("csv payload has no header row");
        return Ok(Vec::new());
    }

    let mut rows: Vec<RawRow> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            debug!(
                "row {} has {} cells, header has {}",
                rows.len() + 1,
                record.len(),
                headers.len()
            );
        }
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.clone(), cell.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}
