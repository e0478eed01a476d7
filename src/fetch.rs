//! Loading CSV text from a published export or a local file.
//!
//! One GET per load, no retry. Transport defaults decide the timeout.

use crate::error::{Error, Result};
use log::info;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::path::Path;
use url::Url;

const CACHE_BUST_PARAM: &str = "_ts";

/// Appends `_ts=<millis>` so intermediaries cannot serve a stale export.
pub fn cache_busted_url(source: &str, now_millis: i64) -> Result<Url> {
    let mut url = Url::parse(source.trim())?;
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &now_millis.to_string());
    Ok(url)
}

pub fn fetch_csv(source: &str) -> Result<String> {
    fetch_csv_with(&Client::new(), source)
}

pub fn fetch_csv_with(client: &Client, source: &str) -> Result<String> {
    let url = cache_busted_url(source, chrono::Utc::now().timestamp_millis())?;
    info!("fetching meetings from {}", source);

    let response = client
        .get(url)
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            url: source.to_string(),
        });
    }
    Ok(response.text()?)
}

pub fn read_csv_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "file path {} does not exist",
            path.display()
        )));
    }
    info!("reading meetings from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}
