use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a load operation. Problems inside a single row are never
/// reported here; the normalizer resolves them to defaults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("source returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid source url: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not parse csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}
