use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Could not parse date: {value:?}")]
    DateParse { value: Option<String> },

    #[error("Unknown spider: {0}")]
    UnknownSpider(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
