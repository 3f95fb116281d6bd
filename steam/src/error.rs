use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Response error:\nStatusCode: {0}\nUrl: {1}")]
    Response(StatusCode, String),

    #[error("Gave up on {0} after {1} attempts")]
    RetriesExhausted(String, u32),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("No price listed for {0}")]
    NoPrice(String),
}
