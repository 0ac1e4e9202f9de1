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

    #[error("API error: {message}")]
    Api { message: String },

    #[error("gave up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("workbook write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("workbook read failed: {0}")]
    Sheet(#[from] calamine::XlsxError),

    #[error("bad input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
