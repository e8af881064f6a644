use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Football API error: {status} - {message}")]
    FootballApi { status: u16, message: String },

    #[error("Telegram error: {code} - {description}")]
    Telegram { code: i64, description: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },
}
