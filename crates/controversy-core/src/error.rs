use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("rating {value} out of range {min}..={max}")]
    RatingOutOfRange { value: i64, min: u8, max: u8 },

    #[error("invalid client page location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    #[error("client page location has no host: {0}")]
    MissingHost(String),
}
