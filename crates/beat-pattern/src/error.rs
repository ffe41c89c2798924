use thiserror::Error;

/// Reasons a generation call is aborted before anything is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("no song clip assigned; cannot derive the song length")]
    MissingAudio,
    #[error("invalid generator parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
