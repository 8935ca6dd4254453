use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("Unknown country code: {0}")]
    UnknownCountryCode(String),

    #[error("Account lookup failed: {0}")]
    LookupFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
