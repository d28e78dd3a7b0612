use thiserror::Error;

/// Errors that can arise while fetching, caching or decoding game design data.
#[derive(Debug, Error)]
pub enum PssError {
    /// Transport-level failure talking to the game API.
    #[error("http error: {0}")]
    Http(String),

    /// The game API answered with a non-success status.
    #[error("api returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The request did not complete within the configured timeout.
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Wrapper around IO errors (cache directory, cache files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML payload.
    #[error("xml error: {0}")]
    Xml(String),

    /// A required attribute is absent from a design element.
    #[error("{element} is missing attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A numeric attribute could not be parsed.
    #[error("attribute {attribute} has non-numeric value '{value}'")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
}

pub type PssResult<T> = std::result::Result<T, PssError>;
