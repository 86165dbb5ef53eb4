use thiserror::Error;

/// Failure of a single lookup against the automation driver's element tree.
///
/// Strategies treat every variant as "no evidence" for the check that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The driver rejected the query (unsupported locator, bad expression).
    #[error("unsupported element query: {0}")]
    UnsupportedQuery(String),

    /// The element collection could not be read at all.
    #[error("element collection unavailable: {0}")]
    Unavailable(String),

    /// Transport level failure while talking to the driver.
    #[error("driver transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by configuration loading and the boundary adapters.
///
/// The classifier itself never returns one of these.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid driver url: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("driver returned {status} for {endpoint}")]
    DriverStatus { endpoint: String, status: u16 },

    #[error("screenshot decode failed: {0}")]
    ImageDecode(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl DetectorError {
    pub(crate) fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
