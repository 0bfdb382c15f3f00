//! Error types for the OSPFv3 area core
//!
//! Most of what happens in this crate is event processing with no failure
//! mode of its own. The errors below cover the edges: configuration,
//! operator-supplied area identifiers, and failures reported back by the
//! external recalculation algorithms.

use crate::area::AreaId;
use thiserror::Error;

/// Result type alias for area core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the area core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text that is neither a dotted-quad nor a decimal area identifier
    #[error("Malformed Area-ID: {0}")]
    MalformedAreaId(String),

    /// Lookup by identifier found nothing
    #[error("No such Area: {0}")]
    NoSuchArea(AreaId),

    /// An area with this identifier is already registered
    #[error("Area {0} already exists")]
    DuplicateArea(AreaId),

    /// SPF or route recalculation reported a failure
    #[error("Recalculation failed in area {area}: {message}")]
    Recalculation {
        /// Area the recalculation ran against
        area: AreaId,
        /// Error message
        message: String,
    },

    /// I/O errors (config file loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed area identifier error
    pub fn malformed_area_id(text: impl Into<String>) -> Self {
        Self::MalformedAreaId(text.into())
    }

    /// Create a recalculation error
    pub fn recalculation(area: AreaId, message: impl Into<String>) -> Self {
        Self::Recalculation {
            area,
            message: message.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
