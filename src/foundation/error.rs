/// Convenience result type used across Chartographer.
pub type ChartResult<T> = Result<T, ChartError>;

/// Top-level error taxonomy used by engine and service APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    /// A referenced canvas or fragment does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected sizes or positions. Raised before any mutation happens.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Blob or metadata I/O failed, or a stored blob is missing or unreadable.
    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),

    /// Errors when serializing or deserializing configuration and records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChartError {
    /// Build a [`ChartError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`ChartError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`ChartError::Storage`] value from any error or message.
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    /// Build a [`ChartError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for [`ChartError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for ChartError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(anyhow::Error::new(value).context("sqlite"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
