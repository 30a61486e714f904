// Error types for table generation

use thiserror::Error;

/// Reasons a generation run is aborted
///
/// Every variant means the configuration has to be corrected; nothing is
/// retried and no table is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Invalid, inverted or non-positive parameter
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Requested tables do not fit the memory budget
    #[error("sizing error: {0}")]
    Sizing(String),

    /// Index mapping produced a value outside the table's valid domain
    #[error("domain violation: {0}")]
    DomainViolation(String),
}

impl TableError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn sizing(msg: impl Into<String>) -> Self {
        Self::Sizing(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::DomainViolation(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, TableError>;
