//! Engine error types.

/// Error type for configuration failures surfaced to the caller.
///
/// Data-shape irregularities (missing field values, absent children,
/// undefined sort values) are never errors; they resolve through the null
/// policies of the sorter and filter engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Global filtering was requested without column metadata or an
    /// explicit global field list.
    #[error("global filtering requires columns or global filter fields to be defined")]
    MissingGlobalFilterFields,

    /// A filter entry referenced a match mode absent from the registry.
    #[error("unknown filter match mode: {0}")]
    UnknownMatchMode(String),

    /// A selection call did not match the configured selection storage.
    #[error("selection storage mismatch: {0}")]
    SelectionStorageMismatch(&'static str),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
