/// Unified error type for the typeahead controller.
///
/// The controller itself almost never fails: normalization is total, cache
/// operations are infallible, and fetch failures are *reported* through the
/// event channel rather than returned. What remains is construction-time
/// validation.
#[derive(Debug, thiserror::Error)]
pub enum TypeaheadError {
    /// A configuration value is invalid.
    #[error("Invalid config: {field} = \"{value}\" ({reason})")]
    InvalidConfig {
        /// Which config field.
        field: &'static str,
        /// The invalid value, stringified.
        value: String,
        /// Why it is invalid.
        reason: String,
    },
}

/// Convenience alias used throughout the crate.
pub type TypeaheadResult<T> = Result<T, TypeaheadError>;
