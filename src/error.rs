//! Error types for the verification harness.
//!
//! Configuration problems are ordinary errors returned through [`Result`].
//! Check failures are never returned: they are rendered from
//! [`CheckFailure`] into the failure report and then end the run.

use thiserror::Error;

/// Errors raised while configuring a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// A configuration name that no shipped ABI carries.
    #[error("Unknown ABI: {name:?}")]
    UnknownAbi {
        /// The name as given.
        name: String,
    },
    /// An unrecognised mismatch policy.
    #[error("Invalid mismatch policy: {value:?} (expected \"abort\" or \"panic\")")]
    InvalidPolicy {
        /// The value as given.
        value: String,
    },
    /// A known ABI that the selected context's set does not contain.
    #[error("ABI {name} is not available in the {context} context")]
    UnsupportedAbi {
        /// ABI name.
        name: &'static str,
        /// `host` or `device`.
        context: &'static str,
    },
    /// A filter that names no ABI at all.
    #[error("ABI filter for the {context} context selects no configuration")]
    EmptyAbiFilter {
        /// `host` or `device`.
        context: &'static str,
    },
}

/// Structured description of a failed check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    /// A boolean check over a whole batch did not hold.
    #[error("check failed: {check}")]
    Truth {
        /// What was being checked.
        check: String,
    },
    /// Reference and computed lane values differ.
    #[error("lane mismatch: expected {expected}, computed {computed} ({site})")]
    Mismatch {
        /// Debug rendering of the reference value.
        expected: String,
        /// Debug rendering of the computed value.
        computed: String,
        /// Lane, chunk and source location of the comparison.
        site: String,
    },
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Creates an unknown-ABI error.
pub fn unknown_abi(name: impl Into<String>) -> HarnessError {
    HarnessError::UnknownAbi { name: name.into() }
}

/// Creates an invalid-policy error.
pub fn invalid_policy(value: impl Into<String>) -> HarnessError {
    HarnessError::InvalidPolicy {
        value: value.into(),
    }
}
