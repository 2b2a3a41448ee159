//! Error taxonomy and the user-facing diagnostics each error maps to

use thiserror::Error;

/// Diagnostic printed for argument, input and degenerate-cluster failures.
pub const GENERIC_DIAGNOSTIC: &str = "An Error Has Occurred";

/// Diagnostic printed when `k` is invalid or too large for the data.
pub const CLUSTER_COUNT_DIAGNOSTIC: &str = "Incorrect number of clusters!";

/// Diagnostic printed when the iteration bound is invalid.
pub const ITERATION_DIAGNOSTIC: &str = "Incorrect maximum iteration!";

/// Category of a failure, used to pick the single line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Arity, I/O, malformed input and empty clusters.
    Generic,
    /// Bad `k`.
    ClusterCount,
    /// Bad `max_iterations`.
    Iterations,
}

impl Diagnostic {
    /// The exact text printed on standard output.
    pub fn message(self) -> &'static str {
        match self {
            Diagnostic::Generic => GENERIC_DIAGNOSTIC,
            Diagnostic::ClusterCount => CLUSTER_COUNT_DIAGNOSTIC,
            Diagnostic::Iterations => ITERATION_DIAGNOSTIC,
        }
    }
}

/// Errors returned while validating arguments, loading points or fitting.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong positional argument count or an unrecognized flag.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// `k` is not a whole, finite number of at least one.
    #[error("invalid cluster count {value:?}")]
    InvalidClusterCount {
        /// Raw argument text.
        value: String,
    },

    /// `max_iterations` is not a whole number within the accepted bounds.
    #[error("invalid iteration bound {value:?}: expected a whole number in [{min}, {max}]")]
    InvalidIterationCount {
        /// Raw argument text.
        value: String,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },

    /// A row could not be parsed into finite numbers.
    #[error("line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// A row has a different field count than the first row.
    #[error("line {line}: expected {expected} fields, found {found}")]
    DimensionMismatch {
        /// 1-based line number in the input.
        line: usize,
        /// Dimension established by the first row.
        expected: usize,
        /// Fields found on this row.
        found: usize,
    },

    /// No non-blank rows were read.
    #[error("input contains no points")]
    EmptyInput,

    /// `k` must be strictly smaller than the number of points.
    #[error("cannot create {k} clusters from {count} points")]
    TooManyClusters {
        /// Requested number of clusters.
        k: usize,
        /// Number of points loaded.
        count: usize,
    },

    /// Invalid engine parameter that has no dedicated diagnostic.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Reading the input stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map this error onto the diagnostic line the CLI prints.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Error::InvalidClusterCount { .. } | Error::TooManyClusters { .. } => {
                Diagnostic::ClusterCount
            }
            Error::InvalidIterationCount { .. } => Diagnostic::Iterations,
            Error::Arguments(_)
            | Error::MalformedRow { .. }
            | Error::DimensionMismatch { .. }
            | Error::EmptyInput
            | Error::InvalidParameter { .. }
            | Error::Io(_) => Diagnostic::Generic,
        }
    }
}

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_categories() {
        let err = Error::TooManyClusters { k: 3, count: 3 };
        assert_eq!(err.diagnostic().message(), "Incorrect number of clusters!");

        let err = Error::InvalidIterationCount {
            value: "0".to_string(),
            min: 1,
            max: 1000,
        };
        assert_eq!(err.diagnostic().message(), "Incorrect maximum iteration!");

        let err = Error::DimensionMismatch {
            line: 2,
            expected: 2,
            found: 3,
        };
        assert_eq!(err.diagnostic(), Diagnostic::Generic);
        assert_eq!(err.to_string(), "line 2: expected 2 fields, found 3");
    }

    #[test]
    fn test_empty_input_is_generic() {
        assert_eq!(Error::EmptyInput.diagnostic().message(), GENERIC_DIAGNOSTIC);
    }
}
