//! Argument errors shared by the benchmark binaries.

use std::fmt;

/// Everything that can go wrong before a benchmark starts running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// Fewer positional arguments than the program needs.
    Missing {
        /// Number of required positional arguments.
        expected: usize,
        /// Number actually supplied.
        found: usize,
    },
    /// An argument could not be read; carries the parser's message.
    Unparsable(String),
    /// Matrix dimension was zero or negative.
    NonPositiveSize(i64),
    /// Kernel version outside 1..=4.
    UnknownVersion(i64),
    /// Both the matrix size and the version were rejected.
    SizeAndVersion { n: i64, version: i64 },
    NegativeArraySize(i64),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { expected, found } => {
                write!(f, "expected {expected} arguments, found {found}")
            }
            Self::Unparsable(message) => write!(f, "{message}"),
            Self::NonPositiveSize(_) => write!(f, "Matrix size must be larger than 0"),
            Self::UnknownVersion(_) => write!(f, "Version must be 1, 2, 3, or 4"),
            Self::SizeAndVersion { .. } => write!(
                f,
                "Matrix size must be larger than 0\nVersion must be 1, 2, 3, or 4"
            ),
            Self::NegativeArraySize(size) => {
                write!(f, "array size must not be negative, got {size}")
            }
        }
    }
}

impl std::error::Error for ArgError {}
