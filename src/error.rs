//! Error types and handling for the symexpr crate.
//!
//! Every stage of an evaluation session (bracket matching, symbol extraction,
//! value loading and evaluation) reports failures through [`ExprError`]. All
//! errors are fail-fast: no partial result is produced once one is raised.

use std::fmt;
use std::num::ParseIntError;

/// Result type used throughout the crate.
///
/// This is a convenience type alias that uses the `ExprError` type for the error variant.
pub type Result<T> = std::result::Result<T, ExprError>;

/// Error type for expression matching, loading and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Error when parsing an integer literal.
    ///
    /// Raised for malformed numbers both in the expression text (for example
    /// `2.5` or `3x`) and in value lines.
    Parse(ParseIntError),

    /// A closing bracket was found with no opener left on the stack.
    UnmatchedBracket { position: usize, found: char },

    /// A closing bracket does not match the kind of the innermost open bracket.
    ///
    /// `(a]` fails at the `]` with `expected: ')'`.
    MismatchedBracket {
        position: usize,
        expected: char,
        found: char,
    },

    /// An opening bracket was never closed. `position` is the innermost
    /// unclosed opener.
    UnclosedBracket { position: usize, found: char },

    /// A scalar referenced in the expression has no entry in the symbol tables.
    ///
    /// To resolve this error, run symbol extraction before evaluating.
    UnknownVariable { name: String },

    /// An array referenced in the expression has no entry in the symbol tables.
    UnknownArray { name: String },

    /// Error when an array index is out of bounds.
    ///
    /// Raised by evaluation for subscripts outside `0..len`, and by value
    /// loading for `(index,value)` pairs beyond the declared size.
    ArrayIndexOutOfBounds {
        /// Name of the array being accessed
        name: String,
        /// Index that was attempted to be accessed
        index: i64,
        /// Actual length of the array
        len: usize,
    },

    /// A value line does not follow the `name value` or
    /// `name size (index,value) ...` layout.
    MalformedValueLine { line: String },

    /// Error in the structure of the token stream, such as a missing operand.
    Syntax(String),

    /// Bracket nesting exceeded the configured evaluation depth.
    RecursionLimit(String),

    /// A symbol name is longer than [`crate::types::MAX_NAME_LEN`].
    StringTooLong,

    /// Reading from a line source failed.
    Io(String),

    /// Error when a declared array size cannot be allocated.
    ///
    /// The string names the container that could not grow.
    CapacityExceeded(&'static str),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Parse(err) => write!(f, "Parse error: {}", err),
            ExprError::UnmatchedBracket { position, found } => {
                write!(f, "Unmatched bracket at position {}: found '{}'", position, found)
            }
            ExprError::MismatchedBracket {
                position,
                expected,
                found,
            } => write!(
                f,
                "Mismatched bracket at position {}: expected '{}', found '{}'",
                position, expected, found
            ),
            ExprError::UnclosedBracket { position, found } => {
                write!(f, "Unclosed bracket at position {}: found '{}'", position, found)
            }
            ExprError::UnknownVariable { name } => write!(f, "Unknown variable: '{}'", name),
            ExprError::UnknownArray { name } => write!(f, "Unknown array: '{}'", name),
            ExprError::ArrayIndexOutOfBounds { name, index, len } => write!(
                f,
                "Array index out of bounds: index {} out of bounds for '{}', length {}",
                index, name, len
            ),
            ExprError::MalformedValueLine { line } => {
                write!(f, "Malformed value line: '{}'", line)
            }
            ExprError::Syntax(err) => write!(f, "Syntax error: {}", err),
            ExprError::RecursionLimit(err) => write!(f, "Recursion limit exceeded: {}", err),
            ExprError::StringTooLong => write!(f, "Symbol name too long"),
            ExprError::Io(err) => write!(f, "I/O error: {}", err),
            ExprError::CapacityExceeded(container) => {
                write!(f, "Capacity exceeded for {}", container)
            }
        }
    }
}

impl std::error::Error for ExprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExprError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseIntError> for ExprError {
    fn from(err: ParseIntError) -> ExprError {
        ExprError::Parse(err)
    }
}

impl From<std::io::Error> for ExprError {
    fn from(err: std::io::Error) -> ExprError {
        ExprError::Io(err.to_string())
    }
}
