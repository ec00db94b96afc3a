//! Error types for the cellgraph engine

use cellgraph_core::CellId;
use cellgraph_formula::FormulaError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by sheet operations
///
/// None of these leave the sheet unusable; the caller may keep issuing
/// operations after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed cell address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Formula text that could not be tokenized or parsed
    #[error("Formula parse error: {0}")]
    FormulaParse(FormulaError),

    /// Entry text that is neither an integer nor a formula
    #[error("Invalid value type: expected {expected}, got {actual}")]
    InvalidValueType {
        expected: &'static str,
        actual: String,
    },

    /// The update would make a cell depend on itself
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(CellId),
}

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AddressParse,
    ExpressionParse,
    ValueType,
    CircularReference,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAddress(_) => ErrorKind::AddressParse,
            Error::FormulaParse(_) => ErrorKind::ExpressionParse,
            Error::InvalidValueType { .. } => ErrorKind::ValueType,
            Error::CircularReference(_) => ErrorKind::CircularReference,
        }
    }
}

impl From<cellgraph_core::Error> for Error {
    fn from(err: cellgraph_core::Error) -> Self {
        match err {
            cellgraph_core::Error::InvalidAddress(msg) => Error::InvalidAddress(msg),
            cellgraph_core::Error::InvalidValueType { expected, actual } => {
                Error::InvalidValueType { expected, actual }
            }
        }
    }
}

impl From<FormulaError> for Error {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::CircularReference(cell) => Error::CircularReference(cell),
            other => Error::FormulaParse(other),
        }
    }
}
