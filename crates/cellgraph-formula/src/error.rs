//! Formula error types

use cellgraph_core::CellId;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or dependency ordering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula text did not start with '='
    #[error("Formula must start with '='")]
    MissingPrefix,

    /// Character the tokenizer does not recognise
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// Token that cannot start or continue an expression here
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// Ran out of tokens while an operand was expected
    #[error("Expected an operand, found end of formula")]
    UnexpectedEnd,

    /// Parenthesised expression without its ')'
    #[error("Expected ')'")]
    UnclosedParen,

    /// Tokens left over after a complete expression
    #[error("Unexpected tokens after expression: '{0}'")]
    TrailingTokens(String),

    /// Integer literal that does not fit in an i64
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Parentheses or unary minus nested beyond the parser limit
    #[error("Formula nesting exceeds the limit of {0}")]
    NestingTooDeep(usize),

    /// Circular reference
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(CellId),
}
