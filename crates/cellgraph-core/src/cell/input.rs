//! Values accepted when writing to a cell

use crate::error::{Error, Result};

/// Content written to a cell: a literal integer or formula text
///
/// Formula text is kept verbatim (including the leading `=`); parsing
/// happens when the input is applied to a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellInput {
    /// Literal integer value
    Literal(i64),
    /// Formula source, e.g. `=A1+B2*3`
    Formula(String),
}

impl CellInput {
    /// Classify raw entry text the way a user would type it into a cell
    ///
    /// Text starting with `=` is a formula. Otherwise the text (ignoring
    /// surrounding spaces) must be an integer.
    ///
    /// # Examples
    /// ```
    /// use cellgraph_core::CellInput;
    ///
    /// assert_eq!(CellInput::parse_entry("42").unwrap(), CellInput::Literal(42));
    /// assert_eq!(
    ///     CellInput::parse_entry("=A1+1").unwrap(),
    ///     CellInput::Formula("=A1+1".into())
    /// );
    /// assert!(CellInput::parse_entry("hello").is_err());
    /// ```
    pub fn parse_entry(text: &str) -> Result<Self> {
        if text.starts_with('=') {
            return Ok(CellInput::Formula(text.to_string()));
        }

        let trimmed = text.trim_matches(' ');
        if trimmed.is_empty() {
            return Err(Error::InvalidValueType {
                expected: "integer or formula",
                actual: "empty text".into(),
            });
        }

        trimmed
            .parse::<i64>()
            .map(CellInput::Literal)
            .map_err(|_| Error::InvalidValueType {
                expected: "integer or formula",
                actual: format!("'{}'", text),
            })
    }

    /// Whether this input is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellInput::Formula(_))
    }
}

impl From<i64> for CellInput {
    fn from(value: i64) -> Self {
        CellInput::Literal(value)
    }
}

impl From<i32> for CellInput {
    fn from(value: i32) -> Self {
        CellInput::Literal(value as i64)
    }
}

impl From<&str> for CellInput {
    fn from(formula: &str) -> Self {
        CellInput::Formula(formula.to_string())
    }
}

impl From<String> for CellInput {
    fn from(formula: String) -> Self {
        CellInput::Formula(formula)
    }
}
