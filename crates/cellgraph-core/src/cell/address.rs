//! Cell identifiers and the A1-style address codec

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell's location in the grid (e.g. "A1", "AB32")
///
/// Addresses are written as a run of uppercase letters followed by a run of
/// decimal digits. The letter run is a bijective base-26 numeral naming the
/// row (A=1, Z=26, AA=27, ...) and the digit run is the 1-based column.
/// Both coordinates are stored 0-based, so `AB32` is row 27, column 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId {
    row: u32,
    col: u32,
}

impl CellId {
    /// Create a cell id from 0-based row and column indices
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Parse a cell address
    ///
    /// # Examples
    /// ```
    /// use cellgraph_core::CellId;
    ///
    /// let id = CellId::parse("A1").unwrap();
    /// assert_eq!((id.row(), id.col()), (0, 0));
    ///
    /// let id = CellId::parse("AB32").unwrap();
    /// assert_eq!((id.row(), id.col()), (27, 31));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == 0 {
            return Err(Error::InvalidAddress(format!("no row letters in '{}'", s)));
        }
        let row = Self::letters_to_row(&s[..pos])
            .map_err(|_| Error::InvalidAddress(format!("invalid row letters in '{}'", s)))?;

        let digits = &s[pos..];
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no column number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "unexpected characters after column number in '{}'",
                s
            )));
        }

        let col: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("column number too large in '{}'", s)))?;

        // Columns are 1-based in text, 0-based internally
        if col == 0 {
            return Err(Error::InvalidAddress(format!(
                "column number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self { row, col: col - 1 })
    }

    /// Convert a row index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn row_to_letters(row: u32) -> String {
        let mut letters = Vec::new();
        let mut n = row as u64 + 1;

        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert row letters to an index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Only uppercase `A`-`Z` are accepted.
    pub fn letters_to_row(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty row letters".into()));
        }

        let mut row: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!("invalid row letter '{}'", c)));
            }
            let digit = c as u32 - 'A' as u32 + 1;
            row = row
                .checked_mul(26)
                .and_then(|r| r.checked_add(digit))
                .ok_or_else(|| Error::InvalidAddress(format!("row '{}' is too large", letters)))?;
        }

        Ok(row - 1)
    }

    /// Format as an A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::row_to_letters(self.row), self.col as u64 + 1)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
