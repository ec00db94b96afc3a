//! # cellgraph
//!
//! An in-memory integer spreadsheet engine.
//!
//! Cells hold either a literal integer or a formula such as `=A1*B2+3`.
//! Every update re-evaluates exactly the cells that depend on the changed
//! cell, in dependency order, and rejects updates that would create a
//! circular reference.
//!
//! ## Features
//!
//! - Formula parsing with `+ - * /`, unary minus and parentheses
//! - Incremental recalculation through a bidirectional dependency graph
//! - Cycle detection with rollback of the rejected update
//! - Optional lock-protected handle for sharing a sheet across threads
//!
//! ## Example
//!
//! ```rust
//! use cellgraph::prelude::*;
//!
//! let mut sheet = Spreadsheet::new();
//! sheet.set_cell_value("A1", 0).unwrap();
//! sheet.set_cell_value("A2", 1).unwrap();
//! for i in 3..15 {
//!     let formula = format!("=A{}+A{}", i - 2, i - 1);
//!     sheet.set_cell_value(&format!("A{}", i), formula).unwrap();
//! }
//! assert_eq!(sheet.get_cell_value("A14").unwrap(), 233);
//!
//! let err = sheet.set_cell_value("A1", "=A14").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::CircularReference);
//! ```

pub mod error;
pub mod prelude;
pub mod shared;
pub mod spreadsheet;

pub use error::{Error, ErrorKind, Result};
pub use shared::SharedSpreadsheet;
pub use spreadsheet::{SheetOptions, Spreadsheet};

// Re-export core types
pub use cellgraph_core::{CellId, CellInput};

// Re-export formula types
pub use cellgraph_formula::{
    evaluate, parse_formula, BinaryOperator, CellLookup, FormulaError, FormulaExpr,
    ParserOptions, UnaryOperator,
};
