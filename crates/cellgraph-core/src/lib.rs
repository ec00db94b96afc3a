//! # cellgraph-core
//!
//! Core data types for the cellgraph evaluation engine.
//!
//! This crate provides the fundamental types used throughout cellgraph:
//! - [`CellId`] - Cell addressing and the A1-style codec
//! - [`CellInput`] - Literal or formula content written to a cell
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::{CellId, CellInput};
//!
//! let id: CellId = "B3".parse().unwrap();
//! assert_eq!((id.row(), id.col()), (1, 2));
//! assert_eq!(id.to_string(), "B3");
//!
//! let input = CellInput::parse_entry("=B3*2").unwrap();
//! assert!(input.is_formula());
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellId, CellInput};
pub use error::{Error, Result};
