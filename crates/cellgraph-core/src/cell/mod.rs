//! Cell-related types
//!
//! This module contains:
//! - [`CellId`] - A cell's location (e.g., "A1")
//! - [`CellInput`] - Content written to a cell

mod address;
mod input;

pub use address::CellId;
pub use input::CellInput;
