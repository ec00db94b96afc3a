//! Prelude module - common imports for cellgraph users
//!
//! ```rust
//! use cellgraph::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellId,
    CellInput,
    // Error types
    Error,
    ErrorKind,
    Result,
    // Main types
    SharedSpreadsheet,
    SheetOptions,
    Spreadsheet,
};
