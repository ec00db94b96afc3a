//! # cellgraph-formula
//!
//! Formula parser, evaluator and dependency graph for cellgraph.
//!
//! This crate provides:
//! - Tokenizing and parsing (text → AST)
//! - Integer evaluation (AST → value)
//! - Dependency tracking and topological ordering for recalculation
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::CellId;
//! use cellgraph_formula::{evaluate, parse_formula};
//!
//! let ast = parse_formula("=(A1+4)*3").unwrap();
//! let result = evaluate(&ast, &|_: CellId| 2);
//! assert_eq!(result, 18);
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod token;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use dependency::DependencyGraph;
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{cell_references, evaluate, CellLookup};
pub use parser::{
    parse_formula, parse_formula_with_options, parse_tokens, ParserOptions,
    DEFAULT_MAX_NESTING_DEPTH,
};
pub use token::{tokenize, Token};
