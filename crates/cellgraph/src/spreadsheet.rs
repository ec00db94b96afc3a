//! Spreadsheet with incremental recalculation
//!
//! Every mutation runs the same pipeline: parse the new content, swap the
//! cell's reference edges in the dependency graph, find the topmost cells
//! affected by the change, order them topologically (rejecting cycles) and
//! re-evaluate them in that order. Reads never recompute anything.
//!
//! # Example
//!
//! ```rust
//! use cellgraph::Spreadsheet;
//!
//! let mut sheet = Spreadsheet::new();
//! sheet.set_cell_value("B1", "=A1+A2+A3").unwrap();
//! sheet.set_cell_value("A1", 12).unwrap();
//! sheet.set_cell_value("A2", 12).unwrap();
//! sheet.set_cell_value("A3", 12).unwrap();
//! assert_eq!(sheet.get_cell_value("B1").unwrap(), 36);
//!
//! sheet.set_cell_value("A2", 24).unwrap();
//! assert_eq!(sheet.get_cell_value("B1").unwrap(), 48);
//! ```

use crate::error::Result;
use ahash::AHashMap;
use cellgraph_core::{CellId, CellInput};
use cellgraph_formula::{
    cell_references, evaluate, parse_formula_with_options, DependencyGraph, FormulaExpr,
    ParserOptions,
};
use log::{debug, trace, warn};

/// Options controlling sheet behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SheetOptions {
    /// Undo the reference edges and content of an update that introduces a
    /// circular reference (default: true)
    ///
    /// When disabled, a rejected formula still replaces the cell's content
    /// and edges, its value reads as 0, and dependent cells keep their old
    /// values until the next successful update.
    pub rollback_on_cycle: bool,
    /// Formula parser settings
    pub parser: ParserOptions,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            rollback_on_cycle: true,
            parser: ParserOptions::default(),
        }
    }
}

/// Stored formula: the source text and its parsed tree
#[derive(Debug)]
struct Formula {
    source: String,
    expr: FormulaExpr,
}

/// A single stored cell
#[derive(Debug)]
struct Cell {
    /// Last computed value (the literal itself for non-formula cells)
    value: i64,
    formula: Option<Formula>,
}

/// An integer spreadsheet that keeps formula values up to date
#[derive(Debug, Default)]
pub struct Spreadsheet {
    cells: AHashMap<CellId, Cell>,
    graph: DependencyGraph,
    options: SheetOptions,
}

impl Spreadsheet {
    /// Create an empty sheet with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with the given options
    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options this sheet was created with
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Set a cell to a literal integer or a formula
    ///
    /// Integers (`i64`, `i32`) become literals; strings are parsed as
    /// formulas and must start with `=`. On error the sheet is left as it
    /// was before the call (unless `rollback_on_cycle` is disabled).
    pub fn set_cell_value(&mut self, address: &str, value: impl Into<CellInput>) -> Result<()> {
        let cell = CellId::parse(address)?;
        self.set_cell_value_at(cell, value)
    }

    /// Set a cell from raw entry text, as typed by a user
    ///
    /// See [`CellInput::parse_entry`] for how the text is classified.
    pub fn set_cell_entry(&mut self, address: &str, text: &str) -> Result<()> {
        let cell = CellId::parse(address)?;
        let input = CellInput::parse_entry(text)?;
        self.set_cell_value_at(cell, input)
    }

    /// Set a cell by id
    pub fn set_cell_value_at(&mut self, cell: CellId, value: impl Into<CellInput>) -> Result<()> {
        // Parsing
        let (content, references) = match value.into() {
            CellInput::Literal(value) => (
                Cell {
                    value,
                    formula: None,
                },
                Vec::new(),
            ),
            CellInput::Formula(source) => {
                let expr = parse_formula_with_options(&source, &self.options.parser)?;
                let references = cell_references(&expr);
                (
                    Cell {
                        value: 0,
                        formula: Some(Formula { source, expr }),
                    },
                    references,
                )
            }
        };

        // Graph update
        let previous_edges = self.graph.replace_outgoing_edges(cell, references);

        // Sorting
        let roots = self.graph.root_referrers(cell);
        let order = match self.graph.topological_order_from(&roots) {
            Ok(order) => order,
            Err(err) => {
                if self.options.rollback_on_cycle {
                    self.graph.replace_outgoing_edges(cell, previous_edges);
                    warn!("Rejected update of {}: {}; changes rolled back", cell, err);
                } else {
                    self.cells.insert(cell, content);
                    warn!("Rejected update of {}: {}; new references kept", cell, err);
                }
                return Err(err.into());
            }
        };

        self.cells.insert(cell, content);

        // Evaluation
        let recalculated = self.recalculate(&order);
        debug!(
            "Updated {}: {} cells ordered, {} formulas recalculated",
            cell,
            order.len(),
            recalculated
        );

        Ok(())
    }

    /// Re-evaluate every stored formula cell in `order`, returning how many
    /// were evaluated
    ///
    /// `order` must list each cell after all cells it references.
    fn recalculate(&mut self, order: &[CellId]) -> usize {
        let mut count = 0;

        for &id in order {
            let cells = &self.cells;
            let value = match cells.get(&id) {
                Some(Cell {
                    formula: Some(formula),
                    ..
                }) => evaluate(&formula.expr, &|cell: CellId| {
                    cells.get(&cell).map_or(0, |c| c.value)
                }),
                _ => continue,
            };

            if let Some(cell) = self.cells.get_mut(&id) {
                trace!("Recalculated {} = {}", id, value);
                cell.value = value;
                count += 1;
            }
        }

        count
    }

    /// Get the current value of a cell
    ///
    /// Cells that were never set read as 0.
    pub fn get_cell_value(&self, address: &str) -> Result<i64> {
        let cell = CellId::parse(address)?;
        Ok(self.get_cell_value_at(cell))
    }

    /// Get the current value of a cell by id
    pub fn get_cell_value_at(&self, cell: CellId) -> i64 {
        self.cells.get(&cell).map_or(0, |c| c.value)
    }

    /// Get the formula source of a cell, if it holds one
    pub fn formula(&self, address: &str) -> Result<Option<&str>> {
        let cell = CellId::parse(address)?;
        Ok(self
            .cells
            .get(&cell)
            .and_then(|c| c.formula.as_ref())
            .map(|f| f.source.as_str()))
    }

    /// Cells directly referenced by the formula at `address`, sorted
    pub fn precedents(&self, address: &str) -> Result<Vec<CellId>> {
        let cell = CellId::parse(address)?;
        let mut cells: Vec<CellId> = self.graph.precedents_of(cell).collect();
        cells.sort_unstable();
        Ok(cells)
    }

    /// Cells whose formulas directly reference `address`, sorted
    pub fn dependents(&self, address: &str) -> Result<Vec<CellId>> {
        let cell = CellId::parse(address)?;
        let mut cells: Vec<CellId> = self.graph.dependents_of(cell).collect();
        cells.sort_unstable();
        Ok(cells)
    }

    /// Number of cells that have been written
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has been written yet
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove every cell and reference
    pub fn clear(&mut self) {
        self.cells.clear();
        self.graph.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use pretty_assertions::assert_eq;

    fn id(addr: &str) -> CellId {
        CellId::parse(addr).unwrap()
    }

    #[test]
    fn test_unset_cell_is_zero() {
        let sheet = Spreadsheet::new();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 0);
        assert_eq!(sheet.get_cell_value("ZZ999").unwrap(), 0);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_literal_value() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", 42).unwrap();
        sheet.set_cell_value("A2", -7i64).unwrap();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 42);
        assert_eq!(sheet.get_cell_value("A2").unwrap(), -7);
        assert_eq!(sheet.formula("A1").unwrap(), None);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_formula_source_is_kept() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("B1", "=A1 * 2").unwrap();
        assert_eq!(sheet.formula("B1").unwrap(), Some("=A1 * 2"));
        assert_eq!(sheet.precedents("B1").unwrap(), vec![id("A1")]);
        assert_eq!(sheet.dependents("A1").unwrap(), vec![id("B1")]);
    }

    #[test]
    fn test_formula_without_references() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", "=(2+3)*4").unwrap();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 20);
    }

    #[test]
    fn test_literal_drops_previous_references() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", "=A2").unwrap();
        sheet.set_cell_value("A1", 5).unwrap();
        assert!(sheet.precedents("A1").unwrap().is_empty());
        assert!(sheet.dependents("A2").unwrap().is_empty());

        // A2 may now refer to A1 without forming a cycle
        sheet.set_cell_value("A2", "=A1+1").unwrap();
        assert_eq!(sheet.get_cell_value("A2").unwrap(), 6);
    }

    #[test]
    fn test_parse_error_leaves_cell_untouched() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", "=A2+1").unwrap();
        sheet.set_cell_value("A2", 1).unwrap();

        let err = sheet.set_cell_value("A1", "=A3*").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpressionParse);
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 2);
        assert_eq!(sheet.formula("A1").unwrap(), Some("=A2+1"));
        assert!(sheet.dependents("A3").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_address() {
        let mut sheet = Spreadsheet::new();
        let err = sheet.set_cell_value("1A", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AddressParse);
        let err = sheet.get_cell_value("a1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AddressParse);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_set_cell_entry() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_entry("A1", "10").unwrap();
        sheet.set_cell_entry("A2", "=A1*3").unwrap();
        assert_eq!(sheet.get_cell_value("A2").unwrap(), 30);

        let err = sheet.set_cell_entry("A3", "ten").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueType);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_cycle_rolls_back() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", "=A2+1").unwrap();
        sheet.set_cell_value("A2", 10).unwrap();

        let err = sheet.set_cell_value("A2", "=A1").unwrap_err();
        assert_eq!(err, Error::CircularReference(id("A2")));

        assert_eq!(sheet.get_cell_value("A1").unwrap(), 11);
        assert_eq!(sheet.get_cell_value("A2").unwrap(), 10);
        assert_eq!(sheet.formula("A2").unwrap(), None);
        assert!(sheet.precedents("A2").unwrap().is_empty());

        // The sheet keeps working after the rejected update
        sheet.set_cell_value("A2", 20).unwrap();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 21);
    }

    #[test]
    fn test_cycle_without_rollback_keeps_edges() {
        let mut sheet = Spreadsheet::with_options(SheetOptions {
            rollback_on_cycle: false,
            ..SheetOptions::default()
        });
        sheet.set_cell_value("A1", "=A2").unwrap();

        let err = sheet.set_cell_value("A2", "=A1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularReference);
        assert_eq!(sheet.formula("A2").unwrap(), Some("=A1"));
        assert_eq!(sheet.precedents("A2").unwrap(), vec![id("A1")]);
        assert_eq!(sheet.get_cell_value("A2").unwrap(), 0);
    }

    #[test]
    fn test_nesting_limit_from_options() {
        let mut options = SheetOptions::default();
        options.parser.max_nesting_depth = 2;
        let mut sheet = Spreadsheet::with_options(options);

        sheet.set_cell_value("A1", "=((1))").unwrap();
        let err = sheet.set_cell_value("A1", "=(((1)))").unwrap_err();
        assert_eq!(
            err,
            Error::FormulaParse(cellgraph_formula::FormulaError::NestingTooDeep(2))
        );
        assert_eq!(sheet.get_cell_value("A1").unwrap(), 1);
    }

    #[test]
    fn test_long_formula_can_be_debug_printed() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", 2).unwrap();
        let formula = format!("=A1{}", "+1".repeat(200_000));
        sheet.set_cell_value("B1", formula).unwrap();

        assert_eq!(sheet.get_cell_value("B1").unwrap(), 200_002);
        assert!(format!("{:?}", sheet).contains("Constant(1)"));
    }

    #[test]
    fn test_clear() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A1", 1).unwrap();
        sheet.set_cell_value("A2", "=A1").unwrap();
        sheet.clear();
        assert!(sheet.is_empty());
        assert!(sheet.dependents("A1").unwrap().is_empty());
        assert_eq!(sheet.get_cell_value("A2").unwrap(), 0);
    }
}
