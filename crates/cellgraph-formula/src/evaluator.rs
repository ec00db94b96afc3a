//! Formula evaluator
//!
//! Reduces an expression tree to an integer. Evaluation is pure: cell values
//! come from a [`CellLookup`] and nothing is written back. The caller is
//! responsible for evaluating cells in dependency order.
//!
//! Trees are walked with an explicit work stack so that deeply nested or
//! very long formulas cannot exhaust the call stack.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use cellgraph_core::CellId;

/// Read-only view of cell values used during evaluation
pub trait CellLookup {
    /// Current value of a cell, or 0 if the cell does not exist
    fn cell_value(&self, cell: CellId) -> i64;
}

impl<F> CellLookup for F
where
    F: Fn(CellId) -> i64,
{
    fn cell_value(&self, cell: CellId) -> i64 {
        self(cell)
    }
}

/// Pending work while walking a tree
enum Step<'a> {
    Visit(&'a FormulaExpr),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

/// Evaluate a formula expression
///
/// Arithmetic wraps on overflow and division by zero yields 0, so this
/// never panics.
///
/// # Example
/// ```rust
/// use cellgraph_core::CellId;
/// use cellgraph_formula::{evaluate, parse_formula};
///
/// let ast = parse_formula("=A1*2+1").unwrap();
/// let value = evaluate(&ast, &|cell: CellId| if cell == CellId::new(0, 0) { 20 } else { 0 });
/// assert_eq!(value, 41);
/// ```
pub fn evaluate<L>(expr: &FormulaExpr, lookup: &L) -> i64
where
    L: CellLookup + ?Sized,
{
    let mut work = vec![Step::Visit(expr)];
    let mut values: Vec<i64> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            Step::Visit(node) => match node {
                FormulaExpr::Constant(n) => values.push(*n),
                FormulaExpr::CellRef(cell) => values.push(lookup.cell_value(*cell)),
                FormulaExpr::UnaryOp { op, operand } => {
                    work.push(Step::Unary(*op));
                    work.push(Step::Visit(operand));
                }
                FormulaExpr::BinaryOp { op, left, right } => {
                    // Left is evaluated first, so it is pushed last
                    work.push(Step::Binary(*op));
                    work.push(Step::Visit(right));
                    work.push(Step::Visit(left));
                }
            },
            Step::Unary(op) => {
                let x = pop_operand(&mut values);
                values.push(apply_unary(op, x));
            }
            Step::Binary(op) => {
                let y = pop_operand(&mut values);
                let x = pop_operand(&mut values);
                values.push(apply_binary(op, x, y));
            }
        }
    }

    debug_assert_eq!(values.len(), 1);
    pop_operand(&mut values)
}

fn pop_operand(values: &mut Vec<i64>) -> i64 {
    // Every operator step is preceded by its operands
    debug_assert!(!values.is_empty());
    values.pop().unwrap_or_default()
}

fn apply_unary(op: UnaryOperator, x: i64) -> i64 {
    match op {
        UnaryOperator::Negate => x.wrapping_neg(),
    }
}

fn apply_binary(op: BinaryOperator, x: i64, y: i64) -> i64 {
    match op {
        BinaryOperator::Add => x.wrapping_add(y),
        BinaryOperator::Subtract => x.wrapping_sub(y),
        BinaryOperator::Multiply => x.wrapping_mul(y),
        BinaryOperator::Divide => {
            if y == 0 {
                0
            } else {
                x.wrapping_div(y)
            }
        }
    }
}

/// Collect every distinct cell referenced by an expression
///
/// The result is sorted and free of duplicates.
pub fn cell_references(expr: &FormulaExpr) -> Vec<CellId> {
    let mut refs = Vec::new();
    let mut work = vec![expr];

    while let Some(node) = work.pop() {
        match node {
            FormulaExpr::Constant(_) => {}
            FormulaExpr::CellRef(cell) => refs.push(*cell),
            FormulaExpr::UnaryOp { operand, .. } => work.push(operand),
            FormulaExpr::BinaryOp { left, right, .. } => {
                work.push(right);
                work.push(left);
            }
        }
    }

    refs.sort_unstable();
    refs.dedup();
    refs
}
