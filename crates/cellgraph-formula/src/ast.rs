//! Formula Abstract Syntax Tree types
//!
//! Long operator chains build trees as deep as the formula is long, so the
//! tree walks below (`Clone`, `PartialEq`, `Debug` and `Drop`) use explicit
//! work lists instead of recursion.

use cellgraph_core::CellId;
use std::fmt;

/// Formula expression AST
pub enum FormulaExpr {
    /// Integer literal
    Constant(i64),

    /// Single cell reference
    CellRef(CellId),

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Build a unary operation node
    pub fn unary(op: UnaryOperator, operand: FormulaExpr) -> Self {
        FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Build a binary operation node
    pub fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Pending work while rebuilding a tree
enum CloneStep<'a> {
    Visit(&'a FormulaExpr),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

impl Clone for FormulaExpr {
    fn clone(&self) -> Self {
        let mut work = vec![CloneStep::Visit(self)];
        let mut built: Vec<FormulaExpr> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                CloneStep::Visit(node) => match node {
                    FormulaExpr::Constant(n) => built.push(FormulaExpr::Constant(*n)),
                    FormulaExpr::CellRef(cell) => built.push(FormulaExpr::CellRef(*cell)),
                    FormulaExpr::UnaryOp { op, operand } => {
                        work.push(CloneStep::Unary(*op));
                        work.push(CloneStep::Visit(operand));
                    }
                    FormulaExpr::BinaryOp { op, left, right } => {
                        work.push(CloneStep::Binary(*op));
                        work.push(CloneStep::Visit(right));
                        work.push(CloneStep::Visit(left));
                    }
                },
                CloneStep::Unary(op) => {
                    let operand = pop_built(&mut built);
                    built.push(FormulaExpr::unary(op, operand));
                }
                CloneStep::Binary(op) => {
                    let right = pop_built(&mut built);
                    let left = pop_built(&mut built);
                    built.push(FormulaExpr::binary(op, left, right));
                }
            }
        }

        pop_built(&mut built)
    }
}

fn pop_built(built: &mut Vec<FormulaExpr>) -> FormulaExpr {
    // Every build step is preceded by its children
    debug_assert!(!built.is_empty());
    built.pop().unwrap_or(FormulaExpr::Constant(0))
}

impl PartialEq for FormulaExpr {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];

        while let Some(pair) = pairs.pop() {
            match pair {
                (FormulaExpr::Constant(a), FormulaExpr::Constant(b)) if a == b => {}
                (FormulaExpr::CellRef(a), FormulaExpr::CellRef(b)) if a == b => {}
                (
                    FormulaExpr::UnaryOp { op: a_op, operand: a },
                    FormulaExpr::UnaryOp { op: b_op, operand: b },
                ) if a_op == b_op => pairs.push((&**a, &**b)),
                (
                    FormulaExpr::BinaryOp {
                        op: a_op,
                        left: a_left,
                        right: a_right,
                    },
                    FormulaExpr::BinaryOp {
                        op: b_op,
                        left: b_left,
                        right: b_right,
                    },
                ) if a_op == b_op => {
                    pairs.push((&**a_right, &**b_right));
                    pairs.push((&**a_left, &**b_left));
                }
                _ => return false,
            }
        }

        true
    }
}

impl Eq for FormulaExpr {}

/// Pending output while printing a tree
enum DebugStep<'a> {
    Node(&'a FormulaExpr),
    Text(&'static str),
}

// Prints the same single-line shape `#[derive(Debug)]` would.
impl fmt::Debug for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut work = vec![DebugStep::Node(self)];

        while let Some(step) = work.pop() {
            match step {
                DebugStep::Text(text) => f.write_str(text)?,
                DebugStep::Node(FormulaExpr::Constant(n)) => write!(f, "Constant({})", n)?,
                DebugStep::Node(FormulaExpr::CellRef(cell)) => write!(f, "CellRef({:?})", cell)?,
                DebugStep::Node(FormulaExpr::UnaryOp { op, operand }) => {
                    write!(f, "UnaryOp {{ op: {:?}, operand: ", op)?;
                    work.push(DebugStep::Text(" }"));
                    work.push(DebugStep::Node(operand));
                }
                DebugStep::Node(FormulaExpr::BinaryOp { op, left, right }) => {
                    write!(f, "BinaryOp {{ op: {:?}, left: ", op)?;
                    work.push(DebugStep::Text(" }"));
                    work.push(DebugStep::Node(right));
                    work.push(DebugStep::Text(", right: "));
                    work.push(DebugStep::Node(left));
                }
            }
        }

        Ok(())
    }
}

impl Drop for FormulaExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(expr: &mut FormulaExpr, out: &mut Vec<FormulaExpr>) {
    match expr {
        FormulaExpr::Constant(_) | FormulaExpr::CellRef(_) => {}
        FormulaExpr::UnaryOp { operand, .. } => {
            out.push(std::mem::replace(&mut **operand, FormulaExpr::Constant(0)));
        }
        FormulaExpr::BinaryOp { left, right, .. } => {
            out.push(std::mem::replace(&mut **left, FormulaExpr::Constant(0)));
            out.push(std::mem::replace(&mut **right, FormulaExpr::Constant(0)));
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}
