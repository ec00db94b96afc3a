//! Dependency tracking for formula recalculation
//!
//! The graph keeps two adjacency maps that are exact inverses of each
//! other: `refers_to` holds the cells a formula reads, `referred_from` holds
//! the formulas reading a cell. Both are only ever changed together by
//! [`DependencyGraph::replace_outgoing_edges`].

use crate::error::{FormulaError, FormulaResult};
use ahash::{AHashMap, AHashSet};
use cellgraph_core::CellId;
use std::collections::VecDeque;

/// Dependency graph for formula cells
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Cell → cells its formula references (precedents)
    refers_to: AHashMap<CellId, AHashSet<CellId>>,
    /// Cell → cells whose formulas reference it (dependents)
    referred_from: AHashMap<CellId, AHashSet<CellId>>,
}

/// DFS marker for the topological sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Work item for the topological sort
enum Visit {
    Enter(CellId),
    Exit(CellId),
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every outgoing edge of `cell` with edges to `targets`
    ///
    /// Duplicate targets collapse into one edge. Returns the previous
    /// targets so the change can be undone by passing them back in.
    pub fn replace_outgoing_edges<I>(&mut self, cell: CellId, targets: I) -> AHashSet<CellId>
    where
        I: IntoIterator<Item = CellId>,
    {
        let previous = self.refers_to.remove(&cell).unwrap_or_default();
        for target in &previous {
            if let Some(referrers) = self.referred_from.get_mut(target) {
                referrers.remove(&cell);
                if referrers.is_empty() {
                    self.referred_from.remove(target);
                }
            }
        }

        let targets: AHashSet<CellId> = targets.into_iter().collect();
        for &target in &targets {
            self.referred_from.entry(target).or_default().insert(cell);
        }
        if !targets.is_empty() {
            self.refers_to.insert(cell, targets);
        }

        previous
    }

    /// Get cells whose formulas reference the given cell
    pub fn dependents_of(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.referred_from
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells the given cell's formula references
    pub fn precedents_of(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.refers_to
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether any formula references the given cell
    pub fn has_dependents(&self, cell: CellId) -> bool {
        self.referred_from.contains_key(&cell)
    }

    /// Total number of reference edges
    pub fn edge_count(&self) -> usize {
        self.refers_to.values().map(|targets| targets.len()).sum()
    }

    /// Find the topmost cells that transitively depend on `cell`
    ///
    /// Walks `referred_from` breadth-first and keeps every visited cell that
    /// nothing else references. When no such cell exists (the cell has no
    /// dependents, or every path upward loops) the cell itself is returned.
    pub fn root_referrers(&self, cell: CellId) -> Vec<CellId> {
        let mut frontier = VecDeque::from([cell]);
        let mut seen = AHashSet::new();
        seen.insert(cell);
        let mut roots = Vec::new();

        while let Some(current) = frontier.pop_front() {
            if !self.has_dependents(current) {
                roots.push(current);
            }

            for referrer in self.dependents_of(current) {
                if seen.insert(referrer) {
                    frontier.push_back(referrer);
                }
            }
        }

        if roots.is_empty() {
            roots.push(cell);
        }
        roots
    }

    /// Order every cell reachable from `roots` so that each cell comes after
    /// all cells it references
    ///
    /// Fails with [`FormulaError::CircularReference`] naming the first cell
    /// found to be its own ancestor.
    pub fn topological_order_from(&self, roots: &[CellId]) -> FormulaResult<Vec<CellId>> {
        let mut order = Vec::new();
        let mut marks: AHashMap<CellId, Mark> = AHashMap::new();
        let mut stack = Vec::new();

        for &root in roots {
            stack.push(Visit::Enter(root));

            while let Some(visit) = stack.pop() {
                match visit {
                    Visit::Enter(cell) => match marks.get(&cell) {
                        Some(Mark::Done) => {}
                        Some(Mark::InProgress) => {
                            return Err(FormulaError::CircularReference(cell));
                        }
                        None => {
                            marks.insert(cell, Mark::InProgress);
                            stack.push(Visit::Exit(cell));
                            stack.extend(self.precedents_of(cell).map(Visit::Enter));
                        }
                    },
                    Visit::Exit(cell) => {
                        marks.insert(cell, Mark::Done);
                        order.push(cell);
                    }
                }
            }
        }

        Ok(order)
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.refers_to.clear();
        self.referred_from.clear();
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let forward = self.refers_to.iter().all(|(cell, targets)| {
            !targets.is_empty()
                && targets
                    .iter()
                    .all(|t| self.referred_from.get(t).map_or(false, |s| s.contains(cell)))
        });
        let backward = self.referred_from.iter().all(|(cell, sources)| {
            !sources.is_empty()
                && sources
                    .iter()
                    .all(|s| self.refers_to.get(s).map_or(false, |t| t.contains(cell)))
        });
        forward && backward
    }
}
