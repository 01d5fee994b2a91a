use std::collections::BTreeSet;

use super::node::{NodeInventory, TypeId};

/// Per-remaining-depth reachability of return types.
///
/// `types_at(d)` is the set of types some node tree of depth <= d can
/// return. Level 0 holds the terminal return types; level d adds whatever a
/// function node can produce when every argument slot is fillable from level
/// d-1. Built once per inventory/max-depth configuration and read-only
/// afterwards; rebuild it whenever the inventory changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePossibilityTable {
    levels: Vec<BTreeSet<TypeId>>,
}

impl TypePossibilityTable {
    pub fn build(inventory: &NodeInventory, max_depth: usize) -> Self {
        let mut levels = Vec::with_capacity(max_depth + 1);

        let mut level0 = BTreeSet::new();
        for node in inventory.terminals() {
            if let Some(t) = node.return_type(&[]) {
                level0.insert(t);
            }
        }
        levels.push(level0);

        for d in 1..=max_depth {
            let mut level = levels[d - 1].clone();
            let pool: Vec<TypeId> = levels[d - 1].iter().copied().collect();
            for node in inventory.functions() {
                for args in assignments(node.arity(), &pool) {
                    if let Some(ret) = node.return_type(&args) {
                        level.insert(ret);
                    }
                }
            }
            levels.push(level);
        }

        TypePossibilityTable { levels }
    }

    pub fn max_depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// # Panics
    ///
    /// Panics when `depth` exceeds the depth the table was built for; that
    /// is a programmer error, not a recoverable condition.
    pub fn types_at(&self, depth: usize) -> &BTreeSet<TypeId> {
        assert!(
            depth < self.levels.len(),
            "depth {} beyond table built for {}",
            depth,
            self.max_depth()
        );
        &self.levels[depth]
    }

    pub fn reachable(&self, depth: usize, required: TypeId) -> bool {
        self.types_at(depth).contains(&required)
    }
}

/// Odometer over `pool^arity`, in pool order. Yields a single empty
/// assignment for arity 0.
pub(crate) fn assignments(arity: usize, pool: &[TypeId]) -> Assignments<'_> {
    Assignments {
        pool,
        counters: vec![0; arity],
        done: pool.is_empty() && arity > 0,
    }
}

pub(crate) struct Assignments<'p> {
    pool: &'p [TypeId],
    counters: Vec<usize>,
    done: bool,
}

impl Iterator for Assignments<'_> {
    type Item = Vec<TypeId>;

    fn next(&mut self) -> Option<Vec<TypeId>> {
        if self.done {
            return None;
        }
        let current = self.counters.iter().map(|&i| self.pool[i]).collect();
        let mut pos = 0;
        loop {
            if pos == self.counters.len() {
                self.done = true;
                break;
            }
            self.counters[pos] += 1;
            if self.counters[pos] < self.pool.len() {
                break;
            }
            self.counters[pos] = 0;
            pos += 1;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::node::TypedNode;

    const NUM: TypeId = 0;
    const BOOL: TypeId = 1;

    fn inventory() -> NodeInventory {
        let mut inv = NodeInventory::new();
        inv.register(TypedNode::terminal("x", NUM));
        inv.register(TypedNode::function("add", vec![NUM, NUM], NUM));
        inv.register(TypedNode::function("gt", vec![NUM, NUM], BOOL));
        inv
    }

    #[test]
    fn level_zero_holds_only_terminal_types() {
        let table = TypePossibilityTable::build(&inventory(), 2);
        assert!(table.reachable(0, NUM));
        assert!(!table.reachable(0, BOOL));
    }

    #[test]
    fn deeper_levels_add_function_return_types() {
        let table = TypePossibilityTable::build(&inventory(), 2);
        assert!(table.reachable(1, BOOL));
        assert!(table.reachable(2, BOOL));
        assert!(table.reachable(2, NUM));
    }

    #[test]
    fn assignments_enumerate_the_full_product() {
        let pool = [0, 1];
        let all: Vec<Vec<TypeId>> = assignments(2, &pool).collect();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&vec![0, 0]));
        assert!(all.contains(&vec![1, 0]));
        assert!(all.contains(&vec![0, 1]));
        assert!(all.contains(&vec![1, 1]));
    }

    #[test]
    fn arity_zero_yields_one_empty_assignment() {
        let pool = [0];
        let all: Vec<Vec<TypeId>> = assignments(0, &pool).collect();
        assert_eq!(all, vec![Vec::<TypeId>::new()]);
    }

    #[test]
    #[should_panic(expected = "beyond table")]
    fn out_of_range_level_aborts() {
        let table = TypePossibilityTable::build(&inventory(), 1);
        table.types_at(2);
    }
}
