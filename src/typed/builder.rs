use std::collections::HashMap;
use std::fmt;

use num_bigint::BigUint;
use rand::seq::SliceRandom;
use rand::Rng;

use super::node::{NodeInventory, TypeId, TypedNode};
use super::table::{assignments, TypePossibilityTable};
use crate::error::{GramevoError, Result};

/// A program tree over a typed node inventory. A lone terminal has depth 0;
/// a function node is 1 + its deepest child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedTree {
    node: TypedNode,
    children: Vec<TypedTree>,
}

impl TypedTree {
    pub fn node(&self) -> &TypedNode {
        &self.node
    }

    pub fn children(&self) -> &[TypedTree] {
        &self.children
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TypedTree::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }

    /// Return type of the whole tree, recomputed from the signatures.
    pub fn return_type(&self) -> Option<TypeId> {
        let arg_types = self
            .children
            .iter()
            .map(TypedTree::return_type)
            .collect::<Option<Vec<_>>>()?;
        self.node.return_type(&arg_types)
    }
}

impl fmt::Display for TypedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            return f.write_str(self.node.name());
        }
        write!(f, "({}", self.node.name())?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        f.write_str(")")
    }
}

/// Grow-style construction over a typed inventory, pruned by the
/// possibility table, plus variety counting over the same recursion.
///
/// The inventory and table are shared read-only; rebuild the table before
/// constructing if the inventory changed, since stale tables also invalidate
/// every variety count derived from them.
pub struct TypedBuilder<'a> {
    inventory: &'a NodeInventory,
    table: &'a TypePossibilityTable,
}

enum Candidate<'n> {
    Terminal(&'n TypedNode),
    Function(&'n TypedNode, Vec<Vec<TypeId>>),
}

impl<'a> TypedBuilder<'a> {
    pub fn new(inventory: &'a NodeInventory, table: &'a TypePossibilityTable) -> Self {
        TypedBuilder { inventory, table }
    }

    /// Build a random tree of depth <= `remaining` returning `required`.
    ///
    /// Candidates are terminals of the required type plus, when depth
    /// remains, functions with at least one argument assignment drawn from
    /// the table's next-lower level that yields the required type. The
    /// candidate is chosen uniformly, then the assignment uniformly among
    /// the valid ones, so an invalid choice is never drawn and then fixed up.
    pub fn build_tree<R: Rng + ?Sized>(
        &self,
        required: TypeId,
        remaining: usize,
        rng: &mut R,
    ) -> Result<TypedTree> {
        assert!(
            remaining <= self.table.max_depth(),
            "depth {} beyond table built for {}",
            remaining,
            self.table.max_depth()
        );

        let candidates = self.collect_candidates(required, remaining);
        if candidates.is_empty() {
            return Err(GramevoError::Configuration(format!(
                "no node can produce type {} within depth {}",
                required, remaining
            )));
        }

        match candidates.choose(rng).expect("candidates are non-empty") {
            Candidate::Terminal(node) => Ok(TypedTree {
                node: (*node).clone(),
                children: Vec::new(),
            }),
            Candidate::Function(node, valid) => {
                let args = valid.choose(rng).expect("valid assignments are non-empty");
                let children = args
                    .iter()
                    .map(|&arg| self.build_tree(arg, remaining - 1, rng))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TypedTree {
                    node: (*node).clone(),
                    children,
                })
            }
        }
    }

    /// Number of distinct trees `build_tree(required, remaining, _)` could
    /// return, counted without building any of them.
    pub fn count_varieties(&self, remaining: usize, required: TypeId) -> BigUint {
        let mut memo = HashMap::new();
        self.count(remaining, required, &mut memo)
    }

    /// Early-exit form of `count_varieties`: stops the moment the running
    /// total reaches `target`. Full counts can be astronomically large, so
    /// callers probing "is the space big enough" should use this.
    pub fn has_at_least_varieties(
        &self,
        remaining: usize,
        required: TypeId,
        target: &BigUint,
    ) -> bool {
        if *target == BigUint::from(0u32) {
            return true;
        }
        let mut memo = HashMap::new();
        let mut total = BigUint::from(0u32);

        for node in self.inventory.terminals() {
            if node.return_type(&[]) == Some(required) {
                total += 1u32;
                if &total >= target {
                    return true;
                }
            }
        }
        if remaining > 0 {
            let pool: Vec<TypeId> = self.table.types_at(remaining - 1).iter().copied().collect();
            for node in self.inventory.functions() {
                for args in assignments(node.arity(), &pool) {
                    if node.return_type(&args) != Some(required) {
                        continue;
                    }
                    let mut product = BigUint::from(1u32);
                    for &arg in &args {
                        product *= self.count(remaining - 1, arg, &mut memo);
                    }
                    total += product;
                    if &total >= target {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn collect_candidates(&self, required: TypeId, remaining: usize) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::new();
        for node in self.inventory.terminals() {
            if node.return_type(&[]) == Some(required) {
                candidates.push(Candidate::Terminal(node));
            }
        }
        if remaining > 0 {
            let pool: Vec<TypeId> = self.table.types_at(remaining - 1).iter().copied().collect();
            for node in self.inventory.functions() {
                let valid: Vec<Vec<TypeId>> = assignments(node.arity(), &pool)
                    .filter(|args| node.return_type(args) == Some(required))
                    .collect();
                if !valid.is_empty() {
                    candidates.push(Candidate::Function(node, valid));
                }
            }
        }
        candidates
    }

    fn count(
        &self,
        remaining: usize,
        required: TypeId,
        memo: &mut HashMap<(usize, TypeId), BigUint>,
    ) -> BigUint {
        if let Some(cached) = memo.get(&(remaining, required)) {
            return cached.clone();
        }
        let mut total = BigUint::from(0u32);
        for node in self.inventory.terminals() {
            if node.return_type(&[]) == Some(required) {
                total += 1u32;
            }
        }
        if remaining > 0 {
            let pool: Vec<TypeId> = self.table.types_at(remaining - 1).iter().copied().collect();
            for node in self.inventory.functions() {
                for args in assignments(node.arity(), &pool) {
                    if node.return_type(&args) != Some(required) {
                        continue;
                    }
                    let mut product = BigUint::from(1u32);
                    for &arg in &args {
                        product *= self.count(remaining - 1, arg, memo);
                    }
                    total += product;
                }
            }
        }
        memo.insert((remaining, required), total.clone());
        total
    }
}
