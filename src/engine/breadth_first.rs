use rand::{Rng, RngCore};

use super::chromosome::Chromosome;
use super::codon_consumer::CodonConsumer;
use super::mapping::{GenomeMapper, MapError, MappedTree};
use crate::grammar::{Grammar, RuleId, Symbol};
use crate::tree::{DerivationNode, DerivationTree};

/// Level-order genome-to-tree mapper.
///
/// Shares the depth-first mapper's codon cursor semantics but expands the
/// whole frontier — every pending nonterminal at the current tree level —
/// before descending. The same codon sequence therefore maps to a different
/// tree than under pre-order expansion.
pub struct BreadthFirstMapper<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
}

enum ArenaSymbol {
    Rule(RuleId),
    Literal(String),
}

struct ArenaNode {
    symbol: ArenaSymbol,
    children: Vec<usize>,
}

impl<'g> BreadthFirstMapper<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: usize) -> Self {
        BreadthFirstMapper { grammar, max_depth }
    }

    pub fn map<R: Rng + ?Sized>(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut R,
    ) -> Result<MappedTree, MapError> {
        self.map_from(chromosome, 0, rng)
    }

    pub fn map_from<R: Rng + ?Sized>(
        &self,
        chromosome: &mut Chromosome,
        start: usize,
        rng: &mut R,
    ) -> Result<MappedTree, MapError> {
        let mut consumer = CodonConsumer::starting_at(chromosome, start);

        let mut arena = vec![ArenaNode {
            symbol: ArenaSymbol::Rule(self.grammar.start()),
            children: Vec::new(),
        }];
        let mut frontier = vec![0usize];
        let mut level = 1usize;

        while !frontier.is_empty() {
            if level > self.max_depth {
                return Err(MapError::DepthExceeded {
                    max_depth: self.max_depth,
                });
            }
            let mut next = Vec::new();
            for index in frontier {
                let rule_id = match arena[index].symbol {
                    ArenaSymbol::Rule(r) => r,
                    ArenaSymbol::Literal(_) => unreachable!("literals never enter the frontier"),
                };
                let productions = self.grammar.rule(rule_id).productions();
                let choice = if productions.len() > 1 {
                    consumer
                        .choose(productions.len(), rng)
                        .ok_or(MapError::CodonsExhausted)?
                } else {
                    0
                };
                for symbol in productions[choice].symbols() {
                    let child = arena.len();
                    match symbol {
                        Symbol::Rule(r) => {
                            arena.push(ArenaNode {
                                symbol: ArenaSymbol::Rule(*r),
                                children: Vec::new(),
                            });
                            next.push(child);
                        }
                        Symbol::Literal(text) => arena.push(ArenaNode {
                            symbol: ArenaSymbol::Literal(text.clone()),
                            children: Vec::new(),
                        }),
                    }
                    arena[index].children.push(child);
                }
            }
            frontier = next;
            level += 1;
        }

        Ok(MappedTree {
            tree: DerivationTree::new(materialize(&arena, 0)),
            codons_used: consumer.consumed(),
        })
    }
}

fn materialize(arena: &[ArenaNode], index: usize) -> DerivationNode {
    match &arena[index].symbol {
        ArenaSymbol::Literal(text) => DerivationNode::leaf(text.clone()),
        ArenaSymbol::Rule(rule) => DerivationNode::internal(
            *rule,
            arena[index]
                .children
                .iter()
                .map(|&child| materialize(arena, child))
                .collect(),
        ),
    }
}

impl GenomeMapper for BreadthFirstMapper<'_> {
    fn map_tree(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut dyn RngCore,
    ) -> Result<MappedTree, MapError> {
        self.map(chromosome, rng)
    }
}
