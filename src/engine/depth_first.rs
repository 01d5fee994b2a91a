use rand::{Rng, RngCore};

use super::chromosome::Chromosome;
use super::codon_consumer::CodonConsumer;
use super::mapping::{GenomeMapper, MapError, MappedTree};
use crate::grammar::{Grammar, RuleId, Symbol};
use crate::tree::{DerivationNode, DerivationTree};

/// Pre-order genome-to-tree mapper.
///
/// One global codon cursor; at a rule with more than one production the next
/// codon picks the alternative and the whole left subtree is completed before
/// the right sibling is touched. A rule node landing deeper than `max_depth`
/// aborts the mapping — unlike the direct constructors, a genome can demand
/// an over-deep tree, so the bound is checked rather than guaranteed.
pub struct DepthFirstMapper<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
}

impl<'g> DepthFirstMapper<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: usize) -> Self {
        DepthFirstMapper { grammar, max_depth }
    }

    pub fn map<R: Rng + ?Sized>(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut R,
    ) -> Result<MappedTree, MapError> {
        self.map_from(chromosome, 0, rng)
    }

    /// Map starting at codon index `start`; the root rule node sits at
    /// depth 1.
    pub fn map_from<R: Rng + ?Sized>(
        &self,
        chromosome: &mut Chromosome,
        start: usize,
        rng: &mut R,
    ) -> Result<MappedTree, MapError> {
        let mut consumer = CodonConsumer::starting_at(chromosome, start);
        let root = self.expand(self.grammar.start(), 1, &mut consumer, rng)?;
        Ok(MappedTree {
            tree: DerivationTree::new(root),
            codons_used: consumer.consumed(),
        })
    }

    fn expand<R: Rng + ?Sized>(
        &self,
        rule_id: RuleId,
        depth: usize,
        consumer: &mut CodonConsumer<'_>,
        rng: &mut R,
    ) -> Result<DerivationNode, MapError> {
        if depth > self.max_depth {
            return Err(MapError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        let rule = self.grammar.rule(rule_id);
        let productions = rule.productions();
        let choice = if productions.len() > 1 {
            consumer
                .choose(productions.len(), rng)
                .ok_or(MapError::CodonsExhausted)?
        } else {
            // A single alternative costs no codon.
            0
        };

        let symbols = productions[choice].symbols();
        let mut children = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match symbol {
                Symbol::Rule(r) => {
                    children.push(self.expand(*r, depth + 1, consumer, rng)?);
                }
                Symbol::Literal(text) => children.push(DerivationNode::leaf(text.clone())),
            }
        }
        Ok(DerivationNode::internal(rule_id, children))
    }
}

impl GenomeMapper for DepthFirstMapper<'_> {
    fn map_tree(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut dyn RngCore,
    ) -> Result<MappedTree, MapError> {
        self.map(chromosome, rng)
    }
}
