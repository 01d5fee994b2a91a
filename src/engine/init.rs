//! Direct tree constructors and population initialization.
//!
//! Full and Grow share one candidate filter: at a rule, only productions
//! whose minimum depth fits the remaining budget qualify. Full additionally
//! prefers recursive candidates so trees keep extending toward the requested
//! depth; Grow picks uniformly among all qualifying alternatives and yields
//! variable-depth, typically shallower trees. Both are structurally unable
//! to exceed the depth budget.

use std::ops::{Range, RangeInclusive};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::{Chromosome, ExhaustionPolicy};
use super::mapping::GenomeMapper;
use super::progress::InitCallback;
use crate::error::{GramevoError, Result};
use crate::grammar::{Grammar, RuleId, Symbol};
use crate::tree::{DerivationNode, DerivationTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMethod {
    Full,
    Grow,
}

/// Event payload: how one individual was built. Downstream statistics
/// consume this; the core only produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitRecord {
    pub method: InitMethod,
    pub depth: usize,
}

/// One individual of a ramped population.
#[derive(Debug, Clone, PartialEq)]
pub struct RampedIndividual {
    pub tree: DerivationTree,
    pub record: InitRecord,
}

/// Batch parameters shared by every population constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSpec {
    pub size: usize,
    pub allow_duplicates: bool,
    /// Attempts per individual before duplicate rejection gives up with a
    /// configuration error instead of looping forever.
    pub duplicate_retry_limit: usize,
}

impl Default for PopulationSpec {
    fn default() -> Self {
        PopulationSpec {
            size: 500,
            allow_duplicates: true,
            duplicate_retry_limit: 100,
        }
    }
}

/// Builds one derivation tree directly from the grammar, no genome involved.
pub struct TreeBuilder<'g> {
    grammar: &'g Grammar,
}

impl<'g> TreeBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        TreeBuilder { grammar }
    }

    /// Full construction: drive every branch toward the requested depth.
    pub fn full<R: Rng + ?Sized>(&self, depth: usize, rng: &mut R) -> Result<DerivationTree> {
        self.check_budget(depth)?;
        let root = self.expand(self.grammar.start(), depth, InitMethod::Full, rng);
        Ok(DerivationTree::new(root))
    }

    /// Grow construction: uniform among qualifying alternatives, so the tree
    /// may terminate well before the budget.
    pub fn grow<R: Rng + ?Sized>(&self, depth: usize, rng: &mut R) -> Result<DerivationTree> {
        self.check_budget(depth)?;
        let root = self.expand(self.grammar.start(), depth, InitMethod::Grow, rng);
        Ok(DerivationTree::new(root))
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        method: InitMethod,
        depth: usize,
        rng: &mut R,
    ) -> Result<DerivationTree> {
        match method {
            InitMethod::Full => self.full(depth, rng),
            InitMethod::Grow => self.grow(depth, rng),
        }
    }

    fn check_budget(&self, depth: usize) -> Result<()> {
        if self.grammar.min_depth() > depth {
            return Err(GramevoError::Configuration(format!(
                "grammar needs at least depth {} but the budget is {}",
                self.grammar.min_depth(),
                depth
            )));
        }
        Ok(())
    }

    /// Invariant: callers only recurse with `remaining >= rule.min_depth()`,
    /// so the qualifying set is never empty.
    fn expand<R: Rng + ?Sized>(
        &self,
        rule_id: RuleId,
        remaining: usize,
        method: InitMethod,
        rng: &mut R,
    ) -> DerivationNode {
        let productions = self.grammar.rule(rule_id).productions();
        let choice = if productions.len() == 1 {
            // Exactly one alternative: no random draw.
            0
        } else {
            let qualifying: Vec<usize> = (0..productions.len())
                .filter(|&i| productions[i].min_depth() <= remaining)
                .collect();
            debug_assert!(!qualifying.is_empty());
            let pool: Vec<usize> = match method {
                InitMethod::Full => {
                    let recursive: Vec<usize> = qualifying
                        .iter()
                        .copied()
                        .filter(|&i| productions[i].is_recursive())
                        .collect();
                    if recursive.is_empty() {
                        qualifying
                    } else {
                        recursive
                    }
                }
                InitMethod::Grow => qualifying,
            };
            *pool.choose(rng).expect("qualifying candidates exist")
        };

        let symbols = productions[choice].symbols();
        let mut children = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match symbol {
                Symbol::Rule(r) => {
                    children.push(self.expand(*r, remaining - 1, method, rng));
                }
                Symbol::Literal(text) => children.push(DerivationNode::leaf(text.clone())),
            }
        }
        DerivationNode::internal(rule_id, children)
    }
}

/// Build a whole population with one method and one depth.
pub fn full_population<R: Rng + ?Sized, C: InitCallback>(
    grammar: &Grammar,
    depth: usize,
    spec: &PopulationSpec,
    rng: &mut R,
    callback: &mut C,
) -> Result<Vec<DerivationTree>> {
    direct_population(grammar, InitMethod::Full, depth, spec, rng, callback)
}

pub fn grow_population<R: Rng + ?Sized, C: InitCallback>(
    grammar: &Grammar,
    depth: usize,
    spec: &PopulationSpec,
    rng: &mut R,
    callback: &mut C,
) -> Result<Vec<DerivationTree>> {
    direct_population(grammar, InitMethod::Grow, depth, spec, rng, callback)
}

fn direct_population<R: Rng + ?Sized, C: InitCallback>(
    grammar: &Grammar,
    method: InitMethod,
    depth: usize,
    spec: &PopulationSpec,
    rng: &mut R,
    callback: &mut C,
) -> Result<Vec<DerivationTree>> {
    let builder = TreeBuilder::new(grammar);
    builder.check_budget(depth)?;
    let mut population: Vec<DerivationTree> = Vec::with_capacity(spec.size);
    for index in 0..spec.size {
        let tree = build_distinct(
            || builder.build(method, depth, rng),
            |candidate| population.contains(candidate),
            spec,
        )?;
        callback.on_individual(index, &InitRecord { method, depth });
        population.push(tree);
    }
    Ok(population)
}

/// Ramped half-and-half: the population climbs an inclusive depth ladder
/// (clamped below by the grammar minimum), alternating Grow on even and Full
/// on odd indices.
pub fn ramped_population<R: Rng + ?Sized, C: InitCallback>(
    grammar: &Grammar,
    depths: RangeInclusive<usize>,
    spec: &PopulationSpec,
    rng: &mut R,
    callback: &mut C,
) -> Result<Vec<RampedIndividual>> {
    let start = (*depths.start()).max(grammar.min_depth());
    let end = *depths.end();
    if end < start {
        return Err(GramevoError::Configuration(format!(
            "ramped depth range ends at {} but the grammar needs at least {}",
            end,
            grammar.min_depth()
        )));
    }

    let per_depth = spec.size as f64 / (end - start + 1) as f64;
    let builder = TreeBuilder::new(grammar);
    let mut population: Vec<RampedIndividual> = Vec::with_capacity(spec.size);
    for index in 0..spec.size {
        let depth = (start + (index as f64 / per_depth) as usize).min(end);
        let method = if index % 2 == 0 {
            InitMethod::Grow
        } else {
            InitMethod::Full
        };
        let tree = build_distinct(
            || builder.build(method, depth, rng),
            |candidate| population.iter().any(|ind| &ind.tree == candidate),
            spec,
        )?;
        let record = InitRecord { method, depth };
        callback.on_individual(index, &record);
        population.push(RampedIndividual { tree, record });
    }
    Ok(population)
}

/// Genome-driven initialization: draw a random chromosome, map it, and
/// regenerate on any mapping failure or duplicate, within the retry bound.
/// Mapping failure here is the expected fate of some random genomes, not a
/// defect.
pub fn mapped_population<M: GenomeMapper, R: Rng>(
    mapper: &M,
    genome_length: usize,
    codon_range: Range<i64>,
    policy: ExhaustionPolicy,
    spec: &PopulationSpec,
    rng: &mut R,
) -> Result<Vec<(Chromosome, DerivationTree)>> {
    let mut population: Vec<(Chromosome, DerivationTree)> = Vec::with_capacity(spec.size);
    for _ in 0..spec.size {
        let mut attempts = 0;
        let accepted = loop {
            let mut chromosome =
                Chromosome::random(genome_length, codon_range.clone(), policy, rng);
            match mapper.map_tree(&mut chromosome, rng) {
                Ok(mapped)
                    if spec.allow_duplicates
                        || !population.iter().any(|(_, t)| t == &mapped.tree) =>
                {
                    break (chromosome, mapped.tree);
                }
                Ok(_) => {}
                Err(cause) => log::debug!("discarding invalid genome: {}", cause),
            }
            attempts += 1;
            if attempts >= spec.duplicate_retry_limit {
                return Err(GramevoError::Configuration(format!(
                    "no valid individual after {} genome attempts",
                    attempts
                )));
            }
        };
        population.push(accepted);
    }
    Ok(population)
}

/// Parallel Full construction with one deterministic RNG per individual.
/// Duplicate rejection is inherently sequential and is not offered here.
pub fn full_population_par(
    grammar: &Grammar,
    depth: usize,
    size: usize,
    base_seed: u64,
) -> Result<Vec<DerivationTree>> {
    par_population(grammar, InitMethod::Full, depth, size, base_seed)
}

pub fn grow_population_par(
    grammar: &Grammar,
    depth: usize,
    size: usize,
    base_seed: u64,
) -> Result<Vec<DerivationTree>> {
    par_population(grammar, InitMethod::Grow, depth, size, base_seed)
}

fn par_population(
    grammar: &Grammar,
    method: InitMethod,
    depth: usize,
    size: usize,
    base_seed: u64,
) -> Result<Vec<DerivationTree>> {
    TreeBuilder::new(grammar).check_budget(depth)?;
    (0..size)
        .into_par_iter()
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
            TreeBuilder::new(grammar).build(method, depth, &mut rng)
        })
        .collect()
}

fn build_distinct<F, D>(
    mut build: F,
    mut is_duplicate: D,
    spec: &PopulationSpec,
) -> Result<DerivationTree>
where
    F: FnMut() -> Result<DerivationTree>,
    D: FnMut(&DerivationTree) -> bool,
{
    let mut attempts = 0;
    loop {
        let tree = build()?;
        if spec.allow_duplicates || !is_duplicate(&tree) {
            return Ok(tree);
        }
        attempts += 1;
        if attempts >= spec.duplicate_retry_limit {
            return Err(GramevoError::Configuration(format!(
                "no distinct individual after {} attempts; the depth-bounded \
                 variety may be smaller than the requested population",
                attempts
            )));
        }
    }
}
