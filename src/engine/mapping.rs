use rand::RngCore;
use thiserror::Error;

use super::chromosome::Chromosome;
use crate::tree::DerivationTree;

/// Why a genome-driven mapping produced no tree.
///
/// This is the expected, non-fatal outcome of random genome content — a
/// sentinel rather than a crate error — so initializer loops can discard or
/// regenerate the individual. The two causes are kept apart for diagnostics.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("ran out of codons before the tree terminated")]
    CodonsExhausted,
    #[error("mapping exceeded maximum depth {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// A successfully mapped tree plus how many codons it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTree {
    pub tree: DerivationTree,
    pub codons_used: usize,
}

/// Common surface of the depth-first and breadth-first mappers.
///
/// The same codon sequence maps to different trees under the two traversal
/// orders; that divergence is intentional and both implementations honor the
/// same depth and exhaustion constraints.
pub trait GenomeMapper {
    fn map_tree(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut dyn RngCore,
    ) -> Result<MappedTree, MapError>;
}
