//! Constrained derivation-tree synthesis for evolutionary program search.
//!
//! The crate builds grammar-shaped program trees three ways: directly from a
//! grammar under a depth budget (`engine::TreeBuilder`, Full/Grow/Ramped),
//! by mapping an integer genome onto grammar productions
//! (`engine::DepthFirstMapper` / `engine::BreadthFirstMapper`), and from a
//! typed node inventory pruned by a bottom-up type-possibility table
//! (`typed::TypedBuilder`, which also counts the reachable program space).
//! Fitness evaluation, selection, and genetic operators live outside this
//! crate; trees cross that boundary through their string serialization and
//! chromosomes through their plain codon-editing surface.

pub mod config;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod tree;
pub mod typed;

pub use engine::{
    BreadthFirstMapper, Chromosome, DepthFirstMapper, ExhaustionPolicy, GenomeMapper,
    InitMethod, InitRecord, MapError, MappedTree, PopulationSpec, TreeBuilder,
};
pub use error::{GramevoError, Result};
pub use grammar::Grammar;
pub use tree::{DerivationNode, DerivationTree};
