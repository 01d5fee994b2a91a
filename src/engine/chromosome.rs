use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a read past the end of the codon sequence does.
///
/// Policies are mutually exclusive and chosen per chromosome instance:
/// `Fail` reports "no codon", `Wrap` re-reads modulo the length, `Extend`
/// appends freshly drawn codons on demand so the genome itself grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    Fail,
    Wrap,
    Extend { lo: i64, hi: i64 },
}

/// An ordered, mutable codon sequence.
///
/// Codons are `i64`: random generation draws non-negative values, but
/// external mutation operators may drive them negative, which is why
/// production selection uses `|codon mod k|`. The genetic-operator surface
/// is `push`/`insert`/`remove`/`set`; mapping only ever reads sequentially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    codons: Vec<i64>,
    policy: ExhaustionPolicy,
}

impl Chromosome {
    pub fn new(codons: Vec<i64>, policy: ExhaustionPolicy) -> Self {
        Chromosome { codons, policy }
    }

    pub fn random<R: Rng + ?Sized>(
        length: usize,
        codon_range: Range<i64>,
        policy: ExhaustionPolicy,
        rng: &mut R,
    ) -> Self {
        let codons = (0..length)
            .map(|_| rng.gen_range(codon_range.clone()))
            .collect();
        Chromosome { codons, policy }
    }

    pub fn len(&self) -> usize {
        self.codons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    pub fn codons(&self) -> &[i64] {
        &self.codons
    }

    /// Raw indexed read, no exhaustion policy applied.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.codons.get(index).copied()
    }

    pub fn push(&mut self, codon: i64) {
        self.codons.push(codon);
    }

    pub fn insert(&mut self, index: usize, codon: i64) {
        self.codons.insert(index, codon);
    }

    pub fn remove(&mut self, index: usize) -> i64 {
        self.codons.remove(index)
    }

    pub fn set(&mut self, index: usize, codon: i64) {
        self.codons[index] = codon;
    }

    /// Policy-applied read. `rng` is only consulted by the `Extend` policy,
    /// which appends drawn codons until `index` is covered.
    pub fn codon_at<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<i64> {
        if let Some(&codon) = self.codons.get(index) {
            return Some(codon);
        }
        match self.policy {
            ExhaustionPolicy::Fail => None,
            ExhaustionPolicy::Wrap => {
                if self.codons.is_empty() {
                    None
                } else {
                    Some(self.codons[index % self.codons.len()])
                }
            }
            ExhaustionPolicy::Extend { lo, hi } => {
                while self.codons.len() <= index {
                    self.codons.push(rng.gen_range(lo..hi));
                }
                Some(self.codons[index])
            }
        }
    }
}
