use rand::Rng;

use super::chromosome::Chromosome;

/// Sequential codon cursor shared by both mappers.
///
/// Tracks how many codons were drawn so a successful mapping can report its
/// consumption; the exhaustion policy lives on the chromosome itself.
pub struct CodonConsumer<'a> {
    chromosome: &'a mut Chromosome,
    position: usize,
    consumed: usize,
}

impl<'a> CodonConsumer<'a> {
    pub fn new(chromosome: &'a mut Chromosome) -> Self {
        Self::starting_at(chromosome, 0)
    }

    pub fn starting_at(chromosome: &'a mut Chromosome, start: usize) -> Self {
        CodonConsumer {
            chromosome,
            position: start,
            consumed: 0,
        }
    }

    /// Consume the next codon, or report exhaustion per the chromosome's
    /// policy.
    pub fn next_codon<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<i64> {
        let codon = self.chromosome.codon_at(self.position, rng)?;
        self.position += 1;
        self.consumed += 1;
        Some(codon)
    }

    /// Map the next codon onto one of `num_choices` alternatives. Codons may
    /// be negative, hence the absolute value of the remainder.
    pub fn choose<R: Rng + ?Sized>(&mut self, num_choices: usize, rng: &mut R) -> Option<usize> {
        debug_assert!(num_choices > 0);
        let codon = self.next_codon(rng)?;
        Some((codon % num_choices as i64).unsigned_abs() as usize)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::chromosome::ExhaustionPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn choose_takes_absolute_remainder() {
        let mut c = Chromosome::new(vec![7, -7, 0], ExhaustionPolicy::Fail);
        let mut consumer = CodonConsumer::new(&mut c);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(consumer.choose(3, &mut rng), Some(1));
        assert_eq!(consumer.choose(3, &mut rng), Some(1));
        assert_eq!(consumer.choose(3, &mut rng), Some(0));
        assert_eq!(consumer.choose(3, &mut rng), None);
        assert_eq!(consumer.consumed(), 3);
    }

    #[test]
    fn starting_offset_skips_codons() {
        let mut c = Chromosome::new(vec![1, 2, 3], ExhaustionPolicy::Fail);
        let mut consumer = CodonConsumer::starting_at(&mut c, 2);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(consumer.next_codon(&mut rng), Some(3));
        assert_eq!(consumer.consumed(), 1);
        assert_eq!(consumer.position(), 3);
    }
}
