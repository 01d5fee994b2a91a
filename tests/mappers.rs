use gramevo::engine::{
    BreadthFirstMapper, Chromosome, DepthFirstMapper, ExhaustionPolicy, MapError,
};
use gramevo::grammar::bnf;
use gramevo::Grammar;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn right_recursive() -> Grammar {
    bnf::parse("<S> ::= \"a\" <S> | \"b\"").unwrap()
}

/// Nested two-level grammar where pre-order and level-order expansion
/// consume codons in different sequence.
fn nested() -> Grammar {
    bnf::parse(
        "<S> ::= <A> <A>\n\
         <A> ::= <B> | \"t\"\n\
         <B> ::= \"u\" | \"v\"",
    )
    .unwrap()
}

/// A sentence of `S ::= "a" S | "b"` is any run of a's ending in one b.
fn is_sentence(source: &str) -> bool {
    source.ends_with('b') && source[..source.len() - 1].chars().all(|c| c == 'a')
}

#[test]
fn depth_first_selects_productions_by_codon_mod() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 5);
    let mut chromosome = Chromosome::new(vec![0, 0, 1], ExhaustionPolicy::Fail);
    let mut rng = StdRng::seed_from_u64(0);
    let mapped = mapper.map(&mut chromosome, &mut rng).unwrap();
    assert_eq!(mapped.tree.to_source(), "aab");
    assert_eq!(mapped.codons_used, 3);
    assert_eq!(mapped.tree.depth(), 3);
}

#[test]
fn negative_codons_select_by_absolute_remainder() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 5);
    // -2 mod 2 = 0 ("a" S), -3 mod 2 = -1 -> 1 ("b")
    let mut chromosome = Chromosome::new(vec![-2, -3], ExhaustionPolicy::Fail);
    let mut rng = StdRng::seed_from_u64(0);
    let mapped = mapper.map(&mut chromosome, &mut rng).unwrap();
    assert_eq!(mapped.tree.to_source(), "ab");
}

#[test]
fn both_mappers_agree_on_a_single_nonterminal_chain() {
    let grammar = right_recursive();
    let df = DepthFirstMapper::new(&grammar, 5);
    let bf = BreadthFirstMapper::new(&grammar, 5);
    let mut rng = StdRng::seed_from_u64(0);
    let codons = vec![0, 0, 1];
    let a = df
        .map(&mut Chromosome::new(codons.clone(), ExhaustionPolicy::Fail), &mut rng)
        .unwrap();
    let b = bf
        .map(&mut Chromosome::new(codons, ExhaustionPolicy::Fail), &mut rng)
        .unwrap();
    // One pending nonterminal per level: the traversal orders coincide.
    assert_eq!(a.tree, b.tree);
    assert_eq!(a.codons_used, b.codons_used);
}

#[test]
fn same_codons_map_to_different_trees_under_the_two_orders() {
    let grammar = nested();
    let df = DepthFirstMapper::new(&grammar, 4);
    let bf = BreadthFirstMapper::new(&grammar, 4);
    let mut rng = StdRng::seed_from_u64(0);
    let codons = vec![0, 0, 1, 0];

    // Pre-order: A1 -> B, B -> "u", A2 -> "t".
    let a = df
        .map(&mut Chromosome::new(codons.clone(), ExhaustionPolicy::Fail), &mut rng)
        .unwrap();
    assert_eq!(a.tree.to_source(), "ut");
    assert_eq!(a.codons_used, 3);

    // Level order: A1 -> B, A2 -> B, then B1 -> "v", B2 -> "u".
    let b = bf
        .map(&mut Chromosome::new(codons, ExhaustionPolicy::Fail), &mut rng)
        .unwrap();
    assert_eq!(b.tree.to_source(), "vu");
    assert_eq!(b.codons_used, 4);

    assert_ne!(a.tree, b.tree);
}

#[test]
fn random_genomes_yield_valid_sentences_under_both_mappers() {
    let grammar = right_recursive();
    let df = DepthFirstMapper::new(&grammar, 8);
    let bf = BreadthFirstMapper::new(&grammar, 8);
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let chromosome = Chromosome::random(30, 0..1000, ExhaustionPolicy::Fail, &mut rng);
        let a = df.map(&mut chromosome.clone(), &mut rng);
        let b = bf.map(&mut chromosome.clone(), &mut rng);
        if let Ok(mapped) = a {
            assert!(is_sentence(&mapped.tree.to_source()));
        }
        if let Ok(mapped) = b {
            assert!(is_sentence(&mapped.tree.to_source()));
        }
    }
}

#[test]
fn consumed_codons_resliced_reproduce_the_same_tree() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 6);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let mut chromosome = Chromosome::random(50, 0..1000, ExhaustionPolicy::Fail, &mut rng);
        let mapped = match mapper.map(&mut chromosome, &mut rng) {
            Ok(m) => m,
            Err(_) => continue,
        };
        assert!(mapped.codons_used <= chromosome.len());
        let slice = chromosome.codons()[..mapped.codons_used].to_vec();
        let mut resliced = Chromosome::new(slice, ExhaustionPolicy::Fail);
        let again = mapper.map(&mut resliced, &mut rng).unwrap();
        assert_eq!(mapped.tree, again.tree);
        assert_eq!(mapped.codons_used, again.codons_used);
    }
}

#[test]
fn running_out_of_codons_is_a_sentinel_failure() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 8);
    let mut chromosome = Chromosome::new(vec![0, 0], ExhaustionPolicy::Fail);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        mapper.map(&mut chromosome, &mut rng).unwrap_err(),
        MapError::CodonsExhausted
    );
}

#[test]
fn exceeding_the_depth_budget_is_a_sentinel_failure() {
    let grammar = right_recursive();
    let df = DepthFirstMapper::new(&grammar, 3);
    let bf = BreadthFirstMapper::new(&grammar, 3);
    let mut rng = StdRng::seed_from_u64(0);
    // All-zero codons keep choosing the recursive alternative.
    let codons = vec![0; 10];
    assert_eq!(
        df.map(&mut Chromosome::new(codons.clone(), ExhaustionPolicy::Fail), &mut rng)
            .unwrap_err(),
        MapError::DepthExceeded { max_depth: 3 }
    );
    assert_eq!(
        bf.map(&mut Chromosome::new(codons, ExhaustionPolicy::Fail), &mut rng)
            .unwrap_err(),
        MapError::DepthExceeded { max_depth: 3 }
    );
}

#[test]
fn wrap_policy_reuses_a_short_genome() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 5);
    let mut rng = StdRng::seed_from_u64(0);
    // A single terminating codon maps fine under Wrap.
    let mut wrapped = Chromosome::new(vec![1], ExhaustionPolicy::Wrap);
    let mapped = mapper.map(&mut wrapped, &mut rng).unwrap();
    assert_eq!(mapped.tree.to_source(), "b");

    // The same codons under Fail: the first draw already succeeds, so both
    // policies agree here; an empty genome fails under either.
    let mut empty = Chromosome::new(vec![], ExhaustionPolicy::Wrap);
    assert_eq!(
        mapper.map(&mut empty, &mut rng).unwrap_err(),
        MapError::CodonsExhausted
    );
}

#[test]
fn extend_policy_grows_the_genome_in_place() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 10);
    let mut rng = StdRng::seed_from_u64(21);
    let mut chromosome = Chromosome::new(vec![0], ExhaustionPolicy::Extend { lo: 0, hi: 100 });
    let mapped = mapper.map(&mut chromosome, &mut rng);
    if let Ok(mapped) = mapped {
        // Whatever was drawn, the genome now records every consumed codon.
        assert!(chromosome.len() >= mapped.codons_used);
        assert!(is_sentence(&mapped.tree.to_source()));
    }
}

#[test]
fn mapping_can_start_at_an_offset() {
    let grammar = right_recursive();
    let mapper = DepthFirstMapper::new(&grammar, 5);
    let mut rng = StdRng::seed_from_u64(0);
    let mut chromosome = Chromosome::new(vec![9, 9, 0, 0, 1], ExhaustionPolicy::Fail);
    let mapped = mapper.map_from(&mut chromosome, 2, &mut rng).unwrap();
    assert_eq!(mapped.tree.to_source(), "aab");
    assert_eq!(mapped.codons_used, 3);
}
