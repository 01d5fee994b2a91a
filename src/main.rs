use anyhow::{bail, Context, Result};

use gramevo::config::ConfigManager;
use gramevo::engine::{
    mapped_population, ramped_population, BreadthFirstMapper, Chromosome, ConsoleInitCallback,
    DepthFirstMapper, PopulationSpec,
};
use gramevo::grammar::bnf;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: gramevo <grammar.bnf> [config.toml]");
    }

    let manager = ConfigManager::new();
    if let Some(path) = args.get(2) {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading config from {}", path))?;
    }
    let config = manager.get();

    let text = std::fs::read_to_string(&args[1])
        .with_context(|| format!("reading grammar from {}", args[1]))?;
    let grammar = bnf::parse(&text)?;
    println!(
        "Grammar: {} rules, minimum depth {}",
        grammar.rules().len(),
        grammar.min_depth()
    );

    let mut rng = config.synthesis.rng();
    let spec = PopulationSpec {
        size: config.synthesis.population_size,
        allow_duplicates: config.synthesis.allow_duplicates,
        duplicate_retry_limit: config.synthesis.duplicate_retry_limit,
    };

    let population = ramped_population(
        &grammar,
        config.synthesis.ramp_depth_start..=config.synthesis.ramp_depth_end,
        &spec,
        &mut rng,
        &mut ConsoleInitCallback,
    )?;
    println!("Ramped population of {} individuals:", population.len());
    for (i, individual) in population.iter().take(10).enumerate() {
        println!(
            "  [{}] {:?} depth {} (actual {}): {}",
            i,
            individual.record.method,
            individual.record.depth,
            individual.tree.depth(),
            individual.tree.to_source()
        );
    }

    // Same codon sequence through both mappers: same constraints, different
    // trees.
    let chromosome = Chromosome::random(
        config.genome.genome_length,
        config.genome.codon_range(),
        config.genome.policy(),
        &mut rng,
    );
    let df = DepthFirstMapper::new(&grammar, config.synthesis.max_depth);
    let bf = BreadthFirstMapper::new(&grammar, config.synthesis.max_depth);
    match df.map(&mut chromosome.clone(), &mut rng) {
        Ok(mapped) => println!(
            "Depth-first map ({} codons): {}",
            mapped.codons_used,
            mapped.tree.to_source()
        ),
        Err(cause) => println!("Depth-first map failed: {}", cause),
    }
    match bf.map(&mut chromosome.clone(), &mut rng) {
        Ok(mapped) => println!(
            "Breadth-first map ({} codons): {}",
            mapped.codons_used,
            mapped.tree.to_source()
        ),
        Err(cause) => println!("Breadth-first map failed: {}", cause),
    }

    let genome_population = mapped_population(
        &df,
        config.genome.genome_length,
        config.genome.codon_range(),
        config.genome.policy(),
        &PopulationSpec {
            size: spec.size.min(20),
            ..spec
        },
        &mut rng,
    )?;
    println!(
        "Genome-driven population: {} valid individuals",
        genome_population.len()
    );

    Ok(())
}
