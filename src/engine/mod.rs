pub mod breadth_first;
pub mod chromosome;
pub mod codon_consumer;
pub mod depth_first;
pub mod init;
pub mod mapping;
pub mod progress;

pub use breadth_first::BreadthFirstMapper;
pub use chromosome::{Chromosome, ExhaustionPolicy};
pub use codon_consumer::CodonConsumer;
pub use depth_first::DepthFirstMapper;
pub use init::{
    full_population, full_population_par, grow_population, grow_population_par,
    mapped_population, ramped_population, InitMethod, InitRecord, PopulationSpec,
    RampedIndividual, TreeBuilder,
};
pub use mapping::{GenomeMapper, MapError, MappedTree};
pub use progress::{ChannelInitCallback, ConsoleInitCallback, InitCallback, NoopInitCallback};
