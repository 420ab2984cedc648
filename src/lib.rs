pub mod error;
pub mod utils;
pub mod graph;
pub mod lattice;
pub mod union_find;
pub mod model;
pub mod cluster;
pub mod simulation;
pub mod statistics;
pub mod correlator;
pub mod codec;
pub mod run;

pub use error::{Error, Result};
pub use graph::WeightedGraph;
pub use model::{FieldModel, Ising, Phi4};
pub use simulation::Simulation;
pub use statistics::Accumulator;
pub use utils::rng::RandomStream;
