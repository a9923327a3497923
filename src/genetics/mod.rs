//! Attribute genetics: birth rolls and parent-to-child inheritance

pub mod distribution;
pub mod inheritance;
pub mod phenotype;

pub use distribution::TriangularDistribution;
pub use inheritance::inherit;
pub use phenotype::Phenotype;
