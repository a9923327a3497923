pub mod agent;
pub mod attributes;
pub mod species;
pub mod vitals;

pub use agent::{Agent, Behavior};
pub use attributes::{AttributeKind, Attributes};
pub use species::{PolicyKind, SpeciesProfile};
pub use vitals::{BusyState, Tier, Vitals};
