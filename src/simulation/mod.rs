//! Per-tick decision pipeline: sensing, policies, actions, day cycle

pub mod action_select;
pub mod movement;
pub mod perception;
pub mod population;
pub mod runner;
pub mod shelter;
pub mod tick;
pub mod utility;

pub use action_select::{select_priority_behavior, PriorityContext};
pub use perception::{SensoryFrame, SensorySystem};
pub use runner::{DayReport, Ecosystem};
pub use shelter::{Admission, Entry, Shelter};
pub use tick::{run_simulation_tick, DeathCause, SimulationEvent};
pub use utility::{ActionCosts, UtilityAction, UtilityInputs};
