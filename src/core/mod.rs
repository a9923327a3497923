pub mod calendar;
pub mod config;
pub mod error;
pub mod timer;
pub mod types;

pub use calendar::{DayClock, DayEvent, TimePeriod};
