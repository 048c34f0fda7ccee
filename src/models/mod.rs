//! Scheduling domain models.
//!
//! Core data types for the Flexible Shop Job Problem: the problem side
//! ([`Instance`], [`Job`], [`Operation`]) and the solution side
//! ([`Schedule`], [`ScheduleEntry`]).
//!
//! Times are unitless `f64` values on a common axis starting at `t = 0`.
//! The consumer decides what one time unit means (minutes, hours).

mod instance;
mod schedule;

pub use instance::{Instance, Job, Operation};
pub use schedule::{Schedule, ScheduleEntry};
