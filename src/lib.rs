//! Flexible job-shop scheduling toolkit.
//!
//! Models the Flexible Shop Job Problem (FSJP): jobs are ordered
//! sequences of operations, and each operation runs on any one machine
//! out of its eligible subset, for a machine-specific duration. The crate
//! generates random instances from seeds, schedules them with dispatching
//! heuristics, validates the resulting schedules, and batches the whole
//! pipeline into reproducible experiments.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instance`, `Job`, `Operation`,
//!   `Schedule`, `ScheduleEntry`
//! - **`generator`**: Seeded, reproducible instance generation
//! - **`solver`**: The `Solver` trait, the built-in registry, and the
//!   SPT greedy heuristic
//! - **`validation`**: Instance integrity and schedule feasibility checks
//! - **`experiment`**: Batch runs (seeds x solvers) with timing,
//!   validation verdicts, and summary statistics
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod experiment;
pub mod generator;
pub mod models;
pub mod solver;
pub mod validation;
