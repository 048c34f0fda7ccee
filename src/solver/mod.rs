//! Scheduling solvers.
//!
//! Defines the [`Solver`] interface shared by all algorithms and the
//! static registry of built-in solvers. The registry is an explicit list:
//! adding an algorithm means implementing [`Solver`] and appending it to
//! [`registry`], so the available set is known at compile time and
//! identical on every host.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod spt;

pub use spt::SptSolver;

use crate::models::{Instance, Schedule};
use std::fmt::{self, Debug};

/// A scheduling algorithm for FSJP instances.
///
/// Implementations must be deterministic in the instance alone, and must
/// return atomically: a schedule covering every operation, or an error
/// and no schedule at all.
pub trait Solver: Send + Sync + Debug {
    /// Stable identifier (e.g. "shortest_processing_time"), used for
    /// registry lookup and in result records.
    fn name(&self) -> &'static str;

    /// Computes a schedule for the instance.
    fn solve(&self, instance: &Instance) -> Result<Schedule, InfeasibleInstance>;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// An operation that no machine can process.
///
/// The instance violates its own eligibility invariant; solving fails
/// with no partial schedule rather than silently skipping the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleInstance {
    /// Job owning the unplaceable operation.
    pub job_id: usize,
    /// The unplaceable operation.
    pub operation_id: usize,
}

impl fmt::Display for InfeasibleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation {} of job {} has no eligible machine",
            self.operation_id, self.job_id
        )
    }
}

impl std::error::Error for InfeasibleInstance {}

/// All built-in solvers, in registration order.
pub fn registry() -> Vec<Box<dyn Solver>> {
    vec![Box::new(SptSolver)]
}

/// Looks up a built-in solver by its registry name.
pub fn by_name(name: &str) -> Option<Box<dyn Solver>> {
    registry().into_iter().find(|s| s.name() == name)
}
