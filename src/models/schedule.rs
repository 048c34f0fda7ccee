//! Schedule (solution) model.
//!
//! A schedule assigns every operation of an instance to a machine and a
//! time interval. Solvers produce schedules; the validator inspects them
//! against the instance they were built for. The schedule itself carries
//! no feasibility claim.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// A complete schedule (solution to an instance).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Operation assignments, in the order the solver committed them.
    pub entries: Vec<ScheduleEntry>,
}

/// An operation-machine-time assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Job the operation belongs to.
    pub job_id: usize,
    /// Operation position within the job.
    pub operation_id: usize,
    /// Machine the operation runs on.
    pub machine: usize,
    /// Start of the execution interval.
    pub start_time: f64,
    /// End of the execution interval: start plus the processing duration
    /// on `machine`.
    pub completion_time: f64,
}

impl ScheduleEntry {
    /// Creates a new entry.
    pub fn new(
        job_id: usize,
        operation_id: usize,
        machine: usize,
        start_time: f64,
        completion_time: f64,
    ) -> Self {
        Self {
            job_id,
            operation_id,
            machine,
            start_time,
            completion_time,
        }
    }

    /// Interval length (completion - start).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.completion_time - self.start_time
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Makespan: latest completion time across all entries.
    ///
    /// An empty schedule has makespan `0.0`.
    pub fn makespan(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.completion_time)
            .fold(0.0, f64::max)
    }

    /// Finds the entry for a given (job, operation) pair.
    pub fn entry_for(&self, job_id: usize, operation_id: usize) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.job_id == job_id && e.operation_id == operation_id)
    }

    /// Returns all entries for a given job.
    pub fn entries_for_job(&self, job_id: usize) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.job_id == job_id).collect()
    }

    /// Returns all entries placed on a given machine.
    pub fn entries_for_machine(&self, machine: usize) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.machine == machine).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
