//! Problem instance model.
//!
//! An instance of the Flexible Shop Job Problem: a set of jobs, each an
//! ordered sequence of operations, each operation processable on any one
//! machine out of its eligible subset for a machine-specific duration.
//!
//! Instances are plain values. Once built (by the generator or by
//! deserialization) they are never mutated; solvers and validators only
//! borrow them.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2
//! Brucker (2007), "Scheduling Algorithms", Ch. 1

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Flexible Shop Job Problem instance.
///
/// Jobs are indexed by position: `jobs[j].job_id == j` in a well-formed
/// instance. Machine indices run over `0..num_machines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Seed this instance was generated from (reproducibility key).
    pub seed: u64,
    /// Number of jobs. Equals `jobs.len()` in a well-formed instance.
    pub num_jobs: usize,
    /// Number of machines available to all jobs.
    pub num_machines: usize,
    /// The jobs, in job-id order.
    pub jobs: Vec<Job>,
}

/// A job: an ordered sequence of operations.
///
/// The vector order of `operations` is the mandatory processing order.
/// Operation `k + 1` may not start before operation `k` completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// 0-based job identifier, unique within the instance.
    pub job_id: usize,
    /// Operations in precedence order: `operations[k].operation_id == k`.
    pub operations: Vec<Operation>,
}

/// A single operation of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// 0-based position within the owning job.
    pub operation_id: usize,
    /// Machines that can process this operation. Non-empty, strictly
    /// ascending, every index below the instance's `num_machines`.
    pub eligible_machines: Vec<usize>,
    /// Processing duration per machine. Keyed by exactly the eligible
    /// machines; every duration is strictly positive and finite. The
    /// ordered map keeps serialized instances byte-stable.
    pub processing_times: BTreeMap<usize, f64>,
}

impl Instance {
    /// Creates an empty instance with the given seed and machine count.
    pub fn new(seed: u64, num_machines: usize) -> Self {
        Self {
            seed,
            num_jobs: 0,
            num_machines,
            jobs: Vec::new(),
        }
    }

    /// Adds a job, keeping `num_jobs` in sync with `jobs.len()`.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self.num_jobs = self.jobs.len();
        self
    }

    /// Total number of operations across all jobs.
    pub fn total_operations(&self) -> usize {
        self.jobs.iter().map(|j| j.operations.len()).sum()
    }

    /// Looks up a job by id.
    pub fn job(&self, job_id: usize) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    /// Looks up an operation by (job id, operation id).
    pub fn operation(&self, job_id: usize, operation_id: usize) -> Option<&Operation> {
        self.jobs.get(job_id)?.operations.get(operation_id)
    }
}

impl Job {
    /// Creates a job with no operations.
    pub fn new(job_id: usize) -> Self {
        Self {
            job_id,
            operations: Vec::new(),
        }
    }

    /// Appends an operation to the processing sequence.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Whether this job has any operations.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }
}

impl Operation {
    /// Creates an operation with no eligible machines yet.
    pub fn new(operation_id: usize) -> Self {
        Self {
            operation_id,
            eligible_machines: Vec::new(),
            processing_times: BTreeMap::new(),
        }
    }

    /// Adds an eligible machine with its processing duration.
    ///
    /// Keeps `eligible_machines` sorted; adding a machine twice replaces
    /// its duration.
    pub fn with_machine(mut self, machine: usize, duration: f64) -> Self {
        if let Err(pos) = self.eligible_machines.binary_search(&machine) {
            self.eligible_machines.insert(pos, machine);
        }
        self.processing_times.insert(machine, duration);
        self
    }

    /// Creates an operation with the same duration on every given machine.
    ///
    /// This is the shape the generator emits: one sampled duration shared
    /// by all eligible machines of the operation.
    pub fn uniform(operation_id: usize, machines: &[usize], duration: f64) -> Self {
        let mut op = Self::new(operation_id);
        for &machine in machines {
            op = op.with_machine(machine, duration);
        }
        op
    }

    /// Whether the given machine can process this operation.
    pub fn is_eligible(&self, machine: usize) -> bool {
        self.eligible_machines.binary_search(&machine).is_ok()
    }

    /// Processing duration on the given machine, if eligible.
    pub fn duration_on(&self, machine: usize) -> Option<f64> {
        self.processing_times.get(&machine).copied()
    }

    /// Shortest processing duration across eligible machines.
    pub fn min_duration(&self) -> Option<f64> {
        self.processing_times
            .values()
            .copied()
            .fold(None, |acc, d| match acc {
                None => Some(d),
                Some(best) => Some(best.min(d)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_job_instance() -> Instance {
        Instance::new(7, 3)
            .with_job(
                Job::new(0)
                    .with_operation(Operation::uniform(0, &[0, 1], 10.0))
                    .with_operation(Operation::uniform(1, &[2], 4.5)),
            )
            .with_job(Job::new(1).with_operation(Operation::uniform(0, &[1, 2], 8.0)))
    }

    #[test]
    fn test_instance_builder() {
        let instance = two_job_instance();
        assert_eq!(instance.seed, 7);
        assert_eq!(instance.num_jobs, 2);
        assert_eq!(instance.num_machines, 3);
        assert_eq!(instance.jobs.len(), 2);
        assert_eq!(instance.total_operations(), 3);
    }

    #[test]
    fn test_operation_lookup() {
        let instance = two_job_instance();
        let op = instance.operation(0, 1).unwrap();
        assert_eq!(op.operation_id, 1);
        assert_eq!(op.eligible_machines, vec![2]);
        assert!(instance.operation(0, 2).is_none());
        assert!(instance.operation(9, 0).is_none());
        assert!(instance.job(1).is_some());
        assert!(instance.job(2).is_none());
    }

    #[test]
    fn test_with_machine_keeps_sorted_order() {
        let op = Operation::new(0)
            .with_machine(4, 3.0)
            .with_machine(1, 2.0)
            .with_machine(2, 5.0);
        assert_eq!(op.eligible_machines, vec![1, 2, 4]);
        assert_eq!(op.duration_on(2), Some(5.0));
    }

    #[test]
    fn test_with_machine_replaces_duration() {
        let op = Operation::new(0).with_machine(1, 2.0).with_machine(1, 9.0);
        assert_eq!(op.eligible_machines, vec![1]);
        assert_eq!(op.duration_on(1), Some(9.0));
    }

    #[test]
    fn test_uniform_shares_one_duration() {
        let op = Operation::uniform(3, &[2, 0, 5], 12.5);
        assert_eq!(op.operation_id, 3);
        assert_eq!(op.eligible_machines, vec![0, 2, 5]);
        for &m in &op.eligible_machines {
            assert_eq!(op.duration_on(m), Some(12.5));
        }
        assert_eq!(op.duration_on(1), None);
    }

    #[test]
    fn test_eligibility_and_min_duration() {
        let op = Operation::new(0).with_machine(0, 7.0).with_machine(2, 3.0);
        assert!(op.is_eligible(0));
        assert!(!op.is_eligible(1));
        assert_eq!(op.min_duration(), Some(3.0));
        assert_eq!(Operation::new(1).min_duration(), None);
    }

    #[test]
    fn test_empty_job() {
        let job = Job::new(0);
        assert_eq!(job.operation_count(), 0);
        assert!(!job.has_operations());
    }

    #[test]
    fn test_instance_serde_round_trip() {
        let instance = two_job_instance();
        let json = serde_json::to_string(&instance).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instance);
        assert_eq!(back.jobs[0].operations[1].duration_on(2), Some(4.5));
        // Ordered processing times keep the serialized form canonical.
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }
}
