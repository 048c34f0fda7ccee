//! Shortest Processing Time greedy dispatch.
//!
//! # Algorithm
//!
//! 1. Collect one candidate per unfinished job: its next operation paired
//!    with that operation's best (machine, start) choice.
//! 2. Commit the candidate with the shortest processing time. Exact ties
//!    go to the earliest feasible start, then to scan order (lowest job
//!    id, lowest machine index).
//! 3. Advance the job cursor and the machine availability; repeat until
//!    every operation is committed.
//!
//! Job precedence is structural: a job's operation `k + 1` never becomes
//! a candidate before operation `k` is committed.
//!
//! # Complexity
//! O(n^2 * f) for n total operations with average flexibility f: each
//! commit rescans every unfinished job.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use super::{InfeasibleInstance, Solver};
use crate::models::{Instance, Schedule, ScheduleEntry};

/// Shortest Processing Time greedy solver.
///
/// Deterministic: candidate scan order and strictly-better comparisons
/// fix the result, so the same instance always yields the same schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct SptSolver;

impl Solver for SptSolver {
    fn name(&self) -> &'static str {
        "shortest_processing_time"
    }

    fn solve(&self, instance: &Instance) -> Result<Schedule, InfeasibleInstance> {
        let num_jobs = instance.jobs.len();
        let mut machine_available = vec![0.0_f64; instance.num_machines];
        let mut job_ready = vec![0.0_f64; num_jobs];
        let mut job_cursor = vec![0_usize; num_jobs];
        let mut schedule = Schedule::new();

        while let Some(c) = best_candidate(instance, &job_cursor, &job_ready, &machine_available)? {
            let completion = c.start + c.duration;
            schedule.push(ScheduleEntry::new(
                c.job_id,
                c.operation_id,
                c.machine,
                c.start,
                completion,
            ));
            machine_available[c.machine] = completion;
            job_ready[c.job_pos] = completion;
            job_cursor[c.job_pos] += 1;
        }

        Ok(schedule)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time greedy dispatch"
    }
}

/// A schedulable (operation, machine) pair with its feasible start.
///
/// `job_pos` is the job's position in `instance.jobs`, which keys the
/// solver's state vectors; `job_id` is what the schedule entry records.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    job_pos: usize,
    job_id: usize,
    operation_id: usize,
    machine: usize,
    start: f64,
    duration: f64,
}

impl Candidate {
    /// Strictly-better comparison. Ties on both keys keep the incumbent,
    /// which was seen first in (job id, machine index) scan order.
    fn beats(&self, other: &Candidate) -> bool {
        self.duration < other.duration
            || (self.duration == other.duration && self.start < other.start)
    }
}

/// Selects the next candidate to commit, or `None` when all jobs are done.
///
/// An unfinished job whose next operation has no usable machine makes the
/// whole instance unsolvable, so that is an error, not a skip: no later
/// commit could ever free the operation.
fn best_candidate(
    instance: &Instance,
    job_cursor: &[usize],
    job_ready: &[f64],
    machine_available: &[f64],
) -> Result<Option<Candidate>, InfeasibleInstance> {
    let mut best: Option<Candidate> = None;

    for (job_pos, job) in instance.jobs.iter().enumerate() {
        let Some(operation) = job.operations.get(job_cursor[job_pos]) else {
            continue;
        };
        let ready = job_ready[job_pos];

        let mut op_best: Option<Candidate> = None;
        for &machine in &operation.eligible_machines {
            let Some(&available) = machine_available.get(machine) else {
                continue;
            };
            let Some(duration) = operation.duration_on(machine) else {
                continue;
            };
            let candidate = Candidate {
                job_pos,
                job_id: job.job_id,
                operation_id: operation.operation_id,
                machine,
                start: available.max(ready),
                duration,
            };
            if op_best.as_ref().map_or(true, |b| candidate.beats(b)) {
                op_best = Some(candidate);
            }
        }

        let Some(op_candidate) = op_best else {
            return Err(InfeasibleInstance {
                job_id: job.job_id,
                operation_id: operation.operation_id,
            });
        };
        if best.as_ref().map_or(true, |b| op_candidate.beats(b)) {
            best = Some(op_candidate);
        }
    }

    Ok(best)
}
