//! Instance and schedule validation.
//!
//! Two layers:
//! - [`validate_instance`] checks the structural integrity of a (possibly
//!   deserialized) instance and collects every defect it finds.
//! - [`validate_schedule`] decides whether a schedule is feasible for an
//!   instance. Checks run in a fixed order and stop at the first
//!   violation, so a given bad schedule always reports the same reason.
//!
//! The schedule validator treats malformed input as a normal negative
//! verdict, never as a panic: every schedule gets a definite answer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::models::{Instance, Schedule};

/// Absolute tolerance when comparing an entry's interval length against
/// the instance's processing time.
const DURATION_TOLERANCE: f64 = 1e-6;

/// Instance validation result.
pub type InstanceValidation = Result<(), Vec<InstanceDefect>>;

/// A structural defect in an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDefect {
    /// Defect category.
    pub kind: DefectKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of instance defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectKind {
    /// `num_jobs` disagrees with the number of jobs present.
    JobCountMismatch,
    /// A job or operation id disagrees with its position.
    IdMismatch,
    /// An operation has an empty eligible machine list.
    NoEligibleMachines,
    /// An operation references a machine index outside the instance.
    MachineOutOfRange,
    /// An eligible machine list is not strictly ascending.
    UnsortedMachines,
    /// Processing time keys differ from the eligible machine set.
    DurationKeyMismatch,
    /// A processing time is not a strictly positive finite number.
    BadDuration,
}

impl InstanceDefect {
    fn new(kind: DefectKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks the structural integrity of an instance.
///
/// Checks:
/// 1. `num_jobs` equals the number of jobs
/// 2. Job and operation ids equal their positions
/// 3. Every operation has at least one eligible machine
/// 4. Eligible machine lists are strictly ascending and in range
/// 5. Processing time keys are exactly the eligible machines
/// 6. Every processing time is strictly positive and finite
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(defects)` with every issue found.
pub fn validate_instance(instance: &Instance) -> InstanceValidation {
    let mut defects = Vec::new();

    if instance.num_jobs != instance.jobs.len() {
        defects.push(InstanceDefect::new(
            DefectKind::JobCountMismatch,
            format!(
                "num_jobs is {} but the instance holds {} jobs",
                instance.num_jobs,
                instance.jobs.len()
            ),
        ));
    }

    for (position, job) in instance.jobs.iter().enumerate() {
        if job.job_id != position {
            defects.push(InstanceDefect::new(
                DefectKind::IdMismatch,
                format!("Job at position {} has job_id {}", position, job.job_id),
            ));
        }

        for (op_position, op) in job.operations.iter().enumerate() {
            if op.operation_id != op_position {
                defects.push(InstanceDefect::new(
                    DefectKind::IdMismatch,
                    format!(
                        "Operation at position {} of job {} has operation_id {}",
                        op_position, job.job_id, op.operation_id
                    ),
                ));
            }

            if op.eligible_machines.is_empty() {
                defects.push(InstanceDefect::new(
                    DefectKind::NoEligibleMachines,
                    format!(
                        "Operation {} of job {} has no eligible machines",
                        op.operation_id, job.job_id
                    ),
                ));
            }

            if op.eligible_machines.windows(2).any(|w| w[0] >= w[1]) {
                defects.push(InstanceDefect::new(
                    DefectKind::UnsortedMachines,
                    format!(
                        "Eligible machines of operation {} of job {} are not strictly ascending",
                        op.operation_id, job.job_id
                    ),
                ));
            }

            for &machine in &op.eligible_machines {
                if machine >= instance.num_machines {
                    defects.push(InstanceDefect::new(
                        DefectKind::MachineOutOfRange,
                        format!(
                            "Operation {} of job {} references machine {} outside 0..{}",
                            op.operation_id, job.job_id, machine, instance.num_machines
                        ),
                    ));
                }
                match op.processing_times.get(&machine) {
                    None => defects.push(InstanceDefect::new(
                        DefectKind::DurationKeyMismatch,
                        format!(
                            "Operation {} of job {} has no processing time for machine {}",
                            op.operation_id, job.job_id, machine
                        ),
                    )),
                    Some(&duration) => {
                        if !(duration > 0.0) || !duration.is_finite() {
                            defects.push(InstanceDefect::new(
                                DefectKind::BadDuration,
                                format!(
                                    "Operation {} of job {} has duration {} on machine {}",
                                    op.operation_id, job.job_id, duration, machine
                                ),
                            ));
                        }
                    }
                }
            }

            if op.processing_times.len() != op.eligible_machines.len() {
                defects.push(InstanceDefect::new(
                    DefectKind::DurationKeyMismatch,
                    format!(
                        "Operation {} of job {} has processing times outside its eligible machines",
                        op.operation_id, job.job_id
                    ),
                ));
            }
        }
    }

    if defects.is_empty() {
        Ok(())
    } else {
        Err(defects)
    }
}

/// A feasibility violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleViolation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of schedule violations, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// An operation of the instance has no entry.
    MissingOperation,
    /// The same (job, operation) pair is scheduled more than once.
    DuplicateOperations,
    /// An entry references an operation the instance does not have.
    UnknownOperation,
    /// An operation starts before its predecessor in the job completes.
    PrecedenceOrder,
    /// Two entries on one machine overlap in time.
    MachineOverlap,
    /// An entry uses a machine the operation is not eligible for.
    IneligibleMachine,
    /// An entry's interval length disagrees with the processing time.
    DurationMismatch,
}

impl ScheduleViolation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScheduleViolation {}

/// Checks whether a schedule is feasible for an instance.
///
/// Checks, in order, stopping at the first violation:
/// 1. Completeness: every operation scheduled exactly once, no unknown
///    entries
/// 2. Precedence: operations of a job run in operation-id order
/// 3. Machine exclusivity: no two entries on a machine overlap
/// 4. Assignments: machines are eligible and interval lengths match the
///    instance's processing times (tolerance 1e-6)
///
/// Intervals are half-open, so an operation may start exactly when
/// another completes.
pub fn validate_schedule(
    instance: &Instance,
    schedule: &Schedule,
) -> Result<(), ScheduleViolation> {
    check_completeness(instance, schedule)?;
    check_precedence(instance, schedule)?;
    check_machine_exclusivity(instance, schedule)?;
    check_assignments(instance, schedule)?;
    Ok(())
}

fn check_completeness(instance: &Instance, schedule: &Schedule) -> Result<(), ScheduleViolation> {
    let mut scheduled: HashSet<(usize, usize)> = HashSet::with_capacity(schedule.len());
    for entry in &schedule.entries {
        scheduled.insert((entry.job_id, entry.operation_id));
    }

    for job in &instance.jobs {
        for op in &job.operations {
            if !scheduled.contains(&(job.job_id, op.operation_id)) {
                return Err(ScheduleViolation::new(
                    ViolationKind::MissingOperation,
                    format!(
                        "Operation {} of job {} is not scheduled",
                        op.operation_id, job.job_id
                    ),
                ));
            }
        }
    }

    if scheduled.len() != schedule.len() {
        return Err(ScheduleViolation::new(
            ViolationKind::DuplicateOperations,
            "Schedule contains duplicate operations",
        ));
    }

    for entry in &schedule.entries {
        if instance.operation(entry.job_id, entry.operation_id).is_none() {
            return Err(ScheduleViolation::new(
                ViolationKind::UnknownOperation,
                format!(
                    "Schedule contains an entry for unknown operation {} of job {}",
                    entry.operation_id, entry.job_id
                ),
            ));
        }
    }

    Ok(())
}

fn check_precedence(instance: &Instance, schedule: &Schedule) -> Result<(), ScheduleViolation> {
    for job in &instance.jobs {
        let mut entries = schedule.entries_for_job(job.job_id);
        entries.sort_by_key(|e| e.operation_id);
        for pair in entries.windows(2) {
            if pair[1].start_time < pair[0].completion_time {
                return Err(ScheduleViolation::new(
                    ViolationKind::PrecedenceOrder,
                    format!(
                        "Operation {} of job {} starts before previous operation completes",
                        pair[1].operation_id, job.job_id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_machine_exclusivity(
    instance: &Instance,
    schedule: &Schedule,
) -> Result<(), ScheduleViolation> {
    for machine in 0..instance.num_machines {
        let mut entries = schedule.entries_for_machine(machine);
        entries.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(Ordering::Equal)
        });
        for pair in entries.windows(2) {
            if pair[1].start_time < pair[0].completion_time {
                return Err(ScheduleViolation::new(
                    ViolationKind::MachineOverlap,
                    format!("Operations on machine {machine} overlap in time"),
                ));
            }
        }
    }
    Ok(())
}

fn check_assignments(instance: &Instance, schedule: &Schedule) -> Result<(), ScheduleViolation> {
    for entry in &schedule.entries {
        // Completeness already established the pair exists.
        let Some(operation) = instance.operation(entry.job_id, entry.operation_id) else {
            continue;
        };

        if !operation.is_eligible(entry.machine) {
            return Err(ScheduleViolation::new(
                ViolationKind::IneligibleMachine,
                format!(
                    "Operation {} of job {} is scheduled on ineligible machine {}",
                    entry.operation_id, entry.job_id, entry.machine
                ),
            ));
        }

        let Some(expected) = operation.duration_on(entry.machine) else {
            return Err(ScheduleViolation::new(
                ViolationKind::DurationMismatch,
                format!(
                    "Operation {} of job {} has no processing time on machine {}",
                    entry.operation_id, entry.job_id, entry.machine
                ),
            ));
        };
        // Negated pass-form so NaN times fail instead of slipping through.
        if !((entry.duration() - expected).abs() <= DURATION_TOLERANCE) {
            return Err(ScheduleViolation::new(
                ViolationKind::DurationMismatch,
                format!(
                    "Operation {} of job {} runs for {} on machine {}, expected {}",
                    entry.operation_id,
                    entry.job_id,
                    entry.duration(),
                    entry.machine,
                    expected
                ),
            ));
        }
    }
    Ok(())
}

/// Record-friendly validation outcome: a flag plus an optional reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the schedule passed every check.
    pub is_valid: bool,
    /// Message of the first violation, when invalid.
    pub reason: Option<String>,
}

impl Verdict {
    /// Validates a schedule and folds the result into a verdict.
    pub fn of(instance: &Instance, schedule: &Schedule) -> Self {
        match validate_schedule(instance, schedule) {
            Ok(()) => Self {
                is_valid: true,
                reason: None,
            },
            Err(violation) => Self {
                is_valid: false,
                reason: Some(violation.message),
            },
        }
    }
}
