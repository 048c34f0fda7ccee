//! Batch experiment harness.
//!
//! Runs a set of solvers against a sequence of seeded instances, timing
//! each solve and validating each schedule. Everything stays in memory:
//! the report is plain data, and persisting or charting it is the
//! caller's concern.
//!
//! Seeds are consecutive (`seed_base + i`), so an experiment is
//! reproducible from its configuration alone. Wall-clock times are the
//! only fields that vary between identical runs.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::generator::{ConfigError, GeneratorConfig, InstanceGenerator};
use crate::solver::Solver;
use crate::validation::Verdict;

/// Experiment parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Number of consecutive seeds to run.
    pub num_seeds: usize,
    /// First seed; run `i` uses `seed_base + i`, wrapping at `u64::MAX`.
    pub seed_base: u64,
    /// Instance generation parameters shared by every seed.
    pub generator: GeneratorConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_seeds: 10,
            seed_base: 42,
            generator: GeneratorConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Sets the number of seeds.
    pub fn with_num_seeds(mut self, num_seeds: usize) -> Self {
        self.num_seeds = num_seeds;
        self
    }

    /// Sets the first seed.
    pub fn with_seed_base(mut self, seed_base: u64) -> Self {
        self.seed_base = seed_base;
        self
    }

    /// Sets the instance generation parameters.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }
}

/// One (seed, solver) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seed the instance was generated from.
    pub seed: u64,
    /// Registry name of the solver.
    pub solver: String,
    /// What happened.
    pub outcome: RunOutcome,
}

/// Outcome of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The solver returned a schedule.
    Solved {
        /// Makespan of the returned schedule.
        makespan: f64,
        /// Wall-clock solve time in seconds.
        execution_time_s: f64,
        /// Validation outcome for the returned schedule.
        verdict: Verdict,
    },
    /// The solver returned an error.
    Failed {
        /// The error message.
        error: String,
    },
}

/// All records of one experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Records in run order: seeds outer, solvers inner.
    pub records: Vec<RunRecord>,
}

impl ExperimentReport {
    /// Returns all records for one solver, in seed order.
    pub fn records_for(&self, solver: &str) -> Vec<&RunRecord> {
        self.records.iter().filter(|r| r.solver == solver).collect()
    }

    /// Summarizes one solver's runs. `None` if the solver has no records.
    pub fn summary(&self, solver: &str) -> Option<SolverSummary> {
        let records = self.records_for(solver);
        if records.is_empty() {
            return None;
        }
        Some(SolverSummary::from_records(solver, &records))
    }

    /// Summaries for every solver present, in first-seen order.
    pub fn summaries(&self) -> Vec<SolverSummary> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.solver.as_str()) {
                names.push(&record.solver);
            }
        }
        names
            .into_iter()
            .filter_map(|name| self.summary(name))
            .collect()
    }
}

/// Aggregate statistics for one solver across an experiment.
///
/// Makespan statistics cover solved runs only; a solver with no solved
/// runs reports zeros. The standard deviations are population values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSummary {
    /// Registry name of the solver.
    pub solver: String,
    /// Total runs.
    pub runs: usize,
    /// Runs that produced a schedule.
    pub solved: usize,
    /// Whether every solved run passed validation.
    pub all_valid: bool,
    /// Mean makespan.
    pub avg_makespan: f64,
    /// Best (lowest) makespan.
    pub min_makespan: f64,
    /// Worst (highest) makespan.
    pub max_makespan: f64,
    /// Makespan standard deviation.
    pub makespan_std: f64,
    /// Mean solve time in seconds.
    pub avg_time_s: f64,
    /// Solve time standard deviation in seconds.
    pub time_std_s: f64,
}

impl SolverSummary {
    /// Computes a summary from one solver's records.
    pub fn from_records(solver: &str, records: &[&RunRecord]) -> Self {
        let mut makespans = Vec::with_capacity(records.len());
        let mut times = Vec::with_capacity(records.len());
        let mut all_valid = true;

        for record in records {
            if let RunOutcome::Solved {
                makespan,
                execution_time_s,
                verdict,
            } = &record.outcome
            {
                makespans.push(*makespan);
                times.push(*execution_time_s);
                all_valid &= verdict.is_valid;
            }
        }

        let (avg_makespan, min_makespan, max_makespan, makespan_std) = distribution(&makespans);
        let (avg_time_s, _, _, time_std_s) = distribution(&times);

        Self {
            solver: solver.to_string(),
            runs: records.len(),
            solved: makespans.len(),
            all_valid,
            avg_makespan,
            min_makespan,
            max_makespan,
            makespan_std,
            avg_time_s,
            time_std_s,
        }
    }
}

/// (mean, min, max, population standard deviation); zeros when empty.
fn distribution(values: &[f64]) -> (f64, f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, min, max, variance.sqrt())
}

/// Runs every solver against every seeded instance.
///
/// Instances are generated once per seed and shared across solvers. A
/// solver error becomes a [`RunOutcome::Failed`] record; the experiment
/// itself fails only on a bad configuration.
pub fn run_experiment(
    config: &ExperimentConfig,
    solvers: &[Box<dyn Solver>],
) -> Result<ExperimentReport, ConfigError> {
    if config.num_seeds == 0 {
        return Err(ConfigError::NoSeeds);
    }
    let generator = InstanceGenerator::new(config.generator.clone())?;

    info!(
        num_seeds = config.num_seeds,
        seed_base = config.seed_base,
        solvers = solvers.len(),
        "starting experiment"
    );

    let mut records = Vec::with_capacity(config.num_seeds * solvers.len());
    for offset in 0..config.num_seeds {
        let seed = config.seed_base.wrapping_add(offset as u64);
        let instance = generator.generate(seed);
        debug!(
            seed,
            num_jobs = instance.num_jobs,
            num_machines = instance.num_machines,
            total_operations = instance.total_operations(),
            "generated instance"
        );

        for solver in solvers {
            let started = Instant::now();
            let outcome = match solver.solve(&instance) {
                Ok(schedule) => {
                    let execution_time_s = started.elapsed().as_secs_f64();
                    let verdict = Verdict::of(&instance, &schedule);
                    if !verdict.is_valid {
                        warn!(
                            seed,
                            solver = solver.name(),
                            reason = verdict.reason.as_deref().unwrap_or(""),
                            "schedule failed validation"
                        );
                    }
                    RunOutcome::Solved {
                        makespan: schedule.makespan(),
                        execution_time_s,
                        verdict,
                    }
                }
                Err(error) => {
                    warn!(seed, solver = solver.name(), error = %error, "solve failed");
                    RunOutcome::Failed {
                        error: error.to_string(),
                    }
                }
            };
            records.push(RunRecord {
                seed,
                solver: solver.name().to_string(),
                outcome,
            });
        }
    }

    info!(records = records.len(), "experiment finished");
    Ok(ExperimentReport { records })
}
