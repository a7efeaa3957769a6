//! # Worker — Task Descriptor and Executor
//!
//! One task in, one report out. The executor dispatches on the task type:
//!
//! - **range mode** (`main_odds`, `large_numbers`): walk the odd integers of
//!   an inclusive range, BPSW-test each one;
//! - **chernick mode**: walk k over the range, build the Chernick product,
//!   BPSW-test it;
//! - **seed mode** (`pomerance_lite`, `pomerance_modular`,
//!   `lambda_plus_one`): walk the seed range, run the family generator,
//!   BPSW-test each product; a seed whose generator gives up becomes a
//!   `generation_failed` record.
//!
//! `checked` counts what the loop actually evaluates and its unit is
//! family-specific by design: odd integers in range mode, k values in
//! chernick mode, seeds in seed mode. Report consumers must not compare the
//! counter across families.
//!
//! Configuration problems (missing range, contradictory CRT prime lists,
//! seed bounds that do not fit 64 bits) fail the task before any candidate
//! is touched; nothing partial is emitted.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rug::Integer;
use serde::Serialize;
use tracing::{debug, info};

use crate::report::{Candidate, ErrorRecord, GenerationError, Hit, HitMeta, TaskReport};
use crate::{chernick, lambda_plus_one, pomerance, PrimalityBackend};

/// The six task families a worker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TaskType {
    MainOdds,
    LargeNumbers,
    Chernick,
    PomeranceLite,
    PomeranceModular,
    LambdaPlusOne,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::MainOdds => "main_odds",
            TaskType::LargeNumbers => "large_numbers",
            TaskType::Chernick => "chernick",
            TaskType::PomeranceLite => "pomerance_lite",
            TaskType::PomeranceModular => "pomerance_modular",
            TaskType::LambdaPlusOne => "lambda_plus_one",
        }
    }
}

/// Immutable description of one unit of work, as handed down by the
/// dispatcher. Field semantics follow the CLI flags one-to-one.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub task_type: TaskType,
    pub start: Integer,
    pub end: Integer,
    pub seed_start: u64,
    pub seed_end: u64,
    pub max_candidates: u64,
    pub target_digits: u32,
    pub prime_digits: u32,
    pub max_steps: u64,
    pub require_prime_factors: bool,
    pub require_prime: bool,
    pub mod5_residue: u32,
    pub m_primes: Vec<u32>,
    pub n_primes: Vec<u32>,
    pub lambda_factors: Vec<(u32, u32)>,
}

impl TaskSpec {
    /// A spec with every parameter at its CLI default.
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            start: Integer::new(),
            end: Integer::new(),
            seed_start: 0,
            seed_end: 0,
            max_candidates: 0,
            target_digits: 22,
            prime_digits: 7,
            max_steps: 5000,
            require_prime_factors: false,
            require_prime: false,
            mod5_residue: 2,
            m_primes: pomerance::DEFAULT_M_PRIMES.to_vec(),
            n_primes: pomerance::DEFAULT_N_PRIMES.to_vec(),
            lambda_factors: lambda_plus_one::DEFAULT_FACTOR_BASES.to_vec(),
        }
    }

    /// Seed bounds for generator tasks, falling back to `start`/`end` when
    /// the dedicated flags are unset (zero).
    fn resolved_seed_range(&self) -> Result<(u64, u64)> {
        let seed_start = if self.seed_start != 0 {
            self.seed_start
        } else {
            self.start
                .to_u64()
                .context("--start does not fit a 64-bit seed")?
        };
        let seed_end = if self.seed_end != 0 {
            self.seed_end
        } else {
            self.end
                .to_u64()
                .context("--end does not fit a 64-bit seed")?
        };
        if seed_start == 0 && seed_end == 0 {
            bail!("generator tasks need --seed-start/--seed-end (or --start/--end)");
        }
        Ok((seed_start, seed_end))
    }
}

/// Execute one task to completion and assemble its report.
pub fn run_task(spec: &TaskSpec, backend: &dyn PrimalityBackend) -> Result<TaskReport> {
    let started_at = Utc::now();
    info!(task_type = spec.task_type.as_str(), "task started");

    let mut hits: Vec<Hit> = Vec::new();
    let mut errors: Vec<ErrorRecord> = Vec::new();
    let mut checked: u64 = 0;

    match spec.task_type {
        TaskType::MainOdds | TaskType::LargeNumbers => {
            if spec.start == 0u32 && spec.end == 0u32 {
                bail!("range tasks need --start/--end");
            }
            let meta = if spec.task_type == TaskType::MainOdds {
                HitMeta::MainOdds
            } else {
                HitMeta::LargeNumbers
            };
            let mut n = spec.start.clone();
            if n.is_even() {
                n += 1u32;
            }
            while n <= spec.end {
                if spec.max_candidates != 0 && checked >= spec.max_candidates {
                    break;
                }
                checked += 1;
                if backend.is_bpsw(&n) {
                    info!(n = %n, "BPSW probable prime");
                    hits.push(Hit::new(&n, meta.clone()));
                }
                n += 2u32;
            }
        }

        TaskType::Chernick => {
            if spec.start == 0u32 && spec.end == 0u32 {
                bail!("chernick tasks need --start/--end");
            }
            let mut k = spec.start.clone();
            while k <= spec.end {
                checked += 1;
                if let Some(candidate) = chernick::generate(&k, spec.require_prime_factors) {
                    if backend.is_bpsw(&candidate.n) {
                        info!(n = %candidate.n, k = %k, "BPSW probable prime");
                        hits.push(Hit::new(&candidate.n, candidate.meta));
                    }
                } else {
                    debug!(k = %k, "factors failed the deep filter");
                }
                k += 1u32;
            }
        }

        TaskType::PomeranceLite => {
            validate_product_params(spec, true)?;
            let (seed_start, seed_end) = spec.resolved_seed_range()?;
            run_seed_loop(seed_start, seed_end, backend, &mut checked, &mut hits, &mut errors, |seed| {
                pomerance::generate_lite(seed, spec.target_digits, spec.prime_digits, spec.max_steps)
            });
        }

        TaskType::PomeranceModular => {
            validate_product_params(spec, true)?;
            let (seed_start, seed_end) = spec.resolved_seed_range()?;
            let constraint =
                pomerance::build_mod_constraint(&spec.m_primes, &spec.n_primes, spec.mod5_residue)
                    .context("combining the modular congruence constraints")?;
            info!(modulus = %constraint.modulus, residue = %constraint.residue, "constraint composed");
            run_seed_loop(seed_start, seed_end, backend, &mut checked, &mut hits, &mut errors, |seed| {
                pomerance::generate_modular(
                    seed,
                    spec.target_digits,
                    spec.prime_digits,
                    spec.max_steps,
                    &constraint,
                    spec.mod5_residue,
                    &spec.m_primes,
                    &spec.n_primes,
                )
            });
        }

        TaskType::LambdaPlusOne => {
            validate_product_params(spec, false)?;
            let (seed_start, seed_end) = spec.resolved_seed_range()?;
            run_seed_loop(seed_start, seed_end, backend, &mut checked, &mut hits, &mut errors, |seed| {
                lambda_plus_one::generate(
                    seed,
                    spec.target_digits,
                    &spec.lambda_factors,
                    spec.require_prime,
                    spec.max_steps,
                )
            });
        }
    }

    let ended_at = Utc::now();
    info!(
        checked,
        hit_count = hits.len(),
        error_count = errors.len(),
        "task finished"
    );
    Ok(TaskReport {
        task_type: spec.task_type,
        checked,
        hit_count: hits.len(),
        hits,
        errors,
        started_at,
        ended_at,
    })
}

fn validate_product_params(spec: &TaskSpec, needs_prime_digits: bool) -> Result<()> {
    if spec.target_digits == 0 {
        bail!("--target-digits must be at least 1");
    }
    if needs_prime_digits && spec.prime_digits == 0 {
        bail!("--prime-digits must be at least 1");
    }
    Ok(())
}

fn run_seed_loop(
    seed_start: u64,
    seed_end: u64,
    backend: &dyn PrimalityBackend,
    checked: &mut u64,
    hits: &mut Vec<Hit>,
    errors: &mut Vec<ErrorRecord>,
    mut generate: impl FnMut(u64) -> Option<Candidate>,
) {
    for seed in seed_start..=seed_end {
        *checked += 1;
        match generate(seed) {
            Some(candidate) => {
                if backend.is_bpsw(&candidate.n) {
                    info!(seed, n = %candidate.n, "BPSW probable prime");
                    hits.push(Hit::new(&candidate.n, candidate.meta));
                }
            }
            None => {
                debug!(seed, "generator exhausted its step budget");
                errors.push(ErrorRecord {
                    seed,
                    error: GenerationError::GenerationFailed,
                });
            }
        }
    }
}
