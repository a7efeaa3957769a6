//! # Report — Task Output Records
//!
//! The data a worker hands back: per-hit records, per-seed generation
//! failures, and the wrapping [`TaskReport`] serialized as one JSON line on
//! stdout. Candidate values and factor lists are rendered as decimal strings
//! because the report crosses a text boundary where consumers may only have
//! 2⁵³-safe JSON numbers; small structural integers (digit counts, prime
//! lists) stay numeric.

use chrono::{DateTime, Utc};
use rug::Integer;
use serde::Serialize;

use crate::worker::TaskType;

/// A generated candidate on its way to the BPSW verdict: the value plus the
/// metadata that will be attached to its hit record.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub n: Integer,
    pub meta: HitMeta,
}

/// Family-specific hit metadata. The `family` tag matches the task type for
/// range tasks and the generator family otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum HitMeta {
    MainOdds,
    LargeNumbers,
    Chernick {
        formula: &'static str,
        k: String,
        factors: Vec<String>,
    },
    PomeranceLite {
        prime_digits: u32,
        target_digits: u32,
        factors: Vec<String>,
    },
    PomeranceModular {
        prime_digits: u32,
        target_digits: u32,
        modulus: String,
        residue: String,
        mod5_residue: u32,
        m_primes: Vec<u32>,
        n_primes: Vec<u32>,
        factors: Vec<String>,
    },
    LambdaPlusOne {
        lambda_factors: Vec<String>,
        target_digits: u32,
        factors: Vec<String>,
    },
}

/// One BPSW probable prime found by the task.
#[derive(Debug, Clone, Serialize)]
pub struct Hit {
    pub n: String,
    pub digits: u64,
    pub meta: HitMeta,
}

impl Hit {
    pub fn new(n: &Integer, meta: HitMeta) -> Self {
        Self {
            n: n.to_string_radix(10),
            digits: crate::exact_digits(n),
            meta,
        }
    }
}

/// Why a seed produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationError {
    /// The generator exhausted its per-factor step budget.
    GenerationFailed,
}

/// A seed that was processed but yielded no candidate.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub seed: u64,
    pub error: GenerationError,
}

/// The single-line JSON report a worker emits when its task completes.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task_type: TaskType,
    pub checked: u64,
    pub hit_count: usize,
    pub hits: Vec<Hit>,
    pub errors: Vec<ErrorRecord>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Render a factor list as decimal strings for hit metadata.
pub fn factor_strings(factors: &[Integer]) -> Vec<String> {
    factors.iter().map(|f| f.to_string_radix(10)).collect()
}
