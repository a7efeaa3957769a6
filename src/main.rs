//! # Main — Worker CLI Entry Point
//!
//! Parses one task descriptor from flags, runs it to completion, and prints
//! the report as a single JSON line on stdout. Logs go to stderr (filtered
//! by `RUST_LOG`) so stdout stays a clean transport channel for whatever
//! dispatcher spawned this process.
//!
//! Exit status: 0 on a completed task, nonzero on any configuration error
//! (missing range, malformed prime lists, contradictory CRT constraints).
//! No report is emitted on failure.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rug::Integer;

use pseudoreach::lambda_plus_one::DEFAULT_FACTOR_BASES;
use pseudoreach::pomerance::{DEFAULT_M_PRIMES, DEFAULT_N_PRIMES};
use pseudoreach::primality::{GmpBackend, NativeBpsw};
use pseudoreach::worker::{run_task, TaskSpec, TaskType};
use pseudoreach::PrimalityBackend;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "pseudoreach",
    about = "Hunt for Baillie-PSW probable primes and pseudoprime candidates"
)]
struct Cli {
    /// Task family to execute
    #[arg(long, value_enum)]
    task_type: TaskType,

    /// Inclusive range start: an odd-walk bound or a Chernick k (decimal,
    /// arbitrary precision)
    #[arg(long, default_value = "0", value_parser = parse_big_int)]
    start: Integer,

    /// Inclusive range end
    #[arg(long, default_value = "0", value_parser = parse_big_int)]
    end: Integer,

    /// Inclusive seed range start; falls back to --start when unset
    #[arg(long, default_value_t = 0)]
    seed_start: u64,

    /// Inclusive seed range end; falls back to --end when unset
    #[arg(long, default_value_t = 0)]
    seed_end: u64,

    /// Cap on range-mode evaluations (0 = unbounded)
    #[arg(long, default_value_t = 0)]
    max_candidates: u64,

    /// Minimum decimal digits of a generated product
    #[arg(long, default_value_t = 22)]
    target_digits: u32,

    /// Decimal digits of each sampled prime factor
    #[arg(long, default_value_t = 7)]
    prime_digits: u32,

    /// Step budget per factor search
    #[arg(long, default_value_t = 5000)]
    max_steps: u64,

    /// Chernick: only yield products whose three factors pass the deep filter
    #[arg(long)]
    require_prime_factors: bool,

    /// Lambda-plus-one: require each factor to pass the deep filter
    #[arg(long)]
    require_prime: bool,

    /// Residue mod 5 folded into the modular constraint
    #[arg(long, default_value_t = 2)]
    mod5_residue: u32,

    /// Comma-separated primes carrying the ≡ +1 modular constraint
    #[arg(long)]
    m_primes: Option<String>,

    /// Comma-separated primes carrying the ≡ -1 modular constraint
    #[arg(long)]
    n_primes: Option<String>,

    /// Comma-separated base:max_exp pairs for the lambda-plus-one pool
    #[arg(long)]
    lambda_factors: Option<String>,

    /// Primality backend for the final verdict
    #[arg(long, value_enum, default_value = "native")]
    backend: Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Backend {
    /// Trial division, strong MR base 2, strong Lucas-Selfridge
    Native,
    /// GMP's probable-prime test (trial division + BPSW + extra MR rounds)
    Gmp,
}

fn parse_big_int(s: &str) -> Result<Integer, String> {
    Integer::from_str_radix(s.trim(), 10).map_err(|e| format!("invalid integer '{}': {}", s, e))
}

fn parse_prime_list(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .with_context(|| format!("invalid prime list entry '{}'", part))
        })
        .collect()
}

fn parse_lambda_factors(raw: &str) -> Result<Vec<(u32, u32)>> {
    raw.split(',')
        .map(|entry| {
            let entry = entry.trim();
            let (base, exp) = entry
                .split_once(':')
                .with_context(|| format!("lambda factor '{}' is not base:exp", entry))?;
            let base = base
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid lambda base in '{}'", entry))?;
            let exp = exp
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid lambda exponent in '{}'", entry))?;
            if base < 2 {
                bail!("lambda base must be at least 2 in '{}'", entry);
            }
            Ok((base, exp))
        })
        .collect()
}

fn spec_from_cli(cli: &Cli) -> Result<TaskSpec> {
    Ok(TaskSpec {
        task_type: cli.task_type,
        start: cli.start.clone(),
        end: cli.end.clone(),
        seed_start: cli.seed_start,
        seed_end: cli.seed_end,
        max_candidates: cli.max_candidates,
        target_digits: cli.target_digits,
        prime_digits: cli.prime_digits,
        max_steps: cli.max_steps,
        require_prime_factors: cli.require_prime_factors,
        require_prime: cli.require_prime,
        mod5_residue: cli.mod5_residue,
        m_primes: match cli.m_primes.as_deref() {
            Some(raw) => parse_prime_list(raw).context("parsing --m-primes")?,
            None => DEFAULT_M_PRIMES.to_vec(),
        },
        n_primes: match cli.n_primes.as_deref() {
            Some(raw) => parse_prime_list(raw).context("parsing --n-primes")?,
            None => DEFAULT_N_PRIMES.to_vec(),
        },
        lambda_factors: match cli.lambda_factors.as_deref() {
            Some(raw) => parse_lambda_factors(raw).context("parsing --lambda-factors")?,
            None => DEFAULT_FACTOR_BASES.to_vec(),
        },
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let spec = spec_from_cli(&cli)?;
    let backend: Box<dyn PrimalityBackend> = match cli.backend {
        Backend::Native => Box::new(NativeBpsw),
        Backend::Gmp => Box::new(GmpBackend::default()),
    };

    let report = run_task(&spec, backend.as_ref())?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
