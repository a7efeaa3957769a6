//! # Pseudoreach — Core Library
//!
//! Worker engine for the distributed Baillie–PSW pseudoprime search. A worker
//! receives one task descriptor — a dense range of odd integers, or a seed
//! range driving a structured candidate-generator family — runs every
//! candidate through the composite BPSW probable-prime test, and emits a
//! single JSON report.
//!
//! ## Module Organization
//!
//! **Engine modules** (candidate construction and testing):
//! - [`arith`] — Jacobi symbol, integer square root, extended GCD, CRT pairs
//! - [`primality`] — strong Miller–Rabin, Lucas–Selfridge, the BPSW composite
//! - [`sampling`] — seeded PRNG and prime sampling (filtered / in progression)
//! - [`chernick`] — Chernick triples (6k+1)(12k+1)(18k+1)
//! - [`pomerance`] — Pomerance-style products of small primes (plain filter
//!   and CRT-constrained arithmetic progression)
//! - [`lambda_plus_one`] — smooth-shifted factors p = ∏ bᵉ + 1
//!
//! **Worker modules** (task plumbing):
//! - [`report`] — hit / error records and the per-task report
//! - [`worker`] — task descriptor validation and the executor loop
//!
//! ## Design Philosophy
//!
//! Data flows strictly upward: the executor calls generators, generators call
//! primality tests, primality tests call arithmetic primitives. The engine is
//! single-threaded and synchronous; parallelism lives in the dispatcher that
//! hands out disjoint seed ranges to independent workers. Generators are
//! seeded with a fixed 64-bit PRNG so reports are reproducible bit-for-bit.
//!
//! The [`PrimalityBackend`] trait is the one seam left open: the default
//! backend is the hand-rolled BPSW composite of [`primality`], and a
//! GMP-backed alternative is available for speed. Both must agree on the
//! published test vectors.

pub mod arith;
pub mod chernick;
pub mod lambda_plus_one;
pub mod pomerance;
pub mod primality;
pub mod report;
pub mod sampling;
pub mod worker;

use rug::Integer;

/// Trait for the final primality verdict on a candidate. The executor takes
/// `&dyn PrimalityBackend` so the BPSW composite can be swapped for a faster
/// vetted implementation without touching the generators.
pub trait PrimalityBackend: Send + Sync {
    /// Baillie–PSW verdict: `true` iff `n` is a BPSW probable prime.
    fn is_bpsw(&self, n: &Integer) -> bool;
}

/// Trial-division primes used by the BPSW front end and the deep filter.
/// Equality with a table entry proves primality; nontrivial divisibility
/// proves compositeness.
pub const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Trial division against [`SMALL_PRIMES`].
///
/// Returns `Some(true)` when `n` equals a table prime, `Some(false)` when a
/// table prime properly divides `n`, and `None` when the table is silent and
/// a probabilistic test must decide.
#[inline]
pub fn trial_division(n: &Integer) -> Option<bool> {
    for &p in &SMALL_PRIMES {
        if n.is_divisible_u(p) {
            // Compare via PartialEq<u32> to avoid heap-allocating an Integer.
            return Some(*n == p);
        }
    }
    None
}

/// Exact decimal digit count. Candidates here stay small enough (≤ ~10³
/// digits) that the radix conversion is cheap.
#[inline]
pub fn exact_digits(n: &Integer) -> u64 {
    let s = n.to_string_radix(10);
    s.trim_start_matches('-').len() as u64
}

/// Estimate decimal digit count from bit length, avoiding the radix
/// conversion. Accurate to ±1 digit.
#[inline]
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

#[cfg(test)]
mod tests {
    //! # Core Utility Tests
    //!
    //! Validates the shared primitives the engine modules depend on:
    //!
    //! - **Trial division** (`trial_division`): the three-way verdict over the
    //!   fixed 12-prime table — equality proves prime, proper divisibility
    //!   proves composite, anything else is undecided. Includes the blind spot
    //!   for semiprimes whose factors both exceed 37.
    //! - **Digit counting** (`exact_digits` / `estimate_digits`): exact values
    //!   at powers-of-ten boundaries and agreement within ±1 digit.
    //! - **SMALL_PRIMES table**: sorted, prime, and exactly the primes ≤ 37.

    use super::*;
    use rug::ops::Pow;

    #[test]
    fn trial_division_identifies_table_primes() {
        for &p in &SMALL_PRIMES {
            assert_eq!(
                trial_division(&Integer::from(p)),
                Some(true),
                "table prime {} misclassified",
                p
            );
        }
    }

    #[test]
    fn trial_division_rejects_smooth_composites() {
        for &c in &[4u32, 6, 9, 15, 21, 25, 49, 100, 561, 1729, 1000] {
            assert_eq!(
                trial_division(&Integer::from(c)),
                Some(false),
                "composite {} escaped trial division",
                c
            );
        }
    }

    #[test]
    fn trial_division_undecided_above_table() {
        // Primes above 37 and semiprimes with both factors above 37.
        for &n in &[41u32, 43, 1009, 41 * 43, 1009 * 1013] {
            assert_eq!(
                trial_division(&Integer::from(n)),
                None,
                "{} should be undecided",
                n
            );
        }
    }

    #[test]
    fn trial_division_undecided_for_one() {
        // 1 is divisible by no table prime; downstream tests reject it.
        assert_eq!(trial_division(&Integer::from(1u32)), None);
    }

    #[test]
    fn small_primes_table_is_sorted_and_prime() {
        for w in SMALL_PRIMES.windows(2) {
            assert!(w[0] < w[1], "table not strictly increasing at {}", w[1]);
        }
        for &p in &SMALL_PRIMES {
            assert_ne!(
                Integer::from(p).is_probably_prime(25),
                rug::integer::IsPrime::No,
                "table entry {} is not prime",
                p
            );
        }
        assert_eq!(SMALL_PRIMES[0], 2);
        assert_eq!(SMALL_PRIMES[SMALL_PRIMES.len() - 1], 37);
    }

    #[test]
    fn exact_digits_known_values() {
        assert_eq!(exact_digits(&Integer::from(0u32)), 1);
        assert_eq!(exact_digits(&Integer::from(9u32)), 1);
        assert_eq!(exact_digits(&Integer::from(10u32)), 2);
        assert_eq!(exact_digits(&Integer::from(999u32)), 3);
        assert_eq!(exact_digits(&Integer::from(1000u32)), 4);
        assert_eq!(exact_digits(&(Integer::from(10u32).pow(50))), 51);
    }

    #[test]
    fn exact_digits_ignores_sign() {
        assert_eq!(exact_digits(&Integer::from(-12345)), 5);
    }

    #[test]
    fn estimate_digits_within_one_of_exact() {
        let values: Vec<Integer> = vec![
            Integer::from(1u32),
            Integer::from(9u32),
            Integer::from(10u32),
            Integer::from(999u32),
            Integer::from(10u32).pow(22),
            Integer::from(10u32).pow(100) - 1u32,
            Integer::from(2u32).pow(1000),
        ];
        for v in &values {
            let est = estimate_digits(v);
            let exact = exact_digits(v);
            assert!(
                (est as i64 - exact as i64).abs() <= 1,
                "estimate_digits({}) = {} but exact = {}",
                v,
                est,
                exact
            );
        }
    }

    #[test]
    fn estimate_digits_zero() {
        assert_eq!(estimate_digits(&Integer::from(0u32)), 1);
    }
}
