//! # Sampling — Seeded Randomness and Prime Sampling
//!
//! Everything random in a worker flows through here, driven by one fixed
//! PRNG: xoshiro256++ seeded from the task's 64-bit seed via SplitMix64.
//! The algorithm is pinned deliberately — two workers given the same seed
//! must walk identical candidate streams on any platform, so reports are
//! reproducible bit-for-bit and a dispatcher can re-issue a seed range to
//! verify a hit.
//!
//! On top of the PRNG sit the two prime-sampling strategies the Pomerance
//! generators use:
//!
//! - [`find_prime_with_filters`]: rejection-sample random odd integers of a
//!   fixed digit count until one passes a caller predicate plus the deep
//!   Miller–Rabin filter.
//! - [`find_prime_in_progression`]: land on a random point of an arithmetic
//!   progression `residue (mod modulus)` inside the digit range, then step
//!   by the modulus until the deep filter accepts.
//!
//! Both are bounded by a per-call step budget; exhausting it is reported as
//! `None` and surfaces as a `generation_failed` record, never a panic.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rug::integer::Order;
use rug::ops::Pow;
use rug::Integer;

use crate::primality;

/// The worker PRNG. xoshiro256++ has a 256-bit state, passes BigCrush, and
/// `seed_from_u64` expands the task seed through SplitMix64, so nearby seeds
/// still give uncorrelated streams.
pub type TaskRng = Xoshiro256PlusPlus;

/// Build the PRNG for one generator invocation.
pub fn task_rng(seed: u64) -> TaskRng {
    TaskRng::seed_from_u64(seed)
}

/// Uniform random integer in `[0, bound)` by rejection on the top bit block.
///
/// # Panics
///
/// Panics if `bound <= 0`.
pub fn random_below<R: Rng>(rng: &mut R, bound: &Integer) -> Integer {
    assert!(*bound > 0u32, "random_below needs a positive bound");
    let bits = bound.significant_bits();
    let limbs = ((bits + 63) / 64) as usize;
    loop {
        let mut digits = vec![0u64; limbs];
        for d in digits.iter_mut() {
            *d = rng.next_u64();
        }
        let mut candidate = Integer::from_digits(&digits, Order::Lsf);
        candidate.keep_bits_mut(bits);
        if candidate < *bound {
            return candidate;
        }
    }
}

/// Uniform random odd integer in the inclusive range `[low, high]`, after
/// nudging both bounds inward to odd values.
///
/// # Panics
///
/// Panics when the range contains no odd integer; callers validate digit
/// counts before sampling.
pub fn random_odd_in_range<R: Rng>(rng: &mut R, low: &Integer, high: &Integer) -> Integer {
    let mut low = low.clone();
    let mut high = high.clone();
    if low.is_even() {
        low += 1u32;
    }
    if high.is_even() {
        high -= 1u32;
    }
    assert!(low <= high, "no odd integer in range");
    let count = Integer::from(&high - &low) / 2u32 + 1u32;
    let k = random_below(rng, &count);
    low + k * 2u32
}

/// Inclusive decimal bounds `[10^(d-1), 10^d - 1]` for a digit count `d >= 1`.
pub fn decimal_bounds(digits: u32) -> (Integer, Integer) {
    assert!(digits >= 1, "digit count must be at least 1");
    let low = Integer::from(10u32).pow(digits - 1);
    let high = Integer::from(10u32).pow(digits) - 1u32;
    (low, high)
}

/// Sample random odd integers of `digits` digits until one satisfies
/// `predicate` and the deep Miller–Rabin filter, or the step budget runs out.
pub fn find_prime_with_filters<R, F>(
    rng: &mut R,
    digits: u32,
    max_steps: u64,
    predicate: F,
) -> Option<Integer>
where
    R: Rng,
    F: Fn(&Integer) -> bool,
{
    let (low, high) = decimal_bounds(digits);
    for _ in 0..max_steps {
        let candidate = random_odd_in_range(rng, &low, &high);
        if predicate(&candidate) && primality::is_probable_prime(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Walk the arithmetic progression `residue (mod modulus)` from a random
/// start inside the digit range, returning the first member that passes the
/// deep Miller–Rabin filter. Even members are stepped over without spending
/// a filter call; the walk ends at the top of the digit range or after
/// `max_steps` steps.
pub fn find_prime_in_progression<R: Rng>(
    rng: &mut R,
    digits: u32,
    residue: &Integer,
    modulus: &Integer,
    max_steps: u64,
) -> Option<Integer> {
    if *modulus <= 0u32 {
        return None;
    }
    let (low, high) = decimal_bounds(digits);
    let start = random_odd_in_range(rng, &low, &high);
    let mut delta = Integer::from(residue - &start);
    delta %= modulus;
    if delta < 0u32 {
        delta += modulus;
    }
    let mut candidate = start + delta;
    if candidate < low {
        candidate += modulus;
    }
    let mut steps = 0u64;
    while candidate <= high && steps < max_steps {
        if candidate.is_odd() && primality::is_probable_prime(&candidate) {
            return Some(candidate);
        }
        candidate += modulus;
        steps += 1;
    }
    None
}

/// Factor-accumulation loop shared by the product generators: sample factors
/// until the running product has at least `target_digits` digits AND the
/// factor count is odd, or until the 10-factor hard cap. An odd count of
/// factors each ≡ 3 (mod 8) keeps the product ≡ 3 (mod 8), which is the
/// residue class the search wants to stay in.
///
/// Returns `None` as soon as one factor sample fails.
pub fn accumulate_factors(
    target_digits: u32,
    mut next_factor: impl FnMut() -> Option<Integer>,
) -> Option<Vec<Integer>> {
    let mut factors: Vec<Integer> = Vec::new();
    loop {
        let product = product_of(&factors);
        if crate::exact_digits(&product) >= u64::from(target_digits) && factors.len() % 2 == 1 {
            break;
        }
        let factor = next_factor()?;
        factors.push(factor);
        if factors.len() > 9 {
            break;
        }
    }
    Some(factors)
}

/// Product of a factor list; 1 for the empty list.
pub fn product_of(factors: &[Integer]) -> Integer {
    let mut acc = Integer::from(1u32);
    for f in factors {
        acc *= f;
    }
    acc
}
