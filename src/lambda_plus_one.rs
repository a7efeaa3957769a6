//! # Lambda-Plus-One — Smooth-Shifted Factors
//!
//! Factors of the form `p = d + 1` where `d = ∏ baseᵉ` over a fixed pool of
//! small bases with bounded exponents. Such p − 1 values are smooth by
//! construction, which makes the Carmichael condition `p − 1 | λ(n)` easy to
//! engineer across a product of several factors.
//!
//! Each factor draw rolls one exponent per configured base. `p ≤ 2` (every
//! exponent zero) is discarded and the attempt retried; with `require_prime`
//! the deep Miller–Rabin filter gates the factor as well. Factor
//! accumulation and termination follow the shared product loop.

use rand::Rng;
use rug::ops::Pow;
use rug::Integer;

use crate::primality::is_probable_prime;
use crate::report::{factor_strings, Candidate, HitMeta};
use crate::sampling::{accumulate_factors, product_of, task_rng};

/// Default factor pool: `(base, max_exponent)` pairs.
pub const DEFAULT_FACTOR_BASES: [(u32, u32); 7] =
    [(2, 10), (3, 6), (5, 4), (7, 3), (11, 2), (13, 2), (17, 1)];

/// Roll one smooth-shifted factor candidate from the pool.
fn roll_factor<R: Rng>(rng: &mut R, bases: &[(u32, u32)]) -> Integer {
    let mut d = Integer::from(1u32);
    for &(base, max_exp) in bases {
        let exp = rng.gen_range(0..=max_exp);
        if exp > 0 {
            d *= Integer::from(base).pow(exp);
        }
    }
    d + 1u32
}

/// Generate one λ+1 candidate for `seed`, or `None` when some factor search
/// exhausts its `max_steps` attempts.
pub fn generate(
    seed: u64,
    target_digits: u32,
    bases: &[(u32, u32)],
    require_prime: bool,
    max_steps: u64,
) -> Option<Candidate> {
    let mut rng = task_rng(seed);
    let factors = accumulate_factors(target_digits, || {
        for _ in 0..max_steps {
            let p = roll_factor(&mut rng, bases);
            if p > 2u32 && (!require_prime || is_probable_prime(&p)) {
                return Some(p);
            }
        }
        None
    })?;
    let n = product_of(&factors);
    let meta = HitMeta::LambdaPlusOne {
        lambda_factors: bases
            .iter()
            .map(|(base, exp)| format!("{}^{}", base, exp))
            .collect(),
        target_digits,
        factors: factor_strings(&factors),
    };
    Some(Candidate { n, meta })
}
