//! # Pomerance — Products of Constrained Small Primes
//!
//! Two generator families in the spirit of Pomerance's recipe for hunting
//! BPSW counterexamples: assemble a squarefree product of primes that all
//! sit in residue classes making the product simultaneously a base-2 Fermat
//! candidate and a Lucas candidate with the "wrong" Jacobi signature.
//!
//! - **Lite**: rejection-sample primes with `p ≡ 3 (mod 8)` and
//!   `(5/p) = −1`. An odd count of such factors keeps the product
//!   `≡ 3 (mod 8)`.
//! - **Modular**: fold `3 (mod 8)`, a chosen residue mod 5, `+1` modulo a
//!   product of "m-primes", and `−1` modulo a product of "n-primes" into a
//!   single congruence by CRT, then walk that arithmetic progression. A
//!   contradictory prime-list configuration is a hard error, surfaced before
//!   any seed is processed.
//!
//! ## References
//!
//! - C. Pomerance, "Are there counter-examples to the Baillie–PSW primality
//!   test?", Dopo Le Parole, 1984.
//! - Baillie & Wagstaff, "Lucas Pseudoprimes", Math. Comp. 35 (1980).

use rug::Integer;

use crate::arith::{crt_pair, jacobi, IncompatibleCongruences};
use crate::report::{factor_strings, Candidate, HitMeta};
use crate::sampling::{
    accumulate_factors, find_prime_in_progression, find_prime_with_filters, product_of, task_rng,
};

/// Default primes carrying the `≡ +1` CRT constraint.
pub const DEFAULT_M_PRIMES: [u32; 5] = [13, 17, 29, 37, 41];

/// Default primes carrying the `≡ −1` CRT constraint.
pub const DEFAULT_N_PRIMES: [u32; 5] = [3, 7, 11, 19, 23];

/// The single congruence class every modular-family factor must inhabit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModConstraint {
    pub residue: Integer,
    pub modulus: Integer,
}

/// CRT-combine the modular family's constraints:
/// `3 (mod 8)`, `mod5_residue (mod 5)`, `+1 (mod ∏ m_primes)`,
/// `−1 (mod ∏ n_primes)`. Empty prime lists contribute the trivial modulus 1
/// and are skipped.
pub fn build_mod_constraint(
    m_primes: &[u32],
    n_primes: &[u32],
    mod5_residue: u32,
) -> Result<ModConstraint, IncompatibleCongruences> {
    let prod_m = product_of_u32(m_primes);
    let prod_n = product_of_u32(n_primes);
    let minus_one_mod_n = Integer::from(&prod_n - 1u32);
    let constraints = [
        (Integer::from(3u32), Integer::from(8u32)),
        (Integer::from(mod5_residue % 5), Integer::from(5u32)),
        (Integer::from(1u32), prod_m),
        (minus_one_mod_n, prod_n),
    ];
    let mut residue = Integer::new();
    let mut modulus = Integer::from(1u32);
    for (a, m) in &constraints {
        if *m == 1u32 {
            continue;
        }
        let (r, lcm) = crt_pair(&residue, &modulus, a, m)?;
        residue = r;
        modulus = lcm;
    }
    Ok(ModConstraint { residue, modulus })
}

fn product_of_u32(values: &[u32]) -> Integer {
    let mut acc = Integer::from(1u32);
    for &v in values {
        acc *= v;
    }
    acc
}

/// Lite family: factors are random primes of `prime_digits` digits with
/// `p ≡ 3 (mod 8)` and `(5/p) = −1`.
pub fn generate_lite(
    seed: u64,
    target_digits: u32,
    prime_digits: u32,
    max_steps: u64,
) -> Option<Candidate> {
    let mut rng = task_rng(seed);
    let five = Integer::from(5u32);
    let factors = accumulate_factors(target_digits, || {
        find_prime_with_filters(&mut rng, prime_digits, max_steps, |p| {
            p.mod_u(8) == 3 && jacobi(&five, p) == -1
        })
    })?;
    let n = product_of(&factors);
    let meta = HitMeta::PomeranceLite {
        prime_digits,
        target_digits,
        factors: factor_strings(&factors),
    };
    Some(Candidate { n, meta })
}

/// Modular family: factors are primes found along the composed arithmetic
/// progression. The constraint is built once per task by the executor.
#[allow(clippy::too_many_arguments)]
pub fn generate_modular(
    seed: u64,
    target_digits: u32,
    prime_digits: u32,
    max_steps: u64,
    constraint: &ModConstraint,
    mod5_residue: u32,
    m_primes: &[u32],
    n_primes: &[u32],
) -> Option<Candidate> {
    let mut rng = task_rng(seed);
    let factors = accumulate_factors(target_digits, || {
        find_prime_in_progression(
            &mut rng,
            prime_digits,
            &constraint.residue,
            &constraint.modulus,
            max_steps,
        )
    })?;
    let n = product_of(&factors);
    let meta = HitMeta::PomeranceModular {
        prime_digits,
        target_digits,
        modulus: constraint.modulus.to_string_radix(10),
        residue: constraint.residue.to_string_radix(10),
        mod5_residue,
        m_primes: m_primes.to_vec(),
        n_primes: n_primes.to_vec(),
        factors: factor_strings(&factors),
    };
    Some(Candidate { n, meta })
}
