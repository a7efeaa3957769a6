//! # Primality — Probable-Prime Tests
//!
//! The two-stage Baillie–PSW composite and its building blocks:
//!
//! 1. **Trial division** by the fixed table of primes up to 37.
//! 2. **Strong Miller–Rabin** with arbitrary witness bases; base 2 alone for
//!    the BPSW front end, seven fixed bases for the generators' deep filter.
//! 3. **Strong Lucas test with Selfridge parameters**: the first
//!    D ∈ 5, −7, 9, −11, 13, … with Jacobi(D, n) = −1, then P = 1,
//!    Q = (1 − D)/4.
//!
//! No composite below 2⁶⁴ passes both stages, and no BPSW counterexample is
//! known at any size. The deep filter is *not* deterministic — it exists to
//! cheaply screen generator factors of ≤ ~10 digits, and a spurious pass
//! merely wastes one generator step because BPSW re-tests the final product.
//!
//! The [`PrimalityBackend`] implementations live here: [`NativeBpsw`] is the
//! composite above and the default; [`GmpBackend`] defers the verdict to
//! GMP's `mpz_probab_prime_p` (trial division, BPSW, extra Miller–Rabin
//! rounds), which is substantially faster on large candidates. Both agree on
//! every published vector.
//!
//! ## References
//!
//! - Baillie & Wagstaff, "Lucas Pseudoprimes", Math. Comp. 35 (1980),
//!   1391–1417.
//! - Pomerance, Selfridge & Wagstaff, "The Pseudoprimes to 25·10⁹",
//!   Math. Comp. 35 (1980), 1003–1026.
//! - OEIS [A217255](https://oeis.org/A217255) — strong Lucas pseudoprimes.
//! - OEIS [A001262](https://oeis.org/A001262) — strong pseudoprimes base 2.

use rug::integer::IsPrime;
use rug::Integer;

use crate::arith::{is_square, jacobi};
use crate::{trial_division, PrimalityBackend};

/// Witness bases for the deep Miller–Rabin filter used inside generators.
/// Deterministic below 3.4·10¹⁴, heuristically strong well beyond; the BPSW
/// pass on the assembled product is what the report actually vouches for.
pub const DEEP_MR_BASES: [u32; 7] = [2, 3, 5, 7, 11, 13, 17];

/// Strong Miller–Rabin test of `n` against every base in `bases`.
///
/// Writes `n − 1 = d·2^s` with `d` odd and checks each base `a` (skipping
/// those with `a ≡ 0 mod n`): `a^d ≡ ±1`, or some square `a^(d·2^r) ≡ −1`
/// for `r < s`. Returns `true` only when every base witnesses probable
/// primality. `n < 2` is composite, 2 is prime, larger evens are composite.
pub fn miller_rabin(n: &Integer, bases: &[u32]) -> bool {
    if *n < 2u32 {
        return false;
    }
    if n.is_even() {
        return *n == 2u32;
    }
    let n_minus_1 = Integer::from(n - 1u32);
    let s = n_minus_1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n_minus_1 >> s);
    'bases: for &a in bases {
        let a_red = Integer::from(a) % n;
        if a_red == 0u32 {
            continue;
        }
        // Exponent is nonnegative, so pow_mod cannot fail.
        let Ok(mut x) = a_red.pow_mod(&d, n) else {
            return false;
        };
        if x == 1u32 || x == n_minus_1 {
            continue 'bases;
        }
        for _ in 1..s {
            x = Integer::from(&x * &x) % n;
            if x == n_minus_1 {
                continue 'bases;
            }
        }
        return false;
    }
    true
}

/// Strong Lucas probable-prime test with Selfridge parameters, for odd n.
///
/// Perfect squares are rejected up front (no usable D exists for them).
/// D walks 5, −7, 9, −11, … until Jacobi(D, n) = −1; a zero Jacobi value
/// along the way exposes a shared factor and settles compositeness
/// immediately. With P = 1 and Q = (1 − D)/4, the Lucas sequence is driven
/// to index d where n + 1 = d·2^s, by a left-to-right binary ladder:
///
/// - doubling: `U ← U·V`, `V ← V² − 2·Q_k`, `Q_k ← Q_k²`;
/// - set bit:  `U ← (U + V)/2`, `V ← (D·U + V)/2`, `Q_k ← Q_k·Q`
///   (halving mod odd n adds n first when the numerator is odd).
///
/// n is a probable prime when `U_d ≡ 0`, `V_d ≡ 0`, or any of the s − 1
/// subsequent V-doublings hits zero.
pub fn lucas_selfridge(n: &Integer) -> bool {
    if *n < 2u32 || n.is_even() {
        return *n == 2u32;
    }
    if is_square(n) {
        return false;
    }

    let mut d_candidate: i64 = 5;
    let d = loop {
        let d_int = Integer::from(d_candidate);
        let j = jacobi(&d_int, n);
        if j == -1 {
            break d_candidate;
        }
        if j == 0 {
            let g = d_int.abs().gcd(n);
            if g != 1u32 && &g != n {
                return false;
            }
        }
        d_candidate = if d_candidate > 0 {
            -(d_candidate + 2)
        } else {
            -(d_candidate - 2)
        };
    };

    let mut d_mod = Integer::from(d);
    d_mod %= n;
    if d_mod < 0u32 {
        d_mod += n;
    }
    let mut q = Integer::from((1 - d) / 4);
    q %= n;
    if q < 0u32 {
        q += n;
    }

    let n_plus_1 = Integer::from(n + 1u32);
    let s = n_plus_1.find_one(0).unwrap_or(0);
    let d_odd = Integer::from(&n_plus_1 >> s);

    // Ladder state at index 1: U₁ = 1, V₁ = P = 1, Q₁ = Q.
    let mut u = Integer::from(1u32);
    let mut v = Integer::from(1u32);
    let mut qk = q.clone();
    let bits = d_odd.significant_bits();
    for i in (0..bits - 1).rev() {
        u = Integer::from(&u * &v) % n;
        v = (Integer::from(&v * &v) - Integer::from(&qk * 2u32)) % n;
        if v < 0u32 {
            v += n;
        }
        qk = Integer::from(&qk * &qk) % n;
        if d_odd.get_bit(i) {
            let mut t = Integer::from(&u + &v);
            if t.is_odd() {
                t += n;
            }
            t >>= 1u32;
            t %= n;
            let mut t2 = Integer::from(&d_mod * &u) + &v;
            if t2.is_odd() {
                t2 += n;
            }
            t2 >>= 1u32;
            t2 %= n;
            u = t;
            v = t2;
            qk = Integer::from(&qk * &q) % n;
        }
    }

    if u == 0u32 || v == 0u32 {
        return true;
    }
    for _ in 1..s {
        v = (Integer::from(&v * &v) - Integer::from(&qk * 2u32)) % n;
        if v < 0u32 {
            v += n;
        }
        qk = Integer::from(&qk * &qk) % n;
        if v == 0u32 {
            return true;
        }
    }
    false
}

/// The Baillie–PSW composite: trial division, strong Miller–Rabin base 2,
/// strong Lucas–Selfridge. This is the verdict the worker reports.
pub fn is_bpsw_probable_prime(n: &Integer) -> bool {
    if *n < 2u32 {
        return false;
    }
    if let Some(verdict) = trial_division(n) {
        return verdict;
    }
    miller_rabin(n, &[2]) && lucas_selfridge(n)
}

/// Cheap multi-base probable-prime filter used while assembling generator
/// factors. Trial division, then Miller–Rabin over [`DEEP_MR_BASES`].
pub fn is_probable_prime(n: &Integer) -> bool {
    if *n < 2u32 {
        return false;
    }
    if let Some(verdict) = trial_division(n) {
        return verdict;
    }
    miller_rabin(n, &DEEP_MR_BASES)
}

/// Default backend: the hand-rolled BPSW composite above.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBpsw;

impl PrimalityBackend for NativeBpsw {
    fn is_bpsw(&self, n: &Integer) -> bool {
        is_bpsw_probable_prime(n)
    }
}

/// GMP-backed backend. `mpz_probab_prime_p` runs trial division, BPSW, and
/// `rounds − 24` extra Miller–Rabin rounds, so it is strictly at least as
/// strict as the native composite on every candidate either can see.
#[derive(Debug, Clone, Copy)]
pub struct GmpBackend {
    rounds: u32,
}

impl GmpBackend {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }
}

impl Default for GmpBackend {
    fn default() -> Self {
        Self { rounds: 25 }
    }
}

impl PrimalityBackend for GmpBackend {
    fn is_bpsw(&self, n: &Integer) -> bool {
        n.is_probably_prime(self.rounds) != IsPrime::No
    }
}
