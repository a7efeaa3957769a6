//! # Arith — Integer Arithmetic Primitives
//!
//! The number-theoretic foundation under the primality tests and generators:
//! Jacobi symbol, integer square root, extended GCD, and CRT combination of
//! congruence pairs. Everything operates on `rug::Integer`; modular powering
//! stays on GMP's `pow_mod`, which needs no wrapper here.
//!
//! The Jacobi symbol is hand-rolled rather than delegated to GMP because the
//! callers rely on its total-function contract: `jacobi(a, n)` is defined for
//! every `(a, n)` and returns 0 whenever `n` is even or nonpositive, instead
//! of treating that as a precondition violation. The unit tests cross-check
//! it against GMP on the shared domain.
//!
//! ## References
//!
//! - Crandall & Pomerance, "Prime Numbers: A Computational Perspective",
//!   §2.3 (Jacobi symbol), §2.1 (extended Euclid).
//! - Baillie & Wagstaff, "Lucas Pseudoprimes", Math. Comp. 35 (1980).

use rug::Integer;

/// Two congruences cannot be combined: their residues disagree modulo the
/// gcd of the moduli, so no integer satisfies both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("incompatible congruences: residues disagree modulo gcd of the moduli")]
pub struct IncompatibleCongruences;

/// Jacobi symbol (a/n), defined for all integers.
///
/// Returns 0 when `n <= 0` or `n` is even. For odd `n >= 1` this is the
/// standard multiplicative generalization of the Legendre symbol, computed
/// by binary reduction: strip factors of two from `a` (flipping the sign
/// when `n ≡ 3, 5 (mod 8)`), swap via quadratic reciprocity (flipping when
/// both are `≡ 3 (mod 4)`), and reduce.
pub fn jacobi(a: &Integer, n: &Integer) -> i32 {
    if *n <= 0u32 || n.is_even() {
        return 0;
    }
    let mut a = Integer::from(a % n);
    if a < 0u32 {
        a += n;
    }
    let mut n = n.clone();
    let mut result = 1i32;
    while a != 0u32 {
        while a.is_even() {
            a >>= 1u32;
            let r = n.mod_u(8);
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if a.mod_u(4) == 3 && n.mod_u(4) == 3 {
            result = -result;
        }
        a %= &n;
    }
    if n == 1u32 {
        result
    } else {
        0
    }
}

/// Floor of the square root of `n`.
///
/// # Panics
///
/// Panics if `n < 0`; callers gate on sign first (see [`is_square`]).
pub fn isqrt(n: &Integer) -> Integer {
    assert!(*n >= 0u32, "isqrt of negative value {}", n);
    n.clone().sqrt()
}

/// True iff `n` is a perfect square (`n >= 0` and `isqrt(n)² = n`).
pub fn is_square(n: &Integer) -> bool {
    if *n < 0u32 {
        return false;
    }
    let r = isqrt(n);
    Integer::from(&r * &r) == *n
}

/// Extended GCD: returns `(g, x, y)` with `g = a·x + b·y` and `g >= 0`.
/// Defined for all integer inputs, including zeros and negatives.
pub fn egcd(a: &Integer, b: &Integer) -> (Integer, Integer, Integer) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (Integer::from(1u32), Integer::new());
    let (mut old_t, mut t) = (Integer::new(), Integer::from(1u32));
    while r != 0u32 {
        let q = Integer::from(&old_r / &r);
        old_r -= Integer::from(&q * &r);
        std::mem::swap(&mut old_r, &mut r);
        old_s -= Integer::from(&q * &s);
        std::mem::swap(&mut old_s, &mut s);
        old_t -= Integer::from(&q * &t);
        std::mem::swap(&mut old_t, &mut t);
    }
    if old_r < 0u32 {
        old_r = -old_r;
        old_s = -old_s;
        old_t = -old_t;
    }
    (old_r, old_s, old_t)
}

/// Combine two congruences `x ≡ a1 (mod m1)` and `x ≡ a2 (mod m2)` into a
/// single pair `(r, lcm(m1, m2))` with `0 <= r < lcm`. Moduli must be
/// positive; the moduli need not be coprime.
///
/// Fails with [`IncompatibleCongruences`] when `gcd(m1, m2)` does not divide
/// `a2 - a1`.
pub fn crt_pair(
    a1: &Integer,
    m1: &Integer,
    a2: &Integer,
    m2: &Integer,
) -> Result<(Integer, Integer), IncompatibleCongruences> {
    debug_assert!(*m1 > 0u32 && *m2 > 0u32, "crt_pair moduli must be positive");
    let (g, x, _) = egcd(m1, m2);
    let diff = Integer::from(a2 - a1);
    if !diff.is_divisible(&g) {
        return Err(IncompatibleCongruences);
    }
    let lcm = Integer::from(m1 / &g) * m2;
    let m2g = Integer::from(m2 / &g);
    let mut t = Integer::from(&diff / &g) * &x;
    t %= &m2g;
    if t < 0u32 {
        t += &m2g;
    }
    let mut r = Integer::from(m1 * &t) + a1;
    r %= &lcm;
    if r < 0u32 {
        r += &lcm;
    }
    Ok((r, lcm))
}
