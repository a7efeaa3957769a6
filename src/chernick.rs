//! # Chernick — Universal-Form Carmichael Candidates
//!
//! Chernick's universal form: for integer k, the product
//! `n = (6k+1)(12k+1)(18k+1)` is a Carmichael number whenever all three
//! factors are prime (Chernick, 1939). These are the canonical stress
//! candidates for Fermat-style tests — BPSW is expected to reject every one,
//! so a hit here would itself be remarkable.
//!
//! With `require_prime_factors` set, the deep Miller–Rabin filter gates the
//! three factors and a k that fails any of them is silently skipped;
//! otherwise the product is yielded unconditionally and BPSW sorts it out.
//!
//! ## References
//!
//! - J. Chernick, "On Fermat's simple theorem", Bull. AMS 45 (1939).
//! - OEIS [A033502](https://oeis.org/A033502) — Carmichael numbers of this form.

use rug::Integer;

use crate::primality::is_probable_prime;
use crate::report::{factor_strings, Candidate, HitMeta};

/// Formula string recorded in hit metadata.
pub const FORMULA: &str = "(6k+1)(12k+1)(18k+1)";

/// Build the Chernick candidate for `k`, or `None` when prime factors are
/// required and one of the three fails the deep filter.
pub fn generate(k: &Integer, require_prime_factors: bool) -> Option<Candidate> {
    let f1 = Integer::from(k * 6u32) + 1u32;
    let f2 = Integer::from(k * 12u32) + 1u32;
    let f3 = Integer::from(k * 18u32) + 1u32;
    if require_prime_factors
        && !(is_probable_prime(&f1) && is_probable_prime(&f2) && is_probable_prime(&f3))
    {
        return None;
    }
    let n = Integer::from(&f1 * &f2) * &f3;
    let factors = [f1, f2, f3];
    let meta = HitMeta::Chernick {
        formula: FORMULA,
        k: k.to_string_radix(10),
        factors: factor_strings(&factors),
    };
    Some(Candidate { n, meta })
}
