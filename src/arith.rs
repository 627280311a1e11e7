//! Integer number theory used to build fields and to compute point orders
//!
//! Primality uses Miller-Rabin with the first twelve primes as witnesses,
//! which is deterministic below 3.3 * 10^24 and probabilistic beyond.
//! Factorisation is trial division followed by Pollard's rho.

use crate::config::{RHO_ITERATION_LIMIT, TRIAL_DIVISION_BOUND};
use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::collections::BTreeSet;

const WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller-Rabin primality test
pub fn is_probable_prime(n: &BigUint) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }
    for &w in &WITNESSES {
        let w = BigUint::from(w);
        if *n == w {
            return true;
        }
        if (n % &w).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - BigUint::one();
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let two = BigUint::from(2u32);

    'witness: for &w in &WITNESSES {
        let mut x = BigUint::from(w).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Distinct prime factors of `n` in ascending order
///
/// Fails with [`Error::Unsupported`] when a composite cofactor resists
/// Pollard's rho within the configured iteration budget.
pub fn prime_factors(n: &BigUint) -> Result<Vec<BigUint>> {
    let mut factors = BTreeSet::new();
    let mut rest = n.clone();
    if rest <= BigUint::one() {
        return Ok(Vec::new());
    }

    let mut d = 2u64;
    while d <= TRIAL_DIVISION_BOUND {
        let divisor = BigUint::from(d);
        if &divisor * &divisor > rest {
            break;
        }
        if (&rest % &divisor).is_zero() {
            while (&rest % &divisor).is_zero() {
                rest /= &divisor;
            }
            factors.insert(divisor);
        }
        d += if d == 2 { 1 } else { 2 };
    }

    let mut pending = Vec::new();
    if rest > BigUint::one() {
        pending.push(rest);
    }
    while let Some(m) = pending.pop() {
        if is_probable_prime(&m) {
            factors.insert(m);
            continue;
        }
        let f = pollard_rho(&m)
            .ok_or_else(|| Error::Unsupported(format!("cannot factor {}", m)))?;
        let cofactor = &m / &f;
        pending.push(f);
        pending.push(cofactor);
    }

    Ok(factors.into_iter().collect())
}

/// Finds a non-trivial divisor of a composite `n`
fn pollard_rho(n: &BigUint) -> Option<BigUint> {
    if n.is_even() {
        return Some(BigUint::from(2u32));
    }
    for c in 1u32..32 {
        let c = BigUint::from(c);
        let step = |x: &BigUint| (x * x + &c) % n;
        let mut x = BigUint::from(2u32);
        let mut y = x.clone();
        for _ in 0..RHO_ITERATION_LIMIT {
            x = step(&x);
            y = step(&step(&y));
            let diff = if x > y { &x - &y } else { &y - &x };
            let d = diff.gcd(n);
            if d == *n {
                break;
            }
            if !d.is_one() {
                return Some(d);
            }
        }
    }
    None
}

/// Returns `r` with `r^k == n`, if such an integer exists
pub fn exact_root(n: &BigUint, k: u32) -> Option<BigUint> {
    if k == 0 {
        return None;
    }
    let r = n.nth_root(k);
    (r.pow(k) == *n).then_some(r)
}

/// Integer square root, rounded up
pub fn ceil_sqrt(n: &BigUint) -> BigUint {
    let r = n.sqrt();
    if &r * &r == *n {
        r
    } else {
        r + BigUint::one()
    }
}
