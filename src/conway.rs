//! Conway polynomials
//!
//! C(p, n) is the monic degree-n polynomial
//! `X^n - α(n-1) X^(n-1) + α(n-2) X^(n-2) - ... + (-1)^n α(0)` whose
//! coefficient sequence `(α(n-1), ..., α(0))` is lexicographically least
//! among the primitive polynomials compatible with C(p, m) for every proper
//! divisor m of n. Compatible means the root of C(p, n) raised to
//! `(p^n - 1) / (p^m - 1)` is a root of C(p, m).
//!
//! Key files name a field only by its order and degree, so this is the one
//! modulus both the writer and the reader can agree on.

use crate::arith::prime_factors;
use crate::error::{Error, Result};
use crate::field::{Field, Residue};
use crate::galois::GaloisField;
use crate::polynomial::Polynomial;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Computes C(p, degree); `p` must be prime
pub fn conway_polynomial(p: &BigUint, degree: usize) -> Result<Polynomial<Residue>> {
    if degree == 0 {
        return Err(Error::InvalidField("degree must be positive".into()));
    }
    ConwaySearch {
        p,
        found: BTreeMap::new(),
    }
    .find(degree)
}

struct ConwaySearch<'a> {
    p: &'a BigUint,
    found: BTreeMap<usize, Polynomial<Residue>>,
}

/// A proper subfield the candidate has to be compatible with
struct Subfield {
    conway: Polynomial<Residue>,
    exponent: BigUint,
}

impl ConwaySearch<'_> {
    fn find(&mut self, n: usize) -> Result<Polynomial<Residue>> {
        if let Some(known) = self.found.get(&n) {
            return Ok(known.clone());
        }

        let group_order = num_traits::pow(self.p.clone(), n) - BigUint::one();
        let primes = prime_factors(&group_order)?;
        let mut subfields = Vec::new();
        for m in (1..n).filter(|m| n % m == 0) {
            let conway = self.find(m)?;
            let sub_order = num_traits::pow(self.p.clone(), m) - BigUint::one();
            subfields.push(Subfield {
                conway,
                exponent: &group_order / &sub_order,
            });
        }

        // alphas[k] holds α(n-1-k); α(0) starts at 1 because it must be non-zero
        let mut alphas = vec![BigUint::zero(); n];
        alphas[n - 1] = BigUint::one();
        let mut tried = 0u64;
        loop {
            let candidate = self.candidate(&alphas);
            tried += 1;
            if self.accepts(&candidate, &group_order, &primes, &subfields) {
                debug!(p = %self.p, n, tried, "found Conway polynomial");
                self.found.insert(n, candidate.clone());
                return Ok(candidate);
            }
            if tried % 1024 == 0 {
                trace!(p = %self.p, n, tried, "Conway search in progress");
            }
            if !self.advance(&mut alphas) {
                return Err(Error::InvalidField(format!(
                    "no primitive polynomial of degree {} over GF({})",
                    n, self.p
                )));
            }
        }
    }

    fn candidate(&self, alphas: &[BigUint]) -> Polynomial<Residue> {
        let n = alphas.len();
        let mut coeffs: Vec<Residue> = (0..n)
            .map(|i| {
                let alpha = Residue::new(alphas[n - 1 - i].clone(), self.p.clone());
                if (n - i) % 2 == 0 {
                    alpha
                } else {
                    alpha.neg()
                }
            })
            .collect();
        coeffs.push(Residue::one(self.p.clone()));
        Polynomial::new(coeffs)
    }

    /// Next sequence in lexicographic order, keeping α(0) non-zero
    fn advance(&self, alphas: &mut [BigUint]) -> bool {
        let last = alphas.len() - 1;
        for k in (0..=last).rev() {
            alphas[k] += 1u32;
            if alphas[k] < *self.p {
                return true;
            }
            alphas[k] = if k == last {
                BigUint::one()
            } else {
                BigUint::zero()
            };
        }
        false
    }

    fn accepts(
        &self,
        candidate: &Polynomial<Residue>,
        group_order: &BigUint,
        primes: &[BigUint],
        subfields: &[Subfield],
    ) -> bool {
        let ring = Arc::new(GaloisField::unchecked(self.p.clone(), candidate.clone()));
        let x = ring.generator();

        // Primitive: X has multiplicative order exactly p^n - 1
        if !x.pow(group_order).is_one() {
            return false;
        }
        if primes.iter().any(|q| x.pow(&(group_order / q)).is_one()) {
            return false;
        }

        subfields.iter().all(|sub| {
            let y = x.pow(&sub.exponent);
            sub.conway.eval(&y, |c| ring.from_residue(c)).is_zero()
        })
    }
}
