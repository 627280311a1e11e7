//! Order of a point by baby-step giant-step over the Hasse interval
//!
//! For a curve over GF(q) the group order N satisfies
//! |N - (q + 1)| <= 2√q and N·P = O for every point P. Searching that
//! interval finds some multiple of ord(P); stripping prime factors that keep
//! the multiple annihilating P leaves the exact order.

use crate::arith::{ceil_sqrt, prime_factors};
use crate::config::BSGS_STEP_LIMIT;
use crate::error::{Error, Result};
use crate::point::Point;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::collections::HashMap;
use tracing::{debug, trace};

impl Point {
    /// Smallest positive q with q·P = O
    pub fn order(&self) -> Result<BigUint> {
        if self.is_infinity() {
            return Ok(BigUint::one());
        }
        let multiple = self.annihilating_multiple()?;
        trace!(point = %self, %multiple, "found multiple of the order");

        let mut order = multiple;
        for r in prime_factors(&order)? {
            while order.is_multiple_of(&r) {
                let reduced = &order / &r;
                if !self.multiply_unsigned(&reduced)?.is_infinity() {
                    break;
                }
                order = reduced;
            }
        }
        debug!(point = %self, %order, "computed point order");
        Ok(order)
    }

    /// Some m in the Hasse interval with m·P = O
    fn annihilating_multiple(&self) -> Result<BigUint> {
        let q = self.curve().field().order();
        let spread = ceil_sqrt(&q) * 2u32;
        let center = &q + BigUint::one();
        let low = if center > spread {
            &center - &spread
        } else {
            BigUint::one()
        };
        let high = &center + &spread;

        let width = &high - &low + BigUint::one();
        let steps = ceil_sqrt(&width)
            .to_u64()
            .filter(|&steps| steps <= BSGS_STEP_LIMIT)
            .ok_or_else(|| {
                Error::Unsupported(format!(
                    "point order over a field of size {} needs too many baby steps",
                    q
                ))
            })?;

        // Baby steps: j·P for 0 <= j < steps
        let mut baby = HashMap::with_capacity(steps as usize);
        let mut jp = self.curve().infinity();
        for j in 0..steps {
            baby.entry(jp.clone()).or_insert(j);
            jp = jp.add(self)?;
        }

        // Giant steps: (low + i·steps)·P, looking for -(j·P)
        let giant = self.multiply_unsigned(&BigUint::from(steps))?;
        let mut current = self.multiply_unsigned(&low)?;
        let mut base = low;
        while base <= high {
            if let Some(&j) = baby.get(&current.negate()) {
                let m = &base + j;
                if !m.is_zero() {
                    return Ok(m);
                }
            }
            current = current.add(&giant)?;
            base += steps;
        }
        Err(Error::Unsupported(format!(
            "no multiple of the order of {} in the Hasse interval",
            self
        )))
    }
}
