use crate::error::{Error, Result};
use crate::field::Field;

/// Polynomial with coefficients in a field F
/// Coefficients stored from lowest to highest degree: [a0, a1, a2, ...] = a0 + a1*X + a2*X^2 + ...
///
/// Leading zero coefficients are always trimmed, so the zero polynomial has
/// no coefficients at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Polynomial<F: Field> {
    coeffs: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    pub fn new(coeffs: Vec<F>) -> Self {
        let mut poly = Polynomial { coeffs };
        poly.normalize();
        poly
    }

    pub fn zero() -> Self {
        Polynomial { coeffs: vec![] }
    }

    pub fn constant(coeff: F) -> Self {
        Self::new(vec![coeff])
    }

    /// `coeff * X^power`
    pub fn monomial(coeff: F, power: usize) -> Self {
        let mut coeffs = vec![coeff.zero_like(); power];
        coeffs.push(coeff);
        Self::new(coeffs)
    }

    /// Degree, `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeff(&self, index: usize) -> Option<&F> {
        self.coeffs.get(index)
    }

    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    pub fn leading(&self) -> Option<&F> {
        self.coeffs.last()
    }

    fn normalize(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let (long, short) = if self.coeffs.len() >= other.coeffs.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = long.coeffs.clone();
        for (r, s) in result.iter_mut().zip(&short.coeffs) {
            *r = r.add(s);
        }
        Polynomial::new(result)
    }

    pub fn neg(&self) -> Self {
        Polynomial {
            coeffs: self.coeffs.iter().map(Field::neg).collect(),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies every coefficient by `factor`
    pub fn scale(&self, factor: &F) -> Self {
        Polynomial::new(self.coeffs.iter().map(|c| c.mul(factor)).collect())
    }

    /// Schoolbook multiplication
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }

        let zero = self.coeffs[0].zero_like();
        let mut result = vec![zero; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                result[i + j] = result[i + j].add(&a.mul(b));
            }
        }
        Polynomial::new(result)
    }

    /// Polynomial division with remainder
    /// Returns (quotient, remainder) such that self = quotient * divisor + remainder
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let (Some(divisor_degree), Some(divisor_lead)) = (divisor.degree(), divisor.leading())
        else {
            return Err(Error::DivisionByZero);
        };
        let lead_inv = divisor_lead.inv()?;

        let mut remainder = self.clone();
        let mut quotient = match self.degree() {
            Some(d) if d >= divisor_degree => vec![lead_inv.zero_like(); d - divisor_degree + 1],
            _ => return Ok((Polynomial::zero(), remainder)),
        };

        while let Some(rem_degree) = remainder.degree() {
            if rem_degree < divisor_degree {
                break;
            }
            let shift = rem_degree - divisor_degree;
            let coeff = remainder.coeffs[rem_degree].mul(&lead_inv);

            // Subtract coeff * X^shift * divisor from remainder
            for (i, d) in divisor.coeffs.iter().enumerate() {
                let idx = i + shift;
                remainder.coeffs[idx] = remainder.coeffs[idx].sub(&d.mul(&coeff));
            }
            quotient[shift] = coeff;
            remainder.normalize();
        }

        Ok((Polynomial::new(quotient), remainder))
    }

    pub fn modulo(&self, divisor: &Self) -> Result<Self> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Remainder modulo a monic divisor; needs no inversion
    pub fn rem_monic(&self, divisor: &Self) -> Self {
        let Some(divisor_degree) = divisor.degree() else {
            return self.clone();
        };
        debug_assert!(divisor.leading().is_some_and(|c| c.mul(c) == *c));

        let mut remainder = self.clone();
        while let Some(rem_degree) = remainder.degree() {
            if rem_degree < divisor_degree {
                break;
            }
            let shift = rem_degree - divisor_degree;
            let coeff = remainder.coeffs[rem_degree].clone();
            for (i, d) in divisor.coeffs.iter().enumerate() {
                let idx = i + shift;
                remainder.coeffs[idx] = remainder.coeffs[idx].sub(&d.mul(&coeff));
            }
            remainder.normalize();
        }
        remainder
    }

    /// Greatest common divisor by the Euclidean algorithm (not made monic)
    pub fn gcd(&self, other: &Self) -> Result<Self> {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.modulo(&b)?;
            a = std::mem::replace(&mut b, r);
        }
        Ok(a)
    }

    /// Horner evaluation; `x` also supplies the zero for the empty polynomial
    pub fn eval<E>(&self, x: &E, embed: impl Fn(&F) -> E) -> E
    where
        E: Field,
    {
        let mut result = x.zero_like();
        for c in self.coeffs.iter().rev() {
            result = result.mul(x).add(&embed(c));
        }
        result
    }
}
