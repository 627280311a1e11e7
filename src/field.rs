use crate::error::{Error, Result};
use num_bigint::{BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;

/// Trait for field operations
///
/// Elements carry their own field context, so the identities are produced
/// from an existing element rather than out of thin air.
pub trait Field: Sized + Clone + PartialEq {
    fn add(&self, other: &Self) -> Self;

    fn neg(&self) -> Self;

    /// Subtraction (a - b = a + (-b))
    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    fn mul(&self, other: &Self) -> Self;

    /// Multiplicative inverse, [`Error::DivisionByZero`] for zero
    fn inv(&self) -> Result<Self>;

    /// Division (a / b = a * b^(-1))
    fn div(&self, other: &Self) -> Result<Self> {
        other.inv().map(|inv| self.mul(&inv))
    }

    /// Square-and-multiply, O(log(exp)) multiplications
    fn pow(&self, exp: &BigUint) -> Self {
        let mut result = self.one_like();
        let mut base = self.clone();
        for i in 0..exp.bits() {
            if exp.bit(i) {
                result = result.mul(&base);
            }
            base = base.mul(&base);
        }
        result
    }

    /// Additive identity of the field `self` belongs to
    fn zero_like(&self) -> Self;

    /// Multiplicative identity of the field `self` belongs to
    fn one_like(&self) -> Self;

    fn is_zero(&self) -> bool;
}

/// Element of the prime field F_p, an integer residue modulo p
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Residue {
    value: BigUint,
    modulus: BigUint,
}

impl Residue {
    /// Reduces `value` modulo `modulus`
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero. The same holds for `from_u64` and `one`.
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        Residue {
            value: value % &modulus,
            modulus,
        }
    }

    pub fn from_u64(value: u64, modulus: BigUint) -> Self {
        Self::new(BigUint::from(value), modulus)
    }

    pub fn zero(modulus: BigUint) -> Self {
        Residue {
            value: BigUint::zero(),
            modulus,
        }
    }

    pub fn one(modulus: BigUint) -> Self {
        Self::new(BigUint::one(), modulus)
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }
}

impl Field for Residue {
    fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.modulus, other.modulus);
        let mut value = &self.value + &other.value;
        if value >= self.modulus {
            value -= &self.modulus;
        }
        Residue {
            value,
            modulus: self.modulus.clone(),
        }
    }

    fn neg(&self) -> Self {
        if self.value.is_zero() {
            return self.clone();
        }
        Residue {
            value: &self.modulus - &self.value,
            modulus: self.modulus.clone(),
        }
    }

    fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.modulus, other.modulus);
        Residue {
            value: (&self.value * &other.value) % &self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    /// Extended Euclid over the integers
    fn inv(&self) -> Result<Self> {
        if self.value.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let modulus = self.modulus.to_bigint().ok_or(Error::DivisionByZero)?;
        let value = self.value.to_bigint().ok_or(Error::DivisionByZero)?;
        let gcd = value.extended_gcd(&modulus);
        if !gcd.gcd.is_one() {
            return Err(Error::DivisionByZero);
        }
        let inverse = gcd.x.mod_floor(&modulus);
        Ok(Residue {
            value: inverse.to_biguint().ok_or(Error::DivisionByZero)?,
            modulus: self.modulus.clone(),
        })
    }

    fn pow(&self, exp: &BigUint) -> Self {
        Residue {
            value: self.value.modpow(exp, &self.modulus),
            modulus: self.modulus.clone(),
        }
    }

    fn zero_like(&self) -> Self {
        Residue::zero(self.modulus.clone())
    }

    fn one_like(&self) -> Self {
        Residue::one(self.modulus.clone())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
