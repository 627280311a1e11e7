//! Points on a general Weierstrass curve and the chord-tangent group law
//!
//! Points are kept in normalized projective form: the identity is
//! `(0 : 1 : 0)` and every other point has `z = 1`, so two points are equal
//! exactly when their coordinates are.
//!
//! For P1 = (x1, y1), P2 = (x2, y2) with x1 != x2:
//! - slope m = (y2 - y1) / (x2 - x1)
//!
//! For P1 = P2 (tangent line):
//! - slope m = (3x1^2 + 2a2x1 + a4 - a1y1) / (2y1 + a1x1 + a3)
//!
//! In both cases:
//! - x3 = m^2 + a1m - a2 - x1 - x2
//! - y3 = m(x1 - x3) - y1 - a1x3 - a3

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::galois::FieldElement;
use num_bigint::{BigInt, BigUint, Sign};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Point {
    curve: Arc<Curve>,
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl Point {
    /// Point at infinity (identity element)
    pub fn infinity(curve: Arc<Curve>) -> Self {
        let field = curve.field().clone();
        Point {
            x: field.zero(),
            y: field.one(),
            z: field.zero(),
            curve,
        }
    }

    /// Scales to `z = 1`; assumes the coordinates already satisfy the curve
    pub(crate) fn normalized(
        curve: Arc<Curve>,
        x: FieldElement,
        y: FieldElement,
        z: FieldElement,
    ) -> Result<Self> {
        if z.is_zero() {
            return Ok(Self::infinity(curve));
        }
        if z.is_one() {
            return Ok(Point { curve, x, y, z });
        }
        let z_inv = z.inv()?;
        Ok(Point {
            x: x.mul(&z_inv),
            y: y.mul(&z_inv),
            z: z.one_like(),
            curve,
        })
    }

    fn affine(&self, x: FieldElement, y: FieldElement) -> Self {
        let z = x.one_like();
        Point {
            curve: Arc::clone(&self.curve),
            x,
            y,
            z,
        }
    }

    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    pub fn z(&self) -> &FieldElement {
        &self.z
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn same_curve(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.curve, &other.curve) || self.curve == other.curve
    }

    /// -(x, y) = (x, -y - a1x - a3)
    pub fn negate(&self) -> Self {
        if self.is_infinity() {
            return self.clone();
        }
        let y = self
            .y
            .neg()
            .sub(&self.curve.a1().mul(&self.x))
            .sub(self.curve.a3());
        self.affine(self.x.clone(), y)
    }

    /// Chord-tangent addition
    pub fn add(&self, other: &Self) -> Result<Self> {
        if !self.same_curve(other) {
            return Err(Error::CurveMismatch);
        }
        if self.is_infinity() {
            return Ok(other.clone());
        }
        if other.is_infinity() {
            return Ok(self.clone());
        }
        if self.x == other.x {
            // Same x: either Q = -P or Q = P
            if *other == self.negate() {
                return Ok(Self::infinity(Arc::clone(&self.curve)));
            }
            return self.double();
        }

        let slope = other.y.sub(&self.y).div(&other.x.sub(&self.x))?;
        Ok(self.third_point(&slope, &other.x))
    }

    /// Tangent doubling; points of order two double to the identity
    pub fn double(&self) -> Result<Self> {
        if self.is_infinity() {
            return Ok(self.clone());
        }
        let curve = &self.curve;
        let (x, y) = (&self.x, &self.y);

        let denominator = y.times(2).add(&curve.a1().mul(x)).add(curve.a3());
        if denominator.is_zero() {
            return Ok(Self::infinity(Arc::clone(curve)));
        }
        let numerator = x
            .mul(x)
            .times(3)
            .add(&curve.a2().mul(x).times(2))
            .add(curve.a4())
            .sub(&curve.a1().mul(y));
        let slope = numerator.div(&denominator)?;
        Ok(self.third_point(&slope, x))
    }

    /// Reflection of the third intersection of the line through `self`
    /// with the given slope, where `other_x` is the second point's x
    fn third_point(&self, slope: &FieldElement, other_x: &FieldElement) -> Self {
        let curve = &self.curve;
        let x3 = slope
            .mul(slope)
            .add(&curve.a1().mul(slope))
            .sub(curve.a2())
            .sub(&self.x)
            .sub(other_x);
        let y3 = slope
            .mul(&self.x.sub(&x3))
            .sub(&self.y)
            .sub(&curve.a1().mul(&x3))
            .sub(curve.a3());
        self.affine(x3, y3)
    }

    /// k·P by MSB-first double-and-add; negative k multiplies -P by |k|
    ///
    /// The scalar is not reduced modulo the order of P.
    pub fn multiply(&self, k: &BigInt) -> Result<Self> {
        match k.sign() {
            Sign::Minus => self.negate().multiply_unsigned(k.magnitude()),
            _ => self.multiply_unsigned(k.magnitude()),
        }
    }

    pub fn multiply_unsigned(&self, k: &BigUint) -> Result<Self> {
        let mut result = Self::infinity(Arc::clone(&self.curve));
        for i in (0..k.bits()).rev() {
            result = result.double()?;
            if k.bit(i) {
                result = result.add(self)?;
            }
        }
        Ok(result)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.same_curve(other) && self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
        self.z.hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} : {} : {})", self.x, self.y, self.z)
    }
}
