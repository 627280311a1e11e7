//! Elliptic curves in general Weierstrass form
//!
//! `y² + a1·xy + a3·y = x³ + a2·x² + a4·x + a6` over any [`GaloisField`],
//! including characteristic 2 and 3. Short Weierstrass is the special case
//! a1 = a2 = a3 = 0.

use crate::error::{Error, Result};
use crate::field::Field;
use crate::galois::{FieldElement, GaloisField};
use crate::point::Point;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
pub struct Curve {
    field: Arc<GaloisField>,
    a1: FieldElement,
    a2: FieldElement,
    a3: FieldElement,
    a4: FieldElement,
    a6: FieldElement,
}

impl Curve {
    /// Builds the curve from `[a1, a2, a3, a4, a6]`
    ///
    /// Fails with [`Error::SingularCurve`] when the discriminant vanishes.
    pub fn new(field: &Arc<GaloisField>, coefficients: [FieldElement; 5]) -> Result<Arc<Self>> {
        if coefficients.iter().any(|c| c.field() != field) {
            return Err(Error::InvalidField(
                "curve coefficients must come from the curve's field".into(),
            ));
        }
        let [a1, a2, a3, a4, a6] = coefficients;
        let curve = Curve {
            field: Arc::clone(field),
            a1,
            a2,
            a3,
            a4,
            a6,
        };
        if curve.discriminant().is_zero() {
            return Err(Error::SingularCurve(curve.to_string()));
        }
        Ok(Arc::new(curve))
    }

    /// Short Weierstrass form `y² = x³ + a·x + b`
    pub fn short(field: &Arc<GaloisField>, a: FieldElement, b: FieldElement) -> Result<Arc<Self>> {
        Self::new(field, [field.zero(), field.zero(), field.zero(), a, b])
    }

    /// Parses coefficient text such as `(2, 3, 5, 7, 11)`
    pub fn parse(field: &Arc<GaloisField>, text: &str) -> Result<Arc<Self>> {
        let inner = strip_delimiters(text, '(', ')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let coefficients: Vec<FieldElement> = parts
            .iter()
            .map(|part| field.parse(part))
            .collect::<Result<_>>()?;
        let coefficients: [FieldElement; 5] = coefficients.try_into().map_err(|v: Vec<_>| {
            Error::parse(text, format!("expected 5 coefficients, found {}", v.len()))
        })?;
        Self::new(field, coefficients)
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// `[a1, a2, a3, a4, a6]`
    pub fn a_invariants(&self) -> [&FieldElement; 5] {
        [&self.a1, &self.a2, &self.a3, &self.a4, &self.a6]
    }

    pub fn a1(&self) -> &FieldElement {
        &self.a1
    }

    pub fn a2(&self) -> &FieldElement {
        &self.a2
    }

    pub fn a3(&self) -> &FieldElement {
        &self.a3
    }

    pub fn a4(&self) -> &FieldElement {
        &self.a4
    }

    pub fn a6(&self) -> &FieldElement {
        &self.a6
    }

    /// Δ = -b2²·b8 - 8·b4³ - 27·b6² + 9·b2·b4·b6
    pub fn discriminant(&self) -> FieldElement {
        let (a1, a2, a3, a4, a6) = (&self.a1, &self.a2, &self.a3, &self.a4, &self.a6);
        let b2 = &(a1 * a1) + &a2.times(4);
        let b4 = &a4.times(2) + &(a1 * a3);
        let b6 = &(a3 * a3) + &a6.times(4);
        let b8 = &(&(&(&(a1 * a1) * a6) + &(&a2.times(4) * a6)) - &(&(a1 * a3) * a4))
            + &(&(&(a2 * a3) * a3) - &(a4 * a4));

        let b2_sq_b8 = &(&b2 * &b2) * &b8;
        let b4_cubed = &(&b4 * &b4) * &b4;
        let b6_sq = &b6 * &b6;
        let b2_b4_b6 = &(&b2 * &b4) * &b6;
        &(&(&(-&b2_sq_b8) - &b4_cubed.times(8)) - &b6_sq.times(27)) + &b2_b4_b6.times(9)
    }

    /// Projective curve equation
    /// `Y²Z + a1·XYZ + a3·YZ² = X³ + a2·X²Z + a4·XZ² + a6·Z³`
    ///
    /// `z == 0` is the point at infinity and always counts as contained.
    pub fn contains(&self, x: &FieldElement, y: &FieldElement, z: &FieldElement) -> bool {
        if z.is_zero() {
            return true;
        }
        let z2 = z * z;
        let z3 = &z2 * z;
        let x2 = x * x;
        let lhs = &(&(&(y * y) * z) + &(&(&(&self.a1 * x) * y) * z)) + &(&(&self.a3 * y) * &z2);
        let rhs = &(&(&(&x2 * x) + &(&(&self.a2 * &x2) * z)) + &(&(&self.a4 * x) * &z2))
            + &(&self.a6 * &z3);
        lhs == rhs
    }

    /// Validating constructor for `(x : y : z)`
    pub fn point(
        self: &Arc<Self>,
        x: FieldElement,
        y: FieldElement,
        z: FieldElement,
    ) -> Result<Point> {
        if !self.contains(&x, &y, &z) {
            return Err(Error::InvalidPoint {
                coordinates: format!("({} : {} : {})", x, y, z),
                curve: self.to_string(),
            });
        }
        Point::normalized(Arc::clone(self), x, y, z)
    }

    /// Validating constructor for the affine point `(x, y)`
    pub fn affine_point(self: &Arc<Self>, x: FieldElement, y: FieldElement) -> Result<Point> {
        let z = self.field.one();
        self.point(x, y, z)
    }

    /// The identity `(0 : 1 : 0)`
    pub fn infinity(self: &Arc<Self>) -> Point {
        Point::infinity(Arc::clone(self))
    }

    /// Parses `(x : y : z)`; exactly three coordinates, all on this curve's field
    pub fn parse_point(self: &Arc<Self>, text: &str) -> Result<Point> {
        let inner = strip_delimiters(text, '(', ')')?;
        let coords: Vec<&str> = inner.split(':').map(str::trim).collect();
        let [x, y, z] = coords.as_slice() else {
            return Err(Error::parse(
                text,
                format!("expected 3 coordinates, found {}", coords.len()),
            ));
        };
        let x = self.field.parse(x)?;
        let y = self.field.parse(y)?;
        let z = self.field.parse(z)?;
        self.point(x, y, z)
    }
}

fn strip_delimiters<'a>(text: &'a str, open: char, close: char) -> Result<&'a str> {
    text.trim()
        .strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .ok_or_else(|| Error::parse(text, format!("expected {}...{}", open, close)))
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let term = |c: &FieldElement, var: &str| -> Option<String> {
            if c.is_zero() {
                None
            } else if c.is_one() {
                Some(var.to_string())
            } else if c.field().degree() > 1 && c.poly().coeffs().len() > 1 {
                Some(format!("({})*{}", c, var))
            } else {
                Some(format!("{}*{}", c, var))
            }
        };
        let constant = |c: &FieldElement| -> Option<String> {
            (!c.is_zero()).then(|| c.to_string())
        };

        let lhs: Vec<String> = ["y^2".to_string()]
            .into_iter()
            .chain(term(&self.a1, "x*y"))
            .chain(term(&self.a3, "y"))
            .collect();
        let rhs: Vec<String> = ["x^3".to_string()]
            .into_iter()
            .chain(term(&self.a2, "x^2"))
            .chain(term(&self.a4, "x"))
            .chain(constant(&self.a6))
            .collect();
        write!(
            f,
            "Elliptic Curve defined by {} = {} over {}",
            lhs.join(" + "),
            rhs.join(" + "),
            self.field
        )
    }
}
