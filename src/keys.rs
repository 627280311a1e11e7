//! Key material consumed by the cryptosystem
//!
//! Curves and private scalars are chosen by a key-generation collaborator,
//! modelled by [`KeyGenerator`]. This module only checks the algebraic
//! relations it hands over.

use crate::arith::prime_factors;
use crate::curve::Curve;
use crate::elgamal::ephemeral_scalar;
use crate::error::{Error, Result};
use crate::point::Point;
use num_bigint::BigUint;
use num_traits::Zero;
use once_cell::sync::OnceCell;
use rand::CryptoRng;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Generator G, public point Q and the (possibly cached) order of G
#[derive(Clone, Debug)]
pub struct PublicKey {
    curve: Arc<Curve>,
    generator: Point,
    point: Point,
    generator_order: OnceCell<BigUint>,
}

impl PublicKey {
    pub fn new(generator: Point, point: Point) -> Result<Self> {
        if !generator.same_curve(&point) {
            return Err(Error::InvalidKey(
                "generator and public point lie on different curves".into(),
            ));
        }
        if generator.is_infinity() {
            return Err(Error::InvalidKey("generator is the point at infinity".into()));
        }
        Ok(PublicKey {
            curve: Arc::clone(generator.curve()),
            generator,
            point,
            generator_order: OnceCell::new(),
        })
    }

    /// Attaches a known order of G instead of computing it on first use
    pub fn with_generator_order(self, order: BigUint) -> Result<Self> {
        if !self.is_order_of_generator(&order)? {
            return Err(Error::InvalidKey(format!(
                "{} is not the order of {}",
                order, self.generator
            )));
        }
        Ok(PublicKey {
            generator_order: OnceCell::with_value(order),
            ..self
        })
    }

    /// n·G = O while (n/r)·G != O for every prime r dividing n
    fn is_order_of_generator(&self, n: &BigUint) -> Result<bool> {
        if n.is_zero() || !self.generator.multiply_unsigned(n)?.is_infinity() {
            return Ok(false);
        }
        for r in prime_factors(n)? {
            if self.generator.multiply_unsigned(&(n / &r))?.is_infinity() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Order of G, computed once and cached
    pub fn order(&self) -> Result<&BigUint> {
        self.generator_order
            .get_or_try_init(|| self.generator.order())
    }

    /// Order of G if it is already known
    pub fn known_order(&self) -> Option<&BigUint> {
        self.generator_order.get()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.generator == other.generator && self.point == other.point
    }
}

impl Eq for PublicKey {}

/// A [`PublicKey`] together with its private scalar d
#[derive(Clone)]
pub struct KeyMaterial {
    public_key: PublicKey,
    private_key: BigUint,
}

impl KeyMaterial {
    /// Checks `1 <= d < order(G)` and `Q = d·G`
    pub fn new(public_key: PublicKey, private_key: BigUint) -> Result<Self> {
        let order = public_key.order()?;
        if private_key.is_zero() || &private_key >= order {
            return Err(Error::InvalidKey(format!(
                "private scalar out of range [1, {})",
                order
            )));
        }
        if public_key.generator.multiply_unsigned(&private_key)? != public_key.point {
            return Err(Error::InvalidKey(
                "public point is not the private scalar times the generator".into(),
            ));
        }
        Ok(KeyMaterial {
            public_key,
            private_key,
        })
    }

    /// Draws d uniformly from [1, order(G) - 1] and sets Q = d·G
    pub fn generate<R: CryptoRng + ?Sized>(generator: Point, rng: &mut R) -> Result<Self> {
        let order = generator.order()?;
        let private_key = ephemeral_scalar(&order, rng)?;
        let point = generator.multiply_unsigned(&private_key)?;
        let public_key = PublicKey::new(generator, point)?.with_generator_order(order)?;
        debug!(curve = %public_key.curve, "generated key material");
        Ok(KeyMaterial {
            public_key,
            private_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &BigUint {
        &self.private_key
    }

    pub fn into_public_key(self) -> PublicKey {
        self.public_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Source of key material, selected by a numeric mode and free-form arguments
///
/// Curve generation strategies live outside this crate; implementations
/// decide what `mode` and `args` mean.
pub trait KeyGenerator {
    fn generate_key_material(&self, mode: u32, args: &[String]) -> Result<KeyMaterial>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galois::GaloisField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_points() -> (Point, Point) {
        let field = GaloisField::from_order(&BigUint::from(289u32), 2).unwrap();
        let curve = Curve::parse(&field, "(2, 3, 5, 7, 11)").unwrap();
        (
            curve.parse_point("(8 : 16*a + 7 : 1)").unwrap(),
            curve.parse_point("(7 : 13*a + 1 : 1)").unwrap(),
        )
    }

    #[test]
    fn test_sample_key_material() {
        let (g, q) = sample_points();
        let public_key = PublicKey::new(g, q).unwrap();
        assert!(public_key.known_order().is_none());
        let keys = KeyMaterial::new(public_key, BigUint::from(13u32)).unwrap();
        assert_eq!(keys.public_key().order().unwrap(), &BigUint::from(19u32));
        assert_eq!(
            keys.public_key().known_order(),
            Some(&BigUint::from(19u32))
        );
    }

    #[test]
    fn test_wrong_private_key() {
        let (g, q) = sample_points();
        let public_key = PublicKey::new(g, q).unwrap();
        for d in [0u32, 12, 19, 32] {
            assert!(
                matches!(
                    KeyMaterial::new(public_key.clone(), BigUint::from(d)),
                    Err(Error::InvalidKey(_))
                ),
                "d = {}",
                d
            );
        }
    }

    #[test]
    fn test_generator_order_is_checked() {
        let (g, q) = sample_points();
        let public_key = PublicKey::new(g, q).unwrap();
        let known = public_key
            .clone()
            .with_generator_order(BigUint::from(19u32))
            .unwrap();
        assert_eq!(known.known_order(), Some(&BigUint::from(19u32)));
        // A proper multiple and a non-multiple are both rejected
        for wrong in [0u32, 17, 38] {
            assert!(
                matches!(
                    public_key.clone().with_generator_order(BigUint::from(wrong)),
                    Err(Error::InvalidKey(_))
                ),
                "order {}",
                wrong
            );
        }
    }

    #[test]
    fn test_infinity_generator_rejected() {
        let (g, q) = sample_points();
        let infinity = g.curve().infinity();
        assert!(matches!(
            PublicKey::new(infinity, q),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_generate() {
        let (g, _) = sample_points();
        let mut rng = StdRng::seed_from_u64(2024);
        let keys = KeyMaterial::generate(g.clone(), &mut rng).unwrap();
        let d = keys.private_key();
        assert!(!d.is_zero() && d < &BigUint::from(19u32));
        assert_eq!(&g.multiply_unsigned(d).unwrap(), keys.public_key().point());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let (g, q) = sample_points();
        let keys = KeyMaterial::new(PublicKey::new(g, q).unwrap(), BigUint::from(13u32)).unwrap();
        let debug = format!("{:?}", keys);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("private_key: 13"));
    }
}
