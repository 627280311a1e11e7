//! Property-based tests for field and group laws

use ecc_elgamal::{
    decrypt, encrypt_with_ephemeral, Curve, Field, FieldElement, GaloisField, KeyMaterial, Point,
    PublicKey,
};
use num_bigint::{BigInt, BigUint};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::sync::Arc;

static FIELD: Lazy<Arc<GaloisField>> =
    Lazy::new(|| GaloisField::from_order(&BigUint::from(289u32), 2).unwrap());

static CURVE: Lazy<Arc<Curve>> = Lazy::new(|| Curve::parse(&FIELD, "(2, 3, 5, 7, 11)").unwrap());

static GENERATOR: Lazy<Point> = Lazy::new(|| CURVE.parse_point("(8 : 16*a + 7 : 1)").unwrap());

const ORDER: u32 = 19;

/// Any element of GF(17^2)
fn element() -> impl Strategy<Value = FieldElement> {
    (0u32..17, 0u32..17)
        .prop_map(|(c0, c1)| FIELD.from_coefficients(&[BigUint::from(c0), BigUint::from(c1)]))
}

fn nonzero_element() -> impl Strategy<Value = FieldElement> {
    element().prop_filter("non-zero", |e| !e.is_zero())
}

/// A multiple of the generator
fn point() -> impl Strategy<Value = Point> {
    (0u32..ORDER).prop_map(|k| GENERATOR.multiply_unsigned(&BigUint::from(k)).unwrap())
}

proptest! {
    #[test]
    fn field_inverse(a in nonzero_element()) {
        let inv = a.inv().unwrap();
        prop_assert!((&a * &inv).is_one());
    }

    #[test]
    fn field_add_sub(a in element(), b in element()) {
        prop_assert_eq!(&(&a + &b) - &b, a);
    }

    #[test]
    fn field_commutative_associative(a in element(), b in element(), c in element()) {
        prop_assert_eq!(&a + &b, &b + &a);
        prop_assert_eq!(&a * &b, &b * &a);
        prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
        // Distributivity
        prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
    }

    #[test]
    fn field_text_round_trip(a in element()) {
        prop_assert_eq!(FIELD.parse(&a.to_string()).unwrap(), a);
    }

    #[test]
    fn group_identity_and_inverse(p in point()) {
        let o = CURVE.infinity();
        prop_assert_eq!(p.add(&o).unwrap(), p.clone());
        prop_assert!(p.add(&p.negate()).unwrap().is_infinity());
    }

    #[test]
    fn group_commutative_associative(p in point(), q in point(), r in point()) {
        prop_assert_eq!(p.add(&q).unwrap(), q.add(&p).unwrap());
        let left = p.add(&q).unwrap().add(&r).unwrap();
        let right = p.add(&q.add(&r).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn scalar_homomorphism(a in 0u32..200, b in 0u32..200, p in point()) {
        let ab = p
            .multiply_unsigned(&BigUint::from(b))
            .unwrap()
            .multiply_unsigned(&BigUint::from(a))
            .unwrap();
        let reduced = (a * b) % ORDER;
        prop_assert_eq!(ab, p.multiply_unsigned(&BigUint::from(reduced)).unwrap());
    }

    #[test]
    fn negative_scalars(k in -100i64..100, p in point()) {
        let expected = p.multiply(&BigInt::from(k.abs())).unwrap();
        let expected = if k < 0 { expected.negate() } else { expected };
        prop_assert_eq!(p.multiply(&BigInt::from(k)).unwrap(), expected);
    }

    #[test]
    fn point_text_round_trip(p in point()) {
        prop_assert_eq!(CURVE.parse_point(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn encryption_round_trip(d in 1u32..ORDER, k in 1u32..ORDER, m in point()) {
        let q = GENERATOR.multiply_unsigned(&BigUint::from(d)).unwrap();
        let public_key = PublicKey::new(GENERATOR.clone(), q)
            .unwrap()
            .with_generator_order(BigUint::from(ORDER))
            .unwrap();
        let keys = KeyMaterial::new(public_key, BigUint::from(d)).unwrap();
        let ciphertext = encrypt_with_ephemeral(keys.public_key(), &m, &BigUint::from(k)).unwrap();
        prop_assert_eq!(decrypt(&keys, &ciphertext).unwrap(), m);
    }
}
