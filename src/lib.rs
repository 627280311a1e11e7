//! # ecc-elgamal - EC-ElGamal over finite fields
//!
//! Elliptic-curve ElGamal encryption over prime fields GF(p) and extension
//! fields GF(p^n), with curves in general Weierstrass form.
//!
//! ## Features
//!
//! - **Finite Fields**: GF(p) residues and GF(p^n) as polynomial quotients,
//!   built on Conway polynomials so records naming only the field size agree
//!   with computer-algebra tooling
//! - **Elliptic Curves**: `y² + a1·xy + a3·y = x³ + a2·x² + a4·x + a6`,
//!   point validation, chord-tangent group law, double-and-add
//! - **Point Order**: baby-step giant-step over the Hasse interval
//! - **Cryptosystem**: encryption with a caller-supplied CSPRNG or a fixed
//!   ephemeral scalar, decryption with the private scalar
//! - **Records**: JSON key and ciphertext files
//!
//! ## Quick Start
//!
//! ```rust
//! use ecc_elgamal::{decrypt, encrypt_with_ephemeral, Curve, GaloisField, KeyMaterial, PublicKey};
//! use num_bigint::BigUint;
//!
//! // GF(17^2) with generator a, a^2 + 16a + 3 = 0
//! let field = GaloisField::from_order(&BigUint::from(289u32), 2)?;
//! let curve = Curve::parse(&field, "(2, 3, 5, 7, 11)")?;
//!
//! let g = curve.parse_point("(8 : 16*a + 7 : 1)")?;
//! let q = curve.parse_point("(7 : 13*a + 1 : 1)")?;
//! let keys = KeyMaterial::new(PublicKey::new(g, q)?, BigUint::from(13u32))?;
//!
//! let message = curve.parse_point("(12 : 2 : 1)")?;
//! let ciphertext = encrypt_with_ephemeral(keys.public_key(), &message, &BigUint::from(9u32))?;
//! assert_eq!(ciphertext.c1.to_string(), "(14 : 11*a + 12 : 1)");
//! assert_eq!(ciphertext.c2.to_string(), "(14*a + 13 : 16*a + 12 : 1)");
//! assert_eq!(decrypt(&keys, &ciphertext)?, message);
//! # Ok::<(), ecc_elgamal::Error>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`arith`] - Primality, factorisation and integer roots
//! - [`field`] - The `Field` trait and GF(p) residues
//! - [`polynomial`] - Polynomials over any field
//! - [`galois`] - GF(p^n) and its elements
//! - [`conway`] - Conway polynomials
//! - [`curve`] - Weierstrass curves
//! - [`point`] - Points and the group law
//! - [`order`] - Point order
//! - [`keys`] - Public keys and key material
//! - [`elgamal`] - Encryption and decryption
//! - [`records`] - JSON records and key files

pub mod arith;
pub mod config;
pub mod conway;
pub mod curve;
pub mod elgamal;
pub mod error;
pub mod field;
pub mod galois;
pub mod keys;
pub mod order;
pub mod point;
pub mod polynomial;
pub mod records;

// Re-export commonly used types for convenience
pub use curve::Curve;
pub use elgamal::{decrypt, encrypt, encrypt_with_ephemeral, Ciphertext};
pub use error::{Error, Result};
pub use field::{Field, Residue};
pub use galois::{FieldElement, GaloisField};
pub use keys::{KeyGenerator, KeyMaterial, PublicKey};
pub use point::Point;
pub use polynomial::Polynomial;
pub use records::{CiphertextRecord, PrivateKeyRecord, PublicKeyRecord};
