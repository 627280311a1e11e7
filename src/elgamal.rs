//! EC-ElGamal over a [`PublicKey`]
//!
//! A message point M is hidden as `(C1, C2) = (k·G, M + k·Q)` for an
//! ephemeral scalar k; the holder of d with Q = d·G recovers
//! `M = C2 - d·C1`. Every call is a pure function of its inputs and the
//! randomness passed in.

use crate::error::{Error, Result};
use crate::keys::{KeyMaterial, PublicKey};
use crate::point::Point;
use num_bigint::BigUint;
use num_traits::One;
use rand::CryptoRng;
use tracing::debug;

/// Ciphertext pair on the key's curve
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub c1: Point,
    pub c2: Point,
}

/// Encrypts `message` with a fresh ephemeral scalar drawn from `rng`
pub fn encrypt<R: CryptoRng + ?Sized>(
    public_key: &PublicKey,
    message: &Point,
    rng: &mut R,
) -> Result<Ciphertext> {
    let k = ephemeral_scalar(public_key.order()?, rng)?;
    encrypt_with_ephemeral(public_key, message, &k)
}

/// Encrypts with a caller-chosen ephemeral scalar `k` in [1, q - 1]
///
/// Reusing k across messages reveals the difference of the plaintexts.
pub fn encrypt_with_ephemeral(
    public_key: &PublicKey,
    message: &Point,
    k: &BigUint,
) -> Result<Ciphertext> {
    if message.curve() != public_key.curve() {
        return Err(Error::CurveMismatch);
    }
    let q = public_key.order()?;
    if k.bits() == 0 || k >= q {
        return Err(Error::InvalidScalar(format!(
            "ephemeral scalar must lie in [1, {}]",
            q - BigUint::one()
        )));
    }

    let c1 = public_key.generator().multiply_unsigned(k)?;
    let shared = public_key.point().multiply_unsigned(k)?;
    let c2 = message.add(&shared)?;
    debug!(c1 = %c1, c2 = %c2, "encrypted message point");
    Ok(Ciphertext { c1, c2 })
}

/// Recovers the message point: `M = C2 - d·C1`
pub fn decrypt(key_material: &KeyMaterial, ciphertext: &Ciphertext) -> Result<Point> {
    let curve = key_material.public_key().curve();
    if ciphertext.c1.curve() != curve || ciphertext.c2.curve() != curve {
        return Err(Error::CurveMismatch);
    }
    let shared = ciphertext.c1.multiply_unsigned(key_material.private_key())?;
    ciphertext.c2.add(&shared.negate())
}

/// Uniform scalar in [1, q - 1]
///
/// Rejection sampling on `bits(q - 2)` random bits keeps the distribution
/// uniform; each draw is accepted with probability above one half.
pub fn ephemeral_scalar<R: CryptoRng + ?Sized>(q: &BigUint, rng: &mut R) -> Result<BigUint> {
    if q < &BigUint::from(2u32) {
        return Err(Error::InvalidScalar(format!(
            "group order {} leaves no scalar in [1, q - 1]",
            q
        )));
    }
    let range = q - BigUint::one();
    let bound = &range - BigUint::one();
    let bits = bound.bits();
    if bits == 0 {
        return Ok(BigUint::one());
    }

    let byte_len = bits.div_ceil(8) as usize;
    let excess = byte_len as u64 * 8 - bits;
    let mut bytes = vec![0u8; byte_len];
    loop {
        rng.fill_bytes(&mut bytes);
        let candidate = BigUint::from_bytes_be(&bytes) >> excess;
        if candidate <= bound {
            return Ok(candidate + BigUint::one());
        }
    }
}
