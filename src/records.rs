//! JSON records exchanged through the working directory
//!
//! Every value is a string so the files stay readable by computer-algebra
//! tooling: points as `(x : y : z)`, coefficients as `(a1, a2, a3, a4, a6)`,
//! integers in decimal.

use crate::arith::exact_root;
use crate::config::{DEFAULT_SYMBOL, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::curve::Curve;
use crate::elgamal::Ciphertext;
use crate::error::{Error, Result};
use crate::galois::GaloisField;
use crate::keys::{KeyGenerator, KeyMaterial, PublicKey};
use num_bigint::BigUint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

// ==================== Public Key ====================

/// Public-key record
///
/// `field_order` is the size p^n of the field, not its characteristic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRecord {
    pub public_key: String,
    pub generator: String,
    pub coefficients: String,
    pub field_order: String,
    pub field_degree: String,
    /// Defining polynomial in the generator symbol; Conway when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_order: Option<String>,
    /// Generator symbol used in every field element above; `a` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl PublicKeyRecord {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let curve = public_key.curve();
        let field = curve.field();
        let coefficients: Vec<String> = curve
            .a_invariants()
            .iter()
            .map(|c| c.to_string())
            .collect();
        PublicKeyRecord {
            public_key: public_key.point().to_string(),
            generator: public_key.generator().to_string(),
            coefficients: format!("({})", coefficients.join(", ")),
            field_order: field.order().to_string(),
            field_degree: field.degree().to_string(),
            modulus: (field.degree() > 1).then(|| field.modulus_string()),
            generator_order: public_key.known_order().map(BigUint::to_string),
            symbol: (field.symbol() != DEFAULT_SYMBOL).then(|| field.symbol().to_string()),
        }
    }

    /// Rebuilds field, curve and points, validating each
    pub fn to_public_key(&self) -> Result<PublicKey> {
        let field = self.field()?;
        let curve = Curve::parse(&field, &self.coefficients)?;
        let generator = curve.parse_point(&self.generator)?;
        let point = curve.parse_point(&self.public_key)?;
        let public_key = PublicKey::new(generator, point)?;
        match &self.generator_order {
            Some(order) => public_key.with_generator_order(parse_number(order)?),
            None => Ok(public_key),
        }
    }

    fn field(&self) -> Result<Arc<GaloisField>> {
        let order: BigUint = parse_number(&self.field_order)?;
        let degree: usize = parse_number(&self.field_degree)?;
        let symbol = self.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);
        let Some(modulus) = &self.modulus else {
            let field = GaloisField::from_order(&order, degree)?;
            return if symbol == DEFAULT_SYMBOL {
                Ok(field)
            } else {
                field.with_symbol(symbol)
            };
        };

        let p = u32::try_from(degree)
            .ok()
            .and_then(|k| exact_root(&order, k))
            .ok_or_else(|| {
                Error::InvalidField(format!("{} is not a {}-th power", order, degree))
            })?;
        GaloisField::with_modulus_text(p, modulus, symbol, degree)
    }
}

// ==================== Private Key ====================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrivateKeyRecord {
    pub private_key: String,
}

impl PrivateKeyRecord {
    pub fn from_key_material(key_material: &KeyMaterial) -> Self {
        PrivateKeyRecord {
            private_key: key_material.private_key().to_string(),
        }
    }

    /// Combines with the public key, checking `Q = d·G`
    pub fn to_key_material(&self, public_key: PublicKey) -> Result<KeyMaterial> {
        KeyMaterial::new(public_key, parse_number(&self.private_key)?)
    }
}

// ==================== Ciphertext ====================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CiphertextRecord {
    #[serde(rename = "C1")]
    pub c1: String,
    #[serde(rename = "C2")]
    pub c2: String,
}

impl CiphertextRecord {
    pub fn from_ciphertext(ciphertext: &Ciphertext) -> Self {
        CiphertextRecord {
            c1: ciphertext.c1.to_string(),
            c2: ciphertext.c2.to_string(),
        }
    }

    pub fn to_ciphertext(&self, curve: &Arc<Curve>) -> Result<Ciphertext> {
        Ok(Ciphertext {
            c1: curve.parse_point(&self.c1)?,
            c2: curve.parse_point(&self.c2)?,
        })
    }
}

// ==================== Files ====================

/// Reads and decodes a JSON record
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&text)
}

/// Writes a record as two-space indented JSON
pub fn save<T: Serialize>(record: &T, path: &Path) -> Result<()> {
    let json = to_json(record)?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote record");
    Ok(())
}

pub fn to_json<T: Serialize>(record: &T) -> Result<String> {
    serde_json::to_string_pretty(record)
        .map_err(|e| Error::parse("record", format!("JSON serialization error: {}", e)))
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::parse(json, format!("JSON deserialization error: {}", e)))
}

/// Writes the public and private records for `key_material` into `dir`
pub fn write_key_files(key_material: &KeyMaterial, dir: &Path) -> Result<()> {
    let public = PublicKeyRecord::from_public_key(key_material.public_key());
    save(&public, &dir.join(PUBLIC_KEY_FILE))?;
    save(
        &PrivateKeyRecord::from_key_material(key_material),
        &dir.join(PRIVATE_KEY_FILE),
    )
}

/// Runs a [`KeyGenerator`] and stores its output with [`write_key_files`]
pub fn generate_key_files<G: KeyGenerator + ?Sized>(
    generator: &G,
    mode: u32,
    args: &[String],
    dir: &Path,
) -> Result<KeyMaterial> {
    let key_material = generator.generate_key_material(mode, args)?;
    write_key_files(&key_material, dir)?;
    Ok(key_material)
}

fn parse_number<T: FromStr>(text: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e: T::Err| Error::parse(text, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "public_key": "(7 : 13*a + 1 : 1)",
  "generator": "(8 : 16*a + 7 : 1)",
  "coefficients": "(2, 3, 5, 7, 11)",
  "field_order": "289",
  "field_degree": "2"
}"#;

    #[test]
    fn test_sample_public_key() {
        let record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        let public_key = record.to_public_key().unwrap();
        assert_eq!(
            public_key.curve().field().to_string(),
            "Finite Field in a of size 17^2"
        );
        assert_eq!(public_key.generator().to_string(), "(8 : 16*a + 7 : 1)");
        assert_eq!(public_key.order().unwrap(), &BigUint::from(19u32));
    }

    #[test]
    fn test_written_record_reads_back() {
        let record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        let public_key = record.to_public_key().unwrap();
        public_key.order().unwrap();

        let written = PublicKeyRecord::from_public_key(&public_key);
        assert_eq!(written.modulus.as_deref(), Some("a^2 + 16*a + 3"));
        assert_eq!(written.generator_order.as_deref(), Some("19"));
        assert_eq!(written.coefficients, "(2, 3, 5, 7, 11)");

        let json = to_json(&written).unwrap();
        assert!(json.contains("\n  \"field_order\": \"289\""));
        let reread: PublicKeyRecord = from_json(&json).unwrap();
        assert_eq!(reread.to_public_key().unwrap(), public_key);
    }

    #[test]
    fn test_base_field_key_rejected() {
        let json = SAMPLE.replace("field_order", "base_field");
        assert!(matches!(
            from_json::<PublicKeyRecord>(&json),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_numbers() {
        let mut record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        record.field_degree = "two".into();
        assert!(matches!(record.to_public_key(), Err(Error::Parse { .. })));

        let mut record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        record.field_order = "290".into();
        assert!(matches!(
            record.to_public_key(),
            Err(Error::InvalidField(_))
        ));
    }

    #[test]
    fn test_explicit_modulus_must_match_degree() {
        let mut record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        record.modulus = Some("a^3 + a + 3".into());
        assert!(record.to_public_key().is_err());
    }

    #[test]
    fn test_oversized_modulus_power() {
        for modulus in ["a^18446744073709551615 + 1", "a^1000000000000 + 1"] {
            let mut record: PublicKeyRecord = from_json(SAMPLE).unwrap();
            record.modulus = Some(modulus.into());
            assert!(
                matches!(record.to_public_key(), Err(Error::Parse { .. })),
                "{}",
                modulus
            );
        }
    }

    #[test]
    fn test_custom_symbol_reads_back() {
        let field = GaloisField::from_order(&BigUint::from(289u32), 2)
            .unwrap()
            .with_symbol("z")
            .unwrap();
        let curve = Curve::parse(&field, "(2, 3, 5, 7, 11)").unwrap();
        let generator = curve.parse_point("(8 : 16*z + 7 : 1)").unwrap();
        let point = generator.multiply_unsigned(&BigUint::from(13u32)).unwrap();
        let public_key = PublicKey::new(generator, point).unwrap();

        let written = PublicKeyRecord::from_public_key(&public_key);
        assert_eq!(written.symbol.as_deref(), Some("z"));
        assert_eq!(written.modulus.as_deref(), Some("z^2 + 16*z + 3"));
        assert_eq!(written.generator, "(8 : 16*z + 7 : 1)");

        let reread: PublicKeyRecord = from_json(&to_json(&written).unwrap()).unwrap();
        let restored = reread.to_public_key().unwrap();
        assert_eq!(restored, public_key);
        assert_eq!(restored.curve().field().symbol(), "z");

        // Without the modulus the Conway field still takes the symbol
        let mut conway = written.clone();
        conway.modulus = None;
        assert_eq!(conway.to_public_key().unwrap(), public_key);
    }

    #[test]
    fn test_default_symbol_not_written() {
        let record: PublicKeyRecord = from_json(SAMPLE).unwrap();
        let written = PublicKeyRecord::from_public_key(&record.to_public_key().unwrap());
        assert_eq!(written.symbol, None);
        assert!(!to_json(&written).unwrap().contains("symbol"));
    }

    #[test]
    fn test_ciphertext_record_keys() {
        let record = CiphertextRecord {
            c1: "(14 : 11*a + 12 : 1)".into(),
            c2: "(14*a + 13 : 16*a + 12 : 1)".into(),
        };
        let json = to_json(&record).unwrap();
        assert!(json.contains("\"C1\": \"(14 : 11*a + 12 : 1)\""));
        assert!(json.contains("\"C2\": \"(14*a + 13 : 16*a + 12 : 1)\""));
        assert_eq!(from_json::<CiphertextRecord>(&json).unwrap(), record);
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("definitely/not/here.json");
        match load::<PrivateKeyRecord>(path) {
            Err(Error::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
