use ecc_elgamal::config::{CIPHERTEXT_FILE, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use ecc_elgamal::records::{
    self, generate_key_files, CiphertextRecord, PrivateKeyRecord, PublicKeyRecord,
};
use ecc_elgamal::{
    decrypt, encrypt, Curve, Error, GaloisField, KeyGenerator, KeyMaterial, Result,
};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

/// Mode 0 uses the sample curve over GF(17^2); mode 1 reads
/// `<p> <a4> <a6> <x> <y>` for a short Weierstrass curve over GF(p)
struct FixtureGenerator {
    seed: u64,
}

impl KeyGenerator for FixtureGenerator {
    fn generate_key_material(&self, mode: u32, args: &[String]) -> Result<KeyMaterial> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        match mode {
            0 => {
                let field = GaloisField::from_order(&BigUint::from(289u32), 2)?;
                let curve = Curve::parse(&field, "(2, 3, 5, 7, 11)")?;
                let g = curve.parse_point("(8 : 16*a + 7 : 1)")?;
                KeyMaterial::generate(g, &mut rng)
            }
            1 => {
                let [p, a4, a6, x, y] = args else {
                    return Err(Error::Argument(format!("expected 5 arguments, got {}", args.len())));
                };
                let p: BigUint = p
                    .parse()
                    .map_err(|_| Error::Argument(format!("bad prime {}", p)))?;
                let field = GaloisField::prime(p)?;
                let curve = Curve::short(&field, field.parse(a4)?, field.parse(a6)?)?;
                let g = curve.affine_point(field.parse(x)?, field.parse(y)?)?;
                KeyMaterial::generate(g, &mut rng)
            }
            other => Err(Error::Argument(format!("unknown mode {}", other))),
        }
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ecc-elgamal-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_key_files_through_encryption() {
    let dir = scratch_dir("round-trip");
    let generator = FixtureGenerator { seed: 11 };
    let generated = generate_key_files(&generator, 0, &[], &dir).unwrap();

    // Only the public file is needed to encrypt
    let public: PublicKeyRecord = records::load(&dir.join(PUBLIC_KEY_FILE)).unwrap();
    assert_eq!(public.field_order, "289");
    assert_eq!(public.field_degree, "2");
    let public_key = public.to_public_key().unwrap();
    let m = public_key.curve().parse_point("(12 : 2 : 1)").unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let ciphertext = encrypt(&public_key, &m, &mut rng).unwrap();
    let cipher_path = dir.join(CIPHERTEXT_FILE);
    records::save(&CiphertextRecord::from_ciphertext(&ciphertext), &cipher_path).unwrap();

    // The receiver combines both key files
    let private: PrivateKeyRecord = records::load(&dir.join(PRIVATE_KEY_FILE)).unwrap();
    let keys = private.to_key_material(public_key.clone()).unwrap();
    assert_eq!(keys.private_key(), generated.private_key());

    let stored: CiphertextRecord = records::load(&cipher_path).unwrap();
    let ciphertext = stored.to_ciphertext(public_key.curve()).unwrap();
    assert_eq!(decrypt(&keys, &ciphertext).unwrap(), m);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_prime_field_key_files() {
    let dir = scratch_dir("prime-field");
    let generator = FixtureGenerator { seed: 5 };
    let args: Vec<String> = ["17", "2", "2", "5", "1"].iter().map(|s| s.to_string()).collect();
    generate_key_files(&generator, 1, &args, &dir).unwrap();

    let public: PublicKeyRecord = records::load(&dir.join(PUBLIC_KEY_FILE)).unwrap();
    assert_eq!(public.field_order, "17");
    assert_eq!(public.field_degree, "1");
    assert_eq!(public.modulus, None);
    assert_eq!(public.coefficients, "(0, 0, 0, 2, 2)");
    assert_eq!(public.generator_order.as_deref(), Some("19"));

    let private: PrivateKeyRecord = records::load(&dir.join(PRIVATE_KEY_FILE)).unwrap();
    let keys = private.to_key_material(public.to_public_key().unwrap()).unwrap();
    assert!(keys.private_key() < &BigUint::from(19u32));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_written_public_key_format() {
    let dir = scratch_dir("format");
    generate_key_files(&FixtureGenerator { seed: 1 }, 0, &[], &dir).unwrap();
    let text = fs::read_to_string(dir.join(PUBLIC_KEY_FILE)).unwrap();
    assert!(text.starts_with("{\n  \"public_key\": \"("));
    assert!(text.contains("\"field_order\": \"289\""));
    assert!(!text.contains("base_field"));

    let private = fs::read_to_string(dir.join(PRIVATE_KEY_FILE)).unwrap();
    assert!(private.starts_with("{\n  \"private_key\": \""));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_base_field_record_is_rejected() {
    // Older readers expected `base_field`; the writer emits `field_order`
    let dir = scratch_dir("base-field");
    let path = dir.join(PUBLIC_KEY_FILE);
    fs::write(
        &path,
        r#"{
  "public_key": "(7 : 13*a + 1 : 1)",
  "generator": "(8 : 16*a + 7 : 1)",
  "coefficients": "(2, 3, 5, 7, 11)",
  "base_field": "17",
  "field_degree": "2"
}"#,
    )
    .unwrap();
    let loaded = records::load::<PublicKeyRecord>(&path);
    match loaded {
        Err(Error::Parse { reason, .. }) => assert!(reason.contains("field_order")),
        other => panic!("expected a parse error, got {:?}", other),
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_tampered_private_key() {
    let dir = scratch_dir("tampered");
    let generated = generate_key_files(&FixtureGenerator { seed: 8 }, 0, &[], &dir).unwrap();
    let public: PublicKeyRecord = records::load(&dir.join(PUBLIC_KEY_FILE)).unwrap();

    // d + 1, with 18 wrapping to 1, stays in range but breaks Q = d·G
    let wrong = generated.private_key() % BigUint::from(18u32) + BigUint::from(1u32);
    let record = PrivateKeyRecord {
        private_key: wrong.to_string(),
    };
    assert!(matches!(
        record.to_key_material(public.to_public_key().unwrap()),
        Err(Error::InvalidKey(_))
    ));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unknown_generator_mode() {
    let dir = scratch_dir("unknown-mode");
    assert!(matches!(
        generate_key_files(&FixtureGenerator { seed: 0 }, 7, &[], &dir),
        Err(Error::Argument(_))
    ));
    assert!(!dir.join(PUBLIC_KEY_FILE).exists());
    fs::remove_dir_all(&dir).unwrap();
}
