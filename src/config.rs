//! Fixed names and tuning constants
//!
//! The tools exchange data through flat files in the working directory, so
//! the names are part of the interface shared with the key-generation side.

/// Public-key record written by key generation and read by `encrypt`
pub const PUBLIC_KEY_FILE: &str = "ecc_public_key.txt";

/// Private-key record written by key generation
pub const PRIVATE_KEY_FILE: &str = "ecc_private_key.txt";

/// Ciphertext record written by `encrypt`
pub const CIPHERTEXT_FILE: &str = "ecc_ciphertext.txt";

/// Symbol printed for the generator of an extension field
pub const DEFAULT_SYMBOL: &str = "a";

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Trial division runs up to this bound before switching to Pollard rho
pub const TRIAL_DIVISION_BOUND: u64 = 1 << 16;

/// Pollard rho iterations per attempt before giving up on a cofactor
pub const RHO_ITERATION_LIMIT: u64 = 1 << 22;

/// Largest baby-step table built when computing a point order
pub const BSGS_STEP_LIMIT: u64 = 1 << 22;
