//! Password hashing utilities

use anyhow::{bail, Context, Result};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;
const SCHEME: &str = "pbkdf2_sha256";

/// hash a password using pbkdf2-sha256 with a fresh random salt
///
/// the result is self-describing: `pbkdf2_sha256$<iterations>$<salt>$<hash>`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, PBKDF2_ITERATIONS);

    format!(
        "{}${}${}${}",
        SCHEME,
        PBKDF2_ITERATIONS,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// verify a password against a stored hash using constant-time comparison
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parts: Vec<&str> = stored.split('$').collect();
    if parts.len() != 4 || parts[0] != SCHEME {
        bail!("Unrecognized password hash format");
    }

    let iterations: u32 = parts[1]
        .parse()
        .context("Invalid iteration count in password hash")?;
    let salt = hex::decode(parts[2]).context("Invalid salt in password hash")?;
    let expected = hex::decode(parts[3]).context("Invalid digest in password hash")?;

    let computed = derive(password, &salt, iterations);

    Ok(computed.as_slice().ct_eq(expected.as_slice()).into())
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}
