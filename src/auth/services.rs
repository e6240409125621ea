use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use md5::{Digest, Md5};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use tracing::error;

use crate::config::PasswordScheme;

/// Random bytes behind every bearer token.
pub const TOKEN_BYTES: usize = 32;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn md5_hex(plain: &str) -> String {
    hex::encode(Md5::digest(plain.as_bytes()))
}

fn is_md5_hex(hash: &str) -> bool {
    hash.len() == 32 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn hash_password(scheme: PasswordScheme, plain: &str) -> anyhow::Result<String> {
    match scheme {
        PasswordScheme::Md5 => Ok(md5_hex(plain)),
        PasswordScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(plain.as_bytes(), &salt)
                .map_err(|e| {
                    error!(error = %e, "argon2 hash_password error");
                    anyhow::anyhow!(e.to_string())
                })?
                .to_string();
            Ok(hash)
        }
    }
}

/// Checks `plain` against a stored digest. Legacy MD5 digests must be
/// stored as lowercase hex and are compared byte-for-byte; argon2 PHC strings
/// go through argon2. Any other stored format is an error, not a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    if hash.starts_with("$argon2") {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        return Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok());
    }
    if is_md5_hex(hash) {
        return Ok(md5_hex(plain).as_bytes() == hash.as_bytes());
    }
    anyhow::bail!("unrecognized password hash format")
}

/// Opaque bearer token: OS randomness, hex encoded. Not signed and not
/// recorded anywhere server-side.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
