//! Password hashing and verification for accounts

use sha2::{Digest, Sha256};

/// Hash a password to its storage form: SHA-256 over the UTF-8 bytes,
/// rendered as 64 chars of lowercase hex. Deterministic, any input valid.
pub fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password against a stored digest.
///
/// The comparison is ASCII case-insensitive so digests recorded as
/// uppercase hex still verify.
pub fn verify(password: &str, stored_digest: &str) -> bool {
    digest(password).eq_ignore_ascii_case(stored_digest)
}
