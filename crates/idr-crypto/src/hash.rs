//! Digest functions for password credentials.
//!
//! The SHA family is computed with aws-lc-rs; MD5, which aws-lc-rs does not
//! expose, comes from the `md5` crate.

use aws_lc_rs::digest;

use crate::algorithm::DigestAlgorithm;

/// Computes a digest of the input data.
#[must_use]
pub fn hash(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    let alg = match algorithm {
        DigestAlgorithm::Md5 => return md5::compute(data).0.to_vec(),
        DigestAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
        DigestAlgorithm::Sha256 => &digest::SHA256,
        DigestAlgorithm::Sha384 => &digest::SHA384,
        DigestAlgorithm::Sha512 => &digest::SHA512,
        DigestAlgorithm::Sha512_256 => &digest::SHA512_256,
    };

    digest::digest(alg, data).as_ref().to_vec()
}

/// Builds the digest input `username ":" realm ":" password`.
#[must_use]
pub fn user_realm_input(username: &str, realm: &str, password: &str) -> Vec<u8> {
    let mut input = Vec::with_capacity(username.len() + realm.len() + password.len() + 2);
    input.extend_from_slice(username.as_bytes());
    input.push(b':');
    input.extend_from_slice(realm.as_bytes());
    input.push(b':');
    input.extend_from_slice(password.as_bytes());
    input
}

/// Computes `H(username ":" realm ":" password)`, the digest stored for a
/// pre-hashed users-file entry.
#[must_use]
pub fn user_realm_digest(
    algorithm: DigestAlgorithm,
    username: &str,
    realm: &str,
    password: &str,
) -> Vec<u8> {
    hash(algorithm, &user_realm_input(username, realm, password))
}

/// Compares two byte strings without short-circuiting on the first mismatch.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
