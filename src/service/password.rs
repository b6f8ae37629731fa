use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::PasswordScheme;
use crate::error::CrmError;

const LEGACY_DIGEST_LEN: usize = 64;

/// Hash a password with the configured scheme.
pub fn hash_password(scheme: PasswordScheme, password: &str) -> Result<String, CrmError> {
    match scheme {
        PasswordScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| CrmError::PasswordHash(e.to_string()))
        }
        PasswordScheme::Sha256 => Ok(legacy_digest(password)),
    }
}

/// Check `password` against a stored hash in either supported format.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.starts_with('$') {
        let Ok(parsed) = PasswordHash::new(stored) else {
            warn!("stored password hash is not a valid PHC string");
            return false;
        };
        return Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
    }

    if is_legacy_digest(stored) {
        let expected = legacy_digest(password);
        return bool::from(
            expected
                .as_bytes()
                .ct_eq(stored.to_ascii_lowercase().as_bytes()),
        );
    }

    warn!("stored password hash has an unknown format");
    false
}

/// Unsalted SHA-256 over the UTF-8 bytes, as lowercase hex.
pub fn legacy_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_legacy_digest(s: &str) -> bool {
    s.len() == LEGACY_DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_digest_matches_known_vector() {
        assert_eq!(
            legacy_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn argon2_hashes_are_salted_and_verify() {
        let a = hash_password(PasswordScheme::Argon2, "pw1").unwrap();
        let b = hash_password(PasswordScheme::Argon2, "pw1").unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(verify_password("pw1", &a));
        assert!(verify_password("pw1", &b));
        assert!(!verify_password("pw2", &a));
    }

    #[test]
    fn sha256_scheme_is_verifiable() {
        let h = hash_password(PasswordScheme::Sha256, "pw1").unwrap();
        assert_eq!(h.len(), 64);
        assert!(verify_password("pw1", &h));
        assert!(!verify_password("pw2", &h));
        assert!(verify_password("pw1", &h.to_ascii_uppercase()));
    }

    #[test]
    fn unknown_formats_never_verify() {
        assert!(!verify_password("pw1", "pw1"));
        assert!(!verify_password("", ""));
        assert!(!verify_password("pw1", "$not-a-phc-string"));
    }
}
