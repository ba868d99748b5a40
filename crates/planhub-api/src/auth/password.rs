//! Password hashing.

use planhub_core::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        AppError::Internal("Failed to hash password".to_string())
    })
}

/// Any verification failure (including a malformed stored hash) reads as a
/// mismatch; login then fails with the generic invalid-credentials error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("Tr0ub4dor&3", &hash));
    }

    #[test]
    fn test_malformed_hash_reads_as_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
