//! One-way password hashing with bcrypt.
//!
//! Hashing runs on the blocking thread pool so a high work factor never
//! stalls the async executor.

use crate::config::{DEFAULT_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{hash, verify};

/// Upper bound on the bcrypt work factor (mirrors the crate's private `MAX_COST`).
const BCRYPT_MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt work factor.
    pub fn new(cost: u32) -> ServiceResult<Self> {
        if !(MIN_BCRYPT_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(ServiceError::internal_error(format!(
                "bcrypt cost must be between {} and {}",
                MIN_BCRYPT_COST,
                BCRYPT_MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Function to hash a password before storing in database
    ///
    /// # Errors
    /// Returns `ServiceError::InternalError` if hashing fails
    pub async fn hash(&self, password: &str) -> ServiceResult<String> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Password hashing aborted: {}", e)))?
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, password_hash: &str) -> bool {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        match tokio::task::spawn_blocking(move || verify(password, &password_hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::warn!("Password verification failed: {}", e);
                false
            }
            Err(e) => {
                tracing::error!("Password verification aborted: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_bounds() {
        assert!(PasswordHasher::new(4).is_err());
        assert!(PasswordHasher::new(32).is_err());
        assert_eq!(PasswordHasher::new(10).unwrap().cost(), 10);
        assert_eq!(PasswordHasher::default().cost(), 12);
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(10).unwrap();
        let first = hasher.hash("Secur3!aa").await.unwrap();
        let second = hasher.hash("Secur3!aa").await.unwrap();

        assert_ne!(first, "Secur3!aa");
        // Salted: equal inputs give different hashes.
        assert_ne!(first, second);
        assert!(hasher.verify("Secur3!aa", &first).await);
        assert!(!hasher.verify("Secur3!ab", &first).await);
    }

    #[tokio::test]
    async fn test_garbage_hash_is_mismatch() {
        let hasher = PasswordHasher::new(10).unwrap();
        assert!(!hasher.verify("Secur3!aa", "not-a-bcrypt-hash").await);
    }
}
