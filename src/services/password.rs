use crate::errors::{AppError, Result};

/// bcrypt hashing, run on the blocking pool so request tasks keep moving.
#[derive(Clone, Copy, Debug)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?;

        match outcome {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!("Stored password hash could not be checked: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let passwords = PasswordService::new(4);
        let hash = passwords.hash("secret1").await.unwrap();

        assert_ne!(hash, "secret1");
        assert!(passwords.verify("secret1", &hash).await.unwrap());
        assert!(!passwords.verify("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        let passwords = PasswordService::new(4);
        assert!(!passwords.verify("secret1", "not-a-hash").await.unwrap());
    }
}
