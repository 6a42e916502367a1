use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// An Argon2 PHC string. Only produced by hashing or by reading a stored user back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub(crate) fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<PasswordDigest> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(PasswordDigest(hash))
}

pub fn verify_password(plain: &str, digest: &PasswordDigest) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest.as_str()).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn spawn_hash(plain: String) -> anyhow::Result<PasswordDigest> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("hash task panicked")?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn spawn_verify(plain: String, digest: PasswordDigest) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &digest))
        .await
        .context("verify task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let digest = PasswordDigest::from_stored("not-a-valid-hash".into());
        let err = verify_password("anything", &digest).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn background_helpers_agree_with_sync_ones() {
        let digest = spawn_hash("admin123".into()).await.unwrap();
        assert!(spawn_verify("admin123".into(), digest.clone()).await.unwrap());
        assert!(!spawn_verify("admin124".into(), digest).await.unwrap());
    }
}
