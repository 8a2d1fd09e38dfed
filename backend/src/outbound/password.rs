//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing is CPU-bound, so both operations run on Tokio's blocking pool.

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id hasher producing PHC strings (`$argon2id$v=19$...`).
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Option<argon2::Params>,
}

impl Argon2Hasher {
    /// Use explicit cost parameters instead of the crate defaults.
    pub fn with_params(params: argon2::Params) -> Self {
        Self {
            params: Some(params),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(
                argon2::Algorithm::Argon2id,
                argon2::Version::V0x13,
                params.clone(),
            ),
            None => Argon2::default(),
        }
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(rand::thread_rng());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hash(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &str,
    hash: &str,
) -> Result<bool, CredentialHasherError> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
        warn!(error = %err, "stored password hash is malformed");
        CredentialHasherError::hash("stored password hash is malformed")
    })?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hash(err.to_string())),
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&argon2, &password))
            .await
            .map_err(|err| CredentialHasherError::hash(format!("hash task failed: {err}")))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&argon2, &password, &hash))
            .await
            .map_err(|err| CredentialHasherError::hash(format!("verify task failed: {err}")))?
    }
}
