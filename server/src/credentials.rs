use argon2::{Config, Variant, Version};
use rand::Rng;

const SALT_LEN: usize = 16;
const HASH_LEN: u32 = 32;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(#[from] argon2::Error),

    #[error("hashing task did not complete: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Argon2id hashing with a fresh random salt per call.
///
/// Hashes are PHC strings (`$argon2id$v=19$m=..,t=..,p=1$salt$hash`) and
/// carry their own cost parameters; `verify` ignores the hasher's settings.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    time_cost: u32,
    memory_kib: u32,
    decoy: String,
}

impl PasswordHasher {
    pub fn new(time_cost: u32, memory_kib: u32) -> Result<Self, CredentialError> {
        let mut hasher = PasswordHasher { time_cost, memory_kib, decoy: String::new() };
        let filler: [u8; SALT_LEN] = rand::thread_rng().gen();
        hasher.decoy = hasher.hash(&String::from_utf8_lossy(&filler))?;
        Ok(hasher)
    }

    fn config(&self) -> Config<'static> {
        Config {
            variant: Variant::Argon2id,
            version: Version::Version13,
            time_cost: self.time_cost,
            mem_cost: self.memory_kib,
            lanes: 1,
            hash_length: HASH_LEN,
            ..Config::default()
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
        Ok(argon2::hash_encoded(password.as_bytes(), &salt, &self.config())?)
    }

    /// Returns false for a wrong password and for anything that is not a
    /// well-formed argon2 hash.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        argon2::verify_encoded(hash, password.as_bytes()).unwrap_or(false)
    }

    /// Burns the same CPU time as a real verification; used when the
    /// username is unknown.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy);
    }

    pub async fn hash_blocking(&self, password: String) -> Result<String, CredentialError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    pub async fn verify_blocking(&self, password: String, hash: Option<String>) -> Result<bool, CredentialError> {
        let hasher = self.clone();
        let verified = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                hasher.verify_decoy(&password);
                false
            }
        })
        .await?;
        Ok(verified)
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(1, 64).unwrap()
}
