use crate::credentials::PasswordHasher;
use crate::database::Database;
use crate::errors::ApiError;

/// Creates a user with a hashed password and returns its id.
///
/// The existence check only saves a hash computation in the common case.
/// Two concurrent registrations can both pass it; the UNIQUE constraint on
/// `users.username` then rejects the second insert, which is reported as a
/// conflict as well.
pub async fn register(
    db: &Database,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<i64, ApiError> {
    if db.username_exists(username).await? {
        tracing::info!(username, "REGISTRY: username already taken");
        return Err(ApiError::Conflict);
    }

    let password_hash = hasher.hash_blocking(password.to_string()).await?;

    match db.insert_user(username, &password_hash).await {
        Ok(user_id) => {
            tracing::info!(username, user_id, "REGISTRY: user registered");
            Ok(user_id)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::info!(username, "REGISTRY: lost registration race");
            Err(ApiError::Conflict)
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks a username/password pair. Unknown users and wrong passwords are
/// indistinguishable to the caller.
pub async fn login(
    db: &Database,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<(i64, String), ApiError> {
    let record = db.find_user_by_username(username).await?;
    let stored_hash = record.as_ref().map(|r| r.password_hash.clone());

    let verified = hasher.verify_blocking(password.to_string(), stored_hash).await?;

    match record {
        Some(record) if verified => {
            tracing::info!(username, user_id = record.id, "REGISTRY: login succeeded");
            Ok((record.id, record.username))
        }
        _ => {
            tracing::info!(username, "REGISTRY: login rejected");
            Err(ApiError::InvalidCredentials)
        }
    }
}
