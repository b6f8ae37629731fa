use crate::config::PasswordScheme;
use crate::db::DbHandle;
use crate::error::CrmError;
use crate::service::password::{hash_password, verify_password};
use tracing::{debug, info};

/// Username -> password-hash pairs.
#[derive(Clone)]
pub struct CredentialStore {
    db: DbHandle,
    scheme: PasswordScheme,
}

impl CredentialStore {
    pub fn new(db: DbHandle, scheme: PasswordScheme) -> Self {
        Self { db, scheme }
    }

    /// Store a new user. `Ok(false)` when the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool, CrmError> {
        let scheme = self.scheme;
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(scheme, &password)).await??;

        let inserted = self.db.insert_user(username, hash).await?;
        if inserted {
            info!(username, ?scheme, "user registered");
        } else {
            debug!(username, "register rejected; username exists");
        }
        Ok(inserted)
    }

    /// True iff the user exists and `password` matches the stored hash.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, CrmError> {
        let Some(user) = self.db.get_user(username).await? else {
            return Ok(false);
        };
        let password = password.to_owned();
        let ok =
            tokio::task::spawn_blocking(move || verify_password(&password, &user.password_hash))
                .await?;
        Ok(ok)
    }
}
