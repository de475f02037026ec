//! Password hashing, session tokens and the request gate.

pub mod gate;
pub mod password;
pub mod token;

use anyhow::{Context, Result};
use tracing::info;

use crate::db::{AccountType, NewAccount, Store};

/// Create the bootstrap admin account unless its email is already registered.
pub async fn ensure_admin_account(store: &Store, email: &str, password: &str) -> Result<()> {
    let email = email.trim().to_lowercase();
    if store.email_owner(&email).await?.is_some() {
        return Ok(());
    }

    let password_hash = password::hash_password(password).context("Failed to hash admin password")?;
    let account_id = store
        .insert_account(&NewAccount {
            first_name: "Site".to_string(),
            last_name: "Admin".to_string(),
            email: email.clone(),
            password_hash,
            account_type: AccountType::Admin,
        })
        .await?;

    info!(account_id, email = %email, "Created bootstrap admin account");
    Ok(())
}
