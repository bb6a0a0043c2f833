//! First-run bootstrap.

use doc_store::DocumentStore;
use entities::{Role, User};

use crate::config::Config;

/// Creates the admin account when the store is empty.
///
/// Skipped when bootstrap is disabled or any user already exists, so an
/// existing deployment is never touched.
pub async fn bootstrap_admin(store: &dyn DocumentStore, config: &Config) -> anyhow::Result<()> {
    if !config.bootstrap_admin {
        return Ok(());
    }

    if store.count_users().await? > 0 {
        tracing::debug!("Store already has users, skipping bootstrap");
        return Ok(());
    }

    let password_hash = auth::hash_password(&config.admin_password)?;
    let admin = User::new(&config.admin_username, password_hash, Role::Admin);
    store.create_user(admin).await?;

    tracing::info!(username = %config.admin_username, "Bootstrapped admin account");
    Ok(())
}
