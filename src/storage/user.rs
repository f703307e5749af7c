//! Identity store: wallet address → user record.
//!
//! Redis key pattern:
//! - `user:{wallet}` — identity record (JSON), wallet lower-cased
//!
//! The normalized wallet address is the record key itself, so the store can
//! never hold two identities for one wallet. Creation uses SET NX so that
//! concurrent first logins race safely: exactly one insert wins and the
//! loser reads the winner's record.

use crate::models::{Role, StoredUser};
use redis::AsyncCommands;

fn user_key(wallet_address: &str) -> String {
    format!("user:{}", wallet_address.to_ascii_lowercase())
}

/// Look up an identity by wallet address (case-insensitive).
pub async fn get_user<C>(
    con: &mut C,
    wallet_address: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::get_record(con, &user_key(wallet_address)).await
}

/// Get-or-create the identity for a wallet address.
///
/// On first login inserts a record with default role `volunteer`; later
/// calls return the stored record unchanged. Returns the record plus
/// whether this call created it.
pub async fn create_if_absent<C>(
    con: &mut C,
    wallet_address: &str,
) -> Result<(StoredUser, bool), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = user_key(wallet_address);
    let now = super::now_secs();
    let user = StoredUser {
        wallet_address: wallet_address.to_ascii_lowercase(),
        role: Role::Volunteer,
        name: None,
        created_at: now,
        updated_at: now,
    };

    let created: bool = con.set_nx(&key, super::to_json(&user)?).await?;
    if created {
        return Ok((user, true));
    }

    // Lost the race or the user already existed; the stored record wins
    match super::get_record(con, &key).await? {
        Some(existing) => Ok((existing, false)),
        // Record vanished between SET NX and GET; identities are never
        // deleted by this subsystem, so surface it as a store error
        None => Err(redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "user record missing after create",
        ))),
    }
}

/// Persist a mutated identity record, refreshing `updated_at`.
pub async fn update_user<C>(con: &mut C, user: &mut StoredUser) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    user.updated_at = super::now_secs();
    con.set::<_, _, ()>(&user_key(&user.wallet_address), super::to_json(user)?)
        .await?;
    Ok(())
}

/// Upsert the admin identity at startup.
///
/// Creates the record if absent, or promotes an existing record to admin.
pub async fn upsert_admin<C>(con: &mut C, wallet_address: &str) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let (mut user, created) = create_if_absent(con, wallet_address).await?;
    if !created && user.role == Role::Admin {
        return Ok(());
    }
    user.role = Role::Admin;
    update_user(con, &mut user).await
}

/// List all identities.
pub async fn list_users<C>(con: &mut C) -> Result<Vec<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::load_all(con, "user:*").await
}
