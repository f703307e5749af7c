//! Transaction audit record operations.
//!
//! Redis key pattern:
//! - `transaction:{tx_hash}` — audit record (JSON)
//!
//! These are opaque bookkeeping entries for client-reported transaction
//! hashes; nothing here verifies them against a chain.

use crate::models::StoredTransaction;
use redis::AsyncCommands;

fn transaction_key(tx_hash: &str) -> String {
    format!("transaction:{}", tx_hash)
}

/// Record a confirmed transaction reference.
pub async fn record_transaction<C>(
    con: &mut C,
    tx_hash: &str,
    tx_type: &str,
    reference_id: &str,
    wallet_address: &str,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let now = super::now_secs();
    let transaction = StoredTransaction {
        tx_hash: tx_hash.to_string(),
        tx_type: tx_type.to_string(),
        reference_id: reference_id.to_string(),
        wallet_address: wallet_address.to_string(),
        status: "confirmed".to_string(),
        created_at: now,
        updated_at: now,
    };

    con.set::<_, _, ()>(transaction_key(tx_hash), super::to_json(&transaction)?)
        .await?;
    Ok(())
}

/// Get a transaction audit record by hash.
pub async fn get_transaction<C>(
    con: &mut C,
    tx_hash: &str,
) -> Result<Option<StoredTransaction>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::get_record(con, &transaction_key(tx_hash)).await
}
