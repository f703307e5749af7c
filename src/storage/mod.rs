//! Redis storage layer for identities, centers, distributions, grievances,
//! and transaction audit records.
//!
//! All functions are async and use redis::AsyncCommands. Records are stored
//! as JSON documents under typed key prefixes:
//! - `user:{wallet}` — identity record, keyed by normalized wallet address
//! - `center:{id}` — distribution center
//! - `distribution:{id}` / `distribution_id:{DIST-nnnn}` — delivery + index
//! - `grievance:{id}` / `grievance_id:{GR-nnnn}` — grievance + index
//! - `transaction:{tx_hash}` — audit record
//! - `seq:distribution`, `seq:grievance` — business-key counters

pub mod center;
pub mod distribution;
pub mod grievance;
pub mod transaction;
pub mod user;

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

/// Maximum number of keys returned by scan_keys to prevent unbounded memory allocation.
const SCAN_MAX_KEYS: usize = 10_000;

/// Current Unix time in seconds, for record timestamps.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn json_err(context: &'static str, err: impl std::fmt::Display) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, err.to_string()))
}

/// Serialize a record for storage.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| json_err("JSON serialize", e))
}

/// Deserialize a stored record.
pub(crate) fn from_json<T: DeserializeOwned>(data: &str) -> Result<T, redis::RedisError> {
    serde_json::from_str(data).map_err(|e| json_err("JSON deserialize", e))
}

/// Fetch and deserialize the record at `key`, if present.
pub(crate) async fn get_record<C, T>(con: &mut C, key: &str) -> Result<Option<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let json: Option<String> = con.get(key).await?;
    json.as_deref().map(from_json).transpose()
}

/// Scan for Redis keys matching a pattern using SCAN (non-blocking).
///
/// Unlike KEYS, SCAN does not block the Redis server during iteration.
/// Capped at SCAN_MAX_KEYS results to prevent unbounded memory growth.
pub async fn scan_keys<C>(con: &mut C, pattern: &str) -> Result<Vec<String>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut all_keys = Vec::new();
    let mut cursor: u64 = 0;
    loop {
        let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(100)
            .query_async(con)
            .await?;
        all_keys.extend(keys);
        if all_keys.len() >= SCAN_MAX_KEYS {
            all_keys.truncate(SCAN_MAX_KEYS);
            break;
        }
        cursor = new_cursor;
        if cursor == 0 {
            break;
        }
    }
    Ok(all_keys)
}

/// Load every record stored under keys matching `pattern`.
///
/// Records that fail to deserialize are skipped rather than failing the
/// whole listing.
pub(crate) async fn load_all<C, T>(con: &mut C, pattern: &str) -> Result<Vec<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let mut records = Vec::new();
    let keys = scan_keys(con, pattern).await?;

    for key in keys {
        let json: Option<String> = con.get(&key).await?;
        if let Some(data) = json {
            if let Ok(record) = serde_json::from_str::<T>(&data) {
                records.push(record);
            }
        }
    }

    Ok(records)
}
