//! Distribution center Redis operations.
//!
//! Redis key pattern:
//! - `center:{id}` — center record (JSON), id is a nanoid

use crate::models::{Location, StoredCenter};
use redis::AsyncCommands;

fn center_key(id: &str) -> String {
    format!("center:{}", id)
}

/// Create a center and return the stored record.
pub async fn create_center<C>(
    con: &mut C,
    name: String,
    location: Location,
    trust_score: u32,
) -> Result<StoredCenter, redis::RedisError>
where
    C: AsyncCommands,
{
    let now = super::now_secs();
    let center = StoredCenter {
        id: nanoid::nanoid!(12),
        name,
        location,
        trust_score,
        created_at: now,
        updated_at: now,
    };

    con.set::<_, _, ()>(center_key(&center.id), super::to_json(&center)?)
        .await?;
    Ok(center)
}

/// Get a center by id.
pub async fn get_center<C>(con: &mut C, id: &str) -> Result<Option<StoredCenter>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::get_record(con, &center_key(id)).await
}

/// Persist a mutated center record, refreshing `updated_at`.
pub async fn update_center<C>(
    con: &mut C,
    center: &mut StoredCenter,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    center.updated_at = super::now_secs();
    con.set::<_, _, ()>(center_key(&center.id), super::to_json(center)?)
        .await?;
    Ok(())
}

/// List all centers sorted by name.
pub async fn list_centers<C>(con: &mut C) -> Result<Vec<StoredCenter>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut centers: Vec<StoredCenter> = super::load_all(con, "center:*").await?;
    centers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(centers)
}
