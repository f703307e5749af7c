//! Grievance Redis operations.
//!
//! Redis key patterns:
//! - `grievance:{id}` — grievance record (JSON), id is a nanoid
//! - `grievance_id:{GR-nnnn}` — business-key lookup to record id (STRING)
//! - `seq:grievance` — counter behind the `GR-nnnn` sequence

use crate::models::{GrievanceStatus, StoredGrievance};
use redis::AsyncCommands;

fn record_key(id: &str) -> String {
    format!("grievance:{}", id)
}

fn index_key(grievance_id: &str) -> String {
    format!("grievance_id:{}", grievance_id)
}

/// Allocate the next `GR-nnnn` business key.
pub async fn next_grievance_id<C>(con: &mut C) -> Result<String, redis::RedisError>
where
    C: AsyncCommands,
{
    let seq: u64 = con.incr("seq:grievance", 1).await?;
    Ok(format!("GR-{:04}", seq))
}

/// Store a grievance record along with its business-key index.
pub async fn store_grievance<C>(
    con: &mut C,
    grievance: &StoredGrievance,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    con.set::<_, _, ()>(record_key(&grievance.id), super::to_json(grievance)?)
        .await?;
    con.set::<_, _, ()>(index_key(&grievance.grievance_id), &grievance.id)
        .await?;
    Ok(())
}

/// Look up a grievance by record id, falling back to the business key.
pub async fn find_grievance<C>(
    con: &mut C,
    id_or_business_key: &str,
) -> Result<Option<StoredGrievance>, redis::RedisError>
where
    C: AsyncCommands,
{
    if let Some(found) = super::get_record(con, &record_key(id_or_business_key)).await? {
        return Ok(Some(found));
    }

    let id: Option<String> = con.get(index_key(id_or_business_key)).await?;
    match id {
        Some(id) => super::get_record(con, &record_key(&id)).await,
        None => Ok(None),
    }
}

/// Persist a mutated grievance record, refreshing `updated_at`.
pub async fn update_grievance<C>(
    con: &mut C,
    grievance: &mut StoredGrievance,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    grievance.updated_at = super::now_secs();
    con.set::<_, _, ()>(record_key(&grievance.id), super::to_json(grievance)?)
        .await?;
    Ok(())
}

/// List grievances, optionally filtered, newest first.
///
/// `owner` restricts the listing to records authored by that wallet; it is
/// the query-layer ownership filter applied for citizen callers.
pub async fn list_grievances<C>(
    con: &mut C,
    status: Option<&str>,
    center_id: Option<&str>,
    owner: Option<&str>,
) -> Result<Vec<StoredGrievance>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut grievances: Vec<StoredGrievance> = super::load_all(con, "grievance:*").await?;

    if let Some(status) = status {
        grievances.retain(|g| g.status.as_str() == status);
    }
    if let Some(center_id) = center_id {
        grievances.retain(|g| g.center_id == center_id);
    }
    if let Some(owner) = owner {
        grievances.retain(|g| g.user_id == owner);
    }

    grievances.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    Ok(grievances)
}

/// Count grievances currently open.
pub async fn count_open_grievances<C>(con: &mut C) -> Result<u64, redis::RedisError>
where
    C: AsyncCommands,
{
    let grievances: Vec<StoredGrievance> = super::load_all(con, "grievance:*").await?;
    Ok(grievances
        .iter()
        .filter(|g| g.status == GrievanceStatus::Open)
        .count() as u64)
}
