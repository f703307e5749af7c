//! Distribution (ration delivery) Redis operations.
//!
//! Redis key patterns:
//! - `distribution:{id}` — delivery record (JSON), id is a nanoid
//! - `distribution_id:{DIST-nnnn}` — business-key lookup to record id (STRING)
//! - `seq:distribution` — counter behind the `DIST-nnnn` sequence
//!
//! Business keys come from an atomic INCR, so they stay unique under
//! concurrent creation and after deletions.

use crate::models::{DistributionStatus, StoredDistribution};
use redis::AsyncCommands;

fn record_key(id: &str) -> String {
    format!("distribution:{}", id)
}

fn index_key(distribution_id: &str) -> String {
    format!("distribution_id:{}", distribution_id)
}

/// Allocate the next `DIST-nnnn` business key.
pub async fn next_distribution_id<C>(con: &mut C) -> Result<String, redis::RedisError>
where
    C: AsyncCommands,
{
    let seq: u64 = con.incr("seq:distribution", 1).await?;
    Ok(format!("DIST-{:04}", seq))
}

/// Store a distribution record along with its business-key index.
pub async fn store_distribution<C>(
    con: &mut C,
    distribution: &StoredDistribution,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    con.set::<_, _, ()>(
        record_key(&distribution.id),
        super::to_json(distribution)?,
    )
    .await?;
    con.set::<_, _, ()>(index_key(&distribution.distribution_id), &distribution.id)
        .await?;
    Ok(())
}

/// Look up a distribution by record id, falling back to the business key.
///
/// Callers pass whichever identifier they hold; the two lookups are explicit
/// rather than driven by parse failures.
pub async fn find_distribution<C>(
    con: &mut C,
    id_or_business_key: &str,
) -> Result<Option<StoredDistribution>, redis::RedisError>
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

/// Persist a mutated distribution record, refreshing `updated_at`.
pub async fn update_distribution<C>(
    con: &mut C,
    distribution: &mut StoredDistribution,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    distribution.updated_at = super::now_secs();
    con.set::<_, _, ()>(
        record_key(&distribution.id),
        super::to_json(distribution)?,
    )
    .await?;
    Ok(())
}

/// Delete a distribution and its business-key index.
///
/// Returns true if the record existed.
pub async fn delete_distribution<C>(
    con: &mut C,
    id_or_business_key: &str,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let Some(distribution) = find_distribution(con, id_or_business_key).await? else {
        return Ok(false);
    };

    con.del::<_, ()>(record_key(&distribution.id)).await?;
    con.del::<_, ()>(index_key(&distribution.distribution_id))
        .await?;
    Ok(true)
}

/// List distributions, optionally filtered, newest first.
pub async fn list_distributions<C>(
    con: &mut C,
    status: Option<&str>,
    center_id: Option<&str>,
) -> Result<Vec<StoredDistribution>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut distributions: Vec<StoredDistribution> =
        super::load_all(con, "distribution:*").await?;

    if let Some(status) = status {
        distributions.retain(|d| d.status.as_str() == status);
    }
    if let Some(center_id) = center_id {
        distributions.retain(|d| d.center_id == center_id);
    }

    // Newest first; id tiebreak keeps the order stable within one second
    distributions.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    Ok(distributions)
}

/// Scheduled distributions dated today or later, soonest first.
pub async fn upcoming_distributions<C>(
    con: &mut C,
    today: &str,
    limit: usize,
) -> Result<Vec<StoredDistribution>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut upcoming: Vec<StoredDistribution> = super::load_all(con, "distribution:*").await?;
    // ISO dates compare correctly as strings
    upcoming.retain(|d| d.status == DistributionStatus::Scheduled && d.date.as_str() >= today);
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    upcoming.truncate(limit);
    Ok(upcoming)
}
