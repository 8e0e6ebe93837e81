//! Storage operations for matches and their frags

use crate::{Error, Event, MatchRecord, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

/// A match row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub id: i64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub game_mode: Option<String>,
    pub map_name: Option<String>,
    pub log_hash: Option<String>,
    /// Unix timestamp in seconds
    pub imported_at: i64,
}

/// A frag row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFrag {
    pub id: i64,
    pub match_id: i64,
    pub frag_time: DateTime<FixedOffset>,
    pub killer_name: String,
    pub victim_name: Option<String>,
    pub weapon_code: Option<String>,
}

impl StoredFrag {
    /// Convert back into a timeline event
    ///
    /// Rows carrying both a victim and a weapon are kills, everything else
    /// is a suicide.
    pub fn into_event(self) -> Event {
        match (self.victim_name, self.weapon_code) {
            (Some(victim), Some(weapon)) => Event::Kill {
                time: self.frag_time,
                killer: self.killer_name,
                victim,
                weapon,
            },
            _ => Event::Suicide {
                time: self.frag_time,
                killer: self.killer_name,
            },
        }
    }
}

type MatchRow = (i64, String, String, Option<String>, Option<String>, Option<String>, i64);
const HASH_OWNER_SQL: &str = "SELECT id FROM matches WHERE log_hash = ? ORDER BY id LIMIT 1";

type FragRow = (i64, i64, String, String, Option<String>, Option<String>);

/// Storage operations interface
#[async_trait]
pub trait StorageOperations {
    /// Insert a match and all of its frags, returning the new match id
    ///
    /// Fails with [`Error::AlreadyImported`] when `log_hash` matches a
    /// previously imported log.
    async fn insert(&self, record: &MatchRecord, log_hash: Option<&str>) -> Result<i64>;

    /// Swap every match imported from `log_hash` for `record`
    ///
    /// Runs in one transaction: on failure the earlier match is kept.
    async fn replace(&self, record: &MatchRecord, log_hash: &str) -> Result<i64>;

    /// Get a match by id
    async fn get(&self, id: i64) -> Result<Option<StoredMatch>>;

    /// List all matches, newest session first
    async fn list(&self) -> Result<Vec<StoredMatch>>;

    /// Frags of a match in timeline order
    async fn frags(&self, match_id: i64) -> Result<Vec<StoredFrag>>;

    /// Delete a match and its frags
    async fn delete(&self, id: i64) -> Result<()>;

    /// Find the match imported from a log with the given content hash
    async fn find_by_hash(&self, log_hash: &str) -> Result<Option<i64>>;
}

/// Storage implementation
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Create a new Storage instance
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageOperations for Storage {
    async fn insert(&self, record: &MatchRecord, log_hash: Option<&str>) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        if let Some(hash) = log_hash {
            if let Some(match_id) = hash_owner(&mut tx, hash).await? {
                return Err(Error::AlreadyImported {
                    match_id,
                    hash: hash.to_string(),
                });
            }
        }

        let match_id = insert_match(&mut tx, record, log_hash).await?;
        tx.commit().await?;

        debug!("Stored match {}", match_id);
        Ok(match_id)
    }

    async fn replace(&self, record: &MatchRecord, log_hash: &str) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM matches WHERE log_hash = ?")
            .bind(log_hash)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let match_id = insert_match(&mut tx, record, Some(log_hash)).await?;
        tx.commit().await?;

        info!("Stored match {} (replaced {})", match_id, removed);
        Ok(match_id)
    }

    async fn get(&self, id: i64) -> Result<Option<StoredMatch>> {
        debug!("Getting match: {}", id);

        let row: Option<MatchRow> = sqlx::query_as(
            r#"
            SELECT id, start_time, end_time, game_mode, map_name, log_hash, imported_at
            FROM matches
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(match_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<StoredMatch>> {
        debug!("Listing matches");

        let rows: Vec<MatchRow> = sqlx::query_as(
            r#"
            SELECT id, start_time, end_time, game_mode, map_name, log_hash, imported_at
            FROM matches
            ORDER BY start_time DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(match_from_row).collect()
    }

    async fn frags(&self, match_id: i64) -> Result<Vec<StoredFrag>> {
        debug!("Listing frags of match: {}", match_id);

        // insertion order is file order, which is also timeline order
        let rows: Vec<FragRow> = sqlx::query_as(
            r#"
            SELECT id, match_id, frag_time, killer_name, victim_name, weapon_code
            FROM match_frags
            WHERE match_id = ?
            ORDER BY id
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, match_id, frag_time, killer_name, victim_name, weapon_code)| {
                Ok(StoredFrag {
                    id,
                    match_id,
                    frag_time: parse_time(&frag_time)?,
                    killer_name,
                    victim_name,
                    weapon_code,
                })
            })
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting match: {}", id);

        let result = sqlx::query("DELETE FROM matches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }

        // Frags are removed by CASCADE
        debug!("Deleted match: {}", id);
        Ok(())
    }

    async fn find_by_hash(&self, log_hash: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(HASH_OWNER_SQL)
            .bind(log_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id,)| id))
    }
}

async fn hash_owner(tx: &mut Transaction<'_, Sqlite>, log_hash: &str) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as(HASH_OWNER_SQL)
        .bind(log_hash)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(row.map(|(id,)| id))
}

async fn insert_match(
    tx: &mut Transaction<'_, Sqlite>,
    record: &MatchRecord,
    log_hash: Option<&str>,
) -> Result<i64> {
    info!(
        "Storing match on {} with {} frags",
        record.map_name.as_deref().unwrap_or("unknown map"),
        record.events.len()
    );

    let result = sqlx::query(
        r#"
        INSERT INTO matches (start_time, end_time, game_mode, map_name, log_hash, imported_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.session_start.to_rfc3339())
    .bind(record.session_end.to_rfc3339())
    .bind(record.game_mode.as_deref())
    .bind(record.map_name.as_deref())
    .bind(log_hash)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut **tx)
    .await?;

    let match_id = result.last_insert_rowid();

    for event in &record.events {
        sqlx::query(
            r#"
            INSERT INTO match_frags (match_id, frag_time, killer_name, victim_name, weapon_code)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(match_id)
        .bind(event.time().to_rfc3339())
        .bind(event.killer())
        .bind(event.victim())
        .bind(event.weapon())
        .execute(&mut **tx)
        .await?;
    }

    Ok(match_id)
}

fn match_from_row(row: MatchRow) -> Result<StoredMatch> {
    let (id, start_time, end_time, game_mode, map_name, log_hash, imported_at) = row;
    Ok(StoredMatch {
        id,
        start_time: parse_time(&start_time)?,
        end_time: parse_time(&end_time)?,
        game_mode,
        map_name,
        log_hash,
        imported_at,
    })
}

fn parse_time(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::Other(format!("Invalid stored timestamp '{}': {}", value, e)))
}
