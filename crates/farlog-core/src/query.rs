//! Aggregate queries over stored frags

use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

/// Leaderboard options
#[derive(Debug, Clone, Default)]
pub struct LeaderboardOptions {
    /// Restrict to a single match
    pub match_id: Option<i64>,
    /// Limit results
    pub limit: Option<usize>,
}

impl LeaderboardOptions {
    /// Create a new LeaderboardOptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set match filter
    pub fn match_id(mut self, match_id: i64) -> Self {
        self.match_id = Some(match_id);
        self
    }

    /// Set limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Per-player totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub kills: i64,
    pub deaths: i64,
    pub suicides: i64,
}

/// Query builder for frag statistics
#[derive(Clone)]
pub struct QueryBuilder {
    pool: SqlitePool,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Kills, deaths and suicides per player
    ///
    /// Ordered by kills (descending), then deaths (ascending), then name.
    /// Suicides count neither as a kill nor as a death.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use farlog_core::{Database, LeaderboardOptions};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let db = Database::open("~/.farlog/matches.db").await?;
    ///     let top = db.query().leaderboard(LeaderboardOptions::new().limit(10)).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn leaderboard(&self, options: LeaderboardOptions) -> Result<Vec<PlayerStats>> {
        debug!("Leaderboard query: {:?}", options);

        // SQLite treats a negative LIMIT as unbounded
        let limit = options.limit.map(|l| l as i64).unwrap_or(-1);

        let rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
            r#"
            WITH scoped AS (
                SELECT killer_name, victim_name
                FROM match_frags
                WHERE ?1 IS NULL OR match_id = ?1
            ),
            players AS (
                SELECT killer_name AS name FROM scoped
                UNION
                SELECT victim_name AS name FROM scoped WHERE victim_name IS NOT NULL
            )
            SELECT
                p.name,
                (SELECT COUNT(*) FROM scoped s
                    WHERE s.killer_name = p.name AND s.victim_name IS NOT NULL) AS kills,
                (SELECT COUNT(*) FROM scoped s WHERE s.victim_name = p.name) AS deaths,
                (SELECT COUNT(*) FROM scoped s
                    WHERE s.killer_name = p.name AND s.victim_name IS NULL) AS suicides
            FROM players p
            ORDER BY kills DESC, deaths ASC, p.name ASC
            LIMIT ?2
            "#,
        )
        .bind(options.match_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(player, kills, deaths, suicides)| PlayerStats {
                player,
                kills,
                deaths,
                suicides,
            })
            .collect())
    }

    /// Number of frags per weapon code, most used first
    pub async fn weapon_usage(&self, match_id: Option<i64>) -> Result<Vec<(String, i64)>> {
        debug!("Weapon usage query (match: {:?})", match_id);

        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT weapon_code, COUNT(*) AS uses
            FROM match_frags
            WHERE weapon_code IS NOT NULL AND (?1 IS NULL OR match_id = ?1)
            GROUP BY weapon_code
            ORDER BY uses DESC, weapon_code ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
