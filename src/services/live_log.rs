use chrono::NaiveDate;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::errors::Result;
use crate::models::stat::StatEvent;

/// Index set holding the ids of matches with live state. Maintained on
/// start and end so enumeration never scans the whole keyspace.
const ACTIVE_INDEX: &str = "matches:active";

/// Access layer over the volatile per-match keyspace:
///
/// - `match:{m}:started`
/// - `match:{m}:date`
/// - `match:{m}:player:{p}:team`
/// - `match:{m}:team:{t}:player:{p}:stats`
#[derive(Clone)]
pub struct LiveLog {
    conn: ConnectionManager,
}

/// Result of reading one player log. Records that fail to decode are
/// skipped rather than aborting the read, but the caller can see how
/// many were dropped.
#[derive(Debug, Default)]
pub struct LogRead {
    pub events: Vec<StatEvent>,
    pub poisoned: usize,
}

pub fn started_key(match_id: i64) -> String {
    format!("match:{}:started", match_id)
}

pub fn date_key(match_id: i64) -> String {
    format!("match:{}:date", match_id)
}

pub fn player_team_key(match_id: i64, player_id: i64) -> String {
    format!("match:{}:player:{}:team", match_id, player_id)
}

pub fn stats_key(match_id: i64, team_id: i64, player_id: i64) -> String {
    format!("match:{}:team:{}:player:{}:stats", match_id, team_id, player_id)
}

/// Pulls `(team_id, player_id)` back out of a stats key.
pub fn ids_from_stats_key(key: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = key.split(':').collect();
    match parts.as_slice() {
        ["match", _, "team", team, "player", player, "stats"] => {
            Some((team.parse().ok()?, player.parse().ok()?))
        }
        _ => None,
    }
}

impl LiveLog {
    pub fn new(conn: ConnectionManager) -> Self {
        LiveLog { conn }
    }

    fn conn(&self) -> ConnectionManager {
        // ConnectionManager is a cheap handle over one multiplexed
        // connection; commands need it mutably.
        self.conn.clone()
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub async fn is_started(&self, match_id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let flag: Option<String> = conn.get(started_key(match_id)).await?;
        Ok(flag.as_deref() == Some("true"))
    }

    pub async fn mark_started(&self, match_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let _: () = conn.set(started_key(match_id), "true").await?;
        Ok(())
    }

    pub async fn set_match_date(&self, match_id: i64, date: NaiveDate) -> Result<()> {
        let mut conn = self.conn();
        let _: () = conn.set(date_key(match_id), date.to_string()).await?;
        Ok(())
    }

    pub async fn match_date(&self, match_id: i64) -> Result<Option<NaiveDate>> {
        let mut conn = self.conn();
        let raw: Option<String> = conn.get(date_key(match_id)).await?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }

    pub async fn set_player_team(&self, match_id: i64, player_id: i64, team_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let _: () = conn.set(player_team_key(match_id, player_id), team_id).await?;
        Ok(())
    }

    pub async fn player_team(&self, match_id: i64, player_id: i64) -> Result<Option<i64>> {
        let mut conn = self.conn();
        let team: Option<i64> = conn.get(player_team_key(match_id, player_id)).await?;
        Ok(team)
    }

    /// Appends one record to the right of a player log.
    pub async fn append(
        &self,
        match_id: i64,
        team_id: i64,
        player_id: i64,
        event: &StatEvent,
    ) -> Result<()> {
        let mut conn = self.conn();
        let payload = serde_json::to_string(event)?;
        let _: i64 = conn
            .rpush(stats_key(match_id, team_id, player_id), payload)
            .await?;
        Ok(())
    }

    pub async fn events(&self, match_id: i64, team_id: i64, player_id: i64) -> Result<LogRead> {
        self.events_at(&stats_key(match_id, team_id, player_id)).await
    }

    /// Reads a full log in append order, skipping undecodable records.
    pub async fn events_at(&self, key: &str) -> Result<LogRead> {
        let mut conn = self.conn();
        let raw: Vec<String> = conn.lrange(key, 0, -1).await?;

        let mut read = LogRead::default();
        for entry in raw {
            match serde_json::from_str::<StatEvent>(&entry) {
                Ok(event) => read.events.push(event),
                Err(e) => {
                    tracing::warn!("Skipping undecodable record at {}: {} ({})", key, entry, e);
                    read.poisoned += 1;
                }
            }
        }
        Ok(read)
    }

    /// All stats keys of one match, one per player log.
    pub async fn stats_keys(&self, match_id: i64) -> Result<Vec<String>> {
        self.scan(&format!("match:{}:team:*:player:*:stats", match_id))
            .await
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn();
        let mut keys = Vec::new();
        let mut iter = conn.scan_match::<_, String>(pattern).await?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    /// Drops every volatile key of a match and removes it from the
    /// active index. Called only after a fully successful sync.
    pub async fn purge_match(&self, match_id: i64) -> Result<()> {
        let keys = self.scan(&format!("match:{}:*", match_id)).await?;
        let mut conn = self.conn();
        if !keys.is_empty() {
            let _: i64 = conn.del(keys).await?;
        }
        let _: i64 = conn.srem(ACTIVE_INDEX, match_id).await?;
        Ok(())
    }

    pub async fn register_active(&self, match_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let _: i64 = conn.sadd(ACTIVE_INDEX, match_id).await?;
        Ok(())
    }

    pub async fn active_matches(&self) -> Result<Vec<i64>> {
        let mut conn = self.conn();
        let mut ids: Vec<i64> = conn.smembers(ACTIVE_INDEX).await?;
        ids.sort_unstable();
        Ok(ids)
    }
}
