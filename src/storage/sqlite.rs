//! SQLite checkpoint implementation
//!
//! This module provides a SQLite-based implementation of the Checkpoint trait.

use crate::state::CrawlState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Checkpoint, StorageError, StorageResult};
use crate::storage::{CheckpointMeta, CheckpointRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite checkpoint backend
pub struct SqliteCheckpoint {
    conn: Connection,
}

impl SqliteCheckpoint {
    /// Opens (or creates) the checkpoint database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn meta_value(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn load_urls(&self, sql: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut urls = Vec::new();
        for row in rows {
            urls.push(row?);
        }
        Ok(urls)
    }
}

impl Checkpoint for SqliteCheckpoint {
    fn load(&self) -> StorageResult<Option<CheckpointRecord>> {
        let Some(status) = self.meta_value("status")? else {
            return Ok(None);
        };
        let status = RunStatus::from_db_string(&status)
            .ok_or_else(|| StorageError::Corrupt(format!("unknown run status '{}'", status)))?;

        let scope_fingerprint = self
            .meta_value("scope_fingerprint")?
            .ok_or_else(|| StorageError::Corrupt("missing scope fingerprint".to_string()))?;

        let next_batch = match self.meta_value("next_batch")? {
            Some(value) => value.parse::<u32>().map_err(|_| {
                StorageError::Corrupt(format!("invalid next batch number '{}'", value))
            })?,
            None => 1,
        };

        let updated_at = self.meta_value("updated_at")?.unwrap_or_default();

        let visited = self.load_urls("SELECT url FROM visited")?;
        let frontier = self.load_urls("SELECT url FROM frontier ORDER BY seq")?;

        Ok(Some(CheckpointRecord {
            meta: CheckpointMeta {
                scope_fingerprint,
                status,
                next_batch,
            },
            state: CrawlState::from_parts(visited, frontier),
            updated_at,
        }))
    }

    fn save(&mut self, state: &CrawlState, meta: &CheckpointMeta) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM visited", [])?;
        tx.execute("DELETE FROM frontier", [])?;
        tx.execute("DELETE FROM meta", [])?;

        {
            let mut insert_visited = tx.prepare("INSERT INTO visited (url) VALUES (?1)")?;
            for url in state.visited() {
                insert_visited.execute(params![url])?;
            }

            let mut insert_frontier =
                tx.prepare("INSERT INTO frontier (seq, url) VALUES (?1, ?2)")?;
            for (seq, url) in state.frontier().enumerate() {
                insert_frontier.execute(params![seq as i64, url])?;
            }

            let mut insert_meta = tx.prepare("INSERT INTO meta (key, value) VALUES (?1, ?2)")?;
            insert_meta.execute(params!["scope_fingerprint", meta.scope_fingerprint])?;
            insert_meta.execute(params!["status", meta.status.to_db_string()])?;
            insert_meta.execute(params!["next_batch", meta.next_batch.to_string()])?;
            insert_meta.execute(params!["updated_at", Utc::now().to_rfc3339()])?;
        }

        tx.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute_batch(
            "
            DELETE FROM visited;
            DELETE FROM frontier;
            DELETE FROM meta;
        ",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(status: RunStatus, next_batch: u32) -> CheckpointMeta {
        CheckpointMeta {
            scope_fingerprint: "fp".to_string(),
            status,
            next_batch,
        }
    }

    fn sample_state() -> CrawlState {
        let mut state = CrawlState::new();
        state.push("https://docs.example.com/".to_string());
        state.mark_visited("https://docs.example.com/");
        state.push("https://docs.example.com/b".to_string());
        state.push("https://docs.example.com/a".to_string());
        state.push("https://docs.example.com/c".to_string());
        state
    }

    #[test]
    fn test_load_empty() {
        let checkpoint = SqliteCheckpoint::new_in_memory().unwrap();
        assert!(checkpoint.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let mut checkpoint = SqliteCheckpoint::new_in_memory().unwrap();
        checkpoint
            .save(&sample_state(), &meta(RunStatus::Running, 4))
            .unwrap();

        let record = checkpoint.load().unwrap().unwrap();
        assert_eq!(record.meta, meta(RunStatus::Running, 4));
        assert!(!record.updated_at.is_empty());
        assert!(record.state.is_visited("https://docs.example.com/"));

        let frontier: Vec<&str> = record.state.frontier().collect();
        assert_eq!(
            frontier,
            vec![
                "https://docs.example.com/b",
                "https://docs.example.com/a",
                "https://docs.example.com/c",
            ]
        );
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let mut checkpoint = SqliteCheckpoint::new_in_memory().unwrap();
        checkpoint
            .save(&sample_state(), &meta(RunStatus::Running, 2))
            .unwrap();

        let mut state = sample_state();
        state.mark_visited("https://docs.example.com/b");
        checkpoint
            .save(&state, &meta(RunStatus::Completed, 3))
            .unwrap();

        let record = checkpoint.load().unwrap().unwrap();
        assert_eq!(record.meta.status, RunStatus::Completed);
        assert_eq!(record.meta.next_batch, 3);
        assert_eq!(record.state.visited_len(), 2);
        assert_eq!(record.state.frontier_len(), 2);
        assert!(!record.state.is_queued("https://docs.example.com/b"));
    }

    #[test]
    fn test_clear() {
        let mut checkpoint = SqliteCheckpoint::new_in_memory().unwrap();
        checkpoint
            .save(&sample_state(), &meta(RunStatus::Running, 2))
            .unwrap();
        checkpoint.clear().unwrap();
        assert!(checkpoint.load().unwrap().is_none());
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let checkpoint = SqliteCheckpoint::new_in_memory().unwrap();
        checkpoint
            .conn
            .execute(
                "INSERT INTO meta (key, value) VALUES ('status', 'paused')",
                [],
            )
            .unwrap();
        assert!(matches!(checkpoint.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("checkpoint.db");

        {
            let mut checkpoint = SqliteCheckpoint::new(&path).unwrap();
            checkpoint
                .save(&sample_state(), &meta(RunStatus::Running, 5))
                .unwrap();
        }

        let checkpoint = SqliteCheckpoint::new(&path).unwrap();
        let record = checkpoint.load().unwrap().unwrap();
        assert_eq!(record.meta.next_batch, 5);
        assert_eq!(record.state.frontier_len(), 3);
    }
}
