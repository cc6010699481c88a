//! Database schema for the crawl checkpoint

/// SQL schema for the checkpoint database
pub const SCHEMA_SQL: &str = r#"
-- Run metadata (scope fingerprint, status, next batch number, timestamps)
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- URLs that have had a fetch attempt
CREATE TABLE IF NOT EXISTS visited (
    url TEXT PRIMARY KEY
);

-- URLs waiting to be fetched, in pop order
CREATE TABLE IF NOT EXISTS frontier (
    seq INTEGER PRIMARY KEY,
    url TEXT NOT NULL UNIQUE
);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
