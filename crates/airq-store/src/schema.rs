//! Database schema and migrations.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// The version check and upgrade run inside one `IMMEDIATE` transaction, so
/// a second process opening the same file waits for the first upgrade to
/// finish instead of racing it. Re-running against a current schema is a
/// no-op.
pub fn initialize(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let version = get_schema_version(&tx)?;

    if version == 0 {
        // Fresh database - create all tables
        create_schema_v1(&tx)?;
        set_schema_version(&tx, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        migrate(&tx, version)?;
    }

    tx.commit()
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Current readings, one row per fetch. `seq` orders rows that share
        -- a capture instant.
        CREATE TABLE IF NOT EXISTS readings (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            city TEXT NOT NULL,
            captured_at INTEGER NOT NULL,
            payload TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_readings_city
            ON readings(city, captured_at, seq);
        CREATE INDEX IF NOT EXISTS idx_readings_captured_at
            ON readings(captured_at);

        -- Daily aggregates, one row per city and date
        CREATE TABLE IF NOT EXISTS historical (
            id TEXT PRIMARY KEY,
            city TEXT NOT NULL,
            date TEXT NOT NULL,
            synced_at INTEGER NOT NULL,
            payload TEXT NOT NULL,
            UNIQUE(city, date)
        );
        CREATE INDEX IF NOT EXISTS idx_historical_city_date
            ON historical(city, date);
        CREATE INDEX IF NOT EXISTS idx_historical_date
            ON historical(date);

        -- Key-value user preferences
        CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Favorite cities
        CREATE TABLE IF NOT EXISTS favorites (
            city TEXT PRIMARY KEY,
            added_at INTEGER NOT NULL
        );
        "#,
    )
}

/// Run migrations from old_version to current.
fn migrate(tx: &Transaction<'_>, old_version: i32) -> rusqlite::Result<()> {
    // Add future migrations here
    // if old_version < 2 { migrate_to_v2(tx)?; }

    let _ = old_version;
    set_schema_version(tx, SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"readings".to_string()));
        assert!(tables.contains(&"historical".to_string()));
        assert!(tables.contains(&"preferences".to_string()));
        assert!(tables.contains(&"favorites".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_indexes_created() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for name in [
            "idx_readings_city",
            "idx_readings_captured_at",
            "idx_historical_city_date",
            "idx_historical_date",
        ] {
            assert!(indexes.contains(&name.to_string()), "missing {name}");
        }
    }

    #[test]
    fn test_schema_version_tracking() {
        let mut conn = Connection::open_in_memory().unwrap();

        // Fresh database should have version 0
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize(&mut conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO favorites (city, added_at) VALUES ('Delhi', 0)",
            [],
        )
        .unwrap();

        initialize(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
