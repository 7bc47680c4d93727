//! Schema migrations for the board's key-value table.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations in one transaction.
//! - Tell callers whether a connection is ready to back a board store.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A connection at the latest version holds every table the migrations create.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
    /// Tables the board store relies on after this step.
    creates: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
    creates: &["kv_store"],
}];

/// Where a connection's schema stands relative to this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    /// Migrations `from + 1 ..= to` have not run yet.
    Pending { from: u32, to: u32 },
    /// Written by a newer binary.
    Newer { found: u32, supported: u32 },
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version` and compares it with [`latest_version`].
pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let found = current_user_version(conn)?;
    let latest = latest_version();
    Ok(if found == latest {
        SchemaState::Current
    } else if found < latest {
        SchemaState::Pending {
            from: found,
            to: latest,
        }
    } else {
        SchemaState::Newer {
            found,
            supported: latest,
        }
    })
}

/// Fails with [`DbError::MissingTable`] when a table the store reads is absent.
///
/// Catches databases whose `user_version` was bumped without running our SQL.
pub fn verify_store_tables(conn: &Connection) -> DbResult<()> {
    for table in MIGRATIONS.iter().flat_map(|migration| migration.creates) {
        let present: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )?;
        if !present {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = match schema_state(conn)? {
        SchemaState::Current => return verify_store_tables(conn),
        SchemaState::Newer { found, supported } => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: found,
                latest_supported: supported,
            })
        }
        SchemaState::Pending { from, .. } => from,
    };

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    verify_store_tables(conn)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
