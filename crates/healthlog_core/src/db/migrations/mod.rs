//! Schema registry for the record store and its executor.
//!
//! # Invariants
//! - Registry versions start at 1 and increase by exactly one.
//! - All pending steps commit together or not at all; `PRAGMA user_version`
//!   moves with them.
//! - A failing step is reported with its version.

use crate::db::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

/// Collection tables, secondary indexes.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    registry_version(MIGRATIONS)
}

/// Brings the connection's schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` when a step's SQL fails; nothing from the run is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_registry(conn, MIGRATIONS)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn registry_version(registry: &[Migration]) -> u32 {
    registry.last().map_or(0, |migration| migration.version)
}

fn apply_registry(conn: &mut Connection, registry: &[Migration]) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let to = registry_version(registry);

    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }
    if from == to {
        debug!("event=db_migrate module=db status=noop version={from}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in registry.iter().filter(|step| step.version > from) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| {
                error!(
                    "event=db_migrate module=db status=error version={} error={}",
                    step.version, source
                );
                DbError::Migration {
                    version: step.version,
                    source,
                }
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={}",
            step.version
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_registry, current_user_version, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn registry_versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1);
        }
    }

    #[test]
    fn failing_step_reports_version_and_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        let registry = [
            Migration {
                version: 1,
                sql: "CREATE TABLE kept_only_on_success (id INTEGER);",
            },
            Migration {
                version: 2,
                sql: "CREATE TABLE broken (;",
            },
        ];

        let err = apply_registry(&mut conn, &registry).unwrap_err();
        assert!(matches!(err, DbError::Migration { version: 2, .. }));
        assert!(err.to_string().contains("migration 2"));

        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let leftover: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kept_only_on_success';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(leftover, 0);
    }

    #[test]
    fn partially_migrated_database_only_runs_newer_steps() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE first (id INTEGER); PRAGMA user_version = 1;")
            .unwrap();
        let registry = [
            Migration {
                version: 1,
                sql: "CREATE TABLE first (id INTEGER);",
            },
            Migration {
                version: 2,
                sql: "CREATE TABLE second (id INTEGER);",
            },
        ];

        apply_registry(&mut conn, &registry).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 2);
    }
}
