//! Container schema steps for the tracker database.
//!
//! Each step is a named SQL file applied once, in version order, inside one
//! transaction. Stored JSON documents are never rewritten here; the document
//! format is owned by the stores.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the container schema up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file is newer than this build.
/// - [`DbError::Migration`] naming the step that failed; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending = pending(from_version);
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=skip version={from_version}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

fn pending(from_version: u32) -> &'static [Migration] {
    let start = MIGRATIONS.partition_point(|step| step.version <= from_version);
    &MIGRATIONS[start..]
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, pending, user_version, MIGRATIONS};
    use rusqlite::Connection;

    #[test]
    fn versions_start_at_one_and_increase_by_one() {
        for (index, step) in MIGRATIONS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn pending_skips_applied_steps() {
        assert_eq!(pending(0).len(), MIGRATIONS.len());
        assert!(pending(latest_version()).is_empty());
    }

    #[test]
    fn reapplying_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES ('projects', '[]');",
            [],
        )
        .unwrap();

        apply_migrations(&mut conn).unwrap();
        assert_eq!(user_version(&conn).unwrap(), latest_version());
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
