//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide uniform add/get/update/delete/list APIs for every record type.
//! - Serve declared secondary indexes (`record_date` plus per-collection
//!   columns) through SQL indexes.
//! - Keep SQL and JSON payload details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Index columns are always rewritten together with the payload.
//! - Missing IDs on update/delete follow the configured
//!   `MissingRecordPolicy`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::id::RecordId;
use crate::model::record::{Record, Stored};
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record rejected at the write boundary.
    Validation(ValidationError),
    /// Storage unavailable or failing.
    Db(DbError),
    /// Update/delete targeted a missing ID under `MissingRecordPolicy::Strict`.
    NotFound(RecordId),
    /// Persisted row cannot be decoded into a valid record.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with `open_db`"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Behavior of update/delete when the target ID does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRecordPolicy {
    /// Return `RepoError::NotFound` so callers can detect misuse.
    #[default]
    Strict,
    /// Treat the call as an idempotent no-op.
    Lenient,
}

/// Repository interface for one record collection.
pub trait RecordRepository<R: Record> {
    /// Assigns an ID, persists the record and returns the ID.
    fn add(&self, record: &R) -> RepoResult<RecordId>;
    fn get(&self, id: &RecordId) -> RepoResult<Option<Stored<R>>>;
    /// Shallow-merges the patch fields over the stored record.
    fn update(&self, id: &RecordId, patch: &R::Patch) -> RepoResult<()>;
    /// Replaces the stored record wholesale, keeping its ID.
    fn replace(&self, id: &RecordId, record: &R) -> RepoResult<()>;
    fn delete(&self, id: &RecordId) -> RepoResult<()>;
    /// Most-recent-first for dated records, insertion order otherwise.
    fn list_all(&self) -> RepoResult<Vec<Stored<R>>>;
    /// Exact-match lookup on a declared index column, in insertion order.
    fn find_by_index(&self, column: &'static str, value: &str) -> RepoResult<Vec<Stored<R>>>;
    /// Exact-match lookup restricted to `from..=to` record dates,
    /// most-recent-first, same-day rows in insertion order.
    fn find_by_index_between(
        &self,
        column: &'static str,
        value: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<Stored<R>>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed repository for record type `R`.
pub struct SqliteRecordRepository<'conn, R: Record> {
    conn: &'conn Connection,
    policy: MissingRecordPolicy,
    _record: PhantomData<R>,
}

impl<'conn, R: Record> SqliteRecordRepository<'conn, R> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, policy: MissingRecordPolicy) -> RepoResult<Self> {
        ensure_connection_ready(conn, R::COLLECTION.table)?;
        Ok(Self {
            conn,
            policy,
            _record: PhantomData,
        })
    }

    pub fn policy(&self) -> MissingRecordPolicy {
        self.policy
    }

    fn table(&self) -> &'static str {
        R::COLLECTION.table
    }

    fn missing(&self, operation: &'static str, id: &RecordId) -> RepoResult<()> {
        match self.policy {
            MissingRecordPolicy::Strict => Err(RepoError::NotFound(id.clone())),
            MissingRecordPolicy::Lenient => {
                debug!(
                    "event=record_{} module=repo status=noop collection={} id={}",
                    operation,
                    self.table(),
                    id
                );
                Ok(())
            }
        }
    }

    fn ensure_index_column(&self, column: &'static str) -> RepoResult<()> {
        if R::COLLECTION.index_columns.contains(&column) {
            Ok(())
        } else {
            Err(RepoError::InvalidData(format!(
                "`{column}` is not an index of {}",
                self.table()
            )))
        }
    }

    fn index_bindings(&self, record: &R) -> RepoResult<Vec<Value>> {
        let values = record.index_values();
        if values.len() != R::COLLECTION.index_columns.len() {
            return Err(RepoError::InvalidData(format!(
                "{} expects {} index values, record produced {}",
                self.table(),
                R::COLLECTION.index_columns.len(),
                values.len()
            )));
        }

        let mut bindings = Vec::with_capacity(values.len() + 2);
        bindings.push(date_value(record.record_date()));
        bindings.extend(values.into_iter().map(Value::Text));
        bindings.push(Value::Text(encode_payload(record)?));
        Ok(bindings)
    }

    fn write_existing(&self, id: &RecordId, record: &R) -> RepoResult<usize> {
        let mut assignments = vec!["record_date = ?".to_string()];
        assignments.extend(
            R::COLLECTION
                .index_columns
                .iter()
                .map(|column| format!("{column} = ?")),
        );
        assignments.push("payload = ?".to_string());
        assignments.push("updated_at = (strftime('%s', 'now') * 1000)".to_string());

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?;",
            self.table(),
            assignments.join(", ")
        );
        let mut bindings = self.index_bindings(record)?;
        bindings.push(Value::Text(id.as_str().to_string()));

        Ok(self.conn.execute(&sql, params_from_iter(bindings))?)
    }

    fn query_records(&self, sql: &str, bindings: Vec<Value>) -> RepoResult<Vec<Stored<R>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bindings))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row::<R>(row)?);
        }
        Ok(records)
    }
}

impl<R: Record> RecordRepository<R> for SqliteRecordRepository<'_, R> {
    fn add(&self, record: &R) -> RepoResult<RecordId> {
        record.validate_new()?;

        let id = RecordId::generate(R::COLLECTION.id_prefix);
        let mut columns = vec!["id", "record_date"];
        columns.extend_from_slice(R::COLLECTION.index_columns);
        columns.push("payload");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            self.table(),
            columns.join(", ")
        );

        let mut bindings = vec![Value::Text(id.as_str().to_string())];
        bindings.extend(self.index_bindings(record)?);
        self.conn.execute(&sql, params_from_iter(bindings))?;

        debug!(
            "event=record_add module=repo status=ok collection={} id={}",
            self.table(),
            id
        );
        Ok(id)
    }

    fn get(&self, id: &RecordId) -> RepoResult<Option<Stored<R>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, payload FROM {} WHERE id = ?1;",
            self.table()
        ))?;
        let mut rows = stmt.query(params![id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row::<R>(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: &RecordId, patch: &R::Patch) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(existing) = self.get(id)? else {
            return self.missing("update", id);
        };

        let merged = merge_patch(&existing.record, patch)?;
        merged.validate()?;
        self.write_existing(id, &merged)?;
        tx.commit()?;

        debug!(
            "event=record_update module=repo status=ok collection={} id={}",
            self.table(),
            id
        );
        Ok(())
    }

    fn replace(&self, id: &RecordId, record: &R) -> RepoResult<()> {
        record.validate()?;
        if self.write_existing(id, record)? == 0 {
            return self.missing("replace", id);
        }

        debug!(
            "event=record_replace module=repo status=ok collection={} id={}",
            self.table(),
            id
        );
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", self.table()),
            params![id.as_str()],
        )?;
        if changed == 0 {
            return self.missing("delete", id);
        }

        debug!(
            "event=record_delete module=repo status=ok collection={} id={}",
            self.table(),
            id
        );
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<Stored<R>>> {
        let sql = format!(
            "SELECT id, payload FROM {}
             ORDER BY record_date IS NULL, record_date DESC, seq ASC;",
            self.table()
        );
        self.query_records(&sql, Vec::new())
    }

    fn find_by_index(&self, column: &'static str, value: &str) -> RepoResult<Vec<Stored<R>>> {
        self.ensure_index_column(column)?;
        let sql = format!(
            "SELECT id, payload FROM {} WHERE {column} = ? ORDER BY seq ASC;",
            self.table()
        );
        self.query_records(&sql, vec![Value::Text(value.to_string())])
    }

    fn find_by_index_between(
        &self,
        column: &'static str,
        value: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<Stored<R>>> {
        self.ensure_index_column(column)?;
        if from > to {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, payload FROM {}
             WHERE {column} = ?
               AND record_date BETWEEN ? AND ?
             ORDER BY record_date DESC, seq ASC;",
            self.table()
        );
        self.query_records(
            &sql,
            vec![
                Value::Text(value.to_string()),
                date_value(Some(from)),
                date_value(Some(to)),
            ],
        )
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", self.table()),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }
}

/// Verifies that the connection was opened through `open_db` and carries
/// the collection table.
pub(crate) fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}

/// Applies patch fields over the record's JSON object (shallow merge).
pub(crate) fn merge_patch<R: Record>(record: &R, patch: &R::Patch) -> RepoResult<R> {
    let mut base = serde_json::to_value(record)
        .map_err(|err| RepoError::InvalidData(format!("record encode failed: {err}")))?;
    let patch_value = serde_json::to_value(patch)
        .map_err(|err| RepoError::InvalidData(format!("patch encode failed: {err}")))?;

    let (Some(target), serde_json::Value::Object(fields)) = (base.as_object_mut(), patch_value)
    else {
        return Err(RepoError::InvalidData(
            "records and patches must encode as JSON objects".to_string(),
        ));
    };
    for (key, value) in fields {
        target.insert(key, value);
    }

    serde_json::from_value(base)
        .map_err(|err| RepoError::InvalidData(format!("patched record decode failed: {err}")))
}

fn encode_payload<R: Record>(record: &R) -> RepoResult<String> {
    serde_json::to_string(record)
        .map_err(|err| RepoError::InvalidData(format!("record encode failed: {err}")))
}

fn parse_record_row<R: Record>(row: &Row<'_>) -> RepoResult<Stored<R>> {
    let id: String = row.get("id")?;
    let payload: String = row.get("payload")?;
    let record: R = serde_json::from_str(&payload).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid payload for `{id}` in {}: {err}",
            R::COLLECTION.table
        ))
    })?;
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "persisted `{id}` in {} fails validation: {err}",
            R::COLLECTION.table
        ))
    })?;

    Ok(Stored {
        id: RecordId::from(id),
        record,
    })
}

fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
        None => Value::Null,
    }
}
