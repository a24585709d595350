//! Storage contract shared by all health record types.
//!
//! # Responsibility
//! - Describe which collection (table) a record type lives in.
//! - Expose the values of declared secondary indexes.
//! - Pair records with their store-assigned identity (`Stored<T>`).
//!
//! # Invariants
//! - `index_values()` returns exactly one value per entry of
//!   `Collection::index_columns`, in the same order.
//! - Record payloads never contain the ID; identity lives beside them.

use crate::model::id::RecordId;
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::Deref;

/// Static description of one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    /// SQLite table name.
    pub table: &'static str,
    /// Prefix used by generated record IDs.
    pub id_prefix: &'static str,
    /// Secondary index columns besides `record_date`.
    pub index_columns: &'static [&'static str],
}

/// A persistable health record.
pub trait Record: Serialize + DeserializeOwned + Clone + Debug {
    /// Partial-update shape; fields left `None` are not serialized and so
    /// keep their stored value.
    type Patch: Serialize + Debug;

    const COLLECTION: Collection;

    /// Checks field-level invariants before any write.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Extra checks applied on creation only.
    fn validate_new(&self) -> Result<(), ValidationError> {
        self.validate()
    }

    /// Calendar day used by the `record_date` index and for
    /// most-recent-first listings. Undated records list in insertion order.
    fn record_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Values for `COLLECTION.index_columns`.
    fn index_values(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A record together with its store-assigned ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}
