//! Repository layer: the persisted entity store.
//!
//! # Responsibility
//! - Define the record repository contract.
//! - Isolate SQLite and JSON payload details from services.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors, subject to `MissingRecordPolicy`.

pub mod record_repo;
pub mod store;
