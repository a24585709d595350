//! Core use-case services.
//!
//! # Responsibility
//! - Query layer, correlation engine and seeding on top of `HealthStore`.
//! - Keep callers decoupled from storage details.

use chrono::{Local, NaiveDate};

pub mod correlation;
pub mod query_service;
pub mod seed;

/// Current calendar day in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
