//! Record identity.
//!
//! # Invariants
//! - IDs are assigned exactly once, at creation, by the store.
//! - IDs are opaque to callers; the prefix only aids log reading.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 9;

/// Opaque string identifier of a stored record.
///
/// Shape: `<prefix>-<epoch millis>-<random suffix>`. Uniqueness relies on the
/// millisecond timestamp plus a UUIDv4-derived suffix, which is ample for a
/// single local user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh ID for the given collection prefix.
    pub fn generate(prefix: &str) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{prefix}-{}-{}",
            Utc::now().timestamp_millis(),
            &suffix[..RANDOM_SUFFIX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_carry_prefix_and_are_distinct() {
        let ids: HashSet<RecordId> = (0..256).map(|_| RecordId::generate("trend")).collect();
        assert_eq!(ids.len(), 256);
        assert!(ids.iter().all(|id| id.as_str().starts_with("trend-")));
    }

    #[test]
    fn generated_id_has_three_segments() {
        let id = RecordId::generate("alert");
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }
}
