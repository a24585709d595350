//! Closed enumerations shared by health records.
//!
//! Every enum persists as a lowercase (kebab-case where multi-word) string,
//! both in JSON payloads and in SQL index columns.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Generates an enum with `as_str`, `ALL`, `Display` and `FromStr`.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ValidationError::UnknownVariant {
                        field: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Tracked scalar metric of a trend sample.
    MetricKind {
        Sleep => "sleep",
        Sodium => "sodium",
        Meds => "meds",
        Pain => "pain",
        Energy => "energy",
        Hydration => "hydration",
        Bp => "bp",
        Hr => "hr",
    }
);

str_enum!(
    /// How an emergency-room encounter ended.
    ErOutcome {
        Admitted => "admitted",
        Discharged => "discharged",
        Transferred => "transferred",
        LeftAma => "left-ama",
    }
);

str_enum!(TriggerCategory {
    Environmental => "environmental",
    Food => "food",
    Activity => "activity",
    Sensory => "sensory",
    Emotional => "emotional",
    Medication => "medication",
    Other => "other",
});

str_enum!(TriggerFrequency {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
    Rarely => "rarely",
});

str_enum!(
    /// Out-of-range vital sign kind.
    VitalAlertKind {
        BpHigh => "bp-high",
        BpLow => "bp-low",
        HrHigh => "hr-high",
        HrLow => "hr-low",
        O2Low => "o2-low",
    }
);

str_enum!(AlertSeverity {
    Warning => "warning",
    Critical => "critical",
});

str_enum!(AllergyKind {
    Medication => "medication",
    Food => "food",
    Environmental => "environmental",
    Other => "other",
});

str_enum!(AllergySeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
    Anaphylaxis => "anaphylaxis",
});

#[cfg(test)]
mod tests {
    use super::{ErOutcome, MetricKind, VitalAlertKind};
    use crate::model::validation::ValidationError;

    #[test]
    fn parses_case_insensitively_and_round_trips_as_str() {
        for kind in MetricKind::ALL {
            let upper = kind.as_str().to_ascii_uppercase();
            assert_eq!(upper.parse::<MetricKind>().unwrap(), *kind);
        }
        assert_eq!("left-ama".parse::<ErOutcome>().unwrap(), ErOutcome::LeftAma);
    }

    #[test]
    fn unknown_value_is_rejected_with_field_name() {
        let err = "bp-medium".parse::<VitalAlertKind>().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownVariant { field: "VitalAlertKind", .. }
        ));
    }

    #[test]
    fn serde_uses_persisted_names() {
        let json = serde_json::to_string(&VitalAlertKind::O2Low).unwrap();
        assert_eq!(json, "\"o2-low\"");
    }
}
