//! Configuration options for reconciliation and workbook loading.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::specialty::codes;

/// Default layout of `Patient In Room Date/Time`, e.g. `08/01/24 07:28`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M";

/// Options for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// `chrono` format of the case timestamp.
    pub timestamp_format: String,

    /// Specialties that receive the robot-assisted prefix.
    pub robot_specialties: BTreeSet<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            robot_specialties: [
                codes::ACS,
                codes::CRS,
                codes::GYN,
                codes::GYNONC,
                codes::HBS,
                codes::MIS,
                codes::URO,
                codes::THO,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn is_robot_eligible(&self, code: &str) -> bool {
        self.robot_specialties.contains(code)
    }
}

/// Sheet names inside the Available Time workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub summary: String,
    pub dictionary: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            summary: "Summary by Each Month".to_string(),
            dictionary: "Dictionary".to_string(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocktimeConfig {
    pub reconcile: ReconcileOptions,
    pub sheets: SheetNames,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReconcileOptions::default();
        assert_eq!(options.timestamp_format, "%m/%d/%y %H:%M");
        assert!(options.is_robot_eligible("URO"));
        assert!(!options.is_robot_eligible("PLAS"));
        assert_eq!(options.robot_specialties.len(), 8);
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: BlocktimeConfig =
            serde_json::from_str(r#"{ "sheets": { "summary": "Monthly" } }"#).unwrap();
        assert_eq!(config.sheets.summary, "Monthly");
        assert_eq!(config.sheets.dictionary, "Dictionary");
        assert_eq!(config.reconcile, ReconcileOptions::default());
    }

    #[test]
    fn test_robot_set_can_be_replaced() {
        let config: BlocktimeConfig =
            serde_json::from_str(r#"{ "reconcile": { "robot_specialties": ["CAR"] } }"#).unwrap();
        assert!(config.reconcile.is_robot_eligible("CAR"));
        assert!(!config.reconcile.is_robot_eligible("URO"));
    }
}
