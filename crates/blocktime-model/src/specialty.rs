//! Specialty codes.
//!
//! A specialty code is a short uppercase abbreviation for a clinical service
//! line. Availability is scheduled per code, so every case must carry one;
//! cases that cannot be resolved carry [`codes::UNDEFINED`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix marking a robot-assisted case.
pub const ROBOT_PREFIX: &str = "ROT-";

/// Known specialty codes.
pub mod codes {
    pub const GYN: &str = "GYN";
    pub const GYNONC: &str = "GYNONC";
    pub const GYNREI: &str = "GYNREI";
    pub const GYNURO: &str = "GYNURO";
    pub const PD_DEN: &str = "PD-DEN";
    pub const DENT_OMFS: &str = "DENT-OMFS";
    pub const BURNS: &str = "BURNS";
    pub const CAR: &str = "CAR";
    pub const CRS: &str = "CRS";
    pub const HBS: &str = "HBS";
    pub const MIS: &str = "MIS";
    pub const ONC: &str = "ONC";
    pub const THO: &str = "THO";
    pub const PLAS: &str = "PLAS";
    pub const ACS: &str = "ACS";
    pub const VAS: &str = "VAS";
    pub const GS_PED: &str = "GS-PED";
    pub const URO: &str = "URO";
    pub const OPH: &str = "OPH";
    pub const OTO: &str = "OTO";
    pub const NEU: &str = "NEU";
    pub const ORT: &str = "ORT";
    pub const ORT_HAND: &str = "ORT-HAND";
    pub const ORT_POD: &str = "ORT-POD";
    pub const ORT_SPT: &str = "ORT-SPT";
    pub const UNDEFINED: &str = "UNDEFINED";
}

/// A normalized specialty code: trimmed, uppercase and never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Specialty(String);

impl Specialty {
    /// Normalizes a raw code. Blank input becomes `UNDEFINED`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktime_model::Specialty;
    ///
    /// assert_eq!(Specialty::new(" gynonc ").as_str(), "GYNONC");
    /// assert_eq!(Specialty::new("   ").as_str(), "UNDEFINED");
    /// ```
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::undefined()
        } else {
            Self(trimmed.to_uppercase())
        }
    }

    /// The `UNDEFINED` sentinel.
    pub fn undefined() -> Self {
        Self(codes::UNDEFINED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == codes::UNDEFINED
    }

    /// Returns this code with the robot-assisted prefix.
    pub fn robot_assisted(&self) -> Self {
        Self(format!("{ROBOT_PREFIX}{}", self.0))
    }
}

impl Default for Specialty {
    fn default() -> Self {
        Self::undefined()
    }
}

impl From<String> for Specialty {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Specialty {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Specialty> for String {
    fn from(value: Specialty) -> Self {
        value.0
    }
}

impl PartialEq<str> for Specialty {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Specialty {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
