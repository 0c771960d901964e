//! Procedure-based specialty overrides.
//!
//! Rules are evaluated in [`OVERRIDE_RULES`] order, each against the base
//! classification rather than against the output of an earlier rule. When
//! several rules match, the later one wins.

use blocktime_model::{CaseRecord, ReconcileOptions, Specialty, codes};
use serde::Serialize;

/// A rule that may replace a case's base specialty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverrideRule {
    /// Robot-assisted procedures in an eligible specialty get the `ROT-` prefix.
    RobotAssisted,
    /// Burn procedures classified as plastics move to burns.
    BurnReclassification,
}

/// Evaluation order.
pub const OVERRIDE_RULES: [OverrideRule; 2] =
    [OverrideRule::RobotAssisted, OverrideRule::BurnReclassification];

impl OverrideRule {
    /// The replacement specialty, if this rule matches.
    pub fn evaluate(
        self,
        case: &CaseRecord,
        base: &Specialty,
        options: &ReconcileOptions,
    ) -> Option<Specialty> {
        match self {
            OverrideRule::RobotAssisted => (case.procedure_mentions("robot")
                && options.is_robot_eligible(base.as_str()))
            .then(|| base.robot_assisted()),
            OverrideRule::BurnReclassification => (case.procedure_mentions("burn")
                && *base == codes::PLAS)
                .then(|| Specialty::new(codes::BURNS)),
        }
    }
}

/// Final specialty plus the rule that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOutcome {
    pub specialty: Specialty,
    pub rule: Option<OverrideRule>,
}

/// Applies every rule to `base` and keeps the last match.
pub fn apply_overrides(
    case: &CaseRecord,
    base: Specialty,
    options: &ReconcileOptions,
) -> OverrideOutcome {
    let matched = OVERRIDE_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(case, &base, options).map(|s| (*rule, s)))
        .last();
    match matched {
        Some((rule, specialty)) => OverrideOutcome {
            specialty,
            rule: Some(rule),
        },
        None => OverrideOutcome {
            specialty: base,
            rule: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(procedure: &str) -> CaseRecord {
        CaseRecord {
            primary_procedure: Some(procedure.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_robot_prefix_for_eligible_specialty() {
        let options = ReconcileOptions::default();
        let outcome = apply_overrides(
            &case("ROBOTIC-ASSISTED PROSTATECTOMY"),
            Specialty::new("URO"),
            &options,
        );
        assert_eq!(outcome.specialty, "ROT-URO");
        assert_eq!(outcome.rule, Some(OverrideRule::RobotAssisted));
    }

    #[test]
    fn test_robot_ignored_for_ineligible_specialty() {
        let options = ReconcileOptions::default();
        let outcome = apply_overrides(&case("Robotic knee"), Specialty::new("ORT"), &options);
        assert_eq!(outcome.specialty, "ORT");
        assert_eq!(outcome.rule, None);
    }

    #[test]
    fn test_burn_reclassifies_plastics() {
        let options = ReconcileOptions::default();
        let outcome = apply_overrides(
            &case("Excision of burn eschar"),
            Specialty::new("PLAS"),
            &options,
        );
        assert_eq!(outcome.specialty, "BURNS");

        let outcome = apply_overrides(&case("Burn debridement"), Specialty::new("GYN"), &options);
        assert_eq!(outcome.specialty, "GYN");
    }

    // Open question: should the burn rule see the robot-prefixed value? It is
    // evaluated against the base, so a robotic burn case in plastics becomes
    // BURNS rather than staying ROT-PLAS or PLAS.
    #[test]
    fn test_burn_rule_reads_base_not_robot_prefixed_value() {
        let mut options = ReconcileOptions::default();
        options.robot_specialties.insert("PLAS".to_string());
        let outcome = apply_overrides(
            &case("Robotic burn reconstruction"),
            Specialty::new("PLAS"),
            &options,
        );
        assert_eq!(outcome.specialty, "BURNS");
        assert_eq!(outcome.rule, Some(OverrideRule::BurnReclassification));

        let outcome = apply_overrides(
            &case("Robotic burn reconstruction"),
            Specialty::new("PLAS"),
            &ReconcileOptions::default(),
        );
        assert_eq!(outcome.specialty, "BURNS");
    }

    #[test]
    fn test_missing_procedure_never_overrides() {
        let outcome = apply_overrides(
            &CaseRecord::default(),
            Specialty::new("URO"),
            &ReconcileOptions::default(),
        );
        assert_eq!(outcome.specialty, "URO");
    }
}
