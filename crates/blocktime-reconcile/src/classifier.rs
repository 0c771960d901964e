//! Department/division → specialty decision table.
//!
//! The table encodes the institution's surgical taxonomy and is reproduced
//! exactly; it is not derived from data.

use blocktime_model::codes;

/// Top-level roster departments whose surgeons are classified by division.
/// Matching is exact on the raw `Department1` value.
pub const CLASSIFIED_DEPARTMENTS: [&str; 10] = [
    "DENTISTRY",
    "MEDICINE",
    "NEUROSURGERY",
    "OBSTETRICS AND GYNECOLOGY",
    "OPHTHALMOLOGY",
    "ORTHOPEDICS",
    "OTOLARYNGOLOGY",
    "PEDIATRICS",
    "SURGERY",
    "UROLOGY",
];

pub fn is_classified_department(department: &str) -> bool {
    CLASSIFIED_DEPARTMENTS.contains(&department)
}

/// Maps a roster department and division to a specialty code.
///
/// Both values are compared upper-cased. Unknown combinations yield
/// `UNDEFINED`; the function never fails.
///
/// # Examples
///
/// ```
/// use blocktime_reconcile::classify_division;
///
/// assert_eq!(classify_division("Surgery", Some("Colorectal")), "CRS");
/// assert_eq!(classify_division("OBSTETRICS AND GYNECOLOGY", None), "GYN");
/// assert_eq!(classify_division("MEDICINE", Some("CARDIOLOGY")), "UNDEFINED");
/// ```
pub fn classify_division(department: &str, division: Option<&str>) -> &'static str {
    let department = department.to_uppercase();
    let division = division.map(str::to_uppercase).unwrap_or_default();

    match department.as_str() {
        "OBSTETRICS AND GYNECOLOGY" => match division.as_str() {
            "GYNECOLOGY ONCOLOGY" => codes::GYNONC,
            "REPRODUCTIVE ENDOCRINE INFERTILITY" => codes::GYNREI,
            "FEMALE PELVIC MED. AND RECONST. SURG" => codes::GYNURO,
            _ => codes::GYN,
        },
        "DENTISTRY" => match division.as_str() {
            "PEDIATRIC DENTISTRY" => codes::PD_DEN,
            _ => codes::DENT_OMFS,
        },
        "SURGERY" => match division.as_str() {
            "BURNS" => codes::BURNS,
            "CARDIAC SURGERY" => codes::CAR,
            "COLORECTAL" => codes::CRS,
            "HEPATOBILIARY" => codes::HBS,
            "MINIMALLY INVASIVE SURGERY" => codes::MIS,
            "SURGICAL ONCOLOGY" => codes::ONC,
            "THORACIC" => codes::THO,
            "PLASTICS" => codes::PLAS,
            "ACUTE CARE SURGERY (ACS)" => codes::ACS,
            "VASCULAR" => codes::VAS,
            "PEDIATRICS" => codes::GS_PED,
            _ => codes::UNDEFINED,
        },
        "PEDIATRICS" => codes::GS_PED,
        "UROLOGY" => codes::URO,
        "OPHTHALMOLOGY" => codes::OPH,
        "OTOLARYNGOLOGY" => codes::OTO,
        "NEUROSURGERY" => codes::NEU,
        "ORTHOPEDICS" => match division.as_str() {
            "HAND SERVICES" => codes::ORT_HAND,
            "PODIATRY" => codes::ORT_POD,
            "SPORTS MEDICINE" => codes::ORT_SPT,
            _ => codes::ORT,
        },
        _ => codes::UNDEFINED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surgery_divisions() {
        let cases = [
            ("BURNS", "BURNS"),
            ("CARDIAC SURGERY", "CAR"),
            ("COLORECTAL", "CRS"),
            ("HEPATOBILIARY", "HBS"),
            ("MINIMALLY INVASIVE SURGERY", "MIS"),
            ("SURGICAL ONCOLOGY", "ONC"),
            ("THORACIC", "THO"),
            ("PLASTICS", "PLAS"),
            ("ACUTE CARE SURGERY (ACS)", "ACS"),
            ("VASCULAR", "VAS"),
            ("PEDIATRICS", "GS-PED"),
            ("TRAUMA", "UNDEFINED"),
        ];
        for (division, expected) in cases {
            assert_eq!(classify_division("SURGERY", Some(division)), expected, "{division}");
        }
        assert_eq!(classify_division("SURGERY", None), "UNDEFINED");
    }

    #[test]
    fn test_gynecology_and_orthopedics_defaults() {
        assert_eq!(
            classify_division("Obstetrics and Gynecology", Some("Gynecology Oncology")),
            "GYNONC"
        );
        assert_eq!(
            classify_division(
                "OBSTETRICS AND GYNECOLOGY",
                Some("Female Pelvic Med. and Reconst. Surg")
            ),
            "GYNURO"
        );
        assert_eq!(
            classify_division("OBSTETRICS AND GYNECOLOGY", Some("Reproductive Endocrine Infertility")),
            "GYNREI"
        );
        assert_eq!(classify_division("OBSTETRICS AND GYNECOLOGY", Some("General")), "GYN");
        assert_eq!(classify_division("ORTHOPEDICS", Some("Hand Services")), "ORT-HAND");
        assert_eq!(classify_division("ORTHOPEDICS", Some("Podiatry")), "ORT-POD");
        assert_eq!(classify_division("ORTHOPEDICS", Some("Sports Medicine")), "ORT-SPT");
        assert_eq!(classify_division("ORTHOPEDICS", Some("Spine")), "ORT");
        assert_eq!(classify_division("DENTISTRY", Some("Pediatric Dentistry")), "PD-DEN");
        assert_eq!(classify_division("DENTISTRY", None), "DENT-OMFS");
    }

    #[test]
    fn test_single_code_departments_ignore_division() {
        assert_eq!(classify_division("PEDIATRICS", Some("anything")), "GS-PED");
        assert_eq!(classify_division("UROLOGY", None), "URO");
        assert_eq!(classify_division("OPHTHALMOLOGY", None), "OPH");
        assert_eq!(classify_division("OTOLARYNGOLOGY", None), "OTO");
        assert_eq!(classify_division("NEUROSURGERY", None), "NEU");
    }

    #[test]
    fn test_every_classified_department_yields_a_code() {
        for department in CLASSIFIED_DEPARTMENTS {
            assert!(!classify_division(department, None).is_empty());
        }
        assert!(is_classified_department("SURGERY"));
        assert!(!is_classified_department("Surgery"));
        assert!(!is_classified_department("RADIOLOGY"));
    }
}
