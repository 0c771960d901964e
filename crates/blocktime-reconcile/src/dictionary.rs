//! Specialty dictionary resolution.
//!
//! Turns the raw dictionary sheet into two unambiguous lookups keyed by the
//! first and second synonym of `Name from Raw Data`.

use std::collections::{BTreeMap, HashMap};

use blocktime_model::{DictionaryRecord, Specialty};

/// Selection flag marking rows that participate in the lookup.
pub const SELECTED_FLAG: &str = "V";

/// Placeholder name the dictionary uses for "no raw name".
const NOT_APPLICABLE: &str = "NA";

/// A usable dictionary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub raw_name1: String,
    pub raw_name2: Option<String>,
    pub abbreviation: Option<String>,
    pub service: Option<String>,
}

impl DictionaryEntry {
    /// The specialty this entry resolves to. An entry without a service does
    /// not count as a match.
    pub fn candidate(&self) -> Option<Specialty> {
        self.service.as_ref()?;
        Some(Specialty::new(self.abbreviation.as_deref().unwrap_or_default()))
    }
}

/// Name → entry lookups built from the dictionary sheet.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLookup {
    by_primary: HashMap<String, DictionaryEntry>,
    by_secondary: HashMap<String, DictionaryEntry>,
    ambiguous: Vec<String>,
}

impl DictionaryLookup {
    /// Entry whose first synonym equals `name` exactly.
    pub fn primary(&self, name: &str) -> Option<&DictionaryEntry> {
        self.by_primary.get(name)
    }

    /// Entry whose second synonym equals `name` exactly.
    pub fn secondary(&self, name: &str) -> Option<&DictionaryEntry> {
        self.by_secondary.get(name)
    }

    /// First synonyms dropped because more than one row used them, sorted.
    pub fn ambiguous_names(&self) -> &[String] {
        &self.ambiguous
    }

    pub fn len(&self) -> usize {
        self.by_primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_primary.is_empty()
    }
}

/// Splits `"Name1/Name2"` into its synonyms. Only the first two parts are used.
fn split_name(name: &str) -> (String, Option<String>) {
    let mut parts = name.split('/');
    let first = parts.next().unwrap_or_default().to_string();
    let second = parts
        .next()
        .filter(|part| !part.is_empty())
        .map(str::to_string);
    (first, second)
}

/// Builds the lookups.
///
/// Rows without a name, named `NA`, or not flagged `V` are skipped. Every
/// first synonym used by more than one remaining row is dropped entirely.
/// When two surviving rows share a second synonym, the first row wins.
pub fn resolve_dictionary(records: &[DictionaryRecord]) -> DictionaryLookup {
    let mut groups: BTreeMap<String, Vec<DictionaryEntry>> = BTreeMap::new();
    let mut order = Vec::new();

    for record in records {
        let Some(name) = record.name.as_deref() else {
            continue;
        };
        if name == NOT_APPLICABLE || record.selection.as_deref() != Some(SELECTED_FLAG) {
            continue;
        }
        let (raw_name1, raw_name2) = split_name(name);
        let group = groups.entry(raw_name1.clone()).or_default();
        if group.is_empty() {
            order.push(raw_name1.clone());
        }
        group.push(DictionaryEntry {
            raw_name1,
            raw_name2,
            abbreviation: record.abbreviation.clone(),
            service: record.service.clone(),
        });
    }

    let mut lookup = DictionaryLookup::default();
    for name in order {
        let Some(mut group) = groups.remove(&name) else {
            continue;
        };
        if group.len() > 1 {
            lookup.ambiguous.push(name);
            continue;
        }
        let Some(entry) = group.pop() else {
            continue;
        };
        if let Some(secondary) = entry.raw_name2.clone() {
            lookup
                .by_secondary
                .entry(secondary)
                .or_insert_with(|| entry.clone());
        }
        lookup.by_primary.insert(name, entry);
    }
    lookup.ambiguous.sort();

    tracing::debug!(
        entries = lookup.by_primary.len(),
        secondary = lookup.by_secondary.len(),
        ambiguous = lookup.ambiguous.len(),
        "resolved dictionary"
    );
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: Option<&str>, selection: &str, abbreviation: &str, service: &str) -> DictionaryRecord {
        DictionaryRecord {
            name: name.map(str::to_string),
            selection: Some(selection.to_string()),
            abbreviation: Some(abbreviation.to_string()),
            service: Some(service.to_string()),
        }
    }

    #[test]
    fn test_filters_and_splits() {
        let lookup = resolve_dictionary(&[
            row(Some("Urology/Uro"), "V", "URO", "Urology"),
            row(Some("Cardiac"), "X", "CAR", "Cardiac"),
            row(Some("NA"), "V", "ONC", "Oncology"),
            row(None, "V", "VAS", "Vascular"),
        ]);
        assert_eq!(lookup.len(), 1);
        let entry = lookup.primary("Urology").unwrap();
        assert_eq!(entry.raw_name2.as_deref(), Some("Uro"));
        assert_eq!(lookup.secondary("Uro").unwrap().raw_name1, "Urology");
        assert!(lookup.primary("Cardiac").is_none());
        assert!(lookup.primary("NA").is_none());
    }

    #[test]
    fn test_ambiguous_first_synonym_drops_whole_group() {
        let lookup = resolve_dictionary(&[
            row(Some("General Surgery/GS"), "V", "ACS", "Acute Care"),
            row(Some("General Surgery"), "V", "MIS", "Minimally Invasive"),
            row(Some("Thoracic"), "V", "THO", "Thoracic"),
        ]);
        assert!(lookup.primary("General Surgery").is_none());
        assert!(lookup.secondary("GS").is_none());
        assert_eq!(lookup.ambiguous_names(), ["General Surgery".to_string()]);
        assert!(lookup.primary("Thoracic").is_some());
    }

    #[test]
    fn test_candidate_requires_service() {
        let mut entry = DictionaryEntry {
            raw_name1: "Plastics".into(),
            raw_name2: None,
            abbreviation: Some("plas".into()),
            service: None,
        };
        assert_eq!(entry.candidate(), None);
        entry.service = Some("Plastic Surgery".into());
        assert_eq!(entry.candidate(), Some(Specialty::new("PLAS")));
        entry.abbreviation = None;
        assert_eq!(entry.candidate(), Some(Specialty::undefined()));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("A/B/C"), ("A".to_string(), Some("B".to_string())));
        assert_eq!(split_name("A/"), ("A".to_string(), None));
        assert_eq!(split_name("A"), ("A".to_string(), None));
    }
}
