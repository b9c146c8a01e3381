//! Static rule data for choosing shipping-relevant subdivision types.
//!
//! Type labels are the `type` values of the iso-codes ISO 3166-2 data and
//! are compared case-insensitively.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Curated subdivision types used in postal addresses, per country.
///
/// An empty list means addresses in that country carry no subdivision.
const SHIPPING_TYPES: &[(&str, &[&str])] = &[
    ("AE", &["Emirate"]),
    ("AR", &["Province", "City"]),
    ("AT", &["State"]),
    ("AU", &["State", "Territory"]),
    ("BD", &["Division"]),
    ("BE", &[]),
    ("BO", &["Department"]),
    ("BR", &["State", "Federal district"]),
    ("BY", &["Oblast", "City"]),
    ("CA", &["Province", "Territory"]),
    ("CH", &["Canton"]),
    ("CL", &["Region"]),
    ("CN", &["Province", "Municipality", "Autonomous region", "Special administrative region"]),
    ("CO", &["Department", "Capital district"]),
    ("CR", &["Province"]),
    ("CU", &["Province", "Special municipality"]),
    ("CZ", &["Region", "Capital city"]),
    ("DE", &["Land"]),
    ("DK", &[]),
    ("DO", &["Province", "District"]),
    ("DZ", &["Province"]),
    ("EC", &["Province"]),
    ("EG", &["Governorate"]),
    ("ES", &["Province"]),
    ("ET", &["Regional state", "Administration"]),
    ("FI", &[]),
    ("FR", &["Metropolitan department", "Overseas departmental collectivity", "Overseas unique territorial collectivity", "Metropolitan collectivity with special status", "European collectivity"]),
    ("GB", &[]),
    ("GH", &["Region"]),
    ("GR", &["Administrative region"]),
    ("GT", &["Department"]),
    ("HK", &[]),
    ("HN", &["Department"]),
    ("HU", &["County", "Capital city"]),
    ("ID", &["Province"]),
    ("IE", &["County"]),
    ("IN", &["State", "Union territory"]),
    ("IQ", &["Governorate", "Region"]),
    ("IR", &["Province"]),
    ("IT", &["Province", "Metropolitan city", "Free municipal consortium", "Autonomous province", "Decentralized regional entity"]),
    ("JP", &["Prefecture"]),
    ("KE", &["County"]),
    ("KR", &["Province", "Metropolitan city", "Special city", "Special self-governing city", "Special self-governing province"]),
    ("KZ", &["Region", "City"]),
    ("LK", &["Province"]),
    ("MA", &["Province", "Prefecture"]),
    ("MX", &["State", "Federal entity"]),
    ("MY", &["State", "Federal territory"]),
    ("NG", &["State", "Capital territory"]),
    ("NI", &["Department", "Autonomous region"]),
    ("NL", &[]),
    ("NO", &[]),
    ("NP", &["Province"]),
    ("NZ", &[]),
    ("PA", &["Province", "Indigenous region"]),
    ("PE", &["Region", "Municipality"]),
    ("PH", &["Province"]),
    ("PK", &["Province", "Federal capital territory", "Pakistan administered area"]),
    ("PL", &["Voivodship"]),
    ("PT", &["District", "Autonomous region"]),
    ("PY", &["Department", "Capital"]),
    ("RO", &["Department", "Municipality"]),
    ("RU", &["Republic", "Administrative territory", "Administrative region", "Autonomous city", "Autonomous district", "Autonomous province"]),
    ("SA", &["Province"]),
    ("SE", &[]),
    ("SG", &[]),
    ("SV", &["Department"]),
    ("TH", &["Province", "Metropolitan administration"]),
    ("TN", &["Governorate"]),
    ("TR", &["Province"]),
    ("TW", &["County", "City", "Special municipality"]),
    ("UA", &["Region", "Republic", "City"]),
    ("US", &["State", "District", "Outlying area"]),
    ("UY", &["Department"]),
    ("VE", &["State", "Capital district", "Federal dependency"]),
    ("VN", &["Province", "Municipality"]),
    ("ZA", &["Province"]),
];

/// Administrative type labels from most general to most specific.
const TYPE_RANKING: &[&str] = &[
    "Country",
    "Nation",
    "Constituent country",
    "Region",
    "Administrative region",
    "Metropolitan region",
    "Geographical region",
    "Geographical unit",
    "Geographical entity",
    "Region",
    "Autonomous community",
    "Autonomous region",
    "Federal district",
    "Capital district",
    "State",
    "Land",
    "Province",
    "Territory",
    "Union territory",
    "Emirate",
    "Governorate",
    "Oblast",
    "Republic",
    "Prefecture",
    "Department",
    "Canton",
    "County",
    "Voivodship",
    "Division",
    "District",
    "Metropolitan city",
    "City",
    "Municipality",
    "Commune",
    "Parish",
];

/// Labels too broad to address by.
const TOO_GENERAL: &[&str] = &[
    "Country",
    "Nation",
    "Constituent country",
    "Region",
    "Administrative region",
    "Metropolitan region",
    "Geographical region",
    "Geographical unit",
    "Geographical entity",
];

/// Labels too fine-grained to address by.
const TOO_SPECIFIC: &[&str] = &[
    "Municipality",
    "City",
    "City corporation",
    "City municipality",
    "Urban municipality",
    "Rural municipality",
    "Commune",
    "Parish",
    "Town",
    "Town council",
    "Local council",
    "Village",
    "Ward",
    "Borough",
    "London borough",
    "Metropolitan district",
    "Unitary authority",
    "Council area",
];

/// Minimum number of subdivisions a type needs to be picked by the heuristic.
pub const MIN_OCCURRENCES: usize = 3;

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Immutable rule set consulted by the type selector.
#[derive(Debug, Clone, Default)]
pub struct SelectionRules {
    overrides: HashMap<String, HashSet<String>>,
    ranking: HashMap<String, usize>,
    too_general: HashSet<String>,
    too_specific: HashSet<String>,
    min_occurrences: usize,
}

static STANDARD_RULES: OnceLock<SelectionRules> = OnceLock::new();

impl SelectionRules {
    /// The built-in rules (initialized once on first access).
    pub fn standard() -> &'static SelectionRules {
        STANDARD_RULES.get_or_init(|| {
            let mut rules = SelectionRules::new()
                .with_ranking(TYPE_RANKING)
                .with_too_general(TOO_GENERAL)
                .with_too_specific(TOO_SPECIFIC);
            for (country, types) in SHIPPING_TYPES {
                rules = rules.with_override(country, types);
            }
            rules
        })
    }

    /// Empty rules: no overrides, no ranking, no exclusions.
    pub fn new() -> SelectionRules {
        SelectionRules {
            min_occurrences: MIN_OCCURRENCES,
            ..Default::default()
        }
    }

    pub fn with_override(mut self, country: &str, types: &[&str]) -> SelectionRules {
        self.overrides.insert(
            country.trim().to_uppercase(),
            types.iter().map(|t| normalize(t)).collect(),
        );
        self
    }

    pub fn with_ranking(mut self, ranking: &[&str]) -> SelectionRules {
        self.ranking = ranking
            .iter()
            .enumerate()
            .map(|(position, label)| (normalize(label), position))
            .collect();
        self
    }

    pub fn with_too_general(mut self, labels: &[&str]) -> SelectionRules {
        self.too_general = labels.iter().map(|l| normalize(l)).collect();
        self
    }

    pub fn with_too_specific(mut self, labels: &[&str]) -> SelectionRules {
        self.too_specific = labels.iter().map(|l| normalize(l)).collect();
        self
    }

    pub fn with_min_occurrences(mut self, min: usize) -> SelectionRules {
        self.min_occurrences = min;
        self
    }

    /// Whether the override table has an entry for `country`.
    pub fn has_override(&self, country: &str) -> bool {
        self.overrides.contains_key(country)
    }

    /// Whether `kind` is allowed by `country`'s override; `None` without an override.
    pub fn override_allows(&self, country: &str, kind: &str) -> Option<bool> {
        self.overrides
            .get(country)
            .map(|allowed| allowed.contains(&normalize(kind)))
    }

    /// Specificity of `kind`: position in the ranking, `usize::MAX` when unranked.
    pub fn rank(&self, kind: &str) -> usize {
        self.ranking
            .get(&normalize(kind))
            .copied()
            .unwrap_or(usize::MAX)
    }

    /// Whether the heuristic must never pick `kind`.
    pub fn is_excluded(&self, kind: &str) -> bool {
        let label = normalize(kind);
        self.too_general.contains(&label) || self.too_specific.contains(&label)
    }

    pub fn min_occurrences(&self) -> usize {
        self.min_occurrences
    }
}
