//! Per-country choice of the subdivision level used in postal addresses.

use crate::selection::SelectionRules;
use crate::source::SubdivisionRecord;
use serde::Serialize;
use tracing::info;

/// Occurrences of each subdivision type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    entries: Vec<(String, usize)>,
}

impl TypeCounts {
    pub fn from_kinds<'a>(kinds: impl IntoIterator<Item = &'a str>) -> TypeCounts {
        let mut entries: Vec<(String, usize)> = Vec::new();
        for kind in kinds {
            match entries.iter_mut().find(|(k, _)| k == kind) {
                Some((_, count)) => *count += 1,
                None => entries.push((kind.to_string(), 1)),
            }
        }
        TypeCounts { entries }
    }

    pub fn count(&self, kind: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// `(type, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which rule decided a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionBasis {
    /// The curated per-country table
    Override,
    /// Occurrence counts and the ranking/exclusion lists
    Heuristic,
}

/// Subdivision types chosen for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub basis: SelectionBasis,
    /// Selected types, most general first, then in first-seen order
    pub types: Vec<String>,
    /// Observed types rejected by an override entry
    pub anomalies: Vec<String>,
}

impl Selection {
    pub fn contains(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SelectionRules {
    /// Choose the shipping-relevant subdivision types of `country`.
    ///
    /// `subdivisions` should be that country's full listing; only the `kind`
    /// of each record is used.
    pub fn select_types(&self, country: &str, subdivisions: &[SubdivisionRecord]) -> Selection {
        let counts = TypeCounts::from_kinds(subdivisions.iter().map(|s| s.kind.as_str()));
        self.select_from_counts(country, &counts)
    }

    pub fn select_from_counts(&self, country: &str, counts: &TypeCounts) -> Selection {
        let observed: Vec<(usize, &str, usize)> = counts
            .iter()
            .enumerate()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(seen, (kind, count))| (seen, kind, count))
            .collect();

        let (basis, chosen, anomalies) = if self.has_override(country) {
            let (allowed, rejected): (Vec<(usize, &str, usize)>, Vec<(usize, &str, usize)>) =
                observed
                    .iter()
                    .copied()
                    .partition(|(_, kind, _)| self.override_allows(country, kind) == Some(true));

            for (_, kind, count) in &rejected {
                info!(
                    "{}: type '{}' ({} subdivisions) is not in the override list",
                    country, kind, count
                );
            }

            let anomalies = rejected.iter().map(|(_, kind, _)| kind.to_string()).collect();
            (SelectionBasis::Override, allowed, anomalies)
        } else {
            (SelectionBasis::Heuristic, self.heuristic(&observed), Vec::new())
        };

        let mut ranked: Vec<(usize, usize, &str)> = chosen
            .iter()
            .map(|(seen, kind, _)| (self.rank(kind), *seen, *kind))
            .collect();
        ranked.sort();

        Selection {
            basis,
            types: ranked.into_iter().map(|(_, _, kind)| kind.to_string()).collect(),
            anomalies,
        }
    }

    fn heuristic<'a>(
        &self,
        observed: &[(usize, &'a str, usize)],
    ) -> Vec<(usize, &'a str, usize)> {
        let candidates: Vec<(usize, &str, usize)> = observed
            .iter()
            .filter(|(_, kind, _)| !self.is_excluded(kind))
            .copied()
            .collect();

        let frequent: Vec<(usize, &str, usize)> = candidates
            .iter()
            .filter(|(_, _, count)| *count >= self.min_occurrences())
            .copied()
            .collect();
        if !frequent.is_empty() {
            return frequent;
        }

        // Highest count wins; on a tie the first-seen type is kept.
        let mut best: Option<(usize, &str, usize)> = None;
        for candidate in candidates {
            if best.map_or(true, |(_, _, count)| candidate.2 > count) {
                best = Some(candidate);
            }
        }
        best.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subdivisions(kinds: &[(&str, usize)]) -> Vec<SubdivisionRecord> {
        let mut records = Vec::new();
        for (kind, count) in kinds {
            for i in 0..*count {
                records.push(SubdivisionRecord {
                    code: format!("XX-{}{}", &kind[..1], i),
                    kind: kind.to_string(),
                    local_name: None,
                    name: format!("{} {}", kind, i),
                });
            }
        }
        records
    }

    fn rules() -> SelectionRules {
        SelectionRules::new()
            .with_override("ES", &["Province"])
            .with_override("GB", &[])
            .with_ranking(&["Country", "Region", "State", "Province", "District", "Municipality"])
            .with_too_general(&["Country"])
            .with_too_specific(&["Municipality", "Parish"])
    }

    // ==================== TypeCounts Tests ====================

    #[test]
    fn test_counts_keep_first_seen_order() {
        let counts = TypeCounts::from_kinds(["Province", "City", "Province", "Region"]);
        let entries: Vec<(&str, usize)> = counts.iter().collect();
        assert_eq!(entries, vec![("Province", 2), ("City", 1), ("Region", 1)]);
        assert_eq!(counts.count("City"), 1);
        assert_eq!(counts.count("State"), 0);
    }

    // ==================== Override Tests ====================

    #[test]
    fn test_override_intersects_observed_types() {
        let records = subdivisions(&[
            ("Autonomous community", 17),
            ("Province", 50),
            ("Autonomous city in north africa", 2),
        ]);
        let selection = rules().select_types("ES", &records);

        assert_eq!(selection.basis, SelectionBasis::Override);
        assert_eq!(selection.types, vec!["Province"]);
        assert_eq!(
            selection.anomalies,
            vec!["Autonomous community", "Autonomous city in north africa"]
        );
    }

    #[test]
    fn test_override_ignores_counts_and_exclusions() {
        let rules = rules().with_override("PE", &["Region", "Municipality"]);
        let records = subdivisions(&[("Municipality", 1), ("Region", 25)]);
        let selection = rules.select_types("PE", &records);

        assert_eq!(selection.types, vec!["Region", "Municipality"]);
        assert!(selection.anomalies.is_empty());
    }

    #[test]
    fn test_override_type_not_observed() {
        let records = subdivisions(&[("Autonomous community", 17)]);
        let selection = rules().select_types("ES", &records);
        assert!(selection.is_empty());
        assert_eq!(selection.anomalies, vec!["Autonomous community"]);
    }

    #[test]
    fn test_empty_override_selects_nothing() {
        let records = subdivisions(&[("Nation", 4), ("Two-tier county", 21)]);
        let selection = rules().select_types("GB", &records);
        assert_eq!(selection.basis, SelectionBasis::Override);
        assert!(selection.is_empty());
        assert_eq!(selection.anomalies.len(), 2);
    }

    // ==================== Heuristic Tests ====================

    #[test]
    fn test_heuristic_province_over_municipality() {
        let records = subdivisions(&[("Province", 5), ("Municipality", 50)]);
        let selection = rules().select_types("XX", &records);

        assert_eq!(selection.basis, SelectionBasis::Heuristic);
        assert_eq!(selection.types, vec!["Province"]);
        assert!(!selection.contains("Municipality"));
    }

    #[test]
    fn test_heuristic_selects_every_type_over_threshold() {
        let records = subdivisions(&[
            ("District", 4),
            ("Country", 10),
            ("Unlisted level", 3),
            ("State", 3),
            ("Region", 2),
        ]);
        let selection = rules().select_types("XX", &records);

        // ranked types first (general to specific), unranked last
        assert_eq!(selection.types, vec!["State", "District", "Unlisted level"]);
    }

    #[test]
    fn test_heuristic_falls_back_to_highest_count() {
        let records = subdivisions(&[("Region", 1), ("District", 2), ("Parish", 9)]);
        let selection = rules().select_types("XX", &records);
        assert_eq!(selection.types, vec!["District"]);
    }

    #[test]
    fn test_heuristic_tie_breaks_on_first_seen() {
        let records = subdivisions(&[("District", 2), ("Region", 2), ("Province", 1)]);
        let selection = rules().select_types("XX", &records);
        assert_eq!(selection.types, vec!["District"]);

        let reordered = subdivisions(&[("Region", 2), ("District", 2), ("Province", 1)]);
        let selection = rules().select_types("XX", &reordered);
        assert_eq!(selection.types, vec!["Region"]);
    }

    #[test]
    fn test_heuristic_only_excluded_types() {
        let records = subdivisions(&[("Country", 1), ("Municipality", 40)]);
        let selection = rules().select_types("XX", &records);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_no_subdivisions() {
        assert!(rules().select_types("XX", &[]).is_empty());
        assert!(rules().select_types("ES", &[]).is_empty());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let records = subdivisions(&[
            ("Region", 3),
            ("Province", 7),
            ("Municipality", 30),
            ("Unlisted level", 4),
        ]);
        let first = rules().select_types("XX", &records);
        for _ in 0..20 {
            assert_eq!(rules().select_types("XX", &records), first);
        }
        assert_eq!(first.types, vec!["Region", "Province", "Unlisted level"]);
    }

    #[test]
    fn test_standard_rules_drop_top_level_regions() {
        let records = subdivisions(&[("Region", 5), ("Province", 20)]);
        let selection = SelectionRules::standard().select_types("XX", &records);
        assert_eq!(selection.basis, SelectionBasis::Heuristic);
        assert_eq!(selection.types, vec!["Province"]);
    }

    #[test]
    fn test_override_may_still_select_regions() {
        let records = subdivisions(&[("Region", 16)]);
        let selection = SelectionRules::standard().select_types("CL", &records);
        assert_eq!(selection.types, vec!["Region"]);
    }

    #[test]
    fn test_standard_rules_on_unknown_country() {
        let records = subdivisions(&[("Province", 5), ("Municipality", 50)]);
        let selection = SelectionRules::standard().select_types("XX", &records);
        assert_eq!(selection.types, vec!["Province"]);
    }
}
