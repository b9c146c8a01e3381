//! Subdivision name aggregation: country → region code → locale → name.

use crate::aggregate::{CountryTable, NameMap, SkipReason};
use crate::locale::LocaleId;
use crate::report::PhaseReport;
use crate::selection::{Selection, SelectionRules, TypeCounts};
use crate::source::SubdivisionRecord;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Region code → names, ordered by region code.
pub type RegionTable = BTreeMap<String, NameMap>;

/// Country code → regions, ordered by country code.
pub type SubdivisionTable = BTreeMap<String, RegionTable>;

/// Accumulates subdivision names locale by locale.
///
/// The anchor locale's listing decides, per country, which subdivision types
/// are kept and which regions exist; other locales only add names.
#[derive(Debug)]
pub struct SubdivisionAggregator {
    anchor: LocaleId,
    regions: SubdivisionTable,
    selections: BTreeMap<String, Selection>,
    report: PhaseReport,
}

impl SubdivisionAggregator {
    /// Build the region universe from the anchor locale.
    ///
    /// Only subdivisions of countries in `countries` are considered. Type
    /// selection runs on each country's full anchor listing.
    pub fn seed(
        anchor: LocaleId,
        countries: &CountryTable,
        records: &[SubdivisionRecord],
        rules: &SelectionRules,
    ) -> SubdivisionAggregator {
        let mut report = PhaseReport {
            locales_processed: 1,
            ..Default::default()
        };

        let mut by_country: BTreeMap<&str, Vec<(&str, &SubdivisionRecord)>> = BTreeMap::new();
        for record in records {
            match record.split_code() {
                Some((country, region)) if countries.contains_key(country) => {
                    by_country.entry(country).or_default().push((region, record));
                }
                Some(_) => report.record_skip(SkipReason::UnknownCode),
                None => {
                    debug!("Malformed subdivision code '{}'", record.code);
                    report.record_skip(SkipReason::MalformedCode);
                }
            }
        }

        let mut regions = SubdivisionTable::new();
        let mut selections = BTreeMap::new();
        for (country, entries) in by_country {
            let counts = TypeCounts::from_kinds(entries.iter().map(|(_, r)| r.kind.as_str()));
            let selection = rules.select_from_counts(country, &counts);
            debug!(
                "{}: selected {:?} ({:?}) from {} subdivisions",
                country,
                selection.types,
                selection.basis,
                entries.len()
            );

            let mut table = RegionTable::new();
            for (region, record) in entries {
                if !selection.contains(&record.kind) {
                    report.record_skip(SkipReason::UnselectedType);
                    continue;
                }
                let name = record.display_name();
                if name.is_empty() {
                    warn!("Subdivision {} has no name in anchor locale {}", record.code, anchor);
                    continue;
                }
                table
                    .entry(region.to_string())
                    .or_insert_with(|| NameMap::anchored(&anchor, name));
            }

            if !table.is_empty() {
                regions.insert(country.to_string(), table);
            }
            selections.insert(country.to_string(), selection);
        }

        SubdivisionAggregator {
            anchor,
            regions,
            selections,
            report,
        }
    }

    /// Types selected per country (including countries left without regions).
    pub fn selections(&self) -> &BTreeMap<String, Selection> {
        &self.selections
    }

    /// Number of countries with at least one region.
    pub fn country_count(&self) -> usize {
        self.regions.len()
    }

    /// Merge one non-anchor locale's records.
    pub fn absorb(&mut self, locale: &LocaleId, records: &[SubdivisionRecord]) {
        if locale == &self.anchor {
            debug!("Ignoring anchor locale {} outside the seed phase", locale);
            return;
        }

        for record in records {
            let result = self.offer(locale, record);
            match result {
                Ok(()) => self.report.record_stored(),
                Err(reason) => {
                    debug!("{} [{}]: skipped ({:?})", record.code, locale, reason);
                    self.report.record_skip(reason);
                }
            }
        }

        self.report.locales_processed += 1;
    }

    fn offer(&mut self, locale: &LocaleId, record: &SubdivisionRecord) -> Result<(), SkipReason> {
        let (country, region) = record.split_code().ok_or(SkipReason::MalformedCode)?;

        let names = self
            .regions
            .get_mut(country)
            .and_then(|table| table.get_mut(region));

        match names {
            Some(names) => names.offer(&self.anchor, locale, record.local_name.as_deref()),
            None => match self.selections.get(country) {
                Some(selection) if !selection.contains(&record.kind) => {
                    Err(SkipReason::UnselectedType)
                }
                _ => Err(SkipReason::UnknownCode),
            },
        }
    }

    /// Note a locale whose lookup failed.
    pub fn record_failure(&mut self, locale: &LocaleId, reason: impl Into<String>) {
        self.report.record_failure(locale.as_str(), reason);
    }

    pub fn finish(self) -> (SubdivisionTable, PhaseReport) {
        (self.regions, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(code: &str) -> LocaleId {
        LocaleId::parse(code).unwrap()
    }

    fn subdivision(code: &str, kind: &str, local_name: Option<&str>, name: &str) -> SubdivisionRecord {
        SubdivisionRecord {
            code: code.to_string(),
            kind: kind.to_string(),
            local_name: local_name.map(str::to_string),
            name: name.to_string(),
        }
    }

    fn countries(codes: &[&str]) -> CountryTable {
        let en = locale("en");
        codes
            .iter()
            .map(|code| (code.to_string(), NameMap::anchored(&en, *code)))
            .collect()
    }

    fn rules() -> SelectionRules {
        SelectionRules::new()
            .with_override("ES", &["Province"])
            .with_ranking(&["Region", "Province", "Municipality"])
            .with_too_specific(&["Municipality"])
    }

    fn spain_anchor() -> Vec<SubdivisionRecord> {
        vec![
            subdivision("ES-AN", "Autonomous community", None, "Andalucía"),
            subdivision("ES-SE", "Province", None, "Sevilla"),
            subdivision("ES-M", "Province", None, "Madrid"),
            subdivision("ES-CE", "Autonomous city in north africa", None, "Ceuta"),
        ]
    }

    // ==================== seed Tests ====================

    #[test]
    fn test_seed_keeps_selected_types_only() {
        let aggregator =
            SubdivisionAggregator::seed(locale("en"), &countries(&["ES"]), &spain_anchor(), &rules());
        let (table, report) = aggregator.finish();

        let regions: Vec<&String> = table["ES"].keys().collect();
        assert_eq!(regions, vec!["M", "SE"]);
        assert_eq!(table["ES"]["SE"].get("en"), Some("Sevilla"));
        assert_eq!(report.skipped.unselected_type, 2);
    }

    #[test]
    fn test_seed_restricted_to_country_universe() {
        let mut records = spain_anchor();
        records.push(subdivision("ZZ-01", "Province", None, "Nowhere"));
        records.push(subdivision("ESX", "Province", None, "Broken"));

        let aggregator =
            SubdivisionAggregator::seed(locale("en"), &countries(&["ES"]), &records, &rules());
        let (table, report) = aggregator.finish();

        assert_eq!(table.len(), 1);
        assert_eq!(report.skipped.unknown_code, 1);
        assert_eq!(report.skipped.malformed_code, 1);
    }

    #[test]
    fn test_seed_heuristic_country() {
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(subdivision(&format!("XX-P{}", i), "Province", None, &format!("P{}", i)));
        }
        for i in 0..50 {
            records.push(subdivision(&format!("XX-M{}", i), "Municipality", None, &format!("M{}", i)));
        }

        let aggregator =
            SubdivisionAggregator::seed(locale("en"), &countries(&["XX"]), &records, &rules());
        assert_eq!(aggregator.selections()["XX"].types, vec!["Province"]);

        let (table, _) = aggregator.finish();
        assert_eq!(table["XX"].len(), 5);
        assert!(table["XX"].keys().all(|code| code.starts_with('P')));
    }

    #[test]
    fn test_country_without_selected_regions_has_no_table() {
        let records = vec![subdivision("ES-AN", "Autonomous community", None, "Andalucía")];
        let aggregator =
            SubdivisionAggregator::seed(locale("en"), &countries(&["ES"]), &records, &rules());

        assert_eq!(aggregator.country_count(), 0);
        assert!(aggregator.selections().contains_key("ES"));
    }

    // ==================== absorb Tests ====================

    #[test]
    fn test_absorb_applies_dedup_rules() {
        let mut aggregator =
            SubdivisionAggregator::seed(locale("en"), &countries(&["ES"]), &spain_anchor(), &rules());

        aggregator.absorb(
            &locale("de"),
            &[
                subdivision("ES-SE", "Province", Some("Sevilla"), "Sevilla"),
                subdivision("ES-M", "Province", Some("Madrid"), "Madrid"),
            ],
        );
        aggregator.absorb(
            &locale("fr"),
            &[
                subdivision("ES-SE", "Province", Some("Séville"), "Sevilla"),
                subdivision("ES-AN", "Autonomous community", Some("Andalousie"), "Andalucía"),
                subdivision("ES-XX", "Province", Some("Inconnue"), "Unknown"),
            ],
        );
        aggregator.absorb(
            &locale("fr_CA"),
            &[subdivision("ES-SE", "Province", Some("Séville"), "Sevilla")],
        );

        let (table, report) = aggregator.finish();
        assert_eq!(table["ES"]["SE"].get("fr"), Some("Séville"));
        assert!(!table["ES"]["SE"].contains("de"));
        assert!(!table["ES"]["SE"].contains("fr_CA"));
        assert_eq!(table["ES"]["M"].len(), 1);

        assert_eq!(report.locales_processed, 4);
        assert_eq!(report.names_stored, 1);
        assert_eq!(report.skipped.same_as_anchor, 2);
        assert_eq!(report.skipped.same_as_parent, 1);
        assert_eq!(report.skipped.unselected_type, 2 + 1);
        assert_eq!(report.skipped.unknown_code, 1);
    }
}
