//! The generation run: countries first, then subdivisions, each as an anchor
//! pass followed by every other locale in ascending order.
//!
//! Each locale's lookup is collected as a `LocaleResult` before it is merged,
//! so a failing locale is reported and dropped without touching the tables.

use crate::aggregate::{CountryAggregator, CountryTable, SubdivisionAggregator, SubdivisionTable};
use crate::locale::LocaleId;
use crate::report::{PhaseReport, RunReport};
use crate::selection::{Selection, SelectionRules};
use crate::source::{load_countries, load_subdivisions, LocaleResult, TranslationSource};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Everything a run produces, ready for the writer.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub countries: CountryTable,
    pub subdivisions: SubdivisionTable,
    /// Subdivision types chosen per country
    pub selections: BTreeMap<String, Selection>,
    pub report: RunReport,
}

#[derive(Debug, Clone)]
pub struct Pipeline<'r> {
    anchor: LocaleId,
    locales: Vec<LocaleId>,
    rules: &'r SelectionRules,
}

impl Pipeline<'static> {
    /// A run over `locales` anchored on `anchor`, using the standard selection rules.
    ///
    /// Locales are sorted and deduplicated; the anchor is removed from the list
    /// since it is always processed first.
    pub fn new(anchor: LocaleId, locales: impl IntoIterator<Item = LocaleId>) -> Self {
        let mut locales: Vec<LocaleId> = locales.into_iter().filter(|l| l != &anchor).collect();
        locales.sort();
        locales.dedup();

        Pipeline {
            anchor,
            locales,
            rules: SelectionRules::standard(),
        }
    }
}

impl<'r> Pipeline<'r> {
    pub fn with_rules<'a>(self, rules: &'a SelectionRules) -> Pipeline<'a> {
        Pipeline {
            anchor: self.anchor,
            locales: self.locales,
            rules,
        }
    }

    pub fn anchor(&self) -> &LocaleId {
        &self.anchor
    }

    /// Non-anchor locales in processing order.
    pub fn locales(&self) -> &[LocaleId] {
        &self.locales
    }

    /// Run both phases against `source`.
    ///
    /// Fails only when the anchor locale's countries cannot be loaded.
    pub fn run<S: TranslationSource + ?Sized>(&self, source: &mut S) -> Result<Dataset> {
        info!(
            "Processing {} locales (anchor: {})",
            self.locales.len() + 1,
            self.anchor
        );

        let (countries, country_report) = self.build_countries(source)?;
        info!("Country phase done: {} countries", countries.len());

        let (subdivisions, selections, subdivision_report) =
            self.build_subdivisions(source, &countries);
        let regions: usize = subdivisions.values().map(|r| r.len()).sum();
        info!(
            "Subdivision phase done: {} regions in {} countries",
            regions,
            subdivisions.len()
        );

        let report = RunReport {
            anchor: self.anchor.to_string(),
            fallback: source.fallback_strategy(),
            locales: self.locales.len() + 1,
            countries: country_report,
            subdivisions: subdivision_report,
            countries_with_regions: subdivisions.len(),
            regions,
        };

        Ok(Dataset {
            countries,
            subdivisions,
            selections,
            report,
        })
    }

    fn build_countries<S: TranslationSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<(CountryTable, PhaseReport)> {
        let anchor_records = load_countries(source, &self.anchor)
            .result
            .with_context(|| format!("Failed to load countries for anchor locale {}", self.anchor))?;
        let mut aggregator = CountryAggregator::seed(self.anchor.clone(), &anchor_records);

        let results: Vec<LocaleResult<_>> = self
            .locales
            .iter()
            .map(|locale| load_countries(source, locale))
            .collect();

        let (loaded, failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.result.is_ok());

        for LocaleResult { locale, result } in failed {
            if let Err(e) = result {
                warn!("Skipping locale {} for countries: {}", locale, e);
                aggregator.record_failure(&locale, e.to_string());
            }
        }

        for LocaleResult { locale, result } in loaded {
            if let Ok(records) = result {
                debug!("{}: {} countries", locale, records.len());
                aggregator.absorb(&locale, &records);
            }
        }

        Ok(aggregator.finish())
    }

    fn build_subdivisions<S: TranslationSource + ?Sized>(
        &self,
        source: &mut S,
        countries: &CountryTable,
    ) -> (SubdivisionTable, BTreeMap<String, Selection>, PhaseReport) {
        let anchor_records = match load_subdivisions(source, &self.anchor).result {
            Ok(records) => records,
            Err(e) => {
                error!(
                    "Failed to load subdivisions for anchor locale {}: {}",
                    self.anchor, e
                );
                let mut report = PhaseReport::default();
                report.record_failure(self.anchor.as_str(), e.to_string());
                return (SubdivisionTable::new(), BTreeMap::new(), report);
            }
        };

        let mut aggregator =
            SubdivisionAggregator::seed(self.anchor.clone(), countries, &anchor_records, self.rules);
        let selections = aggregator.selections().clone();

        let results: Vec<LocaleResult<_>> = self
            .locales
            .iter()
            .map(|locale| load_subdivisions(source, locale))
            .collect();

        let (loaded, failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.result.is_ok());

        for LocaleResult { locale, result } in failed {
            if let Err(e) = result {
                warn!("Skipping locale {} for subdivisions: {}", locale, e);
                aggregator.record_failure(&locale, e.to_string());
            }
        }

        for LocaleResult { locale, result } in loaded {
            if let Ok(records) = result {
                debug!("{}: {} subdivisions", locale, records.len());
                aggregator.absorb(&locale, &records);
            }
        }

        let (table, report) = aggregator.finish();
        (table, selections, report)
    }
}
