//! Country name aggregation: country code → locale → name.

use crate::aggregate::{NameMap, SkipReason};
use crate::locale::LocaleId;
use crate::report::PhaseReport;
use crate::source::CountryRecord;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Country code → names, ordered by code.
pub type CountryTable = BTreeMap<String, NameMap>;

/// Accumulates country names locale by locale.
///
/// Created from the anchor locale's records, which fix the set of countries;
/// every other locale can only add names to those countries.
#[derive(Debug)]
pub struct CountryAggregator {
    anchor: LocaleId,
    countries: CountryTable,
    report: PhaseReport,
}

impl CountryAggregator {
    /// Build the base table from the anchor locale.
    ///
    /// Each country gets its localized name, or the untranslated name when the
    /// anchor has no translation. Records with neither are dropped.
    pub fn seed(anchor: LocaleId, records: &[CountryRecord]) -> CountryAggregator {
        let mut countries = CountryTable::new();
        for record in records {
            let name = record.display_name();
            if name.is_empty() {
                warn!("Country {} has no name in anchor locale {}", record.alpha2, anchor);
                continue;
            }
            countries
                .entry(record.alpha2.clone())
                .or_insert_with(|| NameMap::anchored(&anchor, name));
        }

        CountryAggregator {
            anchor,
            countries,
            report: PhaseReport {
                locales_processed: 1,
                ..Default::default()
            },
        }
    }

    pub fn anchor(&self) -> &LocaleId {
        &self.anchor
    }

    pub fn contains(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Merge one non-anchor locale's records.
    pub fn absorb(&mut self, locale: &LocaleId, records: &[CountryRecord]) {
        if locale == &self.anchor {
            debug!("Ignoring anchor locale {} outside the seed phase", locale);
            return;
        }

        for record in records {
            let result = match self.countries.get_mut(&record.alpha2) {
                Some(names) => names.offer(&self.anchor, locale, record.local_name.as_deref()),
                None => Err(SkipReason::UnknownCode),
            };

            match result {
                Ok(()) => self.report.record_stored(),
                Err(reason) => {
                    debug!("{} [{}]: skipped ({:?})", record.alpha2, locale, reason);
                    self.report.record_skip(reason);
                }
            }
        }

        self.report.locales_processed += 1;
    }

    /// Note a locale whose lookup failed.
    pub fn record_failure(&mut self, locale: &LocaleId, reason: impl Into<String>) {
        self.report.record_failure(locale.as_str(), reason);
    }

    pub fn finish(self) -> (CountryTable, PhaseReport) {
        (self.countries, self.report)
    }
}
