//! Run statistics: what was stored, what was skipped and why, which locales failed.

use crate::aggregate::SkipReason;
use crate::locale::FallbackStrategy;
use serde::Serialize;

/// Counters for names that were not stored, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub empty_name: usize,
    pub same_as_anchor: usize,
    pub same_as_parent: usize,
    pub unknown_code: usize,
    pub unselected_type: usize,
    pub malformed_code: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::EmptyName => &mut self.empty_name,
            SkipReason::SameAsAnchor => &mut self.same_as_anchor,
            SkipReason::SameAsParent => &mut self.same_as_parent,
            SkipReason::UnknownCode => &mut self.unknown_code,
            SkipReason::UnselectedType => &mut self.unselected_type,
            SkipReason::MalformedCode => &mut self.malformed_code,
        };
        *counter += 1;
    }

    pub fn total(&self) -> usize {
        self.empty_name
            + self.same_as_anchor
            + self.same_as_parent
            + self.unknown_code
            + self.unselected_type
            + self.malformed_code
    }
}

/// A locale whose records could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleFailure {
    pub locale: String,
    pub reason: String,
}

/// Statistics for one aggregation phase (countries or subdivisions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    /// Locales whose records were merged (anchor included)
    pub locales_processed: usize,
    /// Locales omitted because their lookup failed
    pub failures: Vec<LocaleFailure>,
    /// Localized names stored beyond the anchor names
    pub names_stored: usize,
    pub skipped: SkipCounts,
}

impl PhaseReport {
    pub fn record_stored(&mut self) {
        self.names_stored += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped.record(reason);
    }

    pub fn record_failure(&mut self, locale: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(LocaleFailure {
            locale: locale.into(),
            reason: reason.into(),
        });
    }

    /// Percentage of attempted locales that loaded (0-100).
    pub fn success_rate(&self) -> f64 {
        let attempted = self.locales_processed + self.failures.len();
        if attempted > 0 {
            (self.locales_processed as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub anchor: String,
    /// Fallback strategy of the translation source
    pub fallback: Option<FallbackStrategy>,
    pub locales: usize,
    pub countries: PhaseReport,
    pub subdivisions: PhaseReport,
    /// Countries with at least one selected subdivision
    pub countries_with_regions: usize,
    /// Subdivisions present in the output
    pub regions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== SkipCounts Tests ====================

    #[test]
    fn test_record_each_reason() {
        let mut counts = SkipCounts::default();
        for reason in [
            SkipReason::EmptyName,
            SkipReason::SameAsAnchor,
            SkipReason::SameAsAnchor,
            SkipReason::SameAsParent,
            SkipReason::UnknownCode,
            SkipReason::UnselectedType,
            SkipReason::MalformedCode,
        ] {
            counts.record(reason);
        }

        assert_eq!(counts.empty_name, 1);
        assert_eq!(counts.same_as_anchor, 2);
        assert_eq!(counts.same_as_parent, 1);
        assert_eq!(counts.unknown_code, 1);
        assert_eq!(counts.unselected_type, 1);
        assert_eq!(counts.malformed_code, 1);
        assert_eq!(counts.total(), 7);
    }

    // ==================== PhaseReport Tests ====================

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(PhaseReport::default().success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate_with_failures() {
        let mut report = PhaseReport {
            locales_processed: 3,
            ..Default::default()
        };
        report.record_failure("xx", "boom");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.success_rate(), 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let mut report = RunReport {
            anchor: "en".to_string(),
            fallback: Some(FallbackStrategy::Chain),
            ..Default::default()
        };
        report.countries.record_stored();
        report.countries.record_skip(SkipReason::SameAsAnchor);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["anchor"], "en");
        assert_eq!(json["fallback"], "chain");
        assert_eq!(json["countries"]["names_stored"], 1);
        assert_eq!(json["countries"]["skipped"]["same_as_anchor"], 1);
    }
}
