//! Translation sources: where localized country and subdivision names come from.
//!
//! A `TranslationSource` is switched to a locale with `set_locale` and then
//! queried for country and subdivision records. Fallback between locales is
//! the source's business; callers only ever name the locale they want.

mod iso_codes;
mod mo;

pub use iso_codes::{IsoCodesSource, COUNTRY_DOMAIN, SUBDIVISION_DOMAIN};
pub use mo::{CatalogError, MessageCatalog};

use crate::locale::{FallbackStrategy, LocaleId};
use std::path::PathBuf;
use thiserror::Error;

/// A country as seen from one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-2 code (e.g., "FR")
    pub alpha2: String,
    /// Name in the current locale, `None` when the locale has no translation
    pub local_name: Option<String>,
    /// Untranslated (English) name
    pub name: String,
}

/// A country subdivision as seen from one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivisionRecord {
    /// Compound ISO 3166-2 code (e.g., "FR-75")
    pub code: String,
    /// Administrative type label (e.g., "Province", "State")
    pub kind: String,
    /// Name in the current locale, `None` when the locale has no translation
    pub local_name: Option<String>,
    /// Untranslated name
    pub name: String,
}

impl CountryRecord {
    /// Localized name if present and non-empty, otherwise the untranslated name.
    pub fn display_name(&self) -> &str {
        non_empty(self.local_name.as_deref()).unwrap_or(&self.name)
    }
}

impl SubdivisionRecord {
    /// Localized name if present and non-empty, otherwise the untranslated name.
    pub fn display_name(&self) -> &str {
        non_empty(self.local_name.as_deref()).unwrap_or(&self.name)
    }

    /// Split the compound code into `(country, region)` at the first `-`.
    pub fn split_code(&self) -> Option<(&str, &str)> {
        self.code
            .split_once('-')
            .filter(|(country, region)| !country.is_empty() && !region.is_empty())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no locale selected")]
    LocaleNotSet,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data in {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog {path} for locale {locale}: {source}")]
    Catalog {
        locale: String,
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Source of localized country and subdivision names.
pub trait TranslationSource {
    /// Switch every subsequent lookup to `locale`.
    fn set_locale(&mut self, locale: &LocaleId) -> Result<(), SourceError>;

    /// All countries, named in the current locale.
    fn countries(&self) -> Result<Vec<CountryRecord>, SourceError>;

    /// All subdivisions, named in the current locale.
    fn subdivisions(&self) -> Result<Vec<SubdivisionRecord>, SourceError>;

    /// Fallback strategy the source applies, if it has one.
    fn fallback_strategy(&self) -> Option<FallbackStrategy> {
        None
    }
}

/// Outcome of loading one locale's records.
#[derive(Debug)]
pub struct LocaleResult<T> {
    pub locale: LocaleId,
    pub result: Result<Vec<T>, SourceError>,
}

/// Load `locale`'s country records.
pub fn load_countries<S: TranslationSource + ?Sized>(
    source: &mut S,
    locale: &LocaleId,
) -> LocaleResult<CountryRecord> {
    let result = source
        .set_locale(locale)
        .and_then(|_| source.countries());
    LocaleResult {
        locale: locale.clone(),
        result,
    }
}

/// Load `locale`'s subdivision records.
pub fn load_subdivisions<S: TranslationSource + ?Sized>(
    source: &mut S,
    locale: &LocaleId,
) -> LocaleResult<SubdivisionRecord> {
    let result = source
        .set_locale(locale)
        .and_then(|_| source.subdivisions());
    LocaleResult {
        locale: locale.clone(),
        result,
    }
}
