//! Translation source backed by the Debian `iso-codes` data set.
//!
//! Country and subdivision lists come from the ISO 3166 JSON files; localized
//! names come from the gettext catalogs installed next to them
//! (`<locale_dir>/<locale>/LC_MESSAGES/iso_3166-1.mo` and `iso_3166-2.mo`).
//!
//! A locale without catalogs is not an error: its names are simply
//! untranslated, the way gettext itself behaves.

use crate::locale::{FallbackStrategy, LocaleId};
use crate::source::{
    CountryRecord, MessageCatalog, SourceError, SubdivisionRecord, TranslationSource,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Gettext domain of country names.
pub const COUNTRY_DOMAIN: &str = "iso_3166-1";

/// Gettext domain of subdivision names.
pub const SUBDIVISION_DOMAIN: &str = "iso_3166-2";

#[derive(Debug, Deserialize)]
struct CountryFile {
    #[serde(rename = "3166-1")]
    entries: Vec<IsoCountry>,
}

#[derive(Debug, Clone, Deserialize)]
struct IsoCountry {
    alpha_2: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SubdivisionFile {
    #[serde(rename = "3166-2")]
    entries: Vec<IsoSubdivision>,
}

#[derive(Debug, Clone, Deserialize)]
struct IsoSubdivision {
    code: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Catalogs of one locale's fallback chain, most specific first.
#[derive(Debug, Default)]
struct ChainCatalogs {
    countries: Vec<MessageCatalog>,
    subdivisions: Vec<MessageCatalog>,
}

fn translate(catalogs: &[MessageCatalog], msgid: &str) -> Option<String> {
    catalogs
        .iter()
        .find_map(|catalog| catalog.get(msgid))
        .map(str::to_string)
}

pub struct IsoCodesSource {
    locale_dir: PathBuf,
    strategy: FallbackStrategy,
    countries: Vec<IsoCountry>,
    subdivisions: Vec<IsoSubdivision>,
    locale: Option<LocaleId>,
    catalogs: ChainCatalogs,
}

impl IsoCodesSource {
    /// Load the ISO 3166 data from `iso_codes_dir`.
    ///
    /// # Arguments
    /// * `iso_codes_dir` - directory holding `iso_3166-1.json` and `iso_3166-2.json`
    /// * `locale_dir` - root of the gettext tree with the translation catalogs
    /// * `strategy` - fallback applied when a locale lacks a translation
    pub fn open(
        iso_codes_dir: &Path,
        locale_dir: &Path,
        strategy: FallbackStrategy,
    ) -> Result<IsoCodesSource, SourceError> {
        let country_file: CountryFile =
            read_json(&iso_codes_dir.join(format!("{}.json", COUNTRY_DOMAIN)))?;
        let subdivision_file: SubdivisionFile =
            read_json(&iso_codes_dir.join(format!("{}.json", SUBDIVISION_DOMAIN)))?;

        debug!(
            "Loaded {} countries and {} subdivisions from {}",
            country_file.entries.len(),
            subdivision_file.entries.len(),
            iso_codes_dir.display()
        );

        Ok(IsoCodesSource {
            locale_dir: locale_dir.to_path_buf(),
            strategy,
            countries: country_file.entries,
            subdivisions: subdivision_file.entries,
            locale: None,
            catalogs: ChainCatalogs::default(),
        })
    }

    /// Path of a locale's catalog for a gettext domain.
    pub fn catalog_path(&self, locale: &LocaleId, domain: &str) -> PathBuf {
        self.locale_dir
            .join(locale.as_str())
            .join("LC_MESSAGES")
            .join(format!("{}.mo", domain))
    }

    fn load_domain(
        &self,
        chain: &[LocaleId],
        domain: &str,
    ) -> Result<Vec<MessageCatalog>, SourceError> {
        let mut catalogs = Vec::new();
        for candidate in chain {
            let path = self.catalog_path(candidate, domain);
            if !path.is_file() {
                continue;
            }
            let catalog = MessageCatalog::open(&path).map_err(|source| SourceError::Catalog {
                locale: candidate.to_string(),
                path: path.clone(),
                source,
            })?;
            debug!("{}: {} messages from {}", domain, catalog.len(), path.display());
            catalogs.push(catalog);
        }
        Ok(catalogs)
    }

    fn current_catalogs(&self) -> Result<&ChainCatalogs, SourceError> {
        match self.locale {
            Some(_) => Ok(&self.catalogs),
            None => Err(SourceError::LocaleNotSet),
        }
    }
}

impl TranslationSource for IsoCodesSource {
    fn fallback_strategy(&self) -> Option<FallbackStrategy> {
        Some(self.strategy)
    }

    fn set_locale(&mut self, locale: &LocaleId) -> Result<(), SourceError> {
        if self.locale.as_ref() == Some(locale) {
            return Ok(());
        }
        self.locale = None;
        self.catalogs = ChainCatalogs::default();

        let chain = locale.fallback_chain(self.strategy);
        let catalogs = ChainCatalogs {
            countries: self.load_domain(&chain, COUNTRY_DOMAIN)?,
            subdivisions: self.load_domain(&chain, SUBDIVISION_DOMAIN)?,
        };

        if catalogs.countries.is_empty() && catalogs.subdivisions.is_empty() {
            debug!("No catalogs for {} (chain: {:?})", locale, chain);
        }

        self.catalogs = catalogs;
        self.locale = Some(locale.clone());
        Ok(())
    }

    fn countries(&self) -> Result<Vec<CountryRecord>, SourceError> {
        let catalogs = self.current_catalogs()?;
        Ok(self
            .countries
            .iter()
            .map(|country| CountryRecord {
                alpha2: country.alpha_2.clone(),
                local_name: translate(&catalogs.countries, &country.name),
                name: country.name.clone(),
            })
            .collect())
    }

    fn subdivisions(&self) -> Result<Vec<SubdivisionRecord>, SourceError> {
        let catalogs = self.current_catalogs()?;
        Ok(self
            .subdivisions
            .iter()
            .map(|subdivision| SubdivisionRecord {
                code: subdivision.code.clone(),
                kind: subdivision.kind.clone(),
                local_name: translate(&catalogs.subdivisions, &subdivision.name),
                name: subdivision.name.clone(),
            })
            .collect())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SourceError::Data {
        path: path.to_path_buf(),
        source,
    })
}
