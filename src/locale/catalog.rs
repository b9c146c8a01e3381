//! Locale catalog: the ordered set of locales a run processes.
//!
//! The base list plays the role of the system locale catalog (the locales an
//! ICU build ships). It can be replaced by a catalog file, one identifier per
//! line. Script-variant locales (`sr@latin`) are not part of ICU's list and are
//! discovered from the gettext tree instead.

use crate::locale::{LocaleId, VARIANT_SEPARATOR};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Built-in locale catalog.
const BUILTIN_LOCALES: &[&str] = &[
    "af", "af_ZA", "am", "am_ET", "ar", "ar_AE", "ar_DZ", "ar_EG", "ar_MA", "ar_SA", "as",
    "ast", "az", "az_Cyrl", "az_Latn", "be", "bg", "bg_BG", "bn", "bn_BD", "bn_IN", "bo", "br",
    "bs", "bs_Cyrl", "bs_Latn", "ca", "ca_ES", "ce", "chr", "cs", "cs_CZ", "cy", "da", "da_DK",
    "de", "de_AT", "de_CH", "de_DE", "de_LI", "de_LU", "dz", "el", "el_CY", "el_GR", "en",
    "en_001", "en_150", "en_AU", "en_CA", "en_GB", "en_IE", "en_IN", "en_NZ", "en_US",
    "en_US_POSIX", "en_ZA", "eo", "es", "es_419", "es_AR", "es_CL", "es_CO", "es_ES", "es_MX",
    "es_US", "et", "eu", "fa", "fa_AF", "fa_IR", "ff", "fi", "fil", "fo", "fr", "fr_BE",
    "fr_CA", "fr_CH", "fr_FR", "fr_LU", "fy", "ga", "gd", "gl", "gu", "ha", "he", "hi", "hr",
    "hu", "hy", "ia", "id", "ig", "is", "it", "it_CH", "it_IT", "ja", "jv", "ka", "kk", "km",
    "kn", "ko", "ko_KP", "kok", "ks", "ku", "ky", "lb", "lo", "lt", "lv", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl", "nl_BE", "nl_NL", "nn", "or", "pa",
    "pa_Arab", "pa_Guru", "pl", "ps", "pt", "pt_AO", "pt_BR", "pt_PT", "rm", "ro", "ro_MD",
    "ru", "ru_UA", "rw", "sc", "sd", "se", "si", "sk", "sl", "so", "sq", "sr", "sr_Cyrl",
    "sr_Latn", "sr_Latn_RS", "sv", "sv_FI", "sw", "ta", "te", "tg", "th", "ti", "tk", "to",
    "tr", "tt", "ug", "uk", "ur", "uz", "uz_Arab", "uz_Cyrl", "uz_Latn", "vi", "wo", "xh",
    "yi", "yo", "zh", "zh_Hans", "zh_Hans_CN", "zh_Hans_SG", "zh_Hant", "zh_Hant_HK",
    "zh_Hant_TW", "zu",
];

/// The ordered, de-duplicated set of locales for a run.
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    locales: BTreeSet<LocaleId>,
}

impl LocaleCatalog {
    /// The built-in catalog.
    pub fn builtin() -> LocaleCatalog {
        Self::from_entries(BUILTIN_LOCALES.iter().copied())
    }

    /// Read a catalog file: one locale per line, blank lines and `#` comments ignored.
    ///
    /// Lines that are not valid locale identifiers are logged and skipped.
    pub fn from_file(path: &Path) -> Result<LocaleCatalog> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale catalog {}", path.display()))?;

        let entries = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty());

        Ok(Self::from_entries(entries))
    }

    fn from_entries<'a>(entries: impl Iterator<Item = &'a str>) -> LocaleCatalog {
        let mut locales = BTreeSet::new();
        for entry in entries {
            match LocaleId::parse(entry) {
                Ok(locale) => {
                    locales.insert(locale);
                }
                Err(e) => warn!("Skipping catalog entry: {}", e),
            }
        }
        LocaleCatalog { locales }
    }

    /// Add script-variant locales found in `locale_dir` that are not listed yet.
    ///
    /// Returns the number of locales added.
    pub fn extend_with_variants(&mut self, locale_dir: &Path, domains: &[&str]) -> usize {
        let before = self.locales.len();
        for variant in discover_variants(locale_dir, domains) {
            if self.locales.insert(variant.clone()) {
                debug!("Discovered script variant locale {}", variant);
            }
        }
        self.locales.len() - before
    }

    pub fn contains(&self, locale: &LocaleId) -> bool {
        self.locales.contains(locale)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Locales in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleId> {
        self.locales.iter()
    }

    pub fn into_vec(self) -> Vec<LocaleId> {
        self.locales.into_iter().collect()
    }
}

/// Find `@variant` locale directories in a gettext tree that ship at least
/// one of the given message domains.
///
/// A missing or unreadable directory yields no variants.
pub fn discover_variants(locale_dir: &Path, domains: &[&str]) -> Vec<LocaleId> {
    let entries = match fs::read_dir(locale_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Cannot list locale directory {}: {}",
                locale_dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut variants: Vec<LocaleId> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.contains(VARIANT_SEPARATOR))
        .filter(|name| {
            domains.iter().any(|domain| {
                locale_dir
                    .join(name)
                    .join("LC_MESSAGES")
                    .join(format!("{}.mo", domain))
                    .is_file()
            })
        })
        .filter_map(|name| match LocaleId::parse(&name) {
            Ok(locale) => Some(locale),
            Err(e) => {
                debug!("Ignoring locale directory {}: {}", name, e);
                None
            }
        })
        .collect();

    variants.sort();
    variants
}
