use crate::locale::{FallbackStrategy, LocaleId};
use crate::writer::OutputLayout;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Data sources
    pub iso_codes_dir: PathBuf,
    pub locale_dir: PathBuf,

    // Output
    pub output_dir: PathBuf,

    // Locales
    pub anchor_locale: LocaleId,
    pub fallback: FallbackStrategy,
    pub locale_catalog_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let anchor = std::env::var("ANCHOR_LOCALE").unwrap_or_else(|_| "en".to_string());
        let fallback = std::env::var("FALLBACK_STRATEGY").unwrap_or_else(|_| "chain".to_string());

        Ok(Self {
            // Data sources
            iso_codes_dir: std::env::var("ISO_CODES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/share/iso-codes/json")),
            locale_dir: std::env::var("LOCALE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/share/locale")),

            // Output
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),

            // Locales
            anchor_locale: LocaleId::parse(&anchor).context("ANCHOR_LOCALE is invalid")?,
            fallback: fallback.parse().context("FALLBACK_STRATEGY is invalid")?,
            locale_catalog_file: std::env::var("LOCALE_CATALOG_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout::in_dir(&self.output_dir)
    }
}
