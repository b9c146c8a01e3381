//! Locale fallback strategies used by translation sources.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How a translation source falls back when a locale has no translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Only the requested locale is consulted.
    Exact,
    /// The requested locale, then its bare language.
    Language,
    /// Every `_`-truncation of the locale, longest first.
    #[default]
    Chain,
}

impl FallbackStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            FallbackStrategy::Exact => "exact",
            FallbackStrategy::Language => "language",
            FallbackStrategy::Chain => "chain",
        }
    }
}

impl FromStr for FallbackStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(FallbackStrategy::Exact),
            "language" => Ok(FallbackStrategy::Language),
            "chain" => Ok(FallbackStrategy::Chain),
            other => bail!(
                "Unknown fallback strategy: '{}' (expected exact, language or chain)",
                other
            ),
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
