//! Locale identifier: validated, ordered locale token.
//!
//! Identifiers follow the ICU/gettext shape `lang[_Script][_REGION][_VARIANT][@modifier]`,
//! e.g. `en`, `pt_BR`, `zh_Hans_CN`, `es_419`, `sr@latin`.

use crate::locale::FallbackStrategy;
use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Separator between language, script and region subtags.
pub const REGION_SEPARATOR: char = '_';

/// Separator introducing a script variant modifier (`sr@latin`).
pub const VARIANT_SEPARATOR: char = '@';

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-z]{2,3}(_[A-Z][a-z]{3})?(_(?:[A-Z]{2}|[0-9]{3}))?(_[A-Z0-9]{4,8})?(@[a-z]+)?$",
        )
        .unwrap()
    })
}

/// A validated locale identifier.
///
/// Ordering is plain lexicographic ordering of the identifier string, which
/// puts a base language (`pt`) before its regional variants (`pt_BR`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LocaleId(String);

impl LocaleId {
    /// Parse and validate a locale identifier.
    ///
    /// # Returns
    /// * `Ok(LocaleId)` if the string has the expected shape
    /// * `Err` for empty strings, BCP 47 dashes, or unknown subtag shapes
    pub fn parse(raw: &str) -> Result<LocaleId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            bail!("Empty locale identifier");
        }
        if !locale_regex().is_match(trimmed) {
            bail!("Invalid locale identifier: '{}'", trimmed);
        }
        Ok(LocaleId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without its `@modifier`.
    pub fn base(&self) -> &str {
        self.0
            .split_once(VARIANT_SEPARATOR)
            .map(|(base, _)| base)
            .unwrap_or(&self.0)
    }

    /// The `@modifier` part, without the separator.
    pub fn variant(&self) -> Option<&str> {
        self.0.split_once(VARIANT_SEPARATOR).map(|(_, variant)| variant)
    }

    /// Whether this identifier carries a script variant modifier.
    pub fn is_variant(&self) -> bool {
        self.variant().is_some()
    }

    /// Language subtag (`zh` for `zh_Hans_CN`, `sr` for `sr@latin`).
    pub fn language(&self) -> &str {
        self.base()
            .split(REGION_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// The portion before the first region separator, if there is one.
    ///
    /// `pt_BR` yields `pt`; `pt` and `sr@latin` yield `None` since they have
    /// no parent language entry to compare against.
    pub fn language_prefix(&self) -> Option<&str> {
        self.0
            .split_once(REGION_SEPARATOR)
            .map(|(prefix, _)| prefix)
    }

    /// Locales consulted, in order, when looking up a translation for this locale.
    ///
    /// The first element is always the locale itself. Variant locales keep
    /// their modifier on every fallback so `sr_RS@latin` never falls back to
    /// Cyrillic `sr`.
    pub fn fallback_chain(&self, strategy: FallbackStrategy) -> Vec<LocaleId> {
        let suffix = self
            .variant()
            .map(|v| format!("{}{}", VARIANT_SEPARATOR, v))
            .unwrap_or_default();
        let parts: Vec<&str> = self.base().split(REGION_SEPARATOR).collect();

        let mut chain = vec![self.clone()];
        let mut push = |candidate: String| {
            if !chain.iter().any(|l| l.0 == candidate) {
                chain.push(LocaleId(candidate));
            }
        };

        match strategy {
            FallbackStrategy::Exact => {}
            FallbackStrategy::Language => {
                push(format!("{}{}", parts[0], suffix));
            }
            FallbackStrategy::Chain => {
                for len in (1..parts.len()).rev() {
                    push(format!("{}{}", parts[..len].join("_"), suffix));
                }
            }
        }

        chain
    }
}

impl FromStr for LocaleId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        LocaleId::parse(s)
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
