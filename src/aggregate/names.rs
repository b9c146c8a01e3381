//! Per-entity name maps and the rule deciding which localized names are kept.

use crate::locale::LocaleId;
use crate::source::non_empty;
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a localized name was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The locale has no (or an empty) translation
    EmptyName,
    /// Identical to the anchor locale's name
    SameAsAnchor,
    /// Identical to the stored name of the locale's base language
    SameAsParent,
    /// Code not established by the anchor locale
    UnknownCode,
    /// Subdivision type not selected for its country
    UnselectedType,
    /// Subdivision code without a country prefix
    MalformedCode,
}

/// Locale → display name for one country or subdivision.
///
/// The anchor locale's entry is inserted on creation and is never replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMap {
    names: BTreeMap<String, String>,
}

impl NameMap {
    pub fn anchored(anchor: &LocaleId, name: impl Into<String>) -> NameMap {
        let mut names = BTreeMap::new();
        names.insert(anchor.to_string(), name.into());
        NameMap { names }
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.names.contains_key(locale)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Store `name` for `locale` if the dedup rules admit it.
    pub fn offer(
        &mut self,
        anchor: &LocaleId,
        locale: &LocaleId,
        local_name: Option<&str>,
    ) -> Result<(), SkipReason> {
        let name = admit(self, anchor, locale, local_name)?;
        self.names.insert(locale.to_string(), name.to_string());
        Ok(())
    }
}

/// Decide whether `local_name` adds information to `names`.
///
/// Two independent filters must both pass: the name differs from the anchor
/// name, and it differs from the name already stored for the locale's
/// language prefix (`pt` for `pt_BR`).
pub fn admit<'a>(
    names: &NameMap,
    anchor: &LocaleId,
    locale: &LocaleId,
    local_name: Option<&'a str>,
) -> Result<&'a str, SkipReason> {
    let name = non_empty(local_name).ok_or(SkipReason::EmptyName)?;

    let same_as_anchor = names.get(anchor.as_str()) == Some(name);
    let same_as_parent = locale
        .language_prefix()
        .and_then(|prefix| names.get(prefix))
        == Some(name);

    if same_as_anchor {
        Err(SkipReason::SameAsAnchor)
    } else if same_as_parent {
        Err(SkipReason::SameAsParent)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn locale(code: &str) -> LocaleId {
        LocaleId::parse(code).unwrap()
    }

    // ==================== admit Tests ====================

    #[test]
    fn test_empty_and_missing_names_skipped() {
        let en = locale("en");
        let names = NameMap::anchored(&en, "Germany");
        assert_eq!(admit(&names, &en, &locale("de"), None), Err(SkipReason::EmptyName));
        assert_eq!(admit(&names, &en, &locale("de"), Some("")), Err(SkipReason::EmptyName));
    }

    #[test]
    fn test_same_as_anchor_skipped() {
        let en = locale("en");
        let names = NameMap::anchored(&en, "France");
        assert_eq!(
            admit(&names, &en, &locale("fr"), Some("France")),
            Err(SkipReason::SameAsAnchor)
        );
    }

    #[test]
    fn test_anchor_comparison_is_exact() {
        let en = locale("en");
        let names = NameMap::anchored(&en, "France");
        assert_eq!(admit(&names, &en, &locale("de"), Some("france")), Ok("france"));
        assert_eq!(admit(&names, &en, &locale("de"), Some("France ")), Ok("France "));
    }

    #[test]
    fn test_regional_variant_same_as_parent_skipped() {
        let en = locale("en");
        let mut names = NameMap::anchored(&en, "Germany");
        names.offer(&en, &locale("pt"), Some("Alemanha")).unwrap();

        assert_eq!(
            admit(&names, &en, &locale("pt_BR"), Some("Alemanha")),
            Err(SkipReason::SameAsParent)
        );
        assert_eq!(admit(&names, &en, &locale("pt_PT"), Some("Alemanha ")), Ok("Alemanha "));
    }

    #[test]
    fn test_regional_variant_without_parent_entry_kept() {
        let en = locale("en");
        let names = NameMap::anchored(&en, "Germany");
        assert_eq!(admit(&names, &en, &locale("pt_BR"), Some("Alemanha")), Ok("Alemanha"));
    }

    #[test]
    fn test_script_variant_has_no_parent() {
        let en = locale("en");
        let mut names = NameMap::anchored(&en, "Serbia");
        names.offer(&en, &locale("sr"), Some("Србија")).unwrap();
        assert_eq!(admit(&names, &en, &locale("sr@latin"), Some("Srbija")), Ok("Srbija"));
    }

    // ==================== NameMap Tests ====================

    #[test]
    fn test_offer_keeps_anchor() {
        let en = locale("en");
        let mut names = NameMap::anchored(&en, "United States");
        names.offer(&en, &locale("fr"), Some("États-Unis")).unwrap();

        assert_eq!(names.len(), 2);
        assert_eq!(names.get("en"), Some("United States"));
        assert_eq!(names.get("fr"), Some("États-Unis"));
    }

    #[test]
    fn test_serializes_sorted() {
        let en = locale("en");
        let mut names = NameMap::anchored(&en, "Spain");
        names.offer(&en, &locale("es"), Some("España")).unwrap();
        names.offer(&en, &locale("de"), Some("Spanien")).unwrap();

        let json = serde_json::to_string(&names).unwrap();
        assert_eq!(json, r#"{"de":"Spanien","en":"Spain","es":"España"}"#);
    }

    // ==================== Property Tests ====================

    fn locale_strategy() -> impl Strategy<Value = LocaleId> {
        prop::sample::select(vec![
            "de", "de_AT", "de_CH", "en_GB", "es", "es_419", "es_MX", "fr", "fr_CA", "pt",
            "pt_BR",
        ])
        .prop_map(|code| LocaleId::parse(code).unwrap())
    }

    fn name_strategy() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(vec!["", "Name", "Nom", "Nombre", "Name "]))
            .prop_map(|name| name.map(str::to_string))
    }

    proptest! {
        #[test]
        fn prop_dedup_invariants(
            offers in prop::collection::vec((locale_strategy(), name_strategy()), 0..40)
        ) {
            let anchor = locale("en");
            let mut names = NameMap::anchored(&anchor, "Name");

            let mut sorted = offers;
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            for (loc, name) in &sorted {
                let _ = names.offer(&anchor, loc, name.as_deref());
            }

            prop_assert_eq!(names.get("en"), Some("Name"));
            for (loc, name) in names.iter() {
                prop_assert!(!name.is_empty());
                if loc == "en" {
                    continue;
                }
                prop_assert_ne!(name, "Name");
                if let Some((prefix, _)) = loc.split_once('_') {
                    prop_assert_ne!(names.get(prefix), Some(name));
                }
            }
        }
    }
}
