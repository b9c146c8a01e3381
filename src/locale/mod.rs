//! Locale handling: identifiers, fallback strategies and the locale catalog.
//!
//! # Architecture
//!
//! - `id`: validated `LocaleId` with language-prefix and fallback-chain helpers
//! - `fallback`: the `FallbackStrategy` a translation source applies
//! - `catalog`: the set of locales a run enumerates (built-in or file-backed,
//!   plus script variants discovered in the gettext tree)
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_geodata::locale::{FallbackStrategy, LocaleId};
//!
//! let locale = LocaleId::parse("pt_BR")?;
//! assert_eq!(locale.language_prefix(), Some("pt"));
//! let chain = locale.fallback_chain(FallbackStrategy::Chain);
//! ```

mod catalog;
mod fallback;
mod id;

pub use catalog::{discover_variants, LocaleCatalog};
pub use fallback::FallbackStrategy;
pub use id::{LocaleId, REGION_SEPARATOR, VARIANT_SEPARATOR};
