//! Subdivision type selection.
//!
//! Countries list their subdivisions at several administrative levels at once
//! (regions, provinces, municipalities, ...). Only one level, sometimes a few,
//! appears in postal addresses. `SelectionRules` picks it: from a curated
//! per-country table when the country is known, otherwise from occurrence
//! counts filtered by a general-to-specific ranking and exclusion lists.

mod rules;
mod selector;

pub use rules::{SelectionRules, MIN_OCCURRENCES};
pub use selector::{Selection, SelectionBasis, TypeCounts};
