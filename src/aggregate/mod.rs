//! Aggregation of localized names into the output tables.
//!
//! Both aggregators follow the same two-phase shape: `seed` from the anchor
//! locale (which fixes the set of keys), then `absorb` every other locale in
//! ascending order, then `finish` to hand the table to the writer.

mod countries;
mod names;
mod subdivisions;

pub use countries::{CountryAggregator, CountryTable};
pub use names::{admit, NameMap, SkipReason};
pub use subdivisions::{RegionTable, SubdivisionAggregator, SubdivisionTable};
