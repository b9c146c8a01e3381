//! Inspect subdivision types - prints, per country, how often each subdivision
//! type occurs in the anchor locale and which types the selector keeps.
//!
//! Usage:
//!   cargo run --bin inspect-types            # Every country
//!   cargo run --bin inspect-types -- ES FR   # Only the given countries
//!
//! Uses the same environment variables as the generator
//! (ISO_CODES_DIR, LOCALE_DIR, ANCHOR_LOCALE, FALLBACK_STRATEGY).

use anyhow::{Context, Result};
use locale_geodata::config::Config;
use locale_geodata::selection::{SelectionBasis, SelectionRules, TypeCounts};
use locale_geodata::source::{load_subdivisions, IsoCodesSource};
use std::collections::BTreeMap;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inspect_types=info".parse()?),
        )
        .init();

    let filter: Vec<String> = std::env::args()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .map(|a| a.to_uppercase())
        .collect();

    let config = Config::from_env()?;
    let mut source = IsoCodesSource::open(&config.iso_codes_dir, &config.locale_dir, config.fallback)
        .context("Failed to open iso-codes data")?;

    info!("Loading subdivisions for {}", config.anchor_locale);
    let records = load_subdivisions(&mut source, &config.anchor_locale)
        .result
        .with_context(|| format!("Failed to load subdivisions for {}", config.anchor_locale))?;

    let mut by_country: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in &records {
        if let Some((country, _)) = record.split_code() {
            by_country.entry(country).or_default().push(record.kind.as_str());
        }
    }

    let rules = SelectionRules::standard();
    let mut shown = 0;
    for (country, kinds) in &by_country {
        if !filter.is_empty() && !filter.iter().any(|f| f == country) {
            continue;
        }
        shown += 1;

        let counts = TypeCounts::from_kinds(kinds.iter().copied());
        let selection = rules.select_from_counts(country, &counts);
        let basis = match selection.basis {
            SelectionBasis::Override => "override",
            SelectionBasis::Heuristic => "heuristic",
        };

        println!("{} ({} subdivisions)", country, kinds.len());
        for (kind, count) in counts.iter() {
            let marker = if selection.contains(kind) { "*" } else { " " };
            println!("  {} {:<45} {:>4}", marker, kind, count);
        }
        if selection.is_empty() {
            println!("  -> no subdivisions ({})", basis);
        } else {
            println!("  -> {} ({})", selection.types.join(", "), basis);
        }
        if !selection.anomalies.is_empty() {
            println!("  !! not in override list: {}", selection.anomalies.join(", "));
        }
        println!();
    }

    let missing: Vec<&String> = filter
        .iter()
        .filter(|f| !by_country.contains_key(f.as_str()))
        .collect();
    for country in missing {
        println!("{}: no subdivisions in iso-codes", country);
    }

    info!("Inspected {} of {} countries", shown, by_country.len());
    Ok(())
}
