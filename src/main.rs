use anyhow::{Context, Result};
use locale_geodata::config::Config;
use locale_geodata::locale::{LocaleCatalog, LocaleId};
use locale_geodata::pipeline::Pipeline;
use locale_geodata::source::{IsoCodesSource, COUNTRY_DOMAIN, SUBDIVISION_DOMAIN};
use locale_geodata::writer::{self, to_pretty_json};
use std::io::Write;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // Load .env file (optional)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_geodata=info".parse()?),
        )
        .init();

    let dry_run = std::env::args().any(|a| a == "--dry-run");

    info!("Starting locale geodata generation");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Step 1: Enumerate locales
    let locales = enumerate_locales(&config)?;
    info!("Enumerated {} locales", locales.len());

    // Step 2: Open the translation data
    let mut source = IsoCodesSource::open(&config.iso_codes_dir, &config.locale_dir, config.fallback)
        .with_context(|| {
            format!(
                "Failed to open iso-codes data in {}",
                config.iso_codes_dir.display()
            )
        })?;

    // Step 3: Aggregate names
    let dataset = Pipeline::new(config.anchor_locale.clone(), locales)
        .run(&mut source)?;

    if dry_run {
        info!("Dry run, no files written");
        let report = to_pretty_json(&dataset.report)?;
        std::io::stdout()
            .write_all(&report)
            .context("Failed to print run report")?;
        return Ok(());
    }

    // Step 4: Write output files
    let layout = config.output_layout();
    writer::write_countries(&layout, &dataset.countries)?;
    let summary = writer::write_regions(&layout, &dataset.subdivisions);

    for failure in dataset
        .report
        .countries
        .failures
        .iter()
        .chain(&dataset.report.subdivisions.failures)
    {
        warn!("Locale {} was skipped: {}", failure.locale, failure.reason);
    }
    if !summary.failed.is_empty() {
        error!("{} region files could not be written", summary.failed.len());
    }

    info!(
        "✓ Generated {} countries and {} region files",
        dataset.countries.len(),
        summary.written.len()
    );
    Ok(())
}

/// Locales to process: the configured catalog plus script variants found on disk.
fn enumerate_locales(config: &Config) -> Result<Vec<LocaleId>> {
    let mut catalog = match &config.locale_catalog_file {
        Some(path) => LocaleCatalog::from_file(path)?,
        None => LocaleCatalog::builtin(),
    };

    let variants =
        catalog.extend_with_variants(&config.locale_dir, &[COUNTRY_DOMAIN, SUBDIVISION_DOMAIN]);
    if variants > 0 {
        info!(
            "Discovered {} script-variant locales in {}",
            variants,
            config.locale_dir.display()
        );
    }

    Ok(catalog.into_vec())
}
