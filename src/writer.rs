//! Output files: `countries.json` and one `regions/<CC>.json` per country.
//!
//! Files are pretty-printed with four-space indentation and unescaped
//! Unicode. Every map in the output is ordered, so unchanged input produces
//! byte-identical files.

use crate::aggregate::{CountryTable, SubdivisionTable};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const COUNTRIES_FILE: &str = "countries.json";
pub const REGIONS_DIR: &str = "regions";

/// Where a run's files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub countries_file: PathBuf,
    pub regions_dir: PathBuf,
}

impl OutputLayout {
    pub fn in_dir(output_dir: &Path) -> OutputLayout {
        OutputLayout {
            countries_file: output_dir.join(COUNTRIES_FILE),
            regions_dir: output_dir.join(REGIONS_DIR),
        }
    }

    pub fn region_file(&self, country: &str) -> PathBuf {
        self.regions_dir.join(format!("{}.json", country))
    }
}

/// Result of writing the per-country region files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionWriteSummary {
    /// `(country, region count)` for every file written
    pub written: Vec<(String, usize)>,
    /// `(country, error)` for every file that could not be written
    pub failed: Vec<(String, String)>,
}

/// Serialize `value` the way every output file is formatted.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = to_pretty_json(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the countries file. Failure here is fatal for the run.
pub fn write_countries(layout: &OutputLayout, countries: &CountryTable) -> Result<()> {
    write_json(&layout.countries_file, countries)?;
    info!(
        "Generated {} with {} countries",
        layout.countries_file.display(),
        countries.len()
    );
    Ok(())
}

/// Write one file per country. A failing country is logged and skipped.
pub fn write_regions(layout: &OutputLayout, subdivisions: &SubdivisionTable) -> RegionWriteSummary {
    let mut summary = RegionWriteSummary::default();

    for (country, regions) in subdivisions {
        let path = layout.region_file(country);
        match write_json(&path, regions) {
            Ok(()) => {
                info!("Generated {} with {} regions", path.display(), regions.len());
                summary.written.push((country.clone(), regions.len()));
            }
            Err(e) => {
                error!("Skipping regions of {}: {:#}", country, e);
                summary.failed.push((country.clone(), format!("{:#}", e)));
            }
        }
    }

    summary
}
