//! GNU gettext `.mo` message catalogs, read with `rspolib`.
//!
//! Only what name lookups need is kept: plain msgid → first translated form.
//! Catalog bytes are bounds-checked before parsing, so a corrupt header is
//! reported as an error instead of sizing buffers from garbage.

use rspolib::errors::IOError;
use rspolib::{MAGIC, MAGIC_SWAPPED};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const HEADER_LEN: usize = 28;
const TABLE_ENTRY_LEN: u64 = 8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog has no magic number")]
    MissingMagicNumber,

    #[error("incorrect magic number {0:#010x}")]
    IncorrectMagicNumber(u32),

    #[error("unsupported revision {0}")]
    UnsupportedRevision(u32),

    #[error("corrupted catalog data while {context}")]
    Corrupted { context: String },

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

impl From<IOError> for CatalogError {
    fn from(error: IOError) -> Self {
        match error {
            IOError::ErrorReadingMagicNumber { .. } => CatalogError::MissingMagicNumber,
            IOError::IncorrectMagicNumber {
                magic_number_le, ..
            } => CatalogError::IncorrectMagicNumber(magic_number_le),
            IOError::UnsupportedMORevisionNumber { version } => {
                CatalogError::UnsupportedRevision(version)
            }
            IOError::CorruptedMOData { context } => CatalogError::Corrupted { context },
            other => CatalogError::Invalid(other.to_string()),
        }
    }
}

/// Translations loaded from one `.mo` file, keyed by msgid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Read and parse a catalog from disk.
    pub fn open(path: &Path) -> Result<MessageCatalog, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes)
    }

    /// Parse catalog bytes.
    ///
    /// The metadata entry, empty translations and context-qualified entries
    /// are dropped; plural entries are keyed by their singular msgid with the
    /// first translated form.
    pub fn parse(bytes: &[u8]) -> Result<MessageCatalog, CatalogError> {
        check_bounds(bytes)?;
        let file = rspolib::mofile(bytes.to_vec())?;

        let mut messages = HashMap::new();
        for entry in file.entries {
            if entry.msgid.is_empty() || entry.msgctxt.is_some() {
                continue;
            }
            let translation = match entry.msgid_plural {
                Some(_) => entry.msgstr_plural.into_iter().next(),
                None => entry.msgstr,
            };
            match translation {
                Some(value) if !value.is_empty() => {
                    messages.entry(entry.msgid).or_insert(value);
                }
                _ => {}
            }
        }

        Ok(MessageCatalog { messages })
    }

    /// Translation of `msgid`, if the catalog has one.
    pub fn get(&self, msgid: &str) -> Option<&str> {
        self.messages.get(msgid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Check that both string tables and every string they point to lie inside `bytes`.
///
/// Files without a known magic number are left to the parser to reject.
fn check_bounds(bytes: &[u8]) -> Result<(), CatalogError> {
    let read = |offset: u64, big_endian: bool| -> Option<u32> {
        let start = usize::try_from(offset).ok()?;
        let raw: [u8; 4] = bytes.get(start..start.checked_add(4)?)?.try_into().ok()?;
        Some(if big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    };

    let big_endian = match read(0, false) {
        Some(MAGIC) => false,
        Some(MAGIC_SWAPPED) => true,
        _ => return Ok(()),
    };
    let corrupted = |context: String| CatalogError::Corrupted { context };

    if bytes.len() < HEADER_LEN {
        return Err(corrupted(format!("reading a {}-byte header", bytes.len())));
    }
    let header = |offset: u64| read(offset, big_endian).unwrap_or_default() as u64;
    let count = header(8);
    let len = bytes.len() as u64;

    for (table, offset) in [("msgid", header(12)), ("msgstr", header(16))] {
        if offset + count * TABLE_ENTRY_LEN > len {
            return Err(corrupted(format!(
                "checking the {} table ({} entries at offset {})",
                table, count, offset
            )));
        }
        for i in 0..count {
            let entry = offset + i * TABLE_ENTRY_LEN;
            let string_len = read(entry, big_endian).unwrap_or_default() as u64;
            let string_offset = read(entry + 4, big_endian).unwrap_or_default() as u64;
            if string_offset + string_len > len {
                return Err(corrupted(format!("checking {} at index {}", table, i)));
            }
        }
    }

    Ok(())
}
