use crate::core::models::composition::{Composition, FormulaParseError};
use crate::core::models::entry::PhaseEntry;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parsing error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid formula on row {row} of '{path}': {source}")]
    Formula {
        path: String,
        row: usize,
        source: FormulaParseError,
    },
    #[error("Unsupported entry file format '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    Json,
    Csv,
}

impl EntryFormat {
    pub fn from_path(path: &Path) -> Result<Self, EntryLoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(EntryFormat::Json),
            "csv" => Ok(EntryFormat::Csv),
            _ => Err(EntryLoadError::UnsupportedFormat(
                path.to_string_lossy().to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvEntryRecord {
    formula: String,
    #[serde(default)]
    energy: Option<f64>,
    #[serde(default)]
    energy_per_atom: Option<f64>,
    #[serde(default)]
    e_form_per_atom: Option<f64>,
    #[serde(default)]
    name: Option<String>,
}

/// Loads entries from a `.json` or `.csv` file, chosen by extension.
pub fn load_entries(path: &Path) -> Result<Vec<PhaseEntry>, EntryLoadError> {
    let file = std::fs::File::open(path).map_err(|e| EntryLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    match EntryFormat::from_path(path)? {
        EntryFormat::Json => read_json_entries(file, &path.to_string_lossy()),
        EntryFormat::Csv => read_csv_entries(file, &path.to_string_lossy()),
    }
}

pub fn read_json_entries<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<PhaseEntry>, EntryLoadError> {
    serde_json::from_reader(reader).map_err(|e| EntryLoadError::Json {
        path: source_name.to_string(),
        source: e,
    })
}

pub fn read_csv_entries<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<PhaseEntry>, EntryLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (row, result) in csv_reader.deserialize::<CsvEntryRecord>().enumerate() {
        let record = result.map_err(|e| EntryLoadError::Csv {
            path: source_name.to_string(),
            source: e,
        })?;
        let composition: Composition =
            record
                .formula
                .parse()
                .map_err(|e| EntryLoadError::Formula {
                    path: source_name.to_string(),
                    row: row + 1,
                    source: e,
                })?;
        entries.push(PhaseEntry {
            name: record.name,
            composition,
            energy: record.energy,
            energy_per_atom: record.energy_per_atom,
            e_form_per_atom: record.e_form_per_atom,
        });
    }
    Ok(entries)
}
