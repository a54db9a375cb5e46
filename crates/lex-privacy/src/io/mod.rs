//! CSV loading and export.
//!
//! Input bytes are decoded as UTF-8, falling back to Latin-1, then parsed
//! with a header row. Column names are trimmed of surrounding whitespace.
//! Export writes comma-separated UTF-8 with a header row and no index column.

use crate::error::{AnonymizationError, Result, ResultExt};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of rows used for dtype inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Decode raw bytes as UTF-8, or as Latin-1 when they are not valid UTF-8.
///
/// Latin-1 maps every byte to the code point of the same value, so this
/// never fails.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Input is not valid UTF-8; decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Parse CSV bytes into a DataFrame.
///
/// Columns named in `text_columns` (after trimming) are read as text instead
/// of having their dtype inferred, which keeps values such as `"012345"`
/// intact.
pub fn read_csv_bytes<S: AsRef<str>>(bytes: &[u8], text_columns: &[S]) -> Result<DataFrame> {
    let text = decode_text(bytes);

    let mut df = parse_with_fallbacks(&text, None)?;

    if !text_columns.is_empty() {
        let overwrite = text_schema(&df, text_columns);
        if overwrite.is_empty() {
            warn!("None of the requested text columns exist in the input");
        } else {
            df = parse_with_fallbacks(&text, Some(Arc::new(overwrite)))?;
        }
    }

    trim_column_names(&mut df)?;
    Ok(df)
}

/// Read a CSV file from disk. See [`read_csv_bytes`].
pub fn read_csv_file<S: AsRef<str>>(path: impl AsRef<Path>, text_columns: &[S]) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());
    let bytes = fs::read(path)
        .map_err(AnonymizationError::from)
        .context(format!("Could not read {}", path.display()))?;
    let df = read_csv_bytes(&bytes, text_columns)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Serialize a DataFrame as CSV bytes.
pub fn write_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut df = df.clone();
    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Failed to write CSV")?;
    Ok(buffer)
}

/// Write a DataFrame to a CSV file, creating parent directories as needed.
pub fn write_csv_file(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut df = df.clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Parse CSV text, retrying on quote-normalized content if the first
/// attempt fails.
fn parse_with_fallbacks(text: &str, overwrite: Option<SchemaRef>) -> Result<DataFrame> {
    // Strategy 1: standard loading with quote handling
    match parse(text.to_string(), overwrite.clone()) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: pre-clean content
    parse(clean_csv_content(text), overwrite).context("Failed to parse CSV input")
}

fn parse(content: String, overwrite: Option<SchemaRef>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_schema_overwrite(overwrite)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Schema forcing the requested columns to text, keyed by raw header names.
fn text_schema<S: AsRef<str>>(df: &DataFrame, text_columns: &[S]) -> Schema {
    let mut schema = Schema::with_capacity(text_columns.len());
    for raw in df.get_column_names() {
        let wanted = text_columns
            .iter()
            .any(|name| name.as_ref().trim() == raw.trim());
        if wanted {
            schema.with_column(raw.clone(), DataType::String);
        }
    }
    schema
}

fn trim_column_names(df: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    let changed = df
        .get_column_names()
        .iter()
        .zip(&trimmed)
        .any(|(raw, clean)| raw.as_str() != clean);

    if changed {
        debug!("Trimming whitespace from column names");
        df.set_column_names(trimmed.iter().map(String::as_str))
            .context("Column names collide after trimming whitespace")?;
    }
    Ok(())
}
