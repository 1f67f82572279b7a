use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::constants::{ENRICHED_FIELDS, IO_BUFFER_SIZE_BYTES};
use crate::record::Row;

/// Source columns in first-seen order, then any enrichment column they lack.
pub fn output_fieldnames(source_fields: &[String]) -> Vec<String> {
    let mut fieldnames = source_fields.to_vec();
    for field in ENRICHED_FIELDS {
        if !fieldnames.iter().any(|f| f == field) {
            fieldnames.push(field.to_string());
        }
    }
    fieldnames
}

/// Overwrites `path` with a header line and one record per row.
pub fn write_rows(path: &Path, rows: &[Row], fieldnames: &[String]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::with_capacity(IO_BUFFER_SIZE_BYTES, file));

    writer.write_record(fieldnames)?;
    for row in rows {
        writer.write_record(row.project(fieldnames))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}
