//! Plain-text export of all records.

use crate::error::{Result, StoreError};
use crate::models::{ItemRecord, ItemView};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write one line per record to `path`, replacing any previous export.
/// Returns the number of lines written.
pub fn export_records(records: &[ItemRecord], path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        writeln!(writer, "{}", ItemView::from(record)).map_err(|e| StoreError::io(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))?;

    tracing::info!(path = %path.display(), count = records.len(), "Exported records");
    Ok(records.len())
}
