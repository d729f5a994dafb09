use std::fs::File;
use std::io;
use std::path::Path;

use log::debug;

use super::model::Table;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a comma-separated table from a file.
pub fn load_file(path: &Path, has_header: bool) -> Result<Table> {
    let file = File::open(path)?;
    let table = read_table(file, has_header)?;
    debug!(
        "loaded {}: {} data rows, {} columns",
        path.display(),
        table.len(),
        table.num_cols
    );
    Ok(table)
}

/// Read a comma-separated table from any byte stream.
///
/// * With `has_header`, the first record becomes [`Table::column_names`] and
///   sets `num_cols`; it is not a data row.
/// * Every non-empty record after that is a data row and overwrites
///   `num_cols` with its own field count, so the last row decides the width.
/// * Records with no fields are skipped. Blank lines never count as a
///   record, so the header is the first non-blank line.
///
/// Cells are kept as raw text; nothing is parsed as a number here.
pub fn read_table<R: io::Read>(reader: R, has_header: bool) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = Table::default();
    let mut header_pending = has_header;

    for result in rdr.records() {
        let record = result?;

        if header_pending {
            header_pending = false;
            table.num_cols = record.len();
            table.column_names = record.iter().map(str::to_string).collect();
            continue;
        }

        if record.is_empty() {
            continue;
        }

        table.num_cols = record.len();
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}
