use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{ConvertConfig, LabelMode};
use crate::data::labels::{encode_labels, parse_label, CategoryMap};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::sparse::{effective_width, encode_row};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Output locations
// ---------------------------------------------------------------------------

/// Files produced by one run, all derived from the matrix path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub matrix: PathBuf,
    /// `<matrix>.lbls`
    pub labels: PathBuf,
    /// `<matrix>.lbls.map.txt`
    pub label_map: PathBuf,
}

impl OutputPaths {
    pub fn for_matrix(matrix: &Path) -> Self {
        Self {
            matrix: matrix.to_path_buf(),
            labels: with_suffix(matrix, ".lbls"),
            label_map: with_suffix(matrix, ".lbls.map.txt"),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// What a finished run wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    /// Data rows written (the first number of the matrix header).
    pub rows: usize,
    /// Input width as recorded by the reader.
    pub num_cols: usize,
    /// Declared matrix width (the second number of the matrix header).
    pub effective_cols: usize,
    /// Total non-zero entries across all rows.
    pub nonzeros: usize,
    /// Lines written to the labels output.
    pub labels_written: usize,
    /// Present after a categorical run.
    pub category_map: Option<CategoryMap>,
}

/// Write `table` as a sparse matrix and route the excluded column to `labels`.
///
/// The matrix header `"<rows> <effective_cols>"` comes first, then one line
/// per data row. In [`LabelMode::Raw`] each diverted value is written the
/// moment its column is reached, so a row that later fails numeric parsing
/// still leaves its label line behind. In [`LabelMode::Categorical`] values
/// are collected and their codes written after the last row. A fatal error
/// leaves whatever was already written in place.
pub fn convert_table<M: Write, L: Write>(
    table: &Table,
    config: &ConvertConfig,
    matrix: &mut M,
    mut labels: Option<&mut L>,
) -> Result<ConversionSummary> {
    let mode = config.label_mode();
    for warning in config.warnings(table.num_cols) {
        warn!("{warning}");
    }

    let effective_cols = effective_width(table.num_cols, &config.exclude_columns);
    writeln!(matrix, "{} {}", table.len(), effective_cols)?;
    debug!(
        "matrix shape {}x{}, label mode {:?}",
        table.len(),
        effective_cols,
        mode
    );

    let mut summary = ConversionSummary {
        rows: table.len(),
        num_cols: table.num_cols,
        effective_cols,
        ..ConversionSummary::default()
    };
    let mut collected = Vec::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let sparse = encode_row(row, row_no, &config.exclude_columns, |column, raw| {
            match mode {
                LabelMode::Off => {}
                LabelMode::Raw => {
                    if let Some(out) = labels.as_deref_mut() {
                        writeln!(out, "{raw}")?;
                        summary.labels_written += 1;
                    }
                }
                LabelMode::Categorical => collected.push(parse_label(raw, row_no, column)?),
            }
            Ok(())
        })?;

        summary.nonzeros += sparse.nnz();
        writeln!(matrix, "{sparse}")?;
    }

    if mode == LabelMode::Categorical {
        let (map, codes) = encode_labels(&collected);
        debug!("{} labels in {} categories", collected.len(), map.len());
        if let Some(out) = labels.as_deref_mut() {
            for code in codes {
                writeln!(out, "{code}")?;
            }
            summary.labels_written = collected.len();
        }
        summary.category_map = Some(map);
    }

    Ok(summary)
}

/// Convert the CSV at `input` into the matrix file at `output`, plus the
/// labels and label-map files next to it when the configuration asks for
/// them.
///
/// Every output is flushed and closed before this returns, on success and on
/// failure alike.
pub fn convert_file(input: &Path, output: &Path, config: &ConvertConfig) -> Result<ConversionSummary> {
    let table = load_file(input, config.header)?;
    let paths = OutputPaths::for_matrix(output);

    let mut labels = match config.label_mode() {
        LabelMode::Off => None,
        LabelMode::Raw | LabelMode::Categorical => {
            Some(BufWriter::new(File::create(&paths.labels)?))
        }
    };
    let mut matrix = BufWriter::new(File::create(&paths.matrix)?);

    let converted = convert_table(&table, config, &mut matrix, labels.as_mut());
    let flushed = flush_all(&mut matrix, labels.as_mut());
    let summary = converted?;
    flushed?;

    if let Some(map) = &summary.category_map {
        let mut out = BufWriter::new(File::create(&paths.label_map)?);
        map.write_to(&mut out)?;
        out.flush()?;
        debug!("wrote label map to {}", paths.label_map.display());
    }

    info!(
        "converted {} rows into {} ({} columns, {} non-zeros)",
        summary.rows,
        paths.matrix.display(),
        summary.effective_cols,
        summary.nonzeros
    );
    Ok(summary)
}

fn flush_all<W: Write>(matrix: &mut W, labels: Option<&mut W>) -> std::io::Result<()> {
    matrix.flush()?;
    if let Some(out) = labels {
        out.flush()?;
    }
    Ok(())
}
