use std::fmt;

// ---------------------------------------------------------------------------
// Table – the raw ingested CSV
// ---------------------------------------------------------------------------

/// The complete input held in memory: raw cell text, no numeric parsing yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Header fields, empty when the input had no header row.
    pub column_names: Vec<String>,
    /// Data rows in input order.
    pub rows: Vec<Vec<String>>,
    /// Field count of the last non-empty record read (header included).
    ///
    /// Rows are assumed to share this width but nothing checks it.
    pub num_cols: usize,
}

impl Table {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SparseRow – one encoded matrix row
// ---------------------------------------------------------------------------

/// A single non-zero cell of the output matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseEntry<'a> {
    /// 1-based rank of the column among the kept columns.
    pub index: usize,
    /// Parsed cell value, never `0.0`.
    pub value: f64,
    /// The cell text minus surrounding whitespace; this is what gets written.
    pub raw: &'a str,
}

impl fmt::Display for SparseEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.index, self.raw)
    }
}

/// The non-zero entries of one row, in strictly increasing index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow<'a> {
    pub entries: Vec<SparseEntry<'a>>,
}

impl SparseRow<'_> {
    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand into a dense vector of `width` values, absent indices as `0.0`.
    ///
    /// Entries whose index falls beyond `width` are dropped.
    pub fn to_dense(&self, width: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width];
        for entry in &self.entries {
            if let Some(slot) = entry.index.checked_sub(1).and_then(|i| dense.get_mut(i)) {
                *slot = entry.value;
            }
        }
        dense
    }
}

/// Space-separated `index,value` tokens; an empty row renders as "".
impl fmt::Display for SparseRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
