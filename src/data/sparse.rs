use std::collections::BTreeSet;

use super::model::{SparseEntry, SparseRow};
use crate::error::{ConvertError, Result};

/// Matrix width declared in the header: all columns minus the excluded ones.
pub fn effective_width(num_cols: usize, excluded: &BTreeSet<usize>) -> usize {
    num_cols.saturating_sub(excluded.len())
}

/// Parse a cell as `f64`, ignoring surrounding whitespace.
pub fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Encode one data row.
///
/// Walks the row's own cells in order. A column whose 1-based position is in
/// `excluded` is handed to `divert` as `(column, raw)` on the spot and does
/// not advance the output index. Every other cell advances it, must parse as
/// a number, and is emitted unless it equals `0.0`.
///
/// Emitted entries carry the cell text without surrounding whitespace, so a
/// written token never contains the record delimiter.
///
/// `row_no` is only used for error reporting. An error from `divert` or a
/// failed parse stops the walk; cells diverted before that point stay
/// diverted.
pub fn encode_row<'a, F>(
    row: &'a [String],
    row_no: usize,
    excluded: &BTreeSet<usize>,
    mut divert: F,
) -> Result<SparseRow<'a>>
where
    F: FnMut(usize, &'a str) -> Result<()>,
{
    let mut sparse = SparseRow::default();
    let mut j = 0;

    for (i, raw) in row.iter().enumerate() {
        let column = i + 1;
        if excluded.contains(&column) {
            divert(column, raw.as_str())?;
            continue;
        }

        j += 1;
        let text = raw.trim();
        let value = text
            .parse::<f64>()
            .map_err(|_| ConvertError::InvalidNumber {
                row: row_no,
                column,
                value: raw.clone(),
            })?;
        if value == 0.0 {
            continue;
        }
        sparse.entries.push(SparseEntry {
            index: j,
            value,
            raw: text,
        });
    }

    Ok(sparse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn set(cols: &[usize]) -> BTreeSet<usize> {
        cols.iter().copied().collect()
    }

    /// Encode and collect the diverted cells.
    fn encode<'a>(
        r: &'a [String],
        excluded: &BTreeSet<usize>,
    ) -> (Result<SparseRow<'a>>, Vec<(usize, &'a str)>) {
        let mut diverted = Vec::new();
        let encoded = encode_row(r, 1, excluded, |column, raw| {
            diverted.push((column, raw));
            Ok(())
        });
        (encoded, diverted)
    }

    #[test]
    fn excluded_column_is_diverted_and_zeros_dropped() {
        let r = row(&["2", "3", "0", "1.0"]);
        let (sparse, diverted) = encode(&r, &set(&[4]));
        assert_eq!(sparse.unwrap().to_string(), "1,2 2,3");
        assert_eq!(diverted, vec![(4, "1.0")]);
    }

    #[test]
    fn output_index_skips_excluded_columns() {
        let r = row(&["5", "lbl", "0", "7"]);
        let (sparse, _) = encode(&r, &set(&[2]));
        let sparse = sparse.unwrap();
        let indices: Vec<usize> = sparse.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(sparse.to_string(), "1,5 3,7");
    }

    #[test]
    fn cell_text_is_written_without_surrounding_whitespace() {
        let r = row(&["1.50", " 2e3", "-0.0", "\t4 "]);
        let (sparse, _) = encode(&r, &BTreeSet::new());
        let sparse = sparse.unwrap();
        assert_eq!(sparse.to_string(), "1,1.50 2,2e3 4,4");
        assert_eq!(sparse.entries[1].value, 2000.0);
    }

    #[test]
    fn every_token_is_one_index_value_pair() {
        let r = row(&[" 2", "3 ", " 0 ", "  -1.25  "]);
        let (sparse, _) = encode(&r, &BTreeSet::new());
        let line = sparse.unwrap().to_string();
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), 3);
        for token in tokens {
            let (index, value) = token.split_once(',').expect("index,value");
            assert!(!value.contains(','));
            assert!(index.parse::<usize>().is_ok());
            assert!(value.parse::<f64>().is_ok());
        }
    }

    #[test]
    fn fully_excluded_row_is_empty() {
        let r = row(&["a", "b"]);
        let (sparse, diverted) = encode(&r, &set(&[1, 2]));
        let sparse = sparse.unwrap();
        assert!(sparse.is_empty());
        assert_eq!(sparse.to_string(), "");
        assert_eq!(diverted.len(), 2);
    }

    #[test]
    fn all_zero_row_is_empty() {
        let r = row(&["0", "0.0", "-0"]);
        let (sparse, _) = encode(&r, &BTreeSet::new());
        assert!(sparse.unwrap().is_empty());
    }

    #[test]
    fn non_numeric_kept_cell_is_fatal() {
        let r = row(&["1", "x"]);
        let err = encode_row(&r, 3, &BTreeSet::new(), |_, _| Ok(())).unwrap_err();
        match err {
            ConvertError::InvalidNumber { row, column, value } => {
                assert_eq!((row, column, value.as_str()), (3, 2, "x"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cells_before_a_bad_cell_are_already_diverted() {
        let r = row(&["lbl", "oops", "tail"]);
        let (sparse, diverted) = encode(&r, &set(&[1, 3]));
        assert!(sparse.is_err());
        assert_eq!(diverted, vec![(1, "lbl")]);
    }

    #[test]
    fn out_of_range_exclusion_never_matches() {
        let r = row(&["1", "2"]);
        let (sparse, diverted) = encode(&r, &set(&[0, 9]));
        assert_eq!(sparse.unwrap().to_string(), "1,1 2,2");
        assert!(diverted.is_empty());
    }

    #[test]
    fn effective_width_saturates() {
        assert_eq!(effective_width(4, &set(&[4])), 3);
        assert_eq!(effective_width(1, &set(&[1, 2, 3])), 0);
    }
}
