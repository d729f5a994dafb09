use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use ordered_float::NotNan;

use super::sparse::parse_cell;
use crate::error::{ConvertError, Result};

/// Parse a diverted cell as a categorical label. NaN is rejected since it has
/// no place in the sorted code order.
pub fn parse_label(raw: &str, row: usize, column: usize) -> Result<NotNan<f64>> {
    parse_cell(raw)
        .and_then(|v| NotNan::new(v).ok())
        .ok_or_else(|| ConvertError::InvalidLabel {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Render a label value the way it appears in the map file.
///
/// Shortest round-trip digits, a trailing `.0` on integral values, and a
/// signed two-digit-minimum exponent outside `[1e-4, 1e16)`:
/// `1.0`, `2.5`, `1e+16`, `1.5e-05`.
pub fn format_label(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => repr,
    }
}

/// Build the category map and recode `labels` against it in one go.
pub fn encode_labels(labels: &[NotNan<f64>]) -> (CategoryMap, Vec<usize>) {
    let map = CategoryMap::from_labels(labels);
    // Every label is one of `map.values`, so the search always hits.
    let codes = labels
        .iter()
        .map(|label| map.values.binary_search(label).unwrap_or_else(|i| i))
        .collect();
    (map, codes)
}

// ---------------------------------------------------------------------------
// CategoryMap – distinct label value ↔ dense code
// ---------------------------------------------------------------------------

/// Bijection between the distinct label values and `0..len()`, with codes
/// assigned in ascending value order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    codes: BTreeMap<NotNan<f64>, usize>,
    values: Vec<NotNan<f64>>,
}

impl CategoryMap {
    /// Build the map from every collected label (repeats allowed).
    pub fn from_labels(labels: &[NotNan<f64>]) -> Self {
        let distinct: BTreeSet<NotNan<f64>> = labels.iter().copied().collect();
        let values: Vec<NotNan<f64>> = distinct.into_iter().collect();
        let codes = values
            .iter()
            .enumerate()
            .map(|(code, &value)| (value, code))
            .collect();
        CategoryMap { codes, values }
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Code assigned to `value`, if it was one of the collected labels.
    pub fn code_of(&self, value: f64) -> Option<usize> {
        let key = NotNan::new(value).ok()?;
        self.codes.get(&key).copied()
    }

    /// Original label value behind `code`.
    pub fn value_of(&self, code: usize) -> Option<f64> {
        self.values.get(code).map(|v| v.into_inner())
    }

    /// `(value, code)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(code, v)| (v.into_inner(), code))
    }

    /// Recode labels in their original order, or `None` if any of them is
    /// not in the map.
    pub fn encode(&self, labels: &[NotNan<f64>]) -> Option<Vec<usize>> {
        labels
            .iter()
            .map(|label| self.codes.get(label).copied())
            .collect()
    }

    /// Write one `"<value> , <code>"` line per distinct label.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (value, code) in self.iter() {
            writeln!(out, "{} , {}", format_label(value), code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[f64]) -> Vec<NotNan<f64>> {
        values.iter().map(|&v| NotNan::new(v).unwrap()).collect()
    }

    #[test]
    fn codes_follow_sorted_order() {
        let collected = labels(&[3.0, 1.0, 2.0, 1.0, 3.0]);
        let map = CategoryMap::from_labels(&collected);
        assert_eq!(map.len(), 3);
        assert_eq!(map.code_of(1.0), Some(0));
        assert_eq!(map.code_of(2.0), Some(1));
        assert_eq!(map.code_of(3.0), Some(2));
        assert_eq!(map.encode(&collected), Some(vec![2, 0, 1, 0, 2]));
    }

    #[test]
    fn encode_labels_matches_map_encoding() {
        let collected = labels(&[5.5, -1.0, 5.5, 0.0]);
        let (map, codes) = encode_labels(&collected);
        assert_eq!(codes, vec![2, 0, 2, 1]);
        assert_eq!(map.encode(&collected), Some(codes));
    }

    #[test]
    fn encode_rejects_labels_outside_the_map() {
        let map = CategoryMap::from_labels(&labels(&[1.0, 2.0]));
        assert_eq!(map.encode(&labels(&[1.0, 3.0])), None);
        assert_eq!(map.encode(&[]), Some(vec![]));
    }

    #[test]
    fn format_label_exponent_forms() {
        assert_eq!(format_label(1.0), "1.0");
        assert_eq!(format_label(-0.25), "-0.25");
        assert_eq!(format_label(123456.0), "123456.0");
        assert_eq!(format_label(1e15), "1000000000000000.0");
        assert_eq!(format_label(1e16), "1e+16");
        assert_eq!(format_label(2.5e100), "2.5e+100");
        assert_eq!(format_label(1e-5), "1e-05");
        assert_eq!(format_label(-1.5e-7), "-1.5e-07");
        assert_eq!(format_label(f64::INFINITY), "inf");
    }

    #[test]
    fn map_is_an_order_preserving_bijection() {
        let collected = labels(&[10.5, -4.0, 0.25, 10.5, 7.0, -4.0]);
        let map = CategoryMap::from_labels(&collected);
        let pairs: Vec<(f64, usize)> = map.iter().collect();
        for (code, &(value, c)) in pairs.iter().enumerate() {
            assert_eq!(c, code);
            assert_eq!(map.value_of(code), Some(value));
            assert_eq!(map.code_of(value), Some(code));
        }
        assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(map.value_of(pairs.len()), None);
    }

    #[test]
    fn negative_zero_and_zero_share_a_code() {
        let map = CategoryMap::from_labels(&labels(&[0.0, -0.0, 1.0]));
        assert_eq!(map.len(), 2);
        assert_eq!(map.code_of(-0.0), Some(0));
    }

    #[test]
    fn map_file_lines() {
        let map = CategoryMap::from_labels(&labels(&[2.0, 1.0, 2.5]));
        let mut out = Vec::new();
        map.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.0 , 0\n2.0 , 1\n2.5 , 2\n");
    }

    #[test]
    fn parse_label_rejects_nan_and_text() {
        assert!(matches!(
            parse_label("NaN", 1, 4),
            Err(ConvertError::InvalidLabel { row: 1, column: 4, .. })
        ));
        assert!(parse_label("A", 2, 4).is_err());
        assert_eq!(parse_label(" 3 ", 1, 1).unwrap().into_inner(), 3.0);
    }

    #[test]
    fn unknown_value_has_no_code() {
        let map = CategoryMap::from_labels(&labels(&[1.0]));
        assert_eq!(map.code_of(5.0), None);
        assert_eq!(map.code_of(f64::NAN), None);
    }
}
