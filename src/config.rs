use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Conversion options
// ---------------------------------------------------------------------------

/// Everything that controls one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Whether the first record is a header row.
    pub header: bool,
    /// 1-based column positions diverted away from the matrix.
    pub exclude_columns: BTreeSet<usize>,
    /// Persist the excluded column as a labels file (single exclusion only).
    pub save_labels: bool,
    /// Re-encode saved labels as dense codes in ascending value order.
    pub categorical: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            header: true,
            exclude_columns: BTreeSet::new(),
            save_labels: false,
            categorical: false,
        }
    }
}

/// What happens to the excluded column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Dropped.
    Off,
    /// Written verbatim, one per line.
    Raw,
    /// Replaced by category codes, with a map file alongside.
    Categorical,
}

impl ConvertConfig {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Labels are only produced when exactly one column is excluded.
    pub fn label_mode(&self) -> LabelMode {
        if !self.save_labels || self.exclude_columns.len() != 1 {
            LabelMode::Off
        } else if self.categorical {
            LabelMode::Categorical
        } else {
            LabelMode::Raw
        }
    }

    /// Option combinations that are accepted but have no effect.
    pub fn warnings(&self, num_cols: usize) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.save_labels && self.exclude_columns.len() != 1 {
            warnings.push(format!(
                "save_labels needs exactly one excluded column, got {}; no labels will be written",
                self.exclude_columns.len()
            ));
        }
        if self.categorical && !self.save_labels {
            warnings.push("categorical has no effect without save_labels".to_string());
        }
        let out_of_range: Vec<String> = self
            .exclude_columns
            .iter()
            .filter(|&&c| c == 0 || c > num_cols)
            .map(|c| c.to_string())
            .collect();
        if !out_of_range.is_empty() {
            warnings.push(format!(
                "excluded column(s) {} outside 1..={num_cols} never match",
                out_of_range.join(",")
            ));
        }
        warnings
    }
}
