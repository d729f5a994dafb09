/// Data layer: table ingest, sparse encoding, label categorisation.
///
/// Architecture:
/// ```text
///   input.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Table (raw cells, num_cols)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  sparse   │  per row: kept cells → SparseRow, excluded → diverted
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  labels   │  diverted values → CategoryMap + dense codes
///   └──────────┘
/// ```

pub mod labels;
pub mod loader;
pub mod model;
pub mod sparse;
