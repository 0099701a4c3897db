/// Data layer: core types, loading, merging and layer selection.
///
/// Architecture:
/// ```text
///  CUERPO_*.csv  (one per water-body type)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SourceTable (typed, null-filtered)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  concat in file order, fill coliform gaps → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  water-type selection → per-layer visibility
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
