/// Data layer: typed records, workbook loading, filtering, aggregation,
/// and CSV export.
///
/// Architecture:
/// ```text
///  two-sheet .xlsx workbook
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read both sheets, normalize keys, left-join → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<TractRecord> + present-column capabilities
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  county set + percentile interval → view indices
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary   │   │  export   │  aggregates / CSV of the view
///   └──────────┘   └──────────┘
/// ```
///
/// Every stage derives a new value from its inputs; nothing downstream
/// mutates the dataset, so views and aggregates can be recomputed from
/// scratch on every filter change.

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
