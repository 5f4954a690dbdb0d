/// Data layer: record types, storage, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .db
///        │
///        ▼
///   ┌──────────────┐
///   │ store/loader │  read file or table → HouseDataset
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ HouseDataset │  Vec<HouseRecord>, neighborhood index
///   └──────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌─────────┐
///   │  filter  │   │  stats  │
///   └──────────┘   └─────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  CSV / Parquet
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sqlite;
pub mod stats;
pub mod store;
