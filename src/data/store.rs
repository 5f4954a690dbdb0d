use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::export::{export_parquet, write_csv};
use super::loader::{load_file, FileFormat};
use super::model::{HouseDataset, HouseRecord};
use super::sqlite::SqliteStore;
use crate::error::{HouseError, HouseResult};

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// Backing storage for the housing records.
pub trait DatasetStore {
    /// Read the full dataset.  Missing or unreadable backing data fails with
    /// [`HouseError::DatasetUnavailable`].
    fn load(&mut self) -> HouseResult<HouseDataset>;

    /// Persist one new record.  Duplicates are never rejected.
    fn append(&mut self, record: &HouseRecord) -> HouseResult<()>;

    /// Where the data lives, for notices and logging.
    fn location(&self) -> &Path;
}

/// Pick a store implementation from the path's extension.
pub fn open_store(path: &Path) -> HouseResult<Box<dyn DatasetStore>> {
    if FileFormat::from_path(path).is_some() {
        return Ok(Box::new(FileStore::new(path)));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "db" | "sqlite" | "sqlite3" => {
            if !path.exists() {
                return Err(HouseError::DatasetUnavailable {
                    path: path.to_path_buf(),
                    reason: "file not found".to_string(),
                });
            }
            let store = SqliteStore::open(path)
                .map_err(|e| HouseError::dataset_unavailable(path, &e))?;
            Ok(Box::new(store))
        }
        other => Err(HouseError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason: format!("unsupported extension '.{other}'"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Flat file store (CSV / Parquet)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append_csv(&self, record: &HouseRecord) -> Result<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {} for append", self.path.display()))?;
        if needs_header {
            write_csv(std::slice::from_ref(record), file)
        } else {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            wtr.serialize(record).context("serializing CSV row")?;
            wtr.flush().context("flushing CSV writer")?;
            Ok(())
        }
    }

    fn append_parquet(&self, record: &HouseRecord) -> Result<()> {
        // Parquet files are immutable; rewrite with the extra row.
        let mut dataset = if self.path.exists() {
            load_file(&self.path)?
        } else {
            HouseDataset::default()
        };
        dataset.push(record.clone());
        export_parquet(&dataset.records, &self.path)
    }
}

impl DatasetStore for FileStore {
    fn load(&mut self) -> HouseResult<HouseDataset> {
        load_file(&self.path).map_err(|e| HouseError::dataset_unavailable(&self.path, &e))
    }

    fn append(&mut self, record: &HouseRecord) -> HouseResult<()> {
        let result = match FileFormat::from_path(&self.path) {
            Some(FileFormat::Parquet) => self.append_parquet(record),
            _ => self.append_csv(record),
        };
        result.map_err(|e| HouseError::storage(&e))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn csv_store_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("houses.csv");
        let mut store = FileStore::new(&path);

        store.append(&record(100_000, 1990, 5, "NAmes")).unwrap();
        store.append(&record(100_000, 1990, 5, "NAmes")).unwrap();
        store.append(&record(200_000, 2010, 7, "CollgCr")).unwrap();

        let ds = store.load().unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0], ds.records[1]);
        assert_eq!(ds.records[2].neighborhood, "CollgCr");
    }

    #[test]
    fn parquet_store_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("houses.parquet");
        export_parquet(&[record(100_000, 1990, 5, "NAmes")], &path).unwrap();

        let mut store = FileStore::new(&path);
        store.append(&record(300_000, 2012, 8, "Somerst")).unwrap();
        let ds = store.load().unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].sale_price, 300_000);
    }

    #[test]
    fn missing_file_is_dataset_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir.path().join("absent.csv")).unwrap();
        assert!(matches!(
            store.load(),
            Err(HouseError::DatasetUnavailable { .. })
        ));
        assert!(matches!(
            open_store(&dir.path().join("absent.db")),
            Err(HouseError::DatasetUnavailable { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_dataset_unavailable() {
        assert!(matches!(
            open_store(Path::new("houses.xlsx")),
            Err(HouseError::DatasetUnavailable { .. })
        ));
    }
}
