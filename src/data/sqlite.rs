//! SQLite persistence for the `houses` table.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection, Params, Row};

use super::filter::{Clause, FilterCriteria};
use super::model::{
    HouseDataset, HouseRecord, ALL_COLUMNS, COL_LATITUDE, COL_LONGITUDE,
};
use super::store::DatasetStore;
use crate::error::{HouseError, HouseResult};

const SELECT_COLUMNS: &str = r#"SELECT "SalePrice", "Gr Liv Area", "Bedroom AbvGr", "Year Built",
    "Garage Cars", "Lot Area", "Overall Qual", "Neighborhood", "Latitude", "Longitude"
    FROM houses"#;

/// Create the `houses` table if needed and bring older tables up to date.
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        r#"CREATE TABLE IF NOT EXISTS houses (
            "SalePrice" INTEGER NOT NULL,
            "Gr Liv Area" INTEGER NOT NULL,
            "Bedroom AbvGr" INTEGER NOT NULL,
            "Year Built" INTEGER NOT NULL,
            "Garage Cars" INTEGER NOT NULL,
            "Lot Area" INTEGER NOT NULL,
            "Overall Qual" INTEGER NOT NULL,
            "Neighborhood" TEXT NOT NULL,
            "Latitude" REAL,
            "Longitude" REAL
        )"#,
        [],
    )?;

    // Migration: tables imported straight from the Ames CSV lack coordinates
    let existing = column_names(conn)?;
    for col in [COL_LATITUDE, COL_LONGITUDE] {
        if !existing.iter().any(|c| c == col) {
            conn.execute(&format!(r#"ALTER TABLE houses ADD COLUMN "{col}" REAL"#), [])?;
            log::info!("Added column '{col}' to houses");
        }
    }

    conn.execute(
        r#"CREATE INDEX IF NOT EXISTS idx_houses_price ON houses("SalePrice")"#,
        [],
    )?;

    Ok(())
}

fn column_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(houses)")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    names.collect()
}

// Cells are read loosely: tables written by pandas store integer columns
// that held NA as REAL.

fn int_cell<T: TryFrom<i64>>(row: &Row<'_>, idx: usize) -> Result<T> {
    let name = ALL_COLUMNS[idx];
    let value = match row.get_ref(idx)? {
        ValueRef::Integer(v) => v,
        ValueRef::Real(v) if v.fract() == 0.0 => v as i64,
        ValueRef::Real(v) => bail!("'{name}' value {v} is not a whole number"),
        ValueRef::Null => bail!("null value in '{name}'"),
        other => bail!("'{name}' has unsupported type {}", other.data_type()),
    };
    T::try_from(value).map_err(|_| anyhow!("'{name}' value {value} out of range"))
}

fn float_cell(row: &Row<'_>, idx: usize) -> Result<Option<f64>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Real(v) => Ok(Some(v)),
        ValueRef::Integer(v) => Ok(Some(v as f64)),
        other => bail!(
            "'{}' has unsupported type {}",
            ALL_COLUMNS[idx],
            other.data_type()
        ),
    }
}

fn text_cell(row: &Row<'_>, idx: usize) -> Result<String> {
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Null => bail!("null value in '{}'", ALL_COLUMNS[idx]),
        other => bail!(
            "'{}' has unsupported type {}",
            ALL_COLUMNS[idx],
            other.data_type()
        ),
    }
}

/// Column order follows `SELECT_COLUMNS`, which matches `ALL_COLUMNS`.
fn row_to_record(row: &Row<'_>) -> Result<HouseRecord> {
    Ok(HouseRecord {
        sale_price: int_cell(row, 0)?,
        living_area: int_cell(row, 1)?,
        bedrooms_above_grade: int_cell(row, 2)?,
        year_built: int_cell(row, 3)?,
        garage_capacity: int_cell(row, 4)?,
        lot_area: int_cell(row, 5)?,
        overall_quality: int_cell(row, 6)?,
        neighborhood: text_cell(row, 7)?,
        latitude: float_cell(row, 8)?,
        longitude: float_cell(row, 9)?,
    })
}

/// Run a selection and keep the rows that decode and validate.  Bad rows are
/// skipped with a warning.
fn read_records<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<HouseRecord>> {
    let mut stmt = conn.prepare(sql).context("preparing select")?;
    let mut rows = stmt.query(params).context("querying houses")?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut row_no = 0usize;
    while let Some(row) = rows.next().context("reading house rows")? {
        let record = row_to_record(row).and_then(|r| {
            r.validate()?;
            Ok(r)
        });
        match record {
            Ok(r) => records.push(r),
            Err(e) => {
                log::warn!("houses row {row_no}: {e:#}");
                skipped += 1;
            }
        }
        row_no += 1;
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed house rows");
    }
    Ok(records)
}

/// SQL fragment and bound value for one filter clause.
fn clause_sql(clause: &Clause) -> (&'static str, i64) {
    match *clause {
        Clause::MaxPrice(v) => (r#""SalePrice" <= ?"#, v as i64),
        Clause::MinYear(v) => (r#""Year Built" >= ?"#, v as i64),
        Clause::MinQuality(v) => (r#""Overall Qual" >= ?"#, v as i64),
        Clause::Bedrooms(v) => (r#""Bedroom AbvGr" = ?"#, v as i64),
        Clause::Garage(v) => (r#""Garage Cars" = ?"#, v as i64),
        Clause::MinLotArea(v) => (r#""Lot Area" >= ?"#, v as i64),
    }
}

/// Build the parameterized selection equivalent to the in-memory filter.
/// Only active clauses appear in the `WHERE` list.
pub fn filter_query(criteria: &FilterCriteria) -> (String, Vec<i64>) {
    let (fragments, values): (Vec<&str>, Vec<i64>) =
        criteria.active_clauses().iter().map(clause_sql).unzip();
    let sql = format!(
        "{SELECT_COLUMNS} WHERE {} ORDER BY rowid",
        fragments.join(" AND ")
    );
    (sql, values)
}

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        create_tables(&conn).context("creating houses table")?;
        log::info!("Database initialized at {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory database")?;
        create_tables(&conn).context("creating houses table")?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn load_all(&self) -> Result<Vec<HouseRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY rowid");
        read_records(&self.conn, &sql, ())
    }

    /// Run the filter inside SQLite; same result and order as
    /// [`super::filter::filter`] over [`Self::load_all`].
    pub fn select_filtered(&self, criteria: &FilterCriteria) -> Result<Vec<HouseRecord>> {
        let (sql, values) = filter_query(criteria);
        log::debug!("filter query: {sql} {values:?}");
        read_records(&self.conn, &sql, params_from_iter(values.iter()))
            .context("running filter query")
    }

    pub fn insert(&self, record: &HouseRecord) -> Result<()> {
        self.conn
            .execute(
                r#"INSERT INTO houses ("SalePrice", "Gr Liv Area", "Bedroom AbvGr", "Year Built",
                    "Garage Cars", "Lot Area", "Overall Qual", "Neighborhood", "Latitude", "Longitude")
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
                params![
                    record.sale_price,
                    record.living_area,
                    record.bedrooms_above_grade,
                    record.year_built,
                    record.garage_capacity,
                    record.lot_area,
                    record.overall_quality,
                    record.neighborhood,
                    record.latitude,
                    record.longitude,
                ],
            )
            .context("inserting house")?;
        Ok(())
    }

    /// Replace the whole table with `records` in one transaction.
    pub fn replace_all(&mut self, records: &[HouseRecord]) -> Result<()> {
        let tx = self.conn.transaction().context("starting transaction")?;
        tx.execute("DELETE FROM houses", [])
            .context("clearing houses")?;
        {
            let mut stmt = tx
                .prepare(
                    r#"INSERT INTO houses ("SalePrice", "Gr Liv Area", "Bedroom AbvGr", "Year Built",
                        "Garage Cars", "Lot Area", "Overall Qual", "Neighborhood", "Latitude", "Longitude")
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
                )
                .context("preparing insert")?;
            for r in records {
                stmt.execute(params![
                    r.sale_price,
                    r.living_area,
                    r.bedrooms_above_grade,
                    r.year_built,
                    r.garage_capacity,
                    r.lot_area,
                    r.overall_quality,
                    r.neighborhood,
                    r.latitude,
                    r.longitude,
                ])
                .context("inserting house")?;
            }
        }
        tx.commit().context("committing import")?;
        log::info!("Imported {} records into {}", records.len(), self.path.display());
        Ok(())
    }
}

impl DatasetStore for SqliteStore {
    fn load(&mut self) -> HouseResult<HouseDataset> {
        self.load_all()
            .map(HouseDataset::from_records)
            .map_err(|e| HouseError::dataset_unavailable(&self.path, &e))
    }

    fn append(&mut self, record: &HouseRecord) -> HouseResult<()> {
        self.insert(record).map_err(|e| HouseError::storage(&e))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
