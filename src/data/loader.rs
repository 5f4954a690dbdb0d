use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{
    HouseDataset, HouseRecord, COL_BEDROOMS, COL_GARAGE, COL_LATITUDE, COL_LIVING_AREA,
    COL_LONGITUDE, COL_LOT_AREA, COL_NEIGHBORHOOD, COL_QUALITY, COL_SALE_PRICE, COL_YEAR_BUILT,
    REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Flat-file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "parquet" | "pq" => Some(FileFormat::Parquet),
            _ => None,
        }
    }
}

/// Load a housing dataset from a flat file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required column names
/// * `.parquet` – same column names, integer / float / string columns
///
/// Rows that fail to parse or violate the record invariants are skipped with
/// a warning; a missing file or missing required column fails the load.
pub fn load_file(path: &Path) -> Result<HouseDataset> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Csv) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        Some(FileFormat::Parquet) => load_parquet(path),
        None => bail!("Unsupported file extension: {}", path.display()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a CSV stream.  Extra columns (the full Ames file has ~80) are
/// ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<HouseDataset> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in rdr.deserialize::<HouseRecord>().enumerate() {
        match result {
            Ok(record) => match record.validate() {
                Ok(()) => records.push(record),
                Err(e) => {
                    log::warn!("CSV row {row_no}: {e}");
                    skipped += 1;
                }
            },
            Err(e) => {
                log::warn!("CSV row {row_no}: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed CSV rows");
    }
    Ok(HouseDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by [`super::export::export_parquet`] or by
/// Pandas / Polars with the same column names.
fn load_parquet(path: &Path) -> Result<HouseDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for col in REQUIRED_COLUMNS {
            if batch.column_by_name(col).is_none() {
                bail!("Parquet file missing '{col}' column");
            }
        }

        for row in 0..batch.num_rows() {
            match record_at(&batch, row) {
                Ok(record) => match record.validate() {
                    Ok(()) => records.push(record),
                    Err(e) => {
                        log::warn!("Parquet row {row}: {e}");
                        skipped += 1;
                    }
                },
                Err(e) => {
                    log::warn!("Parquet row {row}: {e:#}");
                    skipped += 1;
                }
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed parquet rows");
    }
    Ok(HouseDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn record_at(batch: &RecordBatch, row: usize) -> Result<HouseRecord> {
    Ok(HouseRecord {
        sale_price: int_at(batch, COL_SALE_PRICE, row)?,
        living_area: int_at(batch, COL_LIVING_AREA, row)?,
        bedrooms_above_grade: int_at(batch, COL_BEDROOMS, row)?,
        year_built: int_at(batch, COL_YEAR_BUILT, row)?,
        garage_capacity: int_at(batch, COL_GARAGE, row)?,
        lot_area: int_at(batch, COL_LOT_AREA, row)?,
        overall_quality: int_at(batch, COL_QUALITY, row)?,
        neighborhood: string_at(batch, COL_NEIGHBORHOOD, row)?,
        latitude: float_at(batch, COL_LATITUDE, row),
        longitude: float_at(batch, COL_LONGITUDE, row),
    })
}

/// Read an integer cell and narrow it to the field type.  Float columns are
/// accepted when they hold whole numbers (Pandas upcasts ints with NaN).
fn int_at<T: TryFrom<i64>>(batch: &RecordBatch, name: &str, row: usize) -> Result<T> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("missing '{name}' column"))?;
    if col.is_null(row) {
        bail!("null value in '{name}'");
    }
    let any = col.as_any();
    let value = if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as i64
    } else if let Some(arr) = any.downcast_ref::<Float64Array>() {
        let v = arr.value(row);
        if v.fract() != 0.0 {
            bail!("'{name}' value {v} is not a whole number");
        }
        v as i64
    } else {
        bail!("'{name}' has unsupported type {:?}", col.data_type());
    };
    T::try_from(value).map_err(|_| anyhow::anyhow!("'{name}' value {value} out of range"))
}

fn string_at(batch: &RecordBatch, name: &str, row: usize) -> Result<String> {
    let col = batch
        .column_by_name(name)
        .with_context(|| format!("missing '{name}' column"))?;
    if col.is_null(row) {
        bail!("null value in '{name}'");
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<StringArray>() {
        Ok(arr.value(row).to_string())
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        Ok(arr.value(row).to_string())
    } else {
        bail!("'{name}' has unsupported type {:?}", col.data_type())
    }
}

/// Optional float cell; absent column or null cell both yield `None`.
fn float_at(batch: &RecordBatch, name: &str, row: usize) -> Option<f64> {
    let col: &Arc<dyn Array> = batch.column_by_name(name)?;
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Some(arr.value(row))
    } else {
        any.downcast_ref::<Float32Array>()
            .map(|arr| arr.value(row) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::export_parquet;
    use crate::data::model::tests::record;

    const AMES_EXCERPT: &str = "\
Order,PID,Lot Area,Neighborhood,Overall Qual,Year Built,Gr Liv Area,Bedroom AbvGr,Garage Cars,SalePrice
1,526301100,31770,NAmes,6,1960,1656,3,2,215000
2,526350040,11622,NAmes,5,1961,896,2,1,105000
3,526351010,14267,NAmes,6,1958,1329,3,NA,172000
4,526353030,11160,NAmes,7,1968,2110,3,2,244000
5,527105010,13830,Gilbert,5,1997,1629,3,2,189900
";

    #[test]
    fn csv_ignores_extra_columns_and_skips_bad_rows() {
        let ds = parse_csv(AMES_EXCERPT.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records[0].sale_price, 215_000);
        assert_eq!(ds.records[0].living_area, 1656);
        assert_eq!(ds.records[0].latitude, None);
        assert_eq!(ds.records[3].neighborhood, "Gilbert");
        assert_eq!(ds.neighborhoods.len(), 2);
    }

    #[test]
    fn csv_missing_required_column_fails() {
        let text = "SalePrice,Neighborhood\n100000,NAmes\n";
        let err = parse_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Gr Liv Area"));
    }

    #[test]
    fn csv_skips_invariant_violations() {
        let text = "\
SalePrice,Gr Liv Area,Bedroom AbvGr,Year Built,Garage Cars,Lot Area,Overall Qual,Neighborhood
0,1000,2,1990,1,5000,5,NAmes
150000,1000,2,1990,1,5000,12,NAmes
150000,1000,2,1990,1,5000,5,NAmes
";
        let ds = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("houses.parquet");
        let mut records = vec![
            record(150_000, 1990, 6, "Edwards"),
            record(250_000, 2006, 8, "Somerst"),
        ];
        records[1].latitude = Some(42.05);
        records[1].longitude = Some(-93.64);
        export_parquet(&records, &path).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records, records);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_file(Path::new("houses.xlsx")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }
}
