use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{
    HouseRecord, COL_BEDROOMS, COL_GARAGE, COL_LATITUDE, COL_LIVING_AREA, COL_LONGITUDE,
    COL_LOT_AREA, COL_NEIGHBORHOOD, COL_QUALITY, COL_SALE_PRICE, COL_YEAR_BUILT,
};

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Write records as CSV: one header row with the dataset column names, then
/// one row per record.
pub fn write_csv<W: Write>(records: &[HouseRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record).context("serializing CSV row")?;
    }
    if records.is_empty() {
        // serde only emits the header alongside the first row
        wtr.write_record(super::model::ALL_COLUMNS)
            .context("writing CSV header")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Parse CSV produced by [`write_csv`] (or any file with the same columns).
/// Fails on the first malformed row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<HouseRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<HouseRecord>()
        .enumerate()
        .map(|(row_no, row)| row.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

pub fn export_csv(records: &[HouseRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(records, file)?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Arrow schema matching the dataset columns.
pub fn house_schema() -> Schema {
    Schema::new(vec![
        Field::new(COL_SALE_PRICE, DataType::Int64, false),
        Field::new(COL_LIVING_AREA, DataType::Int64, false),
        Field::new(COL_BEDROOMS, DataType::Int64, false),
        Field::new(COL_YEAR_BUILT, DataType::Int64, false),
        Field::new(COL_GARAGE, DataType::Int64, false),
        Field::new(COL_LOT_AREA, DataType::Int64, false),
        Field::new(COL_QUALITY, DataType::Int64, false),
        Field::new(COL_NEIGHBORHOOD, DataType::Utf8, false),
        Field::new(COL_LATITUDE, DataType::Float64, true),
        Field::new(COL_LONGITUDE, DataType::Float64, true),
    ])
}

fn int_column<F: Fn(&HouseRecord) -> i64>(records: &[HouseRecord], f: F) -> ArrayRef {
    Arc::new(Int64Array::from(records.iter().map(f).collect::<Vec<i64>>()))
}

/// Convert records into a single Arrow record batch.
pub fn to_record_batch(records: &[HouseRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        int_column(records, |r| r.sale_price as i64),
        int_column(records, |r| r.living_area as i64),
        int_column(records, |r| r.bedrooms_above_grade as i64),
        int_column(records, |r| r.year_built as i64),
        int_column(records, |r| r.garage_capacity as i64),
        int_column(records, |r| r.lot_area as i64),
        int_column(records, |r| r.overall_quality as i64),
        Arc::new(StringArray::from(
            records
                .iter()
                .map(|r| r.neighborhood.as_str())
                .collect::<Vec<&str>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.latitude).collect::<Vec<Option<f64>>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.longitude).collect::<Vec<Option<f64>>>(),
        )),
    ];
    RecordBatch::try_new(Arc::new(house_schema()), columns).context("building record batch")
}

/// Write records to a Parquet file with the dataset column names.
pub fn export_parquet(records: &[HouseRecord], path: &Path) -> Result<()> {
    let batch = to_record_batch(records)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn five_distinct() -> Vec<HouseRecord> {
        let mut out = vec![
            record(129_500, 1961, 5, "NAmes"),
            record(215_000, 2005, 7, "CollgCr"),
            record(189_900, 1997, 6, "Gilbert"),
            record(380_000, 2009, 9, "NridgHt"),
            record(105_000, 1923, 4, "OldTown"),
        ];
        out[3].latitude = Some(42.0601);
        out[3].longitude = Some(-93.6538);
        out
    }

    #[test]
    fn csv_round_trip_preserves_records() {
        let records = five_distinct();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let parsed = read_csv(buf.as_slice()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn csv_header_keeps_spaced_names() {
        let mut buf = Vec::new();
        write_csv(&five_distinct(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "SalePrice,Gr Liv Area,Bedroom AbvGr,Year Built,Garage Cars,Lot Area,Overall Qual,Neighborhood,Latitude,Longitude"
        );
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("SalePrice,"));
        assert!(read_csv(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn record_batch_has_one_row_per_record() {
        let batch = to_record_batch(&five_distinct()).unwrap();
        assert_eq!(batch.num_rows(), 5);
        assert_eq!(batch.num_columns(), 10);
        assert_eq!(batch.schema().field(1).name(), "Gr Liv Area");
    }
}
