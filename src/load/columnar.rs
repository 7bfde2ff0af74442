use arrow::{
    array::{Array, StringArray},
    compute::cast,
    datatypes::DataType,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{fs::File, path::Path};

use super::{LoadError, RawTable};

/// Read every row group of a Parquet panel.
///
/// Columns of any primitive type are cast to Utf8 so the shared row parser
/// sees the same text cells it gets from spreadsheets and CSV.
pub fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::unreadable(path, e))?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if headers.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let reader = builder.build().map_err(|e| LoadError::unreadable(path, e))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| LoadError::unreadable(path, e))?;
        let base = rows.len();
        rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(headers.len())));

        for col_idx in 0..batch.num_columns() {
            let as_text =
                cast(batch.column(col_idx), &DataType::Utf8).map_err(|e| LoadError::unreadable(path, e))?;
            let strings = as_text
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| LoadError::unreadable(path, "column could not be cast to text"))?;
            for j in 0..strings.len() {
                let cell = if strings.is_null(j) {
                    String::new()
                } else {
                    strings.value(j).to_string()
                };
                rows[base + j].push(cell);
            }
        }
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Month, MonthLabel};
    use crate::load::load_dataset;
    use anyhow::Result;
    use arrow::array::{ArrayRef, Float64Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn reads_typed_columns_as_records() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("panel.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("IMPUESTO", DataType::Utf8, false),
            Field::new("AÑO", DataType::Int64, false),
            Field::new("MES", DataType::Utf8, false),
            Field::new("ADUANA", DataType::Utf8, false),
            Field::new("RECAUDACIÓN", DataType::Float64, true),
            Field::new("LATITUD", DataType::Float64, false),
            Field::new("LONGITUD", DataType::Float64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["IVA", "IEPS"])),
            Arc::new(Int64Array::from(vec![2024, 2025])),
            Arc::new(StringArray::from(vec!["Enero", "Julio"])),
            Arc::new(StringArray::from(vec!["Veracruz", "Manzanillo"])),
            Arc::new(Float64Array::from(vec![Some(10.5), None])),
            Arc::new(Float64Array::from(vec![19.2, 19.05])),
            Arc::new(Float64Array::from(vec![-96.1, -104.3])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns)?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let raw = read_parquet(&path)?;
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1][4], "");

        let ds = load_dataset(&path)?;
        assert_eq!(ds.years(), [2024, 2025]);
        assert_eq!(ds.records()[1].month, MonthLabel::Known(Month::Julio));
        assert_eq!(ds.records()[1].collection_amount, 0.0);
        Ok(())
    }
}
