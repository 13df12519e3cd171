use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt32Type,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Dataset, JobRecord, RECORD_FIELDS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a job-postings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "date": ..., "title": ..., "locations": ..., ... }, ...]`
/// * `.csv`     – header row with the same field names
/// * `.parquet` – one column per field (recommended for large exports)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        _ => Err(LoadError::UnsupportedExtension { ext: ext.clone() }.into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let dataset = Dataset::from_records(records);
    log::info!(
        "Loaded {} postings from {} ({} provinces, {} titles)",
        dataset.len(),
        path.display(),
        dataset.locations.len(),
        dataset.titles.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "date": "2024-03-15",
///     "title": "Data Analyst",
///     "locations": "Quebec",
///     "salary": 85000,
///     "skills": "Python, SQL",
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<JobRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(LoadError::NotAnObject { row: i })?;
        let cells: BTreeMap<String, CellValue> = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();
        records.push(JobRecord::from_cells(i, &cells)?);
    }
    Ok(records)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        // Lists are re-joined so they read like any other multi-valued cell.
        JsonValue::Array(items) => CellValue::String(
            items
                .iter()
                .filter_map(|item| json_to_cell(item).as_text())
                .collect::<Vec<_>>()
                .join(super::model::MULTI_VALUE_SEPARATOR),
        ),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with field names, one posting per row.
/// Multi-valued cells are quoted: `"Python, SQL"`.
fn load_csv(path: &Path) -> Result<Vec<JobRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), csv_cell(name, value)))
            .collect();
        records.push(JobRecord::from_cells(row_no, &cells)?);
    }
    Ok(records)
}

/// Columns whose CSV text may hold a number (epoch-millisecond dates included).
const NUMERIC_FIELDS: [&str; 3] = ["date", "salary", "num_jobs"];

/// Text columns are kept verbatim so `007` or `1e3` survive untouched.
fn csv_cell(field: &str, s: &str) -> CellValue {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        CellValue::Null
    } else if NUMERIC_FIELDS.contains(&field) {
        guess_cell_type(s)
    } else {
        CellValue::String(s.to_string())
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of job postings.
///
/// Column names match the JSON fields. `date` may be a Date32/Date64,
/// a timestamp of any unit, or an ISO string. Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<JobRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = readable_columns(normalize_columns(&batch)?);

        for row in 0..batch.num_rows() {
            let cells: BTreeMap<String, CellValue> = columns
                .iter()
                .map(|(name, col)| Ok((name.clone(), extract_cell_value(name, col, row)?)))
                .collect::<Result<_, LoadError>>()?;
            records.push(JobRecord::from_cells(records.len(), &cells)?);
        }
    }
    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Pair every column with its name, casting temporal columns to Date32 so
/// the row loop only has to handle one date representation.
fn normalize_columns(batch: &RecordBatch) -> Result<Vec<(String, ArrayRef)>> {
    let schema = batch.schema();
    schema
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, col)| {
            let col = match col.data_type() {
                DataType::Timestamp(_, _) | DataType::Date64 => {
                    arrow::compute::cast(col, &DataType::Date32)
                        .with_context(|| format!("casting '{}' to a date", field.name()))?
                }
                _ => col.clone(),
            };
            Ok((field.name().clone(), col))
        })
        .collect()
}

/// Drop columns of a type the row loop cannot read, unless a posting needs
/// them. Unused extras such as pandas `category` columns then load fine.
fn readable_columns(columns: Vec<(String, ArrayRef)>) -> Vec<(String, ArrayRef)> {
    columns
        .into_iter()
        .filter(|(name, col)| {
            let keep = is_supported_type(col.data_type()) || RECORD_FIELDS.contains(&name.as_str());
            if !keep {
                log::debug!("Skipping column '{name}' of type {:?}", col.data_type());
            }
            keep
        })
        .collect()
}

fn is_supported_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
            | DataType::Date32
    )
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(name: &str, col: &ArrayRef, row: usize) -> Result<CellValue, LoadError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => match col.as_primitive::<Date32Type>().value_as_date(row) {
            Some(d) => CellValue::Date(d),
            None => CellValue::Null,
        },
        other => {
            return Err(LoadError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            })
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cell_treats_blank_and_nan_as_null() {
        assert_eq!(csv_cell("company", ""), CellValue::Null);
        assert_eq!(csv_cell("salary", "NaN"), CellValue::Null);
        assert_eq!(csv_cell("num_jobs", "42"), CellValue::Integer(42));
        assert_eq!(csv_cell("salary", "4.5"), CellValue::Float(4.5));
        assert_eq!(
            csv_cell("skills", "Python, SQL"),
            CellValue::String("Python, SQL".into())
        );
    }

    #[test]
    fn csv_text_columns_are_not_parsed_as_numbers() {
        assert_eq!(csv_cell("company", "007"), CellValue::String("007".into()));
        assert_eq!(csv_cell("link", "1e3"), CellValue::String("1e3".into()));
    }

    #[test]
    fn unsupported_types_are_kept_only_for_record_fields() {
        let extra: ArrayRef = std::sync::Arc::new(arrow::array::UInt64Array::from(vec![1u64]));
        let title: ArrayRef = std::sync::Arc::new(arrow::array::UInt64Array::from(vec![2u64]));
        let kept = readable_columns(vec![("row_id".into(), extra), ("title".into(), title)]);
        let names: Vec<&str> = kept.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn json_lists_become_multi_valued_cells() {
        let val: JsonValue = serde_json::json!(["French", "English", null]);
        assert_eq!(
            json_to_cell(&val),
            CellValue::String("French, English".into())
        );
    }
}
