use chrono::NaiveDateTime;
use serde_json::Value;
use tokio_postgres::Client;

use crate::error::SimpleSqlError;
use crate::results::{ResultSet, pack};
use crate::types::RowValues;

/// Prepare and run a query on a client, packing the rows.
///
/// # Errors
/// Returns errors from preparation, execution, or value extraction.
pub async fn build_result_set(client: &Client, sql: &str) -> Result<ResultSet, SimpleSqlError> {
    let stmt = client.prepare(sql).await?;
    let rows = client.query(&stmt, &[]).await?;

    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut raw_rows = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        raw_rows.push(row_values);
    }

    Ok(pack(column_names, raw_rows))
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `SimpleSqlError` if the column cannot be retrieved.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, SimpleSqlError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        // Native JSON columns skip the envelope: arrays and objects come back as List/Map.
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(match val {
                None | Some(Value::Null) => RowValues::Null,
                Some(Value::Array(items)) => RowValues::List(items),
                Some(Value::Object(map)) => RowValues::Map(map),
                Some(other) => RowValues::Text(other.to_string()),
            })
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        _ => {
            // text, varchar, bpchar, name, and anything else readable as a string
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}
