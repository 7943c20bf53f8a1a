// src/viz/export.rs
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::Writer;
use rfd::FileDialog;
use serde::Serialize;
use serde_json::Value;

// Flattens any homogeneous record collection into header + data rows.
// Header order is the first record's key insertion order; later records are
// projected onto it, with absent keys as empty cells so every row has the
// same width.
pub fn csv_table<T: Serialize>(records: &[T]) -> Result<Vec<Vec<String>>> {
    let first = match records.first() {
        Some(first) => first,
        None => return Ok(Vec::new()),
    };

    let headers: Vec<String> = match serde_json::to_value(first)? {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => return Err(anyhow!("CSV export requires flat record objects")),
    };

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(headers.clone());

    for record in records {
        let value = serde_json::to_value(record)?;
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("CSV export requires flat record objects"))?;
        rows.push(
            headers
                .iter()
                .map(|key| cell_text(object.get(key)))
                .collect(),
        );
    }

    Ok(rows)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        // Nested values should not appear in export rows; keep them readable
        // rather than failing the whole download.
        Some(other) => other.to_string(),
    }
}

pub fn write_csv<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    let rows = csv_table(records)?;
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

// "Export CSV" button handler: pick a destination, then write. Returns the
// chosen path, or None when the dialog was dismissed.
pub fn export_with_dialog<T: Serialize>(records: &[T], suggested_name: &str) -> Result<Option<std::path::PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }
    let picked = FileDialog::new()
        .add_filter("CSV files", &["csv"])
        .set_file_name(suggested_name)
        .set_title("Export CSV")
        .save_file();

    match picked {
        Some(path) => {
            write_csv(records, &path)?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TimeseriesPoint;

    #[test]
    fn header_plus_one_row_per_record() {
        let records = vec![
            TimeseriesPoint {
                date: "2024-01-31".into(),
                adult_share: 58.3,
                total_activity: 120_000,
            },
            TimeseriesPoint {
                date: "2024-02-29".into(),
                adult_share: 59.1,
                total_activity: 131_500,
            },
        ];
        let rows = csv_table(&records).unwrap();
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(rows[0], vec!["date", "adultShare", "totalActivity"]);
        for row in &rows {
            assert_eq!(row.len(), rows[0].len());
        }
        assert_eq!(rows[1], vec!["2024-01-31", "58.3", "120000"]);
    }

    #[test]
    fn missing_fields_render_empty_with_constant_width() {
        let records = vec![
            serde_json::json!({"state": "Kerala", "growthPct": 4.2}),
            serde_json::json!({"state": "Punjab"}),
        ];
        let rows = csv_table(&records).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["Punjab".to_string(), String::new()]);
    }

    #[test]
    fn numbers_round_trip_as_decimal_text() {
        let records = vec![serde_json::json!({"value": 12.5, "count": 7})];
        let rows = csv_table(&records).unwrap();
        assert_eq!(rows[1], vec!["12.5", "7"]);
    }

    #[test]
    fn empty_collection_yields_no_rows() {
        let records: Vec<TimeseriesPoint> = Vec::new();
        assert!(csv_table(&records).unwrap().is_empty());
    }

    #[test]
    fn written_file_round_trips() {
        let records = vec![
            serde_json::json!({"state": "Kerala", "note": "has, comma"}),
            serde_json::json!({"state": "Punjab", "note": "plain"}),
        ];
        let dir = std::env::temp_dir();
        let path = dir.join("drishti-export-test.csv");
        write_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][1], "has, comma");
        std::fs::remove_file(&path).ok();
    }
}
