use serde_json::{Map, Value};
use std::io;

/// Fields that hold row data worth exporting as a CSV table, in preference order.
const ROW_FIELDS: [&str; 3] = ["schedule", "yearly", "steps"];

/// Write output as CSV to stdout.
///
/// Calculators that produce rows (schedules, yearly breakdowns, division
/// steps) export those rows; everything else becomes field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match row_field(body) {
                Some(rows) => write_array_csv(&mut wtr, rows),
                None => write_pairs(&mut wtr, body),
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn row_field(map: &Map<String, Value>) -> Option<&[Value]> {
    ROW_FIELDS.iter().find_map(|k| match map.get(*k) {
        Some(Value::Array(arr)) if !arr.is_empty() => Some(arr.as_slice()),
        _ => None,
    })
}

fn write_pairs<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        if let Value::Object(inner) = val {
            for (k, v) in inner {
                let _ = wtr.write_record([format!("{key}.{k}"), format_csv_value(v)]);
            }
        } else {
            let _ = wtr.write_record([key.clone(), format_csv_value(val)]);
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
