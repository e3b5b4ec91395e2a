use serde_json::{Map, Value};
use std::io;

const SUMMARY_HEADERS: [&str; 7] = [
    "asset",
    "historical_var",
    "parametric_var",
    "monte_carlo_var",
    "cvar",
    "limit",
    "alert",
];

const METRIC_HEADERS: [&str; 4] = ["historical_var", "parametric_var", "monte_carlo_var", "cvar"];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result_csv(&mut wtr, result),
            _ => write_field_value_csv(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr, None),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) {
    match result.get("rows") {
        Some(Value::Array(rows)) => {
            let is_summary = rows
                .first()
                .and_then(|r| r.as_object())
                .map(|r| r.contains_key("alert"))
                .unwrap_or(false);
            if is_summary {
                write_array_csv(wtr, rows, Some(&SUMMARY_HEADERS[..]));
            } else {
                write_generated_csv(wtr, result, rows);
            }
        }
        _ if matches!(result.get("historical_var"), Some(Value::Object(_))) => {
            write_metrics_csv(wtr, result)
        }
        _ => match result.get("positions") {
            Some(Value::Array(positions)) => write_array_csv(wtr, positions, None),
            _ => write_field_value_csv(wtr, result),
        },
    }
}

/// Generated returns: `date` first, then assets in configured order.
fn write_generated_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
    rows: &[Value],
) {
    let mut headers = vec!["date".to_string()];
    if let Some(Value::Array(assets)) = result.get("assets") {
        headers.extend(assets.iter().map(format_csv_value));
    }
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    write_array_csv(wtr, rows, Some(headers.as_slice()));
}

fn write_metrics_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) {
    let assets: Vec<&String> = match result.get("historical_var") {
        Some(Value::Object(m)) => m.keys().collect(),
        _ => return,
    };

    let mut header = vec!["asset"];
    header.extend(METRIC_HEADERS);
    let _ = wtr.write_record(&header);

    for asset in assets {
        let mut row = vec![asset.clone()];
        for metric in METRIC_HEADERS {
            row.push(
                result
                    .get(metric)
                    .and_then(|m| m.get(asset.as_str()))
                    .map(format_csv_value)
                    .unwrap_or_default(),
            );
        }
        let _ = wtr.write_record(&row);
    }
}

fn write_field_value_csv<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value], headers: Option<&[&str]>) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = match headers {
            Some(h) => h.to_vec(),
            None => first.keys().map(|k| k.as_str()).collect(),
        };
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
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
