use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{chart, format_return};

/// Summary table columns: (row field, header).
const SUMMARY_COLUMNS: [(&str, &str); 5] = [
    ("historical_var", "Historical VaR"),
    ("parametric_var", "Parametric VaR"),
    ("monte_carlo_var", "Monte Carlo VaR"),
    ("cvar", "CVaR"),
    ("alert", "Risk Alert"),
];

/// Metric maps of the `var` command, in column order.
const METRIC_COLUMNS: [(&str, &str); 4] = [
    ("historical_var", "Historical VaR"),
    ("parametric_var", "Parametric VaR"),
    ("monte_carlo_var", "Monte Carlo VaR"),
    ("cvar", "CVaR"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(res) = result else {
        println!("{}", result);
        return;
    };

    match res.get("rows") {
        Some(Value::Array(rows)) if is_summary(rows) => {
            print_summary_table(rows);
            if let Some(Value::Object(stress)) = res.get("stress") {
                print_stress_line(stress);
            }
            if let Some(Value::Object(hedge)) = res.get("hedge") {
                print_hedge_line(hedge);
            }
            if let Some(c) = res.get("chart") {
                println!();
                chart::print_chart(c);
            }
            return;
        }
        Some(Value::Array(rows)) => {
            print_generated_table(&generated_headers(res), rows);
            return;
        }
        _ => {}
    }

    if matches!(res.get("historical_var"), Some(Value::Object(_))) {
        print_metric_table(res);
    } else if let Some(Value::Array(positions)) = res.get("positions") {
        print_array_table(positions);
        print_stress_line(res);
    } else {
        print_flat_object(res);
    }
}

fn is_summary(rows: &[Value]) -> bool {
    rows.first()
        .and_then(|r| r.as_object())
        .map(|r| r.contains_key("historical_var") && r.contains_key("alert"))
        .unwrap_or(false)
}

/// Generated returns: `date` first, then assets in configured order.
fn generated_headers(res: &Map<String, Value>) -> Vec<String> {
    let mut headers = vec!["date".to_string()];
    if let Some(Value::Array(assets)) = res.get("assets") {
        headers.extend(assets.iter().map(format_value));
    }
    headers
}

fn print_generated_table(headers: &[String], rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| match (h.as_str(), map.get(h.as_str())) {
                    ("date", Some(v)) => format_value(v),
                    (_, Some(v)) => format_return(v),
                    (_, None) => String::new(),
                })
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_summary_table(rows: &[Value]) {
    let mut builder = Builder::default();
    let mut header = vec!["Asset".to_string()];
    header.extend(SUMMARY_COLUMNS.iter().map(|(_, h)| h.to_string()));
    builder.push_record(header);

    for row in rows {
        if let Value::Object(map) = row {
            let mut record = vec![map.get("asset").map(format_value).unwrap_or_default()];
            for (field, _) in SUMMARY_COLUMNS {
                let cell = match field {
                    "alert" => map.get(field).map(format_value).unwrap_or_default(),
                    _ => map.get(field).map(format_return).unwrap_or_default(),
                };
                record.push(cell);
            }
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

/// Pivot `{metric: {asset: value}}` into asset rows.
fn print_metric_table(res: &Map<String, Value>) {
    let assets: Vec<String> = match res.get("historical_var") {
        Some(Value::Object(m)) => m.keys().cloned().collect(),
        _ => return,
    };

    let mut builder = Builder::default();
    let mut header = vec!["Asset".to_string()];
    header.extend(METRIC_COLUMNS.iter().map(|(_, h)| h.to_string()));
    builder.push_record(header);

    for asset in &assets {
        let mut record = vec![asset.clone()];
        for (field, _) in METRIC_COLUMNS {
            let cell = res
                .get(field)
                .and_then(|m| m.get(asset.as_str()))
                .map(format_return)
                .unwrap_or_default();
            record.push(cell);
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
    if let Some(c) = res.get("confidence_level") {
        println!("\nConfidence level: {}", format_value(c));
    }
}

fn print_stress_line(stress: &Map<String, Value>) {
    let loss = stress
        .get("portfolio_loss")
        .map(format_value)
        .unwrap_or_default();
    let name = stress
        .get("scenario_name")
        .map(format_value)
        .unwrap_or_default();
    println!("\nPortfolio stress loss ({}): {}", name, loss.bold());
}

fn print_hedge_line(hedge: &Map<String, Value>) {
    let get = |k: &str| hedge.get(k).map(format_return).unwrap_or_default();
    println!(
        "Hedged VaR for {} after {} hedge cost: {} (unhedged {})",
        hedge.get("asset").map(format_value).unwrap_or_default(),
        get("hedge_cost"),
        get("hedged_var").bold(),
        get("unhedged_var"),
    );
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
