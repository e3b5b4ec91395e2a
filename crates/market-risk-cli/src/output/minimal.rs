use serde_json::Value;

/// Print just the key answer from the output.
///
/// Report rows collapse to one `ASSET ALERT` line each; otherwise the first
/// well-known scalar field wins, falling back to the first field present.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for line in minimal_lines(result_obj) {
        println!("{}", line);
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    let priority_keys = ["portfolio_loss", "hedged_var"];

    let Value::Object(map) = result else {
        return vec![format_minimal(result)];
    };

    if let Some(Value::Array(rows)) = map.get("rows") {
        let alerts: Vec<String> = rows
            .iter()
            .filter_map(|r| {
                let asset = r.get("asset")?;
                let alert = r.get("alert")?;
                Some(format!("{} {}", format_minimal(asset), format_minimal(alert)))
            })
            .collect();
        if !alerts.is_empty() {
            return alerts;
        }
    }

    // VaR maps: one line per asset with its historical VaR
    if let Some(Value::Object(var)) = map.get("historical_var") {
        return var
            .iter()
            .map(|(asset, v)| format!("{} {}", asset, format_minimal(v)))
            .collect();
    }

    for key in priority_keys {
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return vec![format_minimal(val)];
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => vec![format!("{}: {}", key, format_minimal(val))],
        None => Vec::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "undefined".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
