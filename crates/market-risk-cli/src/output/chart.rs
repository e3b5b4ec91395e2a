use colored::Colorize;
use serde_json::Value;

const BAR_WIDTH: usize = 40;

struct Bar {
    lower: f64,
    upper: f64,
    count: u64,
    smoothed: Option<f64>,
}

/// Render a return histogram as horizontal console bars, marking the bin
/// that holds the historical VaR.
pub fn print_chart(chart: &Value) {
    let Some(lines) = chart_lines(chart) else {
        return;
    };
    for (line, is_marker) in lines {
        if is_marker {
            println!("{}", line.red().bold());
        } else {
            println!("{}", line);
        }
    }
}

fn chart_lines(chart: &Value) -> Option<Vec<(String, bool)>> {
    let asset = chart.get("asset")?.as_str()?;
    let var_marker = chart.get("var_marker")?.as_f64()?;
    let marker_bin = chart.get("marker_bin")?.as_u64()? as usize;
    let bars: Vec<Bar> = chart
        .get("bins")?
        .as_array()?
        .iter()
        .filter_map(|b| {
            Some(Bar {
                lower: b.get("lower")?.as_f64()?,
                upper: b.get("upper")?.as_f64()?,
                count: b.get("count")?.as_u64()?,
                smoothed: b.get("smoothed_count").and_then(|v| v.as_f64()),
            })
        })
        .collect();

    let max_count = bars
        .iter()
        .map(|b| (b.count as f64).max(b.smoothed.unwrap_or(0.0)))
        .fold(1.0_f64, f64::max);

    let mut lines = vec![(
        format!("{} Return Distribution with Historical VaR", asset),
        false,
    )];
    for (i, bar) in bars.iter().enumerate() {
        let len = scaled(bar.count as f64, max_count);
        let mut cells = vec![' '; BAR_WIDTH + 1];
        cells[..len].fill('#');
        // Smoothed density marker
        if let Some(s) = bar.smoothed {
            cells[scaled(s, max_count)] = '*';
        }
        let cells: String = cells.into_iter().collect();
        let is_marker = i == marker_bin;
        let label = if is_marker { " <- VaR" } else { "" };
        lines.push((
            format!(
                "[{:>9.4}, {:>9.4}] {} {:>5}{}",
                bar.lower, bar.upper, cells, bar.count, label
            ),
            is_marker,
        ));
    }
    lines.push((
        format!("Historical VaR: {:.6}   (# count, * smoothed density)", var_marker),
        false,
    ));
    Some(lines)
}

/// Cell index for `value` on a `BAR_WIDTH` scale topped by `max`.
fn scaled(value: f64, max: f64) -> usize {
    let cells = (value / max * BAR_WIDTH as f64).round();
    (cells.max(0.0) as usize).min(BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart() -> Value {
        json!({
            "asset": "AAPL",
            "var_marker": -0.04,
            "marker_bin": 0,
            "bins": [
                {"lower": -0.05, "upper": -0.03, "count": 2, "frequency": 0.2},
                {"lower": -0.03, "upper": 0.0, "count": 8, "frequency": 0.8}
            ]
        })
    }

    #[test]
    fn test_chart_title_and_marker() {
        let lines = chart_lines(&chart()).unwrap();
        assert_eq!(lines[0].0, "AAPL Return Distribution with Historical VaR");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].1);
        assert!(lines[1].0.ends_with("<- VaR"));
        assert!(!lines[2].1);
    }

    #[test]
    fn test_tallest_bin_fills_bar() {
        let lines = chart_lines(&chart()).unwrap();
        assert!(lines[2].0.contains(&"#".repeat(BAR_WIDTH)));
        assert!(lines[1].0.contains(&"#".repeat(10)));
        assert!(!lines[1].0.contains(&"#".repeat(11)));
    }

    #[test]
    fn test_smoothed_density_marker() {
        let mut c = chart();
        c["bins"][0]["smoothed_count"] = json!(3.0);
        c["bins"][1]["smoothed_count"] = json!(6.0);
        let lines = chart_lines(&c).unwrap();
        // 3 / 8 * 40 = 15 cells, after the 10-cell bar
        let row = &lines[1].0;
        let bar_start = row.find('#').unwrap();
        assert_eq!(row[bar_start..].find('*'), Some(15));
        // 6 / 8 * 40 = 30 cells, inside the full bar
        let row = &lines[2].0;
        let bar_start = row.find('#').unwrap();
        assert_eq!(row[bar_start..].find('*'), Some(30));
    }

    #[test]
    fn test_scaled_is_clamped() {
        assert_eq!(scaled(8.0, 8.0), BAR_WIDTH);
        assert_eq!(scaled(0.0, 8.0), 0);
        assert_eq!(scaled(-1.0, 8.0), 0);
    }

    #[test]
    fn test_malformed_chart_is_skipped() {
        assert!(chart_lines(&json!({"asset": "AAPL"})).is_none());
    }
}
