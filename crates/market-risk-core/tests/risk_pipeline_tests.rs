use chrono::NaiveDate;
use market_risk_core::hedging::put_hedge::hedge_var;
use market_risk_core::report::summary::{build_risk_report, run_snapshot};
use market_risk_core::returns::ReturnSeries;
use market_risk_core::stress::limits::{check_limits, evaluate_limit};
use market_risk_core::stress::stress_test::{stress_test, StressScenario};
use market_risk_core::var::historical::{historical_cvar, historical_var};
use market_risk_core::var::monte_carlo::monte_carlo_var;
use market_risk_core::var::parametric::parametric_var_from_moments;
use market_risk_core::{AlertStatus, AssetId, RiskConfig, RiskError, RiskMetric};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

// ===========================================================================
// Per-method properties of the risk metric calculator
// ===========================================================================

fn ten_known_returns() -> Vec<f64> {
    vec![-0.06, -0.04, -0.02, -0.01, 0.0, 0.01, 0.02, 0.03, 0.04, 0.05]
}

#[test]
fn test_historical_var_is_first_decile() {
    // alpha = 0.1, rank = 0.1 * 9 = 0.9 between -0.06 and -0.04 => -0.042
    let var = historical_var(&ten_known_returns(), 0.90).unwrap();
    assert!((var - (-0.042)).abs() < 1e-12, "var={var}");
}

#[test]
fn test_cvar_never_above_var() {
    let samples: Vec<Vec<f64>> = vec![
        ten_known_returns(),
        vec![0.03, -0.07, 0.01, -0.02, 0.0, -0.05, 0.04, 0.02, -0.01, 0.06, -0.03, 0.05],
        (0..250).map(|i| ((i * 37 % 101) as f64 - 50.0) / 1000.0).collect(),
    ];
    for returns in &samples {
        for c in [0.90, 0.95, 0.99] {
            let var = historical_var(returns, c).unwrap();
            if let Some(cvar) = historical_cvar(returns, c).unwrap() {
                assert!(cvar <= var, "c={c}: cvar={cvar} > var={var}");
            }
        }
    }
}

#[test]
fn test_parametric_var_decreases_with_volatility() {
    let low = parametric_var_from_moments(0.0005, 0.01, 0.95).unwrap();
    let high = parametric_var_from_moments(0.0005, 0.03, 0.95).unwrap();
    assert!(high < low, "high-vol VaR {high} should be below {low}");
}

#[test]
fn test_monte_carlo_var_repeatable_with_seed() {
    let returns = ten_known_returns();
    let run = || monte_carlo_var(&returns, 0.95, 1_000, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(run(), run());
}

// ===========================================================================
// Stress, limits and hedge scenarios
// ===========================================================================

#[test]
fn test_uniform_stress_equals_shock() {
    let assets: Vec<AssetId> = vec!["AAPL".into(), "MSFT".into(), "TSLA".into()];
    let weights = BTreeMap::from([
        (AssetId::from("AAPL"), dec!(0.4)),
        (AssetId::from("MSFT"), dec!(0.3)),
        (AssetId::from("TSLA"), dec!(0.3)),
    ]);
    let result = stress_test(&assets, &weights, &StressScenario::uniform(dec!(-0.20))).unwrap();
    assert_eq!(result.portfolio_loss, dec!(-0.20));
}

#[test]
fn test_limit_scenarios() {
    assert_eq!(evaluate_limit(-0.05, -0.04), AlertStatus::LimitExceeded);
    assert_eq!(evaluate_limit(-0.02, -0.04), AlertStatus::Ok);

    let var: RiskMetric = BTreeMap::from([("X".into(), -0.05), ("Y".into(), -0.02)]);
    let limits = BTreeMap::from([("X".into(), -0.04), ("Y".into(), -0.04)]);
    let statuses: Vec<AlertStatus> = check_limits(&var, &limits)
        .unwrap()
        .values()
        .map(|c| c.status)
        .collect();
    assert_eq!(statuses, vec![AlertStatus::LimitExceeded, AlertStatus::Ok]);
}

#[test]
fn test_hedge_scenario() {
    let r = hedge_var(&"TSLA".into(), -0.05, 0.02).unwrap();
    assert!((r.hedged_var - (-0.03)).abs() < 1e-12);
    assert!(r.hedged_var > -0.05);
}

// ===========================================================================
// Full pipeline
// ===========================================================================

fn hand_built_series() -> ReturnSeries {
    let dates: Vec<NaiveDate> = (1..=10)
        .map(|d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap())
        .collect();
    ReturnSeries::new(
        dates,
        vec!["AAA".into(), "BBB".into()],
        vec![
            ten_known_returns(),
            vec![0.01, -0.01, 0.02, -0.02, 0.0, 0.01, -0.01, 0.02, -0.02, 0.0],
        ],
    )
    .unwrap()
}

fn hand_built_config() -> RiskConfig {
    let mut cfg = RiskConfig::default();
    cfg.confidence_level = 0.90;
    cfg.weights = BTreeMap::from([("AAA".into(), dec!(0.5)), ("BBB".into(), dec!(0.5))]);
    cfg.risk_limits = BTreeMap::from([("AAA".into(), -0.04), ("BBB".into(), -0.04)]);
    cfg.hedge.asset = "AAA".into();
    cfg.chart.bins = 5;
    cfg
}

#[test]
fn test_report_on_hand_built_series() {
    let out = build_risk_report(&hand_built_series(), &hand_built_config()).unwrap();
    let report = &out.result;

    assert_eq!(report.observations, 10);
    let aaa = &report.rows[0];
    let bbb = &report.rows[1];
    assert_eq!(aaa.asset, AssetId::from("AAA"));
    assert!((aaa.historical_var - (-0.042)).abs() < 1e-12);
    assert_eq!(aaa.alert, AlertStatus::LimitExceeded);
    assert_eq!(aaa.cvar, Some(-0.06));
    // BBB sorted: -0.02, -0.02, -0.01, ... => rank 0.9 stays at -0.02
    assert!((bbb.historical_var - (-0.02)).abs() < 1e-12);
    assert_eq!(bbb.alert, AlertStatus::Ok);
    // Nothing lies strictly below the two tied -0.02 values
    assert_eq!(bbb.cvar, None);
    assert!(out.warnings.iter().any(|w| w.starts_with("BBB")));

    assert_eq!(report.stress.portfolio_loss, dec!(-0.20));
    assert!((report.hedge.hedged_var - (-0.022)).abs() < 1e-12);
    assert_eq!(report.chart.asset, AssetId::from("AAA"));
    assert_eq!(report.chart.bins.len(), 5);
    assert_eq!(report.chart.marker_bin, 0);
}

#[test]
fn test_missing_weight_is_configuration_error() {
    let mut cfg = hand_built_config();
    cfg.weights = BTreeMap::from([("AAA".into(), dec!(1.0))]);
    let err = build_risk_report(&hand_built_series(), &cfg).unwrap_err();
    match err {
        RiskError::MissingAsset { asset, table } => {
            assert_eq!(asset, "BBB");
            assert_eq!(table, "weights");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_snapshot_is_reproducible() {
    let a = run_snapshot(&RiskConfig::default()).unwrap();
    let b = run_snapshot(&RiskConfig::default()).unwrap();
    let json_a = serde_json::to_value(&a.result).unwrap();
    let json_b = serde_json::to_value(&b.result).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn test_report_serialises_alert_labels() {
    let out = build_risk_report(&hand_built_series(), &hand_built_config()).unwrap();
    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(value["result"]["rows"][0]["alert"], "LIMIT_EXCEEDED");
    assert_eq!(value["result"]["rows"][1]["alert"], "OK");
    assert!(value["result"]["rows"][1]["cvar"].is_null());
    assert_eq!(value["metadata"]["precision"], "ieee754_f64");
}
