//! End-to-end analyzer scenarios on synthetic candle histories.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use smc_core::config::{ConfidenceModel, RiskRewardReport};
use smc_core::signal::{realized_risk_reward, target_ladder};
use smc_core::structure::{Bias, BreakKind};
use smc_core::{
    analyze, AnalysisError, AnalyzerConfig, Candle, CandleSeries, Direction, SmcAnalyzer,
    Timeframe,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Hourly candles from (open, high, low, close) tuples.
fn candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    data.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle::new(base_time() + Duration::hours(i as i64), o, h, l, c))
        .collect()
}

const FLAT: (f64, f64, f64, f64) = (1.1000, 1.1010, 1.0990, 1.1000);

fn flat_with_breakout(n: usize, last: (f64, f64, f64, f64)) -> CandleSeries {
    let mut data = vec![FLAT; n - 1];
    data.push(last);
    CandleSeries::oldest_first(candles(&data)).unwrap()
}

fn breakout_up() -> (f64, f64, f64, f64) {
    (1.1000, 1.1060, 1.1000, 1.1050)
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn flat_history_with_breakout_close_buys() {
    let series = flat_with_breakout(25, breakout_up());
    let analysis = analyze("EUR/USD", Timeframe::H1, &series, &AnalyzerConfig::default()).unwrap();

    let signal = analysis.signal.expect("breakout should produce a signal");
    assert_eq!(signal.direction, Direction::Buy);
    assert!(signal.confidence >= 75);
    assert!(signal.stop_loss < signal.entry);
    assert!(signal.targets.target1 < signal.targets.target2);
    assert!(signal.targets.target2 < signal.targets.target3);
    assert_eq!(signal.symbol, "EUR/USD");
    assert_eq!(signal.timeframe, Timeframe::H1);
    assert_eq!(signal.timestamp, base_time() + Duration::hours(24));
    assert!(signal.analysis.contains("BUY"));
}

#[test]
fn fewer_than_twenty_candles_is_an_error() {
    let series = CandleSeries::oldest_first(candles(&[FLAT; 12])).unwrap();
    let err = analyze("EUR/USD", Timeframe::H1, &series, &AnalyzerConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            required: 20,
            actual: 12
        }
    );
    assert_eq!(
        err.to_string(),
        "not enough historical data to perform analysis: need 20 candles, got 12"
    );
}

#[test]
fn exactly_twenty_candles_is_accepted() {
    let series = CandleSeries::oldest_first(candles(&[FLAT; 20])).unwrap();
    let analysis = analyze("EUR/USD", Timeframe::H1, &series, &AnalyzerConfig::default()).unwrap();
    assert!(!analysis.has_signal());
}

#[test]
fn minimum_history_atr_divides_by_full_period() {
    // 20 candles: 18 flat ranges of 0.0020 plus the breakout's 0.0060, over 20
    let series = flat_with_breakout(20, breakout_up());
    let analysis = analyze("EUR/USD", Timeframe::H1, &series, &AnalyzerConfig::default()).unwrap();
    assert!((analysis.atr - 0.0021).abs() < 1e-12);

    let signal = analysis.signal.unwrap();
    assert!(signal.order_block.is_none());
    assert!((signal.stop_loss - (1.0990 - 0.5 * 0.0021)).abs() < 1e-12);
}

#[test]
fn neutral_history_has_no_signal() {
    let series = CandleSeries::oldest_first(candles(&[FLAT; 60])).unwrap();
    let analysis = analyze("EUR/USD", Timeframe::H1, &series, &AnalyzerConfig::default()).unwrap();
    assert!(analysis.signal.is_none());
    assert_eq!(analysis.bias, Bias::Neutral);
}

#[test]
fn structure_tagged_model_scores_choch_at_75() {
    let config = AnalyzerConfig {
        confidence_model: ConfidenceModel::StructureTagged,
        ..AnalyzerConfig::default()
    };
    let series = flat_with_breakout(25, breakout_up());
    let signal = analyze("EUR/USD", Timeframe::H1, &series, &config)
        .unwrap()
        .signal
        .unwrap();
    assert_eq!(signal.structure, BreakKind::Choch);
    assert_eq!(signal.confidence, 75);
}

#[test]
fn configured_ratio_is_reported_by_default() {
    let config = AnalyzerConfig {
        risk_reward_ratio: 3.0,
        ..AnalyzerConfig::default()
    };
    let series = flat_with_breakout(25, breakout_up());
    let signal = analyze("EUR/USD", Timeframe::H1, &series, &config)
        .unwrap()
        .signal
        .unwrap();
    assert_eq!(signal.risk_reward_ratio, Some(3.0));
    let risk = signal.entry - signal.stop_loss;
    assert!((signal.targets.target1 - (signal.entry + 3.0 * risk)).abs() < 1e-9);
}

#[test]
fn realized_ratio_matches_configured_one() {
    let config = AnalyzerConfig {
        risk_reward_report: RiskRewardReport::Realized,
        ..AnalyzerConfig::default()
    };
    let series = flat_with_breakout(25, breakout_up());
    let signal = analyze("EUR/USD", Timeframe::H1, &series, &config)
        .unwrap()
        .signal
        .unwrap();
    let rr = signal.risk_reward_ratio.unwrap();
    assert!((rr - 2.0).abs() < 1e-9);
}

#[test]
fn emitted_levels_reproduce_target1() {
    let series = flat_with_breakout(25, breakout_up());
    let config = AnalyzerConfig::default();
    let signal = analyze("EUR/USD", Timeframe::H1, &series, &config)
        .unwrap()
        .signal
        .unwrap();

    let rr = realized_risk_reward(signal.entry, signal.stop_loss, signal.targets.target1).unwrap();
    let ladder = target_ladder(signal.entry, signal.stop_loss, rr, signal.direction);
    assert!((ladder.target1 - signal.targets.target1).abs() < 1e-9);
}

#[test]
fn newest_first_input_gives_same_signal() {
    let mut data = vec![FLAT; 24];
    data.push(breakout_up());
    let oldest_first = CandleSeries::oldest_first(candles(&data)).unwrap();

    let mut reversed = candles(&data);
    reversed.reverse();
    let newest_first = CandleSeries::newest_first(reversed).unwrap();

    let config = AnalyzerConfig::default();
    let a = analyze("EUR/USD", Timeframe::H1, &oldest_first, &config).unwrap();
    let b = analyze("EUR/USD", Timeframe::H1, &newest_first, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn live_feed_flips_to_bearish_choch() {
    let mut analyzer = SmcAnalyzer::new(AnalyzerConfig::default()).unwrap();

    let up = flat_with_breakout(25, breakout_up());
    let first = analyzer.analyze("EUR/USD", Timeframe::H1, &up).unwrap();
    assert_eq!(first.bias, Bias::Bullish);

    let down = flat_with_breakout(25, (1.1000, 1.1000, 1.0940, 1.0950));
    let second = analyzer.analyze("EUR/USD", Timeframe::H1, &down).unwrap();
    let signal = second.signal.unwrap();
    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(signal.structure, BreakKind::Choch);
    assert_eq!(second.bias, Bias::Bearish);
}

#[test]
fn signal_ids_are_stable_across_runs() {
    let series = flat_with_breakout(25, breakout_up());
    let config = AnalyzerConfig::default();
    let a = analyze("EUR/USD", Timeframe::H1, &series, &config).unwrap().signal.unwrap();
    let b = analyze("EUR/USD", Timeframe::H1, &series, &config).unwrap().signal.unwrap();
    assert_eq!(a.id(), b.id());
}
