//! Signal composition: entry, stop, target ladder, confidence, rationale.
//!
//! Stop placement:
//! - with an order block for the bias: 0.25 ATR beyond the block's far extreme
//! - otherwise: 0.5 ATR beyond the opposing swing level
//!
//! Targets step by one risk unit: `R`, `R + 1`, `R + 2` times the risk
//! distance from entry.

use super::format::format_price;
use super::{Direction, Signal, Targets};
use crate::config::{AnalyzerConfig, ConfidenceModel, RiskRewardReport};
use crate::domain::{Candle, Timeframe};
use crate::structure::{BreakKind, FairValueGap, OrderBlock, StructureBreak};

/// Confidence ceiling of the additive model.
pub const MAX_CONFIDENCE: u8 = 95;

const BASE_CONFIDENCE: u8 = 50;
const BREAK_BONUS: u8 = 25;
const FVG_BONUS: u8 = 15;
const BOS_CONFIDENCE: u8 = 85;
const CHOCH_CONFIDENCE: u8 = 75;

const ORDER_BLOCK_ATR_BUFFER: f64 = 0.25;
const SWING_ATR_BUFFER: f64 = 0.5;

/// Everything the composer needs from one analysis pass.
#[derive(Debug, Clone)]
pub struct SignalContext<'a> {
    pub symbol: &'a str,
    pub timeframe: Timeframe,
    pub latest: &'a Candle,
    pub structure: StructureBreak,
    /// Most recent order block matching the break bias.
    pub order_block: Option<&'a OrderBlock>,
    pub fair_value_gap: Option<FairValueGap>,
    pub atr: f64,
    /// Swing low for a bullish break, swing high for a bearish one.
    pub swing_anchor: f64,
}

/// Stop-loss level for a trade in `direction`.
pub fn stop_loss(
    direction: Direction,
    order_block: Option<&OrderBlock>,
    swing_anchor: f64,
    atr: f64,
) -> f64 {
    match (direction, order_block) {
        (Direction::Buy, Some(ob)) => ob.bar_low - atr * ORDER_BLOCK_ATR_BUFFER,
        (Direction::Sell, Some(ob)) => ob.bar_high + atr * ORDER_BLOCK_ATR_BUFFER,
        (Direction::Buy, None) => swing_anchor - atr * SWING_ATR_BUFFER,
        (Direction::Sell, None) => swing_anchor + atr * SWING_ATR_BUFFER,
    }
}

/// Three targets at `ratio`, `ratio + 1` and `ratio + 2` risk units from entry.
pub fn target_ladder(entry: f64, stop: f64, ratio: f64, direction: Direction) -> Targets {
    let risk = (entry - stop).abs();
    let at = |multiple: f64| entry + direction.sign() * risk * multiple;
    Targets {
        target1: at(ratio),
        target2: at(ratio + 1.0),
        target3: at(ratio + 2.0),
    }
}

/// Reward-to-risk of `target` given `entry` and `stop`; `None` when the risk is zero.
pub fn realized_risk_reward(entry: f64, stop: f64, target: f64) -> Option<f64> {
    let risk = (entry - stop).abs();
    if risk > 0.0 {
        Some((target - entry).abs() / risk)
    } else {
        None
    }
}

/// 50 base, +25 for a break, +15 for a gap, capped at [`MAX_CONFIDENCE`].
pub fn additive_confidence(break_detected: bool, fvg_detected: bool) -> u8 {
    let mut score = BASE_CONFIDENCE;
    if break_detected {
        score += BREAK_BONUS;
    }
    if fvg_detected {
        score += FVG_BONUS;
    }
    score.min(MAX_CONFIDENCE)
}

/// Confidence of a signal built on `structure`.
///
/// Under the additive model any detected gap earns the bonus, whichever way
/// it points.
pub fn confidence(
    model: ConfidenceModel,
    structure: &StructureBreak,
    fair_value_gap: Option<&FairValueGap>,
) -> u8 {
    match model {
        ConfidenceModel::Additive => additive_confidence(true, fair_value_gap.is_some()),
        ConfidenceModel::StructureTagged => match structure.kind {
            BreakKind::Bos => BOS_CONFIDENCE,
            BreakKind::Choch => CHOCH_CONFIDENCE,
        },
    }
}

/// Build the signal for a confirmed structural break.
///
/// Returns `None` only for a neutral break bias, which the classifier never
/// produces.
pub fn compose(ctx: &SignalContext<'_>, config: &AnalyzerConfig) -> Option<Signal> {
    let direction = Direction::from_bias(ctx.structure.bias)?;
    let entry = ctx.latest.close;
    let stop = stop_loss(direction, ctx.order_block, ctx.swing_anchor, ctx.atr);
    let targets = target_ladder(entry, stop, config.risk_reward_ratio, direction);

    let risk_reward_ratio = match config.risk_reward_report {
        RiskRewardReport::Configured => Some(config.risk_reward_ratio),
        RiskRewardReport::Realized => realized_risk_reward(entry, stop, targets.target1),
    };

    let aligned_gap = ctx
        .fair_value_gap
        .filter(|g| g.kind.bias() == ctx.structure.bias);

    Some(Signal {
        symbol: ctx.symbol.to_string(),
        timeframe: ctx.timeframe,
        direction,
        entry,
        stop_loss: stop,
        targets,
        risk_reward_ratio,
        confidence: confidence(
            config.confidence_model,
            &ctx.structure,
            ctx.fair_value_gap.as_ref(),
        ),
        structure: ctx.structure.kind,
        broken_level: ctx.structure.level,
        risk_distance: (entry - stop).abs(),
        atr: ctx.atr,
        order_block: ctx.order_block.cloned(),
        fair_value_gap: aligned_gap,
        analysis: rationale(ctx, direction, stop, aligned_gap.as_ref()),
        timestamp: ctx.latest.date,
    })
}

fn rationale(
    ctx: &SignalContext<'_>,
    direction: Direction,
    stop: f64,
    gap: Option<&FairValueGap>,
) -> String {
    let (side, beyond) = match direction {
        Direction::Buy => ("above", "below"),
        Direction::Sell => ("below", "above"),
    };

    let mut text = format!(
        "A {} signal was detected: close {} broke structure {side} {}. ",
        ctx.structure.kind,
        format_price(ctx.latest.close),
        format_price(ctx.structure.level),
    );

    match ctx.order_block {
        Some(ob) => {
            let extreme = match direction {
                Direction::Buy => ob.bar_low,
                Direction::Sell => ob.bar_high,
            };
            text.push_str(&format!(
                "Stop {} placed {beyond} the order block at {}. ",
                format_price(stop),
                format_price(extreme),
            ));
        }
        None => text.push_str(&format!(
            "Stop {} placed {beyond} the swing level at {}. ",
            format_price(stop),
            format_price(ctx.swing_anchor),
        )),
    }

    if let Some(gap) = gap {
        text.push_str(&format!(
            "Fair value gap {}-{} supports the move. ",
            format_price(gap.bottom),
            format_price(gap.top),
        ));
    }

    text.push_str(&format!("Recommending a {direction} position."));
    text
}
