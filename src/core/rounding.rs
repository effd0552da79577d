//! Money rounding shared by balance derivation and settlement planning.
//!
//! Shares are accumulated at full `Decimal` precision and rounded once, at
//! the end. Rounding every balance independently can leave the total a few
//! minor units away from zero (100 split three ways rounds to
//! `66.67 - 33.33 - 33.33 = 0.01`), so [`quantize_zero_sum`] hands the
//! difference back one minor unit at a time to the entries that rounding
//! moved furthest.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Default number of fractional digits (cents).
pub const DEFAULT_SCALE: u32 = 2;

/// Most fractional digits a `Decimal` can carry.
pub const MAX_SCALE: u32 = 28;

/// Limit `scale` to what a `Decimal` can represent.
pub fn clamp_scale(scale: u32) -> u32 {
    scale.min(MAX_SCALE)
}

/// The smallest representable amount at `scale`, e.g. `0.01` for scale 2.
/// Scales above [`MAX_SCALE`] are clamped.
pub fn minor_unit(scale: u32) -> Decimal {
    Decimal::new(1, clamp_scale(scale))
}

/// Round half away from zero to exactly `scale` fractional digits, so
/// `45` becomes `45.00` at scale 2.
pub fn round_money(amount: Decimal, scale: u32) -> Decimal {
    let scale = clamp_scale(scale);
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Round every value to `scale` while keeping the rounded total equal to the
/// rounded total of the inputs.
///
/// Output order matches input order. When the independently rounded values
/// overshoot, the entries that were rounded up the most give back one minor
/// unit each; when they undershoot, the entries rounded down the most receive
/// one. Ties go to the earlier entry.
pub fn quantize_zero_sum(raw: &[Decimal], scale: u32) -> Vec<Decimal> {
    let mut rounded: Vec<Decimal> = raw.iter().map(|v| round_money(*v, scale)).collect();
    if rounded.is_empty() {
        return rounded;
    }

    let unit = minor_unit(scale);
    let target = round_money(raw.iter().copied().sum(), scale);
    let residual = target - rounded.iter().copied().sum::<Decimal>();
    let steps = (residual / unit).round().to_i64().unwrap_or(0);
    if steps == 0 {
        return rounded;
    }

    // diff > 0: rounded down, diff < 0: rounded up
    let mut order: Vec<usize> = (0..raw.len()).collect();
    if steps > 0 {
        order.sort_by(|&a, &b| (raw[b] - rounded[b]).cmp(&(raw[a] - rounded[a])));
    } else {
        order.sort_by(|&a, &b| (raw[a] - rounded[a]).cmp(&(raw[b] - rounded[b])));
    }

    let adjustment = if steps > 0 { unit } else { -unit };
    for idx in order.into_iter().cycle().take(steps.unsigned_abs() as usize) {
        rounded[idx] += adjustment;
    }
    rounded
}
