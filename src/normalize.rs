//! Linear rescaling helpers used by the daily scoring variants.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Linearly maps `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The input range may be given in either orientation: passing the bounds
/// swapped flips the mapping, which is how `negnorm` produces a descending scale.
///
/// # Arguments
/// * `value` - Raw value to rescale.
/// * `in_max` - Value that maps onto `out_max`.
/// * `in_min` - Value that maps onto `out_min`.
/// * `out_min` - Lower end of the target range.
/// * `out_max` - Upper end of the target range.
///
/// # Returns
/// * `f64` - The rescaled value, or `out_min` when `in_max == in_min`.
pub fn normalize(value: f64, in_max: f64, in_min: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    (value - in_min) / span * (out_max - out_min) + out_min
}

/// Rescales into the positive half of the score scale, `[50, 100]`.
pub fn posnorm(value: f64, range_min: f64, range_max: f64) -> f64 {
    if range_max == range_min {
        return 75.0;
    }
    normalize(value, range_max, range_min, 50.0, 100.0)
}

/// Rescales into the negative half of the score scale, `[0, 50]`.
///
/// `range_max` lands on 0 and `range_min` on 50, so a larger raw value
/// produces a lower score.
pub fn negnorm(value: f64, range_max: f64, range_min: f64) -> f64 {
    if range_max == range_min {
        return 25.0;
    }
    normalize(value, range_min, range_max, 0.0, 50.0)
}

/// Rescales a neutral-dominant value between `target_bound` and `neutral_midpoint`.
///
/// `range_max` lands on the midpoint and `range_min` on the target bound, so the
/// score leaves the midpoint only as far as the non-neutral imbalance pushes it.
/// The result always lies in `[min(target_bound, neutral_midpoint), max(..)]` for
/// values inside the input range.
///
/// # Arguments
/// * `value` - Raw value, expected in `[range_min, range_max]`.
/// * `range_min` - Input value that maps onto `target_bound`.
/// * `range_max` - Input value that maps onto `neutral_midpoint`.
/// * `target_bound` - Skew target (65 leans positive, 35 leans negative).
/// * `neutral_midpoint` - Score of a fully neutral day.
pub fn neunorm(
    value: f64,
    range_min: f64,
    range_max: f64,
    target_bound: f64,
    neutral_midpoint: f64,
) -> f64 {
    if range_max == range_min {
        return (target_bound + neutral_midpoint) / 2.0;
    }
    normalize(value, range_max, range_min, target_bound, neutral_midpoint)
}

/// Rounds half-to-even at the given number of decimal places.
///
/// Rounding works on the exact value of the double, so a literal such as
/// `0.35` (stored as `0.34999...`) rounds down to `0.3` rather than being
/// treated as a tie. Non-finite values are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .and_then(|d| {
            d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven)
                .to_f64()
        })
        .unwrap_or(value)
}
