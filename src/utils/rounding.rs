//! Rounding and ratio helpers shared by every metric.
//!
//! Two flavours of decimal rounding are kept apart:
//! - `round_to` scales, rounds ties to even, then divides back. Shares and
//!   cumulative percentages use it.
//! - `round_decimal` rounds the exact binary value of the float. `0.15` is
//!   stored just below the tie and rounds to `0.1`, where scaling first
//!   gives exactly `1.5` and then `0.2`. Headline ratios such as ROI use it.
//!
//! Every rounded figure in a report goes through here.

/// Round to the nearest integer, ties to even
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to `decimals` places, ties to even on the scaled value
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Round to `decimals` places on the exact value of `value`
///
/// Float formatting with a precision is correctly rounded (exact ties go to
/// even), so formatting and parsing back never drifts across a boundary the
/// way scaling can.
pub fn round_decimal(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Round to a whole currency amount
pub fn round_amount(value: f64) -> i64 {
    round_half_even(value) as i64
}

/// `part / total * 100`, defined as zero when `total` is zero
pub fn safe_percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}
