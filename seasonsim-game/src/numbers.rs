//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it into the score range, returning `floor` for NaN.
#[must_use]
pub fn round_f64_to_score(value: f64, floor: u16) -> u16 {
    if value.is_nan() {
        return floor;
    }
    let max = f64::from(u16::MAX);
    let clamped = value.round().clamp(f64::from(floor), max);
    cast::<f64, u16>(clamped).unwrap_or(floor)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Signed win/loss differential.
#[must_use]
pub fn record_diff(wins: u16, losses: u16) -> i32 {
    i32::from(wins) - i32::from(losses)
}

/// Map a unit draw in [0,1) to an index below `len`.
#[must_use]
pub fn draw_to_index(draw: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let scaled = (draw * usize_to_f64(len)).floor();
    cast::<f64, usize>(scaled).unwrap_or(0).min(len - 1)
}
