//! Fixed-point number display.

/// Formats `value` with `decimals` digits, rounding halves away from zero
/// (`2.5` → `3`, `12.25` → `12.3`) the way `Number.prototype.toFixed` does.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.decimals$}")
}
