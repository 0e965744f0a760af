//! Number formatting helpers for operator-facing output.

/// Formats `value` with `precision` significant digits, switching to
/// exponent notation for very small or large magnitudes (printf `%g`).
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };
    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

/// Formats a value and its standard uncertainty in `value(uncertainty)`
/// notation, keeping `digits` significant digits of the uncertainty.
pub fn format_concise(value: f64, uncertainty: f64, digits: usize) -> String {
    if uncertainty == 0.0 || !uncertainty.is_finite() || !value.is_finite() {
        return format_general(value, 12);
    }
    let magnitude = value.abs().max(uncertainty);
    let exponent = if magnitude < 1e-3 || magnitude >= 1e6 {
        magnitude.log10().floor() as i32
    } else {
        0
    };
    let scale = 10f64.powi(-exponent);
    let (x, u) = (value * scale, uncertainty * scale);
    let mut decimals = digits as i32 - 1 - u.log10().floor() as i32;
    // Rounding up can carry into an extra uncertainty digit (9.96 -> 10.0).
    if (u * 10f64.powi(decimals)).round() >= 10f64.powi(digits as i32) {
        decimals -= 1;
    }
    let body = if decimals > 0 {
        let u_digits = (u * 10f64.powi(decimals)).round();
        format!("{:.*}({:.0})", decimals as usize, x, u_digits)
    } else {
        let step = 10f64.powi(-decimals);
        format!("{:.0}({:.0})", (x / step).round() * step, (u / step).round() * step)
    };
    if exponent == 0 {
        body
    } else {
        format!("{body}e{exponent}")
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
