//! Number rendering for diagnostic lines.
//!
//! Plain values follow the C `%g` conventions so the lines read the same as
//! the reports they were extracted from. Relative errors and tolerances are
//! shown as percentages with a precision that grows as the value shrinks.

/// Significant digits used by [`general`].
const SIGNIFICANT_DIGITS: i32 = 6;

/// Render `value` the way C's `%g` does: six significant digits, trailing
/// zeros trimmed, scientific notation for very small or very large values.
///
/// ```rust
/// use simval_core::format::general;
///
/// assert_eq!(general(16745.0), "16745");
/// assert_eq!(general(8.0329), "8.0329");
/// assert_eq!(general(0.00001), "1e-05");
/// assert_eq!(general(1234567.0), "1.23457e+06");
/// ```
pub fn general(value: f64) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let (mantissa, exponent) = scientific(value, (SIGNIFICANT_DIGITS - 1) as usize);
    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        c_exponent(trim_fraction(&mantissa), exponent)
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Render a fraction as a percentage.
///
/// The precision depends on the raw fraction: below `1e-6` the value is
/// written in scientific notation, below `1e-4` with two decimals and with a
/// single decimal otherwise. Negative fractions fall into the first bucket.
///
/// ```rust
/// use simval_core::format::percent;
///
/// assert_eq!(percent(0.005), "0.5%");
/// assert_eq!(percent(0.00006), "0.01%");
/// ```
pub fn percent(fraction: f64) -> String {
    let scaled = fraction * 100.0;
    if fraction < 1e-6 {
        let (mantissa, exponent) = scientific(scaled, 2);
        format!("{}%", c_exponent(&mantissa, exponent))
    } else if fraction < 1e-4 {
        format!("{scaled:.2}%")
    } else {
        format!("{scaled:.1}%")
    }
}

/// Mantissa and exponent of `value` rounded to `decimals` fraction digits.
/// The formatter does the rounding so the exponent reflects it.
fn scientific(value: f64, decimals: usize) -> (String, i32) {
    let sci = format!("{value:.decimals$e}");
    match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci, 0),
    }
}

/// `1.5e-07`, `2.00e+00`: signed exponent with at least two digits.
fn c_exponent(mantissa: &str, exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}
