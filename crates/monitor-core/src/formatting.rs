/// Text shown for an undefined statistic.
pub const UNDEFINED: &str = "NaN";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use monitor_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Handle the sign separately so the thousands grouping works on the
    // absolute value.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Add a tiny epsilon (half ULP at the target precision) before rounding
    // to avoid IEEE 754 binary-representation issues at exact midpoints.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    // `{:.0}` keeps every digit of integers beyond the `u64` range.
    let integer_part = format!("{:.0}", rounded.trunc());
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part);

    let result = if decimals == 0 {
        grouped
    } else {
        // `frac_str` starts with "0.", e.g. "0.50". Strip the leading "0".
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    // "-0.00" reads as noise in a report.
    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a mean or standard deviation for the text report.
///
/// Undefined (`NaN`) statistics render as [`UNDEFINED`] rather than a number.
///
/// # Examples
///
/// ```
/// use monitor_core::formatting::format_statistic;
///
/// assert_eq!(format_statistic(7.0710678, 3), "7.071");
/// assert_eq!(format_statistic(f64::NAN, 2), "NaN");
/// ```
pub fn format_statistic(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        UNDEFINED.to_string()
    } else {
        format_number(value, decimals)
    }
}

/// Machine-friendly rendering: no grouping, empty for undefined values.
pub fn format_plain(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:.prec$}", value, prec = decimals as usize)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
