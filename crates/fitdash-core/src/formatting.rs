/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use fitdash_core::formatting::format_number;
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

    // Round to the requested decimal places.
    // Add a tiny epsilon (half ULP at the target precision) before rounding
    // to avoid IEEE 754 binary-representation issues at exact midpoints.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    // Build the thousands-separated integer portion.
    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        // Format the fractional part to the exact number of decimals.
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50". Strip the leading "0".
        let decimal_digits = &frac_str[1..]; // ".50"
        format!("{}{}", grouped, decimal_digits)
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an optional metric cell, rendering `None` as a dash.
///
/// Sparse rows are the norm in a hand-kept log, so most tables have
/// holes and every column needs a consistent placeholder.
///
/// # Examples
///
/// ```
/// use fitdash_core::formatting::format_opt;
///
/// assert_eq!(format_opt(Some(185.2), 1), "185.2");
/// assert_eq!(format_opt(None, 1), "-");
/// ```
pub fn format_opt(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => format_number(v, decimals),
        None => "-".to_string(),
    }
}

/// Format an optional step total with thousands separators.
///
/// # Examples
///
/// ```
/// use fitdash_core::formatting::format_opt_steps;
///
/// assert_eq!(format_opt_steps(Some(66_500)), "66,500");
/// assert_eq!(format_opt_steps(None), "-");
/// ```
pub fn format_opt_steps(total: Option<i64>) -> String {
    match total {
        Some(v) => format_number(v as f64, 0),
        None => "-".to_string(),
    }
}

/// Format a signed week-over-week delta, with an explicit `+` on gains.
///
/// # Examples
///
/// ```
/// use fitdash_core::formatting::format_delta;
///
/// assert_eq!(format_delta(Some(-1.2), 1), "-1.2");
/// assert_eq!(format_delta(Some(0.6), 1), "+0.6");
/// assert_eq!(format_delta(None, 1), "-");
/// ```
pub fn format_delta(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{}", format_number(v, decimals)),
        Some(v) => format_number(v, decimals),
        None => "-".to_string(),
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

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_no_thousands() {
        assert_eq!(format_number(123.456, 2), "123.46");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_exact_thousands() {
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── format_opt ────────────────────────────────────────────────────────────

    #[test]
    fn test_format_opt_some() {
        assert_eq!(format_opt(Some(2_510.7), 1), "2,510.7");
    }

    #[test]
    fn test_format_opt_none_is_dash() {
        assert_eq!(format_opt(None, 1), "-");
    }

    // ── format_opt_steps ──────────────────────────────────────────────────────

    #[test]
    fn test_format_opt_steps_groups_digits() {
        assert_eq!(format_opt_steps(Some(1_234_567)), "1,234,567");
    }

    #[test]
    fn test_format_opt_steps_none_is_dash() {
        assert_eq!(format_opt_steps(None), "-");
    }

    // ── format_delta ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_delta_loss_keeps_minus() {
        assert_eq!(format_delta(Some(-1.2), 1), "-1.2");
    }

    #[test]
    fn test_format_delta_gain_gets_plus() {
        assert_eq!(format_delta(Some(0.6), 1), "+0.6");
    }

    #[test]
    fn test_format_delta_zero_is_unsigned() {
        assert_eq!(format_delta(Some(0.0), 1), "0.0");
    }

    #[test]
    fn test_format_delta_none_is_dash() {
        assert_eq!(format_delta(None, 1), "-");
    }

    // ── group_thousands (via format_number) ───────────────────────────────────

    #[test]
    fn test_group_thousands_one_digit() {
        assert_eq!(format_number(5.0, 0), "5");
    }

    #[test]
    fn test_group_thousands_four_digits() {
        assert_eq!(format_number(1234.0, 0), "1,234");
    }

    #[test]
    fn test_group_thousands_seven_digits() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }
}
