//! Display helpers used when rendering notification messages.
//!
//! Comparisons inside the engine always use full precision; rounding only
//! happens here, at the edge.

/// Formats a number without a fractional part when it is whole, otherwise
/// with two decimals.
///
/// # Examples
///
/// ```
/// use fleetwatch_common::format::format_plain;
///
/// assert_eq!(format_plain(12000.0), "12000");
/// assert_eq!(format_plain(277.777), "277.78");
/// assert_eq!(format_plain(-3.0), "-3");
/// ```
pub fn format_plain(value: f64) -> String {
    if is_whole(value) {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Formats a number with `,` thousands separators and at most two decimals,
/// trailing zeros trimmed.
///
/// # Examples
///
/// ```
/// use fleetwatch_common::format::format_grouped;
///
/// assert_eq!(format_grouped(1250000.0), "1,250,000");
/// assert_eq!(format_grouped(-15000.5), "-15,000.5");
/// assert_eq!(format_grouped(999.0), "999");
/// ```
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 && rounded != "0.00" {
        grouped.push('-');
    }
    let digits = int_part.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Formats with a fixed number of decimals.
///
/// ```
/// use fleetwatch_common::format::format_fixed;
///
/// assert_eq!(format_fixed(58.3333, 1), "58.3");
/// assert_eq!(format_fixed(277.0, 2), "277.00");
/// ```
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Rounds to the nearest integer and formats without decimals.
pub fn format_int(value: f64) -> String {
    format!("{}", value.round() as i64)
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_handles_small_and_fractional_values() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(12.345), "12.35");
        assert_eq!(format_grouped(100000.0), "100,000");
        assert_eq!(format_grouped(-0.001), "0");
    }

    #[test]
    fn int_rounds_half_away_from_zero() {
        assert_eq!(format_int(58.5), "59");
        assert_eq!(format_int(-2.5), "-3");
    }
}
