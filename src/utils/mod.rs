//! Utility functions for formatting numbers the Brazilian way
//!
//! Indicator values are printed with `,` as the decimal separator and `.`
//! as the thousands separator, as the BCB publishes them.

/// Core formatting function with full control over output.
///
/// # Arguments
/// * `value` - The value to format
/// * `decimals` - Digits after the decimal comma
/// * `width` - Minimum width for padding (0 for no padding, right-aligned)
///
/// # Examples
/// ```
/// use indicadores::utils::format_number_br_with_width;
///
/// assert_eq!(format_number_br_with_width(1234.5, 2, 0), "1.234,50");
/// assert_eq!(format_number_br_with_width(13.75, 2, 8), "   13,75");
/// ```
pub fn format_number_br_with_width(value: f64, decimals: usize, width: usize) -> String {
    if !value.is_finite() {
        return format!("{:>width$}", "-", width = width);
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    // Add thousands separators (.) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    // Rounding can turn a tiny negative into zero; don't print "-0,00"
    let is_negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if is_negative { "-" } else { "" };

    let result = match decimal_part {
        Some(d) => format!("{}{},{}", sign, with_separators, d),
        None => format!("{}{}", sign, with_separators),
    };

    // Apply width padding (right-align)
    if width > 0 && result.chars().count() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Two decimals, no padding: "1.234,56"
///
/// # Examples
/// ```
/// use indicadores::utils::format_number_br;
///
/// assert_eq!(format_number_br(11.75), "11,75");
/// assert_eq!(format_number_br(-0.08), "-0,08");
/// ```
pub fn format_number_br(value: f64) -> String {
    format_number_br_with_width(value, 2, 0)
}
