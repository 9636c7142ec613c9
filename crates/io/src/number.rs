//! Locale-aware parsing of amounts and counts from CSV cells.

use orderlens_recon::config::DecimalStyle;

/// Parse a monetary or numeric cell:
/// - Strip currency symbols (`€`, `$`, `£`), whitespace and `'` group marks
/// - Handle `(12.50)` → `-12.50`
/// - Pick the decimal separator per `style` (see [`resolve_style`])
/// - Returns None if anything non-numeric remains
pub fn parse_decimal(raw: &str, style: DecimalStyle) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (is_negative, inner) =
        if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
            (true, &trimmed[1..trimmed.len() - 1])
        } else {
            (false, trimmed)
        };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | '\'') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    for (i, c) in cleaned.chars().enumerate() {
        match c {
            '0'..='9' | '.' | ',' => {}
            '-' | '+' if i == 0 && !is_negative => {}
            _ => return None,
        }
    }

    let normalized = match resolve_style(&cleaned, style) {
        DecimalStyle::Comma => cleaned.replace('.', "").replace(',', "."),
        DecimalStyle::Point | DecimalStyle::Auto => cleaned.replace(',', ""),
    };

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if is_negative { -value } else { value })
}

/// Parse a non-negative whole number (`"3"`, `"3.0"`, `"1.000"` in comma style).
pub fn parse_count(raw: &str, style: DecimalStyle) -> Option<u64> {
    let value = parse_decimal(raw, style)?;
    if value < 0.0 || value.fract() != 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}

/// Decide which separator is decimal for one cleaned value.
///
/// In `Auto` mode: with both `.` and `,` present the right-most one is
/// decimal; a lone `,` is decimal unless exactly three digits follow it;
/// repeated separators are grouping.
pub fn resolve_style(cleaned: &str, style: DecimalStyle) -> DecimalStyle {
    if style != DecimalStyle::Auto {
        return style;
    }

    match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if comma > dot {
                DecimalStyle::Comma
            } else {
                DecimalStyle::Point
            }
        }
        (None, Some(comma)) => {
            let lone = cleaned.matches(',').count() == 1;
            let digits_after = cleaned.len() - comma - 1;
            if lone && digits_after != 3 {
                DecimalStyle::Comma
            } else {
                DecimalStyle::Point
            }
        }
        (Some(_), None) if cleaned.matches('.').count() > 1 => DecimalStyle::Comma,
        _ => DecimalStyle::Point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTO: DecimalStyle = DecimalStyle::Auto;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_decimal("123.45", AUTO), Some(123.45));
        assert_eq!(parse_decimal("-50", AUTO), Some(-50.0));
        assert_eq!(parse_decimal("+7", AUTO), Some(7.0));
        assert_eq!(parse_decimal("0", AUTO), Some(0.0));
        assert_eq!(parse_decimal(".5", AUTO), Some(0.5));
    }

    #[test]
    fn comma_decimal_auto() {
        assert_eq!(parse_decimal("12,99", AUTO), Some(12.99));
        assert_eq!(parse_decimal("1.234,56", AUTO), Some(1234.56));
        assert_eq!(parse_decimal("-0,5", AUTO), Some(-0.5));
        assert_eq!(parse_decimal("1.234.567", AUTO), Some(1234567.0));
    }

    #[test]
    fn point_decimal_auto() {
        assert_eq!(parse_decimal("1,234.56", AUTO), Some(1234.56));
        assert_eq!(parse_decimal("1,234", AUTO), Some(1234.0));
        assert_eq!(parse_decimal("1,234,567.5", AUTO), Some(1234567.5));
    }

    #[test]
    fn explicit_styles() {
        assert_eq!(parse_decimal("1,234", DecimalStyle::Comma), Some(1.234));
        assert_eq!(parse_decimal("1.234", DecimalStyle::Comma), Some(1234.0));
        assert_eq!(parse_decimal("12,5", DecimalStyle::Point), Some(125.0));
    }

    #[test]
    fn currency_and_grouping_marks() {
        assert_eq!(parse_decimal("€ 19,99", AUTO), Some(19.99));
        assert_eq!(parse_decimal("$1,234.56", AUTO), Some(1234.56));
        assert_eq!(parse_decimal("1'234.50", AUTO), Some(1234.5));
        assert_eq!(parse_decimal("1 234,50", AUTO), Some(1234.5));
    }

    #[test]
    fn parenthesized_negatives() {
        assert_eq!(parse_decimal("(500.00)", AUTO), Some(-500.0));
        assert_eq!(parse_decimal("(12,50)", AUTO), Some(-12.5));
        assert_eq!(parse_decimal("(-5)", AUTO), None);
        assert_eq!(parse_decimal("(", AUTO), None);
    }

    #[test]
    fn non_numeric() {
        assert_eq!(parse_decimal("", AUTO), None);
        assert_eq!(parse_decimal("   ", AUTO), None);
        assert_eq!(parse_decimal("abc", AUTO), None);
        assert_eq!(parse_decimal("12abc34", AUTO), None);
        assert_eq!(parse_decimal("N/A", AUTO), None);
        assert_eq!(parse_decimal("1e5", AUTO), None);
        assert_eq!(parse_decimal("-", AUTO), None);
        assert_eq!(parse_decimal("1.2.3,4,5", AUTO), None);
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("3", AUTO), Some(3));
        assert_eq!(parse_count(" 3.0 ", AUTO), Some(3));
        assert_eq!(parse_count("1.000", DecimalStyle::Comma), Some(1000));
        assert_eq!(parse_count("0", AUTO), Some(0));
        assert_eq!(parse_count("-1", AUTO), None);
        assert_eq!(parse_count("2.5", AUTO), None);
        assert_eq!(parse_count("two", AUTO), None);
    }

    #[test]
    fn counts_beyond_u64_reject() {
        // 2^64 is exactly representable as f64 and must not saturate
        assert_eq!(parse_count("18446744073709551616", AUTO), None);
        assert_eq!(parse_count("99999999999999999999999", AUTO), None);
        assert_eq!(parse_count("9007199254740992", AUTO), Some(9_007_199_254_740_992));
    }
}
