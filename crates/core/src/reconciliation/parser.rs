//! Statement amount parsing.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::ReconciliationError;

/// Parses a textual statement amount into a `Decimal`.
///
/// Tolerates the formats banks actually export:
///
/// - dot decimals: `"1234.56"`, `"1,234.56"`
/// - comma decimals: `"1234,56"`, `"1.234,56"`
/// - explicit signs: `"-12,34"`, `"+45.00"`
/// - embedded spaces as grouping: `"1 234,56"`
///
/// The rightmost `,` or `.` followed by one or two digits is the decimal
/// separator; every other separator is grouping and is dropped.
///
/// # Errors
///
/// Returns `InvalidAmount` when no digits remain after normalization or a
/// non-numeric character survives.
pub fn parse_amount(raw: &str) -> Result<Decimal, ReconciliationError> {
    let invalid = || ReconciliationError::InvalidAmount(raw.to_string());

    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let body: String = unsigned.chars().filter(|c| !c.is_whitespace()).collect();
    if body.is_empty() {
        return Err(invalid());
    }

    let (integer_part, fraction_part) = match body.rfind([',', '.']) {
        Some(position) => {
            let fraction = &body[position + 1..];
            if !fraction.is_empty()
                && fraction.len() <= 2
                && fraction.bytes().all(|b| b.is_ascii_digit())
            {
                (&body[..position], fraction)
            } else {
                (body.as_str(), "")
            }
        }
        None => (body.as_str(), ""),
    };

    let digits: String = integer_part
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();
    if digits.is_empty() && fraction_part.is_empty() {
        return Err(invalid());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let integer_digits = if digits.is_empty() { "0" } else { digits.as_str() };
    let normalized = if fraction_part.is_empty() {
        integer_digits.to_string()
    } else {
        format!("{integer_digits}.{fraction_part}")
    };

    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1234.56", dec!(1234.56))]
    #[case("1234,56", dec!(1234.56))]
    #[case("1,234.56", dec!(1234.56))]
    #[case("1.234,56", dec!(1234.56))]
    #[case("1 234,56", dec!(1234.56))]
    #[case("45", dec!(45))]
    #[case("45.0", dec!(45.0))]
    #[case("-12,34", dec!(-12.34))]
    #[case("+45.00", dec!(45.00))]
    #[case("  -0,99 ", dec!(-0.99))]
    #[case(".56", dec!(0.56))]
    #[case("1.234", dec!(1234))]
    #[case("12.345.678,90", dec!(12345678.90))]
    fn test_parse_amount_formats(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("-")]
    #[case(".")]
    #[case("abc")]
    #[case("12a4.56")]
    #[case("--5")]
    fn test_parse_amount_rejects_garbage(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw),
            Err(ReconciliationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_three_digit_tail_is_grouping() {
        // "1.234" reads as one thousand two hundred thirty-four, the way
        // statements in comma-decimal locales print it.
        assert_eq!(parse_amount("1.234").unwrap(), dec!(1234));
        assert_eq!(parse_amount("1,234").unwrap(), dec!(1234));
    }
}
