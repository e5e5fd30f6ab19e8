//! Locale-fixed price formatting.
//!
//! The shop prices everything in South African rand and renders amounts the
//! way the `en-ZA` locale does: `R 1 234,56` - a space-grouped integer part
//! and a decimal comma, always with two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as South African rand.
///
/// Rounds to two decimal places (midpoint away from zero), groups the
/// integer digits in threes with spaces, and uses a decimal comma.
///
/// ```rust
/// use dimakatso_core::format_zar;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_zar(Decimal::new(123_456, 2)), "R 1 234,56");
/// assert_eq!(format_zar(Decimal::ZERO), "R 0,00");
/// ```
#[must_use]
pub fn format_zar(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let rounded = rounded.abs();

    // "1234.56" -> ("1234", "56")
    let fixed = format!("{rounded:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R {grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_zar(Decimal::ZERO), "R 0,00");
    }

    #[test]
    fn test_small_amount() {
        assert_eq!(format_zar(Decimal::new(599, 2)), "R 5,99");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_zar(Decimal::new(123_456, 2)), "R 1 234,56");
        assert_eq!(format_zar(Decimal::new(123_456_789, 2)), "R 1 234 567,89");
    }

    #[test]
    fn test_exact_group_boundary() {
        assert_eq!(format_zar(Decimal::from(100)), "R 100,00");
        assert_eq!(format_zar(Decimal::from(1_000)), "R 1 000,00");
    }

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(format_zar(Decimal::new(12_345, 3)), "R 12,35");
        // Midpoint rounds away from zero, matching the web formatter.
        assert_eq!(format_zar(Decimal::new(12_125, 3)), "R 12,13");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_zar(Decimal::new(-123_456, 2)), "-R 1 234,56");
    }
}
