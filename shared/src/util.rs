//! Lenient parsing of raw form input.
//!
//! Stock counts and revenue are typed by the user into free-text fields and
//! kept as strings until they are sent. These helpers turn that raw input into
//! numbers without ever failing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a stock count the way a form field is read.
///
/// Leading whitespace and an optional sign are accepted, then as many decimal
/// digits as follow; anything after the digits is ignored (`"12abc"` is 12,
/// `"3.9"` is 3). Input with no leading digits yields 0. Values that overflow
/// saturate instead of wrapping.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen {
        return 0;
    }
    if negative { -value } else { value }
}

/// Units sold on one line: `max(0, start - end)`.
///
/// An end count above the start count is clamped to zero rather than reported.
pub fn sold(start: i64, end: i64) -> i64 {
    start.saturating_sub(end).max(0)
}

/// Parse an optional revenue figure.
///
/// Blank input means "no revenue" and maps to `None`, never zero. The longest
/// leading decimal number is read and the rest ignored (`"12.5abc"` is 12.5,
/// `"12,50"` is 12). Input that does not start with a number is `None`.
pub fn parse_revenue(raw: &str) -> Option<Decimal> {
    let s = leading_decimal(raw.trim_start())?;
    let parsed = if s.contains(|c: char| c == 'e' || c == 'E') {
        Decimal::from_scientific(&s)
    } else {
        Decimal::from_str(&s)
    };
    parsed.ok().map(|d| d.normalize())
}

/// `[sign] digits [. digits] [e [sign] digits]` prefix of `s`, with at least
/// one mantissa digit. A dangling `.` or exponent marker is left out.
fn leading_decimal(s: &str) -> Option<String> {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match b.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if frac_end > end + 1 || int_end > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(b.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    // ".5" and "-.5" gain a leading zero; "5." and "5.e3" drop the bare dot
    let number = s[..end].replace(".e", "e").replace(".E", "E");
    let number = number.strip_suffix('.').unwrap_or(&number);
    let number = number.strip_prefix('+').unwrap_or(number);
    Some(match number.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{}", rest),
        _ if number.starts_with('.') => format!("0{}", number),
        _ => number.to_string(),
    })
}

/// Treat an empty string as absent.
pub fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_plain_and_prefixed() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("  7"), 7);
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count("3.9"), 3);
        assert_eq!(parse_count("-4"), -4);
        assert_eq!(parse_count("+5"), 5);
    }

    #[test]
    fn test_parse_count_garbage_is_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count(" x1"), 0);
    }

    #[test]
    fn test_parse_count_saturates() {
        assert_eq!(parse_count("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_sold_is_never_negative() {
        assert_eq!(sold(10, 4), 6);
        assert_eq!(sold(4, 10), 0);
        assert_eq!(sold(0, 0), 0);
        assert_eq!(sold(i64::MIN, i64::MAX), 0);
    }

    #[test]
    fn test_parse_revenue() {
        assert_eq!(parse_revenue(""), None);
        assert_eq!(parse_revenue("   "), None);
        assert_eq!(parse_revenue("abc"), None);
        assert_eq!(parse_revenue("12.50"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_revenue(" 100 "), Some(Decimal::new(100, 0)));
        assert_eq!(parse_revenue("1e2"), Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_parse_revenue_reads_leading_number() {
        assert_eq!(parse_revenue("12.5abc"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_revenue("12,50"), Some(Decimal::new(12, 0)));
        assert_eq!(parse_revenue("  7 EUR"), Some(Decimal::new(7, 0)));
        assert_eq!(parse_revenue(".5"), Some(Decimal::new(5, 1)));
        assert_eq!(parse_revenue("-.5"), Some(Decimal::new(-5, 1)));
        assert_eq!(parse_revenue("5."), Some(Decimal::new(5, 0)));
        assert_eq!(parse_revenue("+3"), Some(Decimal::new(3, 0)));
        assert_eq!(parse_revenue("+.25"), Some(Decimal::new(25, 2)));
        assert_eq!(parse_revenue("2e"), Some(Decimal::new(2, 0)));
        assert_eq!(parse_revenue("1.5e2x"), Some(Decimal::new(150, 0)));
        assert_eq!(parse_revenue("5.e1"), Some(Decimal::new(50, 0)));
        assert_eq!(parse_revenue("."), None);
        assert_eq!(parse_revenue("-"), None);
        assert_eq!(parse_revenue("$12"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty(" "), Some(" ".to_string()));
    }
}
