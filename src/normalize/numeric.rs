//! Number parsing for spreadsheet cells.
//!
//! Cells are typed by humans, so parsing is prefix-based: `"12 meses"` reads as `12`.
//! Every function returns `None` when no finite number can be read; callers decide the
//! default.

/// Parse a pt-BR currency amount such as `"R$ 3.500,75"`.
///
/// Drops the `R$` token, removes `.` thousands separators and turns the decimal comma
/// into a point before reading the leading number.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned = text
        .replacen("R$", "", 1)
        .replace('.', "")
        .replacen(',', ".", 1);
    leading_decimal(cleaned.trim())
}

/// Parse a comma-decimal quantity such as `"7,5"`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    leading_decimal(&text.replacen(',', ".", 1))
}

/// Parse the leading integer of `text`, e.g. `"42"` or `"42abc"`.
pub fn parse_integer(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Read the longest prefix of `text` (after leading whitespace) that forms a decimal
/// number: optional sign, digits with an optional fraction, optional exponent.
fn leading_decimal(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_pt_br() {
        assert_eq!(parse_currency("R$ 3.500,75"), Some(3500.75));
        assert_eq!(parse_currency("R$1.234.567,00"), Some(1234567.0));
        assert_eq!(parse_currency("  850,5 "), Some(850.5));
        assert_eq!(parse_currency("1200"), Some(1200.0));
    }

    #[test]
    fn test_currency_unparseable() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("R$"), None);
        assert_eq!(parse_currency("a combinar"), None);
    }

    #[test]
    fn test_currency_keeps_negative_sign() {
        assert_eq!(parse_currency("-R$ 10,00"), None);
        assert_eq!(parse_currency("R$ -10,00"), Some(-10.0));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_decimal("7,5"), Some(7.5));
        assert_eq!(parse_decimal("12"), Some(12.0));
        assert_eq!(parse_decimal("3.25"), Some(3.25));
        assert_eq!(parse_decimal("12 meses"), Some(12.0));
        assert_eq!(parse_decimal("meses"), None);
    }

    #[test]
    fn test_decimal_rejects_overflow() {
        assert_eq!(parse_decimal("1e400"), None);
        assert_eq!(parse_decimal("2e3"), Some(2000.0));
        assert_eq!(parse_decimal("2e"), Some(2.0));
    }

    #[test]
    fn test_integer_prefix() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer(" 42abc"), Some(42));
        assert_eq!(parse_integer("3.9"), Some(3));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("id"), None);
        assert_eq!(parse_integer(""), None);
    }
}
