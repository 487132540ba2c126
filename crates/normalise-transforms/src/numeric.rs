//! Numeric coercion with `parseFloat` / `parseInt` semantics
//!
//! Both parsers skip leading whitespace, read the longest valid numeric
//! prefix and ignore whatever follows it. When no prefix parses the result
//! is `NaN`, never an error.

/// Whitespace as understood by the string transforms: Unicode whitespace
/// plus the byte order mark, minus NEL (U+0085), which JavaScript does not
/// treat as whitespace.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse the leading decimal literal of `input`.
///
/// Accepts an optional sign, `Infinity`, integer and fraction digits and an
/// exponent. `"  3.5abc"` is `3.5`, `"abc"` and `""` are `NaN`.
#[must_use]
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start_matches(is_whitespace);
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Parse the leading integer of `input`.
///
/// Decimal by default, hexadecimal after a `0x`/`0X` prefix. Fractions and
/// exponents are not part of the literal: `"12.9"` is `12`, `"1e3"` is `1`.
#[must_use]
pub fn parse_int(input: &str) -> f64 {
    let s = input.trim_start_matches(is_whitespace);
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let digits: Vec<u32> = hex.chars().map_while(|c| c.to_digit(16)).collect();
        if digits.is_empty() {
            return f64::NAN;
        }
        digits
            .into_iter()
            .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit))
    } else {
        let len = count_digits(unsigned.as_bytes());
        if len == 0 {
            return f64::NAN;
        }
        unsigned[..len].parse().unwrap_or(f64::NAN)
    };

    if negative { -magnitude } else { magnitude }
}
