//! Decimal-to-double conversion for WKT coordinates.
//!
//! Most coordinates have a short mantissa and a small decimal exponent. For those the value is
//! `mantissa * 10^exp` computed with a single IEEE-754 operation on two exactly representable
//! operands, which is correctly rounded. Everything else goes through `lexical-core`.

/// Largest integer with an exact `f64` representation, 2^53 - 1.
const MAX_EXACT_MANTISSA: u64 = (1 << 53) - 1;

/// Largest power of ten with an exact `f64` representation.
const MAX_EXACT_POW10: u64 = 22;

const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Whether `b` can start a number.
pub(crate) fn is_number_start(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.')
}

/// Whether `b` can appear inside a number.
pub(crate) fn is_number_char(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
}

/// Parse the number starting at byte offset `start` of `text`.
///
/// Returns the value and the offset just past the number, or `None` if no well-formed number
/// starts at `start`.
pub fn parse_number(text: &str, start: usize) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let mut i = start;

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut mantissa: u64 = 0;
    let mut overflow = false;
    let mut digits = 0usize;
    let mut fraction_digits: i32 = 0;

    let mut accumulate = |d: u8, mantissa: &mut u64| match mantissa
        .checked_mul(10)
        .and_then(|m| m.checked_add(u64::from(d - b'0')))
    {
        Some(m) => *mantissa = m,
        None => overflow = true,
    };

    while let Some(&d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        accumulate(d, &mut mantissa);
        digits += 1;
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while let Some(&d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
            accumulate(d, &mut mantissa);
            digits += 1;
            fraction_digits = fraction_digits.saturating_add(1);
            i += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    let mut exponent: i32 = 0;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        let exp_negative = match bytes.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let exp_start = i;
        while let Some(&d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
            exponent = exponent
                .saturating_mul(10)
                .saturating_add(i32::from(d - b'0'));
            i += 1;
        }
        if i == exp_start {
            return None;
        }
        if exp_negative {
            exponent = -exponent;
        }
    }
    let end = i;

    if !overflow {
        if mantissa == 0 {
            return Some((0.0, end));
        }
        let power = i64::from(exponent) - i64::from(fraction_digits);
        if mantissa <= MAX_EXACT_MANTISSA && power.unsigned_abs() <= MAX_EXACT_POW10 {
            let m = mantissa as f64;
            let value = if power >= 0 {
                m * POW10[power as usize]
            } else {
                m / POW10[(-power) as usize]
            };
            return Some((if negative { -value } else { value }, end));
        }
    }

    lexical_core::parse::<f64>(&bytes[start..end])
        .ok()
        .map(|value| (value, end))
}

#[cfg(test)]
mod test {
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn parse(s: &str) -> f64 {
        let (value, end) = parse_number(s, 0).unwrap();
        assert_eq!(end, s.len(), "{s}");
        value
    }

    #[test]
    fn simple_numbers() {
        assert_eq!(parse("0"), 0.);
        assert_eq!(parse("-0.0"), 0.);
        assert_eq!(parse("12"), 12.);
        assert_eq!(parse("-3.25"), -3.25);
        assert_eq!(parse("+4.5"), 4.5);
        assert_eq!(parse(".5"), 0.5);
        assert_eq!(parse("5."), 5.);
        assert_eq!(parse("1e3"), 1000.);
        assert_eq!(parse("1.5E-2"), 0.015);
        assert_eq!(parse("0.1"), 0.1);
    }

    #[test]
    fn stops_at_delimiter() {
        assert_eq!(parse_number("POINT(12.5 3)", 6), Some((12.5, 10)));
        assert_eq!(parse_number("1,2", 0), Some((1., 1)));
    }

    #[test]
    fn malformed() {
        assert_eq!(parse_number("-", 0), None);
        assert_eq!(parse_number(".", 0), None);
        assert_eq!(parse_number("1e", 0), None);
        assert_eq!(parse_number("abc", 0), None);
    }

    #[test]
    fn slow_path() {
        // mantissa beyond 2^53
        assert_eq!(parse("9007199254740993"), 9007199254740993_f64);
        // exponent beyond 10^22
        assert_eq!(parse("1e300"), 1e300);
        assert_eq!(parse("2.5e-300"), 2.5e-300);
        // mantissa beyond u64
        assert_eq!(
            parse("123456789012345678901234567890"),
            123456789012345678901234567890_f64
        );
        assert_eq!(parse("0.30000000000000004"), 0.30000000000000004);
    }

    #[test]
    fn extreme_exponents() {
        assert_eq!(parse("1.5e-99999999999"), 0.);
        assert_eq!(parse("-0.000001e-2147483648"), 0.);
        assert_eq!(parse("1e-330"), 0.);
        // either rejected or infinite, never a panic
        for text in ["1.5e99999999999", "9.9e2147483647"] {
            if let Some((value, _)) = parse_number(text, 0) {
                assert!(value.is_infinite(), "{text}");
            }
        }
    }

    #[test]
    fn matches_display_for_random_coordinates() {
        let mut rng = StdRng::seed_from_u64(42);
        let magnitude = Uniform::new(-180.0, 180.0);
        let digits = Uniform::new_inclusive(0, 15);
        let scale = Uniform::new_inclusive(0, 6);

        for _ in 0..100_000 {
            let base: f64 = rng.sample(magnitude) * 10f64.powi(rng.sample(scale));
            let factor = 10f64.powi(rng.sample(digits));
            let value = (base * factor).round() / factor;
            let text = value.to_string();
            assert_eq!(parse(&text), value, "{text}");
        }
    }
}
