use serde::{Deserialize, Serialize};

/// The browser formatter rejects more fraction digits than this.
pub const MAX_DECIMAL_PLACES: u32 = 20;

/// Presentation hint for the sign of a counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueColor {
    Positive,
    Negative,
    Neutral,
}

pub fn classify(value: f64) -> ValueColor {
    if value > 0.0 {
        ValueColor::Positive
    } else if value < 0.0 {
        ValueColor::Negative
    } else {
        ValueColor::Neutral
    }
}

/// Renders `value` with en-US digit grouping and exactly `decimal_places`
/// fraction digits, wrapped in `prefix` and `suffix`.
///
/// Exact halves round away from zero like the browser formatter (`2.5` → `3`).
/// Negative values put the sign in front of the prefix (`-$45,000`). A value
/// that rounds to zero is printed unsigned.
pub fn format_value(value: f64, decimal_places: u32, prefix: &str, suffix: &str) -> String {
    if !value.is_finite() {
        let text = if value.is_nan() {
            "NaN"
        } else if value > 0.0 {
            "∞"
        } else {
            "-∞"
        };
        return format!("{}{}{}", prefix, text, suffix);
    }

    let places = decimal_places.min(MAX_DECIMAL_PLACES) as usize;
    let fixed = round_half_away(value.abs(), places);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    let mut out = String::with_capacity(fixed.len() + prefix.len() + suffix.len() + 8);
    out.push_str(sign);
    out.push_str(prefix);
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out.push_str(suffix);
    out
}

/// Extra digits rendered past `places` to tell an exact tie from a value that
/// only sits near one. An f64 cannot carry a run of zeros this long after a
/// nonzero leading digit.
const TIE_PROBE_DIGITS: usize = 24;

/// `{:.N}` rounds the exact binary value half-to-even; ties go up here instead.
fn round_half_away(abs: f64, places: usize) -> String {
    let extended = format!("{:.*}", places + TIE_PROBE_DIGITS, abs);
    let (kept, rest) = extended.split_at(extended.len() - TIE_PROBE_DIGITS);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", places, abs);
    }

    let mut digits = kept.trim_end_matches('.').as_bytes().to_vec();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'.' {
            continue;
        }
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    String::from_utf8(digits).unwrap_or_else(|_| format!("{:.*}", places, abs))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_with_cents() {
        assert_eq!(format_value(1234.5, 2, "$", ""), "$1,234.50");
    }

    #[test]
    fn negative_sign_precedes_prefix() {
        assert_eq!(format_value(-45000.0, 0, "$", ""), "-$45,000");
        assert_eq!(format_value(-0.75, 1, "", "%"), "-0.8%");
    }

    #[test]
    fn rounded_zero_has_no_sign() {
        assert_eq!(format_value(-0.4, 0, "$", ""), "$0");
        assert_eq!(format_value(-0.0, 2, "", ""), "0.00");
    }

    #[test]
    fn groups_every_three_digits() {
        assert_eq!(format_value(0.0, 0, "", ""), "0");
        assert_eq!(format_value(999.0, 0, "", ""), "999");
        assert_eq!(format_value(1000.0, 0, "", ""), "1,000");
        assert_eq!(format_value(1_250_000.0, 0, "$", ""), "$1,250,000");
        assert_eq!(format_value(12_500.0, 0, "", "+"), "12,500+");
        assert_eq!(format_value(127.0, 1, "", "%"), "127.0%");
    }

    #[test]
    fn rounding_carries_into_grouping() {
        assert_eq!(format_value(999.96, 1, "", ""), "1,000.0");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(format_value(2.5, 0, "", ""), "3");
        assert_eq!(format_value(1234.5, 0, "$", ""), "$1,235");
        assert_eq!(format_value(0.125, 2, "", ""), "0.13");
        assert_eq!(format_value(12.5, 0, "", "%"), "13%");
        assert_eq!(format_value(0.5, 0, "", ""), "1");
        assert_eq!(format_value(-2.5, 0, "$", ""), "-$3");
    }

    #[test]
    fn tie_carry_regroups_digits() {
        assert_eq!(format_value(9999.5, 0, "", ""), "10,000");
        assert_eq!(format_value(999.5, 0, "$", ""), "$1,000");
    }

    #[test]
    fn near_ties_follow_the_binary_value() {
        // 1.005 is stored slightly below the tie
        assert_eq!(format_value(1.005, 2, "", ""), "1.00");
        assert_eq!(format_value(2.5000001, 0, "", ""), "3");
        assert_eq!(format_value(2.4999999, 0, "", ""), "2");
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        assert_eq!(format_value(f64::NAN, 2, "$", ""), "$NaN");
        assert_eq!(format_value(f64::INFINITY, 0, "", " pts"), "∞ pts");
        assert_eq!(format_value(f64::NEG_INFINITY, 0, "", ""), "-∞");
    }

    #[test]
    fn decimal_places_are_capped() {
        let rendered = format_value(1.0, 50, "", "");
        assert_eq!(rendered.split('.').nth(1).map(str::len), Some(20));
    }

    #[test]
    fn classifies_sign() {
        assert_eq!(classify(3.0), ValueColor::Positive);
        assert_eq!(classify(-0.1), ValueColor::Negative);
        assert_eq!(classify(0.0), ValueColor::Neutral);
        assert_eq!(classify(-0.0), ValueColor::Neutral);
    }
}
