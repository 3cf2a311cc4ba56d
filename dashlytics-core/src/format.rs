//! Number formatting for display
//!
//! Turns raw measure magnitudes into compact, currency-like strings:
//! - `abbreviate`: `$1.5K`, `$2.3M`, `$4.0B` for chart axes and labels
//! - `currency`: full `$12,345.67` amounts for table cells
//! - `count`: grouped integers (`1,234`) for quantities

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;
const THOUSAND: f64 = 1e3;

/// Abbreviates a non-negative magnitude with a K/M/B suffix.
///
/// Values below one thousand are printed in full with at most three
/// decimals (`$999`, `$12.5`, `$0.004`) and never reach `$1,000`.
///
/// # Panics
///
/// Panics if `value` is negative, NaN or infinite. Measures are guaranteed
/// finite and non-negative once decoded; use [`try_abbreviate`] for input
/// that has not been validated.
pub fn abbreviate(value: f64) -> String {
    assert!(
        is_measure(value),
        "abbreviate expects a finite non-negative measure, got {value}"
    );

    if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("${:.1}K", value / THOUSAND)
    } else {
        // rounding must not carry the value out of this tier
        let shown = if (value * 1000.0).round() >= 1_000_000.0 {
            (value * 1000.0).floor() / 1000.0
        } else {
            value
        };
        format!("${}", grouped_decimal(shown, 3, true))
    }
}

/// Non-panicking variant of [`abbreviate`].
pub fn try_abbreviate(value: f64) -> Option<String> {
    is_measure(value).then(|| abbreviate(value))
}

/// Full currency amount with two decimals: `$12,345.67`.
///
/// # Panics
///
/// Same contract as [`abbreviate`].
pub fn currency(value: f64) -> String {
    assert!(
        is_measure(value),
        "currency expects a finite non-negative measure, got {value}"
    );
    format!("${}", grouped_decimal(value, 2, false))
}

/// Integer with thousands separators: `1234567` -> `1,234,567`.
pub fn count(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn is_measure(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Formats `value` with `decimals` fraction digits and grouped integer part.
/// With `trim`, trailing zeros (and a dangling point) are removed.
fn grouped_decimal(value: f64, decimals: usize, trim: bool) -> String {
    let fixed = format!("{value:.decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };

    let frac = if trim { frac_part.trim_end_matches('0') } else { frac_part };
    let grouped = group_thousands(int_part);

    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_reference_values() {
        assert_eq!(abbreviate(999.0), "$999");
        assert_eq!(abbreviate(1500.0), "$1.5K");
        assert_eq!(abbreviate(2_300_000.0), "$2.3M");
        assert_eq!(abbreviate(4_000_000_000.0), "$4.0B");
    }

    #[test]
    fn test_abbreviate_thresholds() {
        assert_eq!(abbreviate(0.0), "$0");
        assert_eq!(abbreviate(1000.0), "$1.0K");
        assert_eq!(abbreviate(1_000_000.0), "$1.0M");
        assert_eq!(abbreviate(1_000_000_000.0), "$1.0B");
        assert_eq!(abbreviate(12_500_000_000_000.0), "$12500.0B");
    }

    #[test]
    fn test_abbreviate_small_fractions() {
        assert_eq!(abbreviate(12.5), "$12.5");
        assert_eq!(abbreviate(12.3456), "$12.346");
        assert_eq!(abbreviate(0.004), "$0.004");
        assert_eq!(abbreviate(0.0004), "$0");
        assert_eq!(abbreviate(999.999), "$999.999");
    }

    #[test]
    fn test_abbreviate_stays_below_a_thousand() {
        assert_eq!(abbreviate(999.9999), "$999.999");
        assert_eq!(abbreviate(999.99999), "$999.999");
        assert_eq!(abbreviate(999.5), "$999.5");
    }

    #[test]
    #[should_panic(expected = "finite non-negative")]
    fn test_abbreviate_rejects_negative() {
        abbreviate(-1.0);
    }

    #[test]
    #[should_panic(expected = "finite non-negative")]
    fn test_abbreviate_rejects_nan() {
        abbreviate(f64::NAN);
    }

    #[test]
    fn test_try_abbreviate() {
        assert_eq!(try_abbreviate(1500.0).as_deref(), Some("$1.5K"));
        assert_eq!(try_abbreviate(-5.0), None);
        assert_eq!(try_abbreviate(f64::INFINITY), None);
    }

    #[test]
    fn test_currency_and_count() {
        assert_eq!(currency(12345.678), "$12,345.68");
        assert_eq!(currency(0.5), "$0.50");
        assert_eq!(currency(999.0), "$999.00");
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1_234_567), "1,234,567");
    }
}
