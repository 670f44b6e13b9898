//! Display formatting shared by the derived views.

/// Formats an amount as whole US dollars with thousands separators.
///
/// Missing, NaN and infinite amounts render as `$0` so a bad row never
/// leaks `NaN` into a summary.
///
/// ```
/// use planhaus_core::format::format_currency;
///
/// assert_eq!(format_currency(1234.99), "$1,235");
/// assert_eq!(format_currency(None), "$0");
/// assert_eq!(format_currency(f64::NAN), "$0");
/// ```
pub fn format_currency(amount: impl Into<Option<f64>>) -> String {
    let amount = finite_or_zero(amount.into());
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);
    let grouped = group_thousands(&digits);
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Returns the value, or zero when it is missing or not finite.
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Clamps a percentage into `[0, 100]`; NaN becomes 0.
pub fn clamp_percentage(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Returns `part` as a percentage of `total`, clamped for progress display.
/// A zero or negative total yields 0.
pub fn percent_of(part: f64, total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 || !part.is_finite() {
        return 0.0;
    }
    clamp_percentage(part * 100.0 / total)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
