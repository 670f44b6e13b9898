//! Shared form validation helpers.
//!
//! Every domain error enum names the form field it belongs to, so the shell
//! can render messages inline without a network call.

/// An error tied to one input field.
pub trait FieldError: std::error::Error {
    /// The wire name of the offending field.
    fn field(&self) -> &'static str;
}

/// Maximum length for short free-text fields (names, titles, descriptions).
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum length for notes.
pub const MAX_NOTES_LEN: usize = 2_000;

/// Checks that an amount is usable: finite and not negative.
pub fn check_amount(amount: f64) -> Result<(), AmountProblem> {
    if !amount.is_finite() {
        Err(AmountProblem::NotANumber)
    } else if amount < 0.0 {
        Err(AmountProblem::Negative)
    } else {
        Ok(())
    }
}

/// Why an amount was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountProblem {
    NotANumber,
    Negative,
}

/// Returns true when the text is blank after trimming.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns true when the trimmed text exceeds `max` characters.
pub fn too_long(text: &str, max: usize) -> bool {
    text.trim().chars().count() > max
}

/// Loose email shape check: one `@`, a non-empty local part, and a domain
/// containing a dot.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}
