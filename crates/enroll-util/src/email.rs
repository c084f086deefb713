//! Email shape validation
//!
//! Syntactic check only; whether the address belongs to a real user is the
//! directory's concern.

/// Check that a string looks like an email address.
///
/// Requires a single `@` with a nonempty local part and a dotted domain,
/// and rejects embedded whitespace. Deliberately loose beyond that.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = candidate.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
