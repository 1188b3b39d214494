//! Email address normalization.

/// Canonical form used for storage and comparison: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a list of addresses, dropping blanks and later duplicates.
///
/// The first occurrence keeps its position.
pub fn normalize_email_list<S: AsRef<str>>(emails: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails {
        let normalized = normalize_email(email.as_ref());
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_normalize_list_dedupes_and_keeps_order() {
        let emails = ["b@x.io", "A@x.io", " b@X.io", "", "a@x.io"];
        assert_eq!(normalize_email_list(&emails), vec!["b@x.io", "a@x.io"]);
    }
}
