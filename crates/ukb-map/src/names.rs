//! Base-name sanitization.

/// Sanitize text into a snake token: lowercase alphanumeric runs joined by
/// single underscores, trimmed of leading and trailing underscores.
pub fn snake(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::snake;

    #[test]
    fn joins_alphanumeric_runs_with_single_underscores() {
        assert_eq!(snake("Verbal interview duration"), "verbal_interview_duration");
        assert_eq!(snake("Age (years)"), "age_years");
        assert_eq!(snake("  Sex  "), "sex");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(snake("a -- b__c"), "a_b_c");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(snake("(note)"), "note");
        assert_eq!(snake("..."), "");
    }

    #[test]
    fn identical_descriptions_yield_identical_tokens() {
        assert_eq!(snake("Diastolic blood pressure"), snake("Diastolic blood pressure"));
    }
}
