//! String helpers used when answers are echoed into logs and transcripts.

/// Shorten `s` to at most `max_len` bytes, appending `...` when cut.
///
/// The cut always lands on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Single-line preview of a provider answer for log fields.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate("Paris", 10), "Paris");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("The capital of France", 10), "The cap...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // "è" is two bytes, a cut inside it must back off
        assert_eq!(truncate("caffè latte", 8), "caff...");
        assert_eq!(truncate("èèèè", 6), "è...");
    }

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("line one\n\n  line two", 100), "line one line two");
        assert_eq!(preview("a\nb\nc d e f g", 8), "a b c...");
    }
}
