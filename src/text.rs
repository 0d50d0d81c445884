//! Text Truncation
//!
//! Item text previews for confirmation popups and long-text collapsing.

/// Trim, cut to `max_chars` characters, trim again
pub fn truncate(text: &str, max_chars: usize) -> String {
    let cut: String = text.trim().chars().take(max_chars).collect();
    cut.trim().to_string()
}

/// Preview label: truncated with an ellipsis when longer than `max_chars`
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate(text, max_chars))
    } else {
        text.to_string()
    }
}

/// Long item text split for a "more/less" toggle.
/// Returns `None` when the text fits and needs no toggle.
pub fn collapse_long(text: &str, max_chars: usize) -> Option<String> {
    if text.trim().chars().count() > max_chars {
        Some(truncate(text, max_chars))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("How was the course?", 20), "How was the course?");
    }

    #[test]
    fn test_preview_long_text_gets_ellipsis() {
        let text = "Rate the instructor's preparation for class";
        assert_eq!(preview(text, 20), "Rate the instructor'...");
    }

    #[test]
    fn test_truncate_trims_both_ends() {
        assert_eq!(truncate("   one two   three ", 8), "one two");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("éééé", 2), "éé");
    }

    #[test]
    fn test_collapse_long() {
        assert_eq!(collapse_long("short", 150), None);
        let long = "x".repeat(151);
        assert_eq!(collapse_long(&long, 150).map(|s| s.len()), Some(150));
    }
}
