//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(gsk_[a-zA-Z0-9]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = r#"{"error":"Invalid API Key sk-proj-abcdefghijklmnop1234"} Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"#;
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("sk-proj-abcdefghijklmnop1234"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.contains("Invalid API Key"));
    }

    #[test]
    fn groq_keys_redacted() {
        let clean = redact_sensitive_data("key=gsk_0123456789ABCDEFabcdef");
        assert_eq!(clean, "key=[REDACTED_TOKEN]");
    }

    #[test]
    fn plain_text_untouched() {
        let text = "Shako\nDefense: 141\n+2 to All Skills";
        assert_eq!(redact_sensitive_data(text), text);
    }
}
