/* src/server/format.rs */

use std::sync::LazyLock;

use regex::Regex;

/// Callback used when the client supplies none, or an unsafe one.
pub const DEFAULT_CALLBACK: &str = "callback";

const MAX_CALLBACK_LEN: usize = 50;

static CALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$.]*$")
        .unwrap_or_else(|err| panic!("callback pattern is malformed: {err}"))
});

/// Representation requested through the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Plain,
    Json,
    Jsonp,
}

impl ResponseFormat {
    /// `json` and `jsonp` match ASCII case-insensitively; anything else is plain text.
    pub fn from_query(format: Option<&str>) -> Self {
        match format {
            Some(f) if f.eq_ignore_ascii_case("jsonp") => Self::Jsonp,
            Some(f) if f.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Plain,
        }
    }
}

/// Return `callback` if it is a safe JavaScript identifier path, otherwise
/// [`DEFAULT_CALLBACK`].
///
/// Only letters, digits, `_`, `$` and `.` are allowed, the first character
/// may not be a digit or a dot, and the name is capped at 50 bytes.
pub fn sanitize_callback(callback: Option<&str>) -> &str {
    match callback {
        Some(cb) if cb.len() <= MAX_CALLBACK_LEN && CALLBACK_PATTERN.is_match(cb) => cb,
        _ => DEFAULT_CALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ResponseFormat::from_query(None), ResponseFormat::Plain);
        assert_eq!(ResponseFormat::from_query(Some("")), ResponseFormat::Plain);
        assert_eq!(ResponseFormat::from_query(Some("json")), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_query(Some("JSON")), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_query(Some("JsOn")), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_query(Some("jsonp")), ResponseFormat::Jsonp);
        assert_eq!(ResponseFormat::from_query(Some("JSONP")), ResponseFormat::Jsonp);
        assert_eq!(ResponseFormat::from_query(Some("jsonx")), ResponseFormat::Plain);
        assert_eq!(ResponseFormat::from_query(Some(" json")), ResponseFormat::Plain);
        assert_eq!(ResponseFormat::from_query(Some("xml")), ResponseFormat::Plain);
    }

    #[test]
    fn test_callback_accepts_identifiers() {
        for cb in ["getip", "_cb", "$", "jQuery123", "app.handlers.ip", "a$b_c"] {
            assert_eq!(sanitize_callback(Some(cb)), cb);
        }
    }

    #[test]
    fn test_callback_rejects_unsafe_names() {
        for cb in [
            "",
            "1abc",
            ".start",
            "alert(1)",
            "foo;bar",
            "a b",
            "<script>",
            "cb\n",
            "ünicode",
        ] {
            assert_eq!(sanitize_callback(Some(cb)), DEFAULT_CALLBACK, "{cb:?}");
        }
        assert_eq!(sanitize_callback(None), DEFAULT_CALLBACK);
    }

    #[test]
    fn test_callback_length_limit() {
        let max = "a".repeat(50);
        assert_eq!(sanitize_callback(Some(&max)), max);

        let too_long = "a".repeat(51);
        assert_eq!(sanitize_callback(Some(&too_long)), DEFAULT_CALLBACK);
    }
}
