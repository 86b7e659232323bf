//! Split env file text into raw `(key, value)` pairs.
//!
//! - Lines are split on `\n`, `\r` and `\r\n`.
//! - A line must look like `KEY = value`, where the key is word characters,
//!   dots and hyphens. Anything else is ignored.
//! - A value starting with `#` comments out the whole line.
//! - `"double quoted"` values lose their quotes and `\n` becomes a newline.
//! - `'single quoted'` values lose their quotes and nothing else.
//! - Unquoted values are trimmed. Trailing whitespace after a closing quote
//!   is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\w.-]+)\s*=\s*(.*)?\s*$").expect("line pattern is a valid regex")
});

/// Extract every assignment from `content`, in file order.
///
/// Repeated keys are all returned; callers that build a map keep the last.
pub fn parse_lines(content: &str) -> Vec<(String, String)> {
    content
        .split(['\n', '\r'])
        .filter_map(parse_line)
        .collect()
}

/// Parse a single line, or `None` if it is not an assignment.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let caps = LINE.captures(line)?;
    let key = caps.get(1)?.as_str().to_string();
    let value = caps.get(2).map_or("", |m| m.as_str());

    if value.starts_with('#') {
        return None;
    }

    Some((key, unquote(value)))
}

fn unquote(value: &str) -> String {
    let value = value.trim_end();
    if let Some(inner) = strip_quotes(value, '"') {
        return inner.replace("\\n", "\n");
    }
    if let Some(inner) = strip_quotes(value, '\'') {
        return inner.to_string();
    }
    value.trim().to_string()
}

fn strip_quotes(value: &str, quote: char) -> Option<&str> {
    if value.len() < 2 {
        return None;
    }
    value.strip_prefix(quote)?.strip_suffix(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(parse_line("KEY=value"), Some(pair("KEY", "value")));
    }

    #[test]
    fn spaces_around_equals() {
        assert_eq!(parse_line("  KEY =  value  "), Some(pair("KEY", "value")));
    }

    #[test]
    fn dotted_and_hyphenated_keys() {
        assert_eq!(parse_line("app.name=x"), Some(pair("app.name", "x")));
        assert_eq!(parse_line("my-key=y"), Some(pair("my-key", "y")));
    }

    #[test]
    fn empty_value() {
        assert_eq!(parse_line("EMPTY="), Some(pair("EMPTY", "")));
    }

    #[test]
    fn non_assignment_ignored() {
        assert_eq!(parse_line("just some text"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("# KEY=value"), None);
        assert_eq!(parse_line("export KEY=value"), None);
    }

    #[test]
    fn commented_value_skipped() {
        assert_eq!(parse_line("KEY=#disabled"), None);
        assert_eq!(parse_line("KEY= # disabled"), None);
    }

    #[test]
    fn hash_inside_value_kept() {
        assert_eq!(parse_line("COLOR=red#1"), Some(pair("COLOR", "red#1")));
    }

    #[test]
    fn double_quotes_expand_newlines() {
        assert_eq!(parse_line(r#"KEY="a\nb""#), Some(pair("KEY", "a\nb")));
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(parse_line(r"KEY='a\nb'"), Some(pair("KEY", r"a\nb")));
    }

    #[test]
    fn quotes_preserve_inner_whitespace() {
        assert_eq!(parse_line(r#"KEY="  padded  ""#), Some(pair("KEY", "  padded  ")));
    }

    #[test]
    fn quoted_hash_is_not_a_comment() {
        assert_eq!(parse_line(r##"KEY="#not-a-comment""##), Some(pair("KEY", "#not-a-comment")));
    }

    #[test]
    fn trailing_whitespace_after_quotes() {
        assert_eq!(
            parse_line("KEY=\"hello world\"   "),
            Some(pair("KEY", "hello world"))
        );
        assert_eq!(parse_line("KEY='a'\t"), Some(pair("KEY", "a")));
        assert_eq!(parse_line("KEY=\" a \" "), Some(pair("KEY", " a ")));
    }

    #[test]
    fn lone_quote_is_not_stripped() {
        assert_eq!(parse_line(r#"KEY=""#), Some(pair("KEY", "\"")));
    }

    #[test]
    fn all_newline_variants() {
        let pairs = parse_lines("A=1\nB=2\r\nC=3\rD=4");
        assert_eq!(
            pairs,
            vec![pair("A", "1"), pair("B", "2"), pair("C", "3"), pair("D", "4")]
        );
    }

    #[test]
    fn repeated_keys_all_returned() {
        let pairs = parse_lines("A=1\nA=2\n");
        assert_eq!(pairs, vec![pair("A", "1"), pair("A", "2")]);
    }
}
