//! Parsing primitives for text extraction.
//!
//! Provides the regex capture helper used for inline script bodies and
//! the command-line tokenizer the extractor walks.

use regex::Regex;

/// Extract first match from content using regex pattern with capture group.
/// Pattern must contain exactly one capture group for the value to extract.
/// Content is trimmed before matching.
pub fn extract_first(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(content.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split a command line into whitespace-separated tokens, honoring single
/// and double quotes so quoted paths with spaces stay intact.
///
/// Quote characters stay attached to the token; callers strip them.
/// Backslashes are ordinary characters (Windows path separators), not
/// escapes, and an unterminated quote runs to the end of the string.
pub fn split_command_tokens(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in command.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                    current.push(ch);
                } else if ch.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_first_returns_capture() {
        let content = "Version: 1.2.3";
        assert_eq!(
            extract_first(content, r"Version: (\d+\.\d+\.\d+)"),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn extract_first_returns_none_without_match() {
        assert_eq!(extract_first("no match here", r"Version: (\d+)"), None);
    }

    #[test]
    fn split_basic_whitespace() {
        assert_eq!(
            split_command_tokens("powershell.exe -File setup.ps1"),
            vec!["powershell.exe", "-File", "setup.ps1"]
        );
    }

    #[test]
    fn split_keeps_quoted_spans_intact() {
        assert_eq!(
            split_command_tokens(r#"cmd /c "C:\Program Files\install.bat" /quiet"#),
            vec!["cmd", "/c", r#""C:\Program Files\install.bat""#, "/quiet"]
        );
    }

    #[test]
    fn split_handles_single_quotes() {
        assert_eq!(
            split_command_tokens("sh 'my script.txt'"),
            vec!["sh", "'my script.txt'"]
        );
    }

    #[test]
    fn split_collapses_repeated_whitespace() {
        assert_eq!(
            split_command_tokens("a   b\t\tc"),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn split_unterminated_quote_runs_to_end() {
        assert_eq!(
            split_command_tokens(r#"run "unterminated path"#),
            vec!["run", r#""unterminated path"#]
        );
    }

    #[test]
    fn split_empty_string_yields_no_tokens() {
        assert!(split_command_tokens("").is_empty());
        assert!(split_command_tokens("   ").is_empty());
    }
}
