use crate::error::Error;
use crate::Result;

/// Map an identifier or file name onto a filesystem-safe name.
///
/// Case is preserved (MCM identifiers are case-significant). Letters,
/// digits, `.`, `_`, and `-` pass through; everything else becomes `_`,
/// so path separators and Windows-reserved characters can never escape
/// the export directory.
pub(crate) fn safe_name(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation_invalid_argument(
            field_name,
            format!("{} cannot be empty", capitalize(field_name)),
            None,
            None,
        ));
    }

    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => out.push(ch),
            _ => out.push('_'),
        }
    }

    // "." and ".." would resolve as path navigation
    if out.chars().all(|c| c == '.') {
        return Err(Error::validation_invalid_argument(
            field_name,
            format!("{} must contain at least one letter or number", capitalize(field_name)),
            Some(value.to_string()),
            None,
        ));
    }

    Ok(out)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_name_passes_plain_ids_through() {
        assert_eq!(safe_name("16777220", "record id").unwrap(), "16777220");
        assert_eq!(safe_name("setup.ps1", "file name").unwrap(), "setup.ps1");
    }

    #[test]
    fn safe_name_preserves_case() {
        assert_eq!(
            safe_name("ScopeId_ABC", "record id").unwrap(),
            "ScopeId_ABC"
        );
    }

    #[test]
    fn safe_name_replaces_separators() {
        assert_eq!(
            safe_name("Scope/Application_7", "record id").unwrap(),
            "Scope_Application_7"
        );
        assert_eq!(safe_name("a\\b:c", "record id").unwrap(), "a_b_c");
    }

    #[test]
    fn safe_name_replaces_whitespace() {
        assert_eq!(safe_name("my script.bat", "file name").unwrap(), "my_script.bat");
    }

    #[test]
    fn safe_name_empty_fails() {
        assert!(safe_name("", "record id").is_err());
        assert!(safe_name("   ", "record id").is_err());
    }

    #[test]
    fn safe_name_dot_only_fails() {
        assert!(safe_name(".", "file name").is_err());
        assert!(safe_name("..", "file name").is_err());
    }
}
