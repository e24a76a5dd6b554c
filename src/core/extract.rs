//! Script extraction from application command lines.
//!
//! Walks the install and uninstall command strings of a record, picks
//! out tokens that name a recognized script file, and resolves their
//! content either inline (echo redirection) or from local disk. A
//! reference that cannot be resolved is still reported, with a warning,
//! so the caller can account for it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ApplicationRecord;
use crate::utils::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandField {
    Install,
    Uninstall,
}

impl CommandField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandField::Install => "install",
            CommandField::Uninstall => "uninstall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    PowerShell,
    Batch,
    Text,
}

// Extension table. New script types are added here, not in the scan loop.
const SCRIPT_EXTENSIONS: &[(&str, ScriptKind)] = &[
    ("ps1", ScriptKind::PowerShell),
    ("bat", ScriptKind::Batch),
    ("cmd", ScriptKind::Batch),
    ("txt", ScriptKind::Text),
];

fn script_kind(token: &str) -> Option<ScriptKind> {
    let ext = token.rsplit('.').next()?.to_ascii_lowercase();
    SCRIPT_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, kind)| *kind)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptContent {
    /// Script text embedded in the command itself.
    Inline(String),
    /// Bytes read from a file reachable on local disk.
    File(Vec<u8>),
    /// Identified but not resolvable from here.
    Unresolved,
}

impl ScriptContent {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ScriptContent::Inline(text) => Some(text.as_bytes()),
            ScriptContent::File(bytes) => Some(bytes),
            ScriptContent::Unresolved => None,
        }
    }
}

/// One script discovered in a command field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReference {
    pub source_field: CommandField,
    pub file_name: String,
    pub kind: ScriptKind,
    pub content: ScriptContent,
}

/// Result of one extraction pass over a record.
#[derive(Debug, Default)]
pub struct Extraction {
    pub scripts: Vec<ScriptReference>,
    pub warnings: Vec<String>,
}

/// Extracts script references from a record's command fields.
///
/// Install references come before uninstall references, and within a
/// field matches appear left to right. The pass is read-only, so
/// running it twice over the same record yields the same sequence.
pub fn extract_scripts(record: &ApplicationRecord, content_root: Option<&Path>) -> Extraction {
    let mut extraction = Extraction::default();

    for (field, command) in [
        (CommandField::Install, record.install_command.as_str()),
        (CommandField::Uninstall, record.uninstall_command.as_str()),
    ] {
        scan_command(record, field, command, content_root, &mut extraction);
    }

    extraction
}

fn scan_command(
    record: &ApplicationRecord,
    field: CommandField,
    command: &str,
    content_root: Option<&Path>,
    extraction: &mut Extraction,
) {
    if command.trim().is_empty() {
        return;
    }

    for raw_token in parser::split_command_tokens(command) {
        let token = raw_token.trim_matches(|c| c == '"' || c == '\'');
        if token.is_empty() {
            continue;
        }

        let kind = match script_kind(token) {
            Some(kind) => kind,
            None => continue,
        };

        let file_name = file_name_of(token);

        if token.starts_with("\\\\") || token.contains("://") {
            extraction.warnings.push(format!(
                "record {}: {} command references a remote path, content not fetched: {}",
                record.id,
                field.as_str(),
                token
            ));
            extraction.scripts.push(ScriptReference {
                source_field: field,
                file_name,
                kind,
                content: ScriptContent::Unresolved,
            });
            continue;
        }

        let content = resolve_content(command, token, &file_name, content_root);
        if content == ScriptContent::Unresolved {
            extraction.warnings.push(format!(
                "record {}: could not resolve content for {} ({})",
                record.id, file_name, token
            ));
        }

        extraction.scripts.push(ScriptReference {
            source_field: field,
            file_name,
            kind,
            content,
        });
    }
}

/// Last path component of a token, with Windows separators normalized.
fn file_name_of(token: &str) -> String {
    let normalized = token.replace('\\', "/");
    normalized
        .rsplit('/')
        .next()
        .unwrap_or(&normalized)
        .to_string()
}

fn resolve_content(
    command: &str,
    token: &str,
    file_name: &str,
    content_root: Option<&Path>,
) -> ScriptContent {
    if let Some(text) = inline_content(command, file_name) {
        return ScriptContent::Inline(text);
    }

    if let Some(path) = local_path(token, content_root) {
        if let Ok(bytes) = fs::read(&path) {
            return ScriptContent::File(bytes);
        }
    }

    ScriptContent::Unresolved
}

/// Captures script text written by the command itself via echo
/// redirection, e.g. `cmd /c echo Write-Host done > setup.ps1`.
fn inline_content(command: &str, file_name: &str) -> Option<String> {
    let pattern = format!(
        r#"(?i)echo\s+(.+?)\s*>{{1,2}}\s*"?[^\s">]*{}"#,
        regex::escape(file_name)
    );
    parser::extract_first(command, &pattern)
}

fn is_absolute(token: &str) -> bool {
    if token.starts_with('/') {
        return true;
    }
    let bytes = token.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn local_path(token: &str, content_root: Option<&Path>) -> Option<PathBuf> {
    let normalized = token.replace('\\', "/");
    if is_absolute(&normalized) {
        return Some(PathBuf::from(normalized));
    }

    let relative = normalized.trim_start_matches("./");
    content_root.map(|root| root.join(relative))
}
