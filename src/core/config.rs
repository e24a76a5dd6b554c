//! Settings file support.
//!
//! An optional JSON settings file provides defaults for the export
//! flags. Command-line arguments always win over file values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::io;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub server: Option<String>,
    pub account: Option<String>,
    pub keychain_service: Option<String>,
    pub output: Option<String>,
    pub content_root: Option<String>,
    pub limit: Option<u32>,
    pub insecure: Option<bool>,
}

impl Settings {
    /// Loads settings from the default location or an explicit override.
    ///
    /// A missing file yields defaults. A file that exists but does not
    /// parse is an error.
    pub fn load(path_override: Option<&str>) -> Result<Self> {
        let path = match path_override {
            Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
            None => paths::settings_json()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = io::read_file(&path, "read settings")?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_reads_camel_case_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "server": "https://mcm.example.com",
                "account": "svc-export",
                "keychainService": "mcm-adminservice",
                "contentRoot": "/srv/mcm/content",
                "limit": 25,
                "insecure": true
            }}"#
        )
        .unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();

        assert_eq!(settings.server.as_deref(), Some("https://mcm.example.com"));
        assert_eq!(settings.account.as_deref(), Some("svc-export"));
        assert_eq!(settings.keychain_service.as_deref(), Some("mcm-adminservice"));
        assert_eq!(settings.content_root.as_deref(), Some("/srv/mcm/content"));
        assert_eq!(settings.limit, Some(25));
        assert_eq!(settings.insecure, Some(true));
        assert!(settings.output.is_none());
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let settings = Settings::load(Some("/nonexistent/mcm-export.json")).unwrap();
        assert!(settings.server.is_none());
        assert!(settings.limit.is_none());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn load_tolerates_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "server": "https://mcm", "legacyField": 1 }}"#).unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.server.as_deref(), Some("https://mcm"));
    }
}
