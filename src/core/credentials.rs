//! Credential resolution for export runs.
//!
//! The secret store is an injected capability: production code uses the
//! system keychain, tests substitute an in-memory map. A resolved
//! secret lives for one run and is never logged or persisted.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};
use crate::keychain;

/// A resolved credential for one run.
///
/// The secret field is private and excluded from `Debug` output; the
/// only way it leaves this type is inside the Authorization header.
pub struct Credential {
    pub account: String,
    pub service: String,
    secret: String,
}

impl Credential {
    pub fn new(
        account: impl Into<String>,
        service: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            service: service.into(),
            secret: secret.into(),
        }
    }

    /// `Authorization` header value for HTTP Basic authentication.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.account, self.secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account", &self.account)
            .field("service", &self.service)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Secret lookup capability.
pub trait SecretStore {
    /// Returns the stored secret for the pair, or `None` when absent.
    fn resolve(&self, account: &str, service: &str) -> Result<Option<String>>;
}

/// Production store backed by the OS keychain.
pub struct KeyringStore;

impl SecretStore for KeyringStore {
    fn resolve(&self, account: &str, service: &str) -> Result<Option<String>> {
        keychain::get(service, account)
    }
}

/// Resolves the credential for a run.
///
/// An explicit password bypasses the store entirely; otherwise the
/// store is consulted once and a miss is `credential.not_found`.
pub fn resolve_credential(
    store: &dyn SecretStore,
    account: &str,
    service: &str,
    password: Option<&str>,
) -> Result<Credential> {
    if let Some(secret) = password {
        return Ok(Credential::new(account, service, secret));
    }

    match store.resolve(account, service)? {
        Some(secret) => Ok(Credential::new(account, service, secret)),
        None => Err(Error::credential_not_found(account, service)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapStore {
        entries: HashMap<(String, String), String>,
    }

    impl MapStore {
        fn with(account: &str, service: &str, secret: &str) -> Self {
            let mut entries = HashMap::new();
            entries.insert(
                (account.to_string(), service.to_string()),
                secret.to_string(),
            );
            Self { entries }
        }

        fn empty() -> Self {
            Self {
                entries: HashMap::new(),
            }
        }
    }

    impl SecretStore for MapStore {
        fn resolve(&self, account: &str, service: &str) -> Result<Option<String>> {
            Ok(self
                .entries
                .get(&(account.to_string(), service.to_string()))
                .cloned())
        }
    }

    struct PanicStore;

    impl SecretStore for PanicStore {
        fn resolve(&self, _account: &str, _service: &str) -> Result<Option<String>> {
            panic!("store must not be consulted when a password is given");
        }
    }

    #[test]
    fn resolve_returns_stored_secret() {
        let store = MapStore::with("svc-export", "mcm-adminservice", "s3cret");
        let cred =
            resolve_credential(&store, "svc-export", "mcm-adminservice", None).unwrap();
        assert_eq!(cred.account, "svc-export");
        // base64("svc-export:s3cret")
        assert_eq!(cred.basic_auth_header(), "Basic c3ZjLWV4cG9ydDpzM2NyZXQ=");
    }

    #[test]
    fn resolve_misses_with_credential_not_found() {
        let store = MapStore::empty();
        let err = resolve_credential(&store, "nobody", "mcm-adminservice", None).unwrap_err();
        assert_eq!(err.code.as_str(), "credential.not_found");
    }

    #[test]
    fn explicit_password_bypasses_store() {
        let cred =
            resolve_credential(&PanicStore, "svc-export", "mcm-adminservice", Some("pw"))
                .unwrap();
        assert_eq!(cred.basic_auth_header(), "Basic c3ZjLWV4cG9ydDpwdw==");
    }

    #[test]
    fn debug_output_redacts_secret() {
        let cred = Credential::new("user", "svc", "hunter2");
        let rendered = format!("{:?}", cred);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }
}
