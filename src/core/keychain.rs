//! Keychain storage for AdminService credentials.
//!
//! Uses the system keychain (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) for the account secret an export run
//! authenticates with.

use crate::error::{Error, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "mcm-export";

fn keyring_error(e: keyring::Error) -> Error {
    Error::credential_store_failed(e.to_string())
}

/// Stores a secret for an (account, service) pair.
///
/// Key format: `<service>:<account>`
pub fn store(service: &str, account: &str, secret: &str) -> Result<()> {
    let key = format!("{}:{}", service, account);
    let entry = Entry::new(SERVICE_NAME, &key).map_err(keyring_error)?;
    entry.set_password(secret).map_err(keyring_error)?;
    log_status!("keychain", "Stored credential for {}", key);
    Ok(())
}

/// Retrieves the secret for an (account, service) pair.
///
/// Returns `None` if no entry exists.
pub fn get(service: &str, account: &str) -> Result<Option<String>> {
    let key = format!("{}:{}", service, account);
    let entry = Entry::new(SERVICE_NAME, &key).map_err(keyring_error)?;

    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e)),
    }
}

/// Deletes the secret for an (account, service) pair.
pub fn delete(service: &str, account: &str) -> Result<()> {
    let key = format!("{}:{}", service, account);
    let entry = Entry::new(SERVICE_NAME, &key).map_err(keyring_error)?;

    match entry.delete_credential() {
        Ok(()) => {
            log_status!("keychain", "Removed credential for {}", key);
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
        Err(e) => Err(keyring_error(e)),
    }
}

/// Checks whether a secret is stored for an (account, service) pair.
pub fn exists(service: &str, account: &str) -> bool {
    get(service, account).map(|v| v.is_some()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require keychain access and may prompt for permissions
    // Run manually with: cargo test keychain -- --ignored

    #[test]
    #[ignore]
    fn store_get_delete_roundtrip() {
        let service = "test-adminservice";
        let account = "test-account";
        let secret = "secret_value_123";

        store(service, account, secret).unwrap();
        let retrieved = get(service, account).unwrap();
        assert_eq!(retrieved, Some(secret.to_string()));

        delete(service, account).unwrap();
        let after_delete = get(service, account).unwrap();
        assert_eq!(after_delete, None);
    }
}
