//! Fixed defaults shared across the export pipeline.

/// AdminService inventory endpoint, appended to the configured base URL.
pub const APPLICATIONS_PATH: &str = "AdminService/wmi/SMS_ApplicationLatest";

/// Well-known service identifier for stored credentials, used when
/// `--keychain-service` is not given.
pub const KEYCHAIN_SERVICE: &str = "mcm-adminservice";

/// HTTP connect timeout per request, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP read timeout per request, in seconds.
pub const READ_TIMEOUT_SECS: u64 = 15;
