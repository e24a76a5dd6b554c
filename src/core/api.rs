//! AdminService HTTP client.
//!
//! Fetches the application inventory over authenticated HTTPS, following
//! pagination links until the record set is exhausted. Transient
//! failures (timeouts, connect errors, 5xx) are retried with exponential
//! backoff; 401/403 and malformed bodies surface immediately.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::credentials::Credential;
use crate::defaults;
use crate::error::{Error, ErrorCode, Result};
use crate::retry::RetryPolicy;

fn http_error(url: &str, e: reqwest::Error) -> Error {
    let mut err = Error::new(
        ErrorCode::ApiTransient,
        format!("HTTP request failed: {}", e),
        serde_json::json!({ "url": url, "error": e.to_string() }),
    );
    err.retryable = Some(true);
    err
}

fn server_error(url: &str, status: u16, body: &str) -> Error {
    let mut err = Error::new(
        ErrorCode::ApiTransient,
        format!("Server error: HTTP {}", status),
        serde_json::json!({ "url": url, "status": status, "body": body }),
    );
    err.retryable = Some(true);
    err
}

/// One application inventory entry.
///
/// `raw` is the untouched JSON object as returned by the API; it is
/// what the writer persists. The named fields are convenience views
/// resolved from the AdminService property names.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub id: String,
    pub name: String,
    pub install_command: String,
    pub uninstall_command: String,
    pub raw: Value,
}

const ID_KEYS: &[&str] = &["CI_ID", "Id", "ID", "id", "CI_UniqueID", "ModelName"];
const NAME_KEYS: &[&str] = &["LocalizedDisplayName", "Name", "name"];
const INSTALL_KEYS: &[&str] = &["InstallCommandLine", "InstallCommand", "install_command"];
const UNINSTALL_KEYS: &[&str] = &["UninstallCommandLine", "UninstallCommand", "uninstall_command"];

fn first_string(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn decode_record(url: &str, value: Value) -> Result<ApplicationRecord> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::api_malformed_response(url, "record entry is not a JSON object"))?;

    let id = first_string(obj, ID_KEYS).ok_or_else(|| {
        Error::api_malformed_response(url, "record entry has no recognizable id field")
    })?;

    let name = first_string(obj, NAME_KEYS).unwrap_or_default();
    let install_command = first_string(obj, INSTALL_KEYS).unwrap_or_default();
    let uninstall_command = first_string(obj, UNINSTALL_KEYS).unwrap_or_default();

    Ok(ApplicationRecord {
        id,
        name,
        install_command,
        uninstall_command,
        raw: value,
    })
}

/// One HTTP exchange as the client sees it.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Request capability behind the client. Tests script responses through
/// this seam instead of opening sockets.
pub trait Transport {
    fn get(&self, url: &str, auth_header: &str) -> Result<TransportResponse>;
}

/// Real transport over a blocking reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(defaults::READ_TIMEOUT_SECS))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| Error::internal_unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, auth_header: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| http_error(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| http_error(url, e))?;

        Ok(TransportResponse { status, body })
    }
}

/// Connection settings for one run.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub limit: Option<u32>,
    pub insecure: bool,
}

struct Page {
    items: Vec<Value>,
    next: Option<String>,
}

/// HTTP client for the AdminService application inventory.
pub struct ApiClient {
    transport: Box<dyn Transport>,
    base_url: String,
    limit: Option<u32>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client with the real HTTP transport.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config_invalid_value(
                "server",
                None,
                "server base URL is not configured",
            ));
        }

        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            config,
            Box::new(transport),
            RetryPolicy::default(),
        ))
    }

    /// Creates a client over an injected transport and retry policy.
    pub fn with_transport(
        config: &ApiConfig,
        transport: Box<dyn Transport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            limit: config.limit,
            retry,
        }
    }

    /// Fetches every application record, following pagination in order.
    pub fn fetch_applications(&self, credential: &Credential) -> Result<Vec<ApplicationRecord>> {
        let mut url = self.applications_url();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(url.clone());

        let mut records = Vec::new();

        loop {
            let page = self.get_page(&url, credential)?;
            let page_len = page.items.len();

            for item in page.items {
                records.push(decode_record(&url, item)?);
            }

            log_status!(
                "api",
                "Fetched {} records ({} total)",
                page_len,
                records.len()
            );

            if let Some(limit) = self.limit {
                if records.len() >= limit as usize {
                    records.truncate(limit as usize);
                    return Ok(records);
                }
            }

            match page.next {
                Some(next) => {
                    let next_url = self.resolve_next_url(&next);
                    if !seen.insert(next_url.clone()) {
                        return Err(Error::api_malformed_response(
                            next_url,
                            "pagination loop: next link repeats an already-fetched page",
                        ));
                    }
                    url = next_url;
                }
                None => break,
            }
        }

        Ok(records)
    }

    fn applications_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let mut url = format!("{}/{}", base, defaults::APPLICATIONS_PATH);
        if let Some(limit) = self.limit {
            url.push_str(&format!("?$top={}", limit));
        }
        url
    }

    fn resolve_next_url(&self, next: &str) -> String {
        if next.starts_with("http://") || next.starts_with("https://") {
            next.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                next.trim_start_matches('/')
            )
        }
    }

    /// One page with bounded retries on transient failures.
    fn get_page(&self, url: &str, credential: &Credential) -> Result<Page> {
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1u32;

        loop {
            let result = self
                .transport
                .get(url, &credential.basic_auth_header())
                .and_then(|response| check_status(url, response));

            match result {
                Ok(body) => return parse_page(url, &body),
                Err(err) => {
                    if err.code != ErrorCode::ApiTransient {
                        return Err(err);
                    }
                    if attempt >= self.retry.max_attempts {
                        return Err(Error::api_transient(url, attempt, err.message));
                    }

                    log_status!(
                        "api",
                        "Transient failure, retrying (attempt {} of {})",
                        attempt + 1,
                        self.retry.max_attempts
                    );
                    thread::sleep(delay);
                    delay = self.retry.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }
}

fn check_status(url: &str, response: TransportResponse) -> Result<String> {
    match response.status {
        200..=299 => Ok(response.body),
        401 | 403 => Err(Error::api_auth_failed(url, response.status)),
        500..=599 => Err(server_error(url, response.status, &response.body)),
        status => Err(Error::api_request_failed(url, status, response.body)),
    }
}

fn parse_page(url: &str, body: &str) -> Result<Page> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        Error::api_malformed_response(url, format!("response body is not valid JSON: {}", e))
    })?;

    match value {
        Value::Array(items) => Ok(Page { items, next: None }),
        Value::Object(obj) => {
            let items = obj
                .get("value")
                .and_then(|v| v.as_array())
                .cloned()
                .ok_or_else(|| {
                    Error::api_malformed_response(url, "missing 'value' array in response envelope")
                })?;

            let next = obj
                .get("@odata.nextLink")
                .or_else(|| obj.get("next"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            Ok(Page { items, next })
        }
        _ => Err(Error::api_malformed_response(
            url,
            "response body is neither an object nor an array",
        )),
    }
}
