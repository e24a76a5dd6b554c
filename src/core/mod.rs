pub mod api;
pub mod config;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod export;
pub mod extract;
pub mod keychain;
pub mod paths;
pub mod retry;
pub mod sanitize;
pub mod writer;

pub use error::{Error, ErrorCode, Result};
