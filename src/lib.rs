/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("api", "Fetched {} records from {}", count, host);
/// log_status!("write", "Wrote {}", path.display());
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod output;
pub mod tty;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `mcm_export::api` instead of `mcm_export::core::api`
pub use core::*;
pub use utils::*;
