//! Logging utilities
//!
//! Library code only talks to the `log` facade. Binaries pick the backend by
//! calling one of the initialisers below exactly once at startup.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with the `info` default filter
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with a default filter.
///
/// `RUST_LOG` still takes precedence when it is set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
