//! Logging prelude module for convenient access to tracing macros.
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Cloning {} to {} destination(s)", source, count);
//! debug!("Dispatching {} to {}", command, endpoint);
//! ```

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (from the config file
/// or `--verbose`) is used:
///
/// ```bash
/// RUST_LOG=debug config-cloner job http://a/job/x http://b/
/// RUST_LOG=config_cloner::gateway=debug config-cloner recipe clone.toml
/// ```
pub fn init_tracing(default_level: &str) {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.try_init();
}

// vim: ts=4
