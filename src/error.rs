//! Error types for config-cloner operations
//!
//! Remote command failures are not errors at this level: they travel as
//! [`CommandResult`](crate::response::CommandResult) values and end up merged
//! into a [`Response`](crate::response::Response). The enums here cover what
//! stops a run before or outside of command dispatch.

use std::error::Error;
use std::fmt;
use std::io;

use crate::validation::ValidationError;

/// Main error type for clone operations
#[derive(Debug)]
pub enum CloneError {
	/// Invalid locations, expressions, recipes or configuration
	Validation(ValidationError),

	/// Connection error (nested)
	Connection(ConnectionError),

	/// I/O error
	Io(io::Error),

	/// Configuration file could not be loaded
	Config { path: String, message: String },

	/// Recipe file could not be read or parsed
	Recipe { path: String, message: String },
}

impl fmt::Display for CloneError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CloneError::Validation(e) => write!(f, "{}", e),
			CloneError::Connection(e) => write!(f, "Connection error: {}", e),
			CloneError::Io(e) => write!(f, "I/O error: {}", e),
			CloneError::Config { path, message } => {
				write!(f, "Failed to load configuration {}: {}", path, message)
			}
			CloneError::Recipe { path, message } => {
				write!(f, "Failed to load recipe {}: {}", path, message)
			}
		}
	}
}

impl Error for CloneError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			CloneError::Validation(e) => Some(e),
			CloneError::Connection(e) => Some(e),
			CloneError::Io(e) => Some(e),
			CloneError::Config { .. } | CloneError::Recipe { .. } => None,
		}
	}
}

impl From<ValidationError> for CloneError {
	fn from(e: ValidationError) -> Self {
		CloneError::Validation(e)
	}
}

impl From<ConnectionError> for CloneError {
	fn from(e: ConnectionError) -> Self {
		CloneError::Connection(e)
	}
}

impl From<io::Error> for CloneError {
	fn from(e: io::Error) -> Self {
		CloneError::Io(e)
	}
}

/// Connection-specific errors
#[derive(Debug)]
pub enum ConnectionError {
	/// The pool was already closed
	PoolClosed,

	/// The connection was already closed
	Closed { endpoint: String },

	/// CLI client spawn failed
	SpawnFailed { cmd: String, source: io::Error },

	/// Remote command did not finish in time
	Timeout { secs: u64 },

	/// I/O error while talking to the child process
	Io(io::Error),
}

impl fmt::Display for ConnectionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectionError::PoolClosed => write!(f, "Connection pool is closed"),
			ConnectionError::Closed { endpoint } => {
				write!(f, "Connection to {} is closed", endpoint)
			}
			ConnectionError::SpawnFailed { cmd, source } => {
				write!(f, "Failed to spawn '{}': {}", cmd, source)
			}
			ConnectionError::Timeout { secs } => {
				write!(f, "Remote command timed out after {} seconds", secs)
			}
			ConnectionError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for ConnectionError {}

impl From<io::Error> for ConnectionError {
	fn from(e: io::Error) -> Self {
		ConnectionError::Io(e)
	}
}


// vim: ts=4
