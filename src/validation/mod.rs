//! Centralized validation for config-cloner
//!
//! Everything here runs before the first remote command is issued:
//! - Location validation lives in [`crate::destination`]
//! - Configuration validation (launcher, timeouts)

use std::error::Error;
use std::fmt;

pub mod config;

pub use config::*;

/// Generic validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// A location string could not be turned into a destination
	Location { location: String, reason: String },
	/// Wrong number or combination of locations
	Arguments(String),
	/// Invalid text transform expression
	Expression { expression: String, reason: String },
	/// Invalid configuration
	ConfigError(String),
	/// Invalid recipe
	Recipe(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::Location { location, reason } => {
				write!(f, "Invalid location '{}': {}", location, reason)
			}
			ValidationError::Arguments(msg) => write!(f, "Invalid arguments: {}", msg),
			ValidationError::Expression { expression, reason } => {
				write!(f, "Invalid expression '{}': {}", expression, reason)
			}
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
			ValidationError::Recipe(msg) => write!(f, "Invalid recipe: {}", msg),
		}
	}
}

impl Error for ValidationError {}

/// Trait for validatable types
pub trait Validator {
	/// Validate this type
	/// Returns Ok(()) if valid, Err(ValidationError) if invalid
	fn validate(&self) -> Result<(), ValidationError>;
}


// vim: ts=4
