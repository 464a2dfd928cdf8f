//! Configuration validation functions

use super::ValidationError;

/// Validate the CLI client launcher command prefix
///
/// The first element is the program to spawn, so it must exist and must not
/// be blank.
pub fn validate_launcher(launcher: &[String]) -> Result<(), ValidationError> {
	match launcher.first() {
		None => Err(ValidationError::ConfigError("Launcher command must not be empty".to_string())),
		Some(program) if program.trim().is_empty() => Err(ValidationError::ConfigError(
			"Launcher program must not be blank".to_string(),
		)),
		Some(_) => Ok(()),
	}
}

/// Validate timeout in seconds
pub fn validate_timeout_secs(timeout_secs: u64) -> Result<(), ValidationError> {
	if timeout_secs == 0 {
		return Err(ValidationError::ConfigError("Timeout must be greater than 0".to_string()));
	}
	if timeout_secs > 3600 {
		return Err(ValidationError::ConfigError(format!(
			"Timeout too large: {} seconds (max 3600)",
			timeout_secs
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_launcher() {
		assert!(validate_launcher(&["java".to_string(), "-jar".to_string()]).is_ok());

		let result = validate_launcher(&[]);
		assert!(result.unwrap_err().to_string().contains("must not be empty"));

		assert!(validate_launcher(&["  ".to_string()]).is_err());
	}

	#[test]
	fn test_validate_timeout_valid() {
		assert!(validate_timeout_secs(1).is_ok());
		assert!(validate_timeout_secs(300).is_ok());
		assert!(validate_timeout_secs(3600).is_ok());
	}

	#[test]
	fn test_validate_timeout_invalid() {
		assert!(validate_timeout_secs(0).is_err());
		let result = validate_timeout_secs(3601);
		assert!(result.unwrap_err().to_string().contains("max 3600"));
	}
}

// vim: ts=4
