/// Integration tests for configuration loading
/// Config files are read as TOML, or JSON5 for .json/.json5, and merged over defaults
use std::fs;
use tempfile::TempDir;

use config_cloner::validation::Validator;
use config_cloner::{CloneError, Config};

#[test]
fn test_toml_config_file() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let config_path = temp_dir.path().join("config.toml");
	fs::write(
		&config_path,
		r#"
		logLevel = "warn"

		[cli]
		launcher = ["jenkins-cli"]
		extraArgs = ["-auth", "@/etc/ci/token"]
		timeoutSecs = 60
		"#,
	)
	.expect("Failed to write config file");

	let config = Config::from_file(&config_path).unwrap();
	assert_eq!(config.log_level, "warn");
	assert_eq!(config.cli.launcher, vec!["jenkins-cli"]);
	assert_eq!(config.cli.extra_args, vec!["-auth", "@/etc/ci/token"]);
	assert_eq!(config.cli.timeout_secs, 60);
	assert!(!config.dry_run);
	assert!(config.validate().is_ok());
}

#[test]
fn test_json5_config_file() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let config_path = temp_dir.path().join("config.json5");
	fs::write(
		&config_path,
		r#"{
			// comments are allowed
			dryRun: true,
			cli: { timeoutSecs: 30, },
		}"#,
	)
	.expect("Failed to write config file");

	let config = Config::from_file(&config_path).unwrap();
	assert!(config.dry_run);
	assert_eq!(config.cli.timeout_secs, 30);
	assert_eq!(config.cli.launcher, Config::default().cli.launcher);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let config_path = temp_dir.path().join("nope.toml");

	let err = Config::load(Some(&config_path)).unwrap_err();
	assert!(matches!(err, CloneError::Config { .. }));
	assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_malformed_file_is_an_error() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let config_path = temp_dir.path().join("config.toml");
	fs::write(&config_path, "[cli\nlauncher = ").expect("Failed to write config file");

	assert!(matches!(Config::from_file(&config_path), Err(CloneError::Config { .. })));
}

#[test]
fn test_empty_launcher_fails_validation() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let config_path = temp_dir.path().join("config.toml");
	fs::write(&config_path, "[cli]\nlauncher = []\n").expect("Failed to write config file");

	let config = Config::from_file(&config_path).unwrap();
	assert!(config.validate().is_err());
}
