//! Command results and their aggregation
//!
//! A [`CommandResult`] is the outcome of one remote command. A [`Response`]
//! collects progress lines and any number of merged results into one verdict
//! for a whole clone run.

use std::io::Write;

/// Exit code used for results that never reached the remote side
pub const TRANSPORT_FAILURE: i32 = -1;

/// Outcome of a single remote command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
	pub exit_code: i32,
	pub stdout: String,
	pub stderr: String,
}

impl CommandResult {
	pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
		CommandResult { exit_code, stdout: stdout.into(), stderr: stderr.into() }
	}

	/// Successful result carrying `stdout`
	pub fn success(stdout: impl Into<String>) -> Self {
		Self::new(0, stdout, "")
	}

	/// Result for a command that failed before or while talking to the server
	pub fn transport_failure(message: impl Into<String>) -> Self {
		let mut stderr = message.into();
		if !stderr.ends_with('\n') {
			stderr.push('\n');
		}
		Self::new(TRANSPORT_FAILURE, "", stderr)
	}

	pub fn succeeded(&self) -> bool {
		self.exit_code == 0
	}
}

/// Aggregate outcome of one or more remote commands
///
/// `return_code` is the raw code as last written; it may be reset to 0 by
/// [`Response::set_return_code`]. `first_failure` never is, so
/// [`Response::succeeded`] and [`Response::exit_code`] keep reporting an
/// earlier failure.
#[derive(Debug, Default)]
pub struct Response {
	stdout: String,
	stderr: String,
	return_code: i32,
	first_failure: Option<i32>,
	echo: bool,
}

impl Response {
	/// Buffering response, nothing is written to the process streams
	pub fn accumulate() -> Self {
		Self::default()
	}

	/// Response that also writes every recorded line to the process stdout/stderr
	pub fn live() -> Self {
		Response { echo: true, ..Self::default() }
	}

	/// Empty response echoing like this one, for a sub-operation to be absorbed later
	pub fn child(&self) -> Self {
		Response { echo: self.echo, ..Self::default() }
	}

	/// Record a progress line on stdout
	pub fn out_line(&mut self, line: impl AsRef<str>) {
		self.push_out(&format!("{}\n", line.as_ref()));
	}

	/// Fold a command result into this response
	pub fn merge(&mut self, result: CommandResult) -> &mut Self {
		self.push_out(&result.stdout);
		self.push_err(&result.stderr);
		if result.exit_code != 0 {
			self.record_failure(result.exit_code);
		}
		self
	}

	/// Fold another response (e.g. one recipe step) into this one
	pub fn absorb(&mut self, other: Response) -> &mut Self {
		// Lines were already echoed when `other` recorded them
		let echo = std::mem::replace(&mut self.echo, false);
		self.push_out(&other.stdout);
		self.push_err(&other.stderr);
		self.echo = echo;

		if let Some(code) = other.first_failure {
			self.record_failure(code);
		}
		self
	}

	/// Overwrite the raw return code; a non-zero code also marks the response failed
	pub fn set_return_code(&mut self, code: i32) -> &mut Self {
		self.return_code = code;
		if code != 0 {
			self.first_failure.get_or_insert(code);
		}
		self
	}

	/// Raw return code as last written
	pub fn return_code(&self) -> i32 {
		self.return_code
	}

	/// Resolved exit code: the first non-zero code ever recorded, else 0
	pub fn exit_code(&self) -> i32 {
		self.first_failure.unwrap_or(0)
	}

	/// True iff nothing merged into this response failed
	pub fn succeeded(&self) -> bool {
		self.first_failure.is_none()
	}

	pub fn stdout(&self) -> &str {
		&self.stdout
	}

	pub fn stderr(&self) -> &str {
		&self.stderr
	}

	fn record_failure(&mut self, code: i32) {
		if self.return_code == 0 {
			self.return_code = code;
		}
		self.first_failure.get_or_insert(code);
	}

	fn push_out(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}
		self.stdout.push_str(text);
		if self.echo {
			let mut out = std::io::stdout().lock();
			let _ = out.write_all(text.as_bytes());
			let _ = out.flush();
		}
	}

	fn push_err(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}
		self.stderr.push_str(text);
		if self.echo {
			let _ = std::io::stderr().write_all(text.as_bytes());
		}
	}
}


// vim: ts=4
