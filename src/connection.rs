//! Connections to CI server endpoints
//!
//! A [`Connection`] runs named remote commands against one server endpoint.
//! The production implementation, [`CliConnection`], drives the server's CLI
//! client as a child process: the command and entity id go on the command
//! line, the configuration payload goes to stdin, and stdout/stderr/exit
//! status come back as a [`CommandResult`].

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::config::CliConfig;
use crate::error::ConnectionError;
use crate::logging::*;
use crate::response::{CommandResult, TRANSPORT_FAILURE};

/// Reusable client bound to a single server endpoint
#[async_trait]
pub trait Connection: Send + Sync {
	/// Endpoint this connection talks to
	fn endpoint(&self) -> &str;

	/// Run `command` for `entity`, sending `payload` as input.
	///
	/// Transport problems are reported as a failed [`CommandResult`], never
	/// as an error, so callers handle them exactly like a remote rejection.
	async fn execute(&self, command: &str, entity: &str, payload: &str) -> CommandResult;

	/// Release the connection; later commands fail
	fn close(&self);
}

/// Factory creating connections for endpoints the pool has not seen yet
pub trait Connector: Send + Sync {
	fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, ConnectionError>;
}

/// Connector spawning the configured CLI client
#[derive(Debug, Clone)]
pub struct CliConnector {
	config: CliConfig,
}

impl CliConnector {
	pub fn new(config: CliConfig) -> Self {
		CliConnector { config }
	}
}

impl Connector for CliConnector {
	fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, ConnectionError> {
		debug!("Opening CLI connection to {}", endpoint);
		Ok(Arc::new(CliConnection::new(endpoint, &self.config)))
	}
}

/// Connection issuing each command through a fresh CLI client process
#[derive(Debug)]
pub struct CliConnection {
	endpoint: String,
	launcher: Vec<String>,
	extra_args: Vec<String>,
	timeout: Duration,
	closed: AtomicBool,
	commands_issued: AtomicUsize,
}

impl CliConnection {
	pub fn new(endpoint: &str, config: &CliConfig) -> Self {
		CliConnection {
			endpoint: endpoint.to_string(),
			launcher: config.launcher.clone(),
			extra_args: config.extra_args.clone(),
			timeout: Duration::from_secs(config.timeout_secs),
			closed: AtomicBool::new(false),
			commands_issued: AtomicUsize::new(0),
		}
	}

	/// Number of commands run over this connection so far
	pub fn commands_issued(&self) -> usize {
		self.commands_issued.load(Ordering::Relaxed)
	}

	fn describe(&self, command: &str) -> String {
		format!("{} -s {} {}", self.launcher.join(" "), self.endpoint, command)
	}

	async fn run(
		&self,
		command: &str,
		entity: &str,
		payload: &str,
	) -> Result<CommandResult, ConnectionError> {
		if self.closed.load(Ordering::Acquire) {
			return Err(ConnectionError::Closed { endpoint: self.endpoint.clone() });
		}

		let (program, prefix) = self.launcher.split_first().ok_or_else(|| {
			ConnectionError::SpawnFailed {
				cmd: command.to_string(),
				source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty launcher"),
			}
		})?;

		let mut child = tokio::process::Command::new(program)
			.args(prefix)
			.arg("-s")
			.arg(&self.endpoint)
			.args(&self.extra_args)
			.arg(command)
			.arg(entity)
			.stdin(if payload.is_empty() { Stdio::null() } else { Stdio::piped() })
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| ConnectionError::SpawnFailed { cmd: self.describe(command), source: e })?;
		self.commands_issued.fetch_add(1, Ordering::Relaxed);

		// stdin is written while output is read; a full stdout pipe would otherwise block the client
		let writer = child.stdin.take().map(|mut stdin| {
			let payload = payload.as_bytes().to_vec();
			tokio::spawn(async move {
				stdin.write_all(&payload).await?;
				stdin.shutdown().await
			})
		});

		let output = tokio::time::timeout(self.timeout, child.wait_with_output())
			.await
			.map_err(|_| ConnectionError::Timeout { secs: self.timeout.as_secs() })??;

		if let Some(writer) = writer {
			match writer.await {
				Ok(Err(e)) => debug!("{} did not consume its whole input: {}", command, e),
				Err(e) => debug!("stdin writer for {} failed: {}", command, e),
				Ok(Ok(())) => {}
			}
		}

		Ok(CommandResult::new(
			output.status.code().unwrap_or(TRANSPORT_FAILURE),
			String::from_utf8_lossy(&output.stdout),
			String::from_utf8_lossy(&output.stderr),
		))
	}
}

#[async_trait]
impl Connection for CliConnection {
	fn endpoint(&self) -> &str {
		&self.endpoint
	}

	async fn execute(&self, command: &str, entity: &str, payload: &str) -> CommandResult {
		match self.run(command, entity, payload).await {
			Ok(result) => result,
			Err(e) => {
				warn!("{} {} on {} failed: {}", command, entity, self.endpoint, e);
				CommandResult::transport_failure(e.to_string())
			}
		}
	}

	fn close(&self) {
		if !self.closed.swap(true, Ordering::AcqRel) {
			debug!(
				"Closed connection to {} after {} command(s)",
				self.endpoint,
				self.commands_issued()
			);
		}
	}
}


// vim: ts=4
