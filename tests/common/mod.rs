//! Shared test doubles: a connector whose connections record every command
//! and answer from a script instead of talking to a server.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use config_cloner::{CommandResult, Connection, ConnectionError, ConnectionPool, Connector};

/// One command as seen by a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
	pub endpoint: String,
	pub command: String,
	pub entity: String,
	pub payload: String,
}

impl Call {
	pub fn new(endpoint: &str, command: &str, entity: &str, payload: &str) -> Self {
		Call {
			endpoint: endpoint.to_string(),
			command: command.to_string(),
			entity: entity.to_string(),
			payload: payload.to_string(),
		}
	}
}

#[derive(Default)]
struct Shared {
	calls: Vec<Call>,
	replies: HashMap<(String, String, String), CommandResult>,
	connects: usize,
	closed: Vec<String>,
}

/// Scriptable connector; clones share the same record
#[derive(Clone, Default)]
pub struct RecordingConnector {
	shared: Arc<Mutex<Shared>>,
}

impl RecordingConnector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Answer `command` for `entity` on `endpoint` with `result`.
	/// Unscripted commands succeed with empty output.
	pub fn reply(&self, endpoint: &str, command: &str, entity: &str, result: CommandResult) {
		self.shared.lock().unwrap().replies.insert(
			(endpoint.to_string(), command.to_string(), entity.to_string()),
			result,
		);
	}

	pub fn calls(&self) -> Vec<Call> {
		self.shared.lock().unwrap().calls.clone()
	}

	/// Command names in dispatch order
	pub fn commands(&self) -> Vec<String> {
		self.calls().into_iter().map(|c| c.command).collect()
	}

	pub fn connects(&self) -> usize {
		self.shared.lock().unwrap().connects
	}

	pub fn closed(&self) -> Vec<String> {
		self.shared.lock().unwrap().closed.clone()
	}

	pub fn pool(&self) -> ConnectionPool {
		ConnectionPool::new(Box::new(self.clone()))
	}
}

impl Connector for RecordingConnector {
	fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, ConnectionError> {
		self.shared.lock().unwrap().connects += 1;
		Ok(Arc::new(RecordingConnection {
			endpoint: endpoint.to_string(),
			shared: Arc::clone(&self.shared),
		}))
	}
}

struct RecordingConnection {
	endpoint: String,
	shared: Arc<Mutex<Shared>>,
}

#[async_trait]
impl Connection for RecordingConnection {
	fn endpoint(&self) -> &str {
		&self.endpoint
	}

	async fn execute(&self, command: &str, entity: &str, payload: &str) -> CommandResult {
		let mut shared = self.shared.lock().unwrap();
		shared.calls.push(Call::new(&self.endpoint, command, entity, payload));
		shared
			.replies
			.get(&(self.endpoint.clone(), command.to_string(), entity.to_string()))
			.cloned()
			.unwrap_or_default()
	}

	fn close(&self) {
		self.shared.lock().unwrap().closed.push(self.endpoint.clone());
	}
}

// vim: ts=4
