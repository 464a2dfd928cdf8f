//! Connection pool keyed by server endpoint
//!
//! One pool lives for the whole program run and is shared by every clone
//! operation in it, so a recipe touching the same server many times reuses a
//! single connection. The pool is an explicit handle: whoever creates it
//! closes it, exactly once.
//!
//! With the CLI transport a cached connection holds launcher settings only;
//! every command still starts its own client process.
//!
//! The pool is not safe for concurrent use. `get` is a plain
//! check-then-insert on a `HashMap` behind `&mut self`; a multi-threaded
//! caller would need to wrap the pool in a lock.

use std::collections::HashMap;
use std::sync::Arc;

use crate::connection::{Connection, Connector};
use crate::error::ConnectionError;
use crate::logging::*;

pub struct ConnectionPool {
	connector: Box<dyn Connector>,
	connections: HashMap<String, Arc<dyn Connection>>,
	closed: bool,
}

impl ConnectionPool {
	pub fn new(connector: Box<dyn Connector>) -> Self {
		ConnectionPool { connector, connections: HashMap::new(), closed: false }
	}

	/// Cached connection for `endpoint`, created on first use
	pub fn get(&mut self, endpoint: &str) -> Result<Arc<dyn Connection>, ConnectionError> {
		if self.closed {
			return Err(ConnectionError::PoolClosed);
		}
		if let Some(conn) = self.connections.get(endpoint) {
			return Ok(Arc::clone(conn));
		}

		let conn = self.connector.connect(endpoint)?;
		self.connections.insert(endpoint.to_string(), Arc::clone(&conn));
		debug!("Pool holds {} connection(s)", self.connections.len());
		Ok(conn)
	}

	/// Close every held connection; the pool is unusable afterwards
	pub fn close(&mut self) -> Result<(), ConnectionError> {
		if self.closed {
			return Err(ConnectionError::PoolClosed);
		}
		self.closed = true;
		for (endpoint, conn) in self.connections.drain() {
			debug!("Closing connection to {}", endpoint);
			conn.close();
		}
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.connections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.connections.is_empty()
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}
}

impl Drop for ConnectionPool {
	fn drop(&mut self) {
		if !self.closed && !self.connections.is_empty() {
			warn!("Connection pool dropped without close(); releasing {} connection(s)", self.len());
			for conn in self.connections.values() {
				conn.close();
			}
		}
	}
}


// vim: ts=4
