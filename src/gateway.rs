//! Remote command gateway
//!
//! Single dispatch point for remote commands. Resolves the destination's
//! endpoint through the shared [`ConnectionPool`] and runs the command there,
//! unless dry-run mode suppresses it.

use crate::destination::Destination;
use crate::kind::RemoteCommand;
use crate::logging::*;
use crate::pool::ConnectionPool;
use crate::response::CommandResult;

pub struct Gateway<'a> {
	pool: &'a mut ConnectionPool,
	dry_run: bool,
}

impl<'a> Gateway<'a> {
	pub fn new(pool: &'a mut ConnectionPool, dry_run: bool) -> Self {
		Gateway { pool, dry_run }
	}

	pub fn is_dry_run(&self) -> bool {
		self.dry_run
	}

	/// Run `command` for `entity` on the destination's server.
	///
	/// An empty payload is sent for read-only commands. In dry-run mode
	/// mutating commands are not sent at all and report success; fetches
	/// still run.
	pub async fn execute(
		&mut self,
		destination: &Destination,
		payload: &str,
		command: RemoteCommand,
		entity: &str,
	) -> CommandResult {
		let endpoint = destination.endpoint();

		if self.dry_run && command.action.is_mutating() {
			info!("Dry run: suppressed {} {} on {}", command, entity, endpoint);
			return CommandResult::success(format!(
				"Dry run: skipping {} {} on {}\n",
				command, entity, endpoint
			));
		}

		let conn = match self.pool.get(endpoint) {
			Ok(conn) => conn,
			Err(e) => {
				error!("No connection to {}: {}", endpoint, e);
				return CommandResult::transport_failure(format!("{}: {}", endpoint, e));
			}
		};

		debug!("Dispatching {} {} to {} ({} byte payload)", command, entity, endpoint, payload.len());
		let result = conn.execute(command.name, entity, payload).await;
		debug!("{} {} on {} exited with {}", command, entity, endpoint, result.exit_code);
		result
	}
}

// vim: ts=4
