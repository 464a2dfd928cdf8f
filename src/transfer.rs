//! Transfer protocol: fetch once, send to every destination
//!
//! ```text
//! Fetching --ok--> Sending(dest 1) -> ... -> Sending(dest n) -> Done
//!     \--failed--> Failed (no destination contacted)
//! ```
//!
//! Each destination is handled independently and strictly in input order. A
//! failed send is recorded in the response and the next destination is still
//! attempted. Every command is issued at most once per destination.

use std::fmt;

use crate::destination::{parse_locations, Destination};
use crate::expression::{apply_all, SedExpression, Transform};
use crate::gateway::Gateway;
use crate::kind::{Action, EntityKind};
use crate::logging::*;
use crate::response::Response;
use crate::validation::ValidationError;

/// Everything one clone operation needs, validated up front
pub struct TransferRequest {
	pub source: Destination,
	pub destinations: Vec<Destination>,
	pub kind: EntityKind,
	/// Try `update` before falling back to `create`
	pub force: bool,
	pub transforms: Vec<Box<dyn Transform>>,
}

impl TransferRequest {
	pub fn new(source: Destination, destinations: Vec<Destination>, kind: EntityKind) -> Self {
		TransferRequest { source, destinations, kind, force: false, transforms: Vec::new() }
	}

	/// Build a request from raw locations and sed expressions, as given on a command line
	pub fn parse<L, E>(
		kind: EntityKind,
		locations: &[L],
		force: bool,
		expressions: &[E],
	) -> Result<Self, ValidationError>
	where
		L: AsRef<str>,
		E: AsRef<str>,
	{
		let (source, destinations) = parse_locations(locations, kind)?;
		let transforms = expressions
			.iter()
			.map(|e| SedExpression::parse(e.as_ref()).map(|s| Box::new(s) as Box<dyn Transform>))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(TransferRequest { source, destinations, kind, force, transforms })
	}

	pub fn force(mut self, force: bool) -> Self {
		self.force = force;
		self
	}

	pub fn transform(mut self, transform: impl Transform + 'static) -> Self {
		self.transforms.push(Box::new(transform));
		self
	}
}

impl fmt::Debug for TransferRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TransferRequest")
			.field("source", &self.source)
			.field("destinations", &self.destinations)
			.field("kind", &self.kind)
			.field("force", &self.force)
			.field("transforms", &self.transforms.len())
			.finish()
	}
}

/// Runs one [`TransferRequest`]
pub struct Transfer {
	request: TransferRequest,
}

impl Transfer {
	pub fn new(request: TransferRequest) -> Self {
		Transfer { request }
	}

	pub fn request(&self) -> &TransferRequest {
		&self.request
	}

	/// Fetch the source configuration and send it to every destination.
	///
	/// Outcomes are recorded into `response`, which is also returned for
	/// chaining. A failed fetch is merged and ends the run.
	pub async fn run<'r>(
		&self,
		gateway: &mut Gateway<'_>,
		response: &'r mut Response,
	) -> &'r mut Response {
		let req = &self.request;
		info!(
			"Cloning {} {} to {} destination(s){}",
			req.kind,
			req.source,
			req.destinations.len(),
			if gateway.is_dry_run() { " (dry run)" } else { "" }
		);

		response.out_line(format!("Fetching {}", req.source));
		let fetched = gateway
			.execute(&req.source, "", req.kind.command(Action::Fetch), req.source.entity())
			.await;

		if !fetched.succeeded() {
			warn!("Fetching {} failed with {}", req.source, fetched.exit_code);
			return response.merge(fetched);
		}

		for destination in &req.destinations {
			response.out_line(format!("Sending {}", destination));
			self.send(gateway, response, destination, &fetched.stdout).await;
		}

		response
	}

	async fn send(
		&self,
		gateway: &mut Gateway<'_>,
		response: &mut Response,
		destination: &Destination,
		fetched: &str,
	) {
		let req = &self.request;
		let entity = destination.entity();

		let config = req.kind.fixup(fetched, destination);
		let config = apply_all(&config, &req.transforms);

		if req.force {
			let updated =
				gateway.execute(destination, &config, req.kind.command(Action::Update), entity).await;
			if updated.succeeded() {
				// The update result itself is not merged
				response.set_return_code(0);
				return;
			}
			debug!("Update of {} failed with {}, creating instead", destination, updated.exit_code);
		}

		let created =
			gateway.execute(destination, &config, req.kind.command(Action::Create), entity).await;
		if !created.succeeded() {
			warn!("Sending to {} failed with {}", destination, created.exit_code);
		}
		response.merge(created);
	}
}

// vim: ts=4
