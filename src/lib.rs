//! # config-cloner - Copy CI server configuration between instances
//!
//! config-cloner fetches the configuration of a job, view or node from one
//! server and creates (or, with `force`, updates) it on one or more other
//! servers, using the servers' remote command CLI rather than their storage.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use config_cloner::{CliConnector, Config, ConnectionPool, EntityKind, Gateway, Response};
//! use config_cloner::transfer::{Transfer, TransferRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let request = TransferRequest::parse(
//!         EntityKind::Job,
//!         &["http://ci-a/job/build", "http://ci-b/"],
//!         true,
//!         &["s/ci-a/ci-b/g"],
//!     )?;
//!
//!     let mut pool = ConnectionPool::new(Box::new(CliConnector::new(config.cli)));
//!     let mut response = Response::accumulate();
//!     Transfer::new(request).run(&mut Gateway::new(&mut pool, false), &mut response).await;
//!     pool.close()?;
//!
//!     std::process::exit(response.exit_code());
//! }
//! ```

pub mod config;
pub mod connection;
pub mod destination;
pub mod error;
pub mod expression;
pub mod gateway;
pub mod kind;
pub mod logging;
pub mod pool;
pub mod recipe;
pub mod response;
pub mod transfer;
pub mod validation;

// Re-export commonly used types and functions
pub use config::Config;
pub use connection::{CliConnector, Connection, Connector};
pub use destination::{parse_locations, Destination};
pub use error::{CloneError, ConnectionError};
pub use gateway::Gateway;
pub use kind::{Action, EntityKind, RemoteCommand};
pub use pool::ConnectionPool;
pub use response::{CommandResult, Response};
pub use validation::ValidationError;

// vim: ts=4
