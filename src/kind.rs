//! Entity kinds and their remote command sets
//!
//! Each kind names the four remote commands used to read and write it, knows
//! how its entities appear in server URLs, and may rewrite a fetched
//! configuration before it is sent to a destination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::destination::Destination;

// ============================================================================
// ACTIONS
// ============================================================================

/// What a remote command does to the entity it names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	Fetch,
	Create,
	Update,
	Delete,
}

impl Action {
	/// Everything except a fetch changes server state
	pub fn is_mutating(self) -> bool {
		!matches!(self, Action::Fetch)
	}
}

/// A named remote command together with the action it performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCommand {
	pub name: &'static str,
	pub action: Action,
}

impl fmt::Display for RemoteCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

// ============================================================================
// ENTITY KIND
// ============================================================================

/// Category of configuration object being cloned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
	Job,
	View,
	Node,
}

impl EntityKind {
	/// Remote command performing `action` on this kind
	pub fn command(self, action: Action) -> RemoteCommand {
		let name = match (self, action) {
			(EntityKind::Job, Action::Fetch) => "get-job",
			(EntityKind::Job, Action::Create) => "create-job",
			(EntityKind::Job, Action::Update) => "update-job",
			(EntityKind::Job, Action::Delete) => "delete-job",
			(EntityKind::View, Action::Fetch) => "get-view",
			(EntityKind::View, Action::Create) => "create-view",
			(EntityKind::View, Action::Update) => "update-view",
			(EntityKind::View, Action::Delete) => "delete-view",
			(EntityKind::Node, Action::Fetch) => "get-node",
			(EntityKind::Node, Action::Create) => "create-node",
			(EntityKind::Node, Action::Update) => "update-node",
			(EntityKind::Node, Action::Delete) => "delete-node",
		};
		RemoteCommand { name, action }
	}

	/// URL path segment that precedes an entity name
	pub fn marker(self) -> &'static str {
		match self {
			EntityKind::Job => "job",
			EntityKind::View => "view",
			EntityKind::Node => "computer",
		}
	}

	/// Views nest: `/view/a/view/b` names view `b` inside view `a`
	fn is_nested(self) -> bool {
		matches!(self, EntityKind::View)
	}

	/// Locate the entity in URL path segments.
	///
	/// Returns the index of the first marker segment (everything before it
	/// belongs to the server endpoint) and the entity path. Segments following
	/// the last recognized `<marker>/<name>` pair are ignored.
	pub fn parse_path(self, segments: &[&str]) -> Option<(usize, String)> {
		let marker = self.marker();
		let is_pair = |i: usize| {
			segments.get(i) == Some(&marker)
				&& segments.get(i + 1).map_or(false, |name| !name.is_empty())
		};

		let start = (0..segments.len()).find(|&i| is_pair(i))?;
		let mut names = vec![segments[start + 1]];
		let mut next = start + 2;
		while self.is_nested() && is_pair(next) {
			names.push(segments[next + 1]);
			next += 2;
		}

		Some((start, names.join("/")))
	}

	/// Adjust a fetched configuration for the destination it is sent to.
	///
	/// Jobs are named by the URL they are created at, so their configuration
	/// is sent unchanged. View and node configurations embed their own name,
	/// which has to follow the destination.
	pub fn fixup(self, config: &str, destination: &Destination) -> String {
		match self {
			EntityKind::Job => config.to_string(),
			EntityKind::View | EntityKind::Node => {
				let name = destination.entity().rsplit('/').next().unwrap_or_default();
				replace_name_element(config, name)
			}
		}
	}
}

/// Replace the content of the first `<name>` element, if there is one
fn replace_name_element(config: &str, name: &str) -> String {
	const OPEN: &str = "<name>";
	const CLOSE: &str = "</name>";

	let Some(open) = config.find(OPEN) else {
		return config.to_string();
	};
	let content_start = open + OPEN.len();
	let Some(close) = config[content_start..].find(CLOSE) else {
		return config.to_string();
	};

	let mut out = String::with_capacity(config.len() + name.len());
	out.push_str(&config[..content_start]);
	out.push_str(&escape_xml(name));
	out.push_str(&config[content_start + close..]);
	out
}

fn escape_xml(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

impl FromStr for EntityKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"job" => Ok(Self::Job),
			"view" => Ok(Self::View),
			"node" | "computer" => Ok(Self::Node),
			_ => Err(format!("Unknown entity kind: {}. Valid options: job, view, node", s)),
		}
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Job => write!(f, "job"),
			Self::View => write!(f, "view"),
			Self::Node => write!(f, "node"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn segments(path: &str) -> Vec<&str> {
		path.split('/').collect()
	}

	#[test]
	fn test_command_names() {
		assert_eq!(EntityKind::Job.command(Action::Fetch).name, "get-job");
		assert_eq!(EntityKind::View.command(Action::Update).name, "update-view");
		assert_eq!(EntityKind::Node.command(Action::Create).name, "create-node");
		assert_eq!(EntityKind::Node.command(Action::Delete).name, "delete-node");
	}

	#[test]
	fn test_mutating_actions() {
		assert!(!Action::Fetch.is_mutating());
		assert!(Action::Create.is_mutating());
		assert!(Action::Update.is_mutating());
		assert!(Action::Delete.is_mutating());
	}

	#[test]
	fn test_parse_nested_view_path() {
		let parsed = EntityKind::View.parse_path(&segments("jenkins/view/a/view/b"));
		assert_eq!(parsed, Some((1, "a/b".to_string())));
	}

	#[test]
	fn test_parse_path_ignores_tail() {
		let parsed = EntityKind::View.parse_path(&segments("infra/hudson/view/name/some_tail"));
		assert_eq!(parsed, Some((2, "name".to_string())));
	}

	#[test]
	fn test_job_path_is_flat() {
		let parsed = EntityKind::Job.parse_path(&segments("job/a/job/b"));
		assert_eq!(parsed, Some((0, "a".to_string())));
	}

	#[test]
	fn test_marker_without_name() {
		assert_eq!(EntityKind::Job.parse_path(&segments("job/")), None);
		assert_eq!(EntityKind::Node.parse_path(&segments("view/x")), None);
		assert_eq!(
			EntityKind::Node.parse_path(&segments("computer/slave")),
			Some((0, "slave".to_string()))
		);
	}

	#[test]
	fn test_fixup_renames_view() {
		let dest = Destination::new("http://h/", "outer/inner");
		let xml = "<hudson.model.ListView><name>src</name><jobNames/></hudson.model.ListView>";
		assert_eq!(
			EntityKind::View.fixup(xml, &dest),
			"<hudson.model.ListView><name>inner</name><jobNames/></hudson.model.ListView>"
		);
	}

	#[test]
	fn test_fixup_leaves_job_and_nameless_configs() {
		let dest = Destination::new("http://h/", "dst");
		assert_eq!(EntityKind::Job.fixup("<project><name>x</name></project>", &dest), "<project><name>x</name></project>");
		assert_eq!(EntityKind::Node.fixup("node-configuration", &dest), "node-configuration");
	}

	#[test]
	fn test_fixup_escapes_name() {
		let dest = Destination::new("http://h/", "a&b");
		assert_eq!(EntityKind::Node.fixup("<slave><name>s</name></slave>", &dest), "<slave><name>a&amp;b</name></slave>");
	}

	#[test]
	fn test_kind_from_str() {
		assert_eq!("Job".parse::<EntityKind>(), Ok(EntityKind::Job));
		assert_eq!("computer".parse::<EntityKind>(), Ok(EntityKind::Node));
		assert!("folder".parse::<EntityKind>().is_err());
	}
}

// vim: ts=4
