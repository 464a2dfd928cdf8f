//! Destination parsing
//!
//! A destination is a server endpoint plus the path of one entity on it.
//! Locations are accepted in two notations:
//!
//! - a browsable URL carrying a kind marker, e.g. `http://ci/jenkins/view/a/view/b`
//! - an explicit `<endpoint>::<entity>` pair, e.g. `http://ci/jenkins/::a/b`
//!
//! Parsing never touches the network.

use std::borrow::Cow;
use std::fmt;
use url::Url;

use crate::kind::EntityKind;
use crate::validation::ValidationError;

/// Separator between endpoint and literal entity id
pub const ENTITY_SEPARATOR: &str = "::";

/// Server endpoint and entity path of one clone source or target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
	endpoint: String,
	entity: String,
}

impl Destination {
	/// Build a destination from already split parts; the endpoint gets its trailing slash
	pub fn new(endpoint: &str, entity: &str) -> Self {
		let mut endpoint = endpoint.to_string();
		if !endpoint.ends_with('/') {
			endpoint.push('/');
		}
		Destination { endpoint, entity: entity.to_string() }
	}

	/// Parse a single location that must name an entity
	pub fn parse(location: &str, kind: EntityKind) -> Result<Self, ValidationError> {
		let (endpoint, entity) = parse_location(location, kind)?;
		let entity = entity.ok_or_else(|| invalid(location, &missing_entity(kind)))?;
		Ok(Destination { endpoint, entity })
	}

	/// Base URL of the server, always ending with `/`
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Kind-specific entity path (job name, nested view path, node name)
	pub fn entity(&self) -> &str {
		&self.entity
	}
}

impl fmt::Display for Destination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.endpoint, ENTITY_SEPARATOR, self.entity)
	}
}

/// Parse clone locations into a source and its destinations.
///
/// Requires at least two pairwise distinct locations. The first one is the
/// source and must name an entity; destinations that only name a server
/// reuse the source's entity path. Destination order follows input order.
pub fn parse_locations<S: AsRef<str>>(
	locations: &[S],
	kind: EntityKind,
) -> Result<(Destination, Vec<Destination>), ValidationError> {
	if locations.len() < 2 {
		return Err(ValidationError::Arguments(format!(
			"Expected a source and at least one destination, got {} location(s)",
			locations.len()
		)));
	}

	for (i, location) in locations.iter().enumerate() {
		let location = location.as_ref();
		if locations[..i].iter().any(|other| other.as_ref() == location) {
			return Err(ValidationError::Arguments(format!(
				"Location '{}' given more than once",
				location
			)));
		}
	}

	let source = Destination::parse(locations[0].as_ref(), kind)?;
	let destinations = locations[1..]
		.iter()
		.map(|location| {
			let (endpoint, entity) = parse_location(location.as_ref(), kind)?;
			Ok(Destination {
				endpoint,
				entity: entity.unwrap_or_else(|| source.entity.clone()),
			})
		})
		.collect::<Result<Vec<_>, ValidationError>>()?;

	Ok((source, destinations))
}

/// Split a location into its normalized endpoint and, when present, the entity path
fn parse_location(
	location: &str,
	kind: EntityKind,
) -> Result<(String, Option<String>), ValidationError> {
	if let Some((endpoint, entity)) = split_separator(location) {
		if entity.is_empty() {
			return Err(invalid(location, "nothing follows the '::' separator"));
		}
		let url = parse_endpoint_url(location, endpoint)?;
		let segments = path_segments(&url);
		return Ok((endpoint_string(&url, &segments), Some(entity.to_string())));
	}

	let url = parse_endpoint_url(location, location)?;
	let segments = path_segments(&url);
	// Entity names are matched decoded; the endpoint keeps the raw segments
	let decoded = segments
		.iter()
		.map(|segment| {
			urlencoding::decode(segment)
				.map(Cow::into_owned)
				.map_err(|e| invalid(location, &format!("bad escape in '{}': {}", segment, e)))
		})
		.collect::<Result<Vec<String>, ValidationError>>()?;
	let decoded: Vec<&str> = decoded.iter().map(String::as_str).collect();
	match kind.parse_path(&decoded) {
		Some((marker_at, entity)) => {
			Ok((endpoint_string(&url, &segments[..marker_at]), Some(entity)))
		}
		None => Ok((endpoint_string(&url, &segments), None)),
	}
}

/// Find the `::` separator outside of the scheme, an IPv6 host literal and the query or fragment
fn split_separator(location: &str) -> Option<(&str, &str)> {
	let authority = location.find("://").map_or(0, |i| i + 3);
	let search_from = if location[authority..].starts_with('[') {
		location[authority..].find(']').map_or(authority, |i| authority + i + 1)
	} else {
		authority
	};

	let search_to = location[search_from..]
		.find(|c: char| c == '?' || c == '#')
		.map_or(location.len(), |i| search_from + i);

	location[search_from..search_to].find(ENTITY_SEPARATOR).map(|i| {
		let at = search_from + i;
		(&location[..at], &location[at + ENTITY_SEPARATOR.len()..])
	})
}

fn parse_endpoint_url(location: &str, endpoint: &str) -> Result<Url, ValidationError> {
	let url = Url::parse(endpoint).map_err(|e| invalid(location, &e.to_string()))?;
	match url.host_str() {
		Some(host) if !host.is_empty() => Ok(url),
		_ => Err(invalid(location, "URL has no host")),
	}
}

fn path_segments(url: &Url) -> Vec<&str> {
	let mut segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
	while segments.last().map_or(false, |s| s.is_empty()) {
		segments.pop();
	}
	segments
}

/// Rebuild the endpoint from the URL origin and the given path prefix
fn endpoint_string(url: &Url, prefix: &[&str]) -> String {
	let mut endpoint = url.clone();
	endpoint.set_query(None);
	endpoint.set_fragment(None);

	let mut path = String::from("/");
	for segment in prefix.iter().filter(|s| !s.is_empty()) {
		path.push_str(segment);
		path.push('/');
	}
	endpoint.set_path(&path);
	endpoint.to_string()
}

fn missing_entity(kind: EntityKind) -> String {
	format!(
		"no {} found; use .../{}/<name> or <url>{}<name>",
		kind,
		kind.marker(),
		ENTITY_SEPARATOR
	)
}

fn invalid(location: &str, reason: &str) -> ValidationError {
	ValidationError::Location { location: location.to_string(), reason: reason.to_string() }
}


// vim: ts=4
