//! Location parsing tests
//!
//! Valid and invalid argument lists for each entity kind, mirroring what a
//! user types on the command line.

use config_cloner::{parse_locations, Destination, EntityKind, ValidationError};

fn dest(endpoint: &str, entity: &str) -> Destination {
	Destination::new(endpoint, entity)
}

fn parse(kind: EntityKind, args: &[&str]) -> Result<Vec<Destination>, ValidationError> {
	let (source, destinations) = parse_locations(args, kind)?;
	let mut all = vec![source];
	all.extend(destinations);
	Ok(all)
}

// ===================================================================
// Invalid argument lists
// ===================================================================

#[test]
fn test_fail_with_incorrect_arguments() {
	let invalid: &[&[&str]] = &[
		// invalid count
		&[],
		&["http://jenki.ns/view/a"],
		// same url
		&["http://jenki.ns", "http://jenki.ns"],
		&["http://jenki.ns/view/a", "http://jenki.ns/view/a"],
		&["http://jenki.ns/view/a", "http://other/view/b", "http://jenki.ns/view/a"],
		// not an url
		&["not-an-url", "http://jenki.ns"],
		&["http://jenki.ns/view/a", "not-an-url"],
		&["not-an-url", "not-an-url"],
		// source without a view
		&["http://jenki.ns/", "http://other/view/b"],
	];

	for args in invalid {
		assert!(parse(EntityKind::View, args).is_err(), "{:?} should be rejected", args);
	}
}

#[test]
fn test_errors_name_the_location() {
	let err = parse(EntityKind::Job, &["http://a/job/x", "not-an-url"]).unwrap_err();
	assert!(err.to_string().contains("not-an-url"));

	let err = parse(EntityKind::Job, &["http://a/job/x", "http://a/job/x"]).unwrap_err();
	assert!(matches!(err, ValidationError::Arguments(_)));
}

// ===================================================================
// Valid argument lists
// ===================================================================

#[test]
fn test_parse_valid_view_destinations() {
	let cases: Vec<(Vec<&str>, Vec<Destination>)> = vec![
		(
			vec!["http://1.jnk.ns/view/a", "http://2.jnk.ns/"],
			vec![dest("http://1.jnk.ns/", "a"), dest("http://2.jnk.ns/", "a")],
		),
		(
			vec!["http://1.jnk.ns/view/a/", "http://2.jnk.ns/view/b"],
			vec![dest("http://1.jnk.ns/", "a"), dest("http://2.jnk.ns/", "b")],
		),
		(
			vec!["http://1.jnk.ns/jenkins/view/viewname", "http://2.jnk.ns/infra/hudson/view/name/some_tail"],
			vec![dest("http://1.jnk.ns/jenkins/", "viewname"), dest("http://2.jnk.ns/infra/hudson/", "name")],
		),
		(
			vec!["http://1.jnk.ns/view/src", "http://2.jnk.ns/view/dst1", "http://3.jnk.ns/view/dst2"],
			vec![
				dest("http://1.jnk.ns/", "src"),
				dest("http://2.jnk.ns/", "dst1"),
				dest("http://3.jnk.ns/", "dst2"),
			],
		),
		// nested views
		(
			vec!["http://1.jnk.ns/jenkins/view/a/view/b", "http://2.jnk.ns/infra/hudson/view/c/view/d/view/e"],
			vec![dest("http://1.jnk.ns/jenkins/", "a/b"), dest("http://2.jnk.ns/infra/hudson/", "c/d/e")],
		),
	];

	for (args, expected) in cases {
		assert_eq!(parse(EntityKind::View, &args).unwrap(), expected, "parsing {:?}", args);
	}
}

#[test]
fn test_parse_jobs_and_nodes() {
	assert_eq!(
		parse(EntityKind::Job, &["http://ci/job/src_job", "http://ci/job/dst_job"]).unwrap(),
		vec![dest("http://ci/", "src_job"), dest("http://ci/", "dst_job")]
	);
	assert_eq!(
		parse(EntityKind::Node, &["http://ci/computer/src_slave", "http://ci/computer/dst_slave/"]).unwrap(),
		vec![dest("http://ci/", "src_slave"), dest("http://ci/", "dst_slave")]
	);
}

#[test]
fn test_escaped_names_from_browser_urls() {
	assert_eq!(
		parse(EntityKind::Job, &["http://ci/job/my%20job", "http://other/"]).unwrap(),
		vec![dest("http://ci/", "my job"), dest("http://other/", "my job")]
	);
	assert_eq!(
		parse(EntityKind::View, &["http://ci/view/a%2Bb/view/c", "http://other/view/d"]).unwrap(),
		vec![dest("http://ci/", "a+b/c"), dest("http://other/", "d")]
	);
}

#[test]
fn test_double_colon_notation() {
	let url = "http://localhost:8080/jenkins/";
	let args = [format!("{}::src_view", url), format!("{}::dst_view", url)];

	let (source, destinations) = parse_locations(&args, EntityKind::View).unwrap();
	assert_eq!(source, dest(url, "src_view"));
	assert_eq!(destinations, vec![dest(url, "dst_view")]);
}

#[test]
fn test_destination_order_is_preserved() {
	let args = ["http://a/job/x", "http://d/", "http://b/", "http://c/"];
	let (_, destinations) = parse_locations(&args, EntityKind::Job).unwrap();
	let endpoints: Vec<&str> = destinations.iter().map(|d| d.endpoint()).collect();
	assert_eq!(endpoints, vec!["http://d/", "http://b/", "http://c/"]);
}

// vim: ts=4
