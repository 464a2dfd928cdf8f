//! Recipes: several clone operations described in one TOML file
//!
//! ```toml
//! [properties]
//! url = "http://ci.example.com/"
//!
//! [[clone]]
//! kind = "job"
//! from = "${url}job/src_job"
//! to = ["${url}job/dst_job", "http://mirror.example.com/"]
//! force = true
//! expressions = ["s/src_job/dst_job/g"]
//! ```
//!
//! Every step is parsed and validated when the recipe is loaded, so a bad
//! step stops the run before any remote command is issued. At run time the
//! steps share one gateway, and with it one connection pool.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CloneError;
use crate::gateway::Gateway;
use crate::kind::EntityKind;
use crate::logging::*;
use crate::response::Response;
use crate::transfer::{Transfer, TransferRequest};
use crate::validation::ValidationError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeFile {
	#[serde(default)]
	properties: BTreeMap<String, String>,
	#[serde(default, rename = "clone")]
	steps: Vec<CloneStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CloneStep {
	kind: EntityKind,
	from: String,
	to: Targets,
	#[serde(default)]
	force: bool,
	#[serde(default)]
	expressions: Vec<String>,
}

/// `to = "..."` or `to = ["...", "..."]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Targets {
	One(String),
	Many(Vec<String>),
}

impl Targets {
	fn into_vec(self) -> Vec<String> {
		match self {
			Targets::One(target) => vec![target],
			Targets::Many(targets) => targets,
		}
	}
}

/// Validated sequence of clone operations
pub struct Recipe {
	steps: Vec<Transfer>,
}

impl Recipe {
	/// Read and validate a recipe file. `overrides` take precedence over `[properties]`.
	pub fn load(path: &Path, overrides: &[(String, String)]) -> Result<Self, CloneError> {
		let recipe_error =
			|message: String| CloneError::Recipe { path: path.display().to_string(), message };

		let text = std::fs::read_to_string(path).map_err(|e| recipe_error(e.to_string()))?;
		Self::parse(&text, overrides).map_err(|e| match e {
			ValidationError::Recipe(message) => recipe_error(message),
			other => CloneError::Validation(other),
		})
	}

	pub fn parse(text: &str, overrides: &[(String, String)]) -> Result<Self, ValidationError> {
		let file: RecipeFile =
			toml::from_str(text).map_err(|e| ValidationError::Recipe(e.to_string()))?;

		let mut properties = file.properties;
		for (key, value) in overrides {
			properties.insert(key.clone(), value.clone());
		}

		let steps = file
			.steps
			.into_iter()
			.enumerate()
			.map(|(i, step)| {
				let step_no = i + 1;
				let mut locations = vec![substitute(&step.from, &properties, step_no)?];
				for target in step.to.into_vec() {
					locations.push(substitute(&target, &properties, step_no)?);
				}
				let request =
					TransferRequest::parse(step.kind, &locations, step.force, &step.expressions)?;
				Ok(Transfer::new(request))
			})
			.collect::<Result<Vec<_>, ValidationError>>()?;

		Ok(Recipe { steps })
	}

	pub fn steps(&self) -> &[Transfer] {
		&self.steps
	}

	/// Run every step in order, merging each step's outcome into `response`.
	///
	/// A failed step does not stop the following ones; the run fails if any
	/// step failed.
	pub async fn run(&self, gateway: &mut Gateway<'_>, response: &mut Response) {
		for (i, step) in self.steps.iter().enumerate() {
			info!("Recipe step {}/{}", i + 1, self.steps.len());
			let mut step_response = response.child();
			step.run(gateway, &mut step_response).await;
			if !step_response.succeeded() {
				warn!("Recipe step {} failed with {}", i + 1, step_response.exit_code());
			}
			response.absorb(step_response);
		}
	}
}

/// Expand `${name}` references from `properties`
fn substitute(
	text: &str,
	properties: &BTreeMap<String, String>,
	step_no: usize,
) -> Result<String, ValidationError> {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;
	while let Some(start) = rest.find("${") {
		out.push_str(&rest[..start]);
		let after = &rest[start + 2..];
		let end = after.find('}').ok_or_else(|| {
			ValidationError::Recipe(format!("step {}: unterminated '${{' in '{}'", step_no, text))
		})?;
		let name = &after[..end];
		let value = properties.get(name).ok_or_else(|| {
			ValidationError::Recipe(format!("step {}: unknown property '{}'", step_no, name))
		})?;
		out.push_str(value);
		rest = &after[end + 1..];
	}
	out.push_str(rest);
	Ok(out)
}

/// Parse a `key=value` property override
pub fn parse_property(text: &str) -> Result<(String, String), ValidationError> {
	match text.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => {
			Ok((key.trim().to_string(), value.to_string()))
		}
		_ => Err(ValidationError::Recipe(format!("property '{}' is not key=value", text))),
	}
}


// vim: ts=4
