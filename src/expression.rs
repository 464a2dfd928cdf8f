//! Text transforms applied to configurations before they are sent
//!
//! The transfer engine only knows the [`Transform`] trait. [`SedExpression`]
//! is the implementation behind `--expression`: a sed-like
//! `s/regex/replacement/flags` substitution over the whole payload.

use regex::{Regex, RegexBuilder};

use crate::validation::ValidationError;

/// Total string-to-string rewrite of a configuration payload
pub trait Transform: Send + Sync {
	fn apply(&self, text: &str) -> String;
}

impl<F> Transform for F
where
	F: Fn(&str) -> String + Send + Sync,
{
	fn apply(&self, text: &str) -> String {
		self(text)
	}
}

/// Apply `transforms` to `text` in order
pub fn apply_all(text: &str, transforms: &[Box<dyn Transform>]) -> String {
	transforms.iter().fold(text.to_string(), |acc, t| t.apply(&acc))
}

/// `s<d>regex<d>replacement<d>flags` substitution
///
/// Any single character may serve as delimiter `<d>` and can be escaped with a
/// backslash inside the pattern or replacement. In the replacement `&` stands
/// for the whole match and `\1`..`\9` for capture groups. Flags: `g` replaces
/// every match instead of the first, `i` matches case-insensitively.
#[derive(Debug, Clone)]
pub struct SedExpression {
	regex: Regex,
	replacement: String,
	global: bool,
}

impl SedExpression {
	pub fn parse(expression: &str) -> Result<Self, ValidationError> {
		let invalid = |reason: &str| ValidationError::Expression {
			expression: expression.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = expression.chars();
		if chars.next() != Some('s') {
			return Err(invalid("only s/regex/replacement/ substitutions are supported"));
		}
		let delimiter = match chars.next() {
			Some(c) if c != '\\' && c != '\n' && !c.is_alphanumeric() => c,
			_ => return Err(invalid("missing or unusable delimiter after 's'")),
		};

		let parts = split_unescaped(chars.as_str(), delimiter);
		let [pattern, replacement, flags] = match <[String; 3]>::try_from(parts) {
			Ok(parts) => parts,
			Err(_) => {
				return Err(invalid(&format!("expected s{0}regex{0}replacement{0}flags", delimiter)))
			}
		};

		let mut global = false;
		let mut case_insensitive = false;
		for flag in flags.chars() {
			match flag {
				'g' => global = true,
				'i' | 'I' => case_insensitive = true,
				other => return Err(invalid(&format!("unsupported flag '{}'", other))),
			}
		}

		let regex = RegexBuilder::new(&pattern)
			.case_insensitive(case_insensitive)
			.build()
			.map_err(|e| invalid(&e.to_string()))?;

		Ok(SedExpression { regex, replacement: translate_replacement(&replacement), global })
	}
}

impl Transform for SedExpression {
	fn apply(&self, text: &str) -> String {
		let limit = if self.global { 0 } else { 1 };
		self.regex.replacen(text, limit, self.replacement.as_str()).into_owned()
	}
}

/// Split on unescaped `delimiter`, dropping the backslash of `\<delimiter>`
fn split_unescaped(text: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = text.chars().peekable();
	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == '\\' {
			current.push(c);
			if let Some(next) = chars.next() {
				current.push(next);
			}
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}
	parts.push(current);
	parts
}

/// Turn sed replacement syntax into `regex` replacement syntax
fn translate_replacement(replacement: &str) -> String {
	let mut out = String::with_capacity(replacement.len());
	let mut chars = replacement.chars();
	while let Some(c) = chars.next() {
		match c {
			'$' => out.push_str("$$"),
			'&' => out.push_str("${0}"),
			'\\' => match chars.next() {
				Some(d) if d.is_ascii_digit() => {
					out.push_str("${");
					out.push(d);
					out.push('}');
				}
				Some('n') => out.push('\n'),
				Some('t') => out.push('\t'),
				Some('$') => out.push_str("$$"),
				Some(other) => out.push(other),
				None => out.push('\\'),
			},
			_ => out.push(c),
		}
	}
	out
}


// vim: ts=4
