use std::collections::BTreeSet;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::CgtError;
use crate::CgtResult;
use crate::Variables;
use crate::lexer::Placeholder;
use crate::lexer::scan_placeholders;

/// Default upper bound on successful substitutions for one template.
pub const DEFAULT_MAX_PASSES: usize = 1024;

/// Controls how [`substitute_with_options`] treats placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstituteOptions {
	/// Fail when placeholders remain after substitution.
	pub require_resolved: bool,
	/// Log each substitution step at `debug` level.
	pub verbose: bool,
	/// Maximum number of substitutions before giving up. Guards against
	/// values that keep re-introducing their own placeholder.
	pub max_passes: usize,
}

impl Default for SubstituteOptions {
	fn default() -> Self {
		Self {
			require_resolved: true,
			verbose: false,
			max_passes: DEFAULT_MAX_PASSES,
		}
	}
}

impl SubstituteOptions {
	/// Options that leave unresolved placeholders in place instead of failing.
	pub fn lenient() -> Self {
		Self {
			require_resolved: false,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_require_resolved(mut self, require_resolved: bool) -> Self {
		self.require_resolved = require_resolved;
		self
	}

	#[must_use]
	pub fn with_verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}

	#[must_use]
	pub fn with_max_passes(mut self, max_passes: usize) -> Self {
		self.max_passes = max_passes;
		self
	}
}

/// Replace every placeholder in `template` with its value from `variables`,
/// failing if any placeholder is left unresolved.
///
/// ```rust
/// use cgt_core::Variables;
/// use cgt_core::substitute;
///
/// let variables = Variables::from([("name", "World")]);
/// let text = substitute("Hello, ${name}!", &variables).unwrap();
/// assert_eq!(text, "Hello, World!");
/// ```
pub fn substitute(template: &str, variables: &Variables) -> CgtResult<String> {
	substitute_with_options(template, variables, &SubstituteOptions::default())
}

/// Replace placeholders in `template` until no bound placeholder remains.
///
/// Values may contain placeholders themselves; after each successful
/// replacement the template is scanned again from the top. All occurrences of
/// the same placeholder text are replaced together.
pub fn substitute_with_options(
	template: &str,
	variables: &Variables,
	options: &SubstituteOptions,
) -> CgtResult<String> {
	if options.verbose {
		tracing::debug!("applying placeholders to template");
	}

	let mut template = template.to_string();
	let mut visited: HashSet<String> = HashSet::new();
	let mut passes = 0;

	while let Some(next) = next_substitution(&template, variables, &mut visited, options)? {
		passes += 1;
		if passes > options.max_passes {
			return Err(CgtError::SubstitutionLimitExceeded {
				limit: options.max_passes,
				template,
			});
		}

		template = next;
		visited.clear();
	}

	if options.require_resolved {
		let remaining = scan_placeholders(&template);
		if !remaining.is_empty() {
			let names: BTreeSet<&str> = remaining.iter().map(|placeholder| placeholder.name).collect();
			let names = names.into_iter().map(String::from).collect();

			return Err(CgtError::UnresolvedPlaceholder {
				names,
				variables: variables.names(),
				template,
			});
		}
	}

	Ok(template)
}

/// Find the first unvisited placeholder with a bound value and return the
/// template with it applied. Returns `None` when nothing is left to do.
fn next_substitution(
	template: &str,
	variables: &Variables,
	visited: &mut HashSet<String>,
	options: &SubstituteOptions,
) -> CgtResult<Option<String>> {
	for placeholder in scan_placeholders(template) {
		if visited.contains(placeholder.name) {
			continue;
		}

		let Some(value) = variables.get(placeholder.name) else {
			visited.insert(placeholder.name.to_string());
			continue;
		};

		let replaced = apply_placeholder(template, &placeholder, value, options.verbose)?;

		// A value that expands to its own placeholder makes no progress.
		if replaced == template {
			visited.insert(placeholder.name.to_string());
			continue;
		}

		return Ok(Some(replaced));
	}

	Ok(None)
}

fn apply_placeholder(
	template: &str,
	placeholder: &Placeholder<'_>,
	value: &str,
	verbose: bool,
) -> CgtResult<String> {
	if placeholder.options.non_empty && value.is_empty() {
		return Err(CgtError::EmptyValue(placeholder.name.to_string()));
	}

	let mut lines = trim_blank_lines(value);

	if lines.is_empty() && placeholder.options.no_empty_line {
		if let Some(line) = sole_line_range(template, placeholder) {
			if verbose {
				tracing::debug!(
					line = &template[line.start..line.end],
					placeholder = placeholder.raw,
					"removing empty line"
				);
			}

			let mut result = String::with_capacity(template.len());
			result.push_str(&template[..line.start]);
			result.push_str(&template[line.end..]);
			return Ok(result);
		}

		if verbose {
			tracing::debug!(placeholder = placeholder.raw, "replacing with empty");
		}
		return Ok(template.replace(placeholder.raw, ""));
	}

	if placeholder.options.keep_indent {
		if let Some(indent) = placeholder.indent {
			lines = lines
				.iter()
				.enumerate()
				.map(|(index, line)| {
					if index == 0 {
						(*line).to_string()
					} else {
						format!("{indent}{line}")
					}
				})
				.collect();
		}
	}

	let value = lines.join("\n");
	if verbose {
		tracing::debug!(placeholder = placeholder.raw, value = value.as_str(), "replacing");
	}

	Ok(template.replace(placeholder.raw, &value))
}

/// Split `value` into lines, dropping whitespace-only lines at both edges.
fn trim_blank_lines(value: &str) -> Vec<String> {
	let lines: Vec<&str> = value.split('\n').collect();
	let start = lines
		.iter()
		.position(|line| !line.trim().is_empty())
		.unwrap_or(lines.len());
	let end = lines
		.iter()
		.rposition(|line| !line.trim().is_empty())
		.map_or(start, |index| index + 1);

	lines[start..end.max(start)]
		.iter()
		.map(|line| (*line).to_string())
		.collect()
}

/// When the placeholder is the only non-whitespace content on its line,
/// return the byte range of that line including its trailing line break.
fn sole_line_range(
	template: &str,
	placeholder: &Placeholder<'_>,
) -> Option<std::ops::Range<usize>> {
	let start = placeholder.range.start;
	let end = placeholder.range.end;
	let line_start = template[..start].rfind('\n').map_or(0, |index| index + 1);
	let line_end = template[end..]
		.find('\n')
		.map_or(template.len(), |index| end + index);

	if !is_blank(&template[line_start..start]) || !is_blank(&template[end..line_end]) {
		return None;
	}

	let remove_end = (line_end + 1).min(template.len());
	Some(line_start..remove_end)
}

fn is_blank(text: &str) -> bool {
	text.chars().all(|c| matches!(c, ' ' | '\t' | '\r'))
}
