use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CgtError;
use crate::CgtResult;
use crate::CommentSyntax;
use crate::DEFAULT_MAX_PASSES;
use crate::SubstituteOptions;
use crate::Variables;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["cgt.toml", ".cgt.toml", ".config/cgt.toml"];

/// Configuration loaded from a `cgt.toml` file.
///
/// ```toml
/// [variables]
/// namespace = "Tiny::"
/// py_type_name = "Vector3"
///
/// [substitute]
/// require_resolved = true
/// max_passes = 1024
///
/// [comments]
/// line = "//"
/// block_open = "/*"
/// block_close = "*/"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CgtConfig {
	/// Variables available to every template and initial definitions for the
	/// source filter.
	#[serde(default)]
	pub variables: Variables,
	/// Placeholder substitution settings.
	#[serde(default)]
	pub substitute: SubstituteConfig,
	/// Comment markers stripped by the source filter.
	#[serde(default)]
	pub comments: CommentSyntax,
}

/// The `[substitute]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SubstituteConfig {
	/// Fail when placeholders remain unresolved. Defaults to `true`.
	#[serde(default = "default_require_resolved")]
	pub require_resolved: bool,
	/// Upper bound on substitutions per template.
	#[serde(default = "default_max_passes")]
	pub max_passes: usize,
}

impl Default for SubstituteConfig {
	fn default() -> Self {
		Self {
			require_resolved: default_require_resolved(),
			max_passes: default_max_passes(),
		}
	}
}

fn default_require_resolved() -> bool {
	true
}

fn default_max_passes() -> usize {
	DEFAULT_MAX_PASSES
}

impl SubstituteConfig {
	pub fn to_options(self) -> SubstituteOptions {
		SubstituteOptions::default()
			.with_require_resolved(self.require_resolved)
			.with_max_passes(self.max_passes)
	}
}

impl CgtConfig {
	/// Return the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from `root`. Returns `Ok(None)` when no config file is
	/// present.
	pub fn load(root: &Path) -> CgtResult<Option<CgtConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> CgtResult<CgtConfig> {
		toml::from_str(content).map_err(|e| CgtError::ConfigParse(e.to_string()))
	}
}
