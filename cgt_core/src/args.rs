use std::collections::VecDeque;
use std::path::Path;

use serde::Serialize;

use crate::CgtError;
use crate::CgtResult;
use crate::SubstituteOptions;
use crate::Variables;
use crate::substitute_with_options;

/// Compiler-style arguments split into their roles.
///
/// ```rust
/// use cgt_core::CompilerArgs;
///
/// let args = CompilerArgs::parse(["-DROOT=/opt", "-I${ROOT}/include", "main.cpp"]).unwrap();
/// assert_eq!(args.header_paths, vec!["/opt/include"]);
/// assert_eq!(args.files, vec!["main.cpp"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompilerArgs {
	/// Positional arguments, usually source files.
	pub files: Vec<String>,
	/// `-DNAME[=VALUE]` definitions.
	pub defines: Variables,
	/// `-I` and `-iwithprefixbefore` include directories.
	pub header_paths: Vec<String>,
	/// `-L` library directories.
	pub library_paths: Vec<String>,
	/// `-l` libraries.
	pub libraries: Vec<String>,
	/// `-W` warning options without the `-W` prefix.
	pub warnings: Vec<String>,
	/// `-f` options, kept whole.
	pub flags: Vec<String>,
	/// Every other `-` option.
	pub compiler_args: Vec<String>,
}

impl CompilerArgs {
	/// Parse a flat argument list.
	///
	/// Placeholders inside define values and paths are resolved against the
	/// collected defines. Unresolved placeholders are left in place.
	pub fn parse<I, S>(args: I) -> CgtResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut parsed = Self::default();
		let mut prefix: Option<String> = None;
		let mut queue: VecDeque<String> = args
			.into_iter()
			.map(|arg| arg.as_ref().to_string())
			.collect();

		while let Some(arg) = queue.pop_front() {
			let arg = unquote(arg.trim());

			if let Some(definition) = arg.strip_prefix("-D") {
				let (name, value) = Variables::parse_definition(definition);
				parsed.defines.define(name, value);
			} else if let Some(value) = arg.strip_prefix("-iprefix") {
				prefix = Some(option_value(value, "-iprefix", &mut queue)?);
			} else if let Some(value) = arg.strip_prefix("-iwithprefixbefore") {
				let Some(prefix) = &prefix else {
					return Err(CgtError::MissingIncludePrefix("-iwithprefixbefore".to_string()));
				};
				let value = option_value(value, "-iwithprefixbefore", &mut queue)?;
				parsed
					.header_paths
					.push(Path::new(prefix).join(value).to_string_lossy().into_owned());
			} else if let Some(path) = arg.strip_prefix("-I") {
				parsed.header_paths.push(path.to_string());
			} else if let Some(path) = arg.strip_prefix("-L") {
				parsed.library_paths.push(path.to_string());
			} else if let Some(library) = arg.strip_prefix("-l") {
				parsed.libraries.push(library.to_string());
			} else if let Some(warning) = arg.strip_prefix("-W") {
				parsed.warnings.push(warning.to_string());
			} else if arg.starts_with("-f") {
				parsed.flags.push(arg.to_string());
			} else if arg.starts_with('-') {
				parsed.compiler_args.push(arg.to_string());
			} else {
				parsed.files.push(arg.to_string());
			}
		}

		parsed.resolve_placeholders()?;
		Ok(parsed)
	}

	/// Expand `${NAME}` placeholders in defines and paths using the defines as
	/// variables. Define values see the defines as they were collected.
	fn resolve_placeholders(&mut self) -> CgtResult<()> {
		let options = SubstituteOptions::lenient();
		let collected = self.defines.clone();

		for value in self.defines.values_mut() {
			*value = substitute_with_options(value, &collected, &options)?;
		}

		for path in self
			.header_paths
			.iter_mut()
			.chain(self.library_paths.iter_mut())
		{
			*path = substitute_with_options(path, &self.defines, &options)?;
		}

		Ok(())
	}
}

/// Take the value attached to `flag`, or the next argument when the flag
/// stands alone.
fn option_value(attached: &str, flag: &str, queue: &mut VecDeque<String>) -> CgtResult<String> {
	if !attached.trim().is_empty() {
		return Ok(unquote(attached).to_string());
	}

	let next = queue
		.pop_front()
		.ok_or_else(|| CgtError::MissingArgumentValue(flag.to_string()))?;
	Ok(unquote(next.trim()).to_string())
}

fn unquote(arg: &str) -> &str {
	if arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"') {
		&arg[1..arg.len() - 1]
	} else {
		arg
	}
}
