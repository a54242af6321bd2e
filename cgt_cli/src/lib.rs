use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Expand placeholders and filter conditional directives in code generation templates.",
	long_about = "cgt (code generation templates) assembles generated source code from \
	              templates.\n\nTemplates use `${name}` placeholders with optional formatting \
	              options (`keep_indent`, `non_empty`, `no_empty_line`). Source files can be \
	              filtered through `#ifdef`/`#ifndef`/`#else`/`#endif`/`#define` directives, which \
	              also strips comments and blank lines.\n\nQuick start:\n  cgt substitute \
	              template.cpp.in -D name=Vector3\n  cgt filter source.h -D WITH_PYTHON\n  cgt \
	              render binding.cpp.in -D WITH_PYTHON -D name=Vector3\n  cgt args -- \
	              -DROOT=/opt -I${ROOT}/include main.cpp"
)]
pub struct CgtCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `cgt.toml` is looked up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Define a variable as `NAME=VALUE`, or `NAME` for an empty value.
	/// Overrides `[variables]` from `cgt.toml`. Can be repeated.
	#[arg(long = "define", short = 'D', global = true, value_name = "NAME=VALUE")]
	pub defines: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Expand `${name}` placeholders in a template file.
	///
	/// Placeholders are resolved from `[variables]` in `cgt.toml` and `-D`
	/// definitions. Values may contain further placeholders. Fails when a
	/// placeholder is left unresolved unless `--lenient` is given.
	Substitute {
		/// Template file to expand, or `-` for stdin.
		file: PathBuf,

		/// Leave unresolved placeholders in place instead of failing.
		#[arg(long, default_value_t = false)]
		lenient: bool,

		/// Write the result to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Filter a source file through conditional directives.
	///
	/// Evaluates `#ifdef`, `#ifndef`, `#else`, `#endif` and `#define` against
	/// the configured variables, drops `#if <expr>` guards (their contents are
	/// always kept), strips comments and blank lines, and trims every retained
	/// line.
	Filter {
		/// Source file to filter, or `-` for stdin.
		file: PathBuf,

		/// Write the result to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Filter a template and then expand its placeholders.
	///
	/// `#define` directives found while filtering are available as variables
	/// during substitution.
	Render {
		/// Template file to render, or `-` for stdin.
		file: PathBuf,

		/// Leave unresolved placeholders in place instead of failing.
		#[arg(long, default_value_t = false)]
		lenient: bool,

		/// Write the result to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Parse compiler-style arguments into defines, paths and libraries.
	///
	/// Pass the compiler arguments after `--`. Placeholders inside define
	/// values and paths are resolved against the collected defines.
	Args {
		/// Output format for the parsed arguments.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// The compiler arguments to parse.
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		args: Vec<String>,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
