use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use cgt_cli::CgtCli;
use cgt_cli::Commands;
use cgt_cli::OutputFormat;
use cgt_core::CgtConfig;
use cgt_core::CompilerArgs;
use cgt_core::RenderOptions;
use cgt_core::SubstituteOptions;
use cgt_core::Variables;
use cgt_core::filter_text;
use cgt_core::render_source;
use cgt_core::substitute_with_options;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = CgtCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Substitute {
			file,
			lenient,
			output,
		}) => run_substitute(&args, file, *lenient, output.as_deref()),
		Some(Commands::Filter { file, output }) => run_filter(&args, file, output.as_deref()),
		Some(Commands::Render {
			file,
			lenient,
			output,
		}) => run_render(&args, file, *lenient, output.as_deref()),
		Some(Commands::Args {
			format,
			args: compiler_args,
		}) => run_args(compiler_args, *format),
		None => {
			eprintln!("No subcommand specified. Run `cgt --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<cgt_core::CgtError>() {
			Ok(cgt_err) => {
				let report: miette::Report = (*cgt_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &CgtCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load `cgt.toml` (if any) and layer `-D` definitions over its variables.
fn load_context(args: &CgtCli) -> Result<(CgtConfig, Variables), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = CgtConfig::load(&root)?.unwrap_or_default();
	let mut variables = config.variables.clone();

	for definition in &args.defines {
		let (name, value) = Variables::parse_definition(definition);
		variables.define(name, value);
	}

	if args.verbose {
		tracing::debug!(
			root = %root.display(),
			variables = variables.len(),
			"loaded variables"
		);
	}

	Ok((config, variables))
}

fn substitute_options(args: &CgtCli, config: &CgtConfig, lenient: bool) -> SubstituteOptions {
	let options = config.substitute.to_options().with_verbose(args.verbose);
	if lenient {
		options.with_require_resolved(false)
	} else {
		options
	}
}

/// Read the input file, with `-` meaning stdin.
fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
	if path == Path::new("-") {
		let mut content = String::new();
		std::io::stdin().read_to_string(&mut content)?;
		return Ok(content);
	}

	Ok(std::fs::read_to_string(path)?)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
	let Some(path) = output else {
		print!("{content}");
		if !content.is_empty() && !content.ends_with('\n') {
			println!();
		}
		return Ok(());
	};

	let mut content = content.to_string();
	if !content.is_empty() && !content.ends_with('\n') {
		content.push('\n');
	}

	std::fs::write(path, content)?;
	eprintln!("Wrote {}", path.display());
	Ok(())
}

fn run_substitute(
	args: &CgtCli,
	file: &Path,
	lenient: bool,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let (config, variables) = load_context(args)?;
	let template = read_input(file)?;
	let options = substitute_options(args, &config, lenient);
	let result = substitute_with_options(&template, &variables, &options)?;

	write_output(output, &result)
}

fn run_filter(
	args: &CgtCli,
	file: &Path,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let (config, variables) = load_context(args)?;
	let source = read_input(file)?;
	let lines = filter_text(&source, &variables, &config.comments)?;

	write_output(output, &lines.join("\n"))
}

fn run_render(
	args: &CgtCli,
	file: &Path,
	lenient: bool,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let (config, variables) = load_context(args)?;
	let source = read_input(file)?;
	let options = RenderOptions {
		substitute: substitute_options(args, &config, lenient),
		comments: config.comments.clone(),
	};
	let result = render_source(&source, &variables, &options)?;

	write_output(output, &result)
}

fn print_section(title: &str) {
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("  {label:<26} {value}");
}

fn print_list(title: &str, values: &[String]) {
	if values.is_empty() {
		return;
	}

	print_section(title);
	for value in values {
		println!("  {value}");
	}
}

fn run_args(compiler_args: &[String], format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let parsed = CompilerArgs::parse(compiler_args)?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&parsed)?);
		}
		OutputFormat::Text => {
			if !parsed.defines.is_empty() {
				print_section("Defines");
				for (name, value) in parsed.defines.iter() {
					print_field(name, value);
				}
			}
			print_list("Files", &parsed.files);
			print_list("Header paths", &parsed.header_paths);
			print_list("Library paths", &parsed.library_paths);
			print_list("Libraries", &parsed.libraries);
			print_list("Warnings", &parsed.warnings);
			print_list("Flags", &parsed.flags);
			print_list("Compiler arguments", &parsed.compiler_args);
		}
	}

	Ok(())
}
