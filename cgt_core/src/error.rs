use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CgtError {
	#[error(transparent)]
	#[diagnostic(code(cgt::io_error))]
	Io(#[from] std::io::Error),

	#[error("template placeholders not filled: {}", names.join(", "))]
	#[diagnostic(
		code(cgt::unresolved_placeholder),
		help("define the missing variables or run the substitution in lenient mode")
	)]
	UnresolvedPlaceholder {
		/// Distinct unresolved placeholder names, sorted.
		names: Vec<String>,
		/// Names of the variables that were available, sorted.
		variables: Vec<String>,
		/// The template as it was after substitution stopped.
		template: String,
	},

	#[error("template variable `{0}` is empty")]
	#[diagnostic(
		code(cgt::empty_value),
		help("the placeholder is marked `non_empty`; provide a non-empty value for `{0}`")
	)]
	EmptyValue(String),

	#[error("placeholder substitution did not settle after {limit} passes")]
	#[diagnostic(
		code(cgt::substitution_limit),
		help("a variable value probably re-introduces its own placeholder")
	)]
	SubstitutionLimitExceeded { limit: usize, template: String },

	#[error("unbalanced `{directive}` on line {line}")]
	#[diagnostic(
		code(cgt::unbalanced_directive),
		help("every `#else` and `#endif` needs a matching `#if`, `#ifdef` or `#ifndef`")
	)]
	UnbalancedDirective { directive: String, line: usize },

	#[error("no prefix specified for `{0}`")]
	#[diagnostic(
		code(cgt::missing_include_prefix),
		help("pass `-iprefix <path>` before any `-iwithprefixbefore`")
	)]
	MissingIncludePrefix(String),

	#[error("missing value for compiler argument `{0}`")]
	#[diagnostic(code(cgt::missing_argument_value))]
	MissingArgumentValue(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(cgt::config_parse),
		help("check that cgt.toml is valid TOML with [variables], [substitute] and/or [comments] sections")
	)]
	ConfigParse(String),
}

pub type CgtResult<T> = Result<T, CgtError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
