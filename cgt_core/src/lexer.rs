use std::fmt;
use std::ops::Range;

use logos::Logos;

/// Raw tokens produced by logos for flat tokenization of template text.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[regex(r"\$\{[a-zA-Z0-9_]+(:[a-zA-Z_,\-]+)*\}")]
	Placeholder,
	#[regex(r"[ \t]+")]
	Indent,
	#[token("$")]
	Dollar,
	#[regex(r"[^ \t$]+")]
	Text,
}

/// A formatting flag attached to a placeholder, e.g. `${body:keep_indent}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderOption {
	/// Re-indent every value line after the first with the whitespace found
	/// directly before the placeholder.
	KeepIndent,
	/// Fail when the bound value is the empty string.
	NonEmpty,
	/// Remove the placeholder's whole line when the value is blank and the
	/// placeholder is the only content on that line.
	NoEmptyLine,
}

impl PlaceholderOption {
	/// Resolve an option name. `empty_no_line` and `empty-suppress-line` are
	/// accepted as alternative spellings of `no_empty_line`.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"keep_indent" => Some(Self::KeepIndent),
			"non_empty" => Some(Self::NonEmpty),
			"no_empty_line" | "empty_no_line" | "empty-suppress-line" => Some(Self::NoEmptyLine),
			_ => None,
		}
	}
}

impl fmt::Display for PlaceholderOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::KeepIndent => "keep_indent",
			Self::NonEmpty => "non_empty",
			Self::NoEmptyLine => "no_empty_line",
		};
		write!(f, "{name}")
	}
}

/// The set of options parsed from a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderOptions {
	pub keep_indent: bool,
	pub non_empty: bool,
	pub no_empty_line: bool,
}

impl PlaceholderOptions {
	fn insert(&mut self, option: PlaceholderOption) {
		match option {
			PlaceholderOption::KeepIndent => self.keep_indent = true,
			PlaceholderOption::NonEmpty => self.non_empty = true,
			PlaceholderOption::NoEmptyLine => self.no_empty_line = true,
		}
	}

	pub fn contains(&self, option: PlaceholderOption) -> bool {
		match option {
			PlaceholderOption::KeepIndent => self.keep_indent,
			PlaceholderOption::NonEmpty => self.non_empty,
			PlaceholderOption::NoEmptyLine => self.no_empty_line,
		}
	}
}

/// A placeholder found in a template, borrowing from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
	/// Byte range of the `${...}` text, excluding any indent.
	pub range: Range<usize>,
	/// The exact placeholder text, e.g. `${body:keep_indent}`.
	pub raw: &'a str,
	/// The variable name.
	pub name: &'a str,
	/// Spaces and tabs immediately before the placeholder.
	pub indent: Option<&'a str>,
	pub options: PlaceholderOptions,
}

/// Find every placeholder in `template`, in source order.
pub fn scan_placeholders(template: &str) -> Vec<Placeholder<'_>> {
	let mut placeholders = Vec::new();
	let mut indent: Option<Range<usize>> = None;

	for (token, span) in RawToken::lexer(template).spanned() {
		match token {
			Ok(RawToken::Placeholder) => {
				let raw = &template[span.clone()];
				let preceding = indent
					.take()
					.filter(|range| range.end == span.start)
					.map(|range| &template[range]);
				placeholders.push(parse_placeholder(raw, span, preceding));
			}
			Ok(RawToken::Indent) => indent = Some(span),
			Ok(RawToken::Dollar | RawToken::Text) | Err(()) => indent = None,
		}
	}

	placeholders
}

/// Returns true when `template` contains at least one placeholder.
pub fn has_placeholders(template: &str) -> bool {
	template.contains("${")
		&& RawToken::lexer(template).any(|token| token == Ok(RawToken::Placeholder))
}

fn parse_placeholder<'a>(
	raw: &'a str,
	range: Range<usize>,
	indent: Option<&'a str>,
) -> Placeholder<'a> {
	// The lexer guarantees the `${` prefix and `}` suffix.
	let inner = &raw[2..raw.len() - 1];
	let mut parts = inner.split(':');
	let name = parts.next().unwrap_or_default();
	let mut options = PlaceholderOptions::default();

	for option_name in parts.flat_map(|group| group.split(',')) {
		if option_name.is_empty() {
			continue;
		}

		match PlaceholderOption::from_name(option_name) {
			Some(option) => options.insert(option),
			None => tracing::trace!(placeholder = raw, option = option_name, "ignoring unknown option"),
		}
	}

	Placeholder {
		range,
		raw,
		name,
		indent,
		options,
	}
}
