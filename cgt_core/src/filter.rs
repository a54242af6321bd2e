use serde::Deserialize;
use serde::Serialize;

use crate::CgtError;
use crate::CgtResult;
use crate::Variables;

/// Comment markers recognised by the source filter. An empty marker disables
/// that kind of comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSyntax {
	/// Marker starting a comment that runs to the end of the line.
	pub line: String,
	/// Marker opening a block comment.
	pub block_open: String,
	/// Marker closing a block comment.
	pub block_close: String,
}

impl Default for CommentSyntax {
	fn default() -> Self {
		Self::c_like()
	}
}

impl CommentSyntax {
	/// `//` line comments and `/* */` block comments.
	pub fn c_like() -> Self {
		Self {
			line: "//".to_string(),
			block_open: "/*".to_string(),
			block_close: "*/".to_string(),
		}
	}

	/// Leave comments untouched.
	pub fn none() -> Self {
		Self {
			line: String::new(),
			block_open: String::new(),
			block_close: String::new(),
		}
	}

	fn has_block_comments(&self) -> bool {
		!self.block_open.is_empty() && !self.block_close.is_empty()
	}
}

/// One level of conditional nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
	/// The tested symbol. `None` for `#if <expr>`, which is never evaluated.
	symbol: Option<String>,
	negate: bool,
	in_else: bool,
}

impl Frame {
	fn new(symbol: Option<&str>, negate: bool) -> Self {
		Self {
			symbol: symbol.map(String::from),
			negate,
			in_else: false,
		}
	}

	/// `#if` frames always pass, including in their `#else` branch.
	fn is_satisfied(&self, defines: &Variables) -> bool {
		match &self.symbol {
			Some(symbol) => defines.is_defined(symbol) != (self.negate ^ self.in_else),
			None => true,
		}
	}
}

/// A directive line recognised by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'a> {
	If,
	IfDef(&'a str),
	IfNDef(&'a str),
	Else,
	EndIf,
	Define { name: &'a str, value: &'a str },
}

impl<'a> Directive<'a> {
	/// Parse a trimmed line. Returns `None` for ordinary source lines.
	fn parse(line: &'a str) -> Option<Self> {
		let rest = line.strip_prefix('#')?;
		let word_end = rest
			.find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
			.unwrap_or(rest.len());
		let (word, tail) = rest.split_at(word_end);

		match word {
			"if" if tail.starts_with(char::is_whitespace) => Some(Self::If),
			"ifdef" => symbol_argument(tail).map(|(name, _)| Self::IfDef(name)),
			"ifndef" => symbol_argument(tail).map(|(name, _)| Self::IfNDef(name)),
			"else" => Some(Self::Else),
			"endif" => Some(Self::EndIf),
			"define" => {
				let (name, after) = symbol_argument(tail)?;
				if !after.is_empty() && !after.starts_with(char::is_whitespace) {
					// Function-like macros are not supported.
					return None;
				}

				Some(Self::Define {
					name,
					value: after.trim(),
				})
			}
			_ => None,
		}
	}
}

/// Split `" NAME rest"` into `("NAME", " rest")`. The symbol must be separated
/// from the directive by whitespace.
fn symbol_argument(tail: &str) -> Option<(&str, &str)> {
	if !tail.starts_with(char::is_whitespace) {
		return None;
	}

	let tail = tail.trim_start();
	let end = tail
		.find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
		.unwrap_or(tail.len());

	if end == 0 {
		return None;
	}

	Some(tail.split_at(end))
}

/// Create a [`SourceFilter`] over `lines`, seeded with a private copy of
/// `defines`.
///
/// ```rust
/// use cgt_core::Variables;
/// use cgt_core::filter_source;
///
/// let defines = Variables::from([("FOO", "")]);
/// let lines = ["#ifdef FOO", "a", "#else", "b", "#endif"];
/// let output: Vec<String> = filter_source(lines, &defines)
/// 	.collect::<Result<_, _>>()
/// 	.unwrap();
/// assert_eq!(output, vec!["a"]);
/// ```
pub fn filter_source<I>(lines: I, defines: &Variables) -> SourceFilter<I::IntoIter>
where
	I: IntoIterator,
	I::Item: AsRef<str>,
{
	SourceFilter::new(lines.into_iter(), defines.clone())
}

/// Lazily filters source lines through `#if`/`#ifdef`/`#ifndef`/`#else`/
/// `#endif`/`#define` directives while stripping comments and blank lines.
///
/// Each call to `next` consumes input lines until one is retained, and yields
/// it trimmed. After an error the filter yields nothing more.
#[derive(Debug)]
pub struct SourceFilter<I> {
	lines: I,
	comments: CommentSyntax,
	defines: Variables,
	frames: Vec<Frame>,
	in_comment: bool,
	line_number: usize,
	finished: bool,
}

impl<I, S> SourceFilter<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	pub fn new(lines: I, defines: Variables) -> Self {
		Self {
			lines,
			comments: CommentSyntax::default(),
			defines,
			frames: Vec::new(),
			in_comment: false,
			line_number: 0,
			finished: false,
		}
	}

	#[must_use]
	pub fn with_comment_syntax(mut self, comments: CommentSyntax) -> Self {
		self.comments = comments;
		self
	}

	/// The live definitions, including any `#define` seen so far.
	pub fn defines(&self) -> &Variables {
		&self.defines
	}

	pub fn into_defines(self) -> Variables {
		self.defines
	}

	/// Current conditional nesting depth.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}

	/// Number of input lines consumed so far.
	pub fn line_number(&self) -> usize {
		self.line_number
	}

	fn process_line(&mut self, line: &str) -> CgtResult<Option<String>> {
		let line = self.strip_line_comment(line);
		if line.trim().is_empty() {
			return Ok(None);
		}

		let residual = self.strip_block_comments(line);
		let residual = residual.trim();
		let directive = Directive::parse(residual);

		match directive {
			Some(Directive::If) => {
				tracing::trace!(line = self.line_number, "push #if frame");
				self.frames.push(Frame::new(None, false));
				return Ok(None);
			}
			Some(Directive::IfDef(name)) => {
				tracing::trace!(line = self.line_number, name, "push #ifdef frame");
				self.frames.push(Frame::new(Some(name), false));
				return Ok(None);
			}
			Some(Directive::IfNDef(name)) => {
				tracing::trace!(line = self.line_number, name, "push #ifndef frame");
				self.frames.push(Frame::new(Some(name), true));
				return Ok(None);
			}
			Some(Directive::Else) => {
				let mut frame = self.pop_frame("#else")?;
				frame.in_else = !frame.in_else;
				self.frames.push(frame);
				return Ok(None);
			}
			Some(Directive::EndIf) => {
				self.pop_frame("#endif")?;
				return Ok(None);
			}
			Some(Directive::Define { .. }) | None => {}
		}

		if self.in_comment || self.is_hidden() {
			return Ok(None);
		}

		if let Some(Directive::Define { name, value }) = directive {
			tracing::trace!(line = self.line_number, name, value, "#define");
			self.defines.define(name, value);
			return Ok(None);
		}

		if residual.is_empty() {
			return Ok(None);
		}

		Ok(Some(residual.to_string()))
	}

	fn pop_frame(&mut self, directive: &str) -> CgtResult<Frame> {
		self.frames.pop().ok_or_else(|| {
			CgtError::UnbalancedDirective {
				directive: directive.to_string(),
				line: self.line_number,
			}
		})
	}

	fn is_hidden(&self) -> bool {
		self.frames
			.iter()
			.any(|frame| !frame.is_satisfied(&self.defines))
	}

	fn strip_line_comment<'l>(&self, line: &'l str) -> &'l str {
		if self.comments.line.is_empty() {
			return line;
		}

		match line.find(self.comments.line.as_str()) {
			Some(index) => &line[..index],
			None => line,
		}
	}

	/// Remove block-commented spans from `line`, carrying the open comment
	/// state across lines. Each removed span leaves a single space behind.
	fn strip_block_comments(&mut self, line: &str) -> String {
		if !self.comments.has_block_comments() {
			return line.to_string();
		}

		let open = self.comments.block_open.as_str();
		let close = self.comments.block_close.as_str();
		let mut residual = String::with_capacity(line.len());
		let mut rest = line;

		loop {
			if self.in_comment {
				let Some(index) = rest.find(close) else {
					break;
				};
				rest = &rest[index + close.len()..];
				self.in_comment = false;
			} else {
				let Some(index) = rest.find(open) else {
					residual.push_str(rest);
					break;
				};
				residual.push_str(&rest[..index]);
				residual.push(' ');
				rest = &rest[index + open.len()..];
				self.in_comment = true;
			}
		}

		residual
	}
}

impl<I, S> Iterator for SourceFilter<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	type Item = CgtResult<String>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		while let Some(line) = self.lines.next() {
			self.line_number += 1;

			match self.process_line(line.as_ref()) {
				Ok(Some(output)) => return Some(Ok(output)),
				Ok(None) => {}
				Err(error) => {
					self.finished = true;
					return Some(Err(error));
				}
			}
		}

		if !self.frames.is_empty() {
			tracing::warn!(
				depth = self.frames.len(),
				"input ended inside an open conditional block"
			);
		}

		self.finished = true;
		None
	}
}

impl<I, S> std::iter::FusedIterator for SourceFilter<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
}
