//! `cgt_core` is the core library for `cgt`, a small toolkit for assembling
//! generated source code from templates. It provides two independent pieces
//! that callers compose:
//!
//! - a **placeholder substitution engine** that expands `${name:options}`
//!   placeholders from a set of [`Variables`], and
//! - a **source filter** that evaluates a restricted set of
//!   conditional-compilation directives (`#if`, `#ifdef`, `#ifndef`, `#else`,
//!   `#endif`, `#define`) while stripping comments and blank lines.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source / template text
//!   → SourceFilter (drops hidden branches, comments, blank lines; records #define)
//!   → substitute (expands placeholders until nothing bound is left)
//!   → generated text
//! ```
//!
//! ## Placeholder Syntax
//!
//! `${name}` or `${name:option,option}`. Supported options:
//!
//! - `keep_indent`: indent every value line after the first with the
//!   whitespace found before the placeholder.
//! - `non_empty`: fail if the value is the empty string.
//! - `no_empty_line`: when the value is blank and the placeholder is alone on
//!   its line, remove the line.
//!
//! ## Quick Start
//!
//! ```rust
//! use cgt_core::RenderOptions;
//! use cgt_core::Variables;
//! use cgt_core::render_source;
//!
//! let source = "#ifdef WITH_INIT\n{\n    ${init}\n}\n#endif";
//! let variables = Variables::from([("WITH_INIT", ""), ("init", "a();\nb();")]);
//! let text = render_source(source, &variables, &RenderOptions::default()).unwrap();
//! assert_eq!(text, "{\na();\nb();\n}");
//! ```

pub use args::*;
pub use config::*;
pub use error::*;
pub use filter::*;
pub use lexer::*;
pub use render::*;
pub use substitute::*;
pub use variables::*;

mod args;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod filter;
mod lexer;
mod render;
mod substitute;
mod variables;
