use crate::CgtResult;
use crate::CommentSyntax;
use crate::SourceFilter;
use crate::SubstituteOptions;
use crate::Variables;
use crate::substitute_with_options;

/// Settings for [`render_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
	pub substitute: SubstituteOptions,
	pub comments: CommentSyntax,
}

/// Run `text` through the source filter and collect the retained lines.
pub fn filter_text(
	text: &str,
	defines: &Variables,
	comments: &CommentSyntax,
) -> CgtResult<Vec<String>> {
	SourceFilter::new(text.lines(), defines.clone())
		.with_comment_syntax(comments.clone())
		.collect()
}

/// Filter `source` and then expand its placeholders.
///
/// Substitution sees `variables` together with every `#define` recorded by
/// the filter, so a template may define its own values.
pub fn render_source(
	source: &str,
	variables: &Variables,
	options: &RenderOptions,
) -> CgtResult<String> {
	let mut filter =
		SourceFilter::new(source.lines(), variables.clone()).with_comment_syntax(options.comments.clone());
	let lines = filter.by_ref().collect::<CgtResult<Vec<_>>>()?;
	let defines = filter.into_defines();

	tracing::debug!(lines = lines.len(), defines = defines.len(), "filtered source");
	substitute_with_options(&lines.join("\n"), &defines, &options.substitute)
}
