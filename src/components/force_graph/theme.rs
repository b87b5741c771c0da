//! Graph colors, resolved once from the page's CSS custom properties.

use log::debug;

/// CSS custom properties read from the document root, with fallbacks.
pub const LINK_VAR: (&str, &str) = ("--graph-link", "#4A5568");
pub const LINK_HIGHLIGHT_VAR: (&str, &str) = ("--graph-link-highlight", "#58A6FF");
pub const LABEL_VAR: (&str, &str) = ("--graph-label", "#8B949E");
pub const NODE_FILL_VAR: (&str, &str) = ("--graph-node-fill", "#58A6FF");
pub const NODE_STROKE_VAR: (&str, &str) = ("--graph-node-stroke", "#161B22");
pub const NODE_HIGHLIGHT_VAR: (&str, &str) = ("--graph-node-highlight-fill", "#E6EDF3");

/// The six colors a view draws with. Values are CSS color strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub link: String,
	pub link_highlight: String,
	pub label: String,
	pub node_fill: String,
	pub node_stroke: String,
	pub node_highlight: String,
}

impl Theme {
	/// Builds a theme from `lookup`, falling back per color when it yields
	/// nothing or only whitespace.
	pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let pick = |(name, fallback): (&str, &str)| {
			lookup(name)
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
				.unwrap_or_else(|| {
					debug!("post-graph: {name} unset, using {fallback}");
					fallback.to_string()
				})
		};

		Self {
			link: pick(LINK_VAR),
			link_highlight: pick(LINK_HIGHLIGHT_VAR),
			label: pick(LABEL_VAR),
			node_fill: pick(NODE_FILL_VAR),
			node_stroke: pick(NODE_STROKE_VAR),
			node_highlight: pick(NODE_HIGHLIGHT_VAR),
		}
	}

	/// Reads the theme from the computed style of `<html>`.
	pub fn from_document() -> Self {
		let style = web_sys::window().and_then(|window| {
			let root = window.document()?.document_element()?;
			window.get_computed_style(&root).ok().flatten()
		});

		match style {
			Some(style) => Self::resolve(|name| style.get_property_value(name).ok()),
			None => Self::default(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::resolve(|_| None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn falls_back_when_unset() {
		let theme = Theme::default();
		assert_eq!(theme.link, "#4A5568");
		assert_eq!(theme.link_highlight, "#58A6FF");
		assert_eq!(theme.label, "#8B949E");
		assert_eq!(theme.node_fill, "#58A6FF");
		assert_eq!(theme.node_stroke, "#161B22");
		assert_eq!(theme.node_highlight, "#E6EDF3");
	}

	#[test]
	fn trims_values_and_ignores_blank_ones() {
		let theme = Theme::resolve(|name| match name {
			"--graph-link" => Some("  #123456 ".into()),
			"--graph-label" => Some("   ".into()),
			_ => None,
		});
		assert_eq!(theme.link, "#123456");
		assert_eq!(theme.label, "#8B949E");
	}
}
