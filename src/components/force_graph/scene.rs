//! Retained drawing primitives for the graph.
//!
//! One circle and one label per node, one line per valid link. Primitives are
//! allocated once by [`Scene::build`]; [`Scene::sync`] only rewrites their
//! coordinates so it can run on every tick.

use super::model::{GraphModel, Link};
use super::simulation::Simulation;
use super::theme::Theme;
use super::viewport::{Bounds, RenderParams};

pub const STROKE_WIDTH: f64 = 1.5;
pub const LINK_OPACITY: f64 = 0.8;
pub const DIM_NODE_OPACITY: f64 = 0.2;
pub const DIM_LABEL_OPACITY: f64 = 0.15;
pub const DIM_LINK_OPACITY: f64 = 0.1;
pub const LABEL_FONT_FAMILY: &str = "'Anonymous Pro', monospace";
/// Titles longer than this many characters are shortened.
pub const TITLE_MAX_CHARS: usize = 18;
/// Characters kept from a shortened title before the ellipsis.
pub const TITLE_KEEP_CHARS: usize = 16;
/// Gap between a node's edge and its label baseline.
const LABEL_GAP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct CirclePrimitive {
	pub node: usize,
	pub cx: f64,
	pub cy: f64,
	pub r: f64,
	pub fill: String,
	pub stroke: String,
	pub stroke_width: f64,
	pub opacity: f64,
}

impl CirclePrimitive {
	pub fn hit(&self, x: f64, y: f64) -> bool {
		let (dx, dy) = (x - self.cx, y - self.cy);
		dx * dx + dy * dy <= self.r * self.r
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
	pub link: Link,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub stroke: String,
	pub stroke_width: f64,
	pub stroke_opacity: f64,
}

/// Text drawn above a node. Labels never take pointer input.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPrimitive {
	pub node: usize,
	pub text: String,
	pub x: f64,
	pub y: f64,
	/// Vertical offset from the node center; negative is above.
	pub dy: f64,
	pub font_px: f64,
	pub fill: String,
	pub opacity: f64,
}

pub struct Scene {
	pub lines: Vec<LinePrimitive>,
	pub labels: Vec<LabelPrimitive>,
	pub circles: Vec<CirclePrimitive>,
	theme: Theme,
	bounds: Bounds,
}

/// Shortens `title` to sixteen characters plus an ellipsis when it is longer
/// than eighteen.
pub fn truncate_title(title: &str) -> String {
	if title.chars().count() > TITLE_MAX_CHARS {
		let mut short: String = title.chars().take(TITLE_KEEP_CHARS).collect();
		short.push('\u{2026}');
		short
	} else {
		title.to_string()
	}
}

impl Scene {
	pub fn build(model: &GraphModel, params: &RenderParams, theme: &Theme) -> Self {
		let lines = model
			.links()
			.iter()
			.map(|&link| LinePrimitive {
				link,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
				stroke: theme.link.clone(),
				stroke_width: STROKE_WIDTH,
				stroke_opacity: LINK_OPACITY,
			})
			.collect();

		let labels = model
			.nodes()
			.iter()
			.enumerate()
			.map(|(node, n)| LabelPrimitive {
				node,
				text: truncate_title(&n.title),
				x: 0.0,
				y: 0.0,
				dy: -(params.node_radius + LABEL_GAP),
				font_px: params.label_font_px,
				fill: theme.label.clone(),
				opacity: 1.0,
			})
			.collect();

		let circles = (0..model.len())
			.map(|node| CirclePrimitive {
				node,
				cx: 0.0,
				cy: 0.0,
				r: params.node_radius,
				fill: theme.node_fill.clone(),
				stroke: theme.node_stroke.clone(),
				stroke_width: STROKE_WIDTH,
				opacity: 1.0,
			})
			.collect();

		Self {
			lines,
			labels,
			circles,
			theme: theme.clone(),
			bounds: params.bounds(),
		}
	}

	pub fn primitive_count(&self) -> usize {
		self.lines.len() + self.labels.len() + self.circles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.primitive_count() == 0
	}

	/// Copies current simulated positions onto the primitives.
	pub fn sync(&mut self, sim: &Simulation) {
		let nodes = sim.nodes();
		for line in &mut self.lines {
			let (s, t) = (&nodes[line.link.source], &nodes[line.link.target]);
			(line.x1, line.y1, line.x2, line.y2) = (s.x, s.y, t.x, t.y);
		}
		for circle in &mut self.circles {
			let node = &nodes[circle.node];
			(circle.cx, circle.cy) = self.bounds.clamp(node.x, node.y);
		}
		for label in &mut self.labels {
			let node = &nodes[label.node];
			(label.x, label.y) = (node.x, node.y);
		}
	}

	/// Topmost circle under `(x, y)`. Labels are ignored.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.circles.iter().rev().find(|c| c.hit(x, y)).map(|c| c.node)
	}

	/// Emphasizes `focus`, its neighbors and its links; dims the rest.
	pub fn set_highlight(&mut self, model: &GraphModel, focus: usize) {
		let theme = &self.theme;
		for circle in &mut self.circles {
			let lit = model.is_adjacent_or_self(focus, circle.node);
			circle.fill = (if lit { &theme.node_highlight } else { &theme.node_fill }).clone();
			circle.opacity = if lit { 1.0 } else { DIM_NODE_OPACITY };
		}
		for line in &mut self.lines {
			let lit = line.link.touches(focus);
			line.stroke = (if lit { &theme.link_highlight } else { &theme.link }).clone();
			line.stroke_opacity = if lit { 1.0 } else { DIM_LINK_OPACITY };
		}
		for label in &mut self.labels {
			let lit = model.is_adjacent_or_self(focus, label.node);
			label.fill = (if lit { &theme.node_highlight } else { &theme.label }).clone();
			label.opacity = if lit { 1.0 } else { DIM_LABEL_OPACITY };
		}
	}

	/// Restores every primitive's default color and opacity.
	pub fn clear_highlight(&mut self) {
		let theme = &self.theme;
		for circle in &mut self.circles {
			circle.fill.clone_from(&theme.node_fill);
			circle.opacity = 1.0;
		}
		for line in &mut self.lines {
			line.stroke.clone_from(&theme.link);
			line.stroke_opacity = LINK_OPACITY;
		}
		for label in &mut self.labels {
			label.fill.clone_from(&theme.label);
			label.opacity = 1.0;
		}
	}

	/// Drops every primitive.
	pub fn clear(&mut self) {
		self.lines.clear();
		self.labels.clear();
		self.circles.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::LayoutConfig;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};

	fn fixture() -> (GraphModel, RenderParams, Simulation, Scene) {
		let nodes: Vec<GraphNode> = ["a", "b", "c", "d"]
			.iter()
			.map(|id| GraphNode {
				id: id.to_string(),
				title: format!("Post {id}"),
				href: format!("/{id}"),
			})
			.collect();
		let edges: Vec<GraphEdge> = [("a", "b"), ("b", "c"), ("c", "d"), ("a", "q")]
			.iter()
			.map(|(s, t)| GraphEdge {
				source: s.to_string(),
				target: t.to_string(),
			})
			.collect();
		let model = GraphModel::build(&nodes, &edges).unwrap();
		let params = RenderParams::derive(1000.0).unwrap();
		let config = LayoutConfig::default();
		let mut sim = Simulation::new(model.len(), model.links(), &params, &config);
		sim.run(config.initial_ticks, &params.bounds());
		let mut scene = Scene::build(&model, &params, &Theme::default());
		scene.sync(&sim);
		(model, params, sim, scene)
	}

	#[test]
	fn truncates_long_titles() {
		assert_eq!(truncate_title("Short title"), "Short title");
		assert_eq!(truncate_title("exactly eighteen!!"), "exactly eighteen!!");
		assert_eq!(
			truncate_title("nineteen characters"),
			"nineteen charact\u{2026}"
		);
		assert_eq!(truncate_title("ééééééééééééééééééé").chars().count(), 17);
	}

	#[test]
	fn one_primitive_per_node_and_valid_link() {
		let (_, params, _, scene) = fixture();
		assert_eq!(scene.circles.len(), 4);
		assert_eq!(scene.labels.len(), 4);
		assert_eq!(scene.lines.len(), 3);
		assert_eq!(scene.primitive_count(), 11);
		assert!(scene.circles.iter().all(|c| c.r == params.node_radius));
		assert!(scene.labels.iter().all(|l| l.dy == -12.0 && l.font_px == 10.0));
	}

	#[test]
	fn sync_moves_without_reallocating() {
		let (_, params, mut sim, mut scene) = fixture();
		let circles_ptr = scene.circles.as_ptr();
		let lines_ptr = scene.lines.as_ptr();

		sim.pin(0, 100.0, 100.0);
		scene.sync(&sim);

		assert_eq!(scene.circles.as_ptr(), circles_ptr);
		assert_eq!(scene.lines.as_ptr(), lines_ptr);
		assert_eq!((scene.circles[0].cx, scene.circles[0].cy), (100.0, 100.0));
		assert_eq!((scene.lines[0].x1, scene.lines[0].y1), (100.0, 100.0));
		assert_eq!((scene.labels[0].x, scene.labels[0].y), (100.0, 100.0));
		let bounds = params.bounds();
		assert!(scene.circles.iter().all(|c| bounds.contains(c.cx, c.cy)));
	}

	#[test]
	fn highlight_emphasizes_neighborhood() {
		let (model, _, _, mut scene) = fixture();
		let theme = Theme::default();
		scene.set_highlight(&model, 1);

		let lit: Vec<bool> = scene.circles.iter().map(|c| c.opacity == 1.0).collect();
		assert_eq!(lit, [true, true, true, false]);
		assert_eq!(scene.circles[3].opacity, DIM_NODE_OPACITY);
		assert_eq!(scene.circles[0].fill, theme.node_highlight);
		assert_eq!(scene.labels[3].opacity, DIM_LABEL_OPACITY);
		assert_eq!(scene.labels[3].fill, theme.label);

		let strokes: Vec<&str> = scene.lines.iter().map(|l| l.stroke.as_str()).collect();
		assert_eq!(
			strokes,
			[
				theme.link_highlight.as_str(),
				theme.link_highlight.as_str(),
				theme.link.as_str()
			]
		);
		assert_eq!(scene.lines[2].stroke_opacity, DIM_LINK_OPACITY);
	}

	#[test]
	fn clearing_highlight_restores_defaults_exactly() {
		let (model, _, _, mut scene) = fixture();
		let before = (scene.circles.clone(), scene.lines.clone(), scene.labels.clone());

		scene.set_highlight(&model, 2);
		scene.clear_highlight();

		assert_eq!(scene.circles, before.0);
		assert_eq!(scene.lines, before.1);
		assert_eq!(scene.labels, before.2);
	}

	#[test]
	fn hit_testing_ignores_labels() {
		let (_, _, _, scene) = fixture();
		let circle = &scene.circles[2];
		assert_eq!(scene.node_at(circle.cx + 1.0, circle.cy - 1.0), Some(2));

		let label = &scene.labels[2];
		let above = label.y + label.dy - 1.0;
		assert_ne!(scene.node_at(label.x, above), Some(2));
	}
}
