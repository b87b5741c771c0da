//! Pointer interaction: hover highlighting, drag to reposition, click to
//! navigate.
//!
//! Mouse and touch input are both reduced to [`PointerEvent`]s in canvas
//! coordinates before they reach the controller, so one state machine drives
//! both.

use log::debug;

use super::model::GraphModel;
use super::scene::Scene;
use super::simulation::Simulation;
use super::viewport::Bounds;

/// Pointer travel (in pixels) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Move { x: f64, y: f64 },
	Down { x: f64, y: f64 },
	Up { x: f64, y: f64 },
	Leave,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionState {
	#[default]
	Idle,
	Hovered(usize),
	/// Pointer is down on a node but has not moved far enough to drag.
	Pressed { node: usize, origin: (f64, f64) },
	Dragging(usize),
	/// A node was clicked and the page is leaving. Terminal.
	Navigating,
}

impl InteractionState {
	/// Whether the pointer is down on a node, so moves and releases must be
	/// tracked even outside the canvas.
	pub fn is_held(&self) -> bool {
		matches!(self, Self::Pressed { .. } | Self::Dragging(_))
	}
}

/// What the caller must do after an event was handled.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
	None,
	Redraw,
	Navigate(String),
}

/// Everything an event may touch.
pub struct Targets<'a> {
	pub model: &'a GraphModel,
	pub scene: &'a mut Scene,
	pub sim: &'a mut Simulation,
	pub bounds: Bounds,
	pub drag_alpha_target: f64,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	state: InteractionState,
}

impl InteractionController {
	pub fn state(&self) -> InteractionState {
		self.state
	}

	/// Node currently under hover, press or drag.
	pub fn active_node(&self) -> Option<usize> {
		match self.state {
			InteractionState::Hovered(node)
			| InteractionState::Pressed { node, .. }
			| InteractionState::Dragging(node) => Some(node),
			InteractionState::Idle | InteractionState::Navigating => None,
		}
	}

	pub fn handle(&mut self, event: PointerEvent, t: &mut Targets<'_>) -> Outcome {
		use InteractionState::*;

		match (self.state, event) {
			(Navigating, _) => Outcome::None,

			(Dragging(node), PointerEvent::Move { x, y }) => {
				let (px, py) = t.bounds.clamp(x, y);
				t.sim.pin(node, px, py);
				t.scene.sync(t.sim);
				Outcome::Redraw
			}
			(Dragging(node), PointerEvent::Up { x, y }) => {
				self.end_drag(node, t);
				// Released over the node it was dragging: keep it highlighted.
				if t.scene.node_at(x, y) == Some(node) {
					self.hover(node, t);
				}
				Outcome::Redraw
			}
			(Dragging(node), PointerEvent::Leave) => {
				self.end_drag(node, t);
				Outcome::Redraw
			}
			(Dragging(_), PointerEvent::Down { .. }) => Outcome::None,

			(Pressed { node, origin }, PointerEvent::Move { x, y }) => {
				let (dx, dy) = (x - origin.0, y - origin.1);
				if dx * dx + dy * dy <= DRAG_THRESHOLD * DRAG_THRESHOLD {
					return Outcome::None;
				}
				self.start_drag(node, x, y, t);
				Outcome::Redraw
			}
			(Pressed { node, .. }, PointerEvent::Up { .. }) => self.click(node, t),
			(Pressed { .. }, PointerEvent::Leave) => self.unhover(t),
			(Pressed { .. }, PointerEvent::Down { .. }) => Outcome::None,

			(Idle | Hovered(_), PointerEvent::Move { x, y }) => {
				match t.scene.node_at(x, y) {
					Some(node) => self.hover(node, t),
					None => self.unhover(t),
				}
			}
			(Idle | Hovered(_), PointerEvent::Down { x, y }) => {
				let Some(node) = t.scene.node_at(x, y) else {
					return Outcome::None;
				};
				let outcome = self.hover(node, t);
				self.state = Pressed {
					node,
					origin: (x, y),
				};
				outcome
			}
			(Idle | Hovered(_), PointerEvent::Leave) => self.unhover(t),
			(Idle | Hovered(_), PointerEvent::Up { .. }) => Outcome::None,
		}
	}

	fn hover(&mut self, node: usize, t: &mut Targets<'_>) -> Outcome {
		if self.active_node() == Some(node) {
			return Outcome::None;
		}
		t.scene.set_highlight(t.model, node);
		self.state = InteractionState::Hovered(node);
		Outcome::Redraw
	}

	fn unhover(&mut self, t: &mut Targets<'_>) -> Outcome {
		if self.state == InteractionState::Idle {
			return Outcome::None;
		}
		t.scene.clear_highlight();
		self.state = InteractionState::Idle;
		Outcome::Redraw
	}

	fn start_drag(&mut self, node: usize, x: f64, y: f64, t: &mut Targets<'_>) {
		t.sim.set_alpha_target(t.drag_alpha_target);
		if !t.sim.is_running() {
			t.sim.restart();
		}
		let (px, py) = t.bounds.clamp(x, y);
		t.sim.pin(node, px, py);
		t.scene.sync(t.sim);
		self.state = InteractionState::Dragging(node);
		debug!("post-graph: drag started on node {node}");
	}

	fn end_drag(&mut self, node: usize, t: &mut Targets<'_>) {
		t.sim.release(node);
		t.sim.set_alpha_target(0.0);
		t.scene.clear_highlight();
		self.state = InteractionState::Idle;
	}

	fn click(&mut self, node: usize, t: &mut Targets<'_>) -> Outcome {
		match t.model.node(node).map(|n| n.href.as_str()) {
			Some(href) if !href.is_empty() => {
				self.state = InteractionState::Navigating;
				Outcome::Navigate(href.to_string())
			}
			_ => {
				self.state = InteractionState::Hovered(node);
				Outcome::None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::{LayoutConfig, Pin};
	use crate::components::force_graph::theme::Theme;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};
	use crate::components::force_graph::viewport::RenderParams;

	struct Fixture {
		model: GraphModel,
		scene: Scene,
		sim: Simulation,
		bounds: Bounds,
		controller: InteractionController,
	}

	impl Fixture {
		fn new() -> Self {
			let nodes: Vec<GraphNode> = ["a", "b", "c"]
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					title: id.to_string(),
					href: if *id == "c" { String::new() } else { format!("/{id}") },
				})
				.collect();
			let edges = vec![GraphEdge {
				source: "a".into(),
				target: "b".into(),
			}];
			let model = GraphModel::build(&nodes, &edges).unwrap();
			let params = RenderParams::derive(1000.0).unwrap();
			let config = LayoutConfig::default();
			let mut sim = Simulation::new(model.len(), model.links(), &params, &config);
			sim.run(config.initial_ticks, &params.bounds());
			let mut scene = Scene::build(&model, &params, &Theme::default());
			scene.sync(&sim);
			Self {
				model,
				scene,
				sim,
				bounds: params.bounds(),
				controller: InteractionController::default(),
			}
		}

		fn send(&mut self, event: PointerEvent) -> Outcome {
			let mut targets = Targets {
				model: &self.model,
				scene: &mut self.scene,
				sim: &mut self.sim,
				bounds: self.bounds,
				drag_alpha_target: 0.3,
			};
			self.controller.handle(event, &mut targets)
		}

		fn center_of(&self, node: usize) -> (f64, f64) {
			let c = &self.scene.circles[node];
			(c.cx, c.cy)
		}

		fn empty_spot(&self) -> (f64, f64) {
			(self.bounds.min_x - 20.0, self.bounds.min_y - 20.0)
		}

		/// A point inside the bounds clear of every node.
		fn open_spot(&self) -> (f64, f64) {
			let b = self.bounds;
			(0..20)
				.flat_map(|i| (0..5).map(move |j| (i, j)))
				.map(|(i, j)| {
					(
						b.min_x + (b.max_x - b.min_x) * i as f64 / 19.0,
						b.min_y + (b.max_y - b.min_y) * j as f64 / 4.0,
					)
				})
				.find(|p| self.scene.circles.iter().all(|c| (c.cx - p.0).hypot(c.cy - p.1) > 3.0 * c.r))
				.unwrap()
		}
	}

	#[test]
	fn hover_then_leave_round_trips() {
		let mut f = Fixture::new();
		let defaults = (f.scene.circles.clone(), f.scene.lines.clone(), f.scene.labels.clone());
		let (x, y) = f.center_of(0);

		assert_eq!(f.send(PointerEvent::Move { x, y }), Outcome::Redraw);
		assert_eq!(f.controller.state(), InteractionState::Hovered(0));
		assert_eq!(f.scene.circles[2].opacity, 0.2);

		let (ex, ey) = f.empty_spot();
		assert_eq!(f.send(PointerEvent::Move { x: ex, y: ey }), Outcome::Redraw);
		assert_eq!(f.controller.state(), InteractionState::Idle);
		assert_eq!(f.scene.circles, defaults.0);
		assert_eq!(f.scene.lines, defaults.1);
		assert_eq!(f.scene.labels, defaults.2);
	}

	#[test]
	fn moving_within_a_node_does_not_redraw() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(1);
		f.send(PointerEvent::Move { x, y });
		assert_eq!(f.send(PointerEvent::Move { x: x + 1.0, y }), Outcome::None);
	}

	#[test]
	fn click_navigates_and_is_terminal() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(1);
		f.send(PointerEvent::Down { x, y });
		assert_eq!(
			f.send(PointerEvent::Up { x, y }),
			Outcome::Navigate("/b".into())
		);
		assert_eq!(f.controller.state(), InteractionState::Navigating);
		assert_eq!(f.send(PointerEvent::Move { x: 0.0, y: 0.0 }), Outcome::None);
		assert_eq!(f.send(PointerEvent::Leave), Outcome::None);
	}

	#[test]
	fn click_without_href_stays_hovered() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(2);
		f.send(PointerEvent::Down { x, y });
		assert_eq!(f.send(PointerEvent::Up { x, y }), Outcome::None);
		assert_eq!(f.controller.state(), InteractionState::Hovered(2));
	}

	#[test]
	fn drag_pins_node_until_release() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(0);
		f.send(PointerEvent::Down { x, y });
		assert!(!f.sim.is_running());

		let target = f.open_spot();
		f.send(PointerEvent::Move {
			x: target.0,
			y: target.1,
		});
		assert_eq!(f.controller.state(), InteractionState::Dragging(0));
		assert!(f.sim.is_running());
		assert_eq!(f.sim.alpha_target(), 0.3);
		assert_eq!(f.sim.nodes()[0].pin, Pin::Pinned {
			x: target.0,
			y: target.1
		});

		for _ in 0..30 {
			f.sim.step(&f.bounds);
			assert_eq!(f.sim.position(0), Some(target));
		}

		f.send(PointerEvent::Up {
			x: target.0,
			y: target.1,
		});
		assert_eq!(f.controller.state(), InteractionState::Hovered(0));
		assert_eq!(f.sim.nodes()[0].pin, Pin::Free);
		assert_eq!(f.sim.alpha_target(), 0.0);
		f.sim.step(&f.bounds);
		f.sim.step(&f.bounds);
		assert_ne!(f.sim.position(0), Some(target));
	}

	#[test]
	fn drag_coordinates_are_clamped() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(1);
		f.send(PointerEvent::Down { x, y });
		f.send(PointerEvent::Move { x: -500.0, y: 9000.0 });
		assert_eq!(
			f.sim.position(1),
			Some((f.bounds.min_x, f.bounds.max_y))
		);
		assert_eq!(
			f.center_of(1),
			(f.bounds.min_x, f.bounds.max_y)
		);
	}

	#[test]
	fn small_jitter_is_still_a_click() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(0);
		f.send(PointerEvent::Down { x, y });
		assert_eq!(f.send(PointerEvent::Move { x: x + 1.0, y: y + 1.0 }), Outcome::None);
		assert_eq!(
			f.send(PointerEvent::Up { x, y }),
			Outcome::Navigate("/a".into())
		);
	}

	#[test]
	fn leaving_mid_drag_releases_the_pin() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(0);
		f.send(PointerEvent::Down { x, y });
		f.send(PointerEvent::Move { x: x + 30.0, y });
		f.send(PointerEvent::Leave);
		assert_eq!(f.controller.state(), InteractionState::Idle);
		assert_eq!(f.sim.nodes()[0].pin, Pin::Free);
	}

	#[test]
	fn release_over_dragged_node_keeps_highlight() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(0);
		let (tx, ty) = f.open_spot();
		f.send(PointerEvent::Down { x, y });
		f.send(PointerEvent::Move { x: tx, y: ty });

		assert_eq!(f.send(PointerEvent::Up { x: tx, y: ty }), Outcome::Redraw);
		assert_eq!(f.controller.state(), InteractionState::Hovered(0));
		assert_eq!(f.scene.circles[0].opacity, 1.0);
		assert_eq!(f.scene.circles[2].opacity, 0.2);
		assert_eq!(f.send(PointerEvent::Leave), Outcome::Redraw);
		assert_eq!(f.controller.state(), InteractionState::Idle);
		assert_eq!(f.scene.circles[2].opacity, 1.0);
	}

	#[test]
	fn release_away_from_dragged_node_goes_idle() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(1);
		f.send(PointerEvent::Down { x, y });
		// Pointer far outside the canvas; the node stays clamped at the edge.
		f.send(PointerEvent::Move { x: -500.0, y: 100.0 });
		assert!(f.controller.state().is_held());

		f.send(PointerEvent::Up { x: -500.0, y: 100.0 });
		assert_eq!(f.controller.state(), InteractionState::Idle);
		assert!(!f.controller.state().is_held());
		assert_eq!(f.sim.nodes()[1].pin, Pin::Free);
	}

	#[test]
	fn held_only_while_pressed_or_dragging() {
		let mut f = Fixture::new();
		let (x, y) = f.center_of(0);
		f.send(PointerEvent::Move { x, y });
		assert!(!f.controller.state().is_held());
		f.send(PointerEvent::Down { x, y });
		assert!(f.controller.state().is_held());
		f.send(PointerEvent::Move { x: x + 40.0, y });
		assert_eq!(f.controller.state(), InteractionState::Dragging(0));
		assert!(f.controller.state().is_held());
		assert!(!InteractionState::Navigating.is_held());
	}

	#[test]
	fn press_on_background_is_ignored() {
		let mut f = Fixture::new();
		let (x, y) = f.empty_spot();
		assert_eq!(f.send(PointerEvent::Down { x, y }), Outcome::None);
		assert_eq!(f.controller.state(), InteractionState::Idle);
	}
}
