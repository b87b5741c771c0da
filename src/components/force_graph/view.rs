//! One mounted graph: model, layout, scene and interaction bound together.
//!
//! [`GraphView::mount`] is the single entry point. It takes the graph data and
//! a [`Container`] explicitly, so nothing here reads page globals. Failures
//! are [`MountError`]s the caller logs and otherwise ignores.

use log::{debug, info};
use thiserror::Error;

use super::interaction::{InteractionController, InteractionState, Outcome, PointerEvent, Targets};
use super::model::GraphModel;
use super::scene::Scene;
use super::simulation::{LayoutConfig, Simulation};
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::RenderParams;

/// The host element a view draws into.
pub trait Container {
	/// Usable width in CSS pixels.
	fn width(&self) -> f64;
	/// Whether a view already claimed this container.
	fn is_claimed(&self) -> bool;
	fn claim(&self);
	fn release(&self);
	fn set_height(&self, height: f64);
}

#[derive(Debug, Error, PartialEq)]
pub enum MountError {
	#[error("container already hosts a graph")]
	AlreadyMounted,
	#[error("graph has no nodes")]
	EmptyGraph,
	#[error("container has no usable width ({0})")]
	ZeroWidth(f64),
}

pub struct GraphView {
	model: GraphModel,
	params: RenderParams,
	config: LayoutConfig,
	sim: Simulation,
	scene: Scene,
	controller: InteractionController,
	disposed: bool,
}

impl GraphView {
	/// Lays out `data` and claims `container` for it.
	///
	/// The layout runs to completion before this returns. A container that
	/// is already claimed is left untouched.
	pub fn mount(
		container: &impl Container,
		data: &GraphData,
		theme: &Theme,
		config: LayoutConfig,
	) -> Result<Self, MountError> {
		if container.is_claimed() {
			return Err(MountError::AlreadyMounted);
		}
		let width = container.width();
		let params = RenderParams::derive(width).ok_or(MountError::ZeroWidth(width))?;
		let model = GraphModel::build(&data.nodes, &data.edges).ok_or(MountError::EmptyGraph)?;

		container.claim();
		container.set_height(params.height);

		let mut sim = Simulation::new(model.len(), model.links(), &params, &config);
		sim.run(config.initial_ticks, &params.bounds());

		let mut scene = Scene::build(&model, &params, theme);
		scene.sync(&sim);

		info!(
			"post-graph: mounted {} nodes, {} edges at {}x{}",
			model.len(),
			model.links().len(),
			params.width,
			params.height
		);

		Ok(Self {
			model,
			params,
			config,
			sim,
			scene,
			controller: InteractionController::default(),
			disposed: false,
		})
	}

	pub fn params(&self) -> &RenderParams {
		&self.params
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	pub fn interaction(&self) -> InteractionState {
		self.controller.state()
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Topmost node under a canvas point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.scene.node_at(x, y)
	}

	/// Advances the layout by one tick if it is still moving.
	/// Returns whether the scene changed.
	pub fn frame(&mut self) -> bool {
		if self.disposed || !self.sim.step(&self.params.bounds()) {
			return false;
		}
		self.scene.sync(&self.sim);
		true
	}

	pub fn handle(&mut self, event: PointerEvent) -> Outcome {
		if self.disposed {
			return Outcome::None;
		}
		let mut targets = Targets {
			model: &self.model,
			scene: &mut self.scene,
			sim: &mut self.sim,
			bounds: self.params.bounds(),
			drag_alpha_target: self.config.drag_alpha_target,
		};
		self.controller.handle(event, &mut targets)
	}

	/// Stops the layout, drops every primitive and frees `container` for a
	/// later mount. Calling it again does nothing.
	pub fn dispose(&mut self, container: &impl Container) {
		if self.disposed {
			return;
		}
		self.sim.stop();
		self.scene.clear();
		container.release();
		self.disposed = true;
		debug!("post-graph: view disposed");
	}
}
