//! Force-directed layout simulation.
//!
//! A velocity-Verlet style spring embedder with a decaying energy scalar
//! (`alpha`). Each tick the forces add velocity terms scaled by `alpha`, then
//! free nodes integrate their velocity while pinned nodes sit at their pin.
//!
//! Forces, applied in order:
//! - link: springs toward `link_distance`
//! - charge: Barnes–Hut n-body repulsion
//! - center: translates the layout so its mean sits on the viewport center
//! - collision: keeps node circles from overlapping
//! - x / y: weak per-node pull toward the viewport center
//!
//! Layouts are deterministic: initial placement is a phyllotaxis spiral and
//! the jitter used to separate coincident points comes from a fixed-seed LCG.

use std::f64::consts::PI;

use super::model::Link;
use super::quadtree::QuadNode;
use super::viewport::{Bounds, RenderParams};

/// Tunables for the simulation. Defaults reproduce a classic d3-force setup.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Ticks run synchronously before the first paint.
	pub initial_ticks: usize,
	/// Ticking stops once alpha falls below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	/// Strength of the per-axis centering forces.
	pub axis_strength: f64,
	/// Alpha target while a node is dragged.
	pub drag_alpha_target: f64,
	/// Barnes–Hut opening angle.
	pub theta: f64,
	/// Charge interactions closer than this are softened.
	pub distance_min: f64,
	pub seed: u32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			initial_ticks: 300,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			axis_strength: 0.1,
			drag_alpha_target: 0.3,
			theta: 0.9,
			distance_min: 1.0,
			seed: 1,
		}
	}
}

/// Whether a node follows the forces or sits at a fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pin {
	#[default]
	Free,
	Pinned { x: f64, y: f64 },
}

/// Position and velocity of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Pin,
}

/// Linear congruential generator; a fixed seed keeps layouts reproducible.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Force parameters copied out of [`RenderParams`].
#[derive(Clone, Debug)]
struct Forces {
	link_distance: f64,
	charge_strength: f64,
	center: (f64, f64),
	collision_radius: f64,
	axis_strength: f64,
	theta2: f64,
	distance_min2: f64,
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<Link>,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	forces: Forces,
	alpha: f64,
	alpha_target: f64,
	alpha_min: f64,
	alpha_decay: f64,
	velocity_decay: f64,
	running: bool,
	rng: Lcg,
}

impl Simulation {
	pub fn new(node_count: usize, links: &[Link], params: &RenderParams, config: &LayoutConfig) -> Self {
		let (cx, cy) = params.center();
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let nodes = (0..node_count)
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				SimNode {
					x: cx + radius * angle.cos(),
					y: cy + radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; node_count];
		for link in links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_strength = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
			.collect();
		let link_bias = links
			.iter()
			.map(|l| {
				let (s, t) = (degree[l.source] as f64, degree[l.target] as f64);
				s / (s + t)
			})
			.collect();

		Self {
			nodes,
			links: links.to_vec(),
			link_strength,
			link_bias,
			forces: Forces {
				link_distance: params.link_distance,
				charge_strength: params.charge_strength,
				center: (cx, cy),
				collision_radius: params.collision_radius,
				axis_strength: config.axis_strength,
				theta2: config.theta * config.theta,
				distance_min2: config.distance_min * config.distance_min,
			},
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			velocity_decay: config.velocity_decay,
			running: false,
			rng: Lcg(config.seed),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.nodes.get(idx).map(|n| (n.x, n.y))
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Whether the animation loop should keep ticking.
	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resumes ticking from the current alpha.
	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Runs `ticks` steps synchronously, clamping into `bounds` afterwards.
	/// Leaves the simulation stopped.
	pub fn run(&mut self, ticks: usize, bounds: &Bounds) {
		for _ in 0..ticks {
			self.tick();
		}
		self.clamp_to(bounds);
		self.running = false;
	}

	/// One animation step: tick, clamp, and stop once settled.
	/// Returns whether positions changed.
	pub fn step(&mut self, bounds: &Bounds) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		self.clamp_to(bounds);
		if self.alpha < self.alpha_min {
			self.running = false;
		}
		true
	}

	pub fn clamp_to(&mut self, bounds: &Bounds) {
		for node in &mut self.nodes {
			(node.x, node.y) = bounds.clamp(node.x, node.y);
		}
	}

	/// Fixes a node at `(x, y)` until [`Simulation::release`].
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pin = Pin::Pinned { x, y };
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	pub fn release(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pin = Pin::Free;
		}
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();
		self.apply_axes();

		let keep = 1.0 - self.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Pin::Pinned { x, y } => {
					node.x = x;
					node.y = y;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				Pin::Free => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
	}

	fn apply_links(&mut self) {
		let alpha = self.alpha;
		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let len = (x * x + y * y).sqrt();
			let l = (len - self.forces.link_distance) / len * alpha * self.link_strength[i];
			x *= l;
			y *= l;

			let bias = self.link_bias[i];
			let target = &mut self.nodes[link.target];
			target.vx -= x * bias;
			target.vy -= y * bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - bias);
			source.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let points: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
		let Some(tree) = QuadNode::build(&points) else {
			return;
		};
		let strength = self.forces.charge_strength;
		let theta2 = self.forces.theta2;
		let dmin2 = self.forces.distance_min2;
		let alpha = self.alpha;
		let rng = &mut self.rng;

		for (idx, node) in self.nodes.iter_mut().enumerate() {
			let (px, py) = (node.x, node.y);
			let (mut fx, mut fy) = (0.0, 0.0);
			tree.visit(&mut |cell| {
				if cell.count == 0 {
					return true;
				}
				let (x, y) = (cell.com.0 - px, cell.com.1 - py);
				let w = cell.bounds.side_length();
				let l = x * x + y * y;
				if !cell.bounds.contains(px, py) && w * w / theta2 < l {
					let l = if l < dmin2 { (dmin2 * l).sqrt() } else { l };
					let value = strength * cell.count as f64;
					fx += x * value * alpha / l;
					fy += y * value * alpha / l;
					return true;
				}
				if !cell.is_leaf() {
					return false;
				}
				for &other in &cell.indices {
					if other == idx {
						continue;
					}
					let (mut x, mut y) = (points[other].0 - px, points[other].1 - py);
					if x == 0.0 {
						x = rng.jiggle();
					}
					if y == 0.0 {
						y = rng.jiggle();
					}
					let mut l = x * x + y * y;
					if l < dmin2 {
						l = (dmin2 * l).sqrt();
					}
					let w = strength * alpha / l;
					fx += x * w;
					fy += y * w;
				}
				true
			});
			node.vx += fx;
			node.vy += fy;
		}
	}

	fn apply_center(&mut self) {
		let n = self.nodes.len() as f64;
		if n == 0.0 {
			return;
		}
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (cx, cy) = self.forces.center;
		let (dx, dy) = (sx / n - cx, sy / n - cy);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	// Pairwise; post graphs stay small enough that a tree buys nothing here.
	fn apply_collision(&mut self) {
		let r = self.forces.collision_radius * 2.0;
		let r2 = r * r;
		// Every node shares one radius, so the mass ratio is always one half.
		let ratio = 0.5;
		for i in 0..self.nodes.len() {
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;
			for j in (i + 1)..self.nodes.len() {
				let other = &self.nodes[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r2 {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let len = l.sqrt();
				let push = (r - len) / len;
				x *= push;
				y *= push;
				self.nodes[i].vx += x * ratio;
				self.nodes[i].vy += y * ratio;
				self.nodes[j].vx -= x * (1.0 - ratio);
				self.nodes[j].vy -= y * (1.0 - ratio);
			}
		}
	}

	fn apply_axes(&mut self) {
		let (cx, cy) = self.forces.center;
		let k = self.forces.axis_strength * self.alpha;
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}
}
