//! Validated, index-addressed view of the input graph.
//!
//! Nodes keep their input order and are addressed by position. Edges that
//! reference unknown ids are dropped once here and never seen again by the
//! layout, scene or interaction code.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::types::{GraphEdge, GraphNode};

/// An edge resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	pub source: usize,
	pub target: usize,
}

impl Link {
	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Undirected neighbor sets, built once from the valid edges.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	neighbors: HashMap<usize, HashSet<usize>>,
}

impl AdjacencyIndex {
	fn from_links(links: &[Link]) -> Self {
		let mut neighbors: HashMap<usize, HashSet<usize>> = HashMap::new();
		for link in links {
			neighbors.entry(link.source).or_default().insert(link.target);
			neighbors.entry(link.target).or_default().insert(link.source);
		}
		Self { neighbors }
	}

	pub fn neighbors(&self, idx: usize) -> Option<&HashSet<usize>> {
		self.neighbors.get(&idx)
	}

	pub fn contains(&self, idx: usize, other: usize) -> bool {
		self.neighbors
			.get(&idx)
			.is_some_and(|set| set.contains(&other))
	}
}

/// Nodes, valid links and adjacency for one view.
#[derive(Clone, Debug)]
pub struct GraphModel {
	nodes: Vec<GraphNode>,
	links: Vec<Link>,
	adjacency: AdjacencyIndex,
	id_to_idx: HashMap<String, usize>,
}

impl GraphModel {
	/// Indexes `nodes` and keeps the edges whose endpoints both exist.
	///
	/// Returns `None` when there are no nodes to draw. Duplicate ids keep the
	/// first occurrence.
	pub fn build(nodes: &[GraphNode], edges: &[GraphEdge]) -> Option<Self> {
		if nodes.is_empty() {
			return None;
		}

		let mut id_to_idx = HashMap::with_capacity(nodes.len());
		let mut kept = Vec::with_capacity(nodes.len());
		for node in nodes {
			if id_to_idx.contains_key(&node.id) {
				debug!("post-graph: duplicate node id {:?} ignored", node.id);
				continue;
			}
			id_to_idx.insert(node.id.clone(), kept.len());
			kept.push(node.clone());
		}

		let links: Vec<Link> = edges
			.iter()
			.filter_map(|edge| {
				match (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
					(Some(&source), Some(&target)) => Some(Link { source, target }),
					_ => {
						debug!(
							"post-graph: dropping edge {} -> {} with unknown endpoint",
							edge.source, edge.target
						);
						None
					}
				}
			})
			.collect();

		let adjacency = AdjacencyIndex::from_links(&links);

		Some(Self {
			nodes: kept,
			links,
			adjacency,
			id_to_idx,
		})
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.id_to_idx.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether `idx` is the focused node or one of its neighbors.
	pub fn is_adjacent_or_self(&self, focus: usize, idx: usize) -> bool {
		focus == idx || self.adjacency.contains(focus, idx)
	}
}
