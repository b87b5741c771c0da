//! Graph data structures for input to the force graph component.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A post in the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Display title. Long titles are truncated when rendered.
	#[serde(default)]
	pub title: String,
	/// Destination the page navigates to when the node is clicked.
	#[serde(default)]
	pub href: String,
}

/// An undirected connection between two posts.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

/// Complete graph data: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Restricts the graph to `focus` and the posts sharing an edge with it.
	///
	/// Edges are kept only when both endpoints survive. A focus that appears in
	/// no edge yields an empty graph.
	pub fn focused_on(&self, focus: &str) -> GraphData {
		let connected: HashSet<&str> = self
			.edges
			.iter()
			.filter(|e| e.source == focus || e.target == focus)
			.flat_map(|e| [e.source.as_str(), e.target.as_str()])
			.collect();

		let nodes: Vec<GraphNode> = self
			.nodes
			.iter()
			.filter(|n| connected.contains(n.id.as_str()))
			.cloned()
			.collect();
		let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let edges = self
			.edges
			.iter()
			.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
			.cloned()
			.collect();

		GraphData { nodes, edges }
	}
}
