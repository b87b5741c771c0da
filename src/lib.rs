//! post-graph: Interactive force-directed graph of connected blog posts.
//!
//! This crate provides a WASM-based graph component that lays out posts and
//! the links between them with a physics simulation, draws them on a canvas,
//! and lets readers explore connections by hovering, dragging and clicking.

use log::{Level, info};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlScriptElement, Window};

pub mod boot;
pub mod components;

pub use boot::{BootHandle, RetryPolicy, boot};
pub use components::force_graph::{
	Container, ForceGraphCanvas, GraphData, GraphEdge, GraphHandle, GraphNode, GraphView,
	LayoutConfig, MountError, RenderParams, Theme,
};

/// Id of the `<script type="application/json">` element carrying the graph.
pub const DATA_SCRIPT_ID: &str = "graph-data";
/// Window property checked when no data script is present.
pub const DATA_GLOBAL: &str = "__GRAPH_DATA__";

#[derive(Debug, Error)]
pub enum DataError {
	#[error("graph data is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("window.{DATA_GLOBAL} could not be serialized")]
	Unserializable,
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("post-graph: logging initialized");
}

pub fn parse_graph_data(json: &str) -> Result<GraphData, DataError> {
	Ok(serde_json::from_str(json)?)
}

/// Load graph data from a script element with id="graph-data", falling back
/// to `window.__GRAPH_DATA__`.
/// Expected format: JSON with { nodes: [...], edges: [...] }
///
/// `Ok(None)` means no data has been published yet.
fn load_graph_data(window: &Window) -> Result<Option<GraphData>, DataError> {
	let script = window
		.document()
		.and_then(|document| document.get_element_by_id(DATA_SCRIPT_ID))
		.and_then(|element| element.dyn_into::<HtmlScriptElement>().ok());
	if let Some(script) = script {
		let json_text = script.text().unwrap_or_default();
		let data = parse_graph_data(&json_text)?;
		info!(
			"post-graph: loaded {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		return Ok(Some(data));
	}

	let Some(global) = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str(DATA_GLOBAL))
		.ok()
		.filter(|value| !value.is_undefined() && !value.is_null())
	else {
		return Ok(None);
	};
	let json: String = js_sys::JSON::stringify(&global)
		.map_err(|_| DataError::Unserializable)?
		.into();
	parse_graph_data(&json).map(Some)
}
