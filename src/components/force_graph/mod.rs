//! Force-directed graph of connected posts.
//!
//! Renders an interactive node-link diagram on an HTML canvas with:
//! - A d3-style force simulation run to rest before the first paint
//! - Hover highlighting of a post and its direct neighbors
//! - Dragging posts to reposition them while the layout reacts
//! - Click-to-navigate to the post's page
//!
//! Everything except [`ForceGraphCanvas`] and the canvas painter is plain
//! Rust and runs without a browser.
//!
//! # Example
//!
//! ```ignore
//! use post_graph::{GraphData, GraphHandle, GraphView, LayoutConfig, Theme};
//!
//! let view = GraphView::mount(&host, &data, &Theme::from_document(), LayoutConfig::default())?;
//! let graph = GraphHandle::new(view);
//! view! { <ForceGraphCanvas graph=graph /> }
//! ```

mod component;
mod interaction;
mod model;
mod paint;
mod quadtree;
mod scene;
mod simulation;
pub mod theme;
mod types;
mod view;
pub mod viewport;

pub use component::{ForceGraphCanvas, GraphHandle};
pub use interaction::{InteractionState, Outcome, PointerEvent};
pub use model::{AdjacencyIndex, GraphModel, Link};
pub use scene::{CirclePrimitive, LabelPrimitive, LinePrimitive, Scene, truncate_title};
pub use simulation::{LayoutConfig, Pin, SimNode, Simulation};
pub use theme::Theme;
pub use types::{GraphData, GraphEdge, GraphNode};
pub use view::{Container, GraphView, MountError};
pub use viewport::{Bounds, RenderParams};
