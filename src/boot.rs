//! Page adapter: waits for the host container and graph data, then mounts.
//!
//! The host page may render the container and publish the data in either
//! order, and may do so after the script runs. Polling is bounded by
//! [`RetryPolicy`] and can be cancelled through the returned [`BootHandle`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::components::force_graph::{
	Container, ForceGraphCanvas, GraphHandle, GraphView, LayoutConfig, Theme,
};
use crate::load_graph_data;

/// Id of the element the graph is drawn into.
pub const CONTAINER_ID: &str = "graph-container";
/// Dataset key marking a container as taken (`data-graph-init`).
const INIT_KEY: &str = "graphInit";
/// Dataset key naming a post to focus on (`data-focus`).
const FOCUS_KEY: &str = "focus";
/// A focused graph with fewer nodes than this is not drawn.
const MIN_FOCUSED_NODES: usize = 2;

/// How often and how long to wait for the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
	pub interval_ms: i32,
	pub max_attempts: u32,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			interval_ms: 50,
			max_attempts: 200,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Poll {
	Ready,
	Wait(i32),
	GiveUp,
}

/// Attempt counter for [`RetryPolicy`].
#[derive(Clone, Debug)]
pub struct Retry {
	policy: RetryPolicy,
	attempts: u32,
}

impl Retry {
	pub fn new(policy: RetryPolicy) -> Self {
		Self {
			policy,
			attempts: 0,
		}
	}

	pub fn attempts(&self) -> u32 {
		self.attempts
	}

	/// Records one probe of the page and decides what happens next.
	pub fn poll(&mut self, ready: bool) -> Poll {
		if ready {
			return Poll::Ready;
		}
		self.attempts += 1;
		if self.attempts >= self.policy.max_attempts {
			Poll::GiveUp
		} else {
			Poll::Wait(self.policy.interval_ms)
		}
	}
}

impl Container for HtmlElement {
	fn width(&self) -> f64 {
		self.client_width() as f64
	}

	fn is_claimed(&self) -> bool {
		self.dataset().get(INIT_KEY).is_some()
	}

	fn claim(&self) {
		let _ = self.dataset().set(INIT_KEY, "1");
	}

	fn release(&self) {
		self.dataset().delete(INIT_KEY);
	}

	fn set_height(&self, height: f64) {
		let _ = self.style().set_property("height", &format!("{height}px"));
	}
}

/// A view mounted by [`boot`]. Dropping it tears the view down.
struct Mounted {
	graph: GraphHandle,
	host: HtmlElement,
	unmount: Option<Box<dyn FnOnce()>>,
}

impl Drop for Mounted {
	fn drop(&mut self) {
		self.graph.dispose(&self.host);
		if let Some(unmount) = self.unmount.take() {
			unmount();
		}
	}
}

struct BootState {
	retry: RefCell<Retry>,
	timer: Cell<Option<i32>>,
	attempt: RefCell<Option<Closure<dyn FnMut()>>>,
	mounted: RefCell<Option<Mounted>>,
	cancelled: Cell<bool>,
}

impl BootState {
	fn clear_timer(&self) {
		if let (Some(id), Some(window)) = (self.timer.take(), web_sys::window()) {
			window.clear_timeout_with_handle(id);
		}
	}

	fn schedule(&self, delay_ms: i32) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(cb) = self.attempt.borrow().as_ref() {
			let id = window
				.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms)
				.ok();
			self.timer.set(id);
		}
	}
}

impl Drop for BootState {
	fn drop(&mut self) {
		self.clear_timer();
	}
}

/// Owns the polling timer and, once mounted, the graph.
///
/// Dropping the handle cancels polling and disposes any mounted graph; call
/// [`BootHandle::forget`] to keep the graph for the life of the page.
pub struct BootHandle {
	state: Rc<BootState>,
}

impl BootHandle {
	/// Stops polling. A graph that is already mounted stays.
	pub fn cancel(&self) {
		self.state.cancelled.set(true);
		self.state.clear_timer();
	}

	pub fn is_mounted(&self) -> bool {
		self.state.mounted.borrow().is_some()
	}

	/// Stops polling and removes the graph, freeing the container.
	pub fn dispose(self) {
		self.cancel();
		self.state.mounted.borrow_mut().take();
	}

	/// Leaks the handle so the graph lives as long as the page.
	pub fn forget(self) {
		std::mem::forget(self);
	}
}

enum Probe {
	NotReady,
	Done,
}

/// Polls for the container and graph data, then mounts the graph.
pub fn boot(policy: RetryPolicy) -> BootHandle {
	let state = Rc::new(BootState {
		retry: RefCell::new(Retry::new(policy)),
		timer: Cell::new(None),
		attempt: RefCell::new(None),
		mounted: RefCell::new(None),
		cancelled: Cell::new(false),
	});

	let weak: Weak<BootState> = Rc::downgrade(&state);
	*state.attempt.borrow_mut() = Some(Closure::new(move || {
		let Some(state) = weak.upgrade() else {
			return;
		};
		state.timer.set(None);
		attempt(&state);
	}));

	attempt(&state);
	BootHandle { state }
}

fn attempt(state: &BootState) {
	if state.cancelled.get() {
		return;
	}
	let ready = matches!(try_mount(state), Probe::Done);
	let next = state.retry.borrow_mut().poll(ready);
	match next {
		Poll::Ready => {}
		Poll::Wait(delay) => state.schedule(delay),
		Poll::GiveUp => warn!(
			"post-graph: #{CONTAINER_ID} or graph data never appeared after {} attempts",
			state.retry.borrow().attempts()
		),
	}
}

fn try_mount(state: &BootState) -> Probe {
	let Some(window) = web_sys::window() else {
		return Probe::Done;
	};
	let Some(host) = window
		.document()
		.and_then(|document| document.get_element_by_id(CONTAINER_ID))
		.and_then(|element| element.dyn_into::<HtmlElement>().ok())
	else {
		return Probe::NotReady;
	};
	let data = match load_graph_data(&window) {
		Ok(Some(data)) => data,
		Ok(None) => return Probe::NotReady,
		Err(e) => {
			warn!("post-graph: {e}");
			return Probe::Done;
		}
	};

	let data = match host.dataset().get(FOCUS_KEY).filter(|focus| !focus.is_empty()) {
		Some(focus) => {
			let focused = data.focused_on(&focus);
			if focused.nodes.len() < MIN_FOCUSED_NODES {
				debug!("post-graph: {focus} has no related posts, nothing to draw");
				return Probe::Done;
			}
			focused
		}
		None => data,
	};

	let theme = Theme::from_document();
	let view = match GraphView::mount(&host, &data, &theme, LayoutConfig::default()) {
		Ok(view) => view,
		Err(e) => {
			info!("post-graph: not mounting: {e}");
			return Probe::Done;
		}
	};

	let graph = GraphHandle::new(view);
	let graph_view = graph.clone();
	let handle = leptos::mount::mount_to(host.clone(), move || {
		view! { <ForceGraphCanvas graph=graph_view /> }
	});
	*state.mounted.borrow_mut() = Some(Mounted {
		graph,
		host,
		unmount: Some(Box::new(move || drop(handle))),
	});
	Probe::Done
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ready_stops_polling() {
		let mut retry = Retry::new(RetryPolicy::default());
		assert_eq!(retry.poll(false), Poll::Wait(50));
		assert_eq!(retry.poll(true), Poll::Ready);
		assert_eq!(retry.attempts(), 1);
	}

	#[test]
	fn gives_up_after_max_attempts() {
		let mut retry = Retry::new(RetryPolicy {
			interval_ms: 10,
			max_attempts: 3,
		});
		assert_eq!(retry.poll(false), Poll::Wait(10));
		assert_eq!(retry.poll(false), Poll::Wait(10));
		assert_eq!(retry.poll(false), Poll::GiveUp);
	}

	#[test]
	fn default_policy_bounds_the_wait() {
		let policy = RetryPolicy::default();
		let total_ms = policy.interval_ms as u32 * policy.max_attempts;
		assert_eq!(total_ms, 10_000);
	}
}
