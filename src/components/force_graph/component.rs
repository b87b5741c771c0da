//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas sized to the view's render params and
//! wires mouse and touch handlers into the interaction controller. An
//! animation loop runs via `requestAnimationFrame`, ticking the layout while it
//! is moving and repainting whenever the scene changed.
//!
//! Hover input goes through Leptos' delegated `on:` handlers. Touch listeners
//! are attached directly to the canvas as non-passive so a drag can stop the
//! page from scrolling, and a held mouse is followed at window level so a drag
//! survives leaving the canvas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
	HtmlElement, MouseEvent, Touch, TouchEvent,
};

use super::interaction::{InteractionState, Outcome, PointerEvent};
use super::paint::paint;
use super::view::{Container, GraphView};

/// A DOM event listener, removed from its target when dropped.
struct Listener {
	target: EventTarget,
	name: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach<E: JsCast + 'static>(
		target: &EventTarget,
		name: &'static str,
		passive: bool,
		mut handler: impl FnMut(E) + 'static,
	) -> Option<Self> {
		let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| handler(ev.unchecked_into::<E>()));
		let options = AddEventListenerOptions::new();
		options.set_passive(passive);
		if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
			name,
			callback.as_ref().unchecked_ref(),
			&options,
		) {
			warn!("post-graph: could not listen for {name}: {e:?}");
			return None;
		}
		Some(Self {
			target: target.clone(),
			name,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.name, self.callback.as_ref().unchecked_ref());
	}
}

/// Shared ownership of a mounted view and its animation loop.
///
/// Cloned into the component's event handlers; [`GraphHandle::dispose`] stops
/// the loop and tears the view down.
#[derive(Clone)]
pub struct GraphHandle {
	view: Rc<RefCell<GraphView>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frame_id: Rc<Cell<Option<i32>>>,
	dirty: Rc<Cell<bool>>,
	listeners: Rc<RefCell<Vec<Listener>>>,
}

impl GraphHandle {
	pub fn new(view: GraphView) -> Self {
		Self {
			view: Rc::new(RefCell::new(view)),
			animate: Rc::new(RefCell::new(None)),
			frame_id: Rc::new(Cell::new(None)),
			dirty: Rc::new(Cell::new(true)),
			listeners: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Stops the animation loop, removes the direct listeners and disposes
	/// the view.
	pub fn dispose(&self, container: &impl Container) {
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();
		self.listeners.borrow_mut().clear();
		self.view.borrow_mut().dispose(container);
	}

	fn dispatch(&self, event: PointerEvent) {
		let outcome = self.view.borrow_mut().handle(event);
		match outcome {
			Outcome::None => {}
			Outcome::Redraw => self.dirty.set(true),
			Outcome::Navigate(href) => {
				let Some(window) = web_sys::window() else {
					return;
				};
				if let Err(e) = window.location().set_href(&href) {
					warn!("post-graph: navigation to {href} failed: {e:?}");
				}
			}
		}
	}

	fn is_dragging(&self) -> bool {
		matches!(self.view.borrow().interaction(), InteractionState::Dragging(_))
	}

	fn is_held(&self) -> bool {
		self.view.borrow().interaction().is_held()
	}

	/// Attaches the touch listeners to the canvas and the held-mouse listeners
	/// to the window.
	fn listen(&self, canvas: &HtmlCanvasElement, window: &web_sys::Window, width: f64, height: f64) {
		let canvas_target: &EventTarget = canvas.as_ref();
		let window_target: &EventTarget = window.as_ref();
		let mut listeners = self.listeners.borrow_mut();

		let (graph, el) = (self.clone(), canvas.clone());
		listeners.extend(Listener::attach(canvas_target, "touchstart", false, move |ev: TouchEvent| {
			let Some(touch) = ev.touches().get(0) else {
				return;
			};
			let (x, y) = touch_point(&el, &touch, width, height);
			// Only claim the gesture when it starts on a node so the page still scrolls.
			if graph.view.borrow().node_at(x, y).is_some() {
				ev.prevent_default();
			}
			graph.dispatch(PointerEvent::Down { x, y });
		}));

		let (graph, el) = (self.clone(), canvas.clone());
		listeners.extend(Listener::attach(canvas_target, "touchmove", false, move |ev: TouchEvent| {
			let Some(touch) = ev.touches().get(0) else {
				return;
			};
			let (x, y) = touch_point(&el, &touch, width, height);
			graph.dispatch(PointerEvent::Move { x, y });
			if graph.is_dragging() {
				ev.prevent_default();
			}
		}));

		let (graph, el) = (self.clone(), canvas.clone());
		listeners.extend(Listener::attach(canvas_target, "touchend", true, move |ev: TouchEvent| {
			if let Some(touch) = ev.changed_touches().get(0) {
				let (x, y) = touch_point(&el, &touch, width, height);
				graph.dispatch(PointerEvent::Up { x, y });
			}
			graph.dispatch(PointerEvent::Leave);
		}));

		let graph = self.clone();
		listeners.extend(Listener::attach(canvas_target, "touchcancel", true, move |_: TouchEvent| {
			graph.dispatch(PointerEvent::Leave);
		}));

		let (graph, el) = (self.clone(), canvas.clone());
		listeners.extend(Listener::attach(window_target, "mousemove", true, move |ev: MouseEvent| {
			if !graph.is_held() {
				return;
			}
			let (x, y) = canvas_point(&el, ev.client_x() as f64, ev.client_y() as f64, width, height);
			graph.dispatch(PointerEvent::Move { x, y });
			set_cursor(&el, true);
		}));

		let (graph, el) = (self.clone(), canvas.clone());
		listeners.extend(Listener::attach(window_target, "mouseup", true, move |ev: MouseEvent| {
			if !graph.is_held() {
				return;
			}
			let (x, y) = canvas_point(&el, ev.client_x() as f64, ev.client_y() as f64, width, height);
			graph.dispatch(PointerEvent::Up { x, y });
		}));
	}
}

fn cursor_for(over_node: bool) -> &'static str {
	if over_node { "pointer" } else { "default" }
}

fn set_cursor(canvas: &HtmlCanvasElement, over_node: bool) {
	// Inherent `HtmlElement::style`, not Leptos' `ElementExt::style`.
	let _ = HtmlElement::style(canvas).set_property("cursor", cursor_for(over_node));
}

/// Maps client coordinates into canvas (graph) coordinates.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64, width: f64, height: f64) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	let sx = if rect.width() > 0.0 { width / rect.width() } else { 1.0 };
	let sy = if rect.height() > 0.0 { height / rect.height() } else { 1.0 };
	((client_x - rect.left()) * sx, (client_y - rect.top()) * sy)
}

fn touch_point(canvas: &HtmlCanvasElement, touch: &Touch, width: f64, height: f64) -> (f64, f64) {
	canvas_point(canvas, touch.client_x() as f64, touch.client_y() as f64, width, height)
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// The view must already be laid out; the component only draws it and feeds
/// it pointer input.
#[component]
pub fn ForceGraphCanvas(graph: GraphHandle) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (width, height) = {
		let view = graph.view.borrow();
		(view.params().width, view.params().height)
	};

	let graph_init = graph.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if graph_init.animate.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let ratio = window.device_pixel_ratio().max(1.0);
		canvas.set_width((width * ratio).round() as u32);
		canvas.set_height((height * ratio).round() as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("post-graph: canvas 2d context unavailable");
			return;
		};

		graph_init.listen(&canvas, &window, width, height);

		let (graph_anim, animate_inner) = (graph_init.clone(), graph_init.animate.clone());
		*graph_init.animate.borrow_mut() = Some(Closure::new(move || {
			graph_anim.frame_id.set(None);
			if graph_anim.view.borrow().is_disposed() {
				return;
			}
			let moved = graph_anim.view.borrow_mut().frame();
			if moved || graph_anim.dirty.replace(false) {
				paint(graph_anim.view.borrow().scene(), &ctx, width, height, ratio);
			}
			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				graph_anim
					.frame_id
					.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *graph_init.animate.borrow() {
			graph_init
				.frame_id
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let canvas_el = move || -> Option<HtmlCanvasElement> { canvas_ref.get().map(Into::into) };

	// While a node is held the window-level listeners take over.
	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_el() else {
			return;
		};
		if graph_mm.is_held() {
			return;
		}
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64, width, height);
		graph_mm.dispatch(PointerEvent::Move { x, y });
		set_cursor(&canvas, graph_mm.view.borrow().node_at(x, y).is_some());
	};

	let graph_md = graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_el() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64, width, height);
		graph_md.dispatch(PointerEvent::Down { x, y });
		if graph_md.is_held() {
			// Keeps the browser from starting a text selection mid-drag.
			ev.prevent_default();
		}
	};

	let graph_ml = graph;
	let on_mouseleave = move |_: MouseEvent| {
		if graph_ml.is_held() {
			return;
		}
		graph_ml.dispatch(PointerEvent::Leave);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="post-graph-canvas"
			on:mousemove=on_mousemove
			on:mousedown=on_mousedown
			on:mouseleave=on_mouseleave
			style=format!("display: block; width: {width}px; height: {height}px;")
		/>
	}
}
