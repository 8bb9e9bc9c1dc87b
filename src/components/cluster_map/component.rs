//! Leptos component wrapping the cluster map canvas.
//!
//! The component creates an HTML canvas element and wires mouse, wheel and
//! keyboard handlers that only enqueue [`InputEvent`]s. An animation loop runs
//! via `requestAnimationFrame`, ticking the [`FrameScheduler`] once per frame;
//! selection changes coming out of the tick are written to the `selection`
//! signal for the detail panel.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window};

use super::camera::Viewport;
use super::geometry::Vec2;
use super::interaction::MapEvent;
use super::render::CanvasRenderer;
use super::scale::ScaleConfig;
use super::scene::NodeDetails;
use super::scheduler::{FrameScheduler, InputEvent};
use super::session::MapSession;
use super::theme::Theme;
use super::types::MapData;

/// Bundles the session with its scheduler and renderer.
struct MapContext {
	session: MapSession,
	scheduler: FrameScheduler,
	renderer: CanvasRenderer,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Vec2> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Vec2::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn enqueue(context: &Shared<MapContext>, event: InputEvent) {
	if let Some(ref mut c) = *context.borrow_mut() {
		c.scheduler.enqueue(event);
	}
}

/// Renders the interactive cluster map on a canvas element.
///
/// The dataset is read once when the canvas mounts. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Every change to
/// `close_requests` behaves like pressing Escape.
#[component]
pub fn ClusterMapCanvas(
	/// The dataset; read once when the canvas mounts.
	#[prop(into)]
	data: Signal<MapData>,
	/// Receives the details of the selected node, `None` on deselection.
	selection: WriteSignal<Option<NodeDetails>>,
	/// Bumped by the detail panel's close button.
	#[prop(into)]
	close_requests: Signal<u32>,
	/// Fill the window instead of the given size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Canvas width in CSS pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Canvas height in CSS pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<MapContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let keydown_cb: Shared<Closure<dyn FnMut(KeyboardEvent)>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init, keydown_cb_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("cluster-map: canvas has no 2d context");
				return;
			}
		};

		let theme = Theme::default();
		let data = data.get_untracked();
		let session = MapSession::with_palette(&data, Viewport::new(w, h), &theme.palette);
		*context_init.borrow_mut() = Some(MapContext {
			scheduler: FrameScheduler::new(session.config.interaction.clone()),
			session,
			renderer: CanvasRenderer::new(ctx, ScaleConfig::default(), theme),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				enqueue(
					&context_resize,
					InputEvent::Resize {
						width: nw,
						height: nh,
					},
				);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_key = context_init.clone();
		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if ev.key() == "Escape" {
				enqueue(&context_key, InputEvent::Escape);
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let events = match *context_anim.borrow_mut() {
				Some(ref mut c) => c.scheduler.tick(&mut c.session, &mut c.renderer),
				None => Vec::new(),
			};
			for event in events {
				match event {
					MapEvent::Selected { details, .. } => selection.set(Some(details)),
					MapEvent::Deselected => selection.set(None),
				}
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_close = context.clone();
	Effect::new(move |previous: Option<u32>| {
		let requests = close_requests.get();
		if previous.is_some_and(|p| p != requests) {
			enqueue(&context_close, InputEvent::Escape);
		}
		requests
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			enqueue(&context_md, InputEvent::PointerDown(at));
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			enqueue(&context_mm, InputEvent::PointerMove(at));
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| enqueue(&context_mu, InputEvent::PointerUp);

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| enqueue(&context_ml, InputEvent::PointerLeave);

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(pointer) = local_point(canvas_ref, &ev) {
			enqueue(
				&context_wh,
				InputEvent::Wheel {
					delta: ev.delta_y(),
					pointer,
				},
			);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="cluster-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
