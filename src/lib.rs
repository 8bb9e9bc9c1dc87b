//! cluster-map: Interactive hierarchical map of a hub, its clusters and their leaves.
//!
//! This crate provides a WASM-based map component that lays clusters out
//! around a central hub without overlap, scatters leaves inside each cluster,
//! and lets the user pan, zoom, select and drag on a perspective canvas.

use getrandom as _;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::cluster_map::{ClusterMapCanvas, MapConfig, MapData, MapEvent, MapSession, NodeDetails};
pub use components::detail_panel::DetailPanel;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("cluster-map: logging initialized");
}

/// Load the map dataset from a script element with id="map-data".
/// Expected format: JSON with { hub: {...}, clusters: [...], config: {...} }
fn load_map_data() -> Option<MapData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("map-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<MapData>(&json_text) {
		Ok(data) => {
			info!("cluster-map: loaded {} cluster entries", data.clusters.len());
			Some(data)
		}
		Err(e) => {
			warn!("cluster-map: failed to parse map data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the dataset from the DOM and renders the map with its detail panel.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let map_data = load_map_data().unwrap_or_default();
	let data_signal = Signal::derive(move || map_data.clone());
	let (details, set_details) = signal(None::<NodeDetails>);
	let (close_requests, set_close_requests) = signal(0u32);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Cluster Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-map">
			<ClusterMapCanvas
				data=data_signal
				selection=set_details
				close_requests=close_requests
				fullscreen=true
			/>
			<div class="map-overlay">
				<h1>"Cluster Map"</h1>
				<p class="subtitle">"Click to select. Drag clusters to move them. Scroll to zoom. Esc to reset."</p>
			</div>
			<DetailPanel details=details close_requests=set_close_requests />
		</div>
	}
}
