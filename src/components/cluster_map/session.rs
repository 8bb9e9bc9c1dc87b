//! The per-page session: scene, camera, selection and viewport in one place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::camera::{CameraController, Viewport};
use super::config::MapConfig;
use super::interaction::SelectionState;
use super::layout::{ClusterSeed, LayoutEngine, LayoutReport};
use super::scene::{Node, SceneGraph};
use super::theme::NodePalette;
use super::types::MapData;

/// Everything the interaction pipeline, scheduler and renderer share.
///
/// Built once from the dataset and passed by reference; there is no other
/// map state.
#[derive(Clone, Debug)]
pub struct MapSession {
	/// Nodes and connectors.
	pub scene: SceneGraph,
	/// Camera pose and mode.
	pub camera: CameraController,
	/// The selected node, if any.
	pub selection: SelectionState,
	/// Canvas size used for projection.
	pub viewport: Viewport,
	/// What the layout run had to fall back on.
	pub report: LayoutReport,
	/// The configuration the session was built with.
	pub config: MapConfig,
}

impl MapSession {
	/// Lays out `data` with the default palette.
	pub fn new(data: &MapData, viewport: Viewport) -> Self {
		Self::with_palette(data, viewport, &NodePalette::default())
	}

	/// Lays out `data` with the configured seed, or with entropy when unset.
	pub fn with_palette(data: &MapData, viewport: Viewport, palette: &NodePalette) -> Self {
		match data.config.seed {
			Some(seed) => Self::with_rng(data, viewport, palette, &mut StdRng::seed_from_u64(seed)),
			None => Self::with_rng(data, viewport, palette, &mut StdRng::from_entropy()),
		}
	}

	/// Lays out `data` drawing from `rng`; the dataset seed is ignored.
	pub fn with_rng<R: Rng + ?Sized>(
		data: &MapData,
		viewport: Viewport,
		palette: &NodePalette,
		rng: &mut R,
	) -> Self {
		let config = data.config.clone();
		let specs = data.cluster_specs(palette);
		let seeds: Vec<ClusterSeed> = specs.iter().map(ClusterSeed::from).collect();
		let layout = LayoutEngine::new(&config.layout).place(&seeds, rng);
		let scene = SceneGraph::build(&data.hub, &config.layout, &specs, &layout);

		Self {
			scene,
			camera: CameraController::new(config.camera.clone()),
			selection: SelectionState::default(),
			viewport,
			report: layout.report,
			config,
		}
	}

	/// Tracks a canvas resize. The camera pose is untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	/// The selected node, resolved in the scene.
	pub fn selected_node(&self) -> Option<&Node> {
		self.selection.selected().and_then(|id| self.scene.node(id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cluster_map::scene::NodeKind;

	fn data(json: &str) -> MapData {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn same_seed_gives_same_layout() {
		let data = data(
			r#"{ "clusters": [
				{ "name": "A", "weight": 50, "leafCount": 3 },
				{ "name": "B", "weight": 80, "leafCount": 2 }
			], "config": { "seed": 42 } }"#,
		);
		let vp = Viewport::new(800.0, 600.0);
		let a = MapSession::new(&data, vp);
		let b = MapSession::new(&data, vp);
		let pos = |s: &MapSession| s.scene.nodes().map(|(_, n)| n.position()).collect::<Vec<_>>();
		assert_eq!(pos(&a), pos(&b));
		assert_eq!(a.scene.len(), 1 + 2 + 5);
	}

	#[test]
	fn skipped_entries_do_not_reach_the_scene() {
		let data = data(
			r#"{ "clusters": [{ "name": "A", "weight": 50 }, { "weight": 5 }], "config": { "seed": 1 } }"#,
		);
		let session = MapSession::new(&data, Viewport::new(800.0, 600.0));
		assert_eq!(session.scene.clusters().count(), 1);
		assert!(!session.report.is_degraded());
	}

	#[test]
	fn selected_node_follows_selection() {
		let mut session = MapSession::new(&MapData::default(), Viewport::new(10.0, 10.0));
		assert!(session.selected_node().is_none());
		session.selection.select(crate::components::cluster_map::scene::NodeId::HUB);
		assert_eq!(session.selected_node().map(Node::kind), Some(NodeKind::Hub));
		session.resize(0.0, 300.0);
		assert_eq!(session.viewport, Viewport::new(1.0, 300.0));
	}
}
