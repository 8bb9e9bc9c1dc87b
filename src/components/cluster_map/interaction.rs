//! Pointer and keyboard handling: hit testing, selection, drag and pan.
//!
//! A press on the hub or a cluster selects it and aims the camera; a press on
//! a cluster also arms a drag that engages once the pointer has travelled
//! `drag_threshold` pixels. A press on empty ground clears the selection and
//! pans the camera. At most one gesture is active at a time.

use log::{debug, warn};

use super::config::InteractionConfig;
use super::geometry::Vec2;
use super::scene::{Node, NodeDetails, NodeId, NodeKind};
use super::session::MapSession;

/// The single selected node, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	selected: Option<NodeId>,
}

impl SelectionState {
	/// The selected node.
	pub fn selected(&self) -> Option<NodeId> {
		self.selected
	}

	/// Replaces the selection.
	pub fn select(&mut self, id: NodeId) {
		self.selected = Some(id);
	}

	/// Clears the selection.
	pub fn clear(&mut self) {
		self.selected = None;
	}
}

/// Selection changes, for the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
	/// A node was pressed and is now selected.
	Selected {
		/// The selected node.
		id: NodeId,
		/// Its kind.
		kind: NodeKind,
		/// Text for the detail panel.
		details: NodeDetails,
	},
	/// The selection was cleared.
	Deselected,
}

/// A press on a cluster, armed until the pointer passes the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
	/// The cluster being dragged.
	pub node: NodeId,
	/// Screen point of the press.
	pub press: Vec2,
	/// Ground point under the press minus the cluster centre.
	///
	/// Kept in world units so the cluster stays under the pointer while the
	/// camera is still flying toward it.
	pub grab: Option<Vec2>,
	/// Last screen point a move was applied at.
	pub last: Vec2,
	/// Whether the pointer has passed the drag threshold.
	pub engaged: bool,
}

/// A press on empty ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanState {
	/// Last screen point the camera was panned to.
	pub last: Vec2,
}

/// The pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Pressed on a cluster.
	Drag(DragState),
	/// Pressed on empty ground.
	Pan(PanState),
}

/// Turns pointer input into selection, node moves and camera moves.
#[derive(Clone, Debug)]
pub struct InteractionPipeline {
	config: InteractionConfig,
	gesture: Gesture,
}

impl InteractionPipeline {
	/// Idle pipeline.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			gesture: Gesture::Idle,
		}
	}

	/// The gesture in progress.
	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	/// Nearest selectable node under a screen point.
	///
	/// Only the hub and clusters are pickable; each is a sphere on the ground
	/// plane with its configured hit radius.
	pub fn hit_test(&self, session: &MapSession, screen: Vec2) -> Option<NodeId> {
		let ray = session.camera.ray(screen, &session.viewport);
		session
			.scene
			.nodes()
			.filter_map(|(id, node)| {
				let radius = match node {
					Node::Hub(_) => self.config.hub_hit_radius,
					Node::Cluster(_) => self.config.cluster_hit_radius,
					Node::Leaf(_) => return None,
				};
				ray.intersect_sphere(node.position().with_z(0.0), radius)
					.map(|t| (id, t))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	/// Selects what is under `screen` and starts a drag or pan.
	pub fn pointer_down(&mut self, session: &mut MapSession, screen: Vec2) -> MapEvent {
		self.gesture = Gesture::Idle;
		let Some(id) = self.hit_test(session, screen) else {
			session.selection.clear();
			self.gesture = Gesture::Pan(PanState { last: screen });
			debug!("cluster-map: selection cleared");
			return MapEvent::Deselected;
		};

		let Some(node) = session.scene.node(id) else {
			return MapEvent::Deselected;
		};
		session.selection.select(id);
		match node {
			Node::Cluster(cluster) => {
				let grab = session
					.camera
					.unproject(screen, &session.viewport)
					.map(|ground| ground - cluster.position);
				session.camera.fly_to_circle(cluster.position, cluster.radius);
				self.gesture = Gesture::Drag(DragState {
					node: id,
					press: screen,
					grab,
					last: screen,
					engaged: false,
				});
			}
			_ => session.camera.fly_to_overview(),
		}
		let details = node.details().cloned().unwrap_or_default();
		debug!("cluster-map: selected {id:?} ({})", details.name);
		MapEvent::Selected {
			id,
			kind: node.kind(),
			details,
		}
	}

	/// Applies a drag or pan step for the active gesture.
	pub fn pointer_move(&mut self, session: &mut MapSession, screen: Vec2) {
		match &mut self.gesture {
			Gesture::Idle => {}
			Gesture::Pan(pan) => {
				let delta = screen - pan.last;
				pan.last = screen;
				session.camera.pan(delta, &session.viewport);
			}
			Gesture::Drag(drag) => {
				let delta = if drag.engaged {
					screen - drag.last
				} else if screen.distance(drag.press) >= self.config.drag_threshold {
					drag.engaged = true;
					screen - drag.press
				} else {
					return;
				};
				drag.last = screen;
				let (node, grab) = (drag.node, drag.grab);
				session.camera.cancel_autopilot();
				let anchored = grab
					.zip(session.camera.unproject(screen, &session.viewport))
					.and_then(|(grab, ground)| {
						let current = session.scene.node(node)?.position();
						Some(ground - grab - current)
					});
				// Without a ground hit the screen delta is scaled at the current height.
				let world = anchored
					.unwrap_or_else(|| session.camera.screen_delta_to_world(delta, &session.viewport));
				if let Err(e) = session.scene.move_node(node, world) {
					warn!("cluster-map: drag ended: {e}");
					self.gesture = Gesture::Idle;
				}
			}
		}
	}

	/// Ends the active gesture. The selection stays.
	pub fn pointer_up(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Cancels the active gesture like a release.
	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Zooms about the pointer. Cancels the autopilot.
	pub fn wheel(&mut self, session: &mut MapSession, delta: f64, pointer: Vec2) {
		session.camera.wheel(delta, pointer, &session.viewport);
	}

	/// Deselects, closes the panel and sends the camera back to the overview.
	pub fn escape(&mut self, session: &mut MapSession) -> MapEvent {
		self.gesture = Gesture::Idle;
		session.selection.clear();
		session.camera.fly_to_overview();
		debug!("cluster-map: escape, returning to overview");
		MapEvent::Deselected
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cluster_map::camera::{CameraMode, Viewport};
	use crate::components::cluster_map::config::MapConfig;
	use crate::components::cluster_map::types::MapData;
	use float_cmp::approx_eq;

	fn session() -> MapSession {
		let data: MapData = serde_json::from_str(
			r#"{
				"hub": { "name": "HQ" },
				"clusters": [
					{ "name": "A", "weight": 196, "leafCount": 4 },
					{ "name": "B", "weight": 100, "leafCount": 2 }
				],
				"config": { "seed": 11, "camera": { "overview": { "x": 0, "y": 0, "z": 60 } } }
			}"#,
		)
		.unwrap();
		MapSession::new(&data, Viewport::new(1200.0, 800.0))
	}

	fn pipeline() -> InteractionPipeline {
		InteractionPipeline::new(MapConfig::default().interaction)
	}

	fn screen_of(session: &MapSession, id: NodeId) -> Vec2 {
		let pos = session.scene.node(id).unwrap().position();
		session.camera.world_to_screen(pos, &session.viewport)
	}

	fn empty_spot(session: &MapSession) -> Vec2 {
		let p = pipeline();
		(0..12)
			.flat_map(|i| (0..8).map(move |j| Vec2::new(50.0 + 100.0 * i as f64, 50.0 + 100.0 * j as f64)))
			.find(|&spot| p.hit_test(session, spot).is_none())
			.unwrap()
	}

	#[test]
	fn picks_hub_and_clusters() {
		let session = session();
		let p = pipeline();
		assert_eq!(p.hit_test(&session, screen_of(&session, NodeId::HUB)), Some(NodeId::HUB));
		let (cluster, _) = session.scene.clusters().next().unwrap();
		assert_eq!(p.hit_test(&session, screen_of(&session, cluster)), Some(cluster));
	}

	#[test]
	fn pressing_a_cluster_selects_and_flies() {
		let mut session = session();
		let mut p = pipeline();
		let (id, cluster) = session.scene.clusters().next().map(|(i, c)| (i, c.clone())).unwrap();
		let press = screen_of(&session, id);
		let event = p.pointer_down(&mut session, press);
		assert!(matches!(event, MapEvent::Selected { id: sel, kind: NodeKind::Cluster, .. } if sel == id));
		assert_eq!(session.selection.selected(), Some(id));
		assert_eq!(session.camera.mode(), CameraMode::Autopilot);
		assert!(approx_eq!(f64, session.camera.state().target.x, cluster.position.x));
		assert!(matches!(p.gesture(), Gesture::Drag(DragState { engaged: false, .. })));
	}

	#[test]
	fn pressing_the_hub_starts_no_drag() {
		let mut session = session();
		let mut p = pipeline();
		let hub = screen_of(&session, NodeId::HUB);
		let event = p.pointer_down(&mut session, hub);
		assert!(matches!(event, MapEvent::Selected { kind: NodeKind::Hub, .. }));
		assert_eq!(p.gesture(), Gesture::Idle);
		p.pointer_move(&mut session, hub + Vec2::new(40.0, 40.0));
		assert_eq!(session.scene.hub().unwrap().position, Vec2::ZERO);
	}

	#[test]
	fn small_moves_stay_a_click() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let before = session.scene.node(id).unwrap().position();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		p.pointer_move(&mut session, press + Vec2::new(1.0, 1.5));
		assert_eq!(session.scene.node(id).unwrap().position(), before);
		assert_eq!(session.camera.mode(), CameraMode::Autopilot);
	}

	#[test]
	fn engaged_drag_tracks_the_pointer_and_cancels_autopilot() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		p.pointer_move(&mut session, press + Vec2::new(5.0, 0.0));
		p.pointer_move(&mut session, press + Vec2::new(25.0, -10.0));
		assert_eq!(session.camera.mode(), CameraMode::Manual);
		let now = screen_of(&session, id);
		assert!(now.distance(press + Vec2::new(25.0, -10.0)) < 1e-9);
	}

	#[test]
	fn pointer_leave_ends_an_engaged_drag() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		p.pointer_move(&mut session, press + Vec2::new(20.0, 0.0));
		assert!(matches!(p.gesture(), Gesture::Drag(DragState { engaged: true, .. })));
		let dropped = session.scene.node(id).unwrap().position();

		p.pointer_leave();
		assert_eq!(p.gesture(), Gesture::Idle);
		p.pointer_move(&mut session, press + Vec2::new(80.0, 40.0));
		assert_eq!(session.scene.node(id).unwrap().position(), dropped);
		assert_eq!(session.selection.selected(), Some(id));
	}

	#[test]
	fn drag_keeps_the_grab_point_after_the_camera_moves() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		for _ in 0..15 {
			session.camera.advance();
		}
		let pointer = press + Vec2::new(0.0, 30.0);
		p.pointer_move(&mut session, pointer);
		assert!(screen_of(&session, id).distance(pointer) < 1e-6);
	}

	#[test]
	fn empty_press_deselects_and_pans() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		p.pointer_up();
		assert_eq!(session.selection.selected(), Some(id));

		let spot = empty_spot(&session);
		let event = p.pointer_down(&mut session, spot);
		assert_eq!(event, MapEvent::Deselected);
		assert_eq!(session.selection.selected(), None);

		let cam = session.camera.position();
		p.pointer_move(&mut session, spot + Vec2::new(10.0, 0.0));
		assert!(session.camera.position().x < cam.x);
		p.pointer_leave();
		assert_eq!(p.gesture(), Gesture::Idle);
	}

	#[test]
	fn escape_returns_to_overview() {
		let mut session = session();
		let mut p = pipeline();
		let (id, _) = session.scene.clusters().next().unwrap();
		let press = screen_of(&session, id);
		p.pointer_down(&mut session, press);
		assert_eq!(p.escape(&mut session), MapEvent::Deselected);
		assert_eq!(session.selection.selected(), None);
		assert_eq!(p.gesture(), Gesture::Idle);
		assert_eq!(session.camera.mode(), CameraMode::Autopilot);
		assert!(approx_eq!(f64, session.camera.state().target.z, 60.0));
	}

	#[test]
	fn wheel_zooms_the_camera() {
		let mut session = session();
		let mut p = pipeline();
		let z = session.camera.position().z;
		p.wheel(&mut session, 100.0, Vec2::new(600.0, 400.0));
		assert!(approx_eq!(f64, session.camera.position().z, z + 10.0));
	}
}
