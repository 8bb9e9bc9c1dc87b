//! End-to-end scenarios driven through the scheduler's input queue.

use cluster_map::components::cluster_map::camera::{CameraMode, Viewport};
use cluster_map::components::cluster_map::config::LayoutConfig;
use cluster_map::components::cluster_map::geometry::Vec2;
use cluster_map::components::cluster_map::layout::{ClusterSeed, LayoutEngine};
use cluster_map::components::cluster_map::scene::{Node, NodeId};
use cluster_map::components::cluster_map::{FrameScheduler, FrameSink, InputEvent, MapData, MapEvent, MapSession};
use float_cmp::approx_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Remembers what each drawn frame looked like.
#[derive(Default)]
struct RecordingSink {
	frames: Vec<(Option<NodeId>, f64)>,
}

impl FrameSink for RecordingSink {
	fn draw(&mut self, session: &MapSession) {
		self.frames
			.push((session.selection.selected(), session.camera.position().z));
	}
}

fn session(json: &str) -> (MapSession, FrameScheduler) {
	let data: MapData = serde_json::from_str(json).unwrap();
	let session = MapSession::new(&data, Viewport::new(1200.0, 800.0));
	let scheduler = FrameScheduler::new(session.config.interaction.clone());
	(session, scheduler)
}

fn first_cluster(session: &MapSession) -> NodeId {
	session.scene.clusters().next().map(|(id, _)| id).unwrap()
}

fn screen_of(session: &MapSession, id: NodeId) -> Vec2 {
	let world = session.scene.node(id).unwrap().position();
	session.camera.world_to_screen(world, &session.viewport)
}

#[test]
fn nine_weighted_clusters_place_without_overlap_or_fallback() {
	let config = LayoutConfig {
		min_annulus: 12.0,
		max_annulus: 30.0,
		hub_exclusion: 3.0,
		max_attempts: 250,
		..LayoutConfig::default()
	};
	let seeds: Vec<ClusterSeed> = (1..=9)
		.map(|i| ClusterSeed {
			weight: 10.0 * i as f64,
			leaf_count: 0,
		})
		.collect();

	for seed in 0..16 {
		let layout = LayoutEngine::new(&config).place(&seeds, &mut StdRng::seed_from_u64(seed));
		assert_eq!(layout.clusters.len(), 9);
		assert_eq!(layout.report.cluster_fallbacks(), 0, "seed {seed} fell back");
		assert!(layout.report.cluster_samples <= 9 * 250);

		for (i, a) in layout.clusters.iter().enumerate() {
			let from_hub = a.position.length();
			assert!((12.0 - 1e-9..=30.0 + 1e-9).contains(&from_hub));
			for b in &layout.clusters[i + 1..] {
				assert!(
					a.position.distance(b.position) >= a.exclusion_radius + b.exclusion_radius,
					"seed {seed}: {:?} overlaps {:?}",
					a.id,
					b.id
				);
			}
		}
	}
}

#[test]
fn selecting_a_cluster_targets_the_fitting_height() {
	let (mut session, mut scheduler) = session(
		r#"{ "clusters": [{ "name": "Borobotics", "weight": 196, "leafCount": 3 }],
		     "config": { "seed": 5 } }"#,
	);
	let id = first_cluster(&session);
	let Some(Node::Cluster(cluster)) = session.scene.node(id) else {
		panic!("first cluster missing");
	};
	assert!(approx_eq!(f64, cluster.radius, 3.5, epsilon = 1e-12));

	let mut sink = RecordingSink::default();
	scheduler.enqueue(InputEvent::PointerDown(screen_of(&session, id)));
	scheduler.enqueue(InputEvent::PointerUp);
	let events = scheduler.tick(&mut session, &mut sink);

	assert!(matches!(
		events.as_slice(),
		[MapEvent::Selected { id: selected, details, .. }] if *selected == id && details.name == "Borobotics"
	));
	let expected = (3.5 * 1.25) / 15f64.to_radians().tan();
	assert!(approx_eq!(f64, session.camera.fit_height(3.5), expected, epsilon = 1e-12));
	assert!(approx_eq!(f64, session.camera.state().target.z, expected, epsilon = 1e-9));
	assert_eq!(session.camera.mode(), CameraMode::Autopilot);
	assert_eq!(sink.frames.len(), 1);
	assert_eq!(sink.frames[0].0, Some(id));

	for _ in 0..200 {
		scheduler.tick(&mut session, &mut sink);
	}
	assert_eq!(session.camera.mode(), CameraMode::Manual);
	assert!(session.camera.position().distance(session.camera.state().target) < 0.1);
	assert_eq!(session.selection.selected(), Some(id), "selection survives pointer-up");
}

#[test]
fn dragging_a_cluster_moves_its_leaves_by_the_same_world_delta() {
	let (mut session, mut scheduler) = session(
		r#"{ "clusters": [{ "name": "A", "weight": 144, "leafCount": 5 }],
		     "config": { "seed": 9, "camera": { "overview": { "x": 0, "y": 0, "z": 60 } } } }"#,
	);
	assert!(approx_eq!(f64, session.camera.position().z, 60.0));
	let id = first_cluster(&session);
	let Some(Node::Cluster(cluster)) = session.scene.node(id).cloned() else {
		panic!("first cluster missing");
	};
	assert_eq!(cluster.leaf_ids.len(), 5);
	let leaves_before: Vec<Vec2> = cluster
		.leaf_ids
		.iter()
		.map(|&leaf| session.scene.node(leaf).unwrap().position())
		.collect();

	let press = screen_of(&session, id);
	scheduler.enqueue(InputEvent::PointerDown(press));
	scheduler.enqueue(InputEvent::PointerMove(press + Vec2::new(10.0, 5.0)));
	scheduler.enqueue(InputEvent::PointerUp);
	scheduler.tick(&mut session, &mut RecordingSink::default());

	let s = 2.0 * 15f64.to_radians().tan() * 60.0 / 800.0;
	assert!(approx_eq!(
		f64,
		session.camera.perspective_scale(&session.viewport),
		s,
		epsilon = 1e-12
	));
	let delta = Vec2::new(10.0 * s, -5.0 * s);
	let moved = session.scene.node(id).unwrap().position();
	assert!(moved.distance(cluster.position + delta) < 1e-9);

	for (&leaf, before) in cluster.leaf_ids.iter().zip(&leaves_before) {
		let now = session.scene.node(leaf).unwrap().position();
		assert!(now.distance(*before + delta) < 1e-9, "leaf {leaf:?} drifted");
	}
	for connector in session.scene.connectors() {
		if connector.from == id || connector.to == id || cluster.leaf_ids.contains(&connector.to) {
			assert_eq!(connector.start, session.scene.node(connector.from).unwrap().position());
		}
	}
	assert_eq!(session.camera.mode(), CameraMode::Manual);
}

#[test]
fn a_cluster_grabbed_mid_flight_stays_under_the_pointer() {
	let (mut session, mut scheduler) = session(
		r#"{ "clusters": [{ "name": "A", "weight": 144, "leafCount": 2 }],
		     "config": { "seed": 3, "camera": { "overview": { "x": 0, "y": 0, "z": 60 } } } }"#,
	);
	let id = first_cluster(&session);
	let mut sink = RecordingSink::default();

	let press = screen_of(&session, id);
	scheduler.enqueue(InputEvent::PointerDown(press));
	for _ in 0..10 {
		scheduler.tick(&mut session, &mut sink);
	}
	assert!(session.camera.position().z < 60.0, "camera should be flying in");

	let pointer = press + Vec2::new(30.0, 0.0);
	scheduler.enqueue(InputEvent::PointerMove(pointer));
	scheduler.tick(&mut session, &mut sink);
	assert_eq!(session.camera.mode(), CameraMode::Manual);
	let gap = screen_of(&session, id).distance(pointer);
	assert!(gap < 1e-6, "cluster is {gap}px from the pointer");

	let pointer = pointer + Vec2::new(-12.0, 20.0);
	scheduler.enqueue(InputEvent::PointerMove(pointer));
	scheduler.enqueue(InputEvent::PointerUp);
	scheduler.tick(&mut session, &mut sink);
	assert!(screen_of(&session, id).distance(pointer) < 1e-6);
}
