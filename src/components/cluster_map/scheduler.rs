//! One logical tick per display frame.
//!
//! DOM handlers only enqueue [`InputEvent`]s. [`FrameScheduler::tick`] then, in
//! order, applies the queued input, advances the camera autopilot and the
//! connector animation, and hands the settled session to a [`FrameSink`]. No
//! draw ever sees a half-applied move.

use std::collections::VecDeque;

use super::config::InteractionConfig;
use super::geometry::Vec2;
use super::interaction::{InteractionPipeline, MapEvent};
use super::session::MapSession;

/// Input captured between two frames, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
	/// Primary button pressed at a point.
	PointerDown(Vec2),
	/// Pointer moved to a point.
	PointerMove(Vec2),
	/// Primary button released.
	PointerUp,
	/// Pointer left the canvas.
	PointerLeave,
	/// Wheel scrolled over the canvas.
	Wheel {
		/// Vertical wheel delta; positive zooms out.
		delta: f64,
		/// Pointer position to keep fixed.
		pointer: Vec2,
	},
	/// Escape key, or a close request from the detail panel.
	Escape,
	/// Canvas resized.
	Resize {
		/// New width in CSS pixels.
		width: f64,
		/// New height in CSS pixels.
		height: f64,
	},
}

/// Draws a settled session. Implemented by the canvas renderer.
pub trait FrameSink {
	/// Draws one frame.
	fn draw(&mut self, session: &MapSession);
}

/// Owns the input queue and the interaction pipeline.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
	queue: VecDeque<InputEvent>,
	pipeline: InteractionPipeline,
	phase_step: f64,
}

impl FrameScheduler {
	/// Empty queue and an idle pipeline.
	pub fn new(config: InteractionConfig) -> Self {
		let phase_step = config.connector_phase_step;
		Self {
			queue: VecDeque::new(),
			pipeline: InteractionPipeline::new(config),
			phase_step,
		}
	}

	/// Queues input for the next tick.
	pub fn enqueue(&mut self, event: InputEvent) {
		self.queue.push_back(event);
	}

	/// Events waiting for the next tick.
	pub fn pending(&self) -> usize {
		self.queue.len()
	}

	/// The pipeline, for inspecting the active gesture.
	pub fn pipeline(&self) -> &InteractionPipeline {
		&self.pipeline
	}

	/// Runs one frame and returns the selection changes it produced.
	pub fn tick(&mut self, session: &mut MapSession, sink: &mut dyn FrameSink) -> Vec<MapEvent> {
		let mut events = Vec::new();
		while let Some(input) = self.queue.pop_front() {
			if let Some(event) = self.apply(session, input) {
				events.push(event);
			}
		}

		session.camera.advance();
		session.scene.advance_connectors(self.phase_step);
		sink.draw(session);
		events
	}

	fn apply(&mut self, session: &mut MapSession, input: InputEvent) -> Option<MapEvent> {
		match input {
			InputEvent::PointerDown(at) => return Some(self.pipeline.pointer_down(session, at)),
			InputEvent::PointerMove(at) => self.pipeline.pointer_move(session, at),
			InputEvent::PointerUp => self.pipeline.pointer_up(),
			InputEvent::PointerLeave => self.pipeline.pointer_leave(),
			InputEvent::Wheel { delta, pointer } => self.pipeline.wheel(session, delta, pointer),
			InputEvent::Escape => return Some(self.pipeline.escape(session)),
			InputEvent::Resize { width, height } => session.resize(width, height),
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cluster_map::camera::{CameraMode, Viewport};
	use crate::components::cluster_map::scene::ConnectorKind;
	use crate::components::cluster_map::types::MapData;
	use float_cmp::approx_eq;

	#[derive(Default)]
	struct CountingSink {
		frames: usize,
		camera_z: Vec<f64>,
	}

	impl FrameSink for CountingSink {
		fn draw(&mut self, session: &MapSession) {
			self.frames += 1;
			self.camera_z.push(session.camera.position().z);
		}
	}

	fn session() -> MapSession {
		let data: MapData = serde_json::from_str(
			r#"{ "clusters": [{ "name": "A", "weight": 64, "leafCount": 2 }], "config": { "seed": 3 } }"#,
		)
		.unwrap();
		MapSession::new(&data, Viewport::new(800.0, 600.0))
	}

	#[test]
	fn tick_drains_queue_and_draws_once() {
		let mut session = session();
		let mut scheduler = FrameScheduler::new(session.config.interaction.clone());
		let mut sink = CountingSink::default();
		scheduler.enqueue(InputEvent::Resize {
			width: 1024.0,
			height: 768.0,
		});
		scheduler.enqueue(InputEvent::Escape);
		let events = scheduler.tick(&mut session, &mut sink);
		assert_eq!(events, vec![MapEvent::Deselected]);
		assert_eq!(scheduler.pending(), 0);
		assert_eq!(sink.frames, 1);
		assert_eq!(session.viewport, Viewport::new(1024.0, 768.0));
	}

	#[test]
	fn hub_links_animate_and_leaf_links_do_not() {
		let mut session = session();
		let mut scheduler = FrameScheduler::new(session.config.interaction.clone());
		let mut sink = CountingSink::default();
		for _ in 0..10 {
			scheduler.tick(&mut session, &mut sink);
		}
		for connector in session.scene.connectors() {
			let expected = match connector.kind {
				ConnectorKind::HubToCluster => -0.1,
				ConnectorKind::ClusterToLeaf => 0.0,
			};
			assert!(approx_eq!(f64, connector.phase, expected, epsilon = 1e-12));
		}
	}

	#[test]
	fn autopilot_advances_once_per_tick() {
		let mut session = session();
		let mut scheduler = FrameScheduler::new(session.config.interaction.clone());
		let mut sink = CountingSink::default();
		session.camera.fly_to(crate::components::cluster_map::geometry::Vec3::new(0.0, 0.0, 250.0));
		scheduler.tick(&mut session, &mut sink);
		scheduler.tick(&mut session, &mut sink);
		assert!(approx_eq!(f64, sink.camera_z[0], 158.0, epsilon = 1e-9));
		assert!(approx_eq!(f64, sink.camera_z[1], 158.0 + 92.0 * 0.08, epsilon = 1e-9));
		assert_eq!(session.camera.mode(), CameraMode::Autopilot);
	}
}
