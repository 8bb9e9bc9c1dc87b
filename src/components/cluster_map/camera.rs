//! Perspective camera over the ground plane, with manual and autopilot modes.
//!
//! The camera always looks straight down the `-z` axis. Its height `z` acts as
//! the zoom level and is kept inside `[z_min, z_max]` at all times.
//!
//! # Modes
//!
//! - [`CameraMode::Manual`]: the camera only moves in response to pan and zoom.
//! - [`CameraMode::Autopilot`]: each [`CameraController::advance`] closes a
//!   fixed fraction of the distance to the target pose. Arrival (distance below
//!   `arrival_epsilon`) or any manual input returns the camera to `Manual`.

use log::debug;

use super::config::CameraConfig;
use super::geometry::{Ray, Vec2, Vec3};

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// Sizes below one pixel are raised to one so projections stay finite.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(1.0),
			height: height.max(1.0),
		}
	}

	/// Width over height.
	pub fn aspect(&self) -> f64 {
		self.width / self.height
	}

	/// Normalised device coordinates: `(-1, -1)` bottom-left, `(1, 1)` top-right.
	pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
		Vec2::new(
			screen.x / self.width * 2.0 - 1.0,
			-(screen.y / self.height * 2.0 - 1.0),
		)
	}
}

/// Who is driving the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
	/// Moves only on pan and zoom input.
	Manual,
	/// Flying toward `CameraState::target`.
	Autopilot,
}

/// Camera pose and limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
	/// Current pose; `z` is the height above the ground.
	pub position: Vec3,
	/// Where the autopilot is heading.
	pub target: Vec3,
	/// Vertical field of view in radians.
	pub fov: f64,
	/// Lowest allowed height.
	pub z_min: f64,
	/// Highest allowed height.
	pub z_max: f64,
	/// Current mode.
	pub mode: CameraMode,
}

/// Owns the camera pose and its manual/autopilot state machine.
#[derive(Clone, Debug)]
pub struct CameraController {
	state: CameraState,
	config: CameraConfig,
}

impl CameraController {
	/// Starts in `Manual` at the overview pose.
	pub fn new(config: CameraConfig) -> Self {
		let (z_min, z_max) = if config.z_min <= config.z_max {
			(config.z_min, config.z_max)
		} else {
			(config.z_max, config.z_min)
		};
		let overview = config.overview;
		let position = Vec3::new(overview.x, overview.y, overview.z.clamp(z_min, z_max));
		Self {
			state: CameraState {
				position,
				target: position,
				fov: config.fov_degrees.to_radians(),
				z_min,
				z_max,
				mode: CameraMode::Manual,
			},
			config,
		}
	}

	/// Full pose and limits.
	pub fn state(&self) -> &CameraState {
		&self.state
	}

	/// Current pose.
	pub fn position(&self) -> Vec3 {
		self.state.position
	}

	/// Current mode.
	pub fn mode(&self) -> CameraMode {
		self.state.mode
	}

	fn half_fov_tan(&self) -> f64 {
		(self.state.fov / 2.0).tan()
	}

	/// World units per screen pixel on the ground plane at the current height.
	pub fn perspective_scale(&self, viewport: &Viewport) -> f64 {
		2.0 * self.half_fov_tan() * self.state.position.z / viewport.height
	}

	/// Screen pixels per world unit on the ground plane.
	pub fn pixels_per_unit(&self, viewport: &Viewport) -> f64 {
		1.0 / self.perspective_scale(viewport)
	}

	/// Converts a pointer movement in pixels to a ground-plane movement.
	/// Screen `y` grows downwards, world `y` upwards.
	pub fn screen_delta_to_world(&self, delta: Vec2, viewport: &Viewport) -> Vec2 {
		let scale = self.perspective_scale(viewport);
		Vec2::new(delta.x * scale, -delta.y * scale)
	}

	/// Projects a ground-plane point to screen pixels.
	pub fn world_to_screen(&self, world: Vec2, viewport: &Viewport) -> Vec2 {
		let ppu = self.pixels_per_unit(viewport);
		let offset = world - self.state.position.xy();
		Vec2::new(
			viewport.width / 2.0 + offset.x * ppu,
			viewport.height / 2.0 - offset.y * ppu,
		)
	}

	/// Ray from the camera through a screen point.
	pub fn ray(&self, screen: Vec2, viewport: &Viewport) -> Ray {
		let ndc = viewport.to_ndc(screen);
		let tan = self.half_fov_tan();
		Ray {
			origin: self.state.position,
			direction: Vec3::new(ndc.x * tan * viewport.aspect(), ndc.y * tan, -1.0),
		}
	}

	/// Ground-plane point under a screen point, `None` for a degenerate ray.
	pub fn unproject(&self, screen: Vec2, viewport: &Viewport) -> Option<Vec2> {
		self.ray(screen, viewport).intersect_plane_z(0.0)
	}

	/// Drops out of autopilot, keeping the current pose.
	pub fn cancel_autopilot(&mut self) {
		if self.state.mode == CameraMode::Autopilot {
			debug!("cluster-map: autopilot cancelled by manual input");
		}
		self.state.mode = CameraMode::Manual;
		self.state.target = self.state.position;
	}

	/// Drags the view so the ground follows the pointer.
	pub fn pan(&mut self, screen_delta: Vec2, viewport: &Viewport) {
		self.cancel_autopilot();
		let world = self.screen_delta_to_world(screen_delta, viewport);
		self.state.position.x -= world.x;
		self.state.position.y -= world.y;
		self.state.target = self.state.position;
	}

	/// Changes the height by `delta * zoom_speed`, clamped to the limits.
	pub fn zoom(&mut self, delta: f64) {
		self.cancel_autopilot();
		let z = self.state.position.z + delta * self.config.zoom_speed;
		self.state.position.z = z.clamp(self.state.z_min, self.state.z_max);
		self.state.target = self.state.position;
	}

	/// Zooms while keeping the ground point under `pointer` fixed on screen.
	///
	/// Falls back to a plain zoom when the pointer ray misses the ground.
	pub fn zoom_at(&mut self, delta: f64, pointer: Vec2, viewport: &Viewport) {
		let before = self.unproject(pointer, viewport);
		self.zoom(delta);
		if let (Some(before), Some(after)) = (before, self.unproject(pointer, viewport)) {
			let shift = before - after;
			self.state.position.x += shift.x;
			self.state.position.y += shift.y;
			self.state.target = self.state.position;
		}
	}

	/// Applies one wheel step, anchored at `pointer` unless zoom-to-pointer
	/// is switched off.
	pub fn wheel(&mut self, delta: f64, pointer: Vec2, viewport: &Viewport) {
		if self.config.zoom_to_pointer {
			self.zoom_at(delta, pointer, viewport);
		} else {
			self.zoom(delta);
		}
	}

	/// Height at which a circle of `radius` fills the view with the fit margin.
	pub fn fit_height(&self, radius: f64) -> f64 {
		radius * self.config.fit_factor / self.half_fov_tan()
	}

	/// Starts flying to `target`; its height is clamped to the limits.
	pub fn fly_to(&mut self, target: Vec3) {
		self.state.target = Vec3::new(
			target.x,
			target.y,
			target.z.clamp(self.state.z_min, self.state.z_max),
		);
		self.state.mode = CameraMode::Autopilot;
	}

	/// Flies to frame a circle of `radius` around `center`.
	pub fn fly_to_circle(&mut self, center: Vec2, radius: f64) {
		self.fly_to(center.with_z(self.fit_height(radius)));
	}

	/// Starts the autopilot toward the overview pose.
	pub fn fly_to_overview(&mut self) {
		self.fly_to(self.config.overview);
	}

	/// One autopilot step. Returns `true` on the tick the camera arrives.
	pub fn advance(&mut self) -> bool {
		if self.state.mode != CameraMode::Autopilot {
			return false;
		}
		let target = self.state.target;
		self.state.position = self.state.position.lerp(target, self.config.smoothing);
		if self.state.position.distance(target) < self.config.arrival_epsilon {
			self.state.mode = CameraMode::Manual;
			debug!("cluster-map: autopilot arrived at {target:?}");
			return true;
		}
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use float_cmp::approx_eq;
	use proptest::prelude::*;

	fn camera_at(z: f64) -> CameraController {
		CameraController::new(CameraConfig {
			overview: Vec3::new(0.0, 0.0, z),
			..CameraConfig::default()
		})
	}

	fn viewport() -> Viewport {
		Viewport::new(1200.0, 800.0)
	}

	#[test]
	fn starts_manual_at_overview() {
		let cam = CameraController::new(CameraConfig::default());
		assert_eq!(cam.mode(), CameraMode::Manual);
		assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 150.0));
		assert!(approx_eq!(f64, cam.state().fov, 30f64.to_radians()));
	}

	#[test]
	fn out_of_range_overview_is_clamped() {
		let cam = camera_at(5000.0);
		assert!(approx_eq!(f64, cam.position().z, 400.0));
	}

	#[test]
	fn perspective_scale_matches_formula() {
		let cam = camera_at(60.0);
		let expected = 2.0 * 15f64.to_radians().tan() * 60.0 / 800.0;
		assert!(approx_eq!(f64, cam.perspective_scale(&viewport()), expected, epsilon = 1e-12));
	}

	#[test]
	fn viewport_center_unprojects_below_camera() {
		let mut cam = camera_at(100.0);
		cam.pan(Vec2::new(-40.0, 25.0), &viewport());
		let below = cam.unproject(Vec2::new(600.0, 400.0), &viewport());
		let p = cam.position();
		assert_eq!(below, Some(Vec2::new(p.x, p.y)));
	}

	#[test]
	fn unproject_inverts_world_to_screen() {
		let cam = camera_at(80.0);
		let world = Vec2::new(7.5, -3.25);
		let screen = cam.world_to_screen(world, &viewport());
		let back = cam.unproject(screen, &viewport()).unwrap();
		assert!(back.distance(world) < 1e-9);
	}

	#[test]
	fn pan_moves_ground_with_pointer() {
		let mut cam = camera_at(60.0);
		let vp = viewport();
		let grabbed = cam.unproject(Vec2::new(300.0, 200.0), &vp).unwrap();
		cam.pan(Vec2::new(30.0, -12.0), &vp);
		let under = cam.unproject(Vec2::new(330.0, 188.0), &vp).unwrap();
		assert!(under.distance(grabbed) < 1e-9);
	}

	#[test]
	fn degenerate_ray_falls_back_to_plain_zoom() {
		let mut cam = camera_at(60.0);
		cam.state.position = Vec3::new(3.0, 4.0, -5.0);
		let pointer = Vec2::new(0.0, 0.0);
		assert_eq!(cam.unproject(pointer, &viewport()), None);
		cam.zoom_at(10.0, pointer, &viewport());
		assert_eq!(cam.position(), Vec3::new(3.0, 4.0, 10.0));
	}

	#[test]
	fn selecting_a_cluster_targets_fit_height() {
		let mut cam = camera_at(150.0);
		cam.fly_to_circle(Vec2::new(20.0, -5.0), 3.5);
		let expected = 3.5 * 1.25 / 15f64.to_radians().tan();
		assert_eq!(cam.mode(), CameraMode::Autopilot);
		assert!(approx_eq!(f64, cam.state().target.z, expected, epsilon = 1e-9));
		assert!(approx_eq!(f64, cam.state().target.x, 20.0));
	}

	#[test]
	fn fly_target_is_clamped() {
		let mut cam = camera_at(150.0);
		cam.fly_to(Vec3::new(0.0, 0.0, 1.0));
		assert!(approx_eq!(f64, cam.state().target.z, 10.0));
	}

	#[test]
	fn manual_input_cancels_autopilot() {
		let mut cam = camera_at(150.0);
		cam.fly_to(Vec3::new(10.0, 10.0, 50.0));
		cam.advance();
		cam.zoom(1.0);
		assert_eq!(cam.mode(), CameraMode::Manual);
		let frozen = cam.position();
		assert!(!cam.advance());
		assert_eq!(cam.position(), frozen);

		cam.fly_to_overview();
		cam.pan(Vec2::new(1.0, 1.0), &viewport());
		assert_eq!(cam.mode(), CameraMode::Manual);
	}

	#[test]
	fn each_tick_closes_the_smoothing_fraction() {
		let mut cam = camera_at(100.0);
		cam.fly_to(Vec3::new(0.0, 0.0, 200.0));
		cam.advance();
		assert!(approx_eq!(f64, cam.position().z, 108.0, epsilon = 1e-9));
	}

	fn check_autopilot_converges(
		start: Vec3,
		target: Vec3,
	) -> Result<(), TestCaseError> {
		let mut cam = CameraController::new(CameraConfig {
			overview: start,
			..CameraConfig::default()
		});
		cam.fly_to(target);
		let goal = cam.state().target;
		let mut ticks = 0;
		while cam.mode() == CameraMode::Autopilot {
			cam.advance();
			ticks += 1;
			prop_assert!(ticks <= 200, "autopilot did not settle");
		}
		prop_assert!(cam.position().distance(goal) < 0.1);
		Ok(())
	}

	proptest! {
		#[test]
		fn zoom_stays_clamped(deltas in prop::collection::vec(-5000.0f64..5000.0, 0..64)) {
			let mut cam = CameraController::new(CameraConfig::default());
			for delta in deltas {
				cam.zoom_at(delta, Vec2::new(100.0, 700.0), &viewport());
				let z = cam.position().z;
				prop_assert!((10.0..=400.0).contains(&z));
			}
		}

		#[test]
		fn zoom_keeps_point_under_pointer(
			sx in 0.0f64..1200.0,
			sy in 0.0f64..800.0,
			start_z in 10.0f64..400.0,
			delta in -3000.0f64..3000.0,
		) {
			let vp = viewport();
			let mut cam = camera_at(start_z);
			let pointer = Vec2::new(sx, sy);
			let before = cam.unproject(pointer, &vp).unwrap();
			cam.zoom_at(delta, pointer, &vp);
			let after = cam.unproject(pointer, &vp).unwrap();
			prop_assert!(before.distance(after) < 1e-6);
		}

		#[test]
		fn autopilot_settles_on_target(
			sx in -500.0f64..500.0, sy in -500.0f64..500.0, sz in 10.0f64..400.0,
			tx in -500.0f64..500.0, ty in -500.0f64..500.0, tz in 0.0f64..1000.0,
		) {
			check_autopilot_converges(Vec3::new(sx, sy, sz), Vec3::new(tx, ty, tz))?;
		}
	}
}
