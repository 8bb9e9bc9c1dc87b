//! Tunable parameters for layout, camera, and interaction.
//!
//! Every struct deserializes with `#[serde(default)]`, so a dataset may carry
//! a partial `"config"` object and only override the fields it names.

use serde::Deserialize;

use super::geometry::Vec3;

/// Parameters for the procedural cluster and leaf placement.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
	/// Cluster radius = `radius_scale * sqrt(weight)`.
	pub radius_scale: f64,
	/// Added to the visual radius to get the exclusion radius.
	pub exclusion_padding: f64,
	/// Keep-out radius around the hub.
	pub hub_exclusion: f64,
	/// Visual radius of the hub.
	pub hub_radius: f64,
	/// Inner bound of the sampled distance from the hub.
	pub min_annulus: f64,
	/// Outer bound of the sampled distance from the hub.
	pub max_annulus: f64,
	/// Candidate positions tried per cluster before falling back.
	pub max_attempts: usize,
	/// Distance from the hub of the deterministic fallback ring.
	/// Defaults to `max_annulus` when unset.
	pub fallback_radius: Option<f64>,
	/// Leaf distance from its cluster, as a fraction of the cluster radius.
	pub leaf_min_frac: f64,
	/// Upper bound of the same fraction.
	pub leaf_max_frac: f64,
	/// Candidate positions tried per leaf before falling back.
	pub leaf_attempts: usize,
	/// Fallback leaf distance, as a fraction of the cluster radius.
	pub leaf_fallback_frac: f64,
	/// Minimum distance between sibling leaves; `0.0` disables the check.
	pub min_leaf_spacing: f64,
	/// Visual radius of a leaf.
	pub leaf_radius: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			radius_scale: 0.25,
			exclusion_padding: 0.5,
			hub_exclusion: 4.0,
			hub_radius: 4.5,
			min_annulus: 12.0,
			max_annulus: 36.0,
			max_attempts: 200,
			fallback_radius: None,
			leaf_min_frac: 0.3,
			leaf_max_frac: 0.9,
			leaf_attempts: 30,
			leaf_fallback_frac: 0.6,
			min_leaf_spacing: 0.0,
			leaf_radius: 0.4,
		}
	}
}

impl LayoutConfig {
	/// Visual radius for a cluster of the given weight.
	pub fn cluster_radius(&self, weight: f64) -> f64 {
		self.radius_scale * weight.max(0.0).sqrt()
	}

	/// Overlap-test radius for a cluster of the given weight.
	pub fn exclusion_radius(&self, weight: f64) -> f64 {
		self.cluster_radius(weight) + self.exclusion_padding
	}

	/// Fallback ring distance, `max_annulus` unless overridden.
	pub fn fallback_radius(&self) -> f64 {
		self.fallback_radius.unwrap_or(self.max_annulus)
	}
}

/// Camera limits and motion tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f64,
	/// Lowest camera height.
	pub z_min: f64,
	/// Highest camera height.
	pub z_max: f64,
	/// Initial pose, and the pose the camera returns to on reset.
	pub overview: Vec3,
	/// Height change per unit of wheel delta.
	pub zoom_speed: f64,
	/// Fraction of the remaining distance closed per autopilot tick.
	pub smoothing: f64,
	/// Autopilot ends once the camera is this close to its target.
	pub arrival_epsilon: f64,
	/// Margin applied when framing a cluster (1.0 = edge to edge).
	pub fit_factor: f64,
	/// Keep the world point under the pointer fixed while zooming.
	pub zoom_to_pointer: bool,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov_degrees: 30.0,
			z_min: 10.0,
			z_max: 400.0,
			overview: Vec3::new(0.0, 0.0, 150.0),
			zoom_speed: 0.1,
			smoothing: 0.08,
			arrival_epsilon: 0.1,
			fit_factor: 1.25,
			zoom_to_pointer: true,
		}
	}
}

/// Pointer handling parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
	/// Pick radius around the hub icon, in world units.
	pub hub_hit_radius: f64,
	/// Pick radius around a cluster icon, in world units.
	pub cluster_hit_radius: f64,
	/// Screen pixels the pointer must travel before a press becomes a drag.
	pub drag_threshold: f64,
	/// Dash phase advance of hub connectors per tick.
	pub connector_phase_step: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			hub_hit_radius: 4.5,
			cluster_hit_radius: 3.0,
			drag_threshold: 3.0,
			connector_phase_step: 0.01,
		}
	}
}

/// Complete map configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapConfig {
	/// Placement limits.
	pub layout: LayoutConfig,
	/// Camera limits and motion.
	pub camera: CameraConfig,
	/// Hit radii, drag threshold and animation.
	pub interaction: InteractionConfig,
	/// Fixed layout seed; entropy is used when absent.
	pub seed: Option<u64>,
}
