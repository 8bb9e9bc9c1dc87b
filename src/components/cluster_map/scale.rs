//! Zoom-dependent scaling configuration for map visuals.
//!
//! This module centralizes all zoom-dependent visual parameters, making it easy to
//! understand and tune how glyphs and lines behave at different camera heights.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: Ground-plane units. Values in world-space grow on screen
//!   as the camera descends.
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of camera height.
//!
//! The zoom level `k` is the camera's pixels per world unit on the ground plane,
//! see [`CameraController::pixels_per_unit`](super::camera::CameraController::pixels_per_unit).
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom.
//! - [`ScaleBehavior::Screen`]: Constant screen size.
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest size in pixels.
		min_screen: f64,
		/// Largest size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Size in pixels for a base value at zoom `k`.
	///
	/// `base` is in world units for `World` and `Clamped`, in pixels for `Screen`.
	pub fn pixels(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * k,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * k).clamp(*min_screen, *max_screen),
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		/// Zoom level at which alpha reaches zero.
		zero_alpha_k: f64,
		/// Zoom level at which alpha reaches one.
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Glyph sizes for each node kind.
#[derive(Clone, Debug)]
pub struct GlyphScaleConfig {
	/// Hub glyph size in world units.
	pub hub_size: f64,
	/// How the hub glyph scales.
	pub hub_behavior: ScaleBehavior,
	/// Cluster glyph size as a multiple of the cluster radius.
	pub cluster_factor: f64,
	/// How cluster glyphs scale.
	pub cluster_behavior: ScaleBehavior,
	/// Leaf glyph size in world units.
	pub leaf_size: f64,
	/// How leaf glyphs scale.
	pub leaf_behavior: ScaleBehavior,
	/// How leaves fade out as the camera climbs.
	pub leaf_alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing leaves.
	pub cull_alpha: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Labels are hidden below this zoom level.
	pub label_min_k: f64,
}

/// Connector line scaling.
#[derive(Clone, Debug)]
pub struct ConnectorScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// How the line width scales.
	pub width_behavior: ScaleBehavior,
	/// How the hub-link dash pattern fades; when faded out links are solid.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Selection ring scaling.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width in screen pixels.
	pub width: f64,
	/// Gap between node edge and ring in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all map elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Glyph sizes.
	pub glyph: GlyphScaleConfig,
	/// Connector lines.
	pub connector: ConnectorScaleConfig,
	/// Selection ring.
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			glyph: GlyphScaleConfig {
				hub_size: 6.0,
				hub_behavior: ScaleBehavior::Clamped {
					min_screen: 18.0,
					max_screen: 120.0,
				},
				cluster_factor: 1.2,
				cluster_behavior: ScaleBehavior::Clamped {
					min_screen: 12.0,
					max_screen: 96.0,
				},
				leaf_size: 0.8,
				leaf_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: 24.0,
				},
				leaf_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 1.5,
					full_alpha_k: 4.0,
				},
				cull_alpha: 0.05,
				label_size: 12.0,
				label_min_k: 6.0,
			},
			connector: ConnectorScaleConfig {
				line_width: 1.0,
				width_behavior: ScaleBehavior::Screen,
				dash_alpha_behavior: AlphaBehavior::Constant,
			},
			ring: RingScaleConfig {
				width: 2.0,
				offset: 4.0,
			},
		}
	}
}

/// Pre-computed pixel sizes for one zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level (pixels per world unit).
	pub k: f64,
	/// Hub glyph size in pixels.
	pub hub_glyph_px: f64,
	/// Leaf glyph size in pixels.
	pub leaf_glyph_px: f64,
	/// Leaf alpha multiplier [0, 1].
	pub leaf_alpha: f64,
	/// Whether to skip drawing leaves entirely.
	pub cull_leaves: bool,
	/// Whether cluster labels are drawn at this zoom.
	pub show_labels: bool,
	/// Label font string (e.g., "12px sans-serif").
	pub label_font: String,
	/// Connector width in pixels.
	pub line_width: f64,
	/// Hub dash pattern in pixels.
	pub dash_pattern: (f64, f64),
	/// Dash pattern visibility [0, 1]. At 0, hub links are solid lines.
	pub dash_alpha: f64,
	/// Selection ring stroke in pixels.
	pub ring_width: f64,
	/// Gap between node edge and ring in pixels.
	pub ring_offset: f64,
	cluster_factor: f64,
	cluster_behavior: ScaleBehavior,
}

impl ScaledValues {
	/// Compute scaled values from configuration, the world-space hub dash
	/// pattern and the current zoom level.
	pub fn new(config: &ScaleConfig, dash_world: (f64, f64), k: f64) -> Self {
		let glyph = &config.glyph;
		let leaf_alpha = glyph.leaf_alpha_behavior.apply(k);

		Self {
			k,
			hub_glyph_px: glyph.hub_behavior.pixels(glyph.hub_size, k),
			leaf_glyph_px: glyph.leaf_behavior.pixels(glyph.leaf_size, k),
			leaf_alpha,
			cull_leaves: leaf_alpha < glyph.cull_alpha,
			show_labels: k >= glyph.label_min_k,
			label_font: format!("{}px sans-serif", glyph.label_size),
			line_width: config
				.connector
				.width_behavior
				.pixels(config.connector.line_width, k),
			dash_pattern: (dash_world.0 * k, dash_world.1 * k),
			dash_alpha: config.connector.dash_alpha_behavior.apply(k),
			ring_width: config.ring.width,
			ring_offset: config.ring.offset,
			cluster_factor: glyph.cluster_factor,
			cluster_behavior: glyph.cluster_behavior.clone(),
		}
	}

	/// Glyph size in pixels for a cluster of world radius `radius`.
	pub fn cluster_glyph_px(&self, radius: f64) -> f64 {
		self.cluster_behavior
			.pixels(radius * self.cluster_factor, self.k)
	}

	/// Dash offset in pixels for a connector animation phase in world units.
	pub fn dash_offset(&self, phase: f64) -> f64 {
		phase * self.k
	}
}
