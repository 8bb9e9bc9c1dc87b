//! Canvas rendering for the cluster map.
//!
//! The ground plane is projected through the camera and drawn in screen space,
//! so glyphs and labels keep their orientation. Rendering uses multiple passes
//! for correct z-ordering:
//! 1. Background (screen space)
//! 2. Leaf links, cluster perimeters, then animated hub links
//! 3. Leaf glyphs, cluster glyphs, the hub glyph, and the selection ring
//! 4. Vignette

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::camera::{CameraController, Viewport};
use super::geometry::Vec2;
use super::scale::{ScaleConfig, ScaledValues};
use super::scene::{ConnectorKind, Node, NodeId, SceneGraph};
use super::scheduler::FrameSink;
use super::session::MapSession;
use super::theme::{Color, Theme};

/// Extra pixels around the viewport before a glyph counts as off-screen.
const CULL_MARGIN: f64 = 64.0;

/// Draws sessions onto a 2D canvas context.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	scale: ScaleConfig,
	theme: Theme,
}

impl CanvasRenderer {
	/// Renderer drawing into `ctx`.
	pub fn new(ctx: CanvasRenderingContext2d, scale: ScaleConfig, theme: Theme) -> Self {
		Self { ctx, scale, theme }
	}
}

impl FrameSink for CanvasRenderer {
	fn draw(&mut self, session: &MapSession) {
		render(session, &self.ctx, &self.scale, &self.theme);
	}
}

/// Screen-space projection for one frame.
struct Projection<'a> {
	camera: &'a CameraController,
	viewport: &'a Viewport,
}

impl Projection<'_> {
	fn point(&self, world: Vec2) -> Vec2 {
		self.camera.world_to_screen(world, self.viewport)
	}

	fn visible(&self, screen: Vec2, extent: f64) -> bool {
		let pad = CULL_MARGIN + extent;
		screen.x >= -pad
			&& screen.y >= -pad
			&& screen.x <= self.viewport.width + pad
			&& screen.y <= self.viewport.height + pad
	}
}

/// Renders the complete map to the canvas.
pub fn render(
	session: &MapSession,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let viewport = &session.viewport;
	let k = session.camera.pixels_per_unit(viewport);
	let scale = ScaledValues::new(config, theme.connector.hub_dash, k);
	let projection = Projection {
		camera: &session.camera,
		viewport,
	};

	draw_background(viewport, ctx, theme);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	if !scale.cull_leaves {
		draw_leaf_links(&session.scene, &projection, ctx, &scale, theme);
	}
	draw_perimeters(&session.scene, &projection, ctx, &scale, theme);
	draw_hub_links(&session.scene, &projection, ctx, &scale, theme);

	if !scale.cull_leaves {
		draw_leaves(&session.scene, &projection, ctx, &scale, theme);
	}
	draw_clusters(&session.scene, &projection, ctx, &scale, theme);
	draw_hub(&session.scene, &projection, ctx, &scale, theme);

	if let Some(node) = session.selected_node() {
		draw_selection(node, &projection, ctx, &scale, theme);
	}

	if theme.background.vignette > 0.0 {
		draw_vignette(viewport, ctx, theme);
	}
}

fn draw_background(viewport: &Viewport, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (viewport.width, viewport.height);
	let gradient = if theme.background.use_gradient {
		ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8)
			.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(viewport: &Viewport, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (viewport.width, viewport.height);
	let Ok(gradient) = ctx.create_radial_gradient(
		w / 2.0,
		h / 2.0,
		w.min(h) * 0.3,
		w / 2.0,
		h / 2.0,
		w.max(h) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&Color::rgba(0, 0, 0, theme.background.vignette).to_css(),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn cluster_color(scene: &SceneGraph, node: NodeId) -> Color {
	match scene.node(node) {
		Some(Node::Cluster(c)) => c.color,
		_ => Color::rgb(255, 255, 255),
	}
}

fn stroke_segment(ctx: &CanvasRenderingContext2d, a: Vec2, b: Vec2) {
	ctx.begin_path();
	ctx.move_to(a.x, a.y);
	ctx.line_to(b.x, b.y);
	ctx.stroke();
}

fn draw_leaf_links(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_line_width(scale.line_width);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	let alpha = theme.connector.leaf_alpha * scale.leaf_alpha;

	for connector in scene.connectors() {
		if connector.kind != ConnectorKind::ClusterToLeaf {
			continue;
		}
		let (a, b) = (projection.point(connector.start), projection.point(connector.end));
		if !projection.visible(a, 0.0) && !projection.visible(b, 0.0) {
			continue;
		}
		let color = cluster_color(scene, connector.from).with_alpha(alpha);
		ctx.set_stroke_style_str(&color.to_css());
		stroke_segment(ctx, a, b);
	}
}

fn draw_perimeters(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_line_width(scale.line_width);

	for (_, cluster) in scene.clusters() {
		let center = projection.point(cluster.position);
		let radius = cluster.radius * scale.k;
		if !projection.visible(center, radius) {
			continue;
		}

		ctx.begin_path();
		let _ = ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&cluster.color.lighten(0.3).with_alpha(0.06).to_css());
		ctx.fill();
		ctx.set_stroke_style_str(
			&cluster
				.color
				.with_alpha(theme.node.perimeter_alpha)
				.to_css(),
		);
		ctx.stroke();
	}
}

fn draw_hub_links(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_line_width(scale.line_width);

	// Fade dash pattern to solid when configured
	let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
	let dashed = effective_gap > 0.1;
	if dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(effective_gap),
		));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	for connector in scene.connectors() {
		if connector.kind != ConnectorKind::HubToCluster {
			continue;
		}
		if dashed {
			ctx.set_line_dash_offset(scale.dash_offset(connector.phase));
		}
		let color = cluster_color(scene, connector.to).with_alpha(theme.connector.hub_alpha);
		ctx.set_stroke_style_str(&color.to_css());
		stroke_segment(
			ctx,
			projection.point(connector.start),
			projection.point(connector.end),
		);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_glyph(ctx: &CanvasRenderingContext2d, glyph: &str, at: Vec2, size: f64) {
	ctx.set_font(&format!("{size}px sans-serif"));
	let _ = ctx.fill_text(glyph, at.x, at.y);
}

fn draw_leaves(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_global_alpha(scale.leaf_alpha);
	ctx.set_fill_style_str("#ffffff");
	for (_, leaf) in scene.leaves() {
		let at = projection.point(leaf.position);
		if projection.visible(at, scale.leaf_glyph_px) {
			draw_glyph(ctx, theme.node.leaf_glyph, at, scale.leaf_glyph_px);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_clusters(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	for (_, cluster) in scene.clusters() {
		let at = projection.point(cluster.position);
		let size = scale.cluster_glyph_px(cluster.radius);
		if !projection.visible(at, size) {
			continue;
		}

		ctx.set_fill_style_str(&cluster.color.to_css());
		let glyph = cluster
			.details
			.glyph
			.as_deref()
			.unwrap_or(theme.node.cluster_glyph);
		draw_glyph(ctx, glyph, at, size);

		if scale.show_labels {
			ctx.set_fill_style_str(&cluster.color.lighten(0.5).to_css());
			ctx.set_font(&scale.label_font);
			let _ = ctx.fill_text(&cluster.details.name, at.x, at.y + size * 0.5 + 10.0);
		}
	}
}

fn draw_hub(
	scene: &SceneGraph,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let Some(hub) = scene.hub() else {
		return;
	};
	let at = projection.point(hub.position);
	ctx.set_fill_style_str("#ffffff");
	let glyph = hub.details.glyph.as_deref().unwrap_or(theme.node.hub_glyph);
	draw_glyph(ctx, glyph, at, scale.hub_glyph_px);

	if scale.show_labels {
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&hub.details.name, at.x, at.y + scale.hub_glyph_px * 0.5 + 10.0);
	}
}

fn draw_selection(
	node: &Node,
	projection: &Projection,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let at = projection.point(node.position());
	let radius = match node {
		Node::Hub(_) => scale.hub_glyph_px * 0.5,
		Node::Cluster(c) => (c.radius * scale.k).max(scale.cluster_glyph_px(c.radius) * 0.5),
		Node::Leaf(_) => scale.leaf_glyph_px * 0.5,
	};

	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius + scale.ring_offset, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&theme.node.selection_color.to_css());
	ctx.set_line_width(scale.ring_width);
	ctx.stroke();

	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(
		&theme
			.node
			.selection_color
			.with_alpha(theme.node.selection_color.a * 0.4)
			.to_css(),
	);
	ctx.set_line_width(scale.ring_width * 0.5);
	ctx.stroke();
}
