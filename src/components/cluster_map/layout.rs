//! Procedural placement of clusters around the hub and leaves inside clusters.
//!
//! Both passes use rejection sampling with a hard attempt budget. When the
//! budget runs out the placement drops to a deterministic fallback and the
//! layout is reported as degraded; placement itself never fails and never
//! loops without bound.
//!
//! Clusters are placed one at a time in dataset order and registered in a
//! [`SpatialRegistry`] immediately, so each later cluster is checked against
//! every earlier one. Leaves are placed after all clusters exist and only
//! avoid foreign territory.

use std::f64::consts::TAU;

use log::{info, warn};
use rand::Rng;

use super::config::LayoutConfig;
use super::geometry::Vec2;
use super::scene::NodeId;
use super::spatial::SpatialRegistry;
use super::types::ClusterSpec;

/// The part of a cluster descriptor the layout cares about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterSeed {
	/// Drives the territory radius.
	pub weight: f64,
	/// Leaves to scatter inside the territory.
	pub leaf_count: usize,
}

impl From<&ClusterSpec> for ClusterSeed {
	fn from(spec: &ClusterSpec) -> Self {
		Self {
			weight: spec.weight,
			leaf_count: spec.leaf_count,
		}
	}
}

/// How a position was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
	/// Accepted candidate after this many samples (1-based).
	Sampled {
		/// Samples drawn, the accepted one included.
		attempts: usize,
	},
	/// Attempt budget exhausted; deterministic or fixed-distance fallback used.
	Fallback,
}

impl Placement {
	/// Whether the attempt budget ran out.
	pub fn is_fallback(self) -> bool {
		matches!(self, Placement::Fallback)
	}
}

/// A leaf position inside its cluster's territory.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLeaf {
	/// Scene id the leaf will get.
	pub id: NodeId,
	/// Ground position.
	pub position: Vec2,
	/// How the position was found.
	pub placement: Placement,
}

/// A cluster position with its derived radii and leaves.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCluster {
	/// Scene id the cluster will get.
	pub id: NodeId,
	/// Territory centre.
	pub position: Vec2,
	/// Territory radius.
	pub radius: f64,
	/// Radius registered for the overlap test.
	pub exclusion_radius: f64,
	/// How the position was found.
	pub placement: Placement,
	/// Leaves in placement order.
	pub leaves: Vec<PlacedLeaf>,
}

/// A "layout-degraded" event: one placement fell back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutDiagnostic {
	/// A cluster went to its fallback ring slot.
	ClusterFallback {
		/// The cluster that fell back.
		cluster: NodeId,
		/// Samples drawn before giving up.
		attempts: usize,
	},
	/// A leaf went to the fixed fallback distance.
	LeafFallback {
		/// Owner of the leaf.
		cluster: NodeId,
		/// The leaf that fell back.
		leaf: NodeId,
	},
}

/// Sampling effort and degradation events for one layout run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutReport {
	/// Candidate cluster positions drawn.
	pub cluster_samples: usize,
	/// Candidate leaf positions drawn.
	pub leaf_samples: usize,
	/// One entry per fallback, in placement order.
	pub diagnostics: Vec<LayoutDiagnostic>,
}

impl LayoutReport {
	/// Whether any placement fell back.
	pub fn is_degraded(&self) -> bool {
		!self.diagnostics.is_empty()
	}

	/// Number of clusters placed on the fallback ring.
	pub fn cluster_fallbacks(&self) -> usize {
		self.diagnostics
			.iter()
			.filter(|d| matches!(d, LayoutDiagnostic::ClusterFallback { .. }))
			.count()
	}

	/// Number of leaves placed at the fallback distance.
	pub fn leaf_fallbacks(&self) -> usize {
		self.diagnostics.len() - self.cluster_fallbacks()
	}
}

/// Output of [`LayoutEngine::place`]. Clusters keep dataset order.
#[derive(Clone, Debug)]
pub struct Layout {
	/// Placed clusters with their leaves.
	pub clusters: Vec<PlacedCluster>,
	/// Exclusion circles of every placed cluster.
	pub registry: SpatialRegistry,
	/// Sampling effort and fallbacks.
	pub report: LayoutReport,
}

/// Places clusters around a hub at the origin, then leaves inside clusters.
pub struct LayoutEngine<'a> {
	config: &'a LayoutConfig,
}

impl<'a> LayoutEngine<'a> {
	/// Engine over the given limits.
	pub fn new(config: &'a LayoutConfig) -> Self {
		Self { config }
	}

	/// Lays out `seeds` in order.
	///
	/// Node ids follow the scene numbering: the hub is [`NodeId::HUB`], cluster
	/// `i` is `NodeId(i + 1)`, and leaves are numbered after the last cluster
	/// in cluster order.
	pub fn place<R: Rng + ?Sized>(&self, seeds: &[ClusterSeed], rng: &mut R) -> Layout {
		let mut registry = SpatialRegistry::new();
		let mut report = LayoutReport::default();
		let mut clusters = Vec::with_capacity(seeds.len());

		for (index, seed) in seeds.iter().enumerate() {
			let id = NodeId(index + 1);
			let radius = self.config.cluster_radius(seed.weight);
			let exclusion_radius = self.config.exclusion_radius(seed.weight);
			let (position, placement) = self.place_cluster(
				index,
				seeds.len(),
				exclusion_radius,
				&registry,
				rng,
				&mut report,
			);
			if placement.is_fallback() {
				warn!(
					"cluster-map: layout-degraded: cluster {} fell back to ring slot after {} attempts",
					id.0, self.config.max_attempts
				);
				report.diagnostics.push(LayoutDiagnostic::ClusterFallback {
					cluster: id,
					attempts: self.config.max_attempts,
				});
			}
			registry.register(id, position, exclusion_radius);
			clusters.push(PlacedCluster {
				id,
				position,
				radius,
				exclusion_radius,
				placement,
				leaves: Vec::new(),
			});
		}

		let mut next_id = seeds.len() + 1;
		for (cluster, seed) in clusters.iter_mut().zip(seeds) {
			let before = report.diagnostics.len();
			for _ in 0..seed.leaf_count {
				let id = NodeId(next_id);
				next_id += 1;
				let (position, placement) =
					self.place_leaf(cluster, &registry, rng, &mut report.leaf_samples);
				if placement.is_fallback() {
					report.diagnostics.push(LayoutDiagnostic::LeafFallback {
						cluster: cluster.id,
						leaf: id,
					});
				}
				cluster.leaves.push(PlacedLeaf {
					id,
					position,
					placement,
				});
			}
			let fell_back = report.diagnostics.len() - before;
			if fell_back > 0 {
				warn!(
					"cluster-map: layout-degraded: {fell_back} of {} leaves of cluster {} used the fallback distance",
					seed.leaf_count, cluster.id.0
				);
			}
		}

		info!(
			"cluster-map: placed {} clusters and {} leaves ({} + {} samples, {} fallbacks)",
			clusters.len(),
			next_id - seeds.len() - 1,
			report.cluster_samples,
			report.leaf_samples,
			report.diagnostics.len()
		);

		Layout {
			clusters,
			registry,
			report,
		}
	}

	fn place_cluster<R: Rng + ?Sized>(
		&self,
		index: usize,
		total: usize,
		exclusion_radius: f64,
		registry: &SpatialRegistry,
		rng: &mut R,
		report: &mut LayoutReport,
	) -> (Vec2, Placement) {
		let cfg = self.config;
		for attempt in 1..=cfg.max_attempts {
			report.cluster_samples += 1;
			let angle = rng.gen_range(0.0..TAU);
			let distance = sample_between(rng, cfg.min_annulus, cfg.max_annulus);
			let candidate = Vec2::from_polar(angle, distance);

			if candidate.length() < cfg.hub_exclusion + exclusion_radius {
				continue;
			}
			if registry.overlaps(candidate, exclusion_radius) {
				continue;
			}
			return (candidate, Placement::Sampled { attempts: attempt });
		}

		let angle = index as f64 / total.max(1) as f64 * TAU;
		(
			Vec2::from_polar(angle, cfg.fallback_radius()),
			Placement::Fallback,
		)
	}

	fn place_leaf<R: Rng + ?Sized>(
		&self,
		cluster: &PlacedCluster,
		registry: &SpatialRegistry,
		rng: &mut R,
		samples: &mut usize,
	) -> (Vec2, Placement) {
		let cfg = self.config;
		let (min_dist, max_dist) = (
			cluster.radius * cfg.leaf_min_frac,
			cluster.radius * cfg.leaf_max_frac,
		);

		for attempt in 1..=cfg.leaf_attempts {
			*samples += 1;
			let angle = rng.gen_range(0.0..TAU);
			let distance = sample_between(rng, min_dist, max_dist);
			let candidate = cluster.position + Vec2::from_polar(angle, distance);

			if registry.inside_foreign(candidate, cluster.id) {
				continue;
			}
			if cfg.min_leaf_spacing > 0.0
				&& cluster
					.leaves
					.iter()
					.any(|l| l.position.distance(candidate) < cfg.min_leaf_spacing)
			{
				continue;
			}
			return (candidate, Placement::Sampled { attempts: attempt });
		}

		let angle = rng.gen_range(0.0..TAU);
		let distance = cluster.radius * cfg.leaf_fallback_frac;
		(
			cluster.position + Vec2::from_polar(angle, distance),
			Placement::Fallback,
		)
	}
}

/// Uniform sample in `[lo, hi]`, tolerating an empty or inverted range.
fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}
