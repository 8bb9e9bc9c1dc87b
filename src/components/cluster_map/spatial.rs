//! Exclusion-circle registry used to reject overlapping placements.
//!
//! Only clusters are registered. Leaves query the registry to stay out of
//! foreign territory but never register themselves.

use super::geometry::Vec2;
use super::scene::NodeId;

/// One placed entity and the circle nothing else may enter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryEntry {
	/// Registered node.
	pub id: NodeId,
	/// Centre of the exclusion circle.
	pub position: Vec2,
	/// Radius no other placement may intrude on.
	pub exclusion_radius: f64,
}

/// Placed exclusion circles, in placement order.
#[derive(Clone, Debug, Default)]
pub struct SpatialRegistry {
	entries: Vec<RegistryEntry>,
}

impl SpatialRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a placed circle. No overlap check is made here.
	pub fn register(&mut self, id: NodeId, position: Vec2, exclusion_radius: f64) {
		self.entries.push(RegistryEntry {
			id,
			position,
			exclusion_radius,
		});
	}

	/// Whether a circle at `position` with `radius` would intrude on any
	/// registered circle. Touching circles (distance equal to the radius sum)
	/// do not overlap.
	pub fn overlaps(&self, position: Vec2, radius: f64) -> bool {
		self.entries
			.iter()
			.any(|e| position.distance(e.position) < radius + e.exclusion_radius)
	}

	/// Whether `point` lies strictly inside the exclusion circle of any entry
	/// other than `owner`.
	pub fn inside_foreign(&self, point: Vec2, owner: NodeId) -> bool {
		self.entries
			.iter()
			.filter(|e| e.id != owner)
			.any(|e| point.distance(e.position) < e.exclusion_radius)
	}

	/// Registered circles, in placement order.
	pub fn entries(&self) -> &[RegistryEntry] {
		&self.entries
	}

	/// Number of registered circles.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
