//! Dataset structures for input to the cluster map component.
//!
//! The dataset is read leniently: each cluster entry is validated on its own
//! and malformed entries are skipped with a warning instead of failing the
//! whole document.

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::config::MapConfig;
use super::theme::{Color, NodePalette};

/// Why a cluster entry was left out of the map.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
	/// The entry did not deserialize.
	#[error("cluster entry {index} is not a valid object: {reason}")]
	NotAnObject {
		/// Position in the `clusters` array.
		index: usize,
		/// Deserializer message.
		reason: String,
	},
	/// Missing or blank name.
	#[error("cluster entry {index} has no name")]
	MissingName {
		/// Position in the `clusters` array.
		index: usize,
	},
	/// No weight given.
	#[error("cluster entry {index} ({name}) has no weight")]
	MissingWeight {
		/// Position in the `clusters` array.
		index: usize,
		/// Name of the entry.
		name: String,
	},
	/// Weight not finite or not positive.
	#[error("cluster entry {index} ({name}) has invalid weight {weight}")]
	InvalidWeight {
		/// Position in the `clusters` array.
		index: usize,
		/// Name of the entry.
		name: String,
		/// The rejected value.
		weight: f64,
	},
}

/// Display text for the central hub.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HubRecord {
	/// Display name.
	pub name: String,
	/// Glyph drawn on the hub.
	pub glyph: Option<String>,
	/// Free-form paragraph.
	pub description: Option<String>,
	/// Short highlight lines.
	pub bullets: Vec<String>,
}

impl Default for HubRecord {
	fn default() -> Self {
		Self {
			name: "Hub".to_string(),
			glyph: None,
			description: None,
			bullets: Vec::new(),
		}
	}
}

/// A cluster entry exactly as it appears in the dataset. Every field is
/// optional here; [`ClusterRecord::validate`] enforces the required ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterRecord {
	/// Stable key; generated from the index when absent.
	pub id: Option<String>,
	/// Display name. Required.
	pub name: Option<String>,
	/// CSS color (e.g., "#7aff7a" or "rgb(122, 255, 122)").
	pub color: Option<String>,
	/// Drives the territory radius.
	pub weight: Option<f64>,
	/// Number of leaves scattered inside the territory.
	pub leaf_count: Option<usize>,
	/// Emoji or short text drawn on the cluster.
	pub glyph: Option<String>,
	/// Where the entity is based.
	pub location: Option<String>,
	/// Free-form paragraph.
	pub description: Option<String>,
	/// Short highlight lines.
	pub bullets: Vec<String>,
}

/// A validated cluster, ready for layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSpec {
	/// Dataset id or generated key.
	pub key: String,
	/// Display name.
	pub name: String,
	/// Resolved accent color.
	pub color: Color,
	/// Positive, finite weight.
	pub weight: f64,
	/// Leaves to place.
	pub leaf_count: usize,
	/// Glyph drawn on the cluster.
	pub glyph: Option<String>,
	/// Where the entity is based.
	pub location: Option<String>,
	/// Free-form paragraph.
	pub description: Option<String>,
	/// Short highlight lines.
	pub bullets: Vec<String>,
}

impl ClusterRecord {
	/// Checks required fields and resolves the color, using `palette` when the
	/// entry has no usable color of its own.
	pub fn validate(self, index: usize, palette: &NodePalette) -> Result<ClusterSpec, DatasetError> {
		let name = self
			.name
			.filter(|n| !n.trim().is_empty())
			.ok_or(DatasetError::MissingName { index })?;
		let weight = self.weight.ok_or_else(|| DatasetError::MissingWeight {
			index,
			name: name.clone(),
		})?;
		if !weight.is_finite() || weight <= 0.0 {
			return Err(DatasetError::InvalidWeight {
				index,
				name,
				weight,
			});
		}

		let color = match self.color.as_deref().map(|c| (c, Color::parse(c))) {
			Some((_, Some(color))) => color,
			Some((raw, None)) => {
				warn!("cluster-map: cluster {name} has unreadable color {raw:?}, using palette");
				palette.get(index)
			}
			None => palette.get(index),
		};

		Ok(ClusterSpec {
			key: self.id.unwrap_or_else(|| format!("cluster-{index}")),
			name,
			color,
			weight,
			leaf_count: self.leaf_count.unwrap_or(0),
			glyph: self.glyph,
			location: self.location,
			description: self.description,
			bullets: self.bullets,
		})
	}
}

/// Complete dataset: hub text, raw cluster entries, optional config overrides.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapData {
	/// Hub text.
	pub hub: HubRecord,
	/// Kept as raw JSON so one bad entry cannot reject the document.
	pub clusters: Vec<Value>,
	/// Overrides merged over the defaults.
	pub config: MapConfig,
}

impl MapData {
	/// Validates every cluster entry in order, logging and dropping the bad ones.
	pub fn cluster_specs(&self, palette: &NodePalette) -> Vec<ClusterSpec> {
		self.clusters
			.iter()
			.enumerate()
			.filter_map(|(index, raw)| match parse_cluster(index, raw, palette) {
				Ok(spec) => Some(spec),
				Err(e) => {
					warn!("cluster-map: skipping malformed entry: {e}");
					None
				}
			})
			.collect()
	}
}

fn parse_cluster(index: usize, raw: &Value, palette: &NodePalette) -> Result<ClusterSpec, DatasetError> {
	let record = ClusterRecord::deserialize(raw).map_err(|e| DatasetError::NotAnObject {
		index,
		reason: e.to_string(),
	})?;
	record.validate(index, palette)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data(json: &str) -> MapData {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn reads_full_entry() {
		let data = data(
			r##"{
				"hub": { "name": "HQ", "glyph": "🏢" },
				"clusters": [{
					"id": "borobotics", "name": "Borobotics", "color": "#7aff7a",
					"weight": 180, "leafCount": 150, "glyph": "🤖",
					"location": "Switzerland", "description": "Worm drill",
					"bullets": ["300m precision"]
				}]
			}"##,
		);
		let specs = data.cluster_specs(&NodePalette::neon());
		assert_eq!(data.hub.name, "HQ");
		assert_eq!(specs.len(), 1);
		let spec = &specs[0];
		assert_eq!(spec.key, "borobotics");
		assert_eq!(spec.color, Color::rgb(122, 255, 122));
		assert_eq!(spec.leaf_count, 150);
		assert_eq!(spec.bullets, vec!["300m precision".to_string()]);
	}

	#[test]
	fn malformed_entries_are_skipped() {
		let data = data(
			r#"{ "clusters": [
				{ "name": "A", "weight": 10 },
				{ "weight": 10 },
				{ "name": "C" },
				{ "name": "D", "weight": -4 },
				"not an object",
				{ "name": "F", "weight": 20 }
			] }"#,
		);
		let names: Vec<_> = data
			.cluster_specs(&NodePalette::neon())
			.into_iter()
			.map(|s| s.name)
			.collect();
		assert_eq!(names, vec!["A", "F"]);
	}

	#[test]
	fn validation_reports_the_missing_field() {
		let palette = NodePalette::neon();
		let missing_weight = ClusterRecord {
			name: Some("B".into()),
			..Default::default()
		};
		assert_eq!(
			missing_weight.validate(1, &palette),
			Err(DatasetError::MissingWeight {
				index: 1,
				name: "B".into()
			})
		);
		let blank_name = ClusterRecord {
			name: Some("  ".into()),
			weight: Some(3.0),
			..Default::default()
		};
		assert_eq!(
			blank_name.validate(2, &palette),
			Err(DatasetError::MissingName { index: 2 })
		);
	}

	#[test]
	fn missing_or_bad_color_uses_palette() {
		let palette = NodePalette::neon();
		let record = ClusterRecord {
			name: Some("X".into()),
			weight: Some(1.0),
			color: Some("not-a-color".into()),
			..Default::default()
		};
		let spec = record.validate(2, &palette).unwrap();
		assert_eq!(spec.color, palette.get(2));
		assert_eq!(spec.key, "cluster-2");
		assert_eq!(spec.leaf_count, 0);
	}

	#[test]
	fn empty_document_is_hub_only() {
		let data = data("{}");
		assert!(data.cluster_specs(&NodePalette::neon()).is_empty());
		assert_eq!(data.hub.name, "Hub");
	}
}
