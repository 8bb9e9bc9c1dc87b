//! Scene graph: the hub, clusters, leaves, and the connectors between them.
//!
//! Nodes are tagged records that carry only the fields their kind needs.
//! Ownership is explicit (`ClusterNode::leaf_ids`, `LeafNode::owner`) and
//! connector endpoints are recomputed by [`connector_endpoint`] whenever an
//! endpoint node moves, so geometry is never stale.

use thiserror::Error;

use super::config::LayoutConfig;
use super::geometry::Vec2;
use super::layout::Layout;
use super::theme::Color;
use super::types::{ClusterSpec, HubRecord};

/// Index of a node in the scene. The hub is always `NodeId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
	/// The hub is always the first node.
	pub const HUB: NodeId = NodeId(0);
}

/// Node kind, as reported to selection consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// The central root node.
	Hub,
	/// A mid-level node with its own territory.
	Cluster,
	/// A small node scattered inside a cluster.
	Leaf,
}

/// Text shown by the detail panel for a selected node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDetails {
	/// Display name.
	pub name: String,
	/// Emoji or short text drawn on the node.
	pub glyph: Option<String>,
	/// Where the entity is based.
	pub location: Option<String>,
	/// Free-form paragraph.
	pub description: Option<String>,
	/// Short highlight lines.
	pub bullets: Vec<String>,
}

/// The immovable root at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct HubNode {
	/// Always the origin.
	pub position: Vec2,
	/// Visual radius.
	pub radius: f64,
	/// Text for the detail panel.
	pub details: NodeDetails,
}

/// A cluster and the territory its leaves live in.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
	/// Dataset key (the entry's `id`, or a generated one).
	pub key: String,
	/// Territory centre.
	pub position: Vec2,
	/// Territory radius, derived from the weight.
	pub radius: f64,
	/// Radius used for the layout overlap test.
	pub exclusion_radius: f64,
	/// Dataset weight.
	pub weight: f64,
	/// Accent color for glyph, perimeter and links.
	pub color: Color,
	/// Text for the detail panel.
	pub details: NodeDetails,
	/// Owned leaves, in placement order.
	pub leaf_ids: Vec<NodeId>,
}

/// A decorative node owned by one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafNode {
	/// Position inside the owner's territory.
	pub position: Vec2,
	/// Visual radius.
	pub radius: f64,
	/// The cluster this leaf moves with.
	pub owner: NodeId,
}

/// A node of the map.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
	/// The hub.
	Hub(HubNode),
	/// A cluster.
	Cluster(ClusterNode),
	/// A leaf.
	Leaf(LeafNode),
}

impl Node {
	/// Kind tag without the payload.
	pub fn kind(&self) -> NodeKind {
		match self {
			Node::Hub(_) => NodeKind::Hub,
			Node::Cluster(_) => NodeKind::Cluster,
			Node::Leaf(_) => NodeKind::Leaf,
		}
	}

	/// Current ground position.
	pub fn position(&self) -> Vec2 {
		match self {
			Node::Hub(n) => n.position,
			Node::Cluster(n) => n.position,
			Node::Leaf(n) => n.position,
		}
	}

	/// Visual radius.
	pub fn radius(&self) -> f64 {
		match self {
			Node::Hub(n) => n.radius,
			Node::Cluster(n) => n.radius,
			Node::Leaf(n) => n.radius,
		}
	}

	/// Display text, for the node kinds that have any.
	pub fn details(&self) -> Option<&NodeDetails> {
		match self {
			Node::Hub(n) => Some(&n.details),
			Node::Cluster(n) => Some(&n.details),
			Node::Leaf(_) => None,
		}
	}

	fn translate(&mut self, delta: Vec2) {
		match self {
			Node::Hub(n) => n.position += delta,
			Node::Cluster(n) => n.position += delta,
			Node::Leaf(n) => n.position += delta,
		}
	}
}

/// Which pair of node kinds a connector joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
	/// Animated dashed link from the hub.
	HubToCluster,
	/// Static link from a cluster to one of its leaves.
	ClusterToLeaf,
}

/// A visual link between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	/// Parent end.
	pub from: NodeId,
	/// Child end.
	pub to: NodeId,
	/// Link kind.
	pub kind: ConnectorKind,
	/// Dash offset for the flow animation.
	pub phase: f64,
	/// Current start point (the `from` node's position).
	pub start: Vec2,
	/// Current end point, see [`connector_endpoint`].
	pub end: Vec2,
}

/// Where a connector from `from` meets `to`.
///
/// A link into a cluster stops on the cluster's boundary circle so it does not
/// run across the cluster icon; every other link ends at the node's center.
/// When the two centers coincide there is no direction to step back along and
/// the center is used.
pub fn connector_endpoint(from: &Node, to: &Node) -> Vec2 {
	let target = to.position();
	match to {
		Node::Cluster(cluster) => match (target - from.position()).normalized() {
			Some(dir) => target - dir * cluster.radius,
			None => target,
		},
		_ => target,
	}
}

/// Why a scene mutation was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
	/// The id is out of range.
	#[error("no node with id {0:?}")]
	UnknownNode(NodeId),
	/// The hub never moves.
	#[error("node {0:?} cannot be moved")]
	Immovable(NodeId),
}

/// Owns every node and connector for the session.
#[derive(Clone, Debug)]
pub struct SceneGraph {
	nodes: Vec<Node>,
	connectors: Vec<Connector>,
	/// Connector indices per node, so a move touches only its own links.
	links: Vec<Vec<usize>>,
}

impl SceneGraph {
	/// Builds the scene from a layout. `specs` must be the same list, in the
	/// same order, that produced `layout`.
	pub fn build(hub: &HubRecord, config: &LayoutConfig, specs: &[ClusterSpec], layout: &Layout) -> Self {
		let leaf_total: usize = layout.clusters.iter().map(|c| c.leaves.len()).sum();
		let mut nodes = Vec::with_capacity(1 + specs.len() + leaf_total);
		nodes.push(Node::Hub(HubNode {
			position: Vec2::ZERO,
			radius: config.hub_radius,
			details: NodeDetails {
				name: hub.name.clone(),
				glyph: hub.glyph.clone(),
				location: None,
				description: hub.description.clone(),
				bullets: hub.bullets.clone(),
			},
		}));

		for (spec, placed) in specs.iter().zip(&layout.clusters) {
			debug_assert_eq!(placed.id, NodeId(nodes.len()));
			nodes.push(Node::Cluster(ClusterNode {
				key: spec.key.clone(),
				position: placed.position,
				radius: placed.radius,
				exclusion_radius: placed.exclusion_radius,
				weight: spec.weight,
				color: spec.color,
				details: NodeDetails {
					name: spec.name.clone(),
					glyph: spec.glyph.clone(),
					location: spec.location.clone(),
					description: spec.description.clone(),
					bullets: spec.bullets.clone(),
				},
				leaf_ids: placed.leaves.iter().map(|l| l.id).collect(),
			}));
		}

		let mut connectors = Vec::with_capacity(specs.len() + leaf_total);
		for placed in &layout.clusters {
			connectors.push((NodeId::HUB, placed.id, ConnectorKind::HubToCluster));
		}
		for placed in &layout.clusters {
			for leaf in &placed.leaves {
				debug_assert_eq!(leaf.id, NodeId(nodes.len()));
				nodes.push(Node::Leaf(LeafNode {
					position: leaf.position,
					radius: config.leaf_radius,
					owner: placed.id,
				}));
				connectors.push((placed.id, leaf.id, ConnectorKind::ClusterToLeaf));
			}
		}

		let mut scene = Self {
			links: vec![Vec::new(); nodes.len()],
			nodes,
			connectors: Vec::new(),
		};
		for (from, to, kind) in connectors {
			scene.connect(from, to, kind);
		}
		scene
	}

	fn connect(&mut self, from: NodeId, to: NodeId, kind: ConnectorKind) {
		let index = self.connectors.len();
		let (start, end) = self.endpoints(from, to);
		self.connectors.push(Connector {
			from,
			to,
			kind,
			phase: 0.0,
			start,
			end,
		});
		self.links[from.0].push(index);
		self.links[to.0].push(index);
	}

	fn endpoints(&self, from: NodeId, to: NodeId) -> (Vec2, Vec2) {
		let (a, b) = (&self.nodes[from.0], &self.nodes[to.0]);
		(a.position(), connector_endpoint(a, b))
	}

	/// Node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	/// Every node with its id, hub first.
	pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
		self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
	}

	/// Node count, hub included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the scene has no nodes at all.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The hub, if the scene was built with one.
	pub fn hub(&self) -> Option<&HubNode> {
		match self.nodes.first() {
			Some(Node::Hub(hub)) => Some(hub),
			_ => None,
		}
	}

	/// Clusters in dataset order.
	pub fn clusters(&self) -> impl Iterator<Item = (NodeId, &ClusterNode)> {
		self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
			Node::Cluster(c) => Some((NodeId(i), c)),
			_ => None,
		})
	}

	/// Leaves grouped by owner.
	pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &LeafNode)> {
		self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
			Node::Leaf(l) => Some((NodeId(i), l)),
			_ => None,
		})
	}

	/// Every connector with up-to-date endpoints.
	pub fn connectors(&self) -> &[Connector] {
		&self.connectors
	}

	/// Rigidly translates a node by `delta`.
	///
	/// Moving a cluster carries its leaves along and refreshes the hub link
	/// and every leaf link. Moving a leaf refreshes only its own link. The hub
	/// never moves. Overlap with other clusters is not re-checked.
	pub fn move_node(&mut self, id: NodeId, delta: Vec2) -> Result<(), SceneError> {
		let mut moved = match self.nodes.get(id.0) {
			None => return Err(SceneError::UnknownNode(id)),
			Some(Node::Hub(_)) => return Err(SceneError::Immovable(id)),
			Some(Node::Cluster(c)) => c.leaf_ids.clone(),
			Some(Node::Leaf(_)) => Vec::new(),
		};
		moved.push(id);

		for &node in &moved {
			self.nodes[node.0].translate(delta);
		}
		for &node in &moved {
			for i in self.links[node.0].clone() {
				let (from, to) = (self.connectors[i].from, self.connectors[i].to);
				let (start, end) = self.endpoints(from, to);
				let connector = &mut self.connectors[i];
				connector.start = start;
				connector.end = end;
			}
		}
		Ok(())
	}

	/// Advances the dash animation of hub links by `step`.
	pub fn advance_connectors(&mut self, step: f64) {
		for connector in &mut self.connectors {
			if connector.kind == ConnectorKind::HubToCluster {
				connector.phase -= step;
			}
		}
	}
}
