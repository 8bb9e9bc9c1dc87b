//! Hierarchical cluster map component.
//!
//! Renders a hub, clusters placed around it and leaves scattered inside each
//! cluster on an HTML canvas, with:
//! - Bounded rejection-sampling layout with deterministic fallbacks
//! - Rigid cluster dragging that carries leaves and links along
//! - A perspective camera with pan, zoom-to-pointer and fly-to on selection
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use cluster_map::{ClusterMapCanvas, MapData};
//!
//! let (details, set_details) = signal(None);
//! let (closes, _) = signal(0u32);
//! let data: MapData = serde_json::from_str(json)?;
//!
//! view! {
//!     <ClusterMapCanvas data=data selection=set_details close_requests=closes fullscreen=true />
//! }
//! ```

pub mod camera;
mod component;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod layout;
mod render;
pub mod scale;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod spatial;
pub mod theme;
pub mod types;

pub use camera::{CameraController, CameraMode, Viewport};
pub use component::ClusterMapCanvas;
pub use config::MapConfig;
pub use interaction::{InteractionPipeline, MapEvent};
pub use scene::{NodeDetails, NodeId, SceneGraph};
pub use scheduler::{FrameScheduler, FrameSink, InputEvent};
pub use session::MapSession;
pub use theme::Theme;
pub use types::MapData;
