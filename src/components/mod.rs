//! UI components: the map canvas and the detail panel fed by its selection.

pub mod cluster_map;
pub mod detail_panel;
