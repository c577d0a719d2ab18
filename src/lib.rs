//! Interactive block tree diagram.
//!
//! Blocks are spawned as children of existing blocks, dragged freely and
//! removed. [`store::TreeStore`] owns identity, positions and parent links;
//! [`drag`] translates pointer input into position updates, one isolated
//! session per pointer; connector geometry is derived on demand by
//! [`geometry`]. [`canvas::Canvas`] ties these together behind a single
//! event entry point.
//!
//! The binary `blocktree` replays a JSON event script and prints the
//! resulting scene as JSON.

pub mod canvas;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod store;

// Optional GUI functionality lives behind the `egui` feature flag.
// It is used by the demo in demos/egui_tree.rs.
#[cfg(feature = "egui")]
pub mod egui_app;
