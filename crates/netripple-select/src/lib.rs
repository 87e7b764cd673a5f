//! Netripple Select - Traversal over netripple networks
//!
//! This crate provides neighbor selection, the caller-paced ripple engine
//! and the replay of the paths it records.

pub mod error;
pub mod handler;
pub mod limits;
pub mod neighbors;
pub mod path;
pub mod ripple;
pub mod shortest;

pub use error::{SelectError, SelectResult};
pub use handler::RippleHandler;
pub use neighbors::{neighbors, FlowDirection, NeighborOptions, Neighbors};
pub use path::{
    travel_collision_path, travel_path, Collision, EdgeLookup, NetworkPath, ReversePathMap,
};
pub use ripple::{
    RippleResponse, RippleResult, RippleSelect, RippleState, Ripples, SplashOptions,
    SplashSummary, StopReason,
};
pub use shortest::shortest_paths;
