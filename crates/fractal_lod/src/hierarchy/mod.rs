//! LOD hierarchy: generations of 20 icosahedron nodes, each generation half
//! the scale of the one before, refined one bake at a time.
//!
//! - [`HierarchyManager`]: per-step scheduling, zoom-in, pruning, occlusion.
//! - [`GenerationArena`]: tail-only storage of the generations.
//! - [`priority`]: scoring and selection of the next node.

mod config;
mod generations;
mod manager;
mod node;
pub mod priority;

pub use config::HierarchyConfig;
pub use generations::{Generation, GenerationArena};
pub use manager::{HierarchyEvent, HierarchyManager, HierarchyState};
pub use node::{LodNode, NodeId};
