//! fractal_lod - engine-independent core of an infinite-zoom fractal explorer
//!
//! The surface of an implicit fractal is sphere-traced from the camera and
//! baked into texture tiles on an icosahedron. Every time the camera closes in
//! on the surface a new generation of tiles at half the scale is added, so
//! zooming never runs out of detail.
//!
//! # Components
//!
//! - **Ray marching**: geometric-step tracing against a membership predicate
//! - **Baking**: time-sliced rasterization of one node's tile
//! - **Hierarchy**: node selection, zoom-in, pruning and occlusion hiding
//! - **Rendering**: draw calls issued through a host-provided GPU trait
//! - **View**: pointer/keyboard camera and the persisted navigation token
//!
//! # Example
//!
//! ```ignore
//! use fractal_lod::{Explorer, ExplorerConfig, FractalFormula, InputState};
//!
//! let mut explorer = Explorer::new(
//!   gpu, 1280, 720,
//!   FractalFormula::MANDELBULB,
//!   fractal_lod::constants::START_POSITION,
//!   ExplorerConfig::default(),
//! )?;
//!
//! // Host loop
//! let tick = explorer.tick(is_idle, &input, dt, web_time::Instant::now())?;
//! if let Some(token) = tick.persist {
//!   set_location_hash(&token.to_string());
//! }
//! ```

pub mod algebra;
pub mod constants;
pub mod formula;
pub mod mesh;
pub mod ray_march;

pub use algebra::{AlgebraError, Matrix};
pub use formula::{FormulaError, FractalFormula, Membership};
pub use mesh::Frustum;
pub use ray_march::{march, RayHit};

// Incremental texture baking
pub mod baker;
pub use baker::{BakeBudget, BakeError, BakeJob, Baker, TextureTile};

// LOD hierarchy
pub mod hierarchy;
pub use hierarchy::{
  HierarchyConfig, HierarchyEvent, HierarchyManager, HierarchyState, LodNode, NodeId,
};

// Rendering through a host GPU
pub mod render;
pub use render::{GpuDevice, GpuError, GpuProgram, GpuTexture, RenderError, Renderer, Uniform};

// Camera, input and navigation
pub mod camera;
pub mod navigation;
pub mod view;
pub use camera::Camera;
pub use navigation::{NavigationToken, Origin, TokenError};
pub use view::{Control, InputState, ViewConfig, ViewController};

// Host entry point
pub mod explorer;
pub use explorer::{Explorer, ExplorerConfig, ExplorerError, Tick};

// Metrics collection (feature-gated)
pub mod metrics;
pub use metrics::{BakeMetrics, RollingWindow};
