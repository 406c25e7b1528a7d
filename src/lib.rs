//! # metafield - interactive 2D metaball field renderer
//!
//! A CPU engine for the classic "metaball" visualization: a set of moving,
//! colored influence sources whose combined potential field is evaluated
//! per pixel every frame into an RGBA8 buffer, with mouse-driven dragging
//! and live resize.
//!
//! ## Quick Start
//!
//! ```
//! use metafield::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::new(320, 240)).unwrap();
//!
//! // A host forwards normalized commands between ticks...
//! engine.apply(Command::PointerUpdate { x: 160.0, y: 120.0, down: false }).unwrap();
//!
//! // ...and ticks once per display refresh.
//! engine.tick();
//! let frame = engine.frame(); // RGBA8, row-major, logical size
//! assert_eq!(frame.width(), 320);
//! ```
//!
//! ## Core Concepts
//!
//! ### Sources
//!
//! Each metaball is a [`Source`]: position, radius, RGBA color (converted
//! once from an [`Hsva`] tuple), a selection flag, and an orbital spin.
//! Three defaults are seeded at construction; more can be appended with
//! [`Command::AddSource`]. Sources are never removed.
//!
//! ### Spatial grid
//!
//! A uniform-cell grid over the canvas is rebuilt every frame and bounds
//! per-pixel work: a pixel only evaluates the sources whose influence
//! bounding box overlaps its cell.
//!
//! ### Commands and the tick
//!
//! Hosts communicate exclusively through [`Command`] values and read back
//! [`Engine::frame`]. Pointer and resize updates coalesce latest-wins
//! between ticks; one [`Engine::tick`] applies them, advances motion,
//! rebuilds the grid, and renders.
//!
//! ### Resolution scale
//!
//! A factor below 1 renders at reduced pixel density and upscales with
//! smooth interpolation, trading sharpness for throughput.

pub mod color;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod render;
pub mod source;
pub mod spatial;
pub mod time;

pub use color::{Hsva, Rgba8};
pub use engine::{Command, Engine, EngineConfig, DEFAULT_BASE_RADIUS, DEFAULT_FIELD_STRENGTH};
pub use error::EngineError;
pub use glam::DVec2;
pub use render::PixelBuffer;
pub use source::{Source, SourceRegistry};
pub use spatial::SpatialGrid;

/// Convenient re-exports for common usage.
///
/// ```
/// use metafield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Hsva, Rgba8};
    pub use crate::engine::{Command, Engine, EngineConfig};
    pub use crate::error::EngineError;
    pub use crate::interaction::{DragState, PointerState};
    pub use crate::render::PixelBuffer;
    pub use crate::source::Source;
    pub use crate::time::FrameClock;
    pub use crate::DVec2;
}
