//! The engine context: owns the registry, grid, and buffers, and runs one
//! tick per frame.
//!
//! A single `Engine` value is the exclusive owner of all mutable state;
//! every mutation happens inside [`Engine::tick`]. External commands are
//! plain field overwrites applied between ticks via [`Engine::apply`], so
//! multiple updates arriving between two ticks coalesce to latest-wins.
//! That loss of intermediate events is documented behavior, not a bug.
//!
//! Tick order: pending resize, interaction, orbital motion, grid rebuild,
//! render.

use glam::DVec2;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::color::Hsva;
use crate::error::EngineError;
use crate::interaction::{DragState, PointerState};
use crate::render::{render_field, upscale_into, PixelBuffer};
use crate::source::{Source, SourceRegistry};
use crate::spatial::SpatialGrid;
use crate::time::FrameClock;

/// Default field-strength constant (numerator of the per-source force).
pub const DEFAULT_FIELD_STRENGTH: f64 = 50_000.0;

/// Default nominal source radius; also seeds the fixed grid cell size.
pub const DEFAULT_BASE_RADIUS: f64 = 150.0;

/// Grid cells are this fraction of the nominal base radius, derived once
/// at construction and never re-derived as radii change.
const CELL_SIZE_FRACTION: f64 = 0.5;

/// Engine construction parameters.
///
/// Use method chaining, then hand the config to [`Engine::new`]:
///
/// ```
/// use metafield::{Engine, EngineConfig};
///
/// let engine = Engine::new(
///     EngineConfig::new(320, 240)
///         .with_field_strength(50_000.0)
///         .with_resolution_scale(0.75),
/// )
/// .unwrap();
/// assert_eq!(engine.sources().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub field_strength: f64,
    pub base_radius: f64,
    pub resolution_scale: f64,
}

impl EngineConfig {
    /// A config at the given logical size with default strength, base
    /// radius, and full resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            field_strength: DEFAULT_FIELD_STRENGTH,
            base_radius: DEFAULT_BASE_RADIUS,
            resolution_scale: 1.0,
        }
    }

    /// Set the field-strength constant.
    pub fn with_field_strength(mut self, strength: f64) -> Self {
        self.field_strength = strength;
        self
    }

    /// Set the nominal base radius used for default sources and the fixed
    /// grid cell size.
    pub fn with_base_radius(mut self, radius: f64) -> Self {
        self.base_radius = radius;
        self
    }

    /// Set the resolution factor in `(0, 1]`.
    pub fn with_resolution_scale(mut self, scale: f64) -> Self {
        self.resolution_scale = scale;
        self
    }
}

/// Commands a host feeds into the engine. The transport is the host's
/// concern; any iterator of commands can be drained between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Overwrite the pointer state; consumed at the next tick.
    PointerUpdate { x: f64, y: f64, down: bool },
    /// Overwrite (coalesce) the pending logical-size change; consumed at
    /// the next tick. Rapid successive requests keep only the last.
    Resize { width: u32, height: u32 },
    /// Synchronously append a source to the registry.
    AddSource { x: f64, y: f64, radius: f64, color: Hsva },
    /// Update the resolution factor and reallocate buffers immediately.
    SetResolutionScale(f64),
    /// Clear the running flag; the current tick is the last one.
    Stop,
}

/// The owned engine context. Created at init, single writer for its whole
/// lifetime.
#[derive(Debug)]
pub struct Engine {
    width: u32,
    height: u32,
    field_strength: f64,
    base_radius: f64,
    resolution_scale: f64,

    sources: SourceRegistry,
    grid: SpatialGrid,
    drag: DragState,
    pointer: PointerState,
    pending_resize: Option<(u32, u32)>,

    /// Reduced-resolution scratch target; present only when the
    /// resolution factor is below 1.
    low: Option<PixelBuffer>,
    /// The presented buffer, always at logical size.
    frame: PixelBuffer,

    clock: FrameClock,
    running: bool,
}

impl Engine {
    /// Validate the config, allocate buffers and grid, seed the three
    /// default sources, and start the scheduler.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.width == 0 || config.height == 0 {
            return Err(EngineError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        validate_resolution_scale(config.resolution_scale)?;
        if !config.field_strength.is_finite() || config.field_strength <= 0.0 {
            return Err(EngineError::InvalidFieldStrength(config.field_strength));
        }

        let cell_size = config.base_radius * CELL_SIZE_FRACTION;
        let mut engine = Self {
            width: config.width,
            height: config.height,
            field_strength: config.field_strength,
            base_radius: config.base_radius,
            resolution_scale: config.resolution_scale,
            sources: SourceRegistry::new(),
            grid: SpatialGrid::new(config.width as f64, config.height as f64, cell_size),
            drag: DragState::Idle,
            pointer: PointerState::default(),
            pending_resize: None,
            low: None,
            frame: PixelBuffer::new(0, 0),
            clock: FrameClock::new(),
            running: true,
        };
        engine.ensure_buffers();
        let (width, height) = (engine.width as f64, engine.height as f64);
        let base_radius = engine.base_radius;
        engine.sources.create_defaults(width, height, base_radius);
        Ok(engine)
    }

    /// Apply one external command. Pointer and resize updates are field
    /// overwrites read at the next tick; the rest take effect immediately.
    pub fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::PointerUpdate { x, y, down } => {
                self.pointer = PointerState {
                    position: DVec2::new(x, y),
                    down,
                };
            }
            Command::Resize { width, height } => {
                if width == 0 || height == 0 {
                    return Err(EngineError::InvalidDimensions { width, height });
                }
                self.pending_resize = Some((width, height));
            }
            Command::AddSource { x, y, radius, color } => {
                self.sources.add(x, y, radius, color);
            }
            Command::SetResolutionScale(scale) => {
                validate_resolution_scale(scale)?;
                self.resolution_scale = scale;
                self.grid.resize(self.width as f64, self.height as f64);
                self.ensure_buffers();
            }
            Command::Stop => self.stop(),
        }
        Ok(())
    }

    /// Drain a batch of commands in order, stopping at the first invalid
    /// one.
    pub fn drain<I>(&mut self, commands: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }

    /// Run one frame: resize, interaction, motion, grid rebuild, render.
    ///
    /// Returns `false` without doing any work when the engine is stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let dt = self.clock.tick();

        self.apply_pending_resize();
        self.drag.update(self.pointer, &mut self.sources);
        self.sources.advance(dt, self.center());
        self.grid.rebuild(self.sources.as_slice());

        match &mut self.low {
            Some(low) => {
                render_field(
                    low,
                    self.sources.as_slice(),
                    &self.grid,
                    self.field_strength,
                    self.resolution_scale,
                );
                upscale_into(low, &mut self.frame);
            }
            None => {
                render_field(
                    &mut self.frame,
                    self.sources.as_slice(),
                    &self.grid,
                    self.field_strength,
                    1.0,
                );
            }
        }

        #[cfg(feature = "tracing")]
        trace!(
            frame = self.clock.frame(),
            dt,
            sources = self.sources.len(),
            "tick"
        );

        true
    }

    /// Restart the scheduler. A no-op when already running.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.clock.resume();
        }
    }

    /// Stop scheduling further ticks. Idempotent; never cancels a tick
    /// already in progress.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// The buffer produced by the last tick, at current logical size.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution_scale(&self) -> f64 {
        self.resolution_scale
    }

    pub fn field_strength(&self) -> f64 {
        self.field_strength
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Read access to the sources, in creation order.
    pub fn sources(&self) -> &[Source] {
        self.sources.as_slice()
    }

    /// Most recent frames-per-second estimate.
    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    /// Force a fixed per-tick delta (deterministic stepping), or `None`
    /// for wall-clock timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f64>) {
        self.clock.set_fixed_delta(delta);
    }

    fn center(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Consume the pending resize, if any: rescale every source with the
    /// centered inverse transform, then reallocate grid and buffers.
    ///
    /// Radii scale by the uniform `min(scale_x, scale_y)` so sources never
    /// turn anisotropic; positions divide by the per-axis scale around the
    /// canvas center, which zooms into unchanged content instead of
    /// stretching it.
    fn apply_pending_resize(&mut self) {
        let Some((new_width, new_height)) = self.pending_resize.take() else {
            return;
        };

        let scale_x = new_width as f64 / self.width as f64;
        let scale_y = new_height as f64 / self.height as f64;
        let radius_scale = scale_x.min(scale_y);

        let old_center = self.center();
        let new_center = DVec2::new(new_width as f64 / 2.0, new_height as f64 / 2.0);

        for source in self.sources.as_mut_slice() {
            let rel = source.position - old_center;
            source.position = new_center + DVec2::new(rel.x / scale_x, rel.y / scale_y);
            source.radius *= radius_scale;
        }

        self.width = new_width;
        self.height = new_height;
        self.grid.resize(new_width as f64, new_height as f64);
        self.ensure_buffers();

        #[cfg(feature = "tracing")]
        trace!(width = new_width, height = new_height, "resize applied");
    }

    /// Reallocate the render target(s) for the current logical size and
    /// resolution factor. Old buffers are replaced wholesale.
    fn ensure_buffers(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;
        self.frame = PixelBuffer::new(width, height);

        self.low = if self.resolution_scale < 1.0 {
            let low_width = ((self.width as f64 * self.resolution_scale).round() as usize).max(1);
            let low_height = ((self.height as f64 * self.resolution_scale).round() as usize).max(1);
            Some(PixelBuffer::new(low_width, low_height))
        } else {
            None
        };
    }
}

fn validate_resolution_scale(scale: f64) -> Result<(), EngineError> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(EngineError::InvalidResolutionScale(scale));
    }
    Ok(())
}
