//! Uniform-grid spatial index over the source registry.
//!
//! Cuts the per-pixel cost of field evaluation from O(sources) to O(local
//! density): each cell lists the sources whose margin-expanded bounding box
//! overlaps it, so a pixel only visits candidates that can plausibly
//! influence it. The listing is approximate by construction — a source may
//! be listed for a cell it only partially overlaps (harmless, contribution
//! falls off smoothly) but is never missing from a cell inside its margin.
//!
//! The grid is rebuilt from scratch every frame; with every source
//! potentially moving every tick, incremental maintenance buys nothing.

use crate::source::Source;

/// Influence bounding boxes extend `MARGIN_FACTOR * radius` on each side.
const MARGIN_FACTOR: f64 = 2.0;

/// Row-major uniform grid of source index sets.
///
/// Cell size is fixed at construction (derived once from the nominal base
/// radius) and never re-derived as source radii change; only the cell
/// counts change when the logical canvas is resized.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    horizontal_cells: usize,
    vertical_cells: usize,
    cells: Vec<Vec<u32>>,
}

impl SpatialGrid {
    /// Allocate a grid covering `width x height` logical pixels.
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        let horizontal_cells = ((width / cell_size).ceil() as usize).max(1);
        let vertical_cells = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            horizontal_cells,
            vertical_cells,
            cells: vec![Vec::new(); horizontal_cells * vertical_cells],
        }
    }

    /// Reallocate for new logical dimensions, keeping the fixed cell size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.horizontal_cells = ((width / self.cell_size).ceil() as usize).max(1);
        self.vertical_cells = ((height / self.cell_size).ceil() as usize).max(1);
        self.cells.clear();
        self.cells
            .resize(self.horizontal_cells * self.vertical_cells, Vec::new());
    }

    /// Clear every cell and re-insert every source into the cells its
    /// margin-expanded bounding box overlaps, clamped to the grid extent.
    ///
    /// Each (source, cell) pair is visited once, so cells hold deduplicated
    /// index sets. Inner vectors keep their capacity across rebuilds.
    pub fn rebuild(&mut self, sources: &[Source]) {
        for cell in &mut self.cells {
            cell.clear();
        }

        for (index, source) in sources.iter().enumerate() {
            let margin = MARGIN_FACTOR * source.radius;

            let min_x = source.position.x - margin;
            let max_x = source.position.x + margin;
            let min_y = source.position.y - margin;
            let max_y = source.position.y + margin;

            // Entirely outside the grid.
            if max_x < 0.0 || max_y < 0.0 {
                continue;
            }

            let cx0 = ((min_x / self.cell_size).floor().max(0.0)) as usize;
            let cy0 = ((min_y / self.cell_size).floor().max(0.0)) as usize;
            if cx0 >= self.horizontal_cells || cy0 >= self.vertical_cells {
                continue;
            }
            let cx1 = (((max_x / self.cell_size).floor()) as usize).min(self.horizontal_cells - 1);
            let cy1 = (((max_y / self.cell_size).floor()) as usize).min(self.vertical_cells - 1);

            for cy in cy0..=cy1 {
                for cx in cx0..=cx1 {
                    self.cells[cy * self.horizontal_cells + cx].push(index as u32);
                }
            }
        }
    }

    /// Candidate source indices for a world-space point, or an empty slice
    /// when the point falls outside the grid extent.
    pub fn query(&self, world_x: f64, world_y: f64) -> &[u32] {
        if world_x < 0.0 || world_y < 0.0 {
            return &[];
        }
        let cx = (world_x / self.cell_size) as usize;
        let cy = (world_y / self.cell_size) as usize;
        if cx >= self.horizontal_cells || cy >= self.vertical_cells {
            return &[];
        }
        &self.cells[cy * self.horizontal_cells + cx]
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn horizontal_cells(&self) -> usize {
        self.horizontal_cells
    }

    pub fn vertical_cells(&self) -> usize {
        self.vertical_cells
    }
}
