//! The per-frame, per-pixel field renderer and its pixel buffer.
//!
//! For every output pixel the renderer queries the spatial grid for
//! candidate sources, accumulates a force scalar and a distance-weighted
//! color blend, then reshapes brightness and saturation in HSV space from
//! the accumulated force. The weight grows with distance, so farther
//! sources dominate the color average — that inversion is this engine's
//! documented visual signature and is locked by tests, not corrected.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::color::{hsv_to_rgb, rgb_to_hsv, Rgba8};
use crate::source::Source;
use crate::spatial::SpatialGrid;

/// Accumulated force is squared and divided by this to drive brightness.
const BRIGHTNESS_DIVISOR: f64 = 500.0;

/// Fixed saturation reduction applied after the brightness override.
const SATURATION_OFFSET: f64 = 0.2;

/// An owned RGBA8 raster, row-major, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The raster viewed as pixels.
    pub fn pixels(&self) -> &[Rgba8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Pixel at `(x, y)`. Panics when out of bounds (test/host helper).
    pub fn pixel(&self, x: usize, y: usize) -> Rgba8 {
        assert!(x < self.width && y < self.height);
        self.pixels()[y * self.width + x]
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }
}

/// Fill `target` by evaluating the field at every pixel.
///
/// `target` is at render resolution; world coordinates are pixel
/// coordinates divided by `resolution_scale`. Pixels whose grid cell holds
/// no candidates stay black, with the alpha channel forced opaque.
pub(crate) fn render_field(
    target: &mut PixelBuffer,
    sources: &[Source],
    grid: &SpatialGrid,
    strength: f64,
    resolution_scale: f64,
) {
    target.clear();
    let width = target.width;

    for y in 0..target.height {
        let world_y = y as f64 / resolution_scale;
        let row = y * width;

        for x in 0..width {
            let world_x = x as f64 / resolution_scale;

            let mut r = 0.0;
            let mut g = 0.0;
            let mut b = 0.0;
            let mut total_weight = 0.0;
            let mut total_force = 0.0;

            for &index in grid.query(world_x, world_y) {
                let source = &sources[index as usize];
                let dx = world_x - source.position.x;
                let dy = world_y - source.position.y;
                let dist_sq = dx * dx + dy * dy;

                total_force += strength / (dist_sq + 1.0);

                // Distance-weighted blend: weight grows with distance.
                let weight = dist_sq.sqrt();
                total_weight += weight;
                r += source.color.r as f64 * weight;
                g += source.color.g as f64 * weight;
                b += source.color.b as f64 * weight;
            }

            let index = (row + x) * 4;
            if total_weight > 0.0 {
                r = (r / total_weight).min(255.0);
                g = (g / total_weight).min(255.0);
                b = (b / total_weight).min(255.0);

                let (h, s, _) = rgb_to_hsv(r, g, b);
                let v = ((total_force * total_force) / BRIGHTNESS_DIVISOR).min(1.0);
                let s = (s - SATURATION_OFFSET).clamp(0.0, 1.0);
                let (nr, ng, nb) = hsv_to_rgb(h, s, v);

                target.data[index] = nr.round() as u8;
                target.data[index + 1] = ng.round() as u8;
                target.data[index + 2] = nb.round() as u8;
            }
            target.data[index + 3] = 255;
        }
    }
}

/// Upscale `low` into `frame` with smooth (triangle-filter) interpolation.
///
/// Used when the resolution factor is below 1: the field is evaluated at
/// reduced density and stretched back to logical size, trading sharpness
/// for per-frame throughput.
pub(crate) fn upscale_into(low: &mut PixelBuffer, frame: &mut PixelBuffer) {
    let data = std::mem::take(&mut low.data);
    let Some(img) = RgbaImage::from_raw(low.width as u32, low.height as u32, data) else {
        // Dimensions and data length match by construction; if they ever
        // do not, leave the previous frame in place.
        low.data = vec![0; low.width * low.height * 4];
        return;
    };

    let scaled = imageops::resize(
        &img,
        frame.width as u32,
        frame.height as u32,
        FilterType::Triangle,
    );
    frame.data.copy_from_slice(scaled.as_raw());
    low.data = img.into_raw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsva;
    use glam::DVec2;

    fn source_at(x: f64, y: f64, radius: f64, hue: f64) -> Source {
        Source {
            position: DVec2::new(x, y),
            radius,
            color: Rgba8::from(Hsva::new(hue, 100.0, 100.0, 1.0)),
            selected: false,
            spin: 0.0,
        }
    }

    #[test]
    fn test_empty_cell_renders_opaque_black() {
        let mut target = PixelBuffer::new(32, 32);
        let grid = SpatialGrid::new(32.0, 32.0, 16.0);
        render_field(&mut target, &[], &grid, 50_000.0, 1.0);

        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(target.pixel(x, y), Rgba8::new(0, 0, 0, 255));
            }
        }
    }

    #[test]
    fn test_single_saturated_source_pixel_value() {
        // One red source; a nearby pixel accumulates enough force to pin
        // brightness at 1.0, so the result is red desaturated by exactly
        // the fixed 0.2 offset: hsv(0, 0.8, 1.0) = (255, 51, 51).
        let sources = [source_at(50.0, 50.0, 100.0, 0.0)];
        let mut grid = SpatialGrid::new(100.0, 100.0, 50.0);
        grid.rebuild(&sources);

        let mut target = PixelBuffer::new(100, 100);
        render_field(&mut target, &sources, &grid, 50_000.0, 1.0);

        assert_eq!(target.pixel(60, 50), Rgba8::new(255, 51, 51, 255));
    }

    #[test]
    fn test_two_source_pixel_blend_is_distance_weighted() {
        // Locks the documented inversion: the pixel sits close to the red
        // source and far from the blue one, and must come out blue-heavy
        // because weight grows with distance.
        let sources = [
            source_at(10.0, 50.0, 200.0, 0.0),   // red, near
            source_at(90.0, 50.0, 200.0, 240.0), // blue, far
        ];
        let mut grid = SpatialGrid::new(100.0, 100.0, 50.0);
        grid.rebuild(&sources);

        let mut target = PixelBuffer::new(100, 100);
        render_field(&mut target, &sources, &grid, 50_000.0, 1.0);

        let px = target.pixel(20, 50);
        assert!(
            px.b > px.r,
            "expected far (blue) source to dominate, got {:?}",
            px
        );
    }

    #[test]
    fn test_reduced_resolution_maps_pixels_to_world() {
        // At scale 0.5, render pixel (30, 25) samples world (60, 50), the
        // same point full resolution samples at pixel (60, 50).
        let sources = [source_at(60.0, 50.0, 100.0, 0.0)];
        let mut grid = SpatialGrid::new(120.0, 100.0, 50.0);
        grid.rebuild(&sources);

        let mut full = PixelBuffer::new(120, 100);
        render_field(&mut full, &sources, &grid, 50_000.0, 1.0);

        let mut half = PixelBuffer::new(60, 50);
        render_field(&mut half, &sources, &grid, 50_000.0, 0.5);

        assert_eq!(half.pixel(30, 25), full.pixel(60, 50));
    }

    #[test]
    fn test_upscale_matches_frame_dimensions() {
        let mut low = PixelBuffer::new(4, 4);
        low.data.fill(200);
        let mut frame = PixelBuffer::new(8, 8);

        upscale_into(&mut low, &mut frame);

        assert_eq!(frame.data().len(), 8 * 8 * 4);
        // A constant image stays constant under interpolation.
        assert!(frame.data().iter().all(|&b| b == 200));
        // The low-resolution buffer keeps its storage for the next frame.
        assert_eq!(low.data().len(), 4 * 4 * 4);
    }
}
