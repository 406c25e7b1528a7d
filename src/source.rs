//! The source registry: every metaball's position, radius, color,
//! selection flag, and orbital motion.
//!
//! The registry is the single owner of all source fields (one record type
//! per source; nothing else holds mutable aliases). Sources are only ever
//! appended — nothing in the engine removes them.

use glam::DVec2;

use crate::color::{Hsva, Rgba8};

/// Angular velocities (rad/s) given to the three seeded sources. At 60 fps
/// these match the classic per-frame rates of +0.05/-0.05/-0.02.
const DEFAULT_SPINS: [f64; 3] = [3.0, -3.0, -1.2];

/// Hues (degrees) of the three seeded sources: red, green, blue.
const DEFAULT_HUES: [f64; 3] = [0.0, 120.0, 240.0];

/// One influence source contributing to the scalar field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    /// Center in logical pixel space.
    pub position: DVec2,
    /// Nominal influence radius; also scales the drag hit-test region.
    pub radius: f64,
    /// Stored color, converted from HSVA once at creation.
    pub color: Rgba8,
    /// True while this source is being dragged.
    pub selected: bool,
    /// Orbital angular velocity in rad/s about the canvas center.
    /// Zero for sources added at runtime.
    pub spin: f64,
}

/// Owns the growing set of sources.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    /// Append a new unselected, non-orbiting source.
    ///
    /// No upper bound on the source count is enforced here; that is a
    /// caller-side policy.
    pub fn add(&mut self, x: f64, y: f64, radius: f64, color: Hsva) {
        self.add_with_spin(x, y, radius, color, 0.0);
    }

    fn add_with_spin(&mut self, x: f64, y: f64, radius: f64, color: Hsva, spin: f64) {
        self.sources.push(Source {
            position: DVec2::new(x, y),
            radius,
            color: Rgba8::from(color),
            selected: false,
            spin,
        });
    }

    /// Clear the registry and seed exactly three sources 120 degrees apart
    /// on a circle centered in the canvas.
    ///
    /// The ring radius derives from the smaller canvas dimension so the
    /// sources' influence stays within bounds; centers are additionally
    /// clamped at least one `base_radius` away from every edge.
    pub fn create_defaults(&mut self, width: f64, height: f64, base_radius: f64) {
        self.sources.clear();

        let center = DVec2::new(width / 2.0, height / 2.0);
        let ring = width.min(height) / 4.0;
        let n = DEFAULT_HUES.len();

        for i in 0..n {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            let x = center.x + ring * angle.cos();
            let y = center.y + ring * angle.sin();
            self.add_with_spin(
                clamp_inside(x, base_radius, width - base_radius),
                clamp_inside(y, base_radius, height - base_radius),
                base_radius,
                Hsva::new(DEFAULT_HUES[i], 100.0, 100.0, 1.0),
                DEFAULT_SPINS[i],
            );
        }
    }

    /// Advance orbital motion by `dt` seconds about `center`, preserving
    /// each source's current orbit radius.
    pub fn advance(&mut self, dt: f64, center: DVec2) {
        for source in &mut self.sources {
            if source.spin == 0.0 {
                continue;
            }
            let rel = source.position - center;
            let orbit = rel.length();
            let angle = rel.y.atan2(rel.x) + source.spin * dt;
            source.position = center + orbit * DVec2::new(angle.cos(), angle.sin());
        }
    }

    /// Index of the currently selected source, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.sources.iter().position(|s| s.selected)
    }

    /// Clear every selection flag.
    pub fn clear_selection(&mut self) {
        for source in &mut self.sources {
            source.selected = false;
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Source> {
        self.sources.get_mut(index)
    }

    /// Read access to the whole set, in creation order.
    pub fn as_slice(&self) -> &[Source] {
        &self.sources
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Source] {
        &mut self.sources
    }
}

/// Clamp to `[lo, hi]`, falling back to the midpoint when the canvas is too
/// small for the interval to exist.
fn clamp_inside(x: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        x.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_RADIUS: f64 = 150.0;

    #[test]
    fn test_defaults_form_centered_circle() {
        let mut registry = SourceRegistry::new();
        registry.create_defaults(800.0, 600.0, BASE_RADIUS);

        assert_eq!(registry.len(), 3);
        let center = DVec2::new(400.0, 300.0);

        let mut angles = Vec::new();
        for source in registry.as_slice() {
            assert_eq!(source.radius, BASE_RADIUS);
            assert!(!source.selected);
            let rel = source.position - center;
            assert!((rel.length() - 150.0).abs() < 1e-9, "ring radius is min(w,h)/4");
            angles.push(rel.y.atan2(rel.x));
        }

        // Mutually 120 degrees apart.
        let third = std::f64::consts::TAU / 3.0;
        for i in 0..3 {
            let gap = (angles[(i + 1) % 3] - angles[i]).rem_euclid(std::f64::consts::TAU);
            assert!((gap - third).abs() < 1e-9, "gap {} != 120 degrees", gap);
        }
    }

    #[test]
    fn test_defaults_stay_one_radius_from_edges() {
        let mut registry = SourceRegistry::new();
        registry.create_defaults(800.0, 600.0, BASE_RADIUS);

        for source in registry.as_slice() {
            assert!(source.position.x >= BASE_RADIUS);
            assert!(source.position.x <= 800.0 - BASE_RADIUS);
            assert!(source.position.y >= BASE_RADIUS);
            assert!(source.position.y <= 600.0 - BASE_RADIUS);
        }
    }

    #[test]
    fn test_create_defaults_replaces_existing_sources() {
        let mut registry = SourceRegistry::new();
        registry.add(10.0, 10.0, 50.0, Hsva::new(0.0, 100.0, 100.0, 1.0));
        registry.create_defaults(800.0, 600.0, BASE_RADIUS);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_added_sources_do_not_orbit() {
        let mut registry = SourceRegistry::new();
        registry.add(100.0, 100.0, 50.0, Hsva::new(0.0, 100.0, 100.0, 1.0));

        let before = registry.get(0).unwrap().position;
        registry.advance(1.0, DVec2::new(400.0, 300.0));
        assert_eq!(registry.get(0).unwrap().position, before);
    }

    #[test]
    fn test_advance_preserves_orbit_radius() {
        let mut registry = SourceRegistry::new();
        registry.create_defaults(800.0, 600.0, BASE_RADIUS);
        let center = DVec2::new(400.0, 300.0);

        let radii_before: Vec<f64> = registry
            .as_slice()
            .iter()
            .map(|s| (s.position - center).length())
            .collect();

        registry.advance(0.37, center);

        for (source, before) in registry.as_slice().iter().zip(radii_before) {
            let after = (source.position - center).length();
            assert!((after - before).abs() < 1e-9);
        }
    }

    #[test]
    fn test_advance_is_rate_scaled() {
        let mut a = SourceRegistry::new();
        let mut b = SourceRegistry::new();
        a.create_defaults(800.0, 600.0, BASE_RADIUS);
        b.create_defaults(800.0, 600.0, BASE_RADIUS);
        let center = DVec2::new(400.0, 300.0);

        // One big step equals two half steps.
        a.advance(0.2, center);
        b.advance(0.1, center);
        b.advance(0.1, center);

        for (sa, sb) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((sa.position - sb.position).length() < 1e-9);
        }
    }

    #[test]
    fn test_stored_color_matches_hsva_input() {
        let mut registry = SourceRegistry::new();
        registry.add(100.0, 100.0, 50.0, Hsva::new(0.0, 100.0, 100.0, 1.0));
        assert_eq!(registry.get(0).unwrap().color, Rgba8::new(255, 0, 0, 255));
    }

    #[test]
    fn test_tiny_canvas_pins_sources_to_midlines() {
        let mut registry = SourceRegistry::new();
        registry.create_defaults(100.0, 80.0, BASE_RADIUS);

        // Clamp interval is empty on both axes; everything collapses to
        // the canvas center rather than panicking.
        for source in registry.as_slice() {
            assert_eq!(source.position, DVec2::new(50.0, 40.0));
        }
    }
}
