//! Pointer state and the drag/select state machine.
//!
//! Hosts overwrite [`PointerState`] asynchronously; the engine reads it
//! once per tick and feeds it through [`DragState::update`]. Intermediate
//! pointer updates between two ticks coalesce to latest-wins by design.

use glam::DVec2;

use crate::source::SourceRegistry;

/// A press selects the first source whose center lies within this fraction
/// of its radius from the pointer.
pub const HIT_RADIUS_FRACTION: f64 = 0.6;

/// Last-known pointer position and button state, overwritten by each
/// `PointerUpdate` command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: DVec2,
    pub down: bool,
}

/// Drag state machine: either nothing is selected, or exactly one source
/// is pinned to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        /// Index of the selected source.
        index: usize,
        /// Pointer-to-center offset recorded at the moment of selection,
        /// so the source does not jump under the cursor.
        offset: DVec2,
    },
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragState {
    /// Run one tick of the state machine against the registry.
    ///
    /// - button up: release any drag and clear all selection flags;
    /// - button down while dragging: pin the dragged source's position to
    ///   `pointer - offset` (driven, not simulated);
    /// - button down while idle: scan sources in index order and select the
    ///   first hit. First-index-wins on overlapping hit regions is a
    ///   deliberate, reproducible-but-arbitrary tie-break.
    pub fn update(&mut self, pointer: PointerState, sources: &mut SourceRegistry) {
        if !pointer.down {
            sources.clear_selection();
            *self = DragState::Idle;
            return;
        }

        match *self {
            DragState::Dragging { index, offset } => {
                if let Some(source) = sources.get_mut(index) {
                    source.position = pointer.position - offset;
                }
            }
            DragState::Idle => {
                for (index, source) in sources.as_mut_slice().iter_mut().enumerate() {
                    let distance = (pointer.position - source.position).length();
                    if distance < source.radius * HIT_RADIUS_FRACTION {
                        source.selected = true;
                        *self = DragState::Dragging {
                            index,
                            offset: pointer.position - source.position,
                        };
                        break;
                    }
                }
            }
        }
    }
}
