//! Dwell-based option selection.
//!
//! A `DwellSelector` commits a choice when the pointer hovers one option's
//! circle continuously for the dwell duration. One generic implementation is
//! instantiated twice: the color palette and the shape palette.

use crate::config::SelectorLayout;
use kurbo::{Point, Size};

/// Read-only view of a selector for the render model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorSnapshot {
    pub active: usize,
    pub hover: Option<usize>,
    /// Dwell completion in [0,1]; 0 when nothing is hovered.
    pub hover_progress: f64,
}

/// Hover-and-hold selection over a fixed list of circular options.
#[derive(Debug, Clone)]
pub struct DwellSelector<T> {
    options: Vec<T>,
    layout: SelectorLayout,
    dwell_ms: f64,
    active: usize,
    hover: Option<usize>,
    hover_start_ms: f64,
    /// Progress of the current hover, refreshed by `update`.
    progress: f64,
}

impl<T> DwellSelector<T> {
    /// Create a selector; option 0 starts active.
    pub fn new(options: Vec<T>, layout: SelectorLayout, dwell_ms: f64) -> Self {
        Self {
            options,
            layout,
            dwell_ms,
            active: 0,
            hover: None,
            hover_start_ms: 0.0,
            progress: 0.0,
        }
    }

    /// Advance the selector with this frame's pointer position.
    ///
    /// Entering an option arms the dwell timer; holding it for the dwell
    /// duration commits that option exactly once and disarms the hover.
    /// Leaving before the dwell completes forgets the hover entirely, so no
    /// partial progress carries over between options.
    pub fn update(&mut self, pointer: Point, viewport: Size, now_ms: f64) {
        let hit_radius = self.layout.hit_radius();
        let hit = (0..self.options.len())
            .find(|&i| pointer.distance(self.layout.center(i, viewport)) < hit_radius);

        match hit {
            Some(i) => {
                if self.hover != Some(i) {
                    self.hover = Some(i);
                    self.hover_start_ms = now_ms;
                }
                if now_ms - self.hover_start_ms >= self.dwell_ms {
                    log::debug!("dwell selection committed: option {i}");
                    self.active = i;
                    self.hover = None;
                }
            }
            None => self.hover = None,
        }

        // Clamped against non-monotonic clocks.
        self.progress = match self.hover {
            Some(_) => ((now_ms - self.hover_start_ms) / self.dwell_ms).clamp(0.0, 1.0),
            None => 0.0,
        };
    }

    /// Drop hover state, as after tracking loss. The committed selection
    /// stays.
    pub fn reset_hover(&mut self) {
        self.hover = None;
        self.progress = 0.0;
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn layout(&self) -> &SelectorLayout {
        &self.layout
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_option(&self) -> &T {
        &self.options[self.active]
    }

    pub fn snapshot(&self) -> SelectorSnapshot {
        SelectorSnapshot {
            active: self.active,
            hover: self.hover,
            hover_progress: self.progress,
        }
    }
}
