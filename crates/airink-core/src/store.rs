//! Persisted drawing storage.

use crate::drawing::{ColoredPoint, Drawing, DrawingId, Shape, Stroke};
use std::collections::HashMap;
use uuid::Uuid;

/// Owns every persisted drawing, keyed by id with an explicit paint order.
///
/// Single-writer: all mutation happens on the engine's frame thread.
#[derive(Debug, Clone, Default)]
pub struct DrawingStore {
    drawings: HashMap<DrawingId, Drawing>,
    /// Paint order, back to front; insertion order.
    z_order: Vec<DrawingId>,
}

impl DrawingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty stroke and return its handle.
    ///
    /// The stroke is already part of the store; the handle only permits
    /// appending while the stroke stays open.
    pub fn begin_stroke(&mut self) -> DrawingId {
        let id = Uuid::new_v4();
        self.z_order.push(id);
        self.drawings.insert(id, Drawing::Stroke(Stroke::new()));
        id
    }

    /// Append a point to an open stroke. A stale handle (stroke erased or
    /// cleared since `begin_stroke`) is a silent no-op.
    pub fn append_point(&mut self, handle: DrawingId, point: ColoredPoint) {
        if let Some(Drawing::Stroke(stroke)) = self.drawings.get_mut(&handle) {
            stroke.add_point(point);
        }
    }

    /// Persist a finished shape.
    pub fn commit_shape(&mut self, shape: Shape) {
        let id = Uuid::new_v4();
        self.z_order.push(id);
        self.drawings.insert(id, Drawing::Shape(shape));
    }

    /// Remove, in one pass, every stroke with at least one point strictly
    /// within `radius` of `point`, and every shape whose corner-midpoint
    /// center is strictly within `radius`.
    ///
    /// The predicates are asymmetric: strokes are tested per-point, shapes
    /// only by centroid, so a large shape survives a hit on its rim.
    pub fn erase_near(&mut self, point: kurbo::Point, radius: f64) {
        let drawings = &mut self.drawings;
        let before = self.z_order.len();
        self.z_order.retain(|id| {
            let hit = match drawings.get(id) {
                Some(Drawing::Stroke(stroke)) => stroke.any_point_within(point, radius),
                Some(Drawing::Shape(shape)) => shape.center().distance(point) < radius,
                None => false,
            };
            if hit {
                drawings.remove(id);
            }
            !hit
        });
        let removed = before - self.z_order.len();
        if removed > 0 {
            log::debug!("erased {removed} drawing(s) near ({:.0}, {:.0})", point.x, point.y);
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.drawings.clear();
        self.z_order.clear();
    }

    /// Drawings in paint order (back to front).
    pub fn drawings_ordered(&self) -> impl Iterator<Item = &Drawing> {
        self.z_order.iter().filter_map(|id| self.drawings.get(id))
    }

    pub fn get(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }
}
