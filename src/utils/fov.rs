//! # Field of View
//!
//! Computes the set of tiles visible from an origin within a radius.

use crate::{Position, TileGrid};
use std::collections::HashSet;

/// Field-of-view collaborator.
pub trait FieldOfView {
    /// Returns every position visible from `origin` within `radius`.
    /// The origin is always included.
    fn compute(&self, grid: &TileGrid, origin: Position, radius: i32) -> HashSet<Position>;
}

/// Simple ray casting: one Bresenham line from the origin to every tile on
/// the perimeter of the bounding square. Walls that stop a ray are lit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayCastFov;

impl RayCastFov {
    pub fn new() -> Self {
        Self
    }

    fn cast(
        &self,
        grid: &TileGrid,
        origin: Position,
        target: Position,
        radius: i32,
        visible: &mut HashSet<Position>,
    ) {
        for pos in bresenham(origin, target) {
            if !grid.is_valid_position(pos) || origin.euclidean_distance(pos) > radius as f64 {
                break;
            }
            visible.insert(pos);
            if pos != origin && grid.blocks_sight(pos) {
                break;
            }
        }
    }
}

impl FieldOfView for RayCastFov {
    fn compute(&self, grid: &TileGrid, origin: Position, radius: i32) -> HashSet<Position> {
        let mut visible = HashSet::new();
        visible.insert(origin);
        if radius <= 0 {
            return visible;
        }

        for offset in -radius..=radius {
            let perimeter = [
                Position::new(origin.x + offset, origin.y - radius),
                Position::new(origin.x + offset, origin.y + radius),
                Position::new(origin.x - radius, origin.y + offset),
                Position::new(origin.x + radius, origin.y + offset),
            ];
            for target in perimeter {
                self.cast(grid, origin, target, radius, &mut visible);
            }
        }
        visible
    }
}

/// Integer line from `from` to `to`, both ends included.
fn bresenham(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut points = Vec::with_capacity((dx - dy) as usize + 1);

    loop {
        points.push(current);
        if current == to {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            current.x += sx;
        }
        if doubled <= dx {
            err += dx;
            current.y += sy;
        }
    }
    points
}
