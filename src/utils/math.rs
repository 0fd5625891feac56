//! # Game Mathematics
//!
//! Integer step math shared by movement, projectiles and ranged attacks.

use crate::{Position, TileGrid};

/// The single compass step that best approximates the direction from
/// `from` to `to`: the normalized vector with each axis rounded.
///
/// Returns `(0, 0)` when the two positions coincide.
pub fn unit_step(from: Position, to: Position) -> Position {
    let delta = to - from;
    let distance = from.euclidean_distance(to);
    if distance == 0.0 {
        return Position::origin();
    }
    Position::new(
        (delta.x as f64 / distance).round() as i32,
        (delta.y as f64 / distance).round() as i32,
    )
}

/// Coarse single-ray sight test.
///
/// Walks `round(distance + 1)` unit steps from `from` in the rounded
/// direction of `to` and fails on the first blocked tile. The ray may stop
/// short of or overshoot the target; corner cases are accepted as they fall.
pub fn line_of_sight(grid: &TileGrid, from: Position, to: Position) -> bool {
    let distance = from.euclidean_distance(to);
    let step = unit_step(from, to);
    let steps = (distance + 1.0).round() as i32;

    let mut current = from;
    for _ in 0..steps {
        if grid.is_blocked(current) {
            return false;
        }
        current = current + step;
    }
    true
}
