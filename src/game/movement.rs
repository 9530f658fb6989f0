use super::types::{Direction, Position, WorldMap};

/// Applies one unit step in `direction`.
///
/// A step that would leave the world is rejected whole: the current position
/// is returned unchanged and nothing is reported to the client. Positions are
/// never clamped to the edge.
pub fn step(current: Position, direction: Direction, world: &WorldMap) -> Position {
    let (dx, dy) = direction.delta();
    let candidate = match (current.x.checked_add(dx), current.y.checked_add(dy)) {
        (Some(x), Some(y)) => Position::new(x, y),
        _ => return current,
    };
    if world.contains(candidate) {
        candidate
    } else {
        current
    }
}
