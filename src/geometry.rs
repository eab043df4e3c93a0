/// Pairwise overlap tests between bodies.
///
/// Both tests sample only the top-left reference point of a body rather
/// than intersecting full boxes. Entities are small relative to per-tick
/// displacement, so the approximation holds; it can miss overlaps for odd
/// aspect ratios and must not be replaced with a full AABB test, since
/// gameplay depends on its exact behaviour.

use crate::entities::Body;

/// True if `(px, py)` lies strictly inside `area`. Edges do not count.
pub fn point_inside(px: f64, py: f64, area: &Body) -> bool {
    (py > area.y && py < area.y + area.height) && (px > area.x && px < area.x + area.width)
}

/// Bidirectional point-in-rect: either reference point inside the other body.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    point_inside(a.x, a.y, b) || point_inside(b.x, b.y, a)
}

/// Unidirectional: `inner`'s reference point lies strictly inside `outer`.
pub fn submerged(outer: &Body, inner: &Body) -> bool {
    point_inside(inner.x, inner.y, outer)
}
