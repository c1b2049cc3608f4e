use crate::consts::GEOMETRY_EPSILON;
use crate::scene::Vertex;

/// Whether two simple rings share any point, boundary or interior.
///
/// Rings may be given closed (last vertex repeats the first) or open.
pub fn rings_intersect(a: &[Vertex], b: &[Vertex]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    for (a1, a2) in edges(a) {
        for (b1, b2) in edges(b) {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    // No crossing edges: either disjoint or one ring lies inside the other.
    point_in_ring(a[0], b) || point_in_ring(b[0], a)
}

fn edges(ring: &[Vertex]) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Even-odd containment test. Points on the boundary count as inside.
pub fn point_in_ring(p: Vertex, ring: &[Vertex]) -> bool {
    let mut inside = false;
    for (v1, v2) in edges(ring) {
        if orient(v1, v2, p).abs() < GEOMETRY_EPSILON && on_segment(v1, v2, p) {
            return true;
        }
        if (v1.1 > p.1) != (v2.1 > p.1) {
            let x_cross = v1.0 + (p.1 - v1.1) * (v2.0 - v1.0) / (v2.1 - v1.1);
            if p.0 < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

pub fn segments_intersect(a1: Vertex, a2: Vertex, b1: Vertex, b2: Vertex) -> bool {
    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);
    let eps = GEOMETRY_EPSILON;

    if o1.abs() < eps && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() < eps && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() < eps && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() < eps && on_segment(b1, b2, a2) {
        return true;
    }

    (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0)
}

fn orient(a: Vertex, b: Vertex, c: Vertex) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: Vertex, b: Vertex, p: Vertex) -> bool {
    let eps = GEOMETRY_EPSILON;
    p.0 >= a.0.min(b.0) - eps
        && p.0 <= a.0.max(b.0) + eps
        && p.1 >= a.1.min(b.1) - eps
        && p.1 <= a.1.max(b.1) + eps
}
