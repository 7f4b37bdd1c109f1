//! Segment intersection kernel
//!
//! Pure functions over points and segments. Comparisons are exact: a zero
//! determinant means "parallel", and the parametric bounds are tested on the
//! closed interval `[0, 1]` without an epsilon. Nearly-parallel segments and
//! touches that land a rounding error outside a segment's end are therefore
//! reported as misses.

use super::types::{in_range, lerp, Intersection, Point, Polygon, Segment};

/// Intersect segment `ab` with segment `cd`
///
/// Returns the crossing point with `offset` measured along `ab`, or `None`
/// when the segments are parallel (collinear overlap included) or the
/// crossing lies outside either segment.
pub fn get_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Intersection> {
    let t_top = (d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x);
    let u_top = (c.y - a.y) * (a.x - b.x) - (c.x - a.x) * (a.y - b.y);
    let bottom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;

    if in_range(0.0, 1.0, t) && in_range(0.0, 1.0, u) {
        Some(Intersection {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            offset: t,
        })
    } else {
        None
    }
}

/// [`get_intersection`] over two [`Segment`]s
pub fn segment_intersection(first: &Segment, second: &Segment) -> Option<Intersection> {
    get_intersection(first.start, first.end, second.start, second.end)
}

/// True if any edge of `a` crosses any edge of `b`
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    a.edges()
        .any(|edge| b.edges().any(|other| segment_intersection(&edge, &other).is_some()))
}

/// True if any edge of `polygon` crosses `segment`
pub fn polygon_touches_segment(polygon: &Polygon, segment: &Segment) -> bool {
    polygon
        .edges()
        .any(|edge| segment_intersection(&edge, segment).is_some())
}
