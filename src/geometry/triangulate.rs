//! Ear-clipping triangulation for polygons with holes.
//!
//! Holes are stitched into the outline with a zero-width bridge to a visible
//! outline vertex, then the resulting single ring is clipped ear by ear.
//! Returned indices address the concatenation `outline ++ holes[0] ++ ...`.

use glam::Vec2;

use super::shape::signed_area;

const EPSILON: f32 = 1e-9;

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    a.distance_squared(b) < 1e-12
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Proper intersection of `p1p2` and `q1q2`, ignoring touching end points.
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    if same_point(p1, q1) || same_point(p1, q2) || same_point(p2, q1) || same_point(p2, q2) {
        return false;
    }
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Whether `p` lies in the interior wedge at `v` of a counter-clockwise ring.
fn locally_inside(prev: Vec2, v: Vec2, next: Vec2, p: Vec2) -> bool {
    if cross(prev, v, next) >= 0.0 {
        cross(prev, v, p) >= 0.0 && cross(v, next, p) >= 0.0
    } else {
        cross(prev, v, p) >= 0.0 || cross(v, next, p) >= 0.0
    }
}

fn ring_edges_cross(pts: &[Vec2], ring: &[usize], a: Vec2, b: Vec2) -> bool {
    let n = ring.len();
    (0..n).any(|i| segments_cross(a, b, pts[ring[i]], pts[ring[(i + 1) % n]]))
}

/// Splices `hole` into `ring` through the closest visible ring vertex.
fn bridge_hole(pts: &[Vec2], ring: &mut Vec<usize>, hole: &[usize], pending: &[Vec<usize>]) {
    let Some((m_pos, &m)) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| pts[*a.1].x.total_cmp(&pts[*b.1].x))
    else {
        return;
    };
    let mp = pts[m];

    let n = ring.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        pts[ring[a]]
            .distance_squared(mp)
            .total_cmp(&pts[ring[b]].distance_squared(mp))
    });

    let visible = order.iter().copied().find(|&k| {
        let v = pts[ring[k]];
        let prev = pts[ring[(k + n - 1) % n]];
        let next = pts[ring[(k + 1) % n]];
        locally_inside(prev, v, next, mp)
            && !ring_edges_cross(pts, ring, mp, v)
            && !ring_edges_cross(pts, hole, mp, v)
            && !pending.iter().any(|h| ring_edges_cross(pts, h, mp, v))
    });
    // Nothing visible means the input self-intersects; bridge to the nearest
    // vertex and let the ear clipper cope.
    let k = visible.unwrap_or(order[0]);

    let mut spliced = Vec::with_capacity(n + hole.len() + 2);
    spliced.extend_from_slice(&ring[..=k]);
    spliced.extend(hole[m_pos..].iter().chain(&hole[..m_pos]).copied());
    spliced.push(m);
    spliced.push(ring[k]);
    spliced.extend_from_slice(&ring[k + 1..]);
    *ring = spliced;
}

fn is_ear(pts: &[Vec2], ring: &[usize], i: usize) -> bool {
    let n = ring.len();
    let a = pts[ring[(i + n - 1) % n]];
    let b = pts[ring[i]];
    let c = pts[ring[(i + 1) % n]];
    if cross(a, b, c) <= EPSILON {
        return false;
    }
    ring.iter().all(|&idx| {
        let p = pts[idx];
        same_point(p, a) || same_point(p, b) || same_point(p, c) || !point_in_triangle(p, a, b, c)
    })
}

pub fn triangulate(outline: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<[usize; 3]> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let mut pts: Vec<Vec2> = outline.to_vec();
    let mut ring: Vec<usize> = (0..outline.len()).collect();
    if signed_area(outline) < 0.0 {
        ring.reverse();
    }

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes {
        let base = pts.len();
        pts.extend_from_slice(hole);
        if hole.len() < 3 {
            continue;
        }
        let mut idx: Vec<usize> = (base..base + hole.len()).collect();
        if signed_area(hole) > 0.0 {
            idx.reverse();
        }
        hole_rings.push(idx);
    }
    // Rightmost holes first so later bridges see earlier ones as part of the ring.
    hole_rings.sort_by(|a, b| {
        let ax = a.iter().map(|&i| pts[i].x).fold(f32::MIN, f32::max);
        let bx = b.iter().map(|&i| pts[i].x).fold(f32::MIN, f32::max);
        bx.total_cmp(&ax)
    });
    for h in 0..hole_rings.len() {
        let (done, pending) = hole_rings.split_at(h + 1);
        bridge_hole(&pts, &mut ring, &done[h], pending);
    }

    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut i = 0;
    let mut misses = 0;
    while ring.len() > 3 {
        let n = ring.len();
        i %= n;
        let a = pts[ring[(i + n - 1) % n]];
        let b = pts[ring[i]];
        let c = pts[ring[(i + 1) % n]];
        let area = cross(a, b, c);
        if area.abs() <= EPSILON && (same_point(a, b) || same_point(b, c) || (b - a).dot(c - b) > 0.0) {
            // Repeated or straight-through vertex.
            ring.remove(i);
            misses = 0;
        } else if is_ear(&pts, &ring, i) || misses > n {
            triangles.push([ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]]);
            ring.remove(i);
            misses = 0;
        } else {
            i += 1;
            misses += 1;
        }
    }
    if ring.len() == 3 && cross(pts[ring[0]], pts[ring[1]], pts[ring[2]]).abs() > EPSILON {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(pts: &[Vec2], tris: &[[usize; 3]]) -> f32 {
        tris.iter()
            .map(|t| cross(pts[t[0]], pts[t[1]], pts[t[2]]).abs() * 0.5)
            .sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let sq = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let tris = triangulate(&sq, &[]);
        assert_eq!(tris.len(), 2);
        assert!((area_of(&sq, &tris) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn clockwise_concave_outline_keeps_area() {
        // An L shape, wound clockwise.
        let mut l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        l.reverse();
        let tris = triangulate(&l, &[]);
        assert_eq!(tris.len(), 4);
        assert!((area_of(&l, &tris) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn hole_area_is_excluded() {
        let outer = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ];
        let hole = vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 3.0),
        ];
        let tris = triangulate(&outer, &[hole.clone()]);
        let mut all = outer.clone();
        all.extend(hole);
        assert!((area_of(&all, &tris) - 12.0).abs() < 1e-4);
        assert!(tris.iter().flatten().all(|&i| i < all.len()));
    }
}
