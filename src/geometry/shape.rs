//! 2D outlines built from line and bezier segments.

use glam::Vec2;

const POINT_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug)]
enum Segment {
    Line(Vec2),
    Quadratic { control: Vec2, to: Vec2 },
    Cubic { c1: Vec2, c2: Vec2, to: Vec2 },
}

#[derive(Clone, Debug)]
struct SubPath {
    start: Vec2,
    segments: Vec<Segment>,
}

/// Pen-style path recorder. Each `move_to` starts a new sub-path.
#[derive(Clone, Debug, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

/// A filled region: one outline plus zero or more holes, already sampled to points.
#[derive(Clone, Debug, Default)]
pub struct Shape {
    pub outline: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.subpaths.push(SubPath {
            start: Vec2::new(x, y),
            segments: Vec::new(),
        });
        self
    }

    fn current(&mut self) -> &mut SubPath {
        if self.subpaths.is_empty() {
            self.move_to(0.0, 0.0);
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.current().segments.push(Segment::Line(Vec2::new(x, y)));
        self
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.current().segments.push(Segment::Quadratic {
            control: Vec2::new(cx, cy),
            to: Vec2::new(x, y),
        });
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.current().segments.push(Segment::Cubic {
            c1: Vec2::new(c1x, c1y),
            c2: Vec2::new(c2x, c2y),
            to: Vec2::new(x, y),
        });
        self
    }

    /// Samples every sub-path into a closed polyline. Curves contribute
    /// `divisions` points each, lines only their end point.
    pub fn extract_points(&self, divisions: u32) -> Vec<Vec<Vec2>> {
        self.subpaths
            .iter()
            .map(|sub| sample_subpath(sub, divisions.max(1)))
            .collect()
    }

    /// Treats the first sub-path as the outline and the rest as holes.
    pub fn to_shape(&self, divisions: u32) -> Shape {
        let mut rings = self.extract_points(divisions).into_iter();
        Shape {
            outline: rings.next().unwrap_or_default(),
            holes: rings.collect(),
        }
    }
}

fn push_point(points: &mut Vec<Vec2>, p: Vec2) {
    if points
        .last()
        .map_or(true, |last| last.distance_squared(p) > POINT_EPSILON * POINT_EPSILON)
    {
        points.push(p);
    }
}

fn sample_subpath(sub: &SubPath, divisions: u32) -> Vec<Vec2> {
    let mut points = vec![sub.start];
    let mut from = sub.start;
    for segment in &sub.segments {
        match *segment {
            Segment::Line(to) => {
                push_point(&mut points, to);
                from = to;
            }
            Segment::Quadratic { control, to } => {
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    push_point(&mut points, quadratic(from, control, to, t));
                }
                from = to;
            }
            Segment::Cubic { c1, c2, to } => {
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    push_point(&mut points, cubic(from, c1, c2, to, t));
                }
                from = to;
            }
        }
    }
    if points.len() > 1 && points[0].distance_squared(points[points.len() - 1]) <= POINT_EPSILON {
        points.pop();
    }
    points
}

fn quadratic(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k) + p1 * (2.0 * k * t) + p2 * (t * t)
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k * k) + p1 * (3.0 * k * k * t) + p2 * (3.0 * k * t * t) + p3 * (t * t * t)
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

pub fn is_clockwise(points: &[Vec2]) -> bool {
    signed_area(points) < 0.0
}

/// Even-odd point in polygon test.
pub fn contains_point(polygon: &[Vec2], p: Vec2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Groups sampled rings into shapes. A ring nested inside an odd number of
/// other rings is a hole of the smallest solid ring containing it.
pub fn shapes_from_rings(rings: Vec<Vec<Vec2>>) -> Vec<Shape> {
    let rings: Vec<Vec<Vec2>> = rings.into_iter().filter(|r| r.len() >= 3).collect();
    let containers: Vec<Vec<usize>> = rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            (0..rings.len())
                .filter(|&j| j != i && contains_point(&rings[j], ring[0]))
                .collect()
        })
        .collect();

    let mut shapes: Vec<Shape> = Vec::new();
    let mut shape_of_ring = vec![None; rings.len()];
    for (i, ring) in rings.iter().enumerate() {
        if containers[i].len() % 2 == 0 {
            shape_of_ring[i] = Some(shapes.len());
            shapes.push(Shape {
                outline: ring.clone(),
                holes: Vec::new(),
            });
        }
    }
    for (i, ring) in rings.iter().enumerate() {
        if containers[i].len() % 2 == 0 {
            continue;
        }
        let owner = containers[i]
            .iter()
            .filter(|&&j| containers[j].len() % 2 == 0)
            .min_by(|&&a, &&b| {
                signed_area(&rings[a])
                    .abs()
                    .total_cmp(&signed_area(&rings[b]).abs())
            })
            .and_then(|&j| shape_of_ring[j]);
        if let Some(shape) = owner {
            shapes[shape].holes.push(ring.clone());
        }
    }
    shapes
}

impl Path {
    /// Samples all sub-paths and groups them into shapes by nesting.
    pub fn to_shapes(&self, divisions: u32) -> Vec<Shape> {
        shapes_from_rings(self.extract_points(divisions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(path: &mut Path, x0: f32, y0: f32, size: f32) {
        path.move_to(x0, y0)
            .line_to(x0 + size, y0)
            .line_to(x0 + size, y0 + size)
            .line_to(x0, y0 + size)
            .line_to(x0, y0);
    }

    #[test]
    fn closing_point_is_dropped() {
        let mut path = Path::new();
        square(&mut path, 0.0, 0.0, 1.0);
        let rings = path.extract_points(4);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn curves_sample_divisions_points() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0)
            .bezier_curve_to(0.0, 1.0, 1.0, 1.0, 1.0, 0.0);
        let rings = path.extract_points(12);
        assert_eq!(rings[0].len(), 13);
    }

    #[test]
    fn nested_ring_becomes_hole() {
        let mut path = Path::new();
        square(&mut path, 0.0, 0.0, 4.0);
        square(&mut path, 1.0, 1.0, 2.0);
        square(&mut path, 10.0, 0.0, 1.0);
        let shapes = path.to_shapes(4);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].holes.len(), 1);
        assert!(shapes[1].holes.is_empty());
    }

    #[test]
    fn area_sign_follows_winding() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-6);
        let mut cw = ccw.to_vec();
        cw.reverse();
        assert!(is_clockwise(&cw));
    }
}
