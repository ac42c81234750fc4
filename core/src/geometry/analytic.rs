//! Analytic points, lines and circles
//!
//! Immutable value types whose equality and hashing go through rounded keys,
//! plus the construction and predicate operations evaluated by the
//! realization engine. Operations that can be geometrically undefined
//! (parallel intersection, circumcircle of collinear points) return `Option`
//! and never panic.

use super::rounded::Rounded;
use serde::{Deserialize, Serialize};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Rounded,
    pub y: Rounded,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Rounded::new(x),
            y: Rounded::new(y),
        }
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x.raw() - other.x.raw();
        let dy = self.y.raw() - other.y.raw();
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint of the segment to another point.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new(
            (self.x.raw() + other.x.raw()) / 2.0,
            (self.y.raw() + other.y.raw()) / 2.0,
        )
    }

    /// Reflection of this point through a center point.
    pub fn reflect_through(&self, center: &Point) -> Point {
        Point::new(
            2.0 * center.x.raw() - self.x.raw(),
            2.0 * center.y.raw() - self.y.raw(),
        )
    }
}

/// A line `a·x + b·y + c = 0` with unit normal `(a, b)`.
///
/// Coefficients are sign-canonicalized so that two lines through the same
/// points always compare equal: the normal points towards positive `a`,
/// breaking ties by positive `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    a: Rounded,
    b: Rounded,
    c: Rounded,
}

impl Line {
    /// Build a line from raw coefficients, normalizing and canonicalizing.
    ///
    /// Returns `None` when the normal vector rounds to zero.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Option<Line> {
        let norm = (a * a + b * b).sqrt();
        if Rounded::new(norm).is_zero() {
            return None;
        }
        let (mut a, mut b, mut c) = (a / norm, b / norm, c / norm);

        // Canonical sign: first nonzero of (a, b) positive, at rounding precision
        let flip = if !Rounded::new(a).is_zero() {
            a < 0.0
        } else {
            b < 0.0
        };
        if flip {
            a = -a;
            b = -b;
            c = -c;
        }

        Some(Line {
            a: Rounded::new(a),
            b: Rounded::new(b),
            c: Rounded::new(c),
        })
    }

    /// The line through two points; `None` when the points coincide.
    pub fn through(p: &Point, q: &Point) -> Option<Line> {
        let dx = q.x.raw() - p.x.raw();
        let dy = q.y.raw() - p.y.raw();
        // Normal (dy, -dx) is perpendicular to the direction (dx, dy)
        let a = dy;
        let b = -dx;
        let c = -(a * p.x.raw() + b * p.y.raw());
        Line::from_coefficients(a, b, c)
    }

    /// Signed distance from a point (normal is unit length).
    fn signed_distance(&self, p: &Point) -> f64 {
        self.a.raw() * p.x.raw() + self.b.raw() * p.y.raw() + self.c.raw()
    }

    /// Whether the point lies on the line, at rounding precision.
    pub fn contains(&self, p: &Point) -> bool {
        Rounded::new(self.signed_distance(p)).is_zero()
    }

    /// Intersection point of two lines; `None` when they are parallel
    /// (including coincident).
    pub fn intersection(&self, other: &Line) -> Option<Point> {
        let det = self.a.raw() * other.b.raw() - other.a.raw() * self.b.raw();
        if Rounded::new(det).is_zero() {
            return None;
        }
        let x = (self.b.raw() * other.c.raw() - other.b.raw() * self.c.raw()) / det;
        let y = (other.a.raw() * self.c.raw() - self.a.raw() * other.c.raw()) / det;
        Some(Point::new(x, y))
    }

    /// Whether two lines are parallel (coincident lines count as parallel).
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        let cross = self.a.raw() * other.b.raw() - other.a.raw() * self.b.raw();
        Rounded::new(cross).is_zero()
    }

    /// Whether two lines are perpendicular.
    pub fn is_perpendicular_to(&self, other: &Line) -> bool {
        let dot = self.a.raw() * other.a.raw() + self.b.raw() * other.b.raw();
        Rounded::new(dot).is_zero()
    }

    /// The line through `p` perpendicular to this one.
    pub fn perpendicular_through(&self, p: &Point) -> Line {
        // Normal of the perpendicular is the direction of this line
        let a = self.b.raw();
        let b = -self.a.raw();
        let c = -(a * p.x.raw() + b * p.y.raw());
        // The normal is unit length by construction, so this cannot fail
        Line::from_coefficients(a, b, c).expect("unit direction")
    }

    /// The line through `p` parallel to this one.
    pub fn parallel_through(&self, p: &Point) -> Line {
        let c = -(self.a.raw() * p.x.raw() + self.b.raw() * p.y.raw());
        Line::from_coefficients(self.a.raw(), self.b.raw(), c).expect("unit normal")
    }

    /// Perpendicular projection of a point onto the line.
    pub fn project(&self, p: &Point) -> Point {
        let d = self.signed_distance(p);
        Point::new(p.x.raw() - d * self.a.raw(), p.y.raw() - d * self.b.raw())
    }

    /// Reflection of a point in the line.
    pub fn reflect(&self, p: &Point) -> Point {
        let d = self.signed_distance(p);
        Point::new(
            p.x.raw() - 2.0 * d * self.a.raw(),
            p.y.raw() - 2.0 * d * self.b.raw(),
        )
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: Rounded,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: Rounded::new(radius),
        }
    }

    /// The circle centered at `center` passing through `p`; `None` when the
    /// two points coincide (zero radius).
    pub fn from_center_and_point(center: &Point, p: &Point) -> Option<Circle> {
        let radius = center.distance(p);
        if Rounded::new(radius).is_zero() {
            return None;
        }
        Some(Circle::new(*center, radius))
    }

    /// The circumcircle of three points; `None` when they are collinear.
    pub fn circumcircle(p: &Point, q: &Point, r: &Point) -> Option<Circle> {
        let bisector_pq = perpendicular_bisector(p, q)?;
        let bisector_pr = perpendicular_bisector(p, r)?;
        let center = bisector_pq.intersection(&bisector_pr)?;
        Circle::from_center_and_point(&center, p)
    }

    /// Whether the point lies on the circle, at rounding precision.
    pub fn contains(&self, p: &Point) -> bool {
        Rounded::new(self.center.distance(p) - self.radius.raw()).is_zero()
    }

    /// Whether the line touches the circle in exactly one point.
    pub fn is_tangent_to_line(&self, line: &Line) -> bool {
        let foot = line.project(&self.center);
        Rounded::new(self.center.distance(&foot) - self.radius.raw()).is_zero()
    }

    /// Whether two distinct circles touch in exactly one point, internally
    /// or externally.
    pub fn is_tangent_to_circle(&self, other: &Circle) -> bool {
        if self == other {
            return false;
        }
        let d = self.center.distance(&other.center);
        let sum = self.radius.raw() + other.radius.raw();
        let diff = (self.radius.raw() - other.radius.raw()).abs();
        Rounded::new(d - sum).is_zero() || Rounded::new(d - diff).is_zero()
    }

    /// Given a point known to lie on both the circle and the line, the other
    /// intersection point. Coincides with `known` when the line is tangent.
    pub fn second_intersection_with_line(&self, line: &Line, known: &Point) -> Point {
        let foot = line.project(&self.center);
        known.reflect_through(&foot)
    }

    /// Given a point known to lie on both circles, the other intersection
    /// point. `None` when the circles are concentric. Coincides with `known`
    /// when the circles are tangent.
    pub fn second_intersection_with_circle(&self, other: &Circle, known: &Point) -> Option<Point> {
        // Both intersections are symmetric about the line of centers
        let center_line = Line::through(&self.center, &other.center)?;
        Some(center_line.reflect(known))
    }
}

/// The perpendicular bisector of two points; `None` when they coincide.
pub fn perpendicular_bisector(p: &Point, q: &Point) -> Option<Line> {
    let through = Line::through(p, q)?;
    Some(through.perpendicular_through(&p.midpoint(q)))
}

/// The internal bisector of the angle at `vertex` towards `p` and `q`.
///
/// `None` when either ray is degenerate or the angle is straight.
pub fn internal_angle_bisector(vertex: &Point, p: &Point, q: &Point) -> Option<Line> {
    let dp = vertex.distance(p);
    let dq = vertex.distance(q);
    if Rounded::new(dp).is_zero() || Rounded::new(dq).is_zero() {
        return None;
    }
    let ux = (p.x.raw() - vertex.x.raw()) / dp + (q.x.raw() - vertex.x.raw()) / dq;
    let uy = (p.y.raw() - vertex.y.raw()) / dp + (q.y.raw() - vertex.y.raw()) / dq;
    let target = Point::new(vertex.x.raw() + ux, vertex.y.raw() + uy);
    Line::through(vertex, &target)
}

/// Whether three points are collinear, at rounding precision.
pub fn are_collinear(p: &Point, q: &Point, r: &Point) -> bool {
    let cross = (q.x.raw() - p.x.raw()) * (r.y.raw() - p.y.raw())
        - (q.y.raw() - p.y.raw()) * (r.x.raw() - p.x.raw());
    Rounded::new(cross).is_zero()
}

/// Whether four points lie on a common circle.
pub fn are_concyclic(p: &Point, q: &Point, r: &Point, s: &Point) -> bool {
    match Circle::circumcircle(p, q, r) {
        Some(circle) => circle.contains(s),
        None => false,
    }
}

/// Whether three pairwise non-parallel lines pass through a common point.
pub fn are_concurrent(l1: &Line, l2: &Line, l3: &Line) -> bool {
    match l1.intersection(l2) {
        Some(x) => l3.contains(&x),
        None => false,
    }
}

/// Whether two segments have equal length, at rounding precision.
pub fn equal_distances(a: (&Point, &Point), b: (&Point, &Point)) -> bool {
    Rounded::new(a.0.distance(a.1)) == Rounded::new(b.0.distance(b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_identity_across_defining_points() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(2.0, 2.0);
        let r = Point::new(5.0, 5.0);

        let pq = Line::through(&p, &q).unwrap();
        let qr = Line::through(&q, &r).unwrap();
        let rp = Line::through(&r, &p).unwrap();

        assert_eq!(pq, qr, "Same line from different point pairs");
        assert_eq!(qr, rp);
    }

    #[test]
    fn test_line_through_coincident_points() {
        let p = Point::new(1.0, 1.0);
        assert!(Line::through(&p, &p).is_none());
    }

    #[test]
    fn test_parallel_lines_do_not_intersect() {
        let l1 = Line::through(&Point::new(0.0, 0.0), &Point::new(1.0, 1.0)).unwrap();
        let l2 = Line::through(&Point::new(0.0, 1.0), &Point::new(1.0, 2.0)).unwrap();

        assert!(l1.is_parallel_to(&l2));
        assert!(l1.intersection(&l2).is_none());
    }

    #[test]
    fn test_intersection() {
        let l1 = Line::through(&Point::new(0.0, 0.0), &Point::new(2.0, 2.0)).unwrap();
        let l2 = Line::through(&Point::new(0.0, 2.0), &Point::new(2.0, 0.0)).unwrap();

        let x = l1.intersection(&l2).unwrap();
        assert_eq!(x, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_perpendicular_and_parallel_through() {
        let l = Line::through(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0)).unwrap();
        let p = Point::new(3.0, 4.0);

        let perp = l.perpendicular_through(&p);
        let par = l.parallel_through(&p);

        assert!(perp.contains(&p));
        assert!(par.contains(&p));
        assert!(perp.is_perpendicular_to(&l));
        assert!(par.is_parallel_to(&l));
    }

    #[test]
    fn test_projection_and_reflection() {
        let l = Line::through(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0)).unwrap();
        let p = Point::new(2.0, 3.0);

        assert_eq!(l.project(&p), Point::new(2.0, 0.0));
        assert_eq!(l.reflect(&p), Point::new(2.0, -3.0));
    }

    #[test]
    fn test_circumcircle() {
        let p = Point::new(1.0, 0.0);
        let q = Point::new(-1.0, 0.0);
        let r = Point::new(0.0, 1.0);

        let circle = Circle::circumcircle(&p, &q, &r).unwrap();
        assert_eq!(circle.center, Point::new(0.0, 0.0));
        assert_eq!(circle.radius, Rounded::new(1.0));
        assert!(circle.contains(&Point::new(0.0, -1.0)));
    }

    #[test]
    fn test_circumcircle_of_collinear_points() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(1.0, 1.0);
        let r = Point::new(2.0, 2.0);

        assert!(Circle::circumcircle(&p, &q, &r).is_none());
    }

    #[test]
    fn test_tangency() {
        let circle = Circle::new(Point::new(0.0, 0.0), 1.0);
        let tangent = Line::through(&Point::new(-1.0, 1.0), &Point::new(1.0, 1.0)).unwrap();
        let secant = Line::through(&Point::new(-1.0, 0.0), &Point::new(1.0, 0.0)).unwrap();

        assert!(circle.is_tangent_to_line(&tangent));
        assert!(!circle.is_tangent_to_line(&secant));
    }

    #[test]
    fn test_circle_circle_tangency() {
        let c1 = Circle::new(Point::new(0.0, 0.0), 1.0);
        let external = Circle::new(Point::new(3.0, 0.0), 2.0);
        let internal = Circle::new(Point::new(0.5, 0.0), 0.5);
        let apart = Circle::new(Point::new(10.0, 0.0), 1.0);

        assert!(c1.is_tangent_to_circle(&external));
        assert!(c1.is_tangent_to_circle(&internal));
        assert!(!c1.is_tangent_to_circle(&apart));
        assert!(!c1.is_tangent_to_circle(&c1), "A circle is not tangent to itself");
    }

    #[test]
    fn test_second_intersection_with_line() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let known = Point::new(3.0, 4.0);
        let line = Line::through(&known, &Point::new(3.0, 0.0)).unwrap();

        let second = circle.second_intersection_with_line(&line, &known);
        assert_eq!(second, Point::new(3.0, -4.0));
    }

    #[test]
    fn test_second_intersection_with_circle() {
        let c1 = Circle::new(Point::new(0.0, 0.0), 1.0);
        let c2 = Circle::new(Point::new(1.0, 0.0), 1.0);
        let known = Point::new(0.5, (0.75f64).sqrt());

        let second = c1.second_intersection_with_circle(&c2, &known).unwrap();
        assert_eq!(second, Point::new(0.5, -(0.75f64).sqrt()));
    }

    #[test]
    fn test_angle_bisector() {
        let vertex = Point::new(0.0, 0.0);
        let p = Point::new(1.0, 0.0);
        let q = Point::new(0.0, 1.0);

        let bisector = internal_angle_bisector(&vertex, &p, &q).unwrap();
        assert!(bisector.contains(&vertex));
        assert!(bisector.contains(&Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_angle_bisector_degenerate() {
        let vertex = Point::new(0.0, 0.0);
        assert!(internal_angle_bisector(&vertex, &vertex, &Point::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_collinearity_predicates() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(1.0, 1.0);

        assert!(are_collinear(&p, &q, &Point::new(2.0, 2.0)));
        assert!(!are_collinear(&p, &q, &Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_concyclic() {
        let p = Point::new(1.0, 0.0);
        let q = Point::new(0.0, 1.0);
        let r = Point::new(-1.0, 0.0);

        assert!(are_concyclic(&p, &q, &r, &Point::new(0.0, -1.0)));
        assert!(!are_concyclic(&p, &q, &r, &Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_concurrency() {
        let l1 = Line::through(&Point::new(0.0, 0.0), &Point::new(1.0, 1.0)).unwrap();
        let l2 = Line::through(&Point::new(2.0, 0.0), &Point::new(0.0, 2.0)).unwrap();
        let l3 = Line::through(&Point::new(1.0, 1.0), &Point::new(1.0, 5.0)).unwrap();

        assert!(are_concurrent(&l1, &l2, &l3), "All pass through (1, 1)");
    }

    #[test]
    fn test_equal_distances() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        let c = Point::new(5.0, 0.0);

        assert!(equal_distances((&a, &b), (&a, &c)));
        assert!(!equal_distances((&a, &b), (&b, &c)));
    }

    #[test]
    fn test_midpoint_and_reflection() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 2.0);

        assert_eq!(a.midpoint(&b), Point::new(2.0, 1.0));
        assert_eq!(a.reflect_through(&b), Point::new(8.0, 4.0));
    }
}
