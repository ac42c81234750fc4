//! The theorem candidate finder
//!
//! Enumerates structurally plausible relationships from the contextual
//! index and keeps the ones that hold numerically in every picture.
//! Collinearity and concyclicity need no re-verification: line and circle
//! memberships are already cross-picture consistent by construction of the
//! index. A candidate failing in some picture is simply not a theorem; it
//! is never an inconsistency.

use super::{IncidenceTarget, Segment, Theorem, TheoremStore};
use crate::contextual::{CircleRef, ContextualPicture, LineRef, ObjectFilter, PointRef};
use crate::geometry::Rounded;
use crate::ir::Configuration;

/// Which candidates to consider: everything, or only relationships that
/// involve at least one object introduced by the latest extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoremScope {
    All,
    NewOnly,
}

impl TheoremScope {
    fn admits(&self, any_new: bool) -> bool {
        match self {
            TheoremScope::All => true,
            TheoremScope::NewOnly => any_new,
        }
    }
}

/// Find every theorem of the configuration that holds in all pictures.
pub fn find_theorems(
    cp: &ContextualPicture,
    config: &Configuration,
    scope: TheoremScope,
) -> TheoremStore {
    let mut store = TheoremStore::new();
    find_collinear(cp, scope, &mut store);
    find_concyclic(cp, scope, &mut store);
    find_concurrent(cp, scope, &mut store);
    find_parallel(cp, scope, &mut store);
    find_perpendicular(cp, scope, &mut store);
    find_tangent_circles(cp, scope, &mut store);
    find_line_tangencies(cp, scope, &mut store);
    find_equal_segments(cp, scope, &mut store);
    find_incidences(cp, config, scope, &mut store);
    store
}

fn holds_everywhere(cp: &ContextualPicture, predicate: impl Fn(usize) -> bool) -> bool {
    (0..cp.picture_count()).all(predicate)
}

/// Number of tracked points two sorted membership lists share.
fn shared_points(a: &[PointRef], b: &[PointRef]) -> usize {
    a.iter().filter(|p| b.binary_search(p).is_ok()).count()
}

fn find_collinear(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    for line in cp.lines(ObjectFilter::All) {
        let points = &cp.line(line).points;
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                for k in j + 1..points.len() {
                    let triple = [points[i], points[j], points[k]];
                    let any_new = triple.iter().any(|p| cp.point(*p).is_new);
                    if scope.admits(any_new) {
                        store.insert(Theorem::CollinearPoints(triple[0], triple[1], triple[2]));
                    }
                }
            }
        }
    }
}

fn find_concyclic(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    for circle in cp.circles(ObjectFilter::All) {
        let points = &cp.circle(circle).points;
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                for k in j + 1..points.len() {
                    for l in k + 1..points.len() {
                        let quad = [points[i], points[j], points[k], points[l]];
                        let any_new = quad.iter().any(|p| cp.point(*p).is_new);
                        if scope.admits(any_new) {
                            store.insert(Theorem::ConcyclicPoints(
                                quad[0], quad[1], quad[2], quad[3],
                            ));
                        }
                    }
                }
            }
        }
    }
}

fn find_concurrent(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let lines: Vec<LineRef> = cp.lines(ObjectFilter::All).collect();
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            for k in j + 1..lines.len() {
                let triple = [lines[i], lines[j], lines[k]];
                let any_new = triple.iter().any(|l| cp.line(*l).is_new);
                if !scope.admits(any_new) {
                    continue;
                }
                // A tracked point on all three lines makes the concurrency
                // trivial incidence, not a theorem
                let common_tracked = cp.line(triple[0]).points.iter().any(|p| {
                    cp.line(triple[1]).points.binary_search(p).is_ok()
                        && cp.line(triple[2]).points.binary_search(p).is_ok()
                });
                if common_tracked {
                    continue;
                }
                let concurrent = holds_everywhere(cp, |picture| {
                    match cp
                        .line_value(triple[0], picture)
                        .intersection(cp.line_value(triple[1], picture))
                    {
                        Some(meet) => cp.line_value(triple[2], picture).contains(&meet),
                        None => false,
                    }
                });
                if concurrent {
                    store.insert(Theorem::ConcurrentLines(triple[0], triple[1], triple[2]));
                }
            }
        }
    }
}

fn find_parallel(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let lines: Vec<LineRef> = cp.lines(ObjectFilter::All).collect();
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            let (a, b) = (lines[i], lines[j]);
            let any_new = cp.line(a).is_new || cp.line(b).is_new;
            if !scope.admits(any_new) {
                continue;
            }
            // Lines sharing a tracked point intersect there
            if shared_points(&cp.line(a).points, &cp.line(b).points) > 0 {
                continue;
            }
            let parallel = holds_everywhere(cp, |picture| {
                cp.line_value(a, picture).is_parallel_to(cp.line_value(b, picture))
            });
            if parallel {
                store.insert(Theorem::ParallelLines(a, b));
            }
        }
    }
}

fn find_perpendicular(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let lines: Vec<LineRef> = cp.lines(ObjectFilter::All).collect();
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            let (a, b) = (lines[i], lines[j]);
            let any_new = cp.line(a).is_new || cp.line(b).is_new;
            if !scope.admits(any_new) {
                continue;
            }
            let perpendicular = holds_everywhere(cp, |picture| {
                cp.line_value(a, picture).is_perpendicular_to(cp.line_value(b, picture))
            });
            if perpendicular {
                store.insert(Theorem::PerpendicularLines(a, b));
            }
        }
    }
}

fn find_tangent_circles(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let circles: Vec<CircleRef> = cp.circles(ObjectFilter::All).collect();
    for i in 0..circles.len() {
        for j in i + 1..circles.len() {
            let (a, b) = (circles[i], circles[j]);
            let any_new = cp.circle(a).is_new || cp.circle(b).is_new;
            if !scope.admits(any_new) {
                continue;
            }
            // Two shared tracked points make the circles secant
            if shared_points(&cp.circle(a).points, &cp.circle(b).points) >= 2 {
                continue;
            }
            let tangent = holds_everywhere(cp, |picture| {
                cp.circle_value(a, picture).is_tangent_to_circle(cp.circle_value(b, picture))
            });
            if tangent {
                store.insert(Theorem::TangentCircles(a, b));
            }
        }
    }
}

fn find_line_tangencies(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let lines: Vec<LineRef> = cp.lines(ObjectFilter::All).collect();
    let circles: Vec<CircleRef> = cp.circles(ObjectFilter::All).collect();
    for line in &lines {
        for circle in &circles {
            let any_new = cp.line(*line).is_new || cp.circle(*circle).is_new;
            if !scope.admits(any_new) {
                continue;
            }
            if shared_points(&cp.line(*line).points, &cp.circle(*circle).points) >= 2 {
                continue;
            }
            let tangent = holds_everywhere(cp, |picture| {
                cp.circle_value(*circle, picture).is_tangent_to_line(cp.line_value(*line, picture))
            });
            if tangent {
                store.insert(Theorem::LineTangentToCircle(*line, *circle));
            }
        }
    }
}

fn find_equal_segments(cp: &ContextualPicture, scope: TheoremScope, store: &mut TheoremStore) {
    let points: Vec<PointRef> = cp.points(ObjectFilter::All).collect();
    let mut segments = Vec::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            segments.push(Segment::new(points[i], points[j]));
        }
    }

    // Per-picture lengths, rounded once
    let lengths: Vec<Vec<Rounded>> = segments
        .iter()
        .map(|segment| {
            (0..cp.picture_count())
                .map(|picture| {
                    Rounded::new(
                        cp.point_value(segment.a, picture)
                            .distance(cp.point_value(segment.b, picture)),
                    )
                })
                .collect()
        })
        .collect();

    for i in 0..segments.len() {
        for j in i + 1..segments.len() {
            let endpoints = [segments[i].a, segments[i].b, segments[j].a, segments[j].b];
            let any_new = endpoints.iter().any(|p| cp.point(*p).is_new);
            if !scope.admits(any_new) {
                continue;
            }
            if lengths[i] == lengths[j] {
                store.insert(Theorem::EqualLineSegments(segments[i], segments[j]));
            }
        }
    }
}

fn find_incidences(
    cp: &ContextualPicture,
    config: &Configuration,
    scope: TheoremScope,
    store: &mut TheoremStore,
) {
    for line in cp.lines(ObjectFilter::All) {
        let Some(id) = cp.line(line).config_object else {
            continue;
        };
        let args = config.constructed_at(id).map(|object| object.args.as_slice());
        for point in &cp.line(line).points {
            let point_id = cp.point(*point).config_object;
            // The defining arguments of the line lie on it by construction
            if args.is_some_and(|args| args.contains(&point_id)) {
                continue;
            }
            let any_new = cp.point(*point).is_new || cp.line(line).is_new;
            if scope.admits(any_new) {
                store.insert(Theorem::Incidence(*point, IncidenceTarget::Line(line)));
            }
        }
    }

    for circle in cp.circles(ObjectFilter::All) {
        let Some(id) = cp.circle(circle).config_object else {
            continue;
        };
        let args = config.constructed_at(id).map(|object| object.args.as_slice());
        for point in &cp.circle(circle).points {
            let point_id = cp.point(*point).config_object;
            if args.is_some_and(|args| args.contains(&point_id)) {
                continue;
            }
            let any_new = cp.point(*point).is_new || cp.circle(circle).is_new;
            if scope.admits(any_new) {
                store.insert(Theorem::Incidence(*point, IncidenceTarget::Circle(circle)));
            }
        }
    }
}
