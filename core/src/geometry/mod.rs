//! Analytic geometry kernel
//!
//! Value types for points, lines and circles with fixed-precision rounded
//! comparison, and the pure construction/predicate operations evaluated by
//! the realization engine.

pub mod analytic;
pub mod rounded;

pub use analytic::{
    are_collinear, are_concurrent, are_concyclic, equal_distances, internal_angle_bisector,
    perpendicular_bisector, Circle, Line, Point,
};
pub use rounded::{Rounded, DEFAULT_PRECISION};
