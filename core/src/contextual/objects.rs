//! Identity-tracked geometric objects
//!
//! A geometric point is one per symbolic object. A geometric line or circle
//! is identified by the set of points lying on it in every picture; objects
//! with equal analytic values across all pictures merge into one, whether
//! they came from a symbolic object or arose implicitly through tracked
//! points.

use crate::geometry::{Circle, Line, Point};
use crate::ir::ObjectId;
use serde::{Deserialize, Serialize};

/// Index of a geometric point within one contextual picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointRef(pub u32);

/// Index of a geometric line within one contextual picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineRef(pub u32);

/// Index of a geometric circle within one contextual picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleRef(pub u32);

/// Filter for object queries: objects present before the latest extension,
/// objects introduced by it, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    Old,
    New,
    All,
}

impl ObjectFilter {
    pub fn admits(&self, is_new: bool) -> bool {
        match self {
            ObjectFilter::Old => !is_new,
            ObjectFilter::New => is_new,
            ObjectFilter::All => true,
        }
    }
}

/// A tracked point: one per symbolic point object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointObject {
    /// The symbolic object this point tracks.
    pub config_object: ObjectId,
    /// Analytic value in each picture.
    pub values: Vec<Point>,
    /// Lines known to pass through this point, in every picture.
    pub lines: Vec<LineRef>,
    /// Circles known to pass through this point, in every picture.
    pub circles: Vec<CircleRef>,
    /// Whether the point was introduced by the latest extension.
    pub is_new: bool,
}

/// A tracked line, explicit or implicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineObject {
    /// The symbolic line this object represents, if any; implicit lines
    /// through tracked point pairs have none.
    pub config_object: Option<ObjectId>,
    /// Analytic value in each picture.
    pub values: Vec<Line>,
    /// Tracked points lying on the line in every picture, ascending.
    pub points: Vec<PointRef>,
    /// Whether the line was introduced by the latest extension.
    pub is_new: bool,
}

/// A tracked circle, explicit or implicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleObject {
    pub config_object: Option<ObjectId>,
    pub values: Vec<Circle>,
    pub points: Vec<PointRef>,
    pub is_new: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_admission() {
        assert!(ObjectFilter::All.admits(true));
        assert!(ObjectFilter::All.admits(false));
        assert!(ObjectFilter::New.admits(true));
        assert!(!ObjectFilter::New.admits(false));
        assert!(ObjectFilter::Old.admits(false));
        assert!(!ObjectFilter::Old.admits(true));
    }
}
