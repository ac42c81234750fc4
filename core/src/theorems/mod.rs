//! Theorem types and storage
//!
//! A theorem is a relationship over tracked geometric objects. Equality is
//! relationship-based and independent of argument order: symmetric
//! predicates normalize by sorting their arguments, so equivalent theorems
//! hash to the same value and deduplicate on insertion.

pub mod finder;

pub use finder::{find_theorems, TheoremScope};

use crate::contextual::{CircleRef, LineRef, PointRef};
use crate::ir::ObjectId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An unordered pair of tracked points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub a: PointRef,
    pub b: PointRef,
}

impl Segment {
    /// A segment with normalized endpoint order.
    pub fn new(a: PointRef, b: PointRef) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// The explicit object a point is incident to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidenceTarget {
    Line(LineRef),
    Circle(CircleRef),
}

/// A geometric relationship verified across all pictures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theorem {
    /// Three points lie on a common line.
    CollinearPoints(PointRef, PointRef, PointRef),

    /// Four points lie on a common circle.
    ConcyclicPoints(PointRef, PointRef, PointRef, PointRef),

    /// Three lines pass through a common point that is not itself tracked.
    ConcurrentLines(LineRef, LineRef, LineRef),

    /// Two lines are parallel.
    ParallelLines(LineRef, LineRef),

    /// Two lines are perpendicular.
    PerpendicularLines(LineRef, LineRef),

    /// Two circles touch in exactly one point.
    TangentCircles(CircleRef, CircleRef),

    /// A line touches a circle in exactly one point.
    LineTangentToCircle(LineRef, CircleRef),

    /// Two segments between tracked points have equal length.
    EqualLineSegments(Segment, Segment),

    /// A point lies on an explicit line or circle it is not an argument of.
    Incidence(PointRef, IncidenceTarget),

    /// Two symbolic objects are geometrically the same in every picture.
    SameObjects(ObjectId, ObjectId),
}

impl Theorem {
    /// Normalize to canonical form: symmetric predicates sort their
    /// arguments so that equivalent theorems compare and hash equal.
    pub fn normalize(self) -> Self {
        match self {
            Theorem::CollinearPoints(p1, p2, p3) => {
                let mut points = [p1, p2, p3];
                points.sort();
                Theorem::CollinearPoints(points[0], points[1], points[2])
            }
            Theorem::ConcyclicPoints(p1, p2, p3, p4) => {
                let mut points = [p1, p2, p3, p4];
                points.sort();
                Theorem::ConcyclicPoints(points[0], points[1], points[2], points[3])
            }
            Theorem::ConcurrentLines(l1, l2, l3) => {
                let mut lines = [l1, l2, l3];
                lines.sort();
                Theorem::ConcurrentLines(lines[0], lines[1], lines[2])
            }
            Theorem::ParallelLines(l1, l2) => {
                if l1 <= l2 {
                    Theorem::ParallelLines(l1, l2)
                } else {
                    Theorem::ParallelLines(l2, l1)
                }
            }
            Theorem::PerpendicularLines(l1, l2) => {
                if l1 <= l2 {
                    Theorem::PerpendicularLines(l1, l2)
                } else {
                    Theorem::PerpendicularLines(l2, l1)
                }
            }
            Theorem::TangentCircles(c1, c2) => {
                if c1 <= c2 {
                    Theorem::TangentCircles(c1, c2)
                } else {
                    Theorem::TangentCircles(c2, c1)
                }
            }
            Theorem::EqualLineSegments(s1, s2) => {
                if s1 <= s2 {
                    Theorem::EqualLineSegments(s1, s2)
                } else {
                    Theorem::EqualLineSegments(s2, s1)
                }
            }
            Theorem::SameObjects(o1, o2) => {
                if o1 <= o2 {
                    Theorem::SameObjects(o1, o2)
                } else {
                    Theorem::SameObjects(o2, o1)
                }
            }
            // Asymmetric relationships stay as they are
            other => other,
        }
    }

    /// The kind tag of this theorem for indexing.
    pub fn kind(&self) -> TheoremKind {
        match self {
            Theorem::CollinearPoints(..) => TheoremKind::CollinearPoints,
            Theorem::ConcyclicPoints(..) => TheoremKind::ConcyclicPoints,
            Theorem::ConcurrentLines(..) => TheoremKind::ConcurrentLines,
            Theorem::ParallelLines(..) => TheoremKind::ParallelLines,
            Theorem::PerpendicularLines(..) => TheoremKind::PerpendicularLines,
            Theorem::TangentCircles(..) => TheoremKind::TangentCircles,
            Theorem::LineTangentToCircle(..) => TheoremKind::LineTangentToCircle,
            Theorem::EqualLineSegments(..) => TheoremKind::EqualLineSegments,
            Theorem::Incidence(..) => TheoremKind::Incidence,
            Theorem::SameObjects(..) => TheoremKind::SameObjects,
        }
    }
}

/// Enumeration of theorem kinds for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TheoremKind {
    CollinearPoints,
    ConcyclicPoints,
    ConcurrentLines,
    ParallelLines,
    PerpendicularLines,
    TangentCircles,
    LineTangentToCircle,
    EqualLineSegments,
    Incidence,
    SameObjects,
}

/// Deduplicated theorem storage with a kind index.
///
/// Theorems are normalized on insertion; the index answers "all theorems of
/// a kind" without scanning.
#[derive(Debug, Clone, Default)]
pub struct TheoremStore {
    theorems: HashSet<Theorem>,
    kind_index: FxHashMap<TheoremKind, Vec<Theorem>>,
}

impl TheoremStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a theorem, returning whether it was newly added.
    pub fn insert(&mut self, theorem: Theorem) -> bool {
        let theorem = theorem.normalize();
        let is_new = self.theorems.insert(theorem.clone());
        if is_new {
            self.kind_index.entry(theorem.kind()).or_default().push(theorem);
        }
        is_new
    }

    pub fn contains(&self, theorem: &Theorem) -> bool {
        self.theorems.contains(&theorem.clone().normalize())
    }

    /// All theorems of one kind.
    pub fn of_kind(&self, kind: TheoremKind) -> &[Theorem] {
        self.kind_index.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theorem> {
        self.theorems.iter()
    }

    pub fn len(&self) -> usize {
        self.theorems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theorems.is_empty()
    }

    /// Insert every theorem of another store.
    pub fn merge(&mut self, other: &TheoremStore) {
        for theorem in other.iter() {
            self.insert(theorem.clone());
        }
    }

    /// The theorems of this store that the other one does not contain.
    pub fn difference(&self, other: &TheoremStore) -> TheoremStore {
        let mut result = TheoremStore::new();
        for theorem in self.iter() {
            if !other.contains(theorem) {
                result.insert(theorem.clone());
            }
        }
        result
    }
}
