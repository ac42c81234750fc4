//! The construction catalog
//!
//! Constructions are a closed tagged variant: predefined constructions carry
//! a fixed algorithm selected by a single resolver in the realization
//! engine, composed constructions are defined by a whole configuration whose
//! designated outputs become the construction's results. Signatures are pure
//! data; argument checking happens against them, never by inference.

use super::configuration::Configuration;
use super::objects::{ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One argument slot of a construction signature.
///
/// A `SetOf` slot takes an unordered group of `size` arguments of the same
/// kind; the generator expands it as combinations, not permutations, and
/// canonicalization sorts the group's member representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Single(ObjectKind),
    SetOf { kind: ObjectKind, size: u32 },
}

impl Slot {
    /// Number of arguments the slot consumes.
    pub fn arity(&self) -> usize {
        match self {
            Slot::Single(_) => 1,
            Slot::SetOf { size, .. } => *size as usize,
        }
    }

    /// The expected kind of every argument in this slot.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Slot::Single(kind) => *kind,
            Slot::SetOf { kind, .. } => *kind,
        }
    }
}

/// Declarative signature: argument slots plus output kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub slots: Vec<Slot>,
    pub output: Vec<ObjectKind>,
}

impl Signature {
    /// Total number of arguments across all slots.
    pub fn arity(&self) -> usize {
        self.slots.iter().map(Slot::arity).sum()
    }

    /// Whether a flat argument kind list matches the slots in order.
    pub fn matches(&self, kinds: &[ObjectKind]) -> bool {
        if kinds.len() != self.arity() {
            return false;
        }
        let mut rest = kinds;
        for slot in &self.slots {
            let (group, tail) = rest.split_at(slot.arity());
            if group.iter().any(|k| *k != slot.kind()) {
                return false;
            }
            rest = tail;
        }
        true
    }
}

/// The predefined construction catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedConstruction {
    /// Midpoint of two points.
    Midpoint,
    /// Line through two points.
    LineFromPoints,
    /// Circle through three points.
    Circumcircle,
    /// Circle with a given center passing through a point.
    CircleWithCenterThroughPoint,
    /// Intersection point of two lines.
    IntersectionOfLines,
    /// Line through a point perpendicular to a line.
    PerpendicularLine,
    /// Line through a point parallel to a line.
    ParallelLine,
    /// Perpendicular bisector of two points.
    PerpendicularBisector,
    /// Internal bisector of the angle at a vertex towards two points.
    InternalAngleBisector,
    /// Reflection of a point through a center point.
    PointReflection,
    /// Reflection of a point in a line.
    ReflectionInLine,
    /// Perpendicular projection of a point onto a line.
    PerpendicularProjection,
    /// Given A and point pairs {B, C}, {D, E}: the second intersection of
    /// the circumcircles ABC and ADE (the first being A itself).
    SecondIntersectionOfTwoCircumcircles,
    /// Given A, B and a pair {C, D}: the second intersection of line AB
    /// with the circumcircle ACD (the first being A itself).
    SecondIntersectionOfCircleAndLineFromPoints,
}

impl PredefinedConstruction {
    pub const ALL: [PredefinedConstruction; 14] = [
        PredefinedConstruction::Midpoint,
        PredefinedConstruction::LineFromPoints,
        PredefinedConstruction::Circumcircle,
        PredefinedConstruction::CircleWithCenterThroughPoint,
        PredefinedConstruction::IntersectionOfLines,
        PredefinedConstruction::PerpendicularLine,
        PredefinedConstruction::ParallelLine,
        PredefinedConstruction::PerpendicularBisector,
        PredefinedConstruction::InternalAngleBisector,
        PredefinedConstruction::PointReflection,
        PredefinedConstruction::ReflectionInLine,
        PredefinedConstruction::PerpendicularProjection,
        PredefinedConstruction::SecondIntersectionOfTwoCircumcircles,
        PredefinedConstruction::SecondIntersectionOfCircleAndLineFromPoints,
    ];

    /// Stable identifier used in representation strings and logs.
    pub fn id(&self) -> &'static str {
        match self {
            PredefinedConstruction::Midpoint => "midpoint",
            PredefinedConstruction::LineFromPoints => "line_from_points",
            PredefinedConstruction::Circumcircle => "circumcircle",
            PredefinedConstruction::CircleWithCenterThroughPoint => {
                "circle_with_center_through_point"
            }
            PredefinedConstruction::IntersectionOfLines => "intersection_of_lines",
            PredefinedConstruction::PerpendicularLine => "perpendicular_line",
            PredefinedConstruction::ParallelLine => "parallel_line",
            PredefinedConstruction::PerpendicularBisector => "perpendicular_bisector",
            PredefinedConstruction::InternalAngleBisector => "internal_angle_bisector",
            PredefinedConstruction::PointReflection => "point_reflection",
            PredefinedConstruction::ReflectionInLine => "reflection_in_line",
            PredefinedConstruction::PerpendicularProjection => "perpendicular_projection",
            PredefinedConstruction::SecondIntersectionOfTwoCircumcircles => {
                "second_intersection_of_two_circumcircles"
            }
            PredefinedConstruction::SecondIntersectionOfCircleAndLineFromPoints => {
                "second_intersection_of_circle_and_line_from_points"
            }
        }
    }

    pub fn signature(&self) -> Signature {
        use ObjectKind::{Circle, Line, Point};
        let (slots, output) = match self {
            PredefinedConstruction::Midpoint => {
                (vec![Slot::SetOf { kind: Point, size: 2 }], vec![Point])
            }
            PredefinedConstruction::LineFromPoints => {
                (vec![Slot::SetOf { kind: Point, size: 2 }], vec![Line])
            }
            PredefinedConstruction::Circumcircle => {
                (vec![Slot::SetOf { kind: Point, size: 3 }], vec![Circle])
            }
            PredefinedConstruction::CircleWithCenterThroughPoint => {
                (vec![Slot::Single(Point), Slot::Single(Point)], vec![Circle])
            }
            PredefinedConstruction::IntersectionOfLines => {
                (vec![Slot::SetOf { kind: Line, size: 2 }], vec![Point])
            }
            PredefinedConstruction::PerpendicularLine => {
                (vec![Slot::Single(Point), Slot::Single(Line)], vec![Line])
            }
            PredefinedConstruction::ParallelLine => {
                (vec![Slot::Single(Point), Slot::Single(Line)], vec![Line])
            }
            PredefinedConstruction::PerpendicularBisector => {
                (vec![Slot::SetOf { kind: Point, size: 2 }], vec![Line])
            }
            PredefinedConstruction::InternalAngleBisector => (
                vec![Slot::Single(Point), Slot::SetOf { kind: Point, size: 2 }],
                vec![Line],
            ),
            PredefinedConstruction::PointReflection => {
                (vec![Slot::Single(Point), Slot::Single(Point)], vec![Point])
            }
            PredefinedConstruction::ReflectionInLine => {
                (vec![Slot::Single(Point), Slot::Single(Line)], vec![Point])
            }
            PredefinedConstruction::PerpendicularProjection => {
                (vec![Slot::Single(Point), Slot::Single(Line)], vec![Point])
            }
            PredefinedConstruction::SecondIntersectionOfTwoCircumcircles => (
                vec![
                    Slot::Single(Point),
                    Slot::SetOf { kind: Point, size: 2 },
                    Slot::SetOf { kind: Point, size: 2 },
                ],
                vec![Point],
            ),
            PredefinedConstruction::SecondIntersectionOfCircleAndLineFromPoints => (
                vec![
                    Slot::Single(Point),
                    Slot::Single(Point),
                    Slot::SetOf { kind: Point, size: 2 },
                ],
                vec![Point],
            ),
        };
        Signature { slots, output }
    }
}

/// A construction defined by another whole configuration: when its loose
/// objects are substituted by the arguments, the designated output objects
/// become the construction's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedConstruction {
    /// Unique name within one generator run; used in representation strings.
    pub name: String,
    /// The defining configuration; its loose objects are the argument
    /// slots, in order.
    pub definition: Configuration,
    /// Positions within the definition whose values are the outputs.
    pub outputs: Vec<ObjectId>,
}

impl ComposedConstruction {
    /// The signature derived from the definition: one ordered `Single` slot
    /// per loose object (composed arguments are never interchangeable).
    pub fn signature(&self) -> Signature {
        Signature {
            slots: self
                .definition
                .loose()
                .iter()
                .map(|kind| Slot::Single(*kind))
                .collect(),
            output: self
                .outputs
                .iter()
                .map(|id| self.definition.object_kind(*id))
                .collect(),
        }
    }
}

/// Either a predefined catalog entry or a user-composed construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Construction {
    Predefined(PredefinedConstruction),
    Composed(Arc<ComposedConstruction>),
}

impl Construction {
    /// Stable identifier used in representation strings and logs.
    pub fn id(&self) -> &str {
        match self {
            Construction::Predefined(p) => p.id(),
            Construction::Composed(c) => &c.name,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Construction::Predefined(p) => p.signature(),
            Construction::Composed(c) => c.signature(),
        }
    }
}

// Equality by identifier: composed constructions are unique by name within
// a run, predefined ones by variant.
impl PartialEq for Construction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Construction::Predefined(a), Construction::Predefined(b)) => a == b,
            (Construction::Composed(a), Construction::Composed(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Eq for Construction {}

impl Hash for Construction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<PredefinedConstruction> for Construction {
    fn from(p: PredefinedConstruction) -> Self {
        Construction::Predefined(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_arity() {
        let sig = PredefinedConstruction::InternalAngleBisector.signature();
        assert_eq!(sig.arity(), 3);
        assert_eq!(sig.output, vec![ObjectKind::Line]);
    }

    #[test]
    fn test_signature_matching() {
        use ObjectKind::{Line, Point};

        let sig = PredefinedConstruction::PerpendicularLine.signature();
        assert!(sig.matches(&[Point, Line]));
        assert!(!sig.matches(&[Line, Point]), "Slot order matters");
        assert!(!sig.matches(&[Point]), "Arity must match");
    }

    #[test]
    fn test_all_ids_unique() {
        use std::collections::HashSet;

        let ids: HashSet<_> = PredefinedConstruction::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), PredefinedConstruction::ALL.len());
    }

    #[test]
    fn test_construction_equality() {
        let a: Construction = PredefinedConstruction::Midpoint.into();
        let b: Construction = PredefinedConstruction::Midpoint.into();
        let c: Construction = PredefinedConstruction::Circumcircle.into();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
