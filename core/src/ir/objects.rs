//! Symbolic configuration objects
//!
//! Objects are identified by their position within a configuration (an
//! arena index), never by coordinates. Loose objects occupy the leading
//! positions; constructed objects follow, and their arguments always refer
//! to strictly earlier positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The geometric kind of a configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Point,
    Line,
    Circle,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Point, ObjectKind::Line, ObjectKind::Circle];

    /// Short label used in representation strings.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Point => "P",
            ObjectKind::Line => "L",
            ObjectKind::Circle => "C",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of an object within its configuration.
///
/// Identity is positional: the same `ObjectId` means the same symbolic
/// object only within one configuration (and its extensions, which append).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ObjectKind::Point.label(), "P");
        assert_eq!(ObjectKind::Line.label(), "L");
        assert_eq!(ObjectKind::Circle.label(), "C");
    }

    #[test]
    fn test_object_id_ordering() {
        assert!(ObjectId(1) < ObjectId(2));
        assert_eq!(ObjectId(3).index(), 3);
    }
}
