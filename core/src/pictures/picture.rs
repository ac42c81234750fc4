//! One numeric realization of a configuration

use crate::geometry::{Circle, Line, Point};
use crate::ir::{ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};

/// A concrete analytic value for one configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalyticObject {
    Point(Point),
    Line(Line),
    Circle(Circle),
}

impl AnalyticObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            AnalyticObject::Point(_) => ObjectKind::Point,
            AnalyticObject::Line(_) => ObjectKind::Line,
            AnalyticObject::Circle(_) => ObjectKind::Circle,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            AnalyticObject::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            AnalyticObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            AnalyticObject::Circle(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Point> for AnalyticObject {
    fn from(p: Point) -> Self {
        AnalyticObject::Point(p)
    }
}

impl From<Line> for AnalyticObject {
    fn from(l: Line) -> Self {
        AnalyticObject::Line(l)
    }
}

impl From<Circle> for AnalyticObject {
    fn from(c: Circle) -> Self {
        AnalyticObject::Circle(c)
    }
}

/// The mapping from every object of a configuration to one analytic value,
/// for a single randomized realization. Values are stored by position, in
/// the configuration's object order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Picture {
    objects: Vec<AnalyticObject>,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: Vec<AnalyticObject>) -> Self {
        Self { objects }
    }

    /// The value of the object at a position.
    ///
    /// Panics on an out-of-range id; ids are only ever produced by the
    /// configuration the picture realizes.
    pub fn get(&self, id: ObjectId) -> &AnalyticObject {
        &self.objects[id.index()]
    }

    pub fn push(&mut self, value: AnalyticObject) {
        self.objects.push(value);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &AnalyticObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, value)| (ObjectId(index as u32), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_indexing() {
        let mut picture = Picture::new();
        picture.push(Point::new(1.0, 2.0).into());
        picture.push(Point::new(3.0, 4.0).into());

        assert_eq!(picture.len(), 2);
        assert_eq!(
            picture.get(ObjectId(1)).as_point(),
            Some(&Point::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_kind_dispatch() {
        let point: AnalyticObject = Point::new(0.0, 0.0).into();
        let circle: AnalyticObject = Circle::new(Point::new(0.0, 0.0), 1.0).into();

        assert_eq!(point.kind(), ObjectKind::Point);
        assert_eq!(circle.kind(), ObjectKind::Circle);
        assert!(point.as_circle().is_none());
    }
}
