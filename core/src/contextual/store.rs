//! The contextual picture: a cross-realization index
//!
//! Built once per configuration from its pictures and extended
//! incrementally as the generator appends layers. Tracks which points lie
//! on which lines and circles in *every* picture, creating implicit lines
//! through each point pair and implicit circles through each non-collinear
//! point triple so that collinearity, concurrency and concyclicity
//! candidates can be read off structurally.
//!
//! Membership is all-or-nothing: a point on an object in some pictures but
//! not others means the realizations disagree, which surfaces as
//! `InconsistentPictures`.

use super::objects::{
    CircleObject, CircleRef, LineObject, LineRef, ObjectFilter, PointObject, PointRef,
};
use crate::error::GenerationError;
use crate::geometry::{Circle, Line, Point};
use crate::ir::{Configuration, ObjectId, ObjectKind};
use crate::pictures::Picture;
use rustc_hash::FxHashMap;

/// Read-only index over one configuration's pictures.
#[derive(Debug, Clone, Default)]
pub struct ContextualPicture {
    pictures: Vec<Picture>,
    points: Vec<PointObject>,
    lines: Vec<LineObject>,
    circles: Vec<CircleObject>,
    point_of: FxHashMap<ObjectId, PointRef>,
    line_index: FxHashMap<Vec<Line>, LineRef>,
    circle_index: FxHashMap<Vec<Circle>, CircleRef>,
    /// Configuration positions already indexed.
    object_count: usize,
}

impl ContextualPicture {
    /// Build the index for a configuration and its accepted pictures.
    pub fn build(
        pictures: Vec<Picture>,
        config: &Configuration,
    ) -> Result<Self, GenerationError> {
        let mut store = Self {
            pictures,
            ..Self::default()
        };
        for id in config.ids() {
            store.add_object(id, config.object_kind(id), config.is_new(id))?;
        }
        store.object_count = config.len();
        Ok(store)
    }

    /// The index extended by the configuration's latest layer, over the
    /// extended pictures. Existing objects keep their references; their
    /// "new" tags are reset so only the appended layer counts as new.
    pub fn extend(
        &self,
        pictures: Vec<Picture>,
        config: &Configuration,
    ) -> Result<Self, GenerationError> {
        let mut store = self.clone();
        store.pictures = pictures;
        for point in &mut store.points {
            point.is_new = false;
        }
        for line in &mut store.lines {
            line.is_new = false;
        }
        for circle in &mut store.circles {
            circle.is_new = false;
        }
        for index in store.object_count..config.len() {
            let id = ObjectId(index as u32);
            store.add_object(id, config.object_kind(id), true)?;
        }
        store.object_count = config.len();
        Ok(store)
    }

    fn add_object(
        &mut self,
        id: ObjectId,
        kind: ObjectKind,
        is_new: bool,
    ) -> Result<(), GenerationError> {
        match kind {
            ObjectKind::Point => self.add_point(id, is_new),
            ObjectKind::Line => self.add_line(id, is_new),
            ObjectKind::Circle => self.add_circle(id, is_new),
        }
    }

    fn add_point(&mut self, id: ObjectId, is_new: bool) -> Result<(), GenerationError> {
        let values: Vec<Point> = self
            .pictures
            .iter()
            .map(|picture| {
                *picture
                    .get(id)
                    .as_point()
                    .expect("picture value matches the configuration kind")
            })
            .collect();

        let point_ref = PointRef(self.points.len() as u32);
        self.points.push(PointObject {
            config_object: id,
            values,
            lines: Vec::new(),
            circles: Vec::new(),
            is_new,
        });
        self.point_of.insert(id, point_ref);

        // Membership against every tracked line and circle
        for line_ref in (0..self.lines.len() as u32).map(LineRef) {
            let on = self.consistent_membership(id, |picture| {
                self.lines[line_ref.0 as usize].values[picture]
                    .contains(&self.points[point_ref.0 as usize].values[picture])
            })?;
            if on {
                self.attach_point_to_line(point_ref, line_ref);
            }
        }
        for circle_ref in (0..self.circles.len() as u32).map(CircleRef) {
            let on = self.consistent_membership(id, |picture| {
                self.circles[circle_ref.0 as usize].values[picture]
                    .contains(&self.points[point_ref.0 as usize].values[picture])
            })?;
            if on {
                self.attach_point_to_circle(point_ref, circle_ref);
            }
        }

        // Implicit lines through this point and each older point
        for other in (0..point_ref.0).map(PointRef) {
            self.ensure_line_through(id, other, point_ref)?;
        }

        // Implicit circles through this point and each older non-collinear pair
        for first in (0..point_ref.0).map(PointRef) {
            for second in (first.0 + 1..point_ref.0).map(PointRef) {
                self.ensure_circle_through(id, first, second, point_ref)?;
            }
        }

        Ok(())
    }

    fn ensure_line_through(
        &mut self,
        id: ObjectId,
        a: PointRef,
        b: PointRef,
    ) -> Result<(), GenerationError> {
        let values: Vec<Line> = (0..self.pictures.len())
            .map(|picture| {
                Line::through(
                    &self.points[a.0 as usize].values[picture],
                    &self.points[b.0 as usize].values[picture],
                )
                .ok_or_else(|| GenerationError::InconsistentPictures {
                    object: id,
                    details: format!("tracked points {:?} and {:?} coincide numerically", a, b),
                })
            })
            .collect::<Result<_, _>>()?;

        if self.line_index.contains_key(&values) {
            // Already tracked; membership of both endpoints was recorded
            // when the line was created or the point was added
            return Ok(());
        }

        let is_new =
            self.points[a.0 as usize].is_new || self.points[b.0 as usize].is_new;
        let line_ref = LineRef(self.lines.len() as u32);
        self.lines.push(LineObject {
            config_object: None,
            values: values.clone(),
            points: Vec::new(),
            is_new,
        });
        self.line_index.insert(values, line_ref);
        self.attach_point_to_line(a, line_ref);
        self.attach_point_to_line(b, line_ref);
        Ok(())
    }

    fn ensure_circle_through(
        &mut self,
        id: ObjectId,
        a: PointRef,
        b: PointRef,
        c: PointRef,
    ) -> Result<(), GenerationError> {
        // Collinear triples (per the tracked line structure) have no circle
        if self.tracked_collinear(a, b, c) {
            return Ok(());
        }

        let values: Vec<Circle> = (0..self.pictures.len())
            .map(|picture| {
                Circle::circumcircle(
                    &self.points[a.0 as usize].values[picture],
                    &self.points[b.0 as usize].values[picture],
                    &self.points[c.0 as usize].values[picture],
                )
                .ok_or_else(|| GenerationError::InconsistentPictures {
                    object: id,
                    details: format!(
                        "points {:?}, {:?}, {:?} are collinear in one picture but not tracked as such",
                        a, b, c
                    ),
                })
            })
            .collect::<Result<_, _>>()?;

        if self.circle_index.contains_key(&values) {
            return Ok(());
        }

        let is_new = self.points[a.0 as usize].is_new
            || self.points[b.0 as usize].is_new
            || self.points[c.0 as usize].is_new;
        let circle_ref = CircleRef(self.circles.len() as u32);
        self.circles.push(CircleObject {
            config_object: None,
            values: values.clone(),
            points: Vec::new(),
            is_new,
        });
        self.circle_index.insert(values, circle_ref);
        self.attach_point_to_circle(a, circle_ref);
        self.attach_point_to_circle(b, circle_ref);
        self.attach_point_to_circle(c, circle_ref);
        Ok(())
    }

    fn add_line(&mut self, id: ObjectId, is_new: bool) -> Result<(), GenerationError> {
        let values: Vec<Line> = self
            .pictures
            .iter()
            .map(|picture| {
                *picture
                    .get(id)
                    .as_line()
                    .expect("picture value matches the configuration kind")
            })
            .collect();

        if let Some(line_ref) = self.line_index.get(&values).copied() {
            // Same analytic value in every picture: merge with the tracked
            // (possibly implicit) line
            let line = &mut self.lines[line_ref.0 as usize];
            line.config_object.get_or_insert(id);
            line.is_new |= is_new;
            return Ok(());
        }

        let line_ref = LineRef(self.lines.len() as u32);
        self.lines.push(LineObject {
            config_object: Some(id),
            values: values.clone(),
            points: Vec::new(),
            is_new,
        });
        self.line_index.insert(values, line_ref);

        // Which tracked points lie on the new line
        for point_ref in (0..self.points.len() as u32).map(PointRef) {
            let on = self.consistent_membership(id, |picture| {
                self.lines[line_ref.0 as usize].values[picture]
                    .contains(&self.points[point_ref.0 as usize].values[picture])
            })?;
            if on {
                self.attach_point_to_line(point_ref, line_ref);
            }
        }
        Ok(())
    }

    fn add_circle(&mut self, id: ObjectId, is_new: bool) -> Result<(), GenerationError> {
        let values: Vec<Circle> = self
            .pictures
            .iter()
            .map(|picture| {
                *picture
                    .get(id)
                    .as_circle()
                    .expect("picture value matches the configuration kind")
            })
            .collect();

        if let Some(circle_ref) = self.circle_index.get(&values).copied() {
            let circle = &mut self.circles[circle_ref.0 as usize];
            circle.config_object.get_or_insert(id);
            circle.is_new |= is_new;
            return Ok(());
        }

        let circle_ref = CircleRef(self.circles.len() as u32);
        self.circles.push(CircleObject {
            config_object: Some(id),
            values: values.clone(),
            points: Vec::new(),
            is_new,
        });
        self.circle_index.insert(values, circle_ref);

        for point_ref in (0..self.points.len() as u32).map(PointRef) {
            let on = self.consistent_membership(id, |picture| {
                self.circles[circle_ref.0 as usize].values[picture]
                    .contains(&self.points[point_ref.0 as usize].values[picture])
            })?;
            if on {
                self.attach_point_to_circle(point_ref, circle_ref);
            }
        }
        Ok(())
    }

    /// A predicate must hold in all pictures or in none; anything in
    /// between means the realizations disagree.
    fn consistent_membership(
        &self,
        object: ObjectId,
        predicate: impl Fn(usize) -> bool,
    ) -> Result<bool, GenerationError> {
        let hits = (0..self.pictures.len()).filter(|i| predicate(*i)).count();
        if hits == 0 {
            Ok(false)
        } else if hits == self.pictures.len() {
            Ok(true)
        } else {
            Err(GenerationError::InconsistentPictures {
                object,
                details: format!(
                    "membership holds in {} of {} pictures",
                    hits,
                    self.pictures.len()
                ),
            })
        }
    }

    fn attach_point_to_line(&mut self, point: PointRef, line: LineRef) {
        let line_object = &mut self.lines[line.0 as usize];
        if let Err(position) = line_object.points.binary_search(&point) {
            line_object.points.insert(position, point);
            self.points[point.0 as usize].lines.push(line);
        }
    }

    fn attach_point_to_circle(&mut self, point: PointRef, circle: CircleRef) {
        let circle_object = &mut self.circles[circle.0 as usize];
        if let Err(position) = circle_object.points.binary_search(&point) {
            circle_object.points.insert(position, point);
            self.points[point.0 as usize].circles.push(circle);
        }
    }

    /// Whether three points share a tracked line.
    fn tracked_collinear(&self, a: PointRef, b: PointRef, c: PointRef) -> bool {
        self.points[a.0 as usize].lines.iter().any(|line| {
            let points = &self.lines[line.0 as usize].points;
            points.binary_search(&b).is_ok() && points.binary_search(&c).is_ok()
        })
    }

    // Queries

    pub fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    /// The pictures the index was built over; the generator clones these
    /// when realizing the next layer.
    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn points(&self, filter: ObjectFilter) -> impl Iterator<Item = PointRef> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter(move |(_, p)| filter.admits(p.is_new))
            .map(|(index, _)| PointRef(index as u32))
    }

    pub fn lines(&self, filter: ObjectFilter) -> impl Iterator<Item = LineRef> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(move |(_, l)| filter.admits(l.is_new))
            .map(|(index, _)| LineRef(index as u32))
    }

    pub fn circles(&self, filter: ObjectFilter) -> impl Iterator<Item = CircleRef> + '_ {
        self.circles
            .iter()
            .enumerate()
            .filter(move |(_, c)| filter.admits(c.is_new))
            .map(|(index, _)| CircleRef(index as u32))
    }

    pub fn point(&self, point: PointRef) -> &PointObject {
        &self.points[point.0 as usize]
    }

    pub fn line(&self, line: LineRef) -> &LineObject {
        &self.lines[line.0 as usize]
    }

    pub fn circle(&self, circle: CircleRef) -> &CircleObject {
        &self.circles[circle.0 as usize]
    }

    /// The analytic value of a tracked point in one picture.
    pub fn point_value(&self, point: PointRef, picture: usize) -> &Point {
        &self.points[point.0 as usize].values[picture]
    }

    pub fn line_value(&self, line: LineRef, picture: usize) -> &Line {
        &self.lines[line.0 as usize].values[picture]
    }

    pub fn circle_value(&self, circle: CircleRef, picture: usize) -> &Circle {
        &self.circles[circle.0 as usize].values[picture]
    }

    /// The tracked point for a symbolic point object.
    pub fn point_of(&self, id: ObjectId) -> Option<PointRef> {
        self.point_of.get(&id).copied()
    }

    pub fn lines_through(&self, point: PointRef) -> &[LineRef] {
        &self.points[point.0 as usize].lines
    }

    pub fn circles_through(&self, point: PointRef) -> &[CircleRef] {
        &self.points[point.0 as usize].circles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstructedObject, PredefinedConstruction};
    use crate::pictures::{PictureSettings, RealizationOutcome, Realizer};

    fn define(construction: PredefinedConstruction, args: &[u32]) -> ConstructedObject {
        ConstructedObject::define(
            construction.into(),
            args.iter().map(|a| ObjectId(*a)).collect(),
            0,
        )
        .unwrap()
    }

    fn realize(config: &Configuration, seed: u64) -> Vec<Picture> {
        let mut realizer = Realizer::seeded(PictureSettings::default(), seed);
        match realizer.realize(config).unwrap() {
            RealizationOutcome::Constructible(pictures) => pictures,
            other => panic!("expected constructible, got {:?}", other),
        }
    }

    #[test]
    fn test_triangle_index() {
        let config = Configuration::new(vec![ObjectKind::Point; 3]);
        let store = ContextualPicture::build(realize(&config, 3), &config).unwrap();

        assert_eq!(store.points(ObjectFilter::All).count(), 3);
        assert_eq!(
            store.lines(ObjectFilter::All).count(),
            3,
            "One implicit line per point pair"
        );
        assert_eq!(
            store.circles(ObjectFilter::All).count(),
            1,
            "One implicit circle per non-collinear triple"
        );
    }

    #[test]
    fn test_explicit_line_merges_with_implicit() {
        let config = Configuration::new(vec![ObjectKind::Point; 3])
            .extended(vec![define(PredefinedConstruction::LineFromPoints, &[0, 1])])
            .unwrap();
        let store = ContextualPicture::build(realize(&config, 5), &config).unwrap();

        assert_eq!(
            store.lines(ObjectFilter::All).count(),
            3,
            "The explicit line A-B merges with the implicit one"
        );
        let merged = store
            .lines(ObjectFilter::All)
            .map(|l| store.line(l))
            .find(|l| l.config_object == Some(ObjectId(3)))
            .expect("the explicit line is tracked");
        assert_eq!(merged.points.len(), 2);
    }

    #[test]
    fn test_midpoint_lies_on_side() {
        let config = Configuration::new(vec![ObjectKind::Point; 3])
            .extended(vec![define(PredefinedConstruction::Midpoint, &[1, 2])])
            .unwrap();
        let store = ContextualPicture::build(realize(&config, 9), &config).unwrap();

        let midpoint = store.point_of(ObjectId(3)).unwrap();
        let b = store.point_of(ObjectId(1)).unwrap();
        let c = store.point_of(ObjectId(2)).unwrap();

        let side = store
            .lines_through(b)
            .iter()
            .find(|line| store.line(**line).points.binary_search(&c).is_ok())
            .expect("the line B-C is tracked");
        assert!(
            store.line(*side).points.binary_search(&midpoint).is_ok(),
            "The midpoint of B-C lies on the line B-C in every picture"
        );
    }

    #[test]
    fn test_extension_tags_new_objects() {
        let base = Configuration::new(vec![ObjectKind::Point; 3]);
        let pictures = realize(&base, 21);
        let store = ContextualPicture::build(pictures, &base).unwrap();

        let extended_config = base
            .extended(vec![define(PredefinedConstruction::Midpoint, &[0, 1])])
            .unwrap();
        let mut realizer = Realizer::seeded(PictureSettings::default(), 22);
        let extended_pictures = match realizer.extend(store.pictures(), &extended_config).unwrap()
        {
            RealizationOutcome::Constructible(pictures) => pictures,
            other => panic!("expected constructible, got {:?}", other),
        };
        let extended = store.extend(extended_pictures, &extended_config).unwrap();

        assert_eq!(extended.points(ObjectFilter::New).count(), 1);
        assert_eq!(extended.points(ObjectFilter::Old).count(), 3);
        assert_eq!(
            extended.lines(ObjectFilter::New).count(),
            1,
            "Only the line from the midpoint to the opposite vertex is new; the \
             lines to A and B coincide with the old line A-B"
        );
    }

    #[test]
    fn test_circumcircle_merges() {
        let config = Configuration::new(vec![ObjectKind::Point; 3])
            .extended(vec![define(PredefinedConstruction::Circumcircle, &[0, 1, 2])])
            .unwrap();
        let store = ContextualPicture::build(realize(&config, 31), &config).unwrap();

        assert_eq!(
            store.circles(ObjectFilter::All).count(),
            1,
            "The explicit circumcircle merges with the implicit triple circle"
        );
    }
}
