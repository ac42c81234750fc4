//! The realization engine
//!
//! Realizes a symbolic configuration as several independent random
//! coordinate assignments ("pictures"), evaluates every construction step
//! through the analytic kernel, and aggregates the per-picture outcomes.
//!
//! A step undefined in *every* picture makes the configuration
//! inconstructible (a normal rejection). A step undefined in only *some*
//! pictures, or pictures disagreeing about which objects coincide, is an
//! inconsistency: either the picture count is too low to be trustworthy or
//! there is a logic defect, so it propagates as a fatal error.

use super::evaluate::evaluate_construction;
use super::picture::{AnalyticObject, Picture};
use crate::error::GenerationError;
use crate::geometry::{Circle, Line, Point};
use crate::ir::{Configuration, ObjectId, ObjectKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default number of independent pictures per configuration.
///
/// A policy constant: more pictures make accidental numeric coincidence
/// less probable at the cost of proportional work.
pub const DEFAULT_PICTURE_COUNT: usize = 5;

/// Half-width of the square region loose coordinates are drawn from.
const COORDINATE_RANGE: f64 = 5.0;
/// Loose points closer than this are resampled in friendly style.
const MIN_POINT_SEPARATION: f64 = 1.0;
/// Lower bound on |sin| of any angle formed by three loose points.
const MIN_ANGLE_MARGIN: f64 = 0.2;
/// Minimum difference between any two loose-point distances.
const MIN_DISTANCE_GAP: f64 = 0.1;
/// Friendly-style resampling gives up after this many attempts.
const MAX_SAMPLING_ATTEMPTS: usize = 100;

/// How loose objects receive their random coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LooseObjectStyle {
    /// Avoid already-known degenerate special positions (near-collinear or
    /// near-isosceles point layouts) to reduce spurious accidental
    /// theorems. Used for initial configurations.
    GenerationFriendly,
    /// Plain uniform sampling.
    Uniform,
}

/// Settings for one realization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureSettings {
    pub picture_count: usize,
    pub style: LooseObjectStyle,
}

impl Default for PictureSettings {
    fn default() -> Self {
        Self {
            picture_count: DEFAULT_PICTURE_COUNT,
            style: LooseObjectStyle::GenerationFriendly,
        }
    }
}

/// Aggregated result of realizing one configuration.
#[derive(Debug, Clone)]
pub enum RealizationOutcome {
    /// Every picture evaluated every object, and no two symbolic objects
    /// coincide anywhere.
    Constructible(Vec<Picture>),
    /// Every picture agrees that the mapped symbolic objects are
    /// geometrically the same ("SameObjects"); the configuration is
    /// rejected but the identities are reportable facts.
    Duplicates {
        pictures: Vec<Picture>,
        /// Later object to the earliest object it coincides with.
        duplicates: FxHashMap<ObjectId, ObjectId>,
    },
    /// Some object was undefined in every picture; the configuration is
    /// simply not producible. A normal branch outcome, never logged as an
    /// error.
    Inconstructible,
}

/// Per-picture evaluation result, before cross-picture aggregation.
enum PictureResult {
    Done {
        picture: Picture,
        duplicates: FxHashMap<ObjectId, ObjectId>,
    },
    Undefined {
        object: ObjectId,
    },
}

/// Realizes configurations with a single deterministic-seedable random
/// source per run.
#[derive(Debug)]
pub struct Realizer {
    settings: PictureSettings,
    rng: StdRng,
}

impl Realizer {
    /// A realizer seeded from entropy.
    pub fn new(settings: PictureSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// A deterministic realizer for reproducible searches.
    pub fn seeded(settings: PictureSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &PictureSettings {
        &self.settings
    }

    /// Realize a configuration from scratch.
    pub fn realize(
        &mut self,
        config: &Configuration,
    ) -> Result<RealizationOutcome, GenerationError> {
        let mut results = Vec::with_capacity(self.settings.picture_count);
        for _ in 0..self.settings.picture_count {
            let loose = self.assign_loose(config.loose());
            let picture = Picture::with_objects(loose);
            results.push(evaluate_layer(picture, config)?);
        }
        aggregate(results)
    }

    /// Realize one appended layer on top of previously accepted pictures,
    /// cloning them instead of recomputing earlier objects.
    pub fn extend(
        &mut self,
        previous: &[Picture],
        config: &Configuration,
    ) -> Result<RealizationOutcome, GenerationError> {
        let mut results = Vec::with_capacity(previous.len());
        for picture in previous {
            results.push(evaluate_layer(picture.clone(), config)?);
        }
        aggregate(results)
    }

    fn assign_loose(&mut self, kinds: &[ObjectKind]) -> Vec<AnalyticObject> {
        let point_count = kinds.iter().filter(|k| **k == ObjectKind::Point).count();
        let mut points = match self.settings.style {
            LooseObjectStyle::GenerationFriendly => self.friendly_points(point_count),
            LooseObjectStyle::Uniform => {
                (0..point_count).map(|_| self.random_point()).collect()
            }
        }
        .into_iter();

        kinds
            .iter()
            .map(|kind| match kind {
                ObjectKind::Point => points.next().expect("one sampled point per slot").into(),
                ObjectKind::Line => self.random_line().into(),
                ObjectKind::Circle => self.random_circle().into(),
            })
            .collect()
    }

    fn random_point(&mut self) -> Point {
        Point::new(
            self.rng.gen_range(-COORDINATE_RANGE..COORDINATE_RANGE),
            self.rng.gen_range(-COORDINATE_RANGE..COORDINATE_RANGE),
        )
    }

    fn random_line(&mut self) -> Line {
        loop {
            let p = self.random_point();
            let q = self.random_point();
            if let Some(line) = Line::through(&p, &q) {
                return line;
            }
        }
    }

    fn random_circle(&mut self) -> Circle {
        let center = self.random_point();
        let radius = self.rng.gen_range(0.5..COORDINATE_RANGE);
        Circle::new(center, radius)
    }

    /// Sample a layout of points avoiding degenerate special positions.
    fn friendly_points(&mut self, count: usize) -> Vec<Point> {
        let mut last = Vec::new();
        for attempt in 0..MAX_SAMPLING_ATTEMPTS {
            last = (0..count).map(|_| self.random_point()).collect();
            if friendly_layout(&last) {
                return last;
            }
            if attempt == MAX_SAMPLING_ATTEMPTS - 1 {
                debug!(count, "friendly point sampling exhausted, using last layout");
            }
        }
        last
    }
}

/// Whether a point layout avoids the known degenerate special positions.
fn friendly_layout(points: &[Point]) -> bool {
    // Pairwise separation
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if points[i].distance(&points[j]) < MIN_POINT_SEPARATION {
                return false;
            }
        }
    }

    // No three points nearly collinear
    for i in 0..points.len() {
        for j in 0..points.len() {
            for k in 0..points.len() {
                if i == j || j == k || i == k {
                    continue;
                }
                let (p, q, r) = (&points[i], &points[j], &points[k]);
                let ux = q.x.raw() - p.x.raw();
                let uy = q.y.raw() - p.y.raw();
                let vx = r.x.raw() - p.x.raw();
                let vy = r.y.raw() - p.y.raw();
                let cross = (ux * vy - uy * vx).abs();
                let sine = cross / (p.distance(q) * p.distance(r));
                if sine < MIN_ANGLE_MARGIN {
                    return false;
                }
            }
        }
    }

    // No two segment lengths nearly equal (avoids near-isosceles layouts)
    let mut distances = Vec::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            distances.push(points[i].distance(&points[j]));
        }
    }
    for i in 0..distances.len() {
        for j in i + 1..distances.len() {
            if (distances[i] - distances[j]).abs() < MIN_DISTANCE_GAP {
                return false;
            }
        }
    }

    true
}

/// Evaluate every configuration object the picture does not yet hold,
/// recording coincidences with earlier objects.
fn evaluate_layer(
    mut picture: Picture,
    config: &Configuration,
) -> Result<PictureResult, GenerationError> {
    let mut duplicates = FxHashMap::default();

    for index in picture.len()..config.len() {
        let id = ObjectId(index as u32);
        let object = config
            .constructed_at(id)
            .expect("layer evaluation starts past the loose objects");

        let args: Vec<AnalyticObject> =
            object.args.iter().map(|arg| *picture.get(*arg)).collect();
        let outputs = match evaluate_construction(&object.construction, &args)? {
            Some(outputs) => outputs,
            None => return Ok(PictureResult::Undefined { object: id }),
        };

        let declared = object.construction.signature().output.len();
        if outputs.len() != declared {
            return Err(GenerationError::WrongOutputCount {
                construction: object.construction.id().to_string(),
                expected: declared,
                got: outputs.len(),
            });
        }
        let value = outputs[object.output_index as usize];

        for earlier in 0..index {
            if *picture.get(ObjectId(earlier as u32)) == value {
                duplicates.insert(id, ObjectId(earlier as u32));
                break;
            }
        }
        picture.push(value);
    }

    Ok(PictureResult::Done { picture, duplicates })
}

/// Combine per-picture results into one outcome per the priority order:
/// inconstructibility, duplicates, disagreement.
fn aggregate(results: Vec<PictureResult>) -> Result<RealizationOutcome, GenerationError> {
    let total = results.len();
    let undefined: Vec<ObjectId> = results
        .iter()
        .filter_map(|result| match result {
            PictureResult::Undefined { object } => Some(*object),
            PictureResult::Done { .. } => None,
        })
        .collect();

    if undefined.len() == total {
        return Ok(RealizationOutcome::Inconstructible);
    }
    if let Some(object) = undefined.first() {
        let details = format!(
            "object constructible in {} of {} pictures",
            total - undefined.len(),
            total
        );
        warn!(%object, %details, "inconsistent pictures");
        return Err(GenerationError::InconsistentPictures {
            object: *object,
            details,
        });
    }

    let mut pictures = Vec::with_capacity(total);
    let mut maps = Vec::with_capacity(total);
    for result in results {
        match result {
            PictureResult::Done { picture, duplicates } => {
                pictures.push(picture);
                maps.push(duplicates);
            }
            PictureResult::Undefined { .. } => unreachable!("filtered above"),
        }
    }

    let first = &maps[0];
    if let Some(object) = maps
        .iter()
        .flat_map(|map| map.keys())
        .find(|object| maps.iter().any(|map| map.get(*object) != first.get(*object)))
    {
        let details = format!(
            "pictures disagree on coincidence targets: {:?}",
            maps.iter().map(|map| map.get(object)).collect::<Vec<_>>()
        );
        warn!(%object, %details, "inconsistent pictures");
        return Err(GenerationError::InconsistentPictures {
            object: *object,
            details,
        });
    }

    if first.is_empty() {
        Ok(RealizationOutcome::Constructible(pictures))
    } else {
        debug!(duplicates = ?first, "all pictures agree on coincident objects");
        Ok(RealizationOutcome::Duplicates {
            pictures,
            duplicates: first.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstructedObject, PredefinedConstruction};

    fn triangle() -> Configuration {
        Configuration::new(vec![ObjectKind::Point; 3])
    }

    fn define(
        construction: PredefinedConstruction,
        args: &[u32],
    ) -> ConstructedObject {
        ConstructedObject::define(
            construction.into(),
            args.iter().map(|a| ObjectId(*a)).collect(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_midpoints_are_constructible() {
        let config = triangle()
            .extended(vec![
                define(PredefinedConstruction::Midpoint, &[1, 2]),
                define(PredefinedConstruction::Midpoint, &[0, 2]),
                define(PredefinedConstruction::Midpoint, &[0, 1]),
            ])
            .unwrap();

        let mut realizer = Realizer::seeded(PictureSettings::default(), 7);
        let outcome = realizer.realize(&config).unwrap();

        match outcome {
            RealizationOutcome::Constructible(pictures) => {
                assert_eq!(pictures.len(), DEFAULT_PICTURE_COUNT);
                assert!(pictures.iter().all(|p| p.len() == 6));
            }
            other => panic!("expected constructible, got {:?}", other),
        }
    }

    #[test]
    fn test_coincident_line_intersection_is_inconstructible() {
        // The parallel to line(A, B) through A is line(A, B) itself, so the
        // intersection of the two is undefined in every picture
        let two_points = Configuration::new(vec![ObjectKind::Point; 2]);
        let coincident = two_points
            .extended(vec![
                define(PredefinedConstruction::LineFromPoints, &[0, 1]),
                define(PredefinedConstruction::ParallelLine, &[0, 2]),
                define(PredefinedConstruction::IntersectionOfLines, &[2, 3]),
            ])
            .unwrap();

        let mut realizer = Realizer::seeded(PictureSettings::default(), 11);
        let outcome = realizer.realize(&coincident).unwrap();

        assert!(matches!(outcome, RealizationOutcome::Inconstructible));
    }

    #[test]
    fn test_agreed_duplicates_are_reported() {
        // The projection of the midpoint onto the line through the same two
        // points is the midpoint itself, in every picture
        let two_points = Configuration::new(vec![ObjectKind::Point; 2]);
        let config = two_points
            .extended(vec![
                define(PredefinedConstruction::LineFromPoints, &[0, 1]),
                define(PredefinedConstruction::Midpoint, &[0, 1]),
                define(PredefinedConstruction::PerpendicularProjection, &[3, 2]),
            ])
            .unwrap();

        let mut realizer = Realizer::seeded(PictureSettings::default(), 13);
        let outcome = realizer.realize(&config).unwrap();

        match outcome {
            RealizationOutcome::Duplicates { duplicates, .. } => {
                assert_eq!(duplicates.get(&ObjectId(4)), Some(&ObjectId(3)));
            }
            other => panic!("expected duplicates, got {:?}", other),
        }
    }

    #[test]
    fn test_extend_clones_previous_pictures() {
        let base = triangle()
            .extended(vec![define(PredefinedConstruction::Midpoint, &[1, 2])])
            .unwrap();

        let mut realizer = Realizer::seeded(PictureSettings::default(), 17);
        let pictures = match realizer.realize(&base).unwrap() {
            RealizationOutcome::Constructible(pictures) => pictures,
            other => panic!("expected constructible, got {:?}", other),
        };

        let extended_config = base
            .extended(vec![define(PredefinedConstruction::Midpoint, &[0, 2])])
            .unwrap();
        let outcome = realizer.extend(&pictures, &extended_config).unwrap();

        match outcome {
            RealizationOutcome::Constructible(extended) => {
                assert_eq!(extended.len(), pictures.len());
                for (old, new) in pictures.iter().zip(&extended) {
                    assert_eq!(new.len(), old.len() + 1);
                    // Earlier objects are untouched
                    for (id, value) in old.iter() {
                        assert_eq!(new.get(id), value);
                    }
                }
            }
            other => panic!("expected constructible, got {:?}", other),
        }
    }

    #[test]
    fn test_friendly_layout_rejects_degenerate_points() {
        let collinear = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.01),
        ];
        assert!(!friendly_layout(&collinear));

        let isosceles = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 3.0),
        ];
        assert!(!friendly_layout(&isosceles));

        let scalene = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(1.0, 3.0),
        ];
        assert!(friendly_layout(&scalene));
    }

    #[test]
    fn test_seeded_realizations_are_reproducible() {
        let config = triangle()
            .extended(vec![define(PredefinedConstruction::Midpoint, &[0, 1])])
            .unwrap();

        let run = |seed| {
            let mut realizer = Realizer::seeded(PictureSettings::default(), seed);
            match realizer.realize(&config).unwrap() {
                RealizationOutcome::Constructible(pictures) => pictures,
                other => panic!("expected constructible, got {:?}", other),
            }
        };

        let first = run(42);
        let second = run(42);
        for (a, b) in first.iter().zip(&second) {
            for (id, value) in a.iter() {
                assert_eq!(b.get(id), value, "Same seed must reproduce the same pictures");
            }
        }
    }
}
