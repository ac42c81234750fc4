//! Depth-first configuration generator
//!
//! Expands a frontier of configurations by applying allowed constructions
//! to tuples of existing objects, canonicalizes each candidate to reject
//! isomorphic duplicates, optionally prunes branches that can never become
//! symmetric again, and gates every survivor through the realization
//! engine. Output is a lazy iterator; stopping the search is simply not
//! pulling the next item.

pub mod generator;
pub mod symmetry;

pub use generator::{GeneratedConfiguration, Generator, GeneratorStats};
pub use symmetry::could_become_symmetric;

use crate::ir::{Construction, ObjectKind};
use crate::pictures::PictureSettings;
use serde::{Deserialize, Serialize};

/// Caps on how many constructed objects of each kind a configuration may
/// accumulate over a whole search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCounts {
    pub points: usize,
    pub lines: usize,
    pub circles: usize,
}

impl ObjectCounts {
    /// The same cap for every kind.
    pub fn uniform(count: usize) -> Self {
        Self {
            points: count,
            lines: count,
            circles: count,
        }
    }

    pub fn get(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Point => self.points,
            ObjectKind::Line => self.lines,
            ObjectKind::Circle => self.circles,
        }
    }
}

impl Default for ObjectCounts {
    fn default() -> Self {
        Self::uniform(usize::MAX)
    }
}

/// Whether to keep every branch or only those that are symmetric or could
/// still become symmetric within the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymmetryFilter {
    All,
    SymmetricOnly,
}

/// Settings for one generator run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// The constructions the generator may apply.
    pub constructions: Vec<Construction>,
    /// Maximum number of extension iterations.
    pub iterations: usize,
    /// Per-kind caps on constructed objects.
    pub max_objects: ObjectCounts,
    pub symmetry: SymmetryFilter,
    pub pictures: PictureSettings,
    /// Seed for the run's random source; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl GeneratorSettings {
    /// Settings with the whole predefined catalog enabled.
    pub fn with_full_catalog(iterations: usize) -> Self {
        Self {
            constructions: crate::ir::PredefinedConstruction::ALL
                .iter()
                .map(|c| Construction::Predefined(*c))
                .collect(),
            iterations,
            max_objects: ObjectCounts::default(),
            symmetry: SymmetryFilter::All,
            pictures: PictureSettings::default(),
            seed: None,
        }
    }
}
