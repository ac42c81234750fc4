//! Geoforge Core
//!
//! Systematic discovery of geometric theorems: build configurations of
//! points, lines and circles from a few loose objects, extend them with
//! constructions, realize each configuration against several independent
//! random coordinate assignments, and report the relationships that hold
//! in every realization.

pub mod error;      // Fatal error taxonomy
pub mod geometry;   // Analytic geometry kernel (rounded comparisons)
pub mod ir;         // Symbolic configurations and the construction catalog
pub mod canonical;  // Canonical keys, isomorphism and symmetry
pub mod pictures;   // Numeric realization engine
pub mod contextual; // Cross-realization object index
pub mod theorems;   // Theorem types and the candidate finder
pub mod search;     // Depth-first configuration generator

pub use error::GenerationError;
pub use geometry::{Circle, Line, Point, Rounded, DEFAULT_PRECISION};
pub use ir::{
    ComposedConstruction, Configuration, ConstructedObject, Construction, ObjectId, ObjectKind,
    PredefinedConstruction, Signature, Slot,
};
pub use canonical::{canonical_key, is_symmetric};
pub use contextual::{CircleRef, ContextualPicture, LineRef, ObjectFilter, PointRef};
pub use pictures::{
    AnalyticObject, LooseObjectStyle, Picture, PictureSettings, RealizationOutcome, Realizer,
};
pub use search::{
    GeneratedConfiguration, Generator, GeneratorSettings, GeneratorStats, ObjectCounts,
    SymmetryFilter,
};
pub use theorems::{
    find_theorems, IncidenceTarget, Segment, Theorem, TheoremKind, TheoremScope, TheoremStore,
};
