//! Numeric realization engine
//!
//! Turns symbolic configurations into independent random coordinate
//! assignments and aggregates their outcomes: constructible, agreed
//! duplicates, inconstructible, or inconsistent.

pub mod evaluate;
pub mod picture;
pub mod realizer;

pub use evaluate::evaluate_construction;
pub use picture::{AnalyticObject, Picture};
pub use realizer::{
    LooseObjectStyle, PictureSettings, RealizationOutcome, Realizer, DEFAULT_PICTURE_COUNT,
};
