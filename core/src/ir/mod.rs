//! Symbolic configurations and the construction catalog
//!
//! Objects are arena-indexed by position; constructions are a closed tagged
//! variant with declarative signatures. Nothing in this module touches
//! coordinates: symbolic identity is structural, never numeric.

pub mod configuration;
pub mod constructions;
pub mod objects;

pub use configuration::{Configuration, ConstructedObject};
pub use constructions::{
    ComposedConstruction, Construction, PredefinedConstruction, Signature, Slot,
};
pub use objects::{ObjectId, ObjectKind};
