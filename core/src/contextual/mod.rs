//! Cross-realization object index
//!
//! Groups the raw analytic values of all pictures into identity-tracked
//! geometric objects, tagged old or new relative to the latest extension.
//! The theorem finder and the generator's consistency checks only ever go
//! through this index.

pub mod objects;
pub mod store;

pub use objects::{CircleObject, CircleRef, LineObject, LineRef, ObjectFilter, PointObject, PointRef};
pub use store::ContextualPicture;
