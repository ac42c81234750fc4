//! Fatal error taxonomy
//!
//! Only conditions that indicate a logic defect or an untrustworthy picture
//! count surface as errors. A construction that is undefined for a single
//! realization is handled inside the realization engine and never escapes.

use crate::ir::ObjectId;
use thiserror::Error;

/// Errors that abort processing of the current candidate configuration.
///
/// These always propagate to the caller so an external tracer can record
/// the offending configuration; they are never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Independent realizations disagree about which objects coincide or
    /// whether an object is constructible at all. Either the picture count
    /// is too low to be trustworthy or there is a logic defect.
    #[error("pictures disagree about object {object:?}: {details}")]
    InconsistentPictures { object: ObjectId, details: String },

    /// A construction produced a different number of outputs than its
    /// declared output arity.
    #[error("construction '{construction}' produced {got} outputs, expected {expected}")]
    WrongOutputCount {
        construction: String,
        expected: usize,
        got: usize,
    },

    /// Arguments passed to a construction do not match its signature.
    #[error("invalid arguments for construction '{construction}': {details}")]
    InvalidArguments {
        construction: String,
        details: String,
    },

    /// Canonicalization found no valid loose-object remapping.
    #[error("canonicalization failed: no valid loose-object remapping")]
    CanonicalizationFailed,

    /// The initial configuration handed to the generator did not realize
    /// as constructible.
    #[error("initial configuration rejected: {0}")]
    InitialConfiguration(String),
}
