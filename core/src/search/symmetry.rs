//! Symmetry-pruning lookahead
//!
//! A branch may only be discarded when it is certain that no extension
//! within the remaining budget can make the configuration symmetric again.
//! The check is conservative in the keep direction: it compares, for every
//! non-identity loose remapping, the objects that would have to be added to
//! close the configuration under it against the remaining iteration and
//! per-kind object budgets.

use super::ObjectCounts;
use crate::canonical::missing_for_symmetry;
use crate::ir::{Configuration, ObjectKind};

/// Whether the configuration is symmetric or could still become symmetric
/// within the remaining budget.
///
/// `max_outputs` is the largest output arity among the allowed
/// constructions: one iteration adds one construction application, which
/// adds at most that many objects.
pub fn could_become_symmetric(
    config: &Configuration,
    remaining_iterations: usize,
    remaining_caps: &ObjectCounts,
    max_outputs: usize,
) -> bool {
    let capacity = remaining_iterations.saturating_mul(max_outputs);
    missing_for_symmetry(config).iter().any(|missing| {
        let total: usize = missing.values().sum();
        total <= capacity
            && ObjectKind::ALL.iter().all(|kind| {
                missing.get(kind).copied().unwrap_or(0) <= remaining_caps.get(*kind)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstructedObject, ObjectId, PredefinedConstruction};

    fn triangle() -> Configuration {
        Configuration::new(vec![ObjectKind::Point; 3])
    }

    fn midpoint(a: u32, b: u32) -> ConstructedObject {
        ConstructedObject::define(
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(a), ObjectId(b)],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_symmetric_configuration_always_passes() {
        let config = triangle().extended(vec![midpoint(1, 2)]).unwrap();

        // mid(B, C) is fixed by the B<->C swap, so zero budget suffices
        assert!(could_become_symmetric(
            &config,
            0,
            &ObjectCounts::uniform(0),
            1
        ));
    }

    fn reflection(subject: u32, center: u32) -> ConstructedObject {
        ConstructedObject::define(
            PredefinedConstruction::PointReflection.into(),
            vec![ObjectId(subject), ObjectId(center)],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_asymmetric_branch_needs_iterations() {
        // reflect(A, B) is fixed by no remapping; the A<->B swap closes
        // once reflect(B, A) is added
        let config = triangle().extended(vec![reflection(0, 1)]).unwrap();

        assert!(
            !could_become_symmetric(&config, 0, &ObjectCounts::uniform(10), 1),
            "No remaining iterations, and the configuration is not symmetric"
        );
        assert!(could_become_symmetric(&config, 1, &ObjectCounts::uniform(10), 1));
    }

    #[test]
    fn test_per_kind_cap_blocks_restoration() {
        let config = triangle().extended(vec![reflection(0, 1)]).unwrap();

        // Plenty of iterations, but no point may be added any more
        assert!(!could_become_symmetric(
            &config,
            5,
            &ObjectCounts {
                points: 0,
                lines: 10,
                circles: 10
            },
            1
        ));
    }
}
