//! Symbolic configurations
//!
//! A configuration is an ordered arena: loose objects first, constructed
//! objects after, each referring only to strictly earlier positions. The
//! ordering invariant makes the argument graph acyclic by construction.

use super::constructions::{Construction, Slot};
use super::objects::{ObjectId, ObjectKind};
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

/// An object produced by applying a construction to earlier objects.
///
/// Owns its construction and argument positions; it never holds references
/// back into the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructedObject {
    pub construction: Construction,
    /// Flat argument list in slot order; members of a `SetOf` slot appear
    /// in ascending position order.
    pub args: Vec<ObjectId>,
    /// Which of the construction's outputs this object is.
    pub output_index: u32,
    /// The geometric kind, taken from the signature's output list.
    pub kind: ObjectKind,
}

impl ConstructedObject {
    /// Define an object as one output of a construction application.
    ///
    /// Checks the output index against the declared output arity; argument
    /// kinds are checked when the object is placed into a configuration.
    pub fn define(
        construction: Construction,
        args: Vec<ObjectId>,
        output_index: u32,
    ) -> Result<Self, GenerationError> {
        let signature = construction.signature();
        let kind = *signature.output.get(output_index as usize).ok_or_else(|| {
            GenerationError::InvalidArguments {
                construction: construction.id().to_string(),
                details: format!(
                    "output index {} out of declared arity {}",
                    output_index,
                    signature.output.len()
                ),
            }
        })?;
        Ok(Self {
            construction,
            args,
            output_index,
            kind,
        })
    }

    /// Arguments with every `SetOf` group sorted, so that definitional
    /// equality ignores the order within unordered slots.
    pub fn normalized_args(&self) -> Vec<ObjectId> {
        let mut result = Vec::with_capacity(self.args.len());
        let mut rest = self.args.as_slice();
        for slot in &self.construction.signature().slots {
            let (group, tail) = rest.split_at(slot.arity().min(rest.len()));
            let mut group = group.to_vec();
            if matches!(slot, Slot::SetOf { .. }) {
                group.sort();
            }
            result.extend(group);
            rest = tail;
        }
        result.extend(rest.iter().copied());
        result
    }

    /// Whether two objects are definitionally identical: same construction,
    /// same argument multiset (per slot) and same output index.
    pub fn same_definition(&self, other: &Self) -> bool {
        self.construction == other.construction
            && self.output_index == other.output_index
            && self.normalized_args() == other.normalized_args()
    }
}

/// An ordered list of loose objects plus an ordered list of constructed
/// objects. No two objects may be definitionally identical; the
/// canonicalization step enforces this across isomorphic orderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    loose: Vec<ObjectKind>,
    constructed: Vec<ConstructedObject>,
    /// How many constructed objects the most recent extension appended.
    last_added: usize,
}

impl Configuration {
    /// A configuration of loose objects only.
    pub fn new(loose: Vec<ObjectKind>) -> Self {
        Self {
            loose,
            constructed: Vec::new(),
            last_added: 0,
        }
    }

    /// A configuration with constructed objects, validated against the
    /// ordering and signature invariants. All constructed objects count as
    /// the latest layer.
    pub fn with_constructed(
        loose: Vec<ObjectKind>,
        constructed: Vec<ConstructedObject>,
    ) -> Result<Self, GenerationError> {
        let last_added = constructed.len();
        let config = Self {
            loose,
            constructed,
            last_added,
        };
        config.validate()?;
        Ok(config)
    }

    /// The configuration extended by one layer of constructed objects.
    pub fn extended(&self, added: Vec<ConstructedObject>) -> Result<Self, GenerationError> {
        let mut constructed = self.constructed.clone();
        let last_added = added.len();
        constructed.extend(added);
        let config = Self {
            loose: self.loose.clone(),
            constructed,
            last_added,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GenerationError> {
        for (offset, object) in self.constructed.iter().enumerate() {
            let position = self.loose.len() + offset;
            for arg in &object.args {
                if arg.index() >= position {
                    return Err(GenerationError::InvalidArguments {
                        construction: object.construction.id().to_string(),
                        details: format!(
                            "argument {} does not precede position {}",
                            arg, position
                        ),
                    });
                }
            }
            let kinds: Vec<ObjectKind> =
                object.args.iter().map(|arg| self.object_kind(*arg)).collect();
            if !object.construction.signature().matches(&kinds) {
                return Err(GenerationError::InvalidArguments {
                    construction: object.construction.id().to_string(),
                    details: format!("argument kinds {:?} do not match the signature", kinds),
                });
            }
        }
        Ok(())
    }

    pub fn loose(&self) -> &[ObjectKind] {
        &self.loose
    }

    pub fn loose_count(&self) -> usize {
        self.loose.len()
    }

    pub fn constructed(&self) -> &[ConstructedObject] {
        &self.constructed
    }

    /// Total number of objects, loose and constructed.
    pub fn len(&self) -> usize {
        self.loose.len() + self.constructed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loose.is_empty() && self.constructed.is_empty()
    }

    /// All object positions in order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.len() as u32).map(ObjectId)
    }

    /// The kind of the object at a position.
    ///
    /// Panics on an out-of-range id; ids are only ever produced by the
    /// configuration itself.
    pub fn object_kind(&self, id: ObjectId) -> ObjectKind {
        let index = id.index();
        if index < self.loose.len() {
            self.loose[index]
        } else {
            self.constructed[index - self.loose.len()].kind
        }
    }

    /// The constructed object at a position, if the position is constructed.
    pub fn constructed_at(&self, id: ObjectId) -> Option<&ConstructedObject> {
        id.index()
            .checked_sub(self.loose.len())
            .and_then(|offset| self.constructed.get(offset))
    }

    /// All positions holding objects of a kind.
    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.ids().filter(|id| self.object_kind(*id) == kind).collect()
    }

    /// Whether some object already has this definition.
    pub fn contains_definition(&self, object: &ConstructedObject) -> bool {
        self.constructed.iter().any(|c| c.same_definition(object))
    }

    /// How many constructed objects the most recent extension appended.
    pub fn last_added(&self) -> usize {
        self.last_added
    }

    /// Whether the object at a position belongs to the latest layer.
    pub fn is_new(&self, id: ObjectId) -> bool {
        id.index() >= self.len() - self.last_added
    }

    /// Number of constructed objects of a kind (loose objects excluded);
    /// used against the per-kind caps on added objects.
    pub fn constructed_count_of_kind(&self, kind: ObjectKind) -> usize {
        self.constructed.iter().filter(|c| c.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PredefinedConstruction;

    fn triangle() -> Configuration {
        Configuration::new(vec![ObjectKind::Point, ObjectKind::Point, ObjectKind::Point])
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
    fn test_extension_and_kinds() {
        let config = triangle().extended(vec![midpoint(0, 1)]).unwrap();

        assert_eq!(config.len(), 4);
        assert_eq!(config.object_kind(ObjectId(3)), ObjectKind::Point);
        assert_eq!(config.last_added(), 1);
        assert!(config.is_new(ObjectId(3)));
        assert!(!config.is_new(ObjectId(0)));
    }

    #[test]
    fn test_forward_reference_rejected() {
        let object = midpoint(0, 3); // refers to its own position
        let result = triangle().extended(vec![object]);

        assert!(matches!(
            result,
            Err(GenerationError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let config = Configuration::new(vec![ObjectKind::Line, ObjectKind::Line]);
        let result = config.extended(vec![midpoint(0, 1)]);

        assert!(matches!(
            result,
            Err(GenerationError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_definitional_equality_ignores_set_order() {
        let ab = midpoint(0, 1);
        let ba = ConstructedObject::define(
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(1), ObjectId(0)],
            0,
        )
        .unwrap();

        assert!(ab.same_definition(&ba));
    }

    #[test]
    fn test_ordered_slots_stay_ordered() {
        let reflect = |subject: u32, center: u32| {
            ConstructedObject::define(
                PredefinedConstruction::PointReflection.into(),
                vec![ObjectId(subject), ObjectId(center)],
                0,
            )
            .unwrap()
        };

        assert!(!reflect(0, 1).same_definition(&reflect(1, 0)));
    }

    #[test]
    fn test_contains_definition() {
        let config = triangle().extended(vec![midpoint(0, 1)]).unwrap();

        assert!(config.contains_definition(&midpoint(1, 0)));
        assert!(!config.contains_definition(&midpoint(1, 2)));
    }

    #[test]
    fn test_invalid_output_index() {
        let result = ConstructedObject::define(
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
            1,
        );

        assert!(matches!(
            result,
            Err(GenerationError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_objects_of_kind() {
        let config = triangle().extended(vec![midpoint(0, 1)]).unwrap();

        assert_eq!(config.objects_of_kind(ObjectKind::Point).len(), 4);
        assert!(config.objects_of_kind(ObjectKind::Line).is_empty());
    }
}
