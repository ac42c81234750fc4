//! Canonical keys, isomorphism and symmetry
//!
//! Two configurations are isomorphic when some kind-preserving relabeling of
//! their loose objects makes their recursive object representations equal.
//! The canonical key is the lexicographically least full representation over
//! every such relabeling; a hash set of keys then rejects duplicates in
//! amortized constant time per candidate.
//!
//! Loose objects render solely as their (remapped) position, never as a
//! coordinate; constructed objects render as their construction id applied
//! to the representations of their arguments, with the members of unordered
//! slots sorted. The whole-configuration representation sorts the
//! constructed-object strings, so construction order never matters.

use crate::error::GenerationError;
use crate::ir::{Configuration, ObjectId, ObjectKind, Slot};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// All kind-preserving permutations of the loose objects, each as a mapping
/// from loose index to remapped index. The identity mapping is included and
/// always first.
pub fn loose_permutations(loose: &[ObjectKind]) -> Vec<Vec<u32>> {
    let mut by_kind: FxHashMap<ObjectKind, Vec<u32>> = FxHashMap::default();
    for (index, kind) in loose.iter().enumerate() {
        by_kind.entry(*kind).or_default().push(index as u32);
    }

    let mut mappings = vec![vec![0u32; loose.len()]];
    for kind in ObjectKind::ALL {
        let Some(positions) = by_kind.get(&kind) else {
            continue;
        };
        let arrangements = permutations(positions);
        let mut next = Vec::with_capacity(mappings.len() * arrangements.len());
        for mapping in &mappings {
            for arrangement in &arrangements {
                let mut extended = mapping.clone();
                for (slot, target) in positions.iter().zip(arrangement) {
                    extended[*slot as usize] = *target;
                }
                next.push(extended);
            }
        }
        mappings = next;
    }

    // Identity first, so representation(identity) is computed once up front
    mappings.sort_by_key(|m| !is_identity(m));
    mappings
}

fn is_identity(mapping: &[u32]) -> bool {
    mapping.iter().enumerate().all(|(i, m)| *m == i as u32)
}

fn permutations(items: &[u32]) -> Vec<Vec<u32>> {
    if items.is_empty() {
        return vec![vec![]];
    }
    let mut result = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(index);
        for mut tail in permutations(&rest) {
            tail.insert(0, *item);
            result.push(tail);
        }
    }
    result
}

fn object_repr(
    config: &Configuration,
    id: ObjectId,
    mapping: &[u32],
    memo: &mut Vec<Option<Rc<String>>>,
) -> Rc<String> {
    if let Some(repr) = &memo[id.index()] {
        return repr.clone();
    }
    let repr = if id.index() < config.loose_count() {
        Rc::new(mapping[id.index()].to_string())
    } else {
        let object = config
            .constructed_at(id)
            .expect("position past the loose objects is constructed");
        let signature = object.construction.signature();
        let mut parts = Vec::with_capacity(signature.slots.len());
        let mut rest = object.args.as_slice();
        for slot in &signature.slots {
            let (group, tail) = rest.split_at(slot.arity());
            let mut reprs: Vec<String> = group
                .iter()
                .map(|arg| object_repr(config, *arg, mapping, memo).to_string())
                .collect();
            if matches!(slot, Slot::SetOf { .. }) {
                reprs.sort();
            }
            parts.push(reprs.join(","));
            rest = tail;
        }
        let body = parts.join(";");
        let text = if signature.output.len() > 1 {
            format!("{}[{}]({})", object.construction.id(), object.output_index, body)
        } else {
            format!("{}({})", object.construction.id(), body)
        };
        Rc::new(text)
    };
    memo[id.index()] = Some(repr.clone());
    repr
}

/// The full representation of a configuration under one loose remapping.
pub fn representation(config: &Configuration, mapping: &[u32]) -> String {
    let mut memo = vec![None; config.len()];
    let mut reprs: Vec<String> = (config.loose_count()..config.len())
        .map(|index| object_repr(config, ObjectId(index as u32), mapping, &mut memo).to_string())
        .collect();
    reprs.sort();

    let loose: String = config.loose().iter().map(ObjectKind::label).collect();
    format!("loose[{}]|{}", loose, reprs.join("|"))
}

/// The canonical key: the least representation over every kind-preserving
/// loose remapping.
pub fn canonical_key(config: &Configuration) -> Result<String, GenerationError> {
    let mappings = loose_permutations(config.loose());
    mappings
        .iter()
        .map(|mapping| representation(config, mapping))
        .min()
        .ok_or(GenerationError::CanonicalizationFailed)
}

/// Whether some non-identity loose remapping maps the configuration onto
/// itself.
pub fn is_symmetric(config: &Configuration) -> bool {
    let mappings = loose_permutations(config.loose());
    let identity = representation(config, &mappings[0]);
    mappings
        .iter()
        .skip(1)
        .any(|mapping| representation(config, mapping) == identity)
}

/// For each non-identity remapping, how many objects of each kind would
/// have to be added before the configuration closes under it.
///
/// A count of zero for some remapping means the configuration is already
/// symmetric; small counts mean a few more constructions could restore
/// symmetry. Used by the generator's symmetry-pruning lookahead.
pub fn missing_for_symmetry(config: &Configuration) -> Vec<FxHashMap<ObjectKind, usize>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Image {
        Existing(ObjectId),
        Virtual(u32),
    }

    fn render(image: Image) -> String {
        match image {
            Image::Existing(id) => format!("E{}", id.0),
            Image::Virtual(v) => format!("V{}", v),
        }
    }

    // Definition key over argument images, set slots sorted
    fn definition_key(
        config: &Configuration,
        id: ObjectId,
        image_of: impl Fn(ObjectId) -> Image,
    ) -> String {
        let object = config.constructed_at(id).expect("constructed position");
        let signature = object.construction.signature();
        let mut parts = Vec::new();
        let mut rest = object.args.as_slice();
        for slot in &signature.slots {
            let (group, tail) = rest.split_at(slot.arity());
            let mut rendered: Vec<String> =
                group.iter().map(|arg| render(image_of(*arg))).collect();
            if matches!(slot, Slot::SetOf { .. }) {
                rendered.sort();
            }
            parts.push(rendered.join(","));
            rest = tail;
        }
        format!(
            "{}|{}|{}",
            object.construction.id(),
            object.output_index,
            parts.join(";")
        )
    }

    // Index of existing definitions, keyed over their own argument ids
    let mut existing: FxHashMap<String, ObjectId> = FxHashMap::default();
    for index in config.loose_count()..config.len() {
        let id = ObjectId(index as u32);
        existing.insert(definition_key(config, id, Image::Existing), id);
    }

    let mappings = loose_permutations(config.loose());
    let mut result = Vec::new();

    for mapping in mappings.iter().skip(1) {
        let mut images: Vec<Image> = Vec::with_capacity(config.len());
        for index in 0..config.loose_count() {
            images.push(Image::Existing(ObjectId(mapping[index])));
        }

        let mut missing: FxHashMap<ObjectKind, usize> = FxHashMap::default();
        let mut fresh = 0u32;
        for index in config.loose_count()..config.len() {
            let id = ObjectId(index as u32);
            let object = config.constructed_at(id).expect("constructed position");

            let any_virtual = object
                .args
                .iter()
                .any(|arg| matches!(images[arg.index()], Image::Virtual(_)));
            let image = if any_virtual {
                None
            } else {
                let key = definition_key(config, id, |arg| images[arg.index()]);
                existing.get(&key).copied()
            };

            match image {
                Some(target) => images.push(Image::Existing(target)),
                None => {
                    *missing.entry(object.kind).or_insert(0) += 1;
                    images.push(Image::Virtual(fresh));
                    fresh += 1;
                }
            }
        }
        result.push(missing);
    }

    result
}
