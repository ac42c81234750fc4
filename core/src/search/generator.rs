//! The depth-first configuration generator
//!
//! An explicit-stack iterator: one frame per extension depth holding the
//! configuration, its pictures and contextual index, the theorems known on
//! the path, and the pending candidate list. Backtracking pops a frame and
//! releases that depth's state; memory stays bounded by the iteration
//! budget regardless of how many configurations the search visits.

use super::symmetry::could_become_symmetric;
use super::{GeneratorSettings, ObjectCounts, SymmetryFilter};
use crate::canonical::canonical_key;
use crate::contextual::ContextualPicture;
use crate::error::GenerationError;
use crate::ir::{Configuration, ConstructedObject, Construction, ObjectId, ObjectKind, Slot};
use crate::pictures::{RealizationOutcome, Realizer};
use crate::theorems::{find_theorems, TheoremScope, TheoremStore};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, warn};

/// One accepted configuration together with everything an external
/// ranking or proving collaborator needs.
#[derive(Debug, Clone)]
pub struct GeneratedConfiguration {
    pub configuration: Configuration,
    pub contextual: ContextualPicture,
    /// Theorems already true before the latest extension.
    pub old_theorems: TheoremStore,
    /// Theorems newly true because of it.
    pub new_theorems: TheoremStore,
    /// Extension depth, starting at 1.
    pub iteration: usize,
}

/// Counters over one generator run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GeneratorStats {
    /// Candidate extensions examined.
    pub candidates: usize,
    /// Candidates rejected as isomorphic to an earlier configuration.
    pub duplicate_keys: usize,
    /// Branches pruned by the symmetry lookahead.
    pub asymmetric_pruned: usize,
    /// Candidates undefined in every picture.
    pub inconstructible: usize,
    /// Candidates where all pictures agree two objects coincide.
    pub same_objects: usize,
    /// Fatal errors surfaced to the caller.
    pub errors: usize,
    /// Configurations yielded.
    pub accepted: usize,
}

/// A pending extension: one construction applied to one argument tuple.
#[derive(Debug, Clone)]
struct Candidate {
    construction: Construction,
    args: Vec<ObjectId>,
}

/// Per-depth search state.
struct Frame {
    config: Configuration,
    contextual: ContextualPicture,
    theorems: TheoremStore,
    candidates: Vec<Candidate>,
    next: usize,
    depth: usize,
}

/// Lazy depth-first search over configuration extensions.
///
/// Each call to `next` runs until it can yield one accepted configuration
/// (or a fatal error to trace); dropping the iterator cancels the search.
pub struct Generator {
    settings: GeneratorSettings,
    realizer: Realizer,
    /// Canonical keys of every configuration seen in this run. Owned by the
    /// run; independent searches never share it.
    seen: FxHashSet<String>,
    stack: Vec<Frame>,
    initial_theorems: TheoremStore,
    max_outputs: usize,
    stats: GeneratorStats,
}

impl Generator {
    /// Realize the initial configuration and set up the search.
    pub fn new(
        initial: Configuration,
        settings: GeneratorSettings,
    ) -> Result<Self, GenerationError> {
        let mut realizer = match settings.seed {
            Some(seed) => Realizer::seeded(settings.pictures, seed),
            None => Realizer::new(settings.pictures),
        };

        let pictures = match realizer.realize(&initial)? {
            RealizationOutcome::Constructible(pictures) => pictures,
            RealizationOutcome::Inconstructible => {
                return Err(GenerationError::InitialConfiguration(
                    "not constructible in any picture".to_string(),
                ))
            }
            RealizationOutcome::Duplicates { duplicates, .. } => {
                return Err(GenerationError::InitialConfiguration(format!(
                    "contains coincident objects: {:?}",
                    duplicates
                )))
            }
        };

        let contextual = ContextualPicture::build(pictures, &initial)?;
        let initial_theorems = find_theorems(&contextual, &initial, TheoremScope::All);

        let max_outputs = settings
            .constructions
            .iter()
            .map(|c| c.signature().output.len())
            .max()
            .unwrap_or(1);

        let mut seen = FxHashSet::default();
        seen.insert(canonical_key(&initial)?);

        let candidates = if settings.iterations > 0 {
            enumerate_candidates(&initial, &settings.constructions)
        } else {
            Vec::new()
        };

        Ok(Self {
            settings,
            realizer,
            seen,
            stack: vec![Frame {
                config: initial,
                contextual,
                theorems: initial_theorems.clone(),
                candidates,
                next: 0,
                depth: 0,
            }],
            initial_theorems,
            max_outputs,
            stats: GeneratorStats::default(),
        })
    }

    /// The theorems true in the initial configuration.
    pub fn initial_theorems(&self) -> &TheoremStore {
        &self.initial_theorems
    }

    pub fn stats(&self) -> &GeneratorStats {
        &self.stats
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Run one candidate through the whole pipeline. `Ok(None)` means the
    /// candidate was rejected for a normal reason.
    fn process_candidate(
        &mut self,
        candidate: Candidate,
    ) -> Result<Option<GeneratedConfiguration>, GenerationError> {
        self.stats.candidates += 1;

        let output_arity = candidate.construction.signature().output.len();
        let objects: Vec<ConstructedObject> = (0..output_arity)
            .map(|index| {
                ConstructedObject::define(
                    candidate.construction.clone(),
                    candidate.args.clone(),
                    index as u32,
                )
            })
            .collect::<Result<_, _>>()?;

        let (child_config, depth) = {
            let parent = self.stack.last().expect("a frame is being processed");
            if objects
                .iter()
                .any(|object| parent.config.contains_definition(object))
            {
                return Ok(None);
            }
            for kind in ObjectKind::ALL {
                let added = objects.iter().filter(|o| o.kind == kind).count();
                if added > 0
                    && parent.config.constructed_count_of_kind(kind) + added
                        > self.settings.max_objects.get(kind)
                {
                    return Ok(None);
                }
            }
            (parent.config.extended(objects)?, parent.depth + 1)
        };

        // Isomorphism rejection via the canonical key
        let key = canonical_key(&child_config)?;
        if !self.seen.insert(key) {
            self.stats.duplicate_keys += 1;
            return Ok(None);
        }

        if self.settings.symmetry == SymmetryFilter::SymmetricOnly {
            let remaining = self.settings.iterations - depth;
            let caps = &self.settings.max_objects;
            let remaining_caps = ObjectCounts {
                points: caps
                    .points
                    .saturating_sub(child_config.constructed_count_of_kind(ObjectKind::Point)),
                lines: caps
                    .lines
                    .saturating_sub(child_config.constructed_count_of_kind(ObjectKind::Line)),
                circles: caps
                    .circles
                    .saturating_sub(child_config.constructed_count_of_kind(ObjectKind::Circle)),
            };
            if !could_become_symmetric(&child_config, remaining, &remaining_caps, self.max_outputs)
            {
                self.stats.asymmetric_pruned += 1;
                return Ok(None);
            }
        }

        // Constructibility gate
        let outcome = {
            let parent = self.stack.last().expect("a frame is being processed");
            self.realizer
                .extend(parent.contextual.pictures(), &child_config)?
        };
        let pictures = match outcome {
            RealizationOutcome::Inconstructible => {
                self.stats.inconstructible += 1;
                return Ok(None);
            }
            RealizationOutcome::Duplicates { duplicates, .. } => {
                self.stats.same_objects += 1;
                debug!(
                    ?duplicates,
                    construction = %candidate.construction,
                    "rejected: objects coincide in every picture"
                );
                return Ok(None);
            }
            RealizationOutcome::Constructible(pictures) => pictures,
        };

        let (contextual, old_theorems) = {
            let parent = self.stack.last().expect("a frame is being processed");
            (
                parent.contextual.extend(pictures, &child_config)?,
                parent.theorems.clone(),
            )
        };
        let new_theorems = find_theorems(&contextual, &child_config, TheoremScope::NewOnly)
            .difference(&old_theorems);

        self.stats.accepted += 1;

        if depth < self.settings.iterations {
            let mut theorems = old_theorems.clone();
            theorems.merge(&new_theorems);
            self.stack.push(Frame {
                config: child_config.clone(),
                contextual: contextual.clone(),
                theorems,
                candidates: enumerate_candidates(&child_config, &self.settings.constructions),
                next: 0,
                depth,
            });
        }

        Ok(Some(GeneratedConfiguration {
            configuration: child_config,
            contextual,
            old_theorems,
            new_theorems,
            iteration: depth,
        }))
    }
}

impl Iterator for Generator {
    type Item = Result<GeneratedConfiguration, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stack.is_empty() {
                return None;
            }
            let top = self.stack.len() - 1;
            if self.stack[top].next >= self.stack[top].candidates.len() {
                self.stack.pop();
                continue;
            }
            let index = self.stack[top].next;
            self.stack[top].next += 1;
            let candidate = self.stack[top].candidates[index].clone();
            let construction = candidate.construction.clone();
            let depth = self.stack[top].depth + 1;

            match self.process_candidate(candidate) {
                Ok(Some(generated)) => return Some(Ok(generated)),
                Ok(None) => continue,
                Err(error) => {
                    // Surface the failure with its candidate context for the
                    // caller's tracer; the search itself moves on
                    warn!(%construction, depth, %error, "candidate failed");
                    self.stats.errors += 1;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Every way of applying an allowed construction to the configuration's
/// objects: unordered slots expand as combinations, and all arguments of
/// one application are pairwise distinct.
fn enumerate_candidates(
    config: &Configuration,
    constructions: &[Construction],
) -> Vec<Candidate> {
    let mut result = Vec::new();
    for construction in constructions {
        let signature = construction.signature();
        let slot_choices: Vec<Vec<Vec<ObjectId>>> = signature
            .slots
            .iter()
            .map(|slot| {
                let pool = config.objects_of_kind(slot.kind());
                match slot {
                    Slot::Single(_) => pool.iter().map(|id| vec![*id]).collect(),
                    Slot::SetOf { size, .. } => combinations(&pool, *size as usize),
                }
            })
            .collect();

        let mut args = Vec::with_capacity(signature.arity());
        let mut tuples = Vec::new();
        product(&slot_choices, &mut args, &mut tuples);
        result.extend(tuples.into_iter().map(|args| Candidate {
            construction: construction.clone(),
            args,
        }));
    }
    result
}

fn product(
    slot_choices: &[Vec<Vec<ObjectId>>],
    current: &mut Vec<ObjectId>,
    out: &mut Vec<Vec<ObjectId>>,
) {
    let Some((first, rest)) = slot_choices.split_first() else {
        out.push(current.clone());
        return;
    };
    for choice in first {
        if choice.iter().any(|id| current.contains(id)) {
            continue;
        }
        current.extend(choice);
        product(rest, current, out);
        current.truncate(current.len() - choice.len());
    }
}

/// All ascending `k`-combinations of the pool.
fn combinations(pool: &[ObjectId], k: usize) -> Vec<Vec<ObjectId>> {
    if k == 0 {
        return vec![vec![]];
    }
    if pool.len() < k {
        return Vec::new();
    }
    let mut result = Vec::new();
    for (index, id) in pool.iter().enumerate() {
        for mut tail in combinations(&pool[index + 1..], k - 1) {
            tail.insert(0, *id);
            result.push(tail);
        }
    }
    result
}
