//! End-to-end scenario: the medial triangle
//!
//! Three loose points A, B, C; midpoints D = mid(B, C), E = mid(A, C),
//! F = mid(A, B). The search must reach the medial configuration, and the
//! classical facts must hold in every picture: each midsegment is parallel
//! to the opposite side, the midpoints halve their segments, and the
//! medians are concurrent.

use geoforge_core::{
    Configuration, ContextualPicture, GeneratedConfiguration, Generator, GeneratorSettings,
    LineRef, ObjectCounts, ObjectId, ObjectKind, PictureSettings, PointRef,
    PredefinedConstruction, Segment, SymmetryFilter, Theorem, TheoremStore,
};

fn midpoint_search(iterations: usize, seed: u64) -> Generator {
    let settings = GeneratorSettings {
        constructions: vec![PredefinedConstruction::Midpoint.into()],
        iterations,
        max_objects: ObjectCounts::default(),
        symmetry: SymmetryFilter::All,
        pictures: PictureSettings::default(),
        seed: Some(seed),
    };
    Generator::new(
        Configuration::new(vec![ObjectKind::Point; 3]),
        settings,
    )
    .unwrap()
}

fn line_through(cp: &ContextualPicture, a: PointRef, b: PointRef) -> LineRef {
    *cp.lines_through(a)
        .iter()
        .find(|line| cp.line(**line).points.binary_search(&b).is_ok())
        .expect("every tracked point pair has a line")
}

/// The configuration whose three midpoints all take loose arguments.
fn find_medial(accepted: &[GeneratedConfiguration]) -> &GeneratedConfiguration {
    accepted
        .iter()
        .find(|generated| {
            generated.iteration == 3
                && generated
                    .configuration
                    .constructed()
                    .iter()
                    .all(|object| object.args.iter().all(|arg| arg.index() < 3))
        })
        .expect("the medial triangle is reachable in three midpoint iterations")
}

#[test]
fn medial_triangle_is_generated_with_its_theorems() {
    let mut generator = midpoint_search(3, 2024);
    let accepted: Vec<GeneratedConfiguration> =
        generator.by_ref().map(Result::unwrap).collect();

    let medial = find_medial(&accepted);
    let cp = &medial.contextual;

    let mut all_theorems = medial.old_theorems.clone();
    all_theorems.merge(&medial.new_theorems);

    let point = |id: u32| cp.point_of(ObjectId(id)).unwrap();
    let (a, b, c) = (point(0), point(1), point(2));

    // The three midpoints, matched by their argument pairs
    let mid_of = |x: u32, y: u32| {
        let offset = medial
            .configuration
            .constructed()
            .iter()
            .position(|object| {
                let mut args = object.args.clone();
                args.sort();
                args == vec![ObjectId(x.min(y)), ObjectId(x.max(y))]
            })
            .expect("each midpoint is present");
        cp.point_of(ObjectId(3 + offset as u32)).unwrap()
    };
    let d = mid_of(1, 2);
    let e = mid_of(0, 2);
    let f = mid_of(0, 1);

    // Midsegments parallel to the opposite sides
    for (side, midsegment) in [
        (line_through(cp, b, c), line_through(cp, e, f)),
        (line_through(cp, a, c), line_through(cp, d, f)),
        (line_through(cp, a, b), line_through(cp, d, e)),
    ] {
        assert!(
            all_theorems.contains(&Theorem::ParallelLines(side, midsegment)),
            "midsegment parallel to the opposite side must be found"
        );
    }

    // Midpoints halve their segments
    assert!(all_theorems.contains(&Theorem::EqualLineSegments(
        Segment::new(a, f),
        Segment::new(f, b),
    )));

    // Medians are concurrent at the (untracked) centroid
    assert!(all_theorems.contains(&Theorem::ConcurrentLines(
        line_through(cp, a, d),
        line_through(cp, b, e),
        line_through(cp, c, f),
    )));
}

#[test]
fn new_theorems_accumulate_monotonically() {
    let mut generator = midpoint_search(3, 99);
    let accepted: Vec<GeneratedConfiguration> =
        generator.by_ref().map(Result::unwrap).collect();

    // Depth-first order: an item at depth d+1 extends the most recent item
    // at depth d
    let mut last_at_depth: Vec<Option<&GeneratedConfiguration>> = vec![None; 4];
    for generated in &accepted {
        if generated.iteration > 1 {
            let parent = last_at_depth[generated.iteration - 1]
                .expect("a deeper item always follows its parent");
            let mut parent_theorems = parent.old_theorems.clone();
            parent_theorems.merge(&parent.new_theorems);

            for theorem in parent_theorems.iter() {
                assert!(
                    generated.old_theorems.contains(theorem),
                    "theorems found at an earlier iteration must persist: {:?}",
                    theorem
                );
            }
        }
        last_at_depth[generated.iteration] = Some(generated);
    }
}

#[test]
fn new_theorems_never_repeat_old_ones() {
    let mut generator = midpoint_search(2, 7);
    for item in generator.by_ref() {
        let generated = item.unwrap();
        for theorem in generated.new_theorems.iter() {
            assert!(
                !generated.old_theorems.contains(theorem),
                "a theorem cannot be both old and new: {:?}",
                theorem
            );
        }
    }
}

#[test]
fn same_seed_reproduces_the_search() {
    let collect = |seed: u64| {
        let generator = midpoint_search(2, seed);
        generator
            .map(Result::unwrap)
            .map(|g| {
                (
                    g.iteration,
                    geoforge_core::canonical_key(&g.configuration).unwrap(),
                    g.new_theorems.len(),
                )
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(collect(4242), collect(4242));
}

#[test]
fn initial_triangle_has_no_theorems() {
    let generator = midpoint_search(1, 55);
    assert!(
        generator.initial_theorems().is_empty(),
        "a generation-friendly scalene triangle satisfies nothing nontrivial"
    );
}

#[test]
fn theorem_identity_is_order_independent() {
    let mut generator = midpoint_search(1, 31);
    let generated = generator.next().unwrap().unwrap();

    let mut all = TheoremStore::new();
    all.merge(&generated.old_theorems);
    all.merge(&generated.new_theorems);

    for theorem in all.iter() {
        if let Theorem::EqualLineSegments(s1, s2) = theorem {
            assert!(
                all.contains(&Theorem::EqualLineSegments(*s2, *s1)),
                "equality theorems are symmetric in their segments"
            );
        }
    }
}
