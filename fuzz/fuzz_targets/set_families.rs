#![no_main]

use dancing_cover::LinkMatrix;
use libfuzzer_sys::fuzz_target;
use std::{collections::BTreeSet, ops::ControlFlow};

#[derive(Debug, arbitrary::Arbitrary)]
struct SetFamily {
    sets: Vec<Vec<u8>>,
    stop_after: u8,
}

fuzz_target!(|family: SetFamily| {
    // Keep the universe small so the search space stays manageable.
    let sets: Vec<Vec<u8>> = family
        .sets
        .into_iter()
        .take(12)
        .map(|set| set.into_iter().take(6).map(|element| element % 10).collect())
        .collect();

    let mut matrix = LinkMatrix::from_sets(sets.clone());
    let before = matrix.topology();

    let all: Vec<_> = matrix.exact_covers().collect();
    assert_eq!(matrix.topology(), before);

    let universe: BTreeSet<u8> = sets.iter().flatten().copied().collect();
    for cover in &all {
        let mut covered = BTreeSet::new();
        for set in cover {
            let set: BTreeSet<u8> = set.iter().copied().collect();
            assert!(covered.is_disjoint(&set));
            covered.extend(set);
        }
        assert_eq!(covered, universe);
    }

    let mut recursive = Vec::new();
    matrix.each_exact_cover_recursive(|cover| -> ControlFlow<()> {
        recursive.push(cover.iter().map(|&set| set.clone()).collect::<Vec<_>>());
        ControlFlow::Continue(())
    });
    assert_eq!(recursive, all);
    assert_eq!(matrix.topology(), before);

    let mut seen = 0u8;
    matrix.each_exact_cover(|_| {
        seen += 1;
        if seen > family.stop_after {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert_eq!(matrix.topology(), before);
    assert_eq!(matrix.verify_restored(), Ok(()));
});
