//! Property tests for histogram normalization.

use proptest::prelude::*;
use qbridge_hal::normalize::normalize;
use qbridge_hal::{BitOrder, NativeHistogram};
use rustc_hash::FxHashMap;

fn arb_indices() -> impl Strategy<Value = (usize, FxHashMap<usize, u64>)> {
    (1usize..12).prop_flat_map(|width| {
        let states = 1usize << width;
        (
            Just(width),
            prop::collection::hash_map(0..states, 1u64..500, 1..16)
                .prop_map(|m| m.into_iter().collect::<FxHashMap<_, _>>()),
        )
    })
}

proptest! {
    #[test]
    fn orders_are_mirror_images((width, counts) in arb_indices()) {
        let left = normalize(
            "a",
            NativeHistogram::Indices { counts: counts.clone(), width },
            BitOrder::QubitZeroLeft,
            width,
        ).unwrap();
        let right = normalize(
            "b",
            NativeHistogram::Indices { counts: counts.clone(), width },
            BitOrder::QubitZeroRight,
            width,
        ).unwrap();

        prop_assert_eq!(left.total_shots(), counts.values().sum::<u64>());
        prop_assert_eq!(right.total_shots(), left.total_shots());
        for (label, count) in left.iter() {
            prop_assert_eq!(label.len(), width);
            let mirrored: String = label.chars().rev().collect();
            prop_assert_eq!(right.get(&mirrored), *count);
        }
    }

    #[test]
    fn index_bit_of_qubit_zero_is_msb_when_left((width, counts) in arb_indices()) {
        let left = normalize(
            "a",
            NativeHistogram::Indices { counts: counts.clone(), width },
            BitOrder::QubitZeroLeft,
            width,
        ).unwrap();
        for (&index, &count) in &counts {
            let qubit0 = (index >> (width - 1)) & 1;
            let hits: u64 = left
                .iter()
                .filter(|(label, _)| label.starts_with(if qubit0 == 1 { '1' } else { '0' }))
                .map(|(_, c)| *c)
                .sum();
            prop_assert!(hits >= count);
        }
    }
}
