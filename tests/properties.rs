//! Property-based tests checking the bitset against a `Vec<bool>` reference
//! model, padding handling included.

use proptest::prelude::*;
use word_bitset::Bitset;

fn build(bits: &[bool]) -> Bitset {
    Bitset::from_bools(bits).unwrap()
}

fn leading_run(bits: &[bool], value: bool) -> usize {
    bits.iter().rev().take_while(|&&bit| bit == value).count()
}

fn trailing_run(bits: &[bool], value: bool) -> usize {
    bits.iter().take_while(|&&bit| bit == value).count()
}

/// Lengths around the word boundary are the interesting ones.
fn bools() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..300)
}

fn same_len_pair() -> impl Strategy<Value = (Vec<bool>, Vec<bool>)> {
    (0usize..300).prop_flat_map(|len| {
        (
            prop::collection::vec(any::<bool>(), len),
            prop::collection::vec(any::<bool>(), len),
        )
    })
}

proptest! {
    #[test]
    fn popcount_matches_reference(bits in bools()) {
        let bitset = build(&bits);
        prop_assert_eq!(bitset.popcount(), bits.iter().filter(|&&bit| bit).count());
    }

    #[test]
    fn run_queries_match_reference(bits in bools()) {
        let bitset = build(&bits);
        prop_assert_eq!(bitset.leading_zeros(), leading_run(&bits, false));
        prop_assert_eq!(bitset.leading_ones(), leading_run(&bits, true));
        prop_assert_eq!(bitset.trailing_zeros(), trailing_run(&bits, false));
        prop_assert_eq!(bitset.trailing_ones(), trailing_run(&bits, true));
    }

    // The complement dirties padding; queries must still agree with the
    // flipped reference model.
    #[test]
    fn queries_after_not_match_flipped_reference(bits in bools()) {
        let mut bitset = build(&bits);
        bitset.in_place_bit_not();
        let flipped: Vec<bool> = bits.iter().map(|&bit| !bit).collect();

        prop_assert_eq!(bitset.popcount(), flipped.iter().filter(|&&bit| bit).count());
        prop_assert_eq!(bitset.leading_zeros(), leading_run(&flipped, false));
        prop_assert_eq!(bitset.leading_ones(), leading_run(&flipped, true));
        prop_assert_eq!(bitset.trailing_zeros(), trailing_run(&flipped, false));
        prop_assert_eq!(bitset.trailing_ones(), trailing_run(&flipped, true));
    }

    #[test]
    fn not_is_involution(bits in bools()) {
        let original = build(&bits);
        let mut twice = original.clone();
        twice.in_place_bit_not();
        twice.in_place_bit_not();
        prop_assert_eq!(&twice, &original);
    }

    #[test]
    fn combinators_match_reference((a, b) in same_len_pair()) {
        let set_a = build(&a);
        let set_b = build(&b);

        let or: Vec<bool> = a.iter().zip(&b).map(|(&x, &y)| x | y).collect();
        let and: Vec<bool> = a.iter().zip(&b).map(|(&x, &y)| x & y).collect();
        let xor: Vec<bool> = a.iter().zip(&b).map(|(&x, &y)| x ^ y).collect();

        prop_assert_eq!(&(set_a.clone() | &set_b), &build(&or));
        prop_assert_eq!(&(set_a.clone() & &set_b), &build(&and));
        prop_assert_eq!(&(set_a.clone() ^ &set_b), &build(&xor));
    }

    #[test]
    fn combinators_are_commutative((a, b) in same_len_pair()) {
        let set_a = build(&a);
        let set_b = build(&b);

        prop_assert_eq!(&(set_a.clone() | &set_b), &(set_b.clone() | &set_a));
        prop_assert_eq!(&(set_a.clone() & &set_b), &(set_b.clone() & &set_a));
        prop_assert_eq!(&(set_a.clone() ^ &set_b), &(set_b.clone() ^ &set_a));
    }

    #[test]
    fn xor_with_self_clears_all(bits in bools()) {
        let bitset = build(&bits);
        let cleared = bitset.clone() ^ &bitset;
        prop_assert_eq!(cleared.popcount(), 0);
        prop_assert_eq!(cleared.leading_zeros(), bits.len());
    }

    #[test]
    fn and_with_all_set_is_identity(bits in bools()) {
        let bitset = build(&bits);
        let full = Bitset::with_all_set(bits.len()).unwrap();
        prop_assert_eq!(&(bitset.clone() & &full), &bitset);
    }

    #[test]
    fn uniform_iff_popcount_extremes(bits in bools()) {
        let bitset = build(&bits);
        let len = bits.len();
        prop_assert_eq!(bitset.leading_zeros() == len, bitset.popcount() == 0);
        prop_assert_eq!(bitset.leading_ones() == len, bitset.popcount() == len);
        prop_assert_eq!(bitset.trailing_zeros() == len, bitset.popcount() == 0);
        prop_assert_eq!(bitset.trailing_ones() == len, bitset.popcount() == len);
    }

    #[test]
    fn iter_ones_matches_reference(bits in bools()) {
        let bitset = build(&bits);
        let expected: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter_map(|(idx, &bit)| bit.then_some(idx))
            .collect();
        let actual: Vec<usize> = bitset.iter_ones().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn iter_roundtrips(bits in bools()) {
        let bitset = build(&bits);
        let collected: Vec<bool> = bitset.iter().collect();
        prop_assert_eq!(collected, bits);
    }
}
