//! Fisher-Yates shuffle.
//!
//! Walks from the last index down to 1 and swaps each slot with a uniformly
//! chosen slot in `[0, i]`. Every permutation is equally likely given a fair
//! `Rng`.

use rand::Rng;

pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Returns a shuffled copy, leaving `items` untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    shuffle_in_place(&mut copy, rng);
    copy
}
