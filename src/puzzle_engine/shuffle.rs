use rand::Rng;

use crate::puzzle_engine::models::{OperandRange, Operator, Term};

/// Fisher-Yates shuffle in place.
pub fn shuffle<T, R: Rng>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Every value of `lo..=hi` exactly once, in random order.
pub fn permutation<R: Rng>(rng: &mut R, lo: u8, hi: u8) -> Vec<u8> {
    let mut values: Vec<u8> = (lo..=hi).collect();
    shuffle(rng, &mut values);
    values
}

/// Draw one operand from the range.
pub fn operand<R: Rng>(rng: &mut R, range: OperandRange) -> u32 {
    rng.gen_range(range.min..=range.max)
}

/// A randomly signed step of size `1..=max_size`.
pub fn signed_step<R: Rng>(rng: &mut R, max_size: u32) -> Term {
    let op = if rng.gen_bool(0.5) { Operator::Plus } else { Operator::Minus };
    Term { op, value: rng.gen_range(1..=max_size.max(1)) }
}

/// Pick one element; `None` only for an empty slice.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}
