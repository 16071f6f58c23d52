use rand::seq::index;
use rand::Rng;

use crate::puzzle_engine::{
    helpers::{pairing, puzzle},
    models::{GameKind, PuzzleBody, PuzzleInstance, PuzzleRequest, PuzzleSource},
};

const DEFAULT_PAIRS: usize = 5;

/// Pick `count` distinct sums, then split each into two operands from the range.
///
/// Distinct sums keep the match unambiguous: exactly one right item answers each
/// left item. The count is capped at the number of reachable sums, and only the
/// sums actually used are drawn.
fn base_pairs<R: Rng>(rng: &mut R, request: &PuzzleRequest) -> Vec<(String, i64)> {
    let range = request.operand_range();
    let lowest = range.min.saturating_mul(2);
    let span = range.max.saturating_mul(2).saturating_sub(lowest) as usize + 1;
    let count = request.count_or(DEFAULT_PAIRS).min(span);

    index::sample(rng, span, count)
        .into_iter()
        .map(|offset| {
            let sum = lowest.saturating_add(offset as u32);
            let lo = range.min.max(sum.saturating_sub(range.max));
            let hi = range.max.min(sum.saturating_sub(range.min));
            let a = rng.gen_range(lo..=hi);
            (format!("{} + {}", a, sum - a), i64::from(sum))
        })
        .collect()
}

pub fn generate<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let base = base_pairs(rng, request);
    let sheet = pairing(rng, base);
    puzzle(puzzle_id, GameKind::NumberMatch, "Draw a line to the answer", PuzzleSource::Local, PuzzleBody::Pairing(sheet))
}
