//! Shared builder functions used by every game generator.
//!
//! Each generator draws its numbers, assembles a [`PuzzleBody`], and hands it to
//! [`puzzle`], which derives the answer key. The helpers here keep ID formats and
//! evaluation rules in one place so the games agree on them.

use rand::Rng;

use crate::puzzle_engine::{
    models::*,
    shuffle,
};

/// Problem / equation ID (e.g. `"p-3"`).
pub fn problem_id(i: usize) -> String {
    format!("p-{i}")
}

pub fn left_id(i: usize) -> String {
    format!("l-{i}")
}

pub fn right_id(i: usize) -> String {
    format!("r-{i}")
}

/// Evaluate terms left to right with the floor-at-zero rule.
pub fn evaluate(terms: &[Term]) -> u32 {
    terms.iter().fold(0, |total, t| t.op.apply(total, t.value))
}

/// Build a problem, computing its answer from the terms.
pub fn problem(id: String, prompt: Option<String>, terms: Vec<Term>) -> Problem {
    let answer = evaluate(&terms);
    Problem { id, prompt, terms, answer }
}

/// Draw `n` terms from `range`.
///
/// With `allow_minus`, every term after the first is randomly added or
/// subtracted; a subtrahend larger than the running total is clamped to it, so
/// the printed operand and the answer never go below zero.
pub fn draw_terms<R: Rng>(rng: &mut R, range: OperandRange, n: usize, allow_minus: bool) -> Vec<Term> {
    let mut terms = Vec::with_capacity(n);
    let mut total = 0u32;
    for i in 0..n {
        let mut value = shuffle::operand(rng, range);
        let op = if i > 0 && allow_minus && rng.gen_bool(0.5) {
            value = value.min(total);
            Operator::Minus
        } else {
            Operator::Plus
        };
        total = op.apply(total, value);
        terms.push(Term { op, value });
    }
    terms
}

/// Build a pairing sheet from `(left content, match-key)` pairs.
///
/// The left column keeps the given order. The right column holds the match-keys
/// as numerals, independently shuffled, so a right item's position says nothing
/// about which left item it answers.
pub fn pairing<R: Rng>(rng: &mut R, base: Vec<(String, i64)>) -> PairingSheet {
    let mut answers: Vec<i64> = base.iter().map(|(_, key)| *key).collect();
    shuffle::shuffle(rng, &mut answers);

    let left = base
        .into_iter()
        .enumerate()
        .map(|(i, (content, key))| MatchItem { id: left_id(i), side: Side::Left, content, match_key: key })
        .collect();
    let right = answers
        .into_iter()
        .enumerate()
        .map(|(i, key)| MatchItem { id: right_id(i), side: Side::Right, content: key.to_string(), match_key: key })
        .collect();
    PairingSheet { left, right }
}

/// Assemble the final [`PuzzleInstance`], deriving its answer key.
pub fn puzzle(
    puzzle_id: String,
    game: GameKind,
    title: impl Into<String>,
    source: PuzzleSource,
    body: PuzzleBody,
) -> PuzzleInstance {
    let answer_key = AnswerKey::derive(&body);
    PuzzleInstance { puzzle_id, game, title: title.into(), source, body, answer_key }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn evaluate_floors_at_zero() {
        let terms = [
            Term { op: Operator::Plus, value: 3 },
            Term { op: Operator::Minus, value: 5 },
            Term { op: Operator::Plus, value: 2 },
        ];
        assert_eq!(evaluate(&terms), 2);
    }

    #[test]
    fn drawn_subtrahends_never_exceed_running_total() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let terms = draw_terms(&mut rng, OperandRange::new(0, 9), 3, true);
            let mut total = 0u32;
            for t in &terms {
                if t.op == Operator::Minus {
                    assert!(t.value <= total, "subtrahend {} exceeds total {total}", t.value);
                }
                total = t.op.apply(total, t.value);
            }
            assert_eq!(terms[0].op, Operator::Plus);
        }
    }

    #[test]
    fn pairing_namespaces_are_disjoint() {
        let mut rng = StdRng::seed_from_u64(11);
        let sheet = pairing(&mut rng, vec![("1 + 1".into(), 2), ("2 + 2".into(), 4)]);
        assert!(sheet.left.iter().all(|i| i.id.starts_with("l-") && i.side == Side::Left));
        assert!(sheet.right.iter().all(|i| i.id.starts_with("r-") && i.side == Side::Right));
    }
}
