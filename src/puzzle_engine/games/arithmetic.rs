use rand::Rng;

use crate::puzzle_engine::{
    helpers::{draw_terms, problem, problem_id, puzzle},
    models::{ArithmeticSheet, GameKind, PuzzleBody, PuzzleInstance, PuzzleRequest, PuzzleSource},
};

const DEFAULT_COUNT: usize = 6;

fn sheet<R: Rng>(rng: &mut R, request: &PuzzleRequest, allow_minus: bool) -> ArithmeticSheet {
    let range = request.operand_range();
    let problems = (0..request.count_or(DEFAULT_COUNT))
        .map(|i| {
            let n_terms = rng.gen_range(2..=3);
            let terms = draw_terms(rng, range, n_terms, allow_minus);
            problem(problem_id(i), None, terms)
        })
        .collect();
    ArithmeticSheet { problems }
}

/// Column of addition problems with two or three addends each.
pub fn generate_addition<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let body = PuzzleBody::Arithmetic(sheet(rng, request, false));
    puzzle(puzzle_id, GameKind::AdditionDrill, "Add the numbers", PuzzleSource::Local, body)
}

/// Addition and subtraction mixed; no result ever drops below zero.
pub fn generate_mixed<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let body = PuzzleBody::Arithmetic(sheet(rng, request, true));
    puzzle(puzzle_id, GameKind::MixedDrill, "Add and take away", PuzzleSource::Local, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_engine::models::{Operator, PuzzleRequest};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn addition_answers_are_exact_sums() {
        let mut rng = StdRng::seed_from_u64(5);
        let request = PuzzleRequest::new(GameKind::AdditionDrill).with_count(50);
        let p = generate_addition(&mut rng, &request, "AD-TEST".into());
        let PuzzleBody::Arithmetic(sheet) = &p.body else { panic!("wrong body") };
        for prob in &sheet.problems {
            let sum: u32 = prob.terms.iter().map(|t| t.value).sum();
            assert!(prob.terms.iter().all(|t| t.op == Operator::Plus));
            assert_eq!(prob.answer, sum, "{}", prob.expression());
        }
    }

    #[test]
    fn mixed_answers_match_left_to_right_evaluation() {
        let mut rng = StdRng::seed_from_u64(6);
        let request = PuzzleRequest::new(GameKind::MixedDrill).with_count(50);
        let p = generate_mixed(&mut rng, &request, "MX-TEST".into());
        let PuzzleBody::Arithmetic(sheet) = &p.body else { panic!("wrong body") };
        for prob in &sheet.problems {
            let mut total: i64 = 0;
            for t in &prob.terms {
                match t.op {
                    Operator::Plus => total += i64::from(t.value),
                    Operator::Minus => total -= i64::from(t.value),
                }
                assert!(total >= 0, "negative intermediate in {}", prob.expression());
            }
            assert_eq!(i64::from(prob.answer), total);
        }
    }
}
