use rand::Rng;

use crate::puzzle_engine::{
    helpers::puzzle,
    models::{DifficultyLevel, DotGridSheet, GameKind, PuzzleBody, PuzzleInstance, PuzzleRequest, PuzzleSource},
};

const FILL_PROBABILITY: f64 = 0.4;
/// Largest printable grid side.
const MAX_SIDE: usize = 12;

fn side(request: &PuzzleRequest) -> usize {
    let default = match request.difficulty {
        DifficultyLevel::Beginner     => 4,
        DifficultyLevel::Intermediate => 6,
        DifficultyLevel::Advanced     => 8,
    };
    request.count_or(default).min(MAX_SIDE)
}

pub fn generate<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let n = side(request);
    let mut model: Vec<bool> = (0..n * n).map(|_| rng.gen_bool(FILL_PROBABILITY)).collect();
    if !model.contains(&true) {
        let i = rng.gen_range(0..model.len());
        model[i] = true;
    }

    let body = PuzzleBody::DotGrid(DotGridSheet { rows: n, cols: n, model });
    puzzle(puzzle_id, GameKind::DotGridCopy, "Copy the picture", PuzzleSource::Local, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn side_follows_difficulty_by_default() {
        let request = PuzzleRequest::new(GameKind::DotGridCopy).with_difficulty(DifficultyLevel::Beginner);
        assert_eq!(side(&request), 4);
        assert_eq!(side(&PuzzleRequest::new(GameKind::DotGridCopy)), 6);
    }

    #[test]
    fn huge_count_is_capped_to_a_printable_grid() {
        let mut rng = StdRng::seed_from_u64(4);
        let request = PuzzleRequest::new(GameKind::DotGridCopy).with_count(usize::MAX);
        let p = generate(&mut rng, &request, "DG-TEST".into());
        let PuzzleBody::DotGrid(sheet) = &p.body else { panic!("wrong body") };
        assert_eq!((sheet.rows, sheet.cols), (MAX_SIDE, MAX_SIDE));
        assert_eq!(sheet.model.len(), MAX_SIDE * MAX_SIDE);
        assert!(sheet.model.contains(&true));
    }
}
