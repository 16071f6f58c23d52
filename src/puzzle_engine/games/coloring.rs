use rand::Rng;

use crate::puzzle_engine::{
    helpers::puzzle,
    models::{
        Color, ColoringSheet, DifficultyLevel, GameKind, KeyEntry, PuzzleBody, PuzzleInstance,
        PuzzleRequest, PuzzleSource, Region,
    },
    shuffle,
};

const DEFAULT_REGIONS: usize = 12;

fn palette_size(difficulty: DifficultyLevel) -> u8 {
    match difficulty {
        DifficultyLevel::Beginner     => 3,
        DifficultyLevel::Intermediate => 4,
        DifficultyLevel::Advanced     => 6,
    }
}

pub fn generate<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let k = palette_size(request.difficulty);
    let mut colors = Color::ALL.to_vec();
    shuffle::shuffle(rng, &mut colors);
    let key: Vec<KeyEntry> = (1..=k)
        .zip(colors)
        .map(|(number, color)| KeyEntry { number, color })
        .collect();

    // Every key number appears at least once when there are enough regions.
    let n_regions = request.count_or(DEFAULT_REGIONS);
    let mut numbers: Vec<u8> = (0..n_regions)
        .map(|i| if i < usize::from(k) { i as u8 + 1 } else { rng.gen_range(1..=k) })
        .collect();
    shuffle::shuffle(rng, &mut numbers);

    let regions = numbers
        .into_iter()
        .enumerate()
        .map(|(i, number)| Region { id: format!("g-{i}"), number })
        .collect();

    let body = PuzzleBody::Coloring(ColoringSheet { key, regions });
    puzzle(puzzle_id, GameKind::ColorByNumber, "Color each shape by its number", PuzzleSource::Local, body)
}
