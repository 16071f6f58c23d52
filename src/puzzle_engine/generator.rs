use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::debug;

use crate::error::GenerateError;
use crate::puzzle_engine::{
    games,
    models::{GameKind, PuzzleInstance, PuzzleRequest},
};

/// Build the RNG for a request: seeded when `rng_seed` is set, entropy otherwise.
pub fn request_rng(request: &PuzzleRequest) -> StdRng {
    match request.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Generate a unique puzzle ID from game + RNG.
pub fn make_puzzle_id(game: GameKind, rng: &mut impl RngCore) -> String {
    format!("{}-{:08X}", game.prefix(), rng.next_u32())
}

/// Core dispatch for locally generated games.
///
/// Remote game kinds are rejected with [`GenerateError::NotLocal`]; use
/// [`crate::remote::generate_remote`] for those.
pub fn generate_puzzle(request: &PuzzleRequest) -> Result<PuzzleInstance, GenerateError> {
    if request.game.is_remote() {
        return Err(GenerateError::NotLocal(request.game));
    }

    let mut rng = request_rng(request);
    let puzzle_id = make_puzzle_id(request.game, &mut rng);
    debug!(game = %request.game, puzzle_id = %puzzle_id, seed = ?request.rng_seed, "generating puzzle");

    let puzzle = match request.game {
        GameKind::AdditionDrill =>
            games::arithmetic::generate_addition(&mut rng, request, puzzle_id),

        GameKind::MixedDrill =>
            games::arithmetic::generate_mixed(&mut rng, request, puzzle_id),

        GameKind::NumberMatch =>
            games::matching::generate(&mut rng, request, puzzle_id),

        GameKind::SymbolMath =>
            games::symbol_math::generate(&mut rng, request, puzzle_id),

        GameKind::NumberMaze =>
            games::maze::generate(&mut rng, request, puzzle_id),

        GameKind::ColorByNumber =>
            games::coloring::generate(&mut rng, request, puzzle_id),

        GameKind::DotGridCopy =>
            games::dot_grid::generate(&mut rng, request, puzzle_id),

        GameKind::PatternGrid | GameKind::StoryProblems | GameKind::PictureCount =>
            return Err(GenerateError::NotLocal(request.game)),
    };
    Ok(puzzle)
}
