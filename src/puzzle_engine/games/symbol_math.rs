use rand::Rng;

use crate::puzzle_engine::{
    helpers::{problem_id, puzzle},
    models::{
        GameKind, Legend, LegendEntry, PuzzleBody, PuzzleInstance, PuzzleRequest, PuzzleSource,
        Symbol, SymbolEquation, SymbolSheet,
    },
    shuffle,
};

const DEFAULT_COUNT: usize = 6;
const LEGEND_MIN: u8 = 1;
const LEGEND_MAX: u8 = 9;

/// Permute 1..=9 and hand the values out to the icon set in order.
///
/// The icon set and the range have the same size, so the result is a bijection.
pub fn legend<R: Rng>(rng: &mut R) -> Legend {
    let values = shuffle::permutation(rng, LEGEND_MIN, LEGEND_MAX);
    let entries = Symbol::ALL
        .iter()
        .zip(values)
        .map(|(&symbol, value)| LegendEntry { symbol, value })
        .collect();
    Legend { entries }
}

pub fn generate<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let legend = legend(rng);
    let equations = (0..request.count_or(DEFAULT_COUNT))
        .map(|i| {
            let n = rng.gen_range(2..=3);
            let symbols: Vec<Symbol> = (0..n).map(|_| Symbol::ALL[rng.gen_range(0..Symbol::ALL.len())]).collect();
            let answer = symbols
                .iter()
                .filter_map(|s| legend.value_of(*s))
                .map(u32::from)
                .sum();
            SymbolEquation { id: problem_id(i), symbols, answer }
        })
        .collect();

    let body = PuzzleBody::Symbols(SymbolSheet { legend, equations });
    puzzle(puzzle_id, GameKind::SymbolMath, "What do the pictures add up to?", PuzzleSource::Local, body)
}
