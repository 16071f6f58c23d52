//! Hand-authored puzzles used when remote generation fails.
//!
//! These are fixed data: the same game always falls back to the same puzzle.

use crate::puzzle_engine::{
    helpers::{left_id, problem, problem_id, puzzle, right_id},
    ArithmeticSheet, GameKind, MatchItem, Operator, PairingSheet, PatternGridSheet, PuzzleBody,
    PuzzleInstance, PuzzleSource, Side, Term,
};
use crate::remote::RemoteGame;

fn fallback_id(game: GameKind) -> String {
    format!("{}-FALLBACK", game.prefix())
}

fn pattern_grid() -> PuzzleInstance {
    // Counting by twos, 2..=50, with 28 blanked.
    let missing = 13;
    let cells = (0..25i64)
        .map(|i| if i == missing { None } else { Some((i + 1) * 2) })
        .collect();
    let sheet = PatternGridSheet { size: 5, cells, answer: 28 };
    puzzle(fallback_id(GameKind::PatternGrid), GameKind::PatternGrid, "Count by twos", PuzzleSource::Fallback, PuzzleBody::Pattern(sheet))
}

fn story_problems() -> PuzzleInstance {
    let authored: [(&str, u32, Operator, u32); 4] = [
        ("Mia has 3 red balloons and 2 blue balloons. How many balloons does she have?", 3, Operator::Plus, 2),
        ("There are 7 ducks in the pond. 4 swim away. How many ducks are left?", 7, Operator::Minus, 4),
        ("Sam picks 5 apples, then 4 more. How many apples does Sam have?", 5, Operator::Plus, 4),
        ("A plate has 6 cookies. Leo eats 1. How many cookies are on the plate?", 6, Operator::Minus, 1),
    ];
    let problems = authored
        .iter()
        .enumerate()
        .map(|(i, &(text, a, op, b))| {
            let terms = vec![Term { op: Operator::Plus, value: a }, Term { op, value: b }];
            problem(problem_id(i), Some(text.to_string()), terms)
        })
        .collect();
    let body = PuzzleBody::Arithmetic(ArithmeticSheet { problems });
    puzzle(fallback_id(GameKind::StoryProblems), GameKind::StoryProblems, "Story problems", PuzzleSource::Fallback, body)
}

fn picture_count() -> PuzzleInstance {
    let left_items: [(&str, i64); 5] = [("🍎", 3), ("⭐", 5), ("🐟", 2), ("🎈", 4), ("🐞", 1)];
    let right_order: [i64; 5] = [4, 1, 5, 2, 3];

    let left = left_items
        .iter()
        .enumerate()
        .map(|(i, &(icon, count))| MatchItem {
            id: left_id(i),
            side: Side::Left,
            content: icon.repeat(count as usize),
            match_key: count,
        })
        .collect();
    let right = right_order
        .iter()
        .enumerate()
        .map(|(i, &count)| MatchItem {
            id: right_id(i),
            side: Side::Right,
            content: count.to_string(),
            match_key: count,
        })
        .collect();
    let body = PuzzleBody::Pairing(PairingSheet { left, right });
    puzzle(fallback_id(GameKind::PictureCount), GameKind::PictureCount, "Count the pictures", PuzzleSource::Fallback, body)
}

/// The default puzzle for a remote game kind.
pub fn default_puzzle(game: RemoteGame) -> PuzzleInstance {
    match game {
        RemoteGame::PatternGrid   => pattern_grid(),
        RemoteGame::StoryProblems => story_problems(),
        RemoteGame::PictureCount  => picture_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_engine::Expected;

    #[test]
    fn defaults_are_internally_consistent() {
        for game in RemoteGame::ALL {
            let p = default_puzzle(game);
            assert_eq!(p.source, PuzzleSource::Fallback);
            assert_eq!(p.game, GameKind::from(game));
            assert!(!p.answer_key.is_empty(), "{game:?} fallback has no answer key");
        }

        let p = pattern_grid();
        let PuzzleBody::Pattern(sheet) = &p.body else { panic!("wrong body") };
        let missing = sheet.missing_index().expect("one blank");
        assert_eq!(sheet.cells.iter().filter(|c| c.is_none()).count(), 1);
        assert_eq!(sheet.answer, (missing as i64 + 1) * 2);

        let p = picture_count();
        assert_eq!(p.answer_key.get("l-0"), Some(&Expected::Pair("r-4".into())));
    }
}
