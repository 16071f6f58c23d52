//! Puzzle engine: local generation, shared models and randomisation helpers.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | All shared types: game kinds, requests, puzzle payloads, answer keys |
//! | `shuffle`   | Fisher-Yates shuffle, permutations and signed steps |
//! | `helpers`   | Shared builders: IDs, term drawing, pairing columns, instance assembly |
//! | `generator` | Single entry point `generate_puzzle()`, dispatches to games |
//! | `games`     | One generator per local game kind |

pub mod games;
pub mod generator;
pub mod helpers;
pub mod models;
pub mod shuffle;

pub use generator::generate_puzzle;
pub use models::{
    AnswerKey, ArithmeticSheet, Color, ColoringSheet, DifficultyLevel, DotGridSheet, Expected,
    GameKind, Legend, LegendEntry, MatchItem, MazeNode, MazeTopology, NumberMaze, OperandRange,
    Operator, PairingSheet, PatternGridSheet, Problem, PuzzleBody, PuzzleInstance, PuzzleRequest,
    PuzzleSource, Side, Symbol, SymbolSheet, Term, MAX_COUNT, MAX_OPERAND, MISSING_MARKER,
};
