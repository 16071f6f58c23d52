//! # worksheet_gen
//!
//! Printable children's math and logic worksheets: generation, play state,
//! answer checking and export.
//!
//! Each worksheet is a self-contained [`PuzzleInstance`]: the printed content
//! plus an answer key derived from it. Seven game kinds are generated locally
//! from a seedable RNG (addition and mixed drills, number matching, symbol math,
//! number mazes, color by number, dot-grid copying). Three more (pattern grids,
//! themed story problems, picture counting) ask a remote content service for
//! structured JSON, validate it strictly, and fall back to a hand-authored puzzle
//! whenever anything goes wrong.
//!
//! ## How it works
//!
//! 1. Build a [`PuzzleRequest`] with a game kind and, optionally, a seed, count,
//!    operand range or theme.
//! 2. Hand it to a [`WorksheetSession`]. The session generates the puzzle
//!    (through [`generate_puzzle`] or [`remote::generate_remote`]) and owns the
//!    child's answers, pairings, colors and toggled dots for it.
//! 3. Call [`WorksheetSession::export`] to rasterize a blanked copy through the
//!    host and receive a page-sized [`export::WorksheetDocument`].
//!
//! ## Quick start
//!
//! ```rust
//! use worksheet_gen::{generate_puzzle, GameKind, PuzzleBody, PuzzleRequest};
//!
//! let puzzle = generate_puzzle(&PuzzleRequest::new(GameKind::AdditionDrill).with_seed(42)).unwrap();
//! if let PuzzleBody::Arithmetic(sheet) = &puzzle.body {
//!     for p in &sheet.problems {
//!         println!("{} = {}", p.expression(), p.answer);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod interaction;
pub mod puzzle_engine;
pub mod remote;
pub mod session;
pub mod surface;

// Convenience re-exports so callers can use `worksheet_gen::generate_puzzle`
// directly without reaching into `puzzle_engine::`.
pub use config::{ExportConfig, ServiceConfig};
pub use error::{ExportError, GenerateError, ValidationError};
pub use puzzle_engine::{
    generate_puzzle, AnswerKey, DifficultyLevel, Expected, GameKind, PuzzleBody, PuzzleInstance,
    PuzzleRequest, PuzzleSource,
};
pub use remote::{GenerationOutcome, HttpContentService, Notice, NoticeKind};
pub use session::WorksheetSession;

#[cfg(test)]
mod testing;
