//! Local game generators.
//!
//! Every module exposes a generator with the same shape:
//!
//! ```ignore
//! pub fn generate<R: Rng>(
//!     rng: &mut R,
//!     request: &PuzzleRequest,
//!     puzzle_id: String,
//! ) -> PuzzleInstance
//! ```
//!
//! `generator.rs` dispatches to these. Remote game kinds live in `crate::remote`.

/// AD-, MX-
pub mod arithmetic;
/// NM-
pub mod matching;
/// SM-
pub mod symbol_math;
/// MZ-
pub mod maze;
/// CN-
pub mod coloring;
/// DG-
pub mod dot_grid;
