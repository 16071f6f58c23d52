use rand::Rng;

use crate::puzzle_engine::{
    helpers::puzzle,
    models::{
        GameKind, MazeNode, MazeTopology, NumberMaze, Operator, PuzzleBody, PuzzleInstance,
        PuzzleRequest, PuzzleSource, Term,
    },
    shuffle,
};

const MAX_STEP: u32 = 9;

/// Keep a subtraction from crossing zero. At zero it becomes an addition.
fn clamp_step(total: u32, step: Term) -> Term {
    match step.op {
        Operator::Minus if total == 0 => Term { op: Operator::Plus, value: step.value },
        Operator::Minus => Term { op: Operator::Minus, value: step.value.min(total) },
        Operator::Plus => step,
    }
}

/// Walk a pre-authored layout, applying one signed step per edge.
pub fn walk<R: Rng>(rng: &mut R, topology: MazeTopology, start: u32) -> NumberMaze {
    let mut total = start;
    let nodes = topology
        .layout()
        .iter()
        .enumerate()
        .map(|(i, &(row, col))| {
            let step = if i == 0 {
                None
            } else {
                let step = clamp_step(total, shuffle::signed_step(rng, MAX_STEP));
                total = step.op.apply(total, step.value);
                Some(step)
            };
            MazeNode { id: format!("n-{i}"), row, col, value: total, step }
        })
        .collect();
    NumberMaze { topology, nodes }
}

pub fn generate<R: Rng>(rng: &mut R, request: &PuzzleRequest, puzzle_id: String) -> PuzzleInstance {
    let topology = *shuffle::pick(rng, &MazeTopology::ALL).unwrap_or(&MazeTopology::Snake);
    let start = shuffle::operand(rng, request.operand_range());
    let maze = walk(rng, topology, start);
    puzzle(puzzle_id, GameKind::NumberMaze, "Follow the path and fill in the numbers", PuzzleSource::Local, PuzzleBody::Maze(maze))
}
