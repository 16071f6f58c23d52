//! One printed sheet for every locally generated game.
//!
//! Run with:
//!   cargo run --example games
//!
//! Fixed seeds, so the output is the same on every run. The answer key is
//! printed under each sheet.

use worksheet_gen::puzzle_engine::{DotGridSheet, PairingSheet};
use worksheet_gen::{generate_puzzle, Expected, GameKind, PuzzleBody, PuzzleInstance, PuzzleRequest};

// ── rendering ─────────────────────────────────────────────────────────────────

fn print_pairing(sheet: &PairingSheet) {
    for (left, right) in sheet.left.iter().zip(&sheet.right) {
        println!("  {:>3} {:<12}   {:>3} {}", left.id, left.content, right.id, right.content);
    }
}

fn print_dots(sheet: &DotGridSheet) {
    for r in 0..sheet.rows {
        let model: String = (0..sheet.cols)
            .map(|c| if sheet.model[r * sheet.cols + c] { '●' } else { '·' })
            .collect();
        println!("  {model}   {}", "·".repeat(sheet.cols));
    }
}

fn print_sheet(puzzle: &PuzzleInstance) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  [{}]  {}  ID: {}", puzzle.game, puzzle.title, puzzle.puzzle_id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match &puzzle.body {
        PuzzleBody::Arithmetic(sheet) => {
            for p in &sheet.problems {
                println!("  {:>4}  {} = ____", p.id, p.expression());
            }
        }
        PuzzleBody::Pairing(sheet) => print_pairing(sheet),
        PuzzleBody::Symbols(sheet) => {
            let legend: Vec<String> =
                sheet.legend.entries.iter().map(|e| format!("{}={}", e.symbol.glyph(), e.value)).collect();
            println!("  Legend: {}", legend.join("  "));
            for eq in &sheet.equations {
                let glyphs: Vec<&str> = eq.symbols.iter().map(|s| s.glyph()).collect();
                println!("  {:>4}  {} = ____", eq.id, glyphs.join(" + "));
            }
        }
        PuzzleBody::Maze(maze) => {
            println!("  Path: {:?}", maze.topology);
            for node in &maze.nodes {
                match node.step {
                    None => println!("  start at {}", node.value),
                    Some(step) => println!("  ({},{}) {}{} → ____", node.row, node.col, step.op, step.value),
                }
            }
        }
        PuzzleBody::Coloring(sheet) => {
            let key: Vec<String> = sheet.key.iter().map(|k| format!("{}={:?}", k.number, k.color)).collect();
            println!("  Key: {}", key.join("  "));
            let regions: Vec<String> = sheet.regions.iter().map(|r| r.number.to_string()).collect();
            println!("  Regions: {}", regions.join(" "));
        }
        PuzzleBody::DotGrid(sheet) => print_dots(sheet),
        PuzzleBody::Pattern(sheet) => {
            for row in sheet.cells.chunks(sheet.size) {
                let cells: Vec<String> =
                    row.iter().map(|c| c.map_or("__".to_string(), |v| format!("{v:>2}"))).collect();
                println!("  {}", cells.join(" "));
            }
        }
    }

    let key: Vec<String> = puzzle
        .answer_key
        .iter()
        .filter_map(|(id, expected)| match expected {
            Expected::Value(v) => Some(format!("{id}={v}")),
            Expected::Pair(right) => Some(format!("{id}→{right}")),
            Expected::Color(c) => Some(format!("{id}={c:?}")),
            Expected::Cell(_) => None,
        })
        .collect();
    if !key.is_empty() {
        println!();
        println!("  Answers: {}", key.join("  "));
    }
    println!();
}

fn main() {
    let local = GameKind::ALL.into_iter().filter(|g| !g.is_remote());
    for (i, game) in local.enumerate() {
        let request = PuzzleRequest::new(game).with_seed(1000 + i as u64);
        match generate_puzzle(&request) {
            Ok(puzzle) => print_sheet(&puzzle),
            Err(e) => eprintln!("  {game}: {e}"),
        }
    }
}
