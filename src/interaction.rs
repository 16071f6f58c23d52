//! Per-puzzle interaction state and answer checking.
//!
//! Nothing here mutates the puzzle or its answer key. A fresh
//! [`InteractionState`] is built for every new puzzle and dropped with it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::puzzle_engine::{
    Color, ColoringSheet, DotGridSheet, Expected, PairingSheet, PuzzleBody, PuzzleInstance,
};

// ---------------------------------------------------------------------------
// Free-text answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryFilter {
    /// Keep ASCII digits only.
    Digits,
    /// Keep only the most recently typed digit.
    SingleChar,
}

impl EntryFilter {
    /// Single-digit boxes when every typed answer of the puzzle is one digit.
    pub fn for_puzzle(puzzle: &PuzzleInstance) -> Self {
        let values: Vec<i64> = puzzle
            .answer_key
            .iter()
            .filter_map(|(_, e)| match e {
                Expected::Value(v) => Some(*v),
                _ => None,
            })
            .collect();
        if !values.is_empty() && values.iter().all(|v| (0..=9).contains(v)) {
            EntryFilter::SingleChar
        } else {
            EntryFilter::Digits
        }
    }

    fn apply(self, raw: &str) -> String {
        let digits = raw.chars().filter(char::is_ascii_digit);
        match self {
            EntryFilter::Digits => digits.collect(),
            EntryFilter::SingleChar => digits.last().map(String::from).unwrap_or_default(),
        }
    }
}

/// Problem ID → what the child typed. A missing entry means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    entries: BTreeMap<String, String>,
}

impl AnswerSheet {
    /// Replace the stored text for `id` with the filtered `raw` input.
    ///
    /// Rejected characters are dropped silently; if nothing is left the entry
    /// is removed.
    pub fn enter(&mut self, id: &str, raw: &str, filter: EntryFilter) -> Option<&str> {
        let value = filter.apply(raw);
        if value.is_empty() {
            self.entries.remove(id);
            None
        } else {
            self.entries.insert(id.to_string(), value);
            self.entries.get(id).map(String::as_str)
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
}

/// Compare typed answers with every numeric entry of the answer key.
pub fn check_answers(puzzle: &PuzzleInstance, sheet: &AnswerSheet) -> BTreeMap<String, Verdict> {
    puzzle
        .answer_key
        .iter()
        .filter_map(|(id, expected)| match expected {
            Expected::Value(v) => Some((id, *v)),
            _ => None,
        })
        .map(|(id, expected)| {
            let verdict = match sheet.get(id) {
                None => Verdict::Unanswered,
                Some(text) => match text.trim().parse::<i64>() {
                    Ok(n) if n == expected => Verdict::Correct,
                    _ => Verdict::Incorrect,
                },
            };
            (id.clone(), verdict)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectMode {
    /// Only agreeing pairs are recorded.
    ValidateOnConnect,
    /// Every attempt is recorded; correctness is shown on `check`.
    ValidateOnDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectOutcome {
    Connected,
    /// Keys disagreed in on-connect mode. Nothing was recorded; the selection is cleared.
    Mismatch,
    NoSelection,
    UnknownItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingState {
    mode: ConnectMode,
    selected: Option<String>,
    /// Left ID → right ID, one edge per left item.
    connections: BTreeMap<String, String>,
    checked: bool,
}

impl PairingState {
    pub fn new(mode: ConnectMode) -> Self {
        PairingState { mode, selected: None, connections: BTreeMap::new(), checked: false }
    }

    pub fn mode(&self) -> ConnectMode {
        self.mode
    }

    /// Select a left item, replacing any earlier selection. Unknown IDs are ignored.
    pub fn select_left(&mut self, sheet: &PairingSheet, left_id: &str) -> bool {
        if sheet.left_item(left_id).is_none() {
            return false;
        }
        self.selected = Some(left_id.to_string());
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Try to connect the selected left item to `right_id`.
    pub fn connect_right(&mut self, sheet: &PairingSheet, right_id: &str) -> ConnectOutcome {
        let Some(left_id) = self.selected.take() else {
            return ConnectOutcome::NoSelection;
        };
        let (Some(left), Some(right)) = (sheet.left_item(&left_id), sheet.right_item(right_id)) else {
            return ConnectOutcome::UnknownItem;
        };

        if self.mode == ConnectMode::ValidateOnConnect && !left.matches(right) {
            debug!(left = %left_id, right = %right_id, "connection rejected");
            return ConnectOutcome::Mismatch;
        }

        // Last write wins.
        self.connections.insert(left_id, right_id.to_string());
        self.checked = false;
        ConnectOutcome::Connected
    }

    pub fn connection(&self, left_id: &str) -> Option<&str> {
        self.connections.get(left_id).map(String::as_str)
    }

    pub fn connections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.connections.iter().map(|(l, r)| (l.as_str(), r.as_str()))
    }

    /// Evaluate every recorded edge and mark the state as checked.
    pub fn check(&mut self, sheet: &PairingSheet) -> BTreeMap<String, bool> {
        self.checked = true;
        self.evaluate(sheet)
    }

    /// Correctness of each recorded edge without changing the checked flag.
    pub fn evaluate(&self, sheet: &PairingSheet) -> BTreeMap<String, bool> {
        self.connections
            .iter()
            .map(|(l, r)| {
                let ok = match (sheet.left_item(l), sheet.right_item(r)) {
                    (Some(left), Some(right)) => left.matches(right),
                    _ => false,
                };
                (l.clone(), ok)
            })
            .collect()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

// ---------------------------------------------------------------------------
// Coloring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoringState {
    armed: Option<Color>,
    painted: BTreeMap<String, Color>,
}

impl ColoringState {
    pub fn arm(&mut self, color: Color) {
        self.armed = Some(color);
    }

    pub fn armed(&self) -> Option<Color> {
        self.armed
    }

    /// Paint a region with the armed color. Returns `false` if nothing is armed
    /// or the region does not exist.
    pub fn paint(&mut self, sheet: &ColoringSheet, region_id: &str) -> bool {
        let Some(color) = self.armed else { return false };
        if !sheet.regions.iter().any(|r| r.id == region_id) {
            return false;
        }
        self.painted.insert(region_id.to_string(), color);
        true
    }

    pub fn color_of(&self, region_id: &str) -> Option<Color> {
        self.painted.get(region_id).copied()
    }
}

// ---------------------------------------------------------------------------
// Dot grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotGridState {
    rows: usize,
    cols: usize,
    filled: Vec<bool>,
}

impl DotGridState {
    /// A blank grid the size of the model.
    pub fn for_sheet(sheet: &DotGridSheet) -> Self {
        DotGridState { rows: sheet.rows, cols: sheet.cols, filled: vec![false; sheet.rows * sheet.cols] }
    }

    /// Flip one cell. Returns the new state, or `None` outside the grid.
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<bool> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let cell = self.filled.get_mut(row * self.cols + col)?;
        *cell = !*cell;
        Some(*cell)
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.filled.get(row * self.cols + col).copied().unwrap_or(false)
    }

    /// Cells that differ from the model, as `(row, col)`.
    pub fn differences(&self, sheet: &DotGridSheet) -> Vec<(usize, usize)> {
        sheet
            .model
            .iter()
            .enumerate()
            .map(|(i, &on)| (i / sheet.cols, i % sheet.cols, on))
            .filter(|&(r, c, on)| self.is_filled(r, c) != on)
            .map(|(r, c, _)| (r, c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Everything the child has done to the current puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub answers: AnswerSheet,
    pub pairing: PairingState,
    pub coloring: ColoringState,
    pub dots: DotGridState,
    /// Set once the child asks for typed answers to be checked.
    pub checked: bool,
}

impl InteractionState {
    pub fn for_puzzle(puzzle: &PuzzleInstance, mode: ConnectMode) -> Self {
        let dots = match &puzzle.body {
            PuzzleBody::DotGrid(sheet) => DotGridState::for_sheet(sheet),
            _ => DotGridState::default(),
        };
        InteractionState {
            answers: AnswerSheet::default(),
            pairing: PairingState::new(mode),
            coloring: ColoringState::default(),
            dots,
            checked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_engine::{generate_puzzle, GameKind, PuzzleRequest};

    fn sheet_of(puzzle: &PuzzleInstance) -> &PairingSheet {
        match &puzzle.body {
            PuzzleBody::Pairing(sheet) => sheet,
            _ => panic!("not a pairing puzzle"),
        }
    }

    fn matching_puzzle() -> PuzzleInstance {
        generate_puzzle(&PuzzleRequest::new(GameKind::NumberMatch).with_seed(9)).expect("local game")
    }

    #[test]
    fn digits_filter_drops_other_characters() {
        let mut sheet = AnswerSheet::default();
        assert_eq!(sheet.enter("p-0", "1a2", EntryFilter::Digits), Some("12"));
        assert_eq!(sheet.enter("p-0", "7", EntryFilter::Digits), Some("7"));
        assert_eq!(sheet.enter("p-0", "x", EntryFilter::Digits), None);
        assert!(sheet.get("p-0").is_none());
    }

    #[test]
    fn single_char_keeps_latest_character() {
        let mut sheet = AnswerSheet::default();
        assert_eq!(sheet.enter("p-1", "34", EntryFilter::SingleChar), Some("4"));
        assert_eq!(sheet.enter("p-1", "5x", EntryFilter::SingleChar), Some("5"));
        assert_eq!(sheet.enter("p-1", "x", EntryFilter::SingleChar), None);
    }

    #[test]
    fn filter_follows_the_widest_answer() {
        let small = generate_puzzle(
            &PuzzleRequest::new(GameKind::AdditionDrill).with_seed(5).with_operands(0, 1).with_count(3),
        )
        .expect("local");
        assert_eq!(EntryFilter::for_puzzle(&small), EntryFilter::SingleChar);

        let wide = generate_puzzle(&PuzzleRequest::new(GameKind::AdditionDrill).with_seed(5).with_operands(10, 20))
            .expect("local");
        assert_eq!(EntryFilter::for_puzzle(&wide), EntryFilter::Digits);

        // No typed answers at all: pairing games keep the default.
        assert_eq!(EntryFilter::for_puzzle(&matching_puzzle()), EntryFilter::Digits);
    }

    #[test]
    fn check_answers_reports_each_problem() {
        let puzzle = generate_puzzle(&PuzzleRequest::new(GameKind::AdditionDrill).with_seed(3)).expect("local");
        let PuzzleBody::Arithmetic(arith) = &puzzle.body else { panic!("wrong body") };
        let mut sheet = AnswerSheet::default();
        sheet.enter("p-0", &arith.problems[0].answer.to_string(), EntryFilter::Digits);
        sheet.enter("p-1", &(arith.problems[1].answer + 1).to_string(), EntryFilter::Digits);

        let verdicts = check_answers(&puzzle, &sheet);
        assert_eq!(verdicts.len(), arith.problems.len());
        assert_eq!(verdicts["p-0"], Verdict::Correct);
        assert_eq!(verdicts["p-1"], Verdict::Incorrect);
        assert_eq!(verdicts["p-2"], Verdict::Unanswered);
    }

    #[test]
    fn validate_on_connect_rejects_mismatch_and_clears_selection() {
        let puzzle = matching_puzzle();
        let sheet = sheet_of(&puzzle);
        let mut state = PairingState::new(ConnectMode::ValidateOnConnect);

        let right = sheet.partner_of("l-0").expect("partner").id.clone();
        let wrong = sheet.right.iter().find(|r| r.id != right).expect("other").id.clone();

        assert!(state.select_left(sheet, "l-0"));
        assert_eq!(state.connect_right(sheet, &wrong), ConnectOutcome::Mismatch);
        assert!(state.selected().is_none());
        assert!(state.connection("l-0").is_none());

        state.select_left(sheet, "l-0");
        assert_eq!(state.connect_right(sheet, &right), ConnectOutcome::Connected);
        assert_eq!(state.connection("l-0"), Some(right.as_str()));
    }

    #[test]
    fn validate_on_demand_records_everything_last_write_wins() {
        let puzzle = matching_puzzle();
        let sheet = sheet_of(&puzzle);
        let mut state = PairingState::new(ConnectMode::ValidateOnDemand);

        let right = sheet.partner_of("l-1").expect("partner").id.clone();
        let wrong = sheet.right.iter().find(|r| r.id != right).expect("other").id.clone();

        state.select_left(sheet, "l-1");
        assert_eq!(state.connect_right(sheet, &wrong), ConnectOutcome::Connected);
        assert_eq!(state.check(sheet)["l-1"], false);
        assert!(state.is_checked());

        state.select_left(sheet, "l-1");
        assert_eq!(state.connect_right(sheet, &right), ConnectOutcome::Connected);
        assert!(!state.is_checked());
        assert_eq!(state.connections().count(), 1);
        assert_eq!(state.check(sheet)["l-1"], true);
    }

    #[test]
    fn connect_without_selection_or_with_unknown_ids() {
        let puzzle = matching_puzzle();
        let sheet = sheet_of(&puzzle);
        let mut state = PairingState::new(ConnectMode::ValidateOnDemand);
        assert_eq!(state.connect_right(sheet, "r-0"), ConnectOutcome::NoSelection);
        assert!(!state.select_left(sheet, "r-0"));
        state.select_left(sheet, "l-0");
        assert_eq!(state.connect_right(sheet, "l-1"), ConnectOutcome::UnknownItem);
    }

    #[test]
    fn coloring_needs_an_armed_color_and_last_color_wins() {
        let puzzle = generate_puzzle(&PuzzleRequest::new(GameKind::ColorByNumber).with_seed(4)).expect("local");
        let PuzzleBody::Coloring(sheet) = &puzzle.body else { panic!("wrong body") };
        let mut state = ColoringState::default();

        assert!(!state.paint(sheet, "g-0"));
        state.arm(Color::Red);
        assert!(state.paint(sheet, "g-0"));
        state.arm(Color::Blue);
        assert!(state.paint(sheet, "g-0"));
        assert!(state.paint(sheet, "g-0"));
        assert_eq!(state.color_of("g-0"), Some(Color::Blue));
        assert!(!state.paint(sheet, "g-999"));
    }

    #[test]
    fn dot_grid_toggles_and_reports_differences() {
        let sheet = DotGridSheet { rows: 2, cols: 2, model: vec![true, false, false, true] };
        let mut state = DotGridState::for_sheet(&sheet);
        assert_eq!(state.differences(&sheet), vec![(0, 0), (1, 1)]);

        assert_eq!(state.toggle(0, 0), Some(true));
        assert_eq!(state.toggle(1, 1), Some(true));
        assert!(state.differences(&sheet).is_empty());

        assert_eq!(state.toggle(0, 1), Some(true));
        assert_eq!(state.toggle(0, 1), Some(false));
        assert_eq!(state.toggle(2, 0), None);
    }
}
