use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameKind {
    AdditionDrill,
    MixedDrill,
    NumberMatch,
    SymbolMath,
    NumberMaze,
    ColorByNumber,
    DotGridCopy,
    PatternGrid,
    StoryProblems,
    PictureCount,
}

impl GameKind {
    pub const ALL: [GameKind; 10] = [
        GameKind::AdditionDrill,
        GameKind::MixedDrill,
        GameKind::NumberMatch,
        GameKind::SymbolMath,
        GameKind::NumberMaze,
        GameKind::ColorByNumber,
        GameKind::DotGridCopy,
        GameKind::PatternGrid,
        GameKind::StoryProblems,
        GameKind::PictureCount,
    ];

    /// Game kinds whose content comes from the remote content service.
    pub fn is_remote(self) -> bool {
        matches!(self, GameKind::PatternGrid | GameKind::StoryProblems | GameKind::PictureCount)
    }

    /// Two-letter prefix used in puzzle IDs.
    pub fn prefix(self) -> &'static str {
        match self {
            GameKind::AdditionDrill => "AD",
            GameKind::MixedDrill    => "MX",
            GameKind::NumberMatch   => "NM",
            GameKind::SymbolMath    => "SM",
            GameKind::NumberMaze    => "MZ",
            GameKind::ColorByNumber => "CN",
            GameKind::DotGridCopy   => "DG",
            GameKind::PatternGrid   => "PG",
            GameKind::StoryProblems => "SP",
            GameKind::PictureCount  => "PC",
        }
    }

    /// Kebab-case name, used for exported file names.
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::AdditionDrill => "addition-drill",
            GameKind::MixedDrill    => "mixed-drill",
            GameKind::NumberMatch   => "number-match",
            GameKind::SymbolMath    => "symbol-math",
            GameKind::NumberMaze    => "number-maze",
            GameKind::ColorByNumber => "color-by-number",
            GameKind::DotGridCopy   => "dot-grid-copy",
            GameKind::PatternGrid   => "pattern-grid",
            GameKind::StoryProblems => "story-problems",
            GameKind::PictureCount  => "picture-count",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameKind::AdditionDrill => "Addition Drill",
            GameKind::MixedDrill    => "Add & Subtract",
            GameKind::NumberMatch   => "Number Match",
            GameKind::SymbolMath    => "Symbol Math",
            GameKind::NumberMaze    => "Number Maze",
            GameKind::ColorByNumber => "Color by Number",
            GameKind::DotGridCopy   => "Dot Grid Copy",
            GameKind::PatternGrid   => "Pattern Grid",
            GameKind::StoryProblems => "Story Problems",
            GameKind::PictureCount  => "Picture Count",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Operand range used when the request does not set one.
    pub fn default_operands(self) -> OperandRange {
        match self {
            DifficultyLevel::Beginner     => OperandRange::new(0, 5),
            DifficultyLevel::Intermediate => OperandRange::new(0, 9),
            DifficultyLevel::Advanced     => OperandRange::new(0, 20),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyLevel::Beginner     => write!(f, "Beginner"),
            DifficultyLevel::Intermediate => write!(f, "Intermediate"),
            DifficultyLevel::Advanced     => write!(f, "Advanced"),
        }
    }
}

/// Largest operand any game will draw.
pub const MAX_OPERAND: u32 = 1000;

/// Upper bound on the number of problems, pairs or regions in one puzzle.
pub const MAX_COUNT: usize = 50;

/// Inclusive integer range operands are drawn from, within `0..=MAX_OPERAND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    /// Build a range; the bounds are swapped if given in the wrong order and
    /// clamped to [`MAX_OPERAND`].
    pub fn new(min: u32, max: u32) -> Self {
        let (min, max) = (min.min(MAX_OPERAND), max.min(MAX_OPERAND));
        if min <= max {
            OperandRange { min, max }
        } else {
            OperandRange { min: max, max: min }
        }
    }

    pub fn contains(self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleRequest {
    pub game: GameKind,
    pub difficulty: DifficultyLevel,
    pub rng_seed: Option<u64>,
    /// Number of problems / pairs / regions. `None` uses the game's default.
    pub count: Option<usize>,
    pub operands: Option<OperandRange>,
    /// Topic for remote story problems; required by that game.
    pub theme: Option<String>,
}

impl PuzzleRequest {
    /// Minimal request: Intermediate difficulty, entropy seed, game defaults.
    pub fn new(game: GameKind) -> Self {
        PuzzleRequest {
            game,
            difficulty: DifficultyLevel::Intermediate,
            rng_seed: None,
            count: None,
            operands: None,
            theme: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_operands(mut self, min: u32, max: u32) -> Self {
        self.operands = Some(OperandRange::new(min, max));
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Effective operand range. A range built field by field (or deserialized)
    /// is normalized the same way as one built through [`OperandRange::new`].
    pub fn operand_range(&self) -> OperandRange {
        match self.operands {
            Some(r) => OperandRange::new(r.min, r.max),
            None => self.difficulty.default_operands(),
        }
    }

    /// Requested count, or `default` when unset. Kept within `1..=MAX_COUNT`.
    pub fn count_or(&self, default: usize) -> usize {
        self.count.unwrap_or(default).clamp(1, MAX_COUNT)
    }
}

impl From<GameKind> for PuzzleRequest {
    fn from(game: GameKind) -> Self {
        PuzzleRequest::new(game)
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Operator {
    /// Apply to a running total. Subtraction floors at zero; addition saturates.
    pub fn apply(self, total: u32, value: u32) -> u32 {
        match self {
            Operator::Plus  => total.saturating_add(value),
            Operator::Minus => total.saturating_sub(value),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Plus  => write!(f, "+"),
            Operator::Minus => write!(f, "-"),
        }
    }
}

/// One operand with the operator that joins it to the running total.
/// The first term of a problem always carries `Plus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub op: Operator,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    /// Word-problem text; `None` for bare expressions.
    pub prompt: Option<String>,
    pub terms: Vec<Term>,
    pub answer: u32,
}

impl Problem {
    /// Render as `"3 + 4 - 2"`.
    pub fn expression(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            if i == 0 {
                out.push_str(&term.value.to_string());
            } else {
                out.push_str(&format!(" {} {}", term.op, term.value));
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticSheet {
    pub problems: Vec<Problem>,
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchItem {
    /// `l-<n>` for the left column, `r-<n>` for the right column.
    pub id: String,
    pub side: Side,
    pub content: String,
    pub match_key: i64,
}

impl MatchItem {
    /// A correct pair joins opposite columns with equal match-keys.
    pub fn matches(&self, other: &MatchItem) -> bool {
        self.side != other.side && self.match_key == other.match_key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingSheet {
    pub left: Vec<MatchItem>,
    pub right: Vec<MatchItem>,
}

impl PairingSheet {
    pub fn left_item(&self, id: &str) -> Option<&MatchItem> {
        self.left.iter().find(|item| item.id == id)
    }

    pub fn right_item(&self, id: &str) -> Option<&MatchItem> {
        self.right.iter().find(|item| item.id == id)
    }

    /// The right item that correctly answers `left_id`.
    pub fn partner_of(&self, left_id: &str) -> Option<&MatchItem> {
        let left = self.left_item(left_id)?;
        self.right.iter().find(|r| left.matches(r))
    }
}

// ---------------------------------------------------------------------------
// Symbol math
// ---------------------------------------------------------------------------

/// Fixed icon set shown in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    Apple,
    Star,
    Heart,
    Sun,
    Moon,
    Fish,
    Flower,
    Car,
    Ball,
}

impl Symbol {
    pub const ALL: [Symbol; 9] = [
        Symbol::Apple,
        Symbol::Star,
        Symbol::Heart,
        Symbol::Sun,
        Symbol::Moon,
        Symbol::Fish,
        Symbol::Flower,
        Symbol::Car,
        Symbol::Ball,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Apple  => "🍎",
            Symbol::Star   => "⭐",
            Symbol::Heart  => "❤️",
            Symbol::Sun    => "☀️",
            Symbol::Moon   => "🌙",
            Symbol::Fish   => "🐟",
            Symbol::Flower => "🌸",
            Symbol::Car    => "🚗",
            Symbol::Ball   => "⚽",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub symbol: Symbol,
    pub value: u8,
}

/// Bijective symbol → number key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn value_of(&self, symbol: Symbol) -> Option<u8> {
        self.entries.iter().find(|e| e.symbol == symbol).map(|e| e.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEquation {
    pub id: String,
    pub symbols: Vec<Symbol>,
    pub answer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSheet {
    pub legend: Legend,
    pub equations: Vec<SymbolEquation>,
}

// ---------------------------------------------------------------------------
// Number maze
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeTopology {
    Snake,
    Spiral,
    Zigzag,
}

impl MazeTopology {
    pub const ALL: [MazeTopology; 3] = [MazeTopology::Snake, MazeTopology::Spiral, MazeTopology::Zigzag];

    /// Node positions `(row, col)` in walk order on a 4×4 board.
    pub fn layout(self) -> &'static [(u8, u8)] {
        match self {
            MazeTopology::Snake => &[
                (0, 0), (0, 1), (0, 2), (0, 3),
                (1, 3), (1, 2), (1, 1), (1, 0),
                (2, 0), (2, 1), (2, 2), (2, 3),
            ],
            MazeTopology::Spiral => &[
                (0, 0), (0, 1), (0, 2), (0, 3),
                (1, 3), (2, 3), (3, 3), (3, 2),
                (3, 1), (3, 0), (2, 0), (1, 0),
                (1, 1), (1, 2), (2, 2),
            ],
            MazeTopology::Zigzag => &[
                (0, 0), (1, 0), (1, 1), (2, 1),
                (2, 2), (3, 2), (3, 3), (2, 3),
                (1, 3), (0, 3),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeNode {
    pub id: String,
    pub row: u8,
    pub col: u8,
    pub value: u32,
    /// Operation that produced `value` from the previous node; `None` on the start node.
    pub step: Option<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberMaze {
    pub topology: MazeTopology,
    pub nodes: Vec<MazeNode>,
}

impl NumberMaze {
    pub fn start(&self) -> Option<&MazeNode> {
        self.nodes.first()
    }

    pub fn terminal(&self) -> Option<&MazeNode> {
        self.nodes.last()
    }
}

// ---------------------------------------------------------------------------
// Color by number
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Color::Red    => "#e53935",
            Color::Orange => "#fb8c00",
            Color::Yellow => "#fdd835",
            Color::Green  => "#43a047",
            Color::Blue   => "#1e88e5",
            Color::Purple => "#8e24aa",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::Red    => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green  => "green",
            Color::Blue   => "blue",
            Color::Purple => "purple",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub number: u8,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub number: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoringSheet {
    pub key: Vec<KeyEntry>,
    pub regions: Vec<Region>,
}

impl ColoringSheet {
    pub fn color_for(&self, number: u8) -> Option<Color> {
        self.key.iter().find(|k| k.number == number).map(|k| k.color)
    }
}

// ---------------------------------------------------------------------------
// Dot grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotGridSheet {
    pub rows: usize,
    pub cols: usize,
    /// Row-major model pattern the child copies.
    pub model: Vec<bool>,
}

impl DotGridSheet {
    pub fn cell_id(row: usize, col: usize) -> String {
        format!("c-{row}-{col}")
    }
}

// ---------------------------------------------------------------------------
// Pattern grid
// ---------------------------------------------------------------------------

/// Cell value the remote service uses to mark the blank.
pub const MISSING_MARKER: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternGridSheet {
    pub size: usize,
    /// Row-major; exactly one `None`.
    pub cells: Vec<Option<i64>>,
    pub answer: i64,
}

impl PatternGridSheet {
    pub fn missing_index(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }
}

// ---------------------------------------------------------------------------
// Puzzle instance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleBody {
    Arithmetic(ArithmeticSheet),
    Pairing(PairingSheet),
    Symbols(SymbolSheet),
    Maze(NumberMaze),
    Coloring(ColoringSheet),
    DotGrid(DotGridSheet),
    Pattern(PatternGridSheet),
}

/// Expected value for one item of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expected {
    Value(i64),
    /// ID of the right-column item a left item pairs with.
    Pair(String),
    Color(Color),
    Cell(bool),
}

/// Item ID → expected value, derived once from the puzzle body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey(pub BTreeMap<String, Expected>);

impl AnswerKey {
    pub fn derive(body: &PuzzleBody) -> Self {
        let mut key = BTreeMap::new();
        match body {
            PuzzleBody::Arithmetic(sheet) => {
                for p in &sheet.problems {
                    key.insert(p.id.clone(), Expected::Value(i64::from(p.answer)));
                }
            }
            PuzzleBody::Pairing(sheet) => {
                for left in &sheet.left {
                    if let Some(right) = sheet.right.iter().find(|r| left.matches(r)) {
                        key.insert(left.id.clone(), Expected::Pair(right.id.clone()));
                    }
                }
            }
            PuzzleBody::Symbols(sheet) => {
                for eq in &sheet.equations {
                    key.insert(eq.id.clone(), Expected::Value(i64::from(eq.answer)));
                }
            }
            PuzzleBody::Maze(maze) => {
                // The start node is printed; every other node is an input.
                for node in maze.nodes.iter().skip(1) {
                    key.insert(node.id.clone(), Expected::Value(i64::from(node.value)));
                }
            }
            PuzzleBody::Coloring(sheet) => {
                for region in &sheet.regions {
                    if let Some(color) = sheet.color_for(region.number) {
                        key.insert(region.id.clone(), Expected::Color(color));
                    }
                }
            }
            PuzzleBody::DotGrid(sheet) => {
                for (i, on) in sheet.model.iter().enumerate() {
                    let id = DotGridSheet::cell_id(i / sheet.cols, i % sheet.cols);
                    key.insert(id, Expected::Cell(*on));
                }
            }
            PuzzleBody::Pattern(sheet) => {
                if let Some(i) = sheet.missing_index() {
                    key.insert(format!("cell-{i}"), Expected::Value(sheet.answer));
                }
            }
        }
        AnswerKey(key)
    }

    pub fn get(&self, id: &str) -> Option<&Expected> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Expected)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleSource {
    Local,
    Remote,
    /// Hand-authored default used when remote generation failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleInstance {
    pub puzzle_id: String,
    pub game: GameKind,
    pub title: String,
    pub source: PuzzleSource,
    pub body: PuzzleBody,
    pub answer_key: AnswerKey,
}
