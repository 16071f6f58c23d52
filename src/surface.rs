//! Rendered worksheet surface.
//!
//! [`render_surface`] turns the current puzzle plus interaction state into a
//! small layout tree, the same thing a host view would put on screen. The
//! exporter works on a copy of this tree; hosts rasterize it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::interaction::{check_answers, InteractionState, Verdict};
use crate::puzzle_engine::{
    ArithmeticSheet, ColoringSheet, DotGridSheet, NumberMaze, PairingSheet, PatternGridSheet,
    PuzzleBody, PuzzleInstance, SymbolSheet,
};

const GAP: u32 = 8;
const CHAR_WIDTH: u32 = 12;
const LINE_HEIGHT: u32 = 24;
const INPUT_SIZE: (u32, u32) = (48, 40);
const ITEM_SIZE: (u32, u32) = (120, 48);
const CELL_SIZE: u32 = 32;
const CONNECTOR_WIDTH: u32 = 96;

pub const CLASS_SELECTED: &str = "selected";
pub const CLASS_CONNECTED: &str = "connected";
pub const CLASS_CORRECT: &str = "correct";
pub const CLASS_INCORRECT: &str = "incorrect";
pub const CLASS_PAINTED: &str = "painted";
pub const CLASS_FILLED: &str = "filled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Sheet,
    Group,
    Text,
    Input,
    Item,
    Cell,
    Region,
    /// Connector-line drawing layer.
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Row,
    Column,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceNode {
    pub kind: NodeKind,
    pub id: Option<String>,
    pub layout: Layout,
    pub classes: BTreeSet<String>,
    pub text: Option<String>,
    /// Current input value; only meaningful on `Input` nodes.
    pub value: Option<String>,
    /// Fill color (hex) applied by the child.
    pub fill: Option<String>,
    pub intrinsic_width: u32,
    pub intrinsic_height: u32,
    /// Width pinned by the exporter before off-screen rendering.
    pub fixed_width: Option<u32>,
    /// Only meaningful while interacting; never printed.
    pub overlay: bool,
    pub children: Vec<SurfaceNode>,
}

impl SurfaceNode {
    pub fn new(kind: NodeKind) -> Self {
        SurfaceNode {
            kind,
            id: None,
            layout: Layout::Column,
            classes: BTreeSet::new(),
            text: None,
            value: None,
            fill: None,
            intrinsic_width: 0,
            intrinsic_height: 0,
            fixed_width: None,
            overlay: false,
            children: Vec::new(),
        }
    }

    pub fn row(children: Vec<SurfaceNode>) -> Self {
        SurfaceNode { layout: Layout::Row, children, ..SurfaceNode::new(NodeKind::Group) }
    }

    pub fn column(children: Vec<SurfaceNode>) -> Self {
        SurfaceNode { layout: Layout::Column, children, ..SurfaceNode::new(NodeKind::Group) }
    }

    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        let width = s.chars().count() as u32 * CHAR_WIDTH;
        SurfaceNode { text: Some(s), ..SurfaceNode::new(NodeKind::Text) }.sized(width, LINE_HEIGHT)
    }

    pub fn input(id: impl Into<String>, value: Option<&str>) -> Self {
        SurfaceNode {
            id: Some(id.into()),
            value: value.map(str::to_string),
            ..SurfaceNode::new(NodeKind::Input)
        }
        .sized(INPUT_SIZE.0, INPUT_SIZE.1)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, s: impl Into<String>) -> Self {
        self.text = Some(s.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_class_if(self, cond: bool, class: &str) -> Self {
        if cond { self.with_class(class) } else { self }
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.intrinsic_width = width;
        self.intrinsic_height = height;
        self
    }

    /// Width the content wants when nothing constrains it.
    pub fn natural_width(&self) -> u32 {
        if let Some(w) = self.fixed_width {
            return w;
        }
        let children = self.children.iter().map(SurfaceNode::natural_width);
        let content = match self.layout {
            Layout::Row => children.sum::<u32>() + GAP * (self.children.len().saturating_sub(1) as u32),
            Layout::Column => children.max().unwrap_or(0),
        };
        self.intrinsic_width.max(content)
    }

    pub fn natural_height(&self) -> u32 {
        let children = self.children.iter().map(SurfaceNode::natural_height);
        let content = match self.layout {
            Layout::Row => children.max().unwrap_or(0),
            Layout::Column => children.sum::<u32>() + GAP * (self.children.len().saturating_sub(1) as u32),
        };
        self.intrinsic_height.max(content)
    }

    /// Depth-first search by ID.
    pub fn find(&self, id: &str) -> Option<&SurfaceNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Visit every node, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SurfaceNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

fn verdict_class(verdict: Option<&Verdict>) -> Option<&'static str> {
    match verdict {
        Some(Verdict::Correct) => Some(CLASS_CORRECT),
        Some(Verdict::Incorrect) => Some(CLASS_INCORRECT),
        _ => None,
    }
}

fn answer_input(id: &str, state: &InteractionState, verdicts: Option<&BTreeMap<String, Verdict>>) -> SurfaceNode {
    let node = SurfaceNode::input(id, state.answers.get(id));
    match verdict_class(verdicts.and_then(|v| v.get(id))) {
        Some(class) => node.with_class(class),
        None => node,
    }
}

fn arithmetic(sheet: &ArithmeticSheet, state: &InteractionState, verdicts: Option<&BTreeMap<String, Verdict>>) -> SurfaceNode {
    let rows = sheet
        .problems
        .iter()
        .map(|p| {
            let mut row = Vec::new();
            if let Some(prompt) = &p.prompt {
                row.push(SurfaceNode::text(prompt.as_str()));
            }
            row.push(SurfaceNode::text(format!("{} =", p.expression())));
            row.push(answer_input(&p.id, state, verdicts));
            SurfaceNode::row(row)
        })
        .collect();
    SurfaceNode::column(rows)
}

fn pairing(sheet: &PairingSheet, state: &InteractionState) -> SurfaceNode {
    let pairing = &state.pairing;
    let results = pairing.is_checked().then(|| pairing.evaluate(sheet));
    let connected_right: BTreeSet<&str> = pairing.connections().map(|(_, r)| r).collect();

    let left = sheet
        .left
        .iter()
        .map(|item| {
            let node = SurfaceNode::new(NodeKind::Item)
                .with_id(item.id.as_str())
                .with_text(item.content.as_str())
                .sized(ITEM_SIZE.0, ITEM_SIZE.1)
                .with_class_if(pairing.selected() == Some(item.id.as_str()), CLASS_SELECTED)
                .with_class_if(pairing.connection(&item.id).is_some(), CLASS_CONNECTED);
            match results.as_ref().and_then(|r| r.get(&item.id)) {
                Some(true) => node.with_class(CLASS_CORRECT),
                Some(false) => node.with_class(CLASS_INCORRECT),
                None => node,
            }
        })
        .collect();
    let right = sheet
        .right
        .iter()
        .map(|item| {
            SurfaceNode::new(NodeKind::Item)
                .with_id(item.id.as_str())
                .with_text(item.content.as_str())
                .sized(ITEM_SIZE.0, ITEM_SIZE.1)
                .with_class_if(connected_right.contains(item.id.as_str()), CLASS_CONNECTED)
        })
        .collect();

    let mut canvas = SurfaceNode::new(NodeKind::Canvas).with_id("connectors").sized(CONNECTOR_WIDTH, 0);
    canvas.overlay = true;

    SurfaceNode::row(vec![SurfaceNode::column(left), canvas, SurfaceNode::column(right)])
}

fn symbols(sheet: &SymbolSheet, state: &InteractionState, verdicts: Option<&BTreeMap<String, Verdict>>) -> SurfaceNode {
    let legend = sheet
        .legend
        .entries
        .iter()
        .map(|e| SurfaceNode::text(format!("{} = {}", e.symbol, e.value)))
        .collect();
    let equations = sheet.equations.iter().map(|eq| {
        let glyphs: Vec<String> = eq.symbols.iter().map(|s| s.to_string()).collect();
        SurfaceNode::row(vec![
            SurfaceNode::text(format!("{} =", glyphs.join(" + "))),
            answer_input(&eq.id, state, verdicts),
        ])
    });
    let mut rows = vec![SurfaceNode::row(legend).with_id("legend")];
    rows.extend(equations);
    SurfaceNode::column(rows)
}

fn maze(maze: &NumberMaze, state: &InteractionState, verdicts: Option<&BTreeMap<String, Verdict>>) -> SurfaceNode {
    let rows = maze.nodes.iter().map(|n| n.row).max().map_or(0, |r| r + 1);
    let cols = maze.nodes.iter().map(|n| n.col).max().map_or(0, |c| c + 1);
    let grid = (0..rows)
        .map(|r| {
            let cells = (0..cols)
                .map(|c| match maze.nodes.iter().position(|n| n.row == r && n.col == c) {
                    Some(0) => SurfaceNode::text(maze.nodes[0].value.to_string()).with_id(maze.nodes[0].id.as_str()),
                    Some(i) => {
                        let node = &maze.nodes[i];
                        let label = node.step.map(|s| format!("{}{}", s.op, s.value)).unwrap_or_default();
                        SurfaceNode::column(vec![SurfaceNode::text(label), answer_input(&node.id, state, verdicts)])
                    }
                    None => SurfaceNode::new(NodeKind::Cell).sized(INPUT_SIZE.0, INPUT_SIZE.1),
                })
                .collect();
            SurfaceNode::row(cells)
        })
        .collect();
    SurfaceNode::column(grid)
}

fn coloring(sheet: &ColoringSheet, state: &InteractionState) -> SurfaceNode {
    let key = sheet
        .key
        .iter()
        .map(|k| SurfaceNode::text(format!("{} = {}", k.number, k.color)))
        .collect();
    let regions: Vec<SurfaceNode> = sheet
        .regions
        .iter()
        .map(|region| {
            let mut node = SurfaceNode::new(NodeKind::Region)
                .with_id(region.id.as_str())
                .with_text(region.number.to_string())
                .sized(ITEM_SIZE.1, ITEM_SIZE.1);
            if let Some(color) = state.coloring.color_of(&region.id) {
                node.fill = Some(color.hex().to_string());
                node = node.with_class(CLASS_PAINTED);
            }
            node
        })
        .collect();
    let rows = regions.chunks(4).map(|chunk| SurfaceNode::row(chunk.to_vec()));
    let mut out = vec![SurfaceNode::row(key).with_id("key")];
    out.extend(rows);
    SurfaceNode::column(out)
}

fn dot_grid(sheet: &DotGridSheet, state: &InteractionState) -> SurfaceNode {
    let grid = |user: bool| {
        let rows = (0..sheet.rows)
            .map(|r| {
                let cells = (0..sheet.cols)
                    .map(|c| {
                        let cell = SurfaceNode::new(NodeKind::Cell).sized(CELL_SIZE, CELL_SIZE);
                        if user {
                            cell.with_id(DotGridSheet::cell_id(r, c))
                                .with_class_if(state.dots.is_filled(r, c), CLASS_FILLED)
                        } else {
                            let on = sheet.model.get(r * sheet.cols + c).copied().unwrap_or(false);
                            cell.with_class_if(on, "on")
                        }
                    })
                    .collect();
                SurfaceNode::row(cells)
            })
            .collect();
        SurfaceNode::column(rows)
    };
    SurfaceNode::row(vec![grid(false).with_id("model"), grid(true).with_id("copy")])
}

fn pattern(sheet: &PatternGridSheet, state: &InteractionState, verdicts: Option<&BTreeMap<String, Verdict>>) -> SurfaceNode {
    let size = sheet.size.max(1);
    let cells: Vec<SurfaceNode> = sheet
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Some(v) => SurfaceNode::text(v.to_string()).sized(INPUT_SIZE.0, INPUT_SIZE.1),
            None => answer_input(&format!("cell-{i}"), state, verdicts),
        })
        .collect();
    SurfaceNode::column(cells.chunks(size).map(|row| SurfaceNode::row(row.to_vec())).collect())
}

/// Build the live surface for a puzzle and what the child has done to it.
pub fn render_surface(puzzle: &PuzzleInstance, state: &InteractionState) -> SurfaceNode {
    let verdicts = state.checked.then(|| check_answers(puzzle, &state.answers));
    let verdicts = verdicts.as_ref();

    let body = match &puzzle.body {
        PuzzleBody::Arithmetic(sheet) => arithmetic(sheet, state, verdicts),
        PuzzleBody::Pairing(sheet) => pairing(sheet, state),
        PuzzleBody::Symbols(sheet) => symbols(sheet, state, verdicts),
        PuzzleBody::Maze(m) => maze(m, state, verdicts),
        PuzzleBody::Coloring(sheet) => coloring(sheet, state),
        PuzzleBody::DotGrid(sheet) => dot_grid(sheet, state),
        PuzzleBody::Pattern(sheet) => pattern(sheet, state, verdicts),
    };

    SurfaceNode {
        layout: Layout::Column,
        children: vec![SurfaceNode::text(puzzle.title.as_str()).with_id("title"), body],
        ..SurfaceNode::new(NodeKind::Sheet)
    }
    .with_id(puzzle.puzzle_id.as_str())
}
