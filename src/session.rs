//! The per-puzzle controller a host shell talks to.
//!
//! A [`WorksheetSession`] owns exactly one puzzle and the interaction state for
//! it. Regeneration swaps both out in a single assignment, so nothing typed into
//! the old puzzle can leak into the new one. Generation takes `&mut self`, which
//! means a session can never have two generations (or a generation and an
//! export) in flight at once.

use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{ExportError, GenerateError};
use crate::export::{export_worksheet, DocumentSink, PageLayout, Rasterizer};
use crate::interaction::{
    check_answers, ConnectMode, ConnectOutcome, EntryFilter, InteractionState, Verdict,
};
use crate::puzzle_engine::{generate_puzzle, Color, PuzzleBody, PuzzleInstance, PuzzleRequest};
use crate::remote::{generate_remote, ContentService, Notice};
use crate::surface::{render_surface, SurfaceNode};

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct WorksheetSession {
    puzzle: PuzzleInstance,
    interaction: InteractionState,
    entry_filter: EntryFilter,
    notice: Option<Notice>,
    generation: u64,
    connect_mode: ConnectMode,
    export_config: ExportConfig,
    view_attached: bool,
}

impl WorksheetSession {
    /// Start a session on a locally generated puzzle.
    pub fn new(request: &PuzzleRequest) -> Result<Self, GenerateError> {
        Ok(Self::with_puzzle(generate_puzzle(request)?))
    }

    /// Start a session on an existing puzzle.
    pub fn with_puzzle(puzzle: PuzzleInstance) -> Self {
        let connect_mode = ConnectMode::ValidateOnConnect;
        WorksheetSession {
            interaction: InteractionState::for_puzzle(&puzzle, connect_mode),
            entry_filter: EntryFilter::for_puzzle(&puzzle),
            puzzle,
            notice: None,
            generation: 0,
            connect_mode,
            export_config: ExportConfig::default(),
            view_attached: true,
        }
    }

    /// Change how pairing games validate. Resets the current pairing state.
    pub fn with_connect_mode(mut self, mode: ConnectMode) -> Self {
        self.connect_mode = mode;
        self.interaction = InteractionState::for_puzzle(&self.puzzle, mode);
        self
    }

    pub fn with_export_config(mut self, config: ExportConfig) -> Self {
        self.export_config = config;
        self
    }

    fn replace(&mut self, puzzle: PuzzleInstance, notice: Option<Notice>) {
        self.interaction = InteractionState::for_puzzle(&puzzle, self.connect_mode);
        self.entry_filter = EntryFilter::for_puzzle(&puzzle);
        self.puzzle = puzzle;
        self.notice = notice;
        self.generation += 1;
        debug!(puzzle_id = %self.puzzle.puzzle_id, generation = self.generation, "puzzle replaced");
    }

    // -----------------------------------------------------------------------
    // Host operations
    // -----------------------------------------------------------------------

    /// Generate a new puzzle, locally or through `service` depending on the game.
    ///
    /// On error the current puzzle is left untouched.
    pub async fn generate<S: ContentService>(
        &mut self,
        service: &S,
        request: &PuzzleRequest,
    ) -> Result<&PuzzleInstance, GenerateError> {
        if request.game.is_remote() {
            let outcome = generate_remote(service, request).await?;
            self.replace(outcome.puzzle, outcome.notice);
        } else {
            let puzzle = generate_puzzle(request)?;
            self.replace(puzzle, None);
        }
        Ok(&self.puzzle)
    }

    /// Local-only shortcut that needs no content service.
    pub fn generate_local(&mut self, request: &PuzzleRequest) -> Result<&PuzzleInstance, GenerateError> {
        let puzzle = generate_puzzle(request)?;
        self.replace(puzzle, None);
        Ok(&self.puzzle)
    }

    /// Export a blank printable copy of the current puzzle.
    pub async fn export<R: Rasterizer, K: DocumentSink>(
        &self,
        host: &mut R,
        sink: &mut K,
    ) -> Result<PageLayout, ExportError> {
        let live = self.render();
        export_worksheet(live.as_ref(), &self.puzzle, self.generation, self.export_config, host, sink).await
    }

    // -----------------------------------------------------------------------
    // View lifecycle
    // -----------------------------------------------------------------------

    pub fn attach_view(&mut self) {
        self.view_attached = true;
    }

    /// The host tore its view down; exports fail until it is attached again.
    pub fn detach_view(&mut self) {
        self.view_attached = false;
    }

    /// The live surface, or `None` while no view is attached.
    pub fn render(&self) -> Option<SurfaceNode> {
        self.view_attached.then(|| render_surface(&self.puzzle, &self.interaction))
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Typed input for a problem, filtered to digits (or to one digit when
    /// every answer of the puzzle is a single digit).
    pub fn enter_answer(&mut self, id: &str, raw: &str) -> Option<&str> {
        self.interaction.checked = false;
        self.interaction.answers.enter(id, raw, self.entry_filter)
    }

    pub fn entry_filter(&self) -> EntryFilter {
        self.entry_filter
    }

    /// Mark typed answers and, for pairing games, every left item.
    pub fn check(&mut self) -> BTreeMap<String, Verdict> {
        self.interaction.checked = true;
        if let PuzzleBody::Pairing(sheet) = &self.puzzle.body {
            let edges = self.interaction.pairing.check(sheet);
            return sheet
                .left
                .iter()
                .map(|item| {
                    let verdict = match edges.get(&item.id) {
                        Some(true) => Verdict::Correct,
                        Some(false) => Verdict::Incorrect,
                        None => Verdict::Unanswered,
                    };
                    (item.id.clone(), verdict)
                })
                .collect();
        }
        check_answers(&self.puzzle, &self.interaction.answers)
    }

    pub fn select_left(&mut self, left_id: &str) -> bool {
        match &self.puzzle.body {
            PuzzleBody::Pairing(sheet) => self.interaction.pairing.select_left(sheet, left_id),
            _ => false,
        }
    }

    pub fn connect_right(&mut self, right_id: &str) -> ConnectOutcome {
        match &self.puzzle.body {
            PuzzleBody::Pairing(sheet) => self.interaction.pairing.connect_right(sheet, right_id),
            _ => ConnectOutcome::UnknownItem,
        }
    }

    pub fn arm_color(&mut self, color: Color) {
        self.interaction.coloring.arm(color);
    }

    pub fn paint(&mut self, region_id: &str) -> bool {
        match &self.puzzle.body {
            PuzzleBody::Coloring(sheet) => self.interaction.coloring.paint(sheet, region_id),
            _ => false,
        }
    }

    pub fn toggle_dot(&mut self, row: usize, col: usize) -> Option<bool> {
        self.interaction.dots.toggle(row, col)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn puzzle(&self) -> &PuzzleInstance {
        &self.puzzle
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Incremented every time the puzzle is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
