//! Generate one worksheet through a session and export it.
//!
//! Run with:
//!   cargo run --example worksheet -- --game story-problems --theme dinosaurs
//!
//! Remote games talk to an OpenAI-compatible server (`WORKSHEET_AI_ENDPOINT`,
//! `WORKSHEET_AI_MODEL`, `WORKSHEET_AI_KEY`). When it is unreachable the demo
//! still runs on the fallback puzzle and prints the notice.
//!
//! Export uses a text rasterizer: the "bitmap" is the blanked surface drawn
//! as plain text, and the sink writes it next to a JSON description of the page.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use worksheet_gen::export::{Bitmap, DocumentSink, MountHandle, Rasterizer, WorksheetDocument};
use worksheet_gen::surface::SurfaceNode;
use worksheet_gen::{
    DifficultyLevel, ExportError, GameKind, HttpContentService, PuzzleRequest, ServiceConfig, WorksheetSession,
};

#[derive(Parser)]
#[command(name = "worksheet")]
#[command(about = "Generate and export a printable worksheet")]
struct Cli {
    /// Game to generate, by its kebab-case name
    #[arg(long, default_value = "addition-drill", value_parser = parse_game)]
    game: GameKind,

    /// Content service URL
    #[arg(long, env = "WORKSHEET_AI_ENDPOINT", default_value = "http://localhost:8000")]
    endpoint: String,

    /// Model name passed to the content service
    #[arg(long, env = "WORKSHEET_AI_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Theme for story problems
    #[arg(long)]
    theme: Option<String>,

    /// Fixed seed for a reproducible sheet
    #[arg(long)]
    seed: Option<u64>,

    /// Use the advanced operand range
    #[arg(long)]
    advanced: bool,

    /// Directory the exported files are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_game(s: &str) -> Result<GameKind, String> {
    GameKind::ALL
        .into_iter()
        .find(|g| g.slug() == s)
        .ok_or_else(|| {
            let names: Vec<&str> = GameKind::ALL.iter().map(|g| g.slug()).collect();
            format!("unknown game `{s}` (expected one of: {})", names.join(", "))
        })
}

// ── host ──────────────────────────────────────────────────────────────────────

/// Draws each text-bearing node on its own line.
#[derive(Default)]
struct TextRasterizer {
    next: u64,
    mounted: Vec<(MountHandle, SurfaceNode)>,
}

impl Rasterizer for TextRasterizer {
    fn mount(&mut self, surface: &SurfaceNode) -> Result<MountHandle, ExportError> {
        self.next += 1;
        let handle = MountHandle(self.next);
        self.mounted.push((handle, surface.clone()));
        Ok(handle)
    }

    async fn rasterize(&mut self, handle: MountHandle, scale: f32) -> Result<Bitmap, ExportError> {
        let (_, surface) = self
            .mounted
            .iter()
            .find(|(h, _)| *h == handle)
            .ok_or_else(|| ExportError::Rasterize("surface is not mounted".into()))?;

        let mut lines = Vec::new();
        surface.walk(&mut |node| {
            if let Some(text) = &node.text {
                lines.push(text.clone());
            } else if node.id.is_some() && node.children.is_empty() {
                lines.push("____".to_string());
            }
        });
        Ok(Bitmap {
            width_px: (surface.natural_width() as f32 * scale) as u32,
            height_px: (surface.natural_height() as f32 * scale) as u32,
            png: lines.join("\n").into_bytes(),
        })
    }

    fn unmount(&mut self, handle: MountHandle) {
        self.mounted.retain(|(h, _)| *h != handle);
    }
}

struct DirectorySink {
    dir: PathBuf,
}

impl DocumentSink for DirectorySink {
    fn emit(&mut self, document: WorksheetDocument) -> Result<(), ExportError> {
        let sink_err = |e: std::io::Error| ExportError::Sink(e.to_string());
        let text_path = self.dir.join(document.file_name.replace(".pdf", ".txt"));
        std::fs::write(&text_path, &document.image.png).map_err(sink_err)?;

        let page = serde_json::to_vec_pretty(&document.layout).map_err(|e| ExportError::Sink(e.to_string()))?;
        std::fs::write(self.dir.join(document.file_name.replace(".pdf", ".json")), page).map_err(sink_err)?;
        info!(path = %text_path.display(), "worksheet written");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let mut config = ServiceConfig::from_env();
    config.endpoint = cli.endpoint;
    config.model = cli.model;
    let service = HttpContentService::new(config)?;

    let mut request = PuzzleRequest::new(cli.game);
    if let Some(seed) = cli.seed {
        request = request.with_seed(seed);
    }
    if let Some(theme) = cli.theme {
        request = request.with_theme(theme);
    }
    if cli.advanced {
        request = request.with_difficulty(DifficultyLevel::Advanced);
    }

    // Sessions start on a local sheet; the requested game replaces it.
    let mut session = WorksheetSession::new(&PuzzleRequest::new(GameKind::AdditionDrill))?;
    let puzzle = session.generate(&service, &request).await?;
    info!(puzzle_id = %puzzle.puzzle_id, source = ?puzzle.source, "generated {}", puzzle.title);
    if let Some(notice) = session.notice() {
        println!("{notice}");
    }

    let mut host = TextRasterizer::default();
    let mut sink = DirectorySink { dir: cli.out };
    let layout = session
        .export(&mut host, &mut sink)
        .await
        .map_err(|e| anyhow!("export failed: {e}"))?;
    info!(width = layout.page_width, height = layout.page_height, orientation = ?layout.orientation, "page laid out");
    Ok(())
}
