//! Printable worksheet export.
//!
//! The pipeline is: copy the live surface, blank the copy (no typed answers, no
//! selection or check marks, no connector overlay), pin its width, mount it
//! off-screen and rasterize it through the host, then lay the bitmap out on a
//! page sized to fit it. Rasterization is the only suspension point, and nothing
//! is handed to the [`DocumentSink`] until it has succeeded.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::puzzle_engine::{GameKind, PuzzleInstance};
use crate::surface::{
    SurfaceNode, CLASS_CONNECTED, CLASS_CORRECT, CLASS_FILLED, CLASS_INCORRECT, CLASS_PAINTED,
    CLASS_SELECTED,
};

/// Classes that only describe interaction and never appear on a printout.
pub const TRANSIENT_CLASSES: [&str; 6] = [
    CLASS_SELECTED,
    CLASS_CONNECTED,
    CLASS_CORRECT,
    CLASS_INCORRECT,
    CLASS_PAINTED,
    CLASS_FILLED,
];

fn sanitize(node: &mut SurfaceNode) {
    node.value = None;
    node.fill = None;
    node.classes.retain(|c| !TRANSIENT_CLASSES.contains(&c.as_str()));
    node.children.retain(|c| !c.overlay);
    for child in &mut node.children {
        sanitize(child);
    }
}

/// Blanked copy of the live surface with its width pinned to the content width.
pub fn blank_copy(live: &SurfaceNode) -> SurfaceNode {
    let mut copy = live.clone();
    sanitize(&mut copy);
    copy.fixed_width = Some(copy.natural_width());
    copy
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub width_px: u32,
    pub height_px: u32,
    /// Encoded image bytes as produced by the host.
    pub png: Vec<u8>,
}

/// Host capability that renders a surface off-screen into a bitmap.
#[allow(async_fn_in_trait)]
pub trait Rasterizer {
    fn mount(&mut self, surface: &SurfaceNode) -> Result<MountHandle, ExportError>;

    async fn rasterize(&mut self, handle: MountHandle, scale: f32) -> Result<Bitmap, ExportError>;

    fn unmount(&mut self, handle: MountHandle);
}

/// An off-screen mount that is removed when dropped, whatever the outcome.
struct Mounted<'a, R: Rasterizer> {
    host: &'a mut R,
    handle: MountHandle,
}

impl<'a, R: Rasterizer> Mounted<'a, R> {
    fn new(host: &'a mut R, surface: &SurfaceNode) -> Result<Self, ExportError> {
        let handle = host.mount(surface)?;
        debug!(handle = handle.0, "mounted off-screen copy");
        Ok(Mounted { host, handle })
    }

    async fn rasterize(&mut self, scale: f32) -> Result<Bitmap, ExportError> {
        self.host.rasterize(self.handle, scale).await
    }
}

impl<R: Rasterizer> Drop for Mounted<'_, R> {
    fn drop(&mut self) {
        self.host.unmount(self.handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width: u32,
    pub page_height: u32,
    pub orientation: Orientation,
    pub image_x: u32,
    pub image_y: u32,
    pub image_width: u32,
    pub image_height: u32,
}

/// Page that fits the bitmap plus `margin` on every side.
///
/// Landscape only when the margined width is strictly greater than the
/// margined height.
pub fn page_layout(width_px: u32, height_px: u32, margin: u32) -> PageLayout {
    let page_width = width_px + 2 * margin;
    let page_height = height_px + 2 * margin;
    let orientation = if page_width > page_height { Orientation::Landscape } else { Orientation::Portrait };
    PageLayout {
        page_width,
        page_height,
        orientation,
        image_x: margin,
        image_y: margin,
        image_width: width_px,
        image_height: height_px,
    }
}

pub fn file_name(game: GameKind) -> String {
    format!("{}-worksheet.pdf", game.slug())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetDocument {
    pub file_name: String,
    pub game: GameKind,
    pub puzzle_id: String,
    /// Session generation the snapshot was taken from.
    pub generation: u64,
    pub layout: PageLayout,
    pub image: Bitmap,
}

/// Host capability that turns a laid-out document into a download.
pub trait DocumentSink {
    fn emit(&mut self, document: WorksheetDocument) -> Result<(), ExportError>;
}

/// Keeps every emitted document in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub documents: Vec<WorksheetDocument>,
}

impl DocumentSink for CollectingSink {
    fn emit(&mut self, document: WorksheetDocument) -> Result<(), ExportError> {
        self.documents.push(document);
        Ok(())
    }
}

/// Export the live surface of `puzzle` as a single-page printable document.
///
/// `live` is `None` when no view is mounted; that is reported as
/// [`ExportError::SurfaceUnavailable`] and nothing is emitted.
pub async fn export_worksheet<R: Rasterizer, K: DocumentSink>(
    live: Option<&SurfaceNode>,
    puzzle: &PuzzleInstance,
    generation: u64,
    config: ExportConfig,
    host: &mut R,
    sink: &mut K,
) -> Result<PageLayout, ExportError> {
    let live = live.ok_or(ExportError::SurfaceUnavailable)?;
    let copy = blank_copy(live);

    let mut mounted = Mounted::new(host, &copy)?;
    let bitmap = mounted.rasterize(config.scale).await;
    drop(mounted);
    let bitmap = bitmap?;
    if bitmap.width_px == 0 || bitmap.height_px == 0 {
        return Err(ExportError::EmptyBitmap);
    }

    let layout = page_layout(bitmap.width_px, bitmap.height_px, config.margin_px);
    let document = WorksheetDocument {
        file_name: file_name(puzzle.game),
        game: puzzle.game,
        puzzle_id: puzzle.puzzle_id.clone(),
        generation,
        layout,
        image: bitmap,
    };
    info!(
        file = %document.file_name,
        width = layout.page_width,
        height = layout.page_height,
        orientation = ?layout.orientation,
        "worksheet exported"
    );
    sink.emit(document)?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NodeKind;

    #[test]
    fn orientation_follows_margined_aspect() {
        assert_eq!(page_layout(300, 200, 20).orientation, Orientation::Landscape);
        assert_eq!(page_layout(200, 300, 20).orientation, Orientation::Portrait);
        // Square pages are portrait.
        assert_eq!(page_layout(200, 200, 20).orientation, Orientation::Portrait);
    }

    #[test]
    fn image_sits_at_margin_offset() {
        let layout = page_layout(640, 480, 20);
        assert_eq!((layout.page_width, layout.page_height), (680, 520));
        assert_eq!((layout.image_x, layout.image_y), (20, 20));
        assert_eq!((layout.image_width, layout.image_height), (640, 480));
    }

    #[test]
    fn blank_copy_strips_interaction_state() {
        let mut overlay = SurfaceNode::new(NodeKind::Canvas).sized(500, 10);
        overlay.overlay = true;
        let mut region = SurfaceNode::new(NodeKind::Region).with_class("painted").with_class("shape");
        region.fill = Some("#e53935".into());
        let live = SurfaceNode::column(vec![
            SurfaceNode::input("p-0", Some("7")).with_class("correct"),
            SurfaceNode::new(NodeKind::Item).with_class("selected").sized(40, 10),
            region,
            overlay,
        ]);

        let copy = blank_copy(&live);
        assert_eq!(copy.children.len(), 3);
        let mut leftovers = Vec::new();
        copy.walk(&mut |n| {
            if n.value.is_some() || n.fill.is_some() || n.overlay {
                leftovers.push(n.kind);
            }
            for class in &n.classes {
                assert!(!TRANSIENT_CLASSES.contains(&class.as_str()), "class {class} survived");
            }
        });
        assert!(leftovers.is_empty(), "unsanitized nodes: {leftovers:?}");
        assert!(copy.children[2].classes.contains("shape"));
        // The overlay no longer counts toward the pinned width.
        assert_eq!(copy.fixed_width, Some(48));
        // The live surface is untouched.
        assert_eq!(live.children[0].value.as_deref(), Some("7"));
    }

    #[test]
    fn file_names_are_fixed_per_game() {
        assert_eq!(file_name(GameKind::NumberMatch), "number-match-worksheet.pdf");
        assert_eq!(file_name(GameKind::PatternGrid), "pattern-grid-worksheet.pdf");
    }
}
