//! In-memory stand-ins for the host and the content service, shared by tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde_json::Value;

use crate::error::ExportError;
use crate::export::{Bitmap, MountHandle, Rasterizer};
use crate::remote::{ContentRequest, ContentService, ServiceError};
use crate::surface::SurfaceNode;

type Responder = Box<dyn Fn(&ContentRequest) -> Result<Value, ServiceError>>;

/// Answers every request with a closure and counts the calls.
pub struct ScriptedService {
    responder: Responder,
    pub calls: Cell<usize>,
    pub requests: RefCell<Vec<ContentRequest>>,
}

impl ScriptedService {
    pub fn new(responder: impl Fn(&ContentRequest) -> Result<Value, ServiceError> + 'static) -> Self {
        ScriptedService { responder: Box::new(responder), calls: Cell::new(0), requests: RefCell::new(Vec::new()) }
    }

    /// Reply with the same JSON to every request.
    pub fn replying(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::new(move |_| Err(err.clone()))
    }
}

impl ContentService for ScriptedService {
    async fn complete(&self, request: &ContentRequest) -> Result<Value, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        (self.responder)(request)
    }
}

/// The count a picture request asks for, read back from its prompt.
pub fn requested_count(request: &ContentRequest) -> u32 {
    request
        .user_prompt
        .split("`count` to ")
        .nth(1)
        .and_then(|rest| rest.trim_end_matches('.').trim().parse().ok())
        .expect("picture prompt names a count")
}

/// Rasterizes a surface into its JSON, sized from the layout.
#[derive(Default)]
pub struct FakeRasterizer {
    next: u64,
    pub mounted: HashMap<MountHandle, SurfaceNode>,
    pub mounts: usize,
    pub last_surface: Option<SurfaceNode>,
    pub fail: bool,
}

impl FakeRasterizer {
    /// Mounts normally but fails every rasterization.
    pub fn failing() -> Self {
        FakeRasterizer { fail: true, ..Self::default() }
    }
}

impl Rasterizer for FakeRasterizer {
    fn mount(&mut self, surface: &SurfaceNode) -> Result<MountHandle, ExportError> {
        self.next += 1;
        self.mounts += 1;
        let handle = MountHandle(self.next);
        self.mounted.insert(handle, surface.clone());
        self.last_surface = Some(surface.clone());
        Ok(handle)
    }

    async fn rasterize(&mut self, handle: MountHandle, scale: f32) -> Result<Bitmap, ExportError> {
        if self.fail {
            return Err(ExportError::Rasterize("canvas unavailable".into()));
        }
        let surface = self.mounted.get(&handle).ok_or_else(|| ExportError::Rasterize("not mounted".into()))?;
        Ok(Bitmap {
            width_px: (surface.natural_width() as f32 * scale) as u32,
            height_px: (surface.natural_height() as f32 * scale) as u32,
            png: serde_json::to_vec(surface).expect("serialize surface"),
        })
    }

    fn unmount(&mut self, handle: MountHandle) {
        self.mounted.remove(&handle);
    }
}
