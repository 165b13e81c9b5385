//! Frame-callback runtime: a mounted scene renders one frame per callback
//! and asks the scheduler for the next one.
//!
//! The host owns the scheduler and the clock. A [`SceneMount`] holds the
//! scene, its raster and the id of the one frame it is waiting for.
//! Teardown cancels that frame, so once a mount is torn down nothing
//! renders again.

use crate::error::SceneError;
use crate::frame::{FrameContext, Viewport};
use crate::raster::Raster;
use crate::scene::Scene;

/// Handle for a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Source of frame callbacks.
pub trait FrameScheduler {
    /// Schedules one callback and returns its handle.
    fn request_frame(&mut self) -> FrameId;

    /// Cancels a pending callback. Unknown or already-fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);

    /// Current host clock in seconds.
    fn now(&self) -> f64;
}

/// Deterministic fixed-step scheduler for headless rendering and tests.
///
/// [`ManualScheduler::advance`] fires every pending callback at the current
/// clock value, then steps the clock by `1 / fps`.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameId>,
    now: f64,
    interval: f64,
}

impl ManualScheduler {
    /// A non-positive or non-finite `fps` falls back to 60.
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            60.0
        };
        Self {
            next_id: 1,
            pending: Vec::new(),
            now: 0.0,
            interval: 1.0 / fps,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drains the pending callbacks and returns them with the time they fire at.
    pub fn advance(&mut self) -> (f64, Vec<FrameId>) {
        let at = self.now;
        let due = std::mem::take(&mut self.pending);
        self.now += self.interval;
        (at, due)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.pending.retain(|&p| p != id);
    }

    fn now(&self) -> f64 {
        self.now
    }
}

/// A scene attached to a render surface and animating.
pub struct SceneMount<S: Scene> {
    scene: S,
    raster: Raster,
    viewport: Viewport,
    origin: f64,
    pending: Option<FrameId>,
    frames_rendered: u64,
}

impl<S: Scene> SceneMount<S> {
    /// Attaches `scene` to a surface and requests the first frame.
    ///
    /// With no surface the scene is dropped and `Ok(None)` is returned;
    /// nothing is scheduled.
    pub fn mount(
        mut scene: S,
        surface: Option<Viewport>,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<Option<Self>, SceneError> {
        let Some(viewport) = surface else {
            tracing::debug!("no surface to mount on, skipping");
            return Ok(None);
        };
        let raster = Raster::for_viewport(viewport, scene.background())?;
        scene.resize(viewport);
        let pending = Some(scheduler.request_frame());
        tracing::debug!(
            width = viewport.width(),
            height = viewport.height(),
            "scene mounted"
        );
        Ok(Some(Self {
            scene,
            raster,
            viewport,
            origin: scheduler.now(),
            pending,
            frames_rendered: 0,
        }))
    }

    /// Reallocates the raster for a new surface size.
    ///
    /// Resizing to the current size does nothing.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        if viewport == self.viewport {
            return Ok(());
        }
        self.raster = Raster::for_viewport(viewport, self.scene.background())?;
        self.viewport = viewport;
        self.scene.resize(viewport);
        tracing::debug!(
            width = viewport.width(),
            height = viewport.height(),
            "scene resized"
        );
        Ok(())
    }

    /// Handles a fired frame callback.
    ///
    /// Only the frame this mount requested is rendered; any other id is
    /// ignored and `Ok(false)` returned. After rendering, the next frame is
    /// requested. Frame time is seconds since mount.
    pub fn on_frame(
        &mut self,
        id: FrameId,
        now: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<bool, SceneError> {
        if self.pending != Some(id) {
            return Ok(false);
        }
        self.pending = None;
        let ctx = FrameContext::new(now - self.origin, self.viewport);
        self.scene.render(&ctx, &mut self.raster)?;
        self.frames_rendered += 1;
        self.pending = Some(scheduler.request_frame());
        tracing::trace!(frame = self.frames_rendered, time = ctx.time, "frame rendered");
        Ok(true)
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.scene.pointer_moved(x, y);
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Cancels the pending frame and releases the raster.
    pub fn teardown(self, scheduler: &mut dyn FrameScheduler) {
        if let Some(id) = self.pending {
            scheduler.cancel_frame(id);
        }
        tracing::debug!(frames = self.frames_rendered, "scene torn down");
    }
}

/// Drives `mount` for `frames` frames, handing each finished raster to `sink`.
pub fn run_frames<S: Scene>(
    mount: &mut SceneMount<S>,
    scheduler: &mut ManualScheduler,
    frames: u64,
    mut sink: impl FnMut(u64, &Raster) -> Result<(), SceneError>,
) -> Result<(), SceneError> {
    let target = mount.frames_rendered() + frames;
    while mount.frames_rendered() < target {
        let (now, due) = scheduler.advance();
        if due.is_empty() {
            break;
        }
        for id in due {
            if mount.on_frame(id, now, scheduler)? {
                sink(mount.frames_rendered(), mount.raster())?;
            }
        }
    }
    Ok(())
}
