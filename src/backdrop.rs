// The animated background renderer.
// Visual: a dark full-screen backdrop with slow-moving green glows, repainted
// every display refresh while running, and nothing at all once stopped.
//
// Lifecycle
//  - `Stopped` → `start()` → `Running` → `stop()` → `Stopped`.
//  - While running it holds exactly one resize listener and at most one
//    pending frame request on the host; `stop()` gives both back.
//  - `draw_frame()` and `on_resize()` do nothing while stopped.

use crate::compositor::paint_mesh;
use crate::host::{FrameRequest, Host, ResizeListener};
use crate::mesh::{ControlPoint, InitialStateProvider, POINT_COUNT};
use crate::post::{hue_rotate, GrainTile, GRAIN_ALPHA, GRAIN_SEED, GRAIN_TILE};
use crate::surface::Surface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Nominal frame length added to the elapsed counter each frame.
pub const FRAME_DURATION: f64 = 1.0 / 60.0;

/// Scroll progress per wheel notch.
pub const SCROLL_STEP: f32 = 0.05;

/// Optional finishing passes on top of the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effects {
    pub grain: bool,
    /// Hue rotation at full scroll progress, in degrees.
    pub hue_shift_degrees: f32,
}

impl Effects {
    pub fn none() -> Self {
        Self { grain: false, hue_shift_degrees: 0.0 }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self { grain: true, hue_shift_degrees: 25.0 }
    }
}

struct Running {
    surface: Surface,
    points: [ControlPoint; POINT_COUNT],
    elapsed: f64,
    frames: u64,
    resize_listener: Option<ResizeListener>,
    pending_frame: Option<FrameRequest>,
}

pub struct Backdrop<P> {
    provider: P,
    effects: Effects,
    grain: Option<GrainTile>,
    scroll_progress: f32,
    running: Option<Running>,
}

impl<P: InitialStateProvider> Backdrop<P> {
    pub fn new(provider: P, effects: Effects) -> Self {
        let grain = effects
            .grain
            .then(|| GrainTile::generate(&mut StdRng::seed_from_u64(GRAIN_SEED), GRAIN_TILE));
        Self { provider, effects, grain, scroll_progress: 0.0, running: None }
    }

    /// Take the surface, seed the points and ask for the first frame.
    /// Without a surface this logs and stays stopped; the host page is unaffected.
    pub fn start<H: Host>(&mut self, host: &mut H) {
        if self.running.is_some() {
            warn!("backdrop already running, start ignored");
            return;
        }
        if let Err(e) = host.acquire_surface() {
            warn!(error = %e, "no drawing surface, backdrop stays static");
            return;
        }

        let viewport = host.viewport();
        let surface = Surface::new(viewport);
        let points = self.provider.initial_points();
        let resize_listener = host.add_resize_listener();
        let pending_frame = host.request_frame();

        let (pw, ph) = surface.physical_size();
        info!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = surface.pixel_ratio(),
            physical_width = pw as u64,
            physical_height = ph as u64,
            "backdrop started"
        );

        self.running = Some(Running {
            surface,
            points,
            elapsed: 0.0,
            frames: 0,
            resize_listener: Some(resize_listener),
            pending_frame: Some(pending_frame),
        });
    }

    /// Re-read the viewport and resize the surface. Points keep moving where they were.
    pub fn on_resize<H: Host>(&mut self, host: &H) {
        let Some(running) = self.running.as_mut() else { return };
        let viewport = host.viewport();
        running.surface.provision(viewport);
        let (pw, ph) = running.surface.physical_size();
        debug!(
            width = viewport.width,
            height = viewport.height,
            physical_width = pw as u64,
            physical_height = ph as u64,
            "surface resized"
        );
    }

    /// One display refresh: move the points, repaint, ask for the next frame.
    pub fn draw_frame<H: Host>(&mut self, host: &mut H) {
        let Some(running) = self.running.as_mut() else { return };
        // Normally already fired; cancelling keeps at most one request outstanding.
        if let Some(request) = running.pending_frame.take() {
            host.cancel_frame(request);
        }
        running.elapsed += FRAME_DURATION;
        running.frames += 1;

        for p in &mut running.points {
            p.step();
        }

        paint_mesh(&mut running.surface, &running.points);
        if let Some(grain) = &self.grain {
            grain.overlay(&mut running.surface, GRAIN_ALPHA);
        }
        hue_rotate(running.surface.buffer_mut(), self.scroll_progress * self.effects.hue_shift_degrees);

        running.pending_frame = Some(host.request_frame());
    }

    /// Hand back the frame request and resize listener, drop all state.
    /// Fine to call when never started.
    pub fn stop<H: Host>(&mut self, host: &mut H) {
        let Some(mut running) = self.running.take() else { return };
        if let Some(request) = running.pending_frame.take() {
            host.cancel_frame(request);
        }
        if let Some(listener) = running.resize_listener.take() {
            host.remove_resize_listener(listener);
        }
        info!(frames = running.frames, elapsed = running.elapsed, "backdrop stopped");
    }

    /// Move the scroll position; wheel up (positive) scrolls back towards the top.
    pub fn scroll_by(&mut self, notches: f32) {
        self.scroll_progress = (self.scroll_progress - notches * SCROLL_STEP).clamp(0.0, 1.0);
    }

    /// True if `request` is the frame this backdrop is waiting for.
    pub fn owns_frame(&self, request: FrameRequest) -> bool {
        self.running.as_ref().is_some_and(|r| r.pending_frame == Some(request))
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn points(&self) -> Option<&[ControlPoint; POINT_COUNT]> {
        self.running.as_ref().map(|r| &r.points)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.running.as_ref().map(|r| &r.surface)
    }

    pub fn elapsed(&self) -> Option<f64> {
        self.running.as_ref().map(|r| r.elapsed)
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }
}
