// The boundary between the renderer and whatever shows its pixels.
// A host answers "how big is the screen", hands out frame callbacks and resize
// notifications, and displays finished frames. `run` is the loop that ties a
// host to a `Backdrop`.

use crate::backdrop::Backdrop;
use crate::error::Error;
use crate::mesh::InitialStateProvider;
use crate::types::{FrameBuffer, Viewport};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Ticket for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(pub u64);

/// Ticket for one registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeListener(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Dimensions may have changed.
    Resized,
    /// A previously requested frame is due.
    Frame(FrameRequest),
    /// Scroll wheel moved by this many notches (positive = up).
    Scrolled(f32),
}

pub trait Host {
    /// Get hold of a 2D target. Fails when there is no graphical context.
    fn acquire_surface(&mut self) -> Result<(), Error>;
    fn viewport(&self) -> Viewport;

    fn add_resize_listener(&mut self) -> ResizeListener;
    fn remove_resize_listener(&mut self, listener: ResizeListener);

    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Next thing that happened. `None` once the host is gone.
    fn next_event(&mut self) -> Option<HostEvent>;

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
}

/// Drive `backdrop` on `host` until the host goes away.
/// The backdrop is always stopped on the way out, also when presenting fails.
pub fn run<H: Host, P: InitialStateProvider>(host: &mut H, backdrop: &mut Backdrop<P>) -> Result<(), Error> {
    backdrop.start(host);
    let result = dispatch(host, backdrop);
    backdrop.stop(host);
    result
}

fn dispatch<H: Host, P: InitialStateProvider>(host: &mut H, backdrop: &mut Backdrop<P>) -> Result<(), Error> {
    let mut fps = FpsCounter::new();
    while let Some(event) = host.next_event() {
        match event {
            HostEvent::Resized => backdrop.on_resize(host),
            HostEvent::Scrolled(notches) => backdrop.scroll_by(notches),
            HostEvent::Frame(request) => {
                if !backdrop.owns_frame(request) {
                    continue;
                }
                backdrop.draw_frame(host);
                if let Some(surface) = backdrop.surface() {
                    host.present(surface.buffer())?;
                }
                fps.tick();
            }
        }
    }
    Ok(())
}

/// Counts frames and logs the rate once per second.
struct FpsCounter {
    since: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self { since: Instant::now(), frames: 0 }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            debug!("FPS: {:.1}", fps);
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

/// In-memory host: a fixed viewport, a frame budget and a queue of scripted
/// events. Used for snapshots and to watch the renderer's bookkeeping.
pub struct HeadlessHost {
    viewport: Viewport,
    surface_available: bool,
    frames_left: u32,
    next_ticket: u64,
    pending: Vec<FrameRequest>,
    listeners: Vec<ResizeListener>,
    script: VecDeque<HostEvent>,
    presented: u32,
    last_frame: Option<FrameBuffer>,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport, frames: u32) -> Self {
        Self {
            viewport,
            surface_available: true,
            frames_left: frames,
            next_ticket: 1,
            pending: Vec::new(),
            listeners: Vec::new(),
            script: VecDeque::new(),
            presented: 0,
            last_frame: None,
        }
    }

    /// A host with no graphical context at all.
    pub fn without_surface(viewport: Viewport) -> Self {
        Self { surface_available: false, ..Self::new(viewport, 0) }
    }

    /// Change the reported size; listeners hear about it on the next event.
    pub fn resize_to(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.listeners.is_empty() {
            self.script.push_back(HostEvent::Resized);
        }
    }

    pub fn push_event(&mut self, event: HostEvent) {
        self.script.push_back(event);
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn presented(&self) -> u32 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last_frame.as_ref()
    }

    fn ticket(&mut self) -> u64 {
        let t = self.next_ticket;
        self.next_ticket += 1;
        t
    }
}

impl Host for HeadlessHost {
    fn acquire_surface(&mut self) -> Result<(), Error> {
        if self.surface_available {
            Ok(())
        } else {
            Err(Error::SurfaceUnavailable("headless host without a surface".into()))
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn add_resize_listener(&mut self) -> ResizeListener {
        let listener = ResizeListener(self.ticket());
        self.listeners.push(listener);
        listener
    }

    fn remove_resize_listener(&mut self, listener: ResizeListener) {
        self.listeners.retain(|l| *l != listener);
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.ticket());
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|r| *r != request);
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        if let Some(event) = self.script.pop_front() {
            return Some(event);
        }
        if self.frames_left == 0 || self.pending.is_empty() {
            return None;
        }
        self.frames_left -= 1;
        Some(HostEvent::Frame(self.pending.remove(0)))
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        self.presented += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::Effects;
    use crate::mesh::{ControlPoint, FixedPoints, POINT_COUNT};

    fn backdrop() -> Backdrop<FixedPoints> {
        let p = ControlPoint { x: 0.3, y: 0.7, vx: 0.0001, vy: -0.0001, radius: 250.0 };
        Backdrop::new(FixedPoints([p; POINT_COUNT]), Effects::none())
    }

    #[test]
    fn run_draws_frame_budget_and_cleans_up() {
        let mut host = HeadlessHost::new(Viewport::new(120.0, 80.0, 1.0), 5);
        let mut b = backdrop();
        run(&mut host, &mut b).unwrap();

        assert_eq!(host.presented(), 5);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.resize_listeners(), 0);
        assert!(!b.is_running());
        let frame = host.last_frame().unwrap();
        assert_eq!((frame.width, frame.height), (120, 80));
    }

    #[test]
    fn run_follows_scripted_resize() {
        let mut host = HeadlessHost::new(Viewport::new(100.0, 100.0, 1.0), 3);
        let mut b = backdrop();
        b.start(&mut host);
        host.resize_to(Viewport::new(60.0, 40.0, 3.0));
        run_started(&mut host, &mut b);

        let frame = host.last_frame().unwrap();
        assert_eq!((frame.width, frame.height), (120, 80));
    }

    // `run` would call `start` again; drive the already running backdrop instead.
    fn run_started(host: &mut HeadlessHost, b: &mut Backdrop<FixedPoints>) {
        dispatch(host, b).unwrap();
        b.stop(host);
    }

    #[test]
    fn run_without_surface_presents_nothing() {
        let mut host = HeadlessHost::without_surface(Viewport::new(100.0, 100.0, 1.0));
        let mut b = backdrop();
        run(&mut host, &mut b).unwrap();
        assert_eq!(host.presented(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.resize_listeners(), 0);
    }

    #[test]
    fn stale_frame_tickets_are_ignored() {
        let mut host = HeadlessHost::new(Viewport::new(50.0, 50.0, 1.0), 2);
        let mut b = backdrop();
        b.start(&mut host);
        host.push_event(HostEvent::Frame(FrameRequest(9999)));
        run_started(&mut host, &mut b);
        assert_eq!(host.presented(), 2);
    }
}
