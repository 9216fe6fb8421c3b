// Native window host built on minifb.
// Visual effects provided here:
// 1) A resizable window that shows the backdrop, stretched to fill it.
// 2) Resizing the window re-sizes the backdrop's surface.
// 3) The scroll wheel drives the scroll-linked hue shift. ESC quits.

use crate::error::Error;
use crate::host::{FrameRequest, Host, HostEvent, ResizeListener};
use crate::settings::Settings;
use crate::types::{FrameBuffer, Viewport};
use minifb::{Key, ScaleMode, Window, WindowOptions};
use tracing::warn;

pub struct WindowHost {
    window: Option<Window>,  // None when the window could not be created
    init_error: Option<String>,
    pixel_ratio: f32,        // reported ratio, uncapped
    last_size: (usize, usize),
    listeners: Vec<ResizeListener>,
    pending: Option<FrameRequest>,
    next_ticket: u64,
    scroll_read: bool,       // wheel already reported since the last pump
}

impl WindowHost {
    /// Open a window of `settings.width × settings.height` logical pixels.
    /// Failure is logged and remembered; the backdrop then never starts.
    pub fn open(settings: &Settings) -> Self {
        let ratio = if settings.device_pixel_ratio > 0.0 { settings.device_pixel_ratio } else { 1.0 };
        let width = (settings.width * ratio).max(1.0) as usize;
        let height = (settings.height * ratio).max(1.0) as usize;
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };

        let (window, init_error) = match Window::new(&settings.title, width, height, options) {
            Ok(mut window) => {
                window.set_target_fps(settings.target_fps);
                (Some(window), None)
            }
            Err(e) => {
                warn!(error = %e, "could not open window");
                (None, Some(e.to_string()))
            }
        };

        Self {
            window,
            init_error,
            pixel_ratio: ratio,
            last_size: (width, height),
            listeners: Vec::new(),
            pending: None,
            next_ticket: 1,
            scroll_read: false,
        }
    }

    fn ticket(&mut self) -> u64 {
        let t = self.next_ticket;
        self.next_ticket += 1;
        t
    }
}

impl Host for WindowHost {
    fn acquire_surface(&mut self) -> Result<(), Error> {
        match (&self.window, &self.init_error) {
            (Some(_), _) => Ok(()),
            (None, Some(e)) => Err(Error::WindowInit(e.clone())),
            (None, None) => Err(Error::SurfaceUnavailable("no window".into())),
        }
    }

    fn viewport(&self) -> Viewport {
        let (w, h) = self.window.as_ref().map_or(self.last_size, |w| w.get_size());
        Viewport::new(w as f32 / self.pixel_ratio, h as f32 / self.pixel_ratio, self.pixel_ratio)
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
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        loop {
            let window = self.window.as_mut()?;
            if !window.is_open() || window.is_key_down(Key::Escape) {
                return None;
            }

            if !self.scroll_read {
                self.scroll_read = true;
                if let Some((_, dy)) = window.get_scroll_wheel() {
                    if dy != 0.0 {
                        return Some(HostEvent::Scrolled(dy));
                    }
                }
            }

            let size = window.get_size();
            if size != self.last_size {
                self.last_size = size;
                if !self.listeners.is_empty() {
                    return Some(HostEvent::Resized);
                }
            }

            if let Some(request) = self.pending.take() {
                return Some(HostEvent::Frame(request));
            }

            // Nothing due: pump the window's event queue and look again.
            window.update();
            self.scroll_read = false;
        }
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new backdrop frame.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        let Some(window) = self.window.as_mut() else { return Ok(()) };
        self.scroll_read = false;
        if frame.width == 0 || frame.height == 0 {
            // Minimized: nothing to show, keep events flowing.
            window.update();
            return Ok(());
        }
        window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}
