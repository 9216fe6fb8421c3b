// The drawing surface: a pixel buffer plus how logical pixels map onto it.
// Visual: sharp output on high-density displays, but never more than 2x the
// logical size so a 4K laptop screen doesn't blow up the per-frame cost.

use crate::types::{FrameBuffer, Viewport};

pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// Effective ratio: the reported one capped at 2; junk or zero means 1.
pub fn capped_pixel_ratio(reported: f32) -> f32 {
    if reported.is_finite() && reported > 0.0 {
        reported.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Logical → physical affine map, the `setTransform(dpr, 0, 0, dpr, 0, 0)` kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub sx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub fn scale(s: f32) -> Self {
        Self { sx: s, sy: s, tx: 0.0, ty: 0.0 }
    }

    /// Logical point → physical point.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.sx + self.tx, y * self.sy + self.ty)
    }

    /// Physical point → logical point.
    #[inline]
    pub fn invert(&self, px: f32, py: f32) -> (f32, f32) {
        ((px - self.tx) / self.sx, (py - self.ty) / self.sy)
    }
}

pub struct Surface {
    logical_width: f32,
    logical_height: f32,
    pixel_ratio: f32,
    transform: Transform,
    buffer: FrameBuffer,
}

impl Surface {
    pub fn new(viewport: Viewport) -> Self {
        let mut surface = Self {
            logical_width: 0.0,
            logical_height: 0.0,
            pixel_ratio: 1.0,
            transform: Transform::scale(1.0),
            buffer: FrameBuffer::new(0, 0),
        };
        surface.provision(viewport);
        surface
    }

    /// Size the buffer for `viewport` and reset the transform.
    /// The buffer is only reallocated when its physical size actually changes.
    pub fn provision(&mut self, viewport: Viewport) {
        let ratio = capped_pixel_ratio(viewport.device_pixel_ratio);
        let w = viewport.width.max(0.0);
        let h = viewport.height.max(0.0);
        let pw = (w * ratio) as usize;
        let ph = (h * ratio) as usize;

        if pw != self.buffer.width || ph != self.buffer.height {
            self.buffer = FrameBuffer::new(pw, ph);
        }
        self.logical_width = w;
        self.logical_height = h;
        self.pixel_ratio = ratio;
        self.transform = Transform::scale(ratio);
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.logical_width, self.logical_height)
    }

    pub fn physical_size(&self) -> (usize, usize) {
        (self.buffer.width, self.buffer.height)
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }
}
