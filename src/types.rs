// Core types shared by the renderer, compositor and hosts.

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // physical pixels across
    pub height: usize,     // physical pixels down
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// What the host reports about its display area.
/// `width`/`height` are logical (CSS) pixels; the ratio is reported as-is, uncapped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self { width, height, device_pixel_ratio }
    }
}

/// CSS-style colour: 8-bit channels, alpha in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Same as `rgba(r,g,b,a)` in CSS.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB` (e.g. `#1A1A1A` → `Rgba::hex(0x1A1A1A)`).
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 1.0,
        }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    /// Straight (non-premultiplied) channels in [0,1]: (r, g, b, a).
    #[inline]
    pub fn channels(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }

    /// Pack the colour channels as 0x00RRGGBB (alpha dropped).
    #[inline]
    pub fn to_u32(self) -> u32 {
        pack_rgb(self.r, self.g, self.b)
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_matches_css() {
        let c = Rgba::hex(0x1A1A1A);
        assert_eq!((c.r, c.g, c.b), (26, 26, 26));
        assert_eq!(c.a, 1.0);
        assert_eq!(c.to_u32(), 0x001A1A1A);
    }

    #[test]
    fn channels_keep_colour_apart_from_alpha() {
        let p = Rgba::new(255, 0, 51, 0.5).channels();
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 0.0);
        assert!((p[2] - 0.2).abs() < 1e-6);
        assert_eq!(p[3], 0.5);
    }

    #[test]
    fn pack_and_unpack_agree() {
        let px = pack_rgb(44, 95, 77);
        assert_eq!(unpack_rgb(px), (44, 95, 77));
    }
}
