// Finishing passes applied after the mesh is painted.
// Visual outcomes:
// - Scrolling tints the whole backdrop a few degrees around the colour wheel.
// - A very faint monochrome film grain sits on top so flat areas don't band.

use crate::surface::Surface;
use crate::types::{pack_rgb, unpack_rgb, FrameBuffer};
use rand::Rng;

/// Grain tile edge, in logical pixels.
pub const GRAIN_TILE: usize = 100;
/// Noise drawn at 0.3 inside a layer shown at 0.05.
pub const GRAIN_ALPHA: f32 = 0.3 * 0.05;
/// Fixed seed: the grain pattern is part of the look, not of the animation.
pub const GRAIN_SEED: u64 = 0xC0FFEE;

/// Rotate hue of every pixel by `degrees` using the CSS `hue-rotate()` matrix.
/// Greys stay grey (each row of the matrix sums to 1).
pub fn hue_rotate(buffer: &mut FrameBuffer, degrees: f32) {
    if degrees.abs() < f32::EPSILON {
        return;
    }
    let (s, c) = degrees.to_radians().sin_cos();
    let m = [
        [0.213 + 0.787 * c - 0.213 * s, 0.715 - 0.715 * c - 0.715 * s, 0.072 - 0.072 * c + 0.928 * s],
        [0.213 - 0.213 * c + 0.143 * s, 0.715 + 0.285 * c + 0.140 * s, 0.072 - 0.072 * c - 0.283 * s],
        [0.213 - 0.213 * c - 0.787 * s, 0.715 - 0.715 * c + 0.715 * s, 0.072 + 0.928 * c + 0.072 * s],
    ];
    let ch = |v: f32| v.round().clamp(0.0, 255.0) as u8;

    for px in &mut buffer.pixels {
        let (r, g, b) = unpack_rgb(*px);
        let (r, g, b) = (r as f32, g as f32, b as f32);
        *px = pack_rgb(
            ch(m[0][0] * r + m[0][1] * g + m[0][2] * b),
            ch(m[1][0] * r + m[1][1] * g + m[1][2] * b),
            ch(m[2][0] * r + m[2][1] * g + m[2][2] * b),
        );
    }
}

/// Square tile of grey noise values in [0,1], repeated across the surface.
pub struct GrainTile {
    size: usize,
    values: Vec<f32>,
}

impl GrainTile {
    /// Two octaves: per-pixel noise plus a coarser half-resolution layer,
    /// the cheap cousin of an SVG fractal-noise turbulence.
    pub fn generate<R: Rng>(rng: &mut R, size: usize) -> Self {
        let size = size.max(1);
        let coarse_size = size.div_ceil(2);
        let coarse: Vec<f32> = (0..coarse_size * coarse_size).map(|_| rng.r#gen::<f32>()).collect();

        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let fine: f32 = rng.r#gen();
                let low = coarse[(y / 2) * coarse_size + x / 2];
                values.push((fine * 0.6 + low * 0.4).clamp(0.0, 1.0));
            }
        }
        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.values[(y % self.size) * self.size + x % self.size]
    }

    /// Overlay-blend the tile onto the surface at `alpha`, tiled in logical pixels.
    pub fn overlay(&self, surface: &mut Surface, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let transform = surface.transform();
        let (pw, ph) = surface.physical_size();
        let pixels = &mut surface.buffer_mut().pixels;

        for y in 0..ph {
            let (_, ly) = transform.invert(0.0, y as f32 + 0.5);
            let ty = ly.max(0.0) as usize;
            for x in 0..pw {
                let (lx, _) = transform.invert(x as f32 + 0.5, 0.0);
                let n = self.value(lx.max(0.0) as usize, ty);
                let idx = y * pw + x;
                let (r, g, b) = unpack_rgb(pixels[idx]);
                let blend = |c: u8| {
                    let base = c as f32 / 255.0;
                    let mixed = base + (overlay(base, n) - base) * alpha;
                    (mixed * 255.0).round().clamp(0.0, 255.0) as u8
                };
                pixels[idx] = pack_rgb(blend(r), blend(g), blend(b));
            }
        }
    }
}

/// `mix-blend-mode: overlay` for one channel, both inputs in [0,1].
#[inline]
fn overlay(backdrop: f32, source: f32) -> f32 {
    if backdrop <= 0.5 {
        2.0 * backdrop * source
    } else {
        1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Viewport;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_degrees_leaves_pixels_alone() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.pixels = vec![pack_rgb(44, 95, 77), pack_rgb(200, 10, 30)];
        let before = fb.clone();
        hue_rotate(&mut fb, 0.0);
        assert_eq!(fb, before);
    }

    #[test]
    fn greys_survive_rotation() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.pixels[0] = pack_rgb(26, 26, 26);
        hue_rotate(&mut fb, 25.0);
        let (r, g, b) = unpack_rgb(fb.pixels[0]);
        for c in [r, g, b] {
            assert!((c as i32 - 26).abs() <= 1);
        }
    }

    #[test]
    fn rotation_shifts_green_towards_blue() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.pixels[0] = pack_rgb(44, 95, 77);
        hue_rotate(&mut fb, 25.0);
        let (_, g, b) = unpack_rgb(fb.pixels[0]);
        assert!(b > 77, "blue = {b}");
        assert!(g <= 95);
    }

    #[test]
    fn grain_tile_values_in_range_and_repeat() {
        let mut rng = StdRng::seed_from_u64(GRAIN_SEED);
        let tile = GrainTile::generate(&mut rng, GRAIN_TILE);
        assert_eq!(tile.size(), GRAIN_TILE);
        for y in 0..GRAIN_TILE {
            for x in 0..GRAIN_TILE {
                let v = tile.value(x, y);
                assert!((0.0..=1.0).contains(&v));
            }
        }
        assert_eq!(tile.value(3, 7), tile.value(3 + GRAIN_TILE, 7 + 2 * GRAIN_TILE));
    }

    #[test]
    fn grain_is_barely_visible() {
        let mut rng = StdRng::seed_from_u64(GRAIN_SEED);
        let tile = GrainTile::generate(&mut rng, GRAIN_TILE);
        let mut s = Surface::new(Viewport::new(64.0, 48.0, 2.0));
        s.buffer_mut().pixels.fill(0x001A1A1A);
        tile.overlay(&mut s, GRAIN_ALPHA);
        for &px in &s.buffer().pixels {
            let (r, g, b) = unpack_rgb(px);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!((r as i32 - 26).abs() <= 1);
        }
    }

    #[test]
    fn overlay_formula_matches_css() {
        assert_eq!(overlay(0.25, 0.5), 0.25);
        assert_eq!(overlay(0.75, 0.5), 0.75);
        assert_eq!(overlay(0.0, 1.0), 0.0);
        assert_eq!(overlay(1.0, 0.0), 1.0);
    }
}
