// Layered gradient painting onto the surface.
// Visual outcomes:
// - A flat charcoal base.
// - Four soft glows (two muted greens, two near-blacks) stacked back to front.
// - A vignette that darkens the edges, centred a little below the middle.

use crate::mesh::{ControlPoint, POINT_COUNT};
use crate::surface::Surface;
use crate::types::{pack_rgb, unpack_rgb, Rgba};

pub const BASE_COLOR: Rgba = Rgba::hex(0x1A1A1A);

/// One entry of the layer table: a colour and which control point carries it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub color: Rgba,
    pub point: usize,
}

/// Back to front. Later entries paint over earlier ones.
pub const LAYERS: [Layer; POINT_COUNT] = [
    Layer { color: Rgba::new(44, 95, 77, 0.38), point: 0 },   // hunter green, soft
    Layer { color: Rgba::new(34, 34, 34, 0.6), point: 1 },
    Layer { color: Rgba::new(26, 26, 26, 0.7), point: 2 },
    Layer { color: Rgba::new(80, 120, 105, 0.18), point: 3 }, // pale green haze
];

pub const VIGNETTE_COLOR: Rgba = Rgba::new(0, 0, 0, 0.45);
pub const VIGNETTE_CENTER: (f32, f32) = (0.5, 0.6); // fraction of width/height
pub const VIGNETTE_RADIUS: f32 = 0.8;               // fraction of max(width, height)

/// Two-stop radial gradient in logical coordinates.
/// `inner` at the centre, `outer` at `radius` and everywhere beyond it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialGradient {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub inner: Rgba,
    pub outer: Rgba,
}

impl RadialGradient {
    /// Colour at distance `d` from the centre, premultiplied for compositing.
    /// Stops are mixed as straight RGBA like canvas does, so fading to
    /// `rgba(0,0,0,0)` also fades towards black on the way.
    #[inline]
    fn sample(&self, d: f32, inner: &[f32; 4], outer: &[f32; 4]) -> [f32; 4] {
        let t = if self.radius > 0.0 { (d / self.radius).clamp(0.0, 1.0) } else { 1.0 };
        let s = 1.0 - t;
        let a = inner[3] * s + outer[3] * t;
        [
            (inner[0] * s + outer[0] * t) * a,
            (inner[1] * s + outer[1] * t) * a,
            (inner[2] * s + outer[2] * t) * a,
            a,
        ]
    }
}

/// Glow for one layer at its control point's current position.
pub fn layer_gradient(layer: &Layer, point: &ControlPoint, width: f32, height: f32) -> RadialGradient {
    RadialGradient {
        cx: (point.x * width as f64) as f32,
        cy: (point.y * height as f64) as f32,
        radius: point.radius,
        inner: layer.color,
        outer: Rgba::TRANSPARENT,
    }
}

pub fn vignette(width: f32, height: f32) -> RadialGradient {
    RadialGradient {
        cx: width * VIGNETTE_CENTER.0,
        cy: height * VIGNETTE_CENTER.1,
        radius: width.max(height) * VIGNETTE_RADIUS,
        inner: Rgba::TRANSPARENT,
        outer: VIGNETTE_COLOR,
    }
}

/// Opaque fill of every physical pixel.
pub fn fill(surface: &mut Surface, color: Rgba) {
    let px = color.to_u32();
    surface.buffer_mut().pixels.fill(px);
}

/// Source-over one premultiplied colour onto an opaque pixel.
#[inline]
fn over(dst: u32, src: [f32; 4]) -> u32 {
    let (r, g, b) = unpack_rgb(dst);
    let inv = 1.0 - src[3];
    let mix = |d: u8, s: f32| ((s * 255.0 + d as f32 * inv).round().clamp(0.0, 255.0)) as u8;
    pack_rgb(mix(r, src[0]), mix(g, src[1]), mix(b, src[2]))
}

/// Composite `gradient` over the whole surface.
/// When the outer colour is fully transparent nothing outside the disc can
/// change, so only the disc's bounding box is visited.
pub fn composite_radial(surface: &mut Surface, gradient: &RadialGradient) {
    let transform = surface.transform();
    let (pw, ph) = surface.physical_size();
    if pw == 0 || ph == 0 {
        return;
    }

    let inner = gradient.inner.channels();
    let outer = gradient.outer.channels();

    let (x0, y0, x1, y1) = if outer[3] <= 0.0 {
        let (lx, ly) = transform.apply(gradient.cx - gradient.radius, gradient.cy - gradient.radius);
        let (hx, hy) = transform.apply(gradient.cx + gradient.radius, gradient.cy + gradient.radius);
        (
            lx.floor().max(0.0) as usize,
            ly.floor().max(0.0) as usize,
            (hx.ceil().max(0.0) as usize).min(pw),
            (hy.ceil().max(0.0) as usize).min(ph),
        )
    } else {
        (0, 0, pw, ph)
    };

    let pixels = &mut surface.buffer_mut().pixels;
    for y in y0..y1 {
        let row = y * pw;
        for x in x0..x1 {
            // Sample at the pixel centre, in logical space.
            let (lx, ly) = transform.invert(x as f32 + 0.5, y as f32 + 0.5);
            let dx = lx - gradient.cx;
            let dy = ly - gradient.cy;
            let src = gradient.sample((dx * dx + dy * dy).sqrt(), &inner, &outer);
            if src[3] <= 0.0 { continue; }
            pixels[row + x] = over(pixels[row + x], src);
        }
    }
}

/// Base fill, the four glows in table order, then the vignette.
pub fn paint_mesh(surface: &mut Surface, points: &[ControlPoint; POINT_COUNT]) {
    let (w, h) = surface.logical_size();

    fill(surface, BASE_COLOR);
    for layer in &LAYERS {
        let g = layer_gradient(layer, &points[layer.point], w, h);
        composite_radial(surface, &g);
    }
    composite_radial(surface, &vignette(w, h));
}
