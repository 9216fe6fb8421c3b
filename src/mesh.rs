// Control points for the gradient mesh: four soft lights that drift and bounce.
// Visual: each point is the centre of one radial glow; they wander slowly and
// turn around when they reach an edge of the screen.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const POINT_COUNT: usize = 4;

/// Radius range in logical pixels, `[min, max)`.
pub const RADIUS_MIN: f32 = 220.0;
pub const RADIUS_MAX: f32 = 400.0;

/// Largest velocity component, in normalized units per frame.
pub const MAX_SPEED: f64 = 0.0002;

/// One drifting light source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub x: f64, pub y: f64,        // position, normalized to [0,1] of the surface
    pub vx: f64, pub vy: f64,      // velocity, normalized units per frame
    pub radius: f32,               // glow radius in logical pixels (fixed)
}

impl ControlPoint {
    /// Advance one frame.
    /// Position is left where it lands; only the velocity turns around, so an
    /// overshoot of at most one step is walked back on the next frame.
    #[inline]
    pub fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < 0.0 || self.x > 1.0 { self.vx = -self.vx; }
        if self.y < 0.0 || self.y > 1.0 { self.vy = -self.vy; }
    }
}

/// Where the renderer gets its starting points from on every `start()`.
pub trait InitialStateProvider {
    fn initial_points(&mut self) -> [ControlPoint; POINT_COUNT];
}

/// Uniformly random points, seedable for reproducible runs.
pub struct RandomPoints {
    rng: StdRng,
}

impl RandomPoints {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    fn point(&mut self) -> ControlPoint {
        ControlPoint {
            x: self.rng.gen_range(0.0..1.0),
            y: self.rng.gen_range(0.0..1.0),
            vx: self.rng.gen_range(-MAX_SPEED..MAX_SPEED),
            vy: self.rng.gen_range(-MAX_SPEED..MAX_SPEED),
            radius: self.rng.gen_range(RADIUS_MIN..RADIUS_MAX),
        }
    }
}

impl InitialStateProvider for RandomPoints {
    fn initial_points(&mut self) -> [ControlPoint; POINT_COUNT] {
        std::array::from_fn(|_| self.point())
    }
}

/// Hands back the same points every time.
#[derive(Clone, Debug)]
pub struct FixedPoints(pub [ControlPoint; POINT_COUNT]);

impl InitialStateProvider for FixedPoints {
    fn initial_points(&mut self) -> [ControlPoint; POINT_COUNT] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, vx: f64, vy: f64) -> ControlPoint {
        ControlPoint { x, y, vx, vy, radius: 300.0 }
    }

    #[test]
    fn step_integrates_velocity() {
        let mut p = point(0.5, 0.25, 0.0001, -0.0002);
        p.step();
        assert!((p.x - 0.5001).abs() < 1e-6);
        assert!((p.y - 0.2498).abs() < 1e-6);
        assert_eq!((p.vx, p.vy), (0.0001, -0.0002));
    }

    #[test]
    fn crossing_flips_velocity_exactly_once() {
        let v = 0.0015;
        let mut p = point(0.999, 0.5, v, 0.0);
        p.step();
        // Overshoots and turns around, position is not clamped.
        assert!(p.x > 1.0);
        assert_eq!(p.vx, -v);

        // Next frame walks back inside with the flipped velocity; no second flip.
        p.step();
        assert!(p.x <= 1.0);
        assert_eq!(p.vx, -v);
    }

    #[test]
    fn lower_edge_reflects_too() {
        let mut p = point(0.5, 0.0001, 0.0, -0.0002);
        p.step();
        assert!(p.y < 0.0);
        assert_eq!(p.vy, 0.0002);
        p.step();
        assert!(p.y >= 0.0);
    }

    #[test]
    fn tiny_velocity_still_drifts_near_far_edge() {
        let mut p = point(0.75, 0.9, 1e-8, -2e-8);
        let (x0, y0) = (p.x, p.y);
        for _ in 0..1000 {
            p.step();
        }
        assert!((p.x - (x0 + 1e-5)).abs() < 1e-12);
        assert!((p.y - (y0 - 2e-5)).abs() < 1e-12);
    }

    #[test]
    fn positions_stay_bounded_over_many_frames() {
        let mut provider = RandomPoints::from_seed(7);
        let mut points = provider.initial_points();
        for _ in 0..200_000 {
            for p in &mut points {
                p.step();
                let tol = MAX_SPEED + 1e-12;
                assert!(p.x >= -tol && p.x <= 1.0 + tol, "x diverged: {}", p.x);
                assert!(p.y >= -tol && p.y <= 1.0 + tol, "y diverged: {}", p.y);
            }
        }
    }

    #[test]
    fn random_points_respect_ranges() {
        let mut provider = RandomPoints::from_seed(42);
        for _ in 0..50 {
            for p in provider.initial_points() {
                assert!((0.0..1.0).contains(&p.x));
                assert!((0.0..1.0).contains(&p.y));
                assert!(p.vx.abs() <= MAX_SPEED && p.vy.abs() <= MAX_SPEED);
                assert!((RADIUS_MIN..RADIUS_MAX).contains(&p.radius));
            }
        }
    }

    #[test]
    fn same_seed_same_points() {
        let a = RandomPoints::from_seed(1234).initial_points();
        let b = RandomPoints::from_seed(1234).initial_points();
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_points_are_returned_verbatim() {
        let pts = [point(0.1, 0.2, 0.0, 0.0); POINT_COUNT];
        let mut provider = FixedPoints(pts);
        assert_eq!(provider.initial_points(), pts);
        assert_eq!(provider.initial_points(), pts);
    }
}
