//! Animated gradient-mesh backdrop: four drifting soft lights over a charcoal
//! base with a vignette, painted in software every display refresh.
//!
//! [`backdrop::Backdrop`] is the renderer; it talks to the outside world only
//! through the [`host::Host`] trait, so it runs the same in a native window
//! ([`window::WindowHost`]) and headless ([`host::HeadlessHost`]).

pub mod backdrop;
pub mod compositor;
pub mod error;
pub mod host;
pub mod mesh;
pub mod post;
pub mod settings;
pub mod snapshot;
pub mod surface;
pub mod types;
pub mod window;
