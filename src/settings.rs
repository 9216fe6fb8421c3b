// Runtime knobs, read from an optional JSON file.
// Anything missing from the file keeps its default, so `{}` is a valid config.

use crate::backdrop::Effects;
use crate::error::Error;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: f32,
    pub height: f32,
    /// What the display reports; the renderer caps it at 2.
    pub device_pixel_ratio: f32,
    pub target_fps: usize,
    /// Fixed seed for the control points; random per run when absent.
    pub seed: Option<u64>,
    pub grain: bool,
    pub hue_shift_degrees: f32,
    /// Render headless and write a PNG here instead of opening a window.
    pub snapshot: Option<PathBuf>,
    pub snapshot_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let effects = Effects::default();
        Self {
            title: String::from("Fluid Backdrop"),
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            target_fps: 60,
            seed: None,
            grain: effects.grain,
            hue_shift_degrees: effects.hue_shift_degrees,
            snapshot: None,
            snapshot_frames: 120,
        }
    }
}

impl Settings {
    /// Defaults when `path` is `None`, otherwise the file's contents over defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else { return Ok(Self::default()) };
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn effects(&self) -> Effects {
        Effects { grain: self.grain, hue_shift_degrees: self.hue_shift_degrees }
    }
}
