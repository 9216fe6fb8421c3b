// What you SEE now:
// • A dark charcoal window with four soft glows drifting slowly and bouncing off the edges.
// • Scroll the wheel down and the colours slide a few degrees around the hue wheel.
// • Resize the window: the backdrop follows, the glows keep drifting where they were.
// • ESC quits.
//
// Usage: fluid-backdrop [settings.json]
// With `"snapshot": "out.png"` in the settings nothing opens; N frames are rendered
// headless and the last one is written as PNG.

use fluid_backdrop::backdrop::Backdrop;
use fluid_backdrop::error::Error;
use fluid_backdrop::host::{run, HeadlessHost};
use fluid_backdrop::mesh::RandomPoints;
use fluid_backdrop::settings::Settings;
use fluid_backdrop::snapshot::save_snapshot;
use fluid_backdrop::types::Viewport;
use fluid_backdrop::window::WindowHost;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    /* --- Settings ---
       Defaults unless a JSON file is given as the first argument. */
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref())?;

    /* --- Initial state ---
       A fixed seed replays the exact same drift every run. */
    let provider = match settings.seed {
        Some(seed) => RandomPoints::from_seed(seed),
        None => RandomPoints::from_entropy(),
    };
    let mut backdrop = Backdrop::new(provider, settings.effects());

    match &settings.snapshot {
        Some(path) => {
            let viewport = Viewport::new(settings.width, settings.height, settings.device_pixel_ratio);
            let mut host = HeadlessHost::new(viewport, settings.snapshot_frames);
            run(&mut host, &mut backdrop)?;

            if save_snapshot(host.last_frame(), path)? {
                info!(path = %path.display(), frames = host.presented(), "snapshot written");
            }
        }
        None => {
            let mut host = WindowHost::open(&settings);
            run(&mut host, &mut backdrop)?;
        }
    }

    Ok(())
}
