// One error type for the whole program.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String), // No graphical context to draw into
    #[error("Settings read error: {0}")]
    SettingsRead(#[from] std::io::Error),
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
}
