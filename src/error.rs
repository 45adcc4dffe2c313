// One error type for the whole crate.
// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed.
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed.
    #[error("Camera init error: {0}")]
    CameraInit(String),

    /// Grabbing/decoding a frame failed. Transient; the loop skips the
    /// iteration and keeps running.
    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// Reading or parsing the configuration file failed.
    #[error("Config error: {0}")]
    Config(String),

    /// Loading a header overlay image failed. Transient; the asset is
    /// skipped and a fallback header is synthesized if none load.
    #[error("Overlay error: {0}")]
    Overlay(String),
}
