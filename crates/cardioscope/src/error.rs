//! Top-level error type.

use thiserror::Error;

/// Errors that end the viewer process.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] cardioscope_core::CoreError),

    #[error(transparent)]
    Render(#[from] cardioscope_render::RenderError),

    #[error(transparent)]
    Screenshot(#[from] cardioscope_render::ScreenshotError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

/// A specialized Result type for the viewer.
pub type Result<T> = std::result::Result<T, ViewerError>;
