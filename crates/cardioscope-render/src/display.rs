//! The display collaborator the load pipeline drives.

use cardioscope_core::{Light, Rgb, VisualObject};

/// A scene with one actor, a set of lights and a camera.
///
/// Calls are synchronous. [`Display::render`] is fire-and-forget: backends
/// log their own failures instead of returning them.
pub trait Display {
    /// Sets the clear color.
    fn set_background(&mut self, color: Rgb);

    /// Adds a light to the scene.
    fn add_light(&mut self, light: &Light);

    /// Number of lights installed so far.
    fn light_count(&self) -> usize;

    /// Puts `actor` in the scene, replacing what was shown for it before.
    fn add_actor(&mut self, actor: &VisualObject);

    /// Takes the actor out of the scene.
    fn remove_actor(&mut self);

    /// Fits the camera to the actor's bounds.
    fn reset_camera(&mut self);

    /// Draws a frame.
    fn render(&mut self);
}
