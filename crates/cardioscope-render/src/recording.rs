//! A display that keeps scene state in memory instead of drawing.

use std::fmt::Write as _;

use cardioscope_core::{ColorTransferFunction, Light, Property, Rgb, Vec3, VisualObject};

use crate::display::Display;

/// One call made on a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    SetBackground(Rgb),
    AddLight(Light),
    AddActor { revision: u64 },
    RemoveActor,
    ResetCamera,
    Render,
}

/// What the display holds for the actor after the last `add_actor`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshot {
    pub revision: u64,
    pub position: Vec3,
    pub property: Property,
    pub mapping: Option<ColorTransferFunction>,
    pub synthesized: bool,
    pub num_points: usize,
    pub num_cells: usize,
    pub bounds: Option<(Vec3, Vec3)>,
}

impl ActorSnapshot {
    fn capture(actor: &VisualObject) -> Self {
        let dataset = actor.dataset();
        Self {
            revision: actor.revision(),
            position: actor.position(),
            property: *actor.property(),
            mapping: actor.mapping().cloned(),
            synthesized: actor.source().is_some_and(|s| s.is_synthesized()),
            num_points: dataset.map_or(0, |d| d.num_points()),
            num_cells: dataset.map_or(0, |d| d.num_cells()),
            bounds: actor.bounds(),
        }
    }
}

/// Headless [`Display`] that records every call.
///
/// Used by tests and by `--dry-run`.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Vec<DisplayCall>,
    lights: Vec<Light>,
    actor: Option<ActorSnapshot>,
    background: Rgb,
    render_count: usize,
    camera_target: Option<(Vec3, Vec3)>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    /// Forgets the call log but keeps the scene.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn actor(&self) -> Option<&ActorSnapshot> {
        self.actor.as_ref()
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Bounds the camera was last fitted to.
    pub fn camera_target(&self) -> Option<(Vec3, Vec3)> {
        self.camera_target
    }

    /// Human-readable description of the current scene.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "background: {:?}", self.background.to_array());
        let _ = writeln!(out, "lights: {}", self.lights.len());
        for light in &self.lights {
            let _ = writeln!(
                out,
                "  at {:?} intensity {}",
                light.position.to_array(),
                light.intensity
            );
        }
        match &self.actor {
            None => {
                let _ = writeln!(out, "actor: none");
            }
            Some(actor) => {
                let _ = writeln!(
                    out,
                    "actor: {} points, {} cells{}",
                    actor.num_points,
                    actor.num_cells,
                    if actor.synthesized { " (placeholder)" } else { "" }
                );
                let _ = writeln!(out, "  position: {:?}", actor.position.to_array());
                let _ = writeln!(
                    out,
                    "  {} opacity {} specular {}/{}",
                    actor.property.representation.name(),
                    actor.property.opacity,
                    actor.property.specular,
                    actor.property.specular_power
                );
                match &actor.mapping {
                    Some(lut) => {
                        let range = lut.range();
                        let _ = writeln!(
                            out,
                            "  color map: [{}, {}] in {} colors",
                            range.min,
                            range.max,
                            lut.number_of_values()
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  color map: none");
                    }
                }
            }
        }
        let _ = writeln!(out, "frames rendered: {}", self.render_count);
        out
    }
}

impl Display for RecordingDisplay {
    fn set_background(&mut self, color: Rgb) {
        self.background = color;
        self.calls.push(DisplayCall::SetBackground(color));
    }

    fn add_light(&mut self, light: &Light) {
        self.lights.push(*light);
        self.calls.push(DisplayCall::AddLight(*light));
    }

    fn light_count(&self) -> usize {
        self.lights.len()
    }

    fn add_actor(&mut self, actor: &VisualObject) {
        let snapshot = ActorSnapshot::capture(actor);
        self.calls.push(DisplayCall::AddActor {
            revision: snapshot.revision,
        });
        self.actor = Some(snapshot);
    }

    fn remove_actor(&mut self) {
        self.actor = None;
        self.calls.push(DisplayCall::RemoveActor);
    }

    fn reset_camera(&mut self) {
        self.camera_target = self.actor.as_ref().and_then(|a| a.bounds);
        self.calls.push(DisplayCall::ResetCamera);
    }

    fn render(&mut self) {
        self.render_count += 1;
        self.calls.push(DisplayCall::Render);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardioscope_core::{generate_fallback, DatasetSource};

    #[test]
    fn test_records_calls_in_order() {
        let mut display = RecordingDisplay::new();
        let mut actor = VisualObject::new();
        actor.set_source(DatasetSource::Synthesized(generate_fallback()));

        display.set_background(Vec3::splat(0.5));
        display.add_actor(&actor);
        display.reset_camera();
        display.render();

        assert_eq!(
            display.calls(),
            &[
                DisplayCall::SetBackground(Vec3::splat(0.5)),
                DisplayCall::AddActor { revision: 1 },
                DisplayCall::ResetCamera,
                DisplayCall::Render,
            ]
        );
        assert_eq!(display.render_count(), 1);
        let snapshot = display.actor().unwrap();
        assert!(snapshot.synthesized);
        assert_eq!(snapshot.num_cells, 7);
        assert_eq!(display.camera_target(), snapshot.bounds);
    }

    #[test]
    fn test_remove_actor() {
        let mut display = RecordingDisplay::new();
        display.add_actor(&VisualObject::new());
        display.remove_actor();
        assert!(display.actor().is_none());
        display.clear_calls();
        assert!(display.calls().is_empty());
    }

    #[test]
    fn test_summary_mentions_placeholder() {
        let mut display = RecordingDisplay::new();
        let mut actor = VisualObject::new();
        actor.set_source(DatasetSource::Synthesized(generate_fallback()));
        display.add_actor(&actor);
        let summary = display.summary();
        assert!(summary.contains("7 cells (placeholder)"));
        assert!(summary.contains("color map: none"));
    }
}
