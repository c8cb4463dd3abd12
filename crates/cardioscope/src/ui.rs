//! UI events and how the viewer answers them.

use cardioscope_core::{MeshId, Representation};
use cardioscope_render::Display;
use winit::keyboard::KeyCode;

use crate::state::LoadRequest;
use crate::viewer::Viewer;
use crate::xr::XrSessionKind;

/// Label of the VR toggle while no session runs.
pub const SEND_TO_VR: &str = "Send To VR";
/// Label of the VR toggle during a session.
pub const RETURN_FROM_VR: &str = "Return From VR";

/// Highest opacity slider position; the slider maps `0..=10` onto `0.0..=1.0`.
pub const OPACITY_STEPS: u8 = 10;

/// User input the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Representation selector: 0 points, 1 wireframe, 2 surface.
    SetRepresentation(u32),
    /// Opacity slider position in `0..=10`.
    SetOpacity(u8),
    SelectMesh(MeshId),
    ToggleVr,
}

/// What the caller has to do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Nothing changed.
    Ignored,
    /// The scene was updated and redrawn.
    Redrawn,
    /// A mesh load must be run and its result passed to
    /// [`Viewer::complete_load`].
    Load(LoadRequest),
}

impl<D: Display> Viewer<D> {
    /// Reacts to a UI event.
    pub fn handle_event(&mut self, event: UiEvent) -> UiAction {
        match event {
            UiEvent::SetRepresentation(index) => {
                let Some(representation) = Representation::from_index(index) else {
                    log::warn!("ignoring unknown representation {index}");
                    return UiAction::Ignored;
                };
                self.state.visual.property_mut().representation = representation;
                log::debug!("representation: {}", representation.name());
                self.refresh()
            }
            UiEvent::SetOpacity(step) => {
                let step = step.min(OPACITY_STEPS);
                self.state
                    .visual
                    .property_mut()
                    .set_opacity(f32::from(step) / f32::from(OPACITY_STEPS));
                self.refresh()
            }
            UiEvent::SelectMesh(id) => {
                let with_lights = !self.state.lights_installed;
                UiAction::Load(self.begin_load(id, with_lights))
            }
            UiEvent::ToggleVr => {
                self.toggle_vr();
                UiAction::Ignored
            }
        }
    }

    /// Current label of the VR toggle.
    pub fn vr_button_label(&self) -> &'static str {
        if self.state.vr_active {
            RETURN_FROM_VR
        } else {
            SEND_TO_VR
        }
    }

    /// Opacity as a slider position.
    pub fn opacity_step(&self) -> u8 {
        let opacity = self.state.visual.property().opacity;
        (opacity * f32::from(OPACITY_STEPS)).round().clamp(0.0, f32::from(OPACITY_STEPS)) as u8
    }

    fn refresh(&mut self) -> UiAction {
        self.display.add_actor(&self.state.visual);
        self.display.render();
        UiAction::Redrawn
    }

    fn toggle_vr(&mut self) {
        if self.state.vr_active {
            self.xr.stop();
            self.state.vr_active = false;
            log::info!("left VR session");
            return;
        }
        match self.xr.start(XrSessionKind::HmdVr) {
            Ok(()) => {
                self.state.vr_active = true;
                log::info!("entered VR session");
            }
            Err(e) => log::warn!("cannot enter VR: {e}"),
        }
    }
}

/// Maps a key press to a UI event. `opacity_step` is the current slider
/// position, used by the `-` and `=` keys.
pub fn key_to_event(code: KeyCode, opacity_step: u8) -> Option<UiEvent> {
    let event = match code {
        KeyCode::KeyP => UiEvent::SetRepresentation(Representation::Points.to_index()),
        KeyCode::KeyW => UiEvent::SetRepresentation(Representation::Wireframe.to_index()),
        KeyCode::KeyS => UiEvent::SetRepresentation(Representation::Surface.to_index()),
        KeyCode::Minus | KeyCode::NumpadSubtract => {
            UiEvent::SetOpacity(opacity_step.saturating_sub(1))
        }
        KeyCode::Equal | KeyCode::NumpadAdd => {
            UiEvent::SetOpacity(opacity_step.saturating_add(1).min(OPACITY_STEPS))
        }
        KeyCode::Digit0 => UiEvent::SelectMesh(0),
        KeyCode::Digit1 => UiEvent::SelectMesh(1),
        KeyCode::Digit2 => UiEvent::SelectMesh(2),
        KeyCode::Digit9 => UiEvent::SelectMesh(9),
        KeyCode::KeyV => UiEvent::ToggleVr,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xr::{UnavailableXr, XrError, XrSession};
    use cardioscope_core::ViewerConfig;
    use cardioscope_render::{DisplayCall, RecordingDisplay};
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct FakeXr {
        running: Rc<Cell<bool>>,
    }

    impl XrSession for FakeXr {
        fn start(&mut self, _kind: XrSessionKind) -> Result<(), XrError> {
            self.running.set(true);
            Ok(())
        }

        fn stop(&mut self) {
            self.running.set(false);
        }
    }

    fn viewer_with(xr: Box<dyn XrSession>) -> Viewer<RecordingDisplay> {
        Viewer::new(ViewerConfig::default(), RecordingDisplay::new(), xr)
    }

    #[test]
    fn test_representation_redraws() {
        let mut v = viewer_with(Box::new(UnavailableXr));
        assert_eq!(v.handle_event(UiEvent::SetRepresentation(1)), UiAction::Redrawn);
        assert_eq!(
            v.state().visual.property().representation,
            Representation::Wireframe
        );
        assert_eq!(v.display().calls().last(), Some(&DisplayCall::Render));
    }

    #[test]
    fn test_unknown_representation_ignored() {
        let mut v = viewer_with(Box::new(UnavailableXr));
        assert_eq!(v.handle_event(UiEvent::SetRepresentation(7)), UiAction::Ignored);
        assert_eq!(v.display().render_count(), 0);
    }

    #[test]
    fn test_opacity_is_tenths() {
        let mut v = viewer_with(Box::new(UnavailableXr));
        v.handle_event(UiEvent::SetOpacity(3));
        assert!((v.state().visual.property().opacity - 0.3).abs() < 1e-6);
        assert_eq!(v.opacity_step(), 3);

        v.handle_event(UiEvent::SetOpacity(200));
        assert_eq!(v.state().visual.property().opacity, 1.0);
    }

    #[test]
    fn test_select_mesh_returns_load() {
        let mut v = viewer_with(Box::new(UnavailableXr));
        let UiAction::Load(request) = v.handle_event(UiEvent::SelectMesh(1)) else {
            panic!("expected a load request");
        };
        assert_eq!(request.location, "data/afib.vtk");
        assert!(request.ticket.with_lights);
    }

    #[test]
    fn test_vr_toggle_round_trip() {
        let xr = FakeXr::default();
        let running = xr.running.clone();
        let mut v = viewer_with(Box::new(xr));

        assert_eq!(v.vr_button_label(), SEND_TO_VR);
        v.handle_event(UiEvent::ToggleVr);
        assert_eq!(v.vr_button_label(), RETURN_FROM_VR);
        assert!(running.get());

        v.handle_event(UiEvent::ToggleVr);
        assert_eq!(v.vr_button_label(), SEND_TO_VR);
        assert!(!running.get());
    }

    #[test]
    fn test_vr_unavailable_keeps_label() {
        let mut v = viewer_with(Box::new(UnavailableXr));
        v.handle_event(UiEvent::ToggleVr);
        assert_eq!(v.vr_button_label(), SEND_TO_VR);
        assert!(!v.state().vr_active);
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            key_to_event(KeyCode::KeyP, 10),
            Some(UiEvent::SetRepresentation(0))
        );
        assert_eq!(key_to_event(KeyCode::Minus, 10), Some(UiEvent::SetOpacity(9)));
        assert_eq!(key_to_event(KeyCode::Minus, 0), Some(UiEvent::SetOpacity(0)));
        assert_eq!(key_to_event(KeyCode::Equal, 10), Some(UiEvent::SetOpacity(10)));
        assert_eq!(key_to_event(KeyCode::Digit9, 10), Some(UiEvent::SelectMesh(9)));
        assert_eq!(key_to_event(KeyCode::KeyV, 10), Some(UiEvent::ToggleVr));
        assert_eq!(key_to_event(KeyCode::KeyQ, 10), None);
    }

    proptest! {
        #[test]
        fn opacity_steps_round_trip_through_keys(steps in proptest::collection::vec(any::<u8>(), 1..20)) {
            let mut v = viewer_with(Box::new(UnavailableXr));
            for step in steps {
                prop_assert_eq!(v.handle_event(UiEvent::SetOpacity(step)), UiAction::Redrawn);
                let expected = step.min(OPACITY_STEPS);
                let opacity = v.state().visual.property().opacity;
                prop_assert!((opacity - f32::from(expected) / 10.0).abs() < 1e-6);
                prop_assert_eq!(v.opacity_step(), expected);

                let up = key_to_event(KeyCode::Equal, v.opacity_step());
                prop_assert_eq!(up, Some(UiEvent::SetOpacity((expected + 1).min(OPACITY_STEPS))));
            }
        }
    }
}
