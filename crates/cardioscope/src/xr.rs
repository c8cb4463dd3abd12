//! Immersive session collaborator.
//!
//! The viewer only asks a session to start or stop. Headset display and
//! tracking belong to whatever implements [`XrSession`].

use thiserror::Error;

/// Kind of immersive session to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrSessionKind {
    /// Head-mounted display, fully immersive.
    HmdVr,
    /// Handheld or passthrough augmented reality.
    HmdAr,
}

impl XrSessionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::HmdVr => "immersive-vr",
            Self::HmdAr => "immersive-ar",
        }
    }
}

/// Errors reported when starting a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XrError {
    #[error("{} sessions are not supported on this system", .0.name())]
    Unsupported(XrSessionKind),
}

/// Starts and stops immersive sessions for the display.
pub trait XrSession {
    fn start(&mut self, kind: XrSessionKind) -> Result<(), XrError>;

    /// Ends the running session. A no-op if none is running.
    fn stop(&mut self);
}

/// Session backend for builds without headset support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableXr;

impl XrSession for UnavailableXr {
    fn start(&mut self, kind: XrSessionKind) -> Result<(), XrError> {
        Err(XrError::Unsupported(kind))
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_rejects_every_kind() {
        let mut xr = UnavailableXr;
        assert_eq!(
            xr.start(XrSessionKind::HmdVr),
            Err(XrError::Unsupported(XrSessionKind::HmdVr))
        );
        assert_eq!(
            xr.start(XrSessionKind::HmdAr),
            Err(XrError::Unsupported(XrSessionKind::HmdAr))
        );
        xr.stop();
    }

    #[test]
    fn test_error_message_names_session() {
        let msg = XrError::Unsupported(XrSessionKind::HmdVr).to_string();
        assert!(msg.contains("immersive-vr"));
    }
}
