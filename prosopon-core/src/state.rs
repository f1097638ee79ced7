//! Status-panel overlay state

/// What the status panel is currently showing.
///
/// Transitions are driven by the frame controller from button input and
/// inactivity timeouts; see the controller for the full transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverlayState {
    /// Boot log shown until timeout or first button press
    Boot,
    /// Live diagnostics plus the face preview
    Idle,
    /// Menu navigation
    Menu,
    /// Panel fully dark
    Blank,
}

impl OverlayState {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayState::Boot => "boot",
            OverlayState::Idle => "idle",
            OverlayState::Menu => "menu",
            OverlayState::Blank => "blank",
        }
    }
}
