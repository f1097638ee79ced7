//! Configuration type definitions
//!
//! The core does no file parsing; hosts construct these and hand them to
//! the controller. Settings changed at runtime through the menu are pushed
//! back to the host through the menu apply callbacks.

use crate::color::Channel;

/// Preview downmix configuration for the status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PreviewConfig {
    /// Channel shown on the preview panel
    pub channel: Channel,
    /// Intensity cutoff below which a pixel is off
    pub cutoff: u8,
    /// Update the preview only on ticks where `tick % skip == 0`;
    /// 0 means never skip
    pub frame_skip: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Red,
            cutoff: 0xA0,
            frame_skip: 0,
        }
    }
}

/// Frame controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Main loop rate in frames per second, must be at least 1
    pub framerate: u32,
    /// Boot log dwell before switching to the idle overlay
    pub boot_timeout_ms: u32,
    /// Menu inactivity timeout before returning to the idle overlay
    pub menu_timeout_ms: u32,
    /// Status-panel preview downmix settings
    pub preview: PreviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framerate: 60,
            boot_timeout_ms: 10_000,
            menu_timeout_ms: 10_000,
            preview: PreviewConfig::default(),
        }
    }
}

impl Config {
    /// Tick period in milliseconds for the host's frame loop.
    pub fn frame_period_ms(&self) -> u32 {
        1000 / self.framerate.max(1)
    }
}
