//! Hardware driver seam
//!
//! Everything platform-specific sits behind [`Driver`]: display bring-up,
//! buttons, sensors, and the voice-activity signal. The core never touches
//! a bus or a pin directly, which is also what makes the controller fully
//! testable on the host.

use heapless::Vec;

use crate::menu::MenuNode;
use crate::surface::PixelSurface;
use crate::text::LogSink;

/// Errors from driver initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Bus communication failed
    Bus,
    /// Device did not respond in time
    Timeout,
    /// Required device not present
    NotPresent,
    /// Device responded but reported a failure
    Failed,
}

/// Debounced input buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Menu,
    Back,
    Up,
    Down,
    /// Reserved hardware reset input, not handled by the core
    Reset,
}

/// Result of polling a sensor.
///
/// `Busy` means a conversion is still in flight; the caller keeps its last
/// cached reading rather than treating it as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorRead<T> {
    Available(T),
    Busy,
    Unavailable,
}

/// One accelerometer sample, in milli-g per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Heap occupancy as reported by the platform allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryStats {
    pub free_kib: u32,
    pub total_kib: u32,
}

/// Wall-clock time of day, if the platform has an RTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    pub hours: u8,
    pub minutes: u8,
}

/// A status LED used for tick liveness and the fatal blink.
pub trait Blinker {
    fn set_high(&mut self);
    fn set_low(&mut self);
}

/// Platform integration trait.
pub trait Driver {
    /// The face display surface this driver produces.
    type Face: PixelSurface;

    /// Bring up the face display. Called once, before anything else;
    /// failure is fatal to initialization.
    fn early_init(&mut self) -> Result<Self::Face, DriverError>;

    /// Bring up remaining devices (sensors, microphone), logging progress.
    /// Failures here are the driver's to degrade around; returning an
    /// error is reported on the boot log but does not abort.
    fn late_init(&mut self, log: &mut dyn LogSink) -> Result<(), DriverError>;

    /// The button press consumed this tick, if any. Debouncing and
    /// edge detection are the driver's responsibility.
    fn pressed_button(&mut self) -> Option<Button>;

    /// Extra hardware-specific entries for the menu's hardware submenu.
    fn menu_items(&mut self) -> Vec<MenuNode, 16>;

    /// Distance reading from the nose-boop sensor, in centimeters.
    fn boop_distance(&mut self) -> SensorRead<u8>;

    /// Latest accelerometer sample.
    fn accelerometer(&mut self) -> SensorRead<AccelSample>;

    /// Whether the microphone currently detects speech.
    fn talking(&mut self) -> bool;

    /// One line of free-form platform status for the idle overlay.
    fn status_line(&self) -> &str;

    /// Time of day, if available.
    fn wall_clock(&self) -> Option<WallClock>;

    /// Allocator statistics, if available.
    fn memory_stats(&self) -> Option<MemoryStats>;
}
