//! Board-agnostic core logic for the Prosopon animatronic face firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Pixel surface capability trait and the shared-handle/framebuffer types
//! - Mirror compositor (face symmetry + status-panel preview downmix)
//! - Animation engine (static, slide, peek, face variants)
//! - Hierarchical settings menu and its navigation state machine
//! - Frame controller running the fixed-rate tick loop
//! - Driver, blinker, and asset-source traits for the host environment
//!
//! Decoded image buffers, menu callbacks, and the shared status-surface
//! handle allocate; embedded hosts are expected to provide a heap the same
//! way the rest of the firmware does.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod animation;
pub mod assets;
pub mod color;
pub mod config;
pub mod controller;
pub mod driver;
pub mod menu;
pub mod mirror;
pub mod state;
pub mod surface;
pub mod text;
