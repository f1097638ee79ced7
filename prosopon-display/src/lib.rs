//! embedded-graphics rendering onto Prosopon pixel surfaces
//!
//! Two pieces: [`Canvas`], a `DrawTarget` adapter that lets any
//! embedded-graphics drawable paint onto a core pixel surface, and
//! [`TextGrid`], the monospace text layer that backs the status panel's
//! `TextPanel` implementation.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod canvas;
pub mod text;

pub use canvas::Canvas;
pub use text::TextGrid;
