//! Pixel surface capability
//!
//! A [`PixelSurface`] is anything that can accept pixel writes and present
//! a finished frame: real display drivers, the in-memory [`FrameBuffer`],
//! and the mirror compositor all implement it.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::color::Rgba;

/// Errors presenting a frame to a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresentError {
    /// Communication failure on the display bus
    Bus,
    /// Device did not accept the frame in time
    Timeout,
}

/// A drawable surface with a fixed size.
///
/// Coordinates are zero-based with the origin at the top-left. Presentation
/// must not block indefinitely; devices driven by DMA expose readiness via
/// [`PixelSurface::can_present_now`] so callers can skip instead of stall.
pub trait PixelSurface {
    /// Surface dimensions in pixels, fixed at construction.
    fn size(&self) -> (u16, u16);

    /// Write one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u16, y: u16, c: Rgba);

    /// Present the current frame to the device.
    fn present(&mut self) -> Result<(), PresentError>;

    /// Whether the device can take a new frame right now.
    ///
    /// Devices driven by a DMA transfer return `false` while the previous
    /// transfer is still in flight.
    fn can_present_now(&self) -> bool {
        true
    }
}

/// Shared handle to a surface written by multiple owners.
///
/// The status panel is written by the text grid, the preview mirror, and
/// the frame controller itself. All of them run on the single logical
/// control thread, so a `Rc<RefCell<_>>` handle is sufficient.
pub struct Shared<S>(Rc<RefCell<S>>);

impl<S> Shared<S> {
    pub fn new(surface: S) -> Self {
        Self(Rc::new(RefCell::new(surface)))
    }

    /// Run a closure with exclusive access to the underlying surface.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: PixelSurface> PixelSurface for Shared<S> {
    fn size(&self) -> (u16, u16) {
        self.0.borrow().size()
    }

    fn set_pixel(&mut self, x: u16, y: u16, c: Rgba) {
        self.0.borrow_mut().set_pixel(x, y, c);
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.0.borrow_mut().present()
    }

    fn can_present_now(&self) -> bool {
        self.0.borrow().can_present_now()
    }
}

/// In-memory framebuffer surface.
///
/// Models the single-writer/single-reader DMA framebuffer: the tick task
/// mutates pixels, a presenter task reads whole frames, and `ready` stands
/// in for the "next DMA slot available" gate. Also the surface used by the
/// host-side tests.
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[Rgba; W]; H],
    ready: bool,
    presented: u32,
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    pub fn new() -> Self {
        Self {
            pixels: [[Rgba::BLANK; W]; H],
            ready: true,
            presented: 0,
        }
    }

    /// Read back a pixel, for presenters and tests.
    pub fn pixel(&self, x: u16, y: u16) -> Rgba {
        if (x as usize) < W && (y as usize) < H {
            self.pixels[y as usize][x as usize]
        } else {
            Rgba::BLANK
        }
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, c: Rgba) {
        for row in self.pixels.iter_mut() {
            row.fill(c);
        }
    }

    /// Set whether the device would accept a frame right now.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u32 {
        self.presented
    }
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> PixelSurface for FrameBuffer<W, H> {
    fn size(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }

    fn set_pixel(&mut self, x: u16, y: u16, c: Rgba) {
        if (x as usize) < W && (y as usize) < H {
            self.pixels[y as usize][x as usize] = c;
        }
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.presented = self.presented.wrapping_add(1);
        Ok(())
    }

    fn can_present_now(&self) -> bool {
        self.ready
    }
}
