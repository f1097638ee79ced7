//! Peek animation
//!
//! A full-face image slides in from the top edge one row per 100ms step,
//! dwells fully visible for three seconds, then retreats upward, blanking
//! the rows it vacates. Completes once the image has left the surface.

use crate::assets::{load_checked, AssetError, AssetSource, Image, ImageKind};
use crate::color::Rgba;
use crate::surface::PixelSurface;

use super::{clear_surface, draw_image, FrameCtx};

const STEP_MS: u32 = 100;
const DWELL_MS: u32 = 3_000;

pub struct PeekAnim {
    img: Image,
    /// Top edge of the image; negative while partially off-screen
    y: i16,
    deadline_ms: u32,
    deadline_set: bool,
    retreating: bool,
}

impl PeekAnim {
    pub fn new(assets: &mut dyn AssetSource, name: &str) -> Result<Self, AssetError> {
        Ok(Self {
            img: load_checked(assets, ImageKind::Full, name)?,
            y: 0,
            deadline_ms: 0,
            deadline_set: false,
            retreating: false,
        })
    }

    pub fn activate(&mut self, surface: &mut dyn PixelSurface) {
        self.y = -(self.img.height() as i16);
        self.deadline_set = false;
        self.retreating = false;
        clear_surface(surface);
    }

    pub fn draw_frame(&mut self, surface: &mut dyn PixelSurface, ctx: &FrameCtx) -> bool {
        if self.deadline_set && (ctx.now_ms.wrapping_sub(self.deadline_ms) as i32) < 0 {
            return true;
        }

        if self.retreating {
            // blank the row the image is about to vacate
            let vacated = self.y + self.img.height() as i16 - 1;
            if vacated >= 0 {
                for x in 0..self.img.width() {
                    surface.set_pixel(x, vacated as u16, Rgba::BLANK);
                }
            }
            self.y -= 1;
            if self.y < -(self.img.height() as i16) {
                return false;
            }
        } else {
            self.y += 1;
        }

        draw_image(surface, 0, self.y, &self.img, false);

        if !self.retreating && self.y >= 0 {
            // fully on screen: dwell, then head back up
            self.retreating = true;
            self.deadline_ms = ctx.now_ms.wrapping_add(DWELL_MS);
        } else {
            self.deadline_ms = ctx.now_ms.wrapping_add(STEP_MS);
        }
        self.deadline_set = true;
        true
    }
}
