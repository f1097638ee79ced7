//! Default face animation
//!
//! Composites the eye, nose and mouth images into the standard face
//! layout. When the driver reports voice activity and talk frames are
//! available, the mouth cycles through them at the tick rate.

use crate::assets::{load_checked, AssetError, AssetSource, Image, ImageKind};
use crate::surface::PixelSurface;

use super::{clear_surface, draw_image, FrameCtx};

pub struct FaceAnim {
    eye: Image,
    nose: Image,
    mouth: Image,
    /// Mouth frames cycled while talking; absent if any failed to load
    talk: Option<[Image; 4]>,
}

impl FaceAnim {
    pub fn new(assets: &mut dyn AssetSource) -> Result<Self, AssetError> {
        let eye = load_checked(assets, ImageKind::Eye, "default")?;
        let nose = load_checked(assets, ImageKind::Nose, "default")?;
        let mouth = load_checked(assets, ImageKind::Mouth, "default")?;
        let talk = Self::load_talk(assets);
        Ok(Self {
            eye,
            nose,
            mouth,
            talk,
        })
    }

    // Talk frames are optional; any load failure disables the set.
    fn load_talk(assets: &mut dyn AssetSource) -> Option<[Image; 4]> {
        Some([
            load_checked(assets, ImageKind::Mouth, "talk_0").ok()?,
            load_checked(assets, ImageKind::Mouth, "talk_1").ok()?,
            load_checked(assets, ImageKind::Mouth, "talk_2").ok()?,
            load_checked(assets, ImageKind::Mouth, "talk_3").ok()?,
        ])
    }

    pub fn activate(&mut self, surface: &mut dyn PixelSurface) {
        clear_surface(surface);
    }

    pub fn draw_frame(&mut self, surface: &mut dyn PixelSurface, ctx: &FrameCtx) -> bool {
        let (w, h) = surface.size();

        draw_image(surface, 0, 0, &self.eye, false);
        draw_image(surface, w as i16 - self.nose.width() as i16, 8, &self.nose, false);

        let mouth = match (&self.talk, ctx.talking) {
            (Some(frames), true) => &frames[(ctx.tick % 4) as usize],
            _ => &self.mouth,
        };
        let mouth_y = h as i16 - mouth.height() as i16 - 1;
        draw_image(surface, 3, mouth_y, mouth, false);
        true
    }
}
