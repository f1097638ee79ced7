//! Animation engine
//!
//! Each animation variant is a small state machine producing one frame of
//! pixel output per tick. The variant set is closed, so the engine is a
//! tagged enum with exhaustive matching rather than an open trait.
//!
//! Lifecycle: an animation is `activate`d whenever it is (re-)selected and
//! then driven once per tick until `draw_frame` returns `false`, at which
//! point the frame controller switches back to the default face animation.

mod face;
mod peek;

pub use face::FaceAnim;
pub use peek::PeekAnim;

use crate::assets::{load_checked, AssetError, AssetSource, Image, ImageKind};
use crate::color::Rgba;
use crate::surface::PixelSurface;

/// Per-tick frame context.
///
/// Wall-clock milliseconds are passed in explicitly because the core has
/// no ambient clock; only differences are meaningful, so wraparound is
/// handled with wrapping arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct FrameCtx {
    pub tick: u32,
    pub now_ms: u32,
    /// Voice-activity signal from the driver
    pub talking: bool,
}

/// Selector for constructing an animation from assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// The default idle face
    Face,
    /// A fixed full-face image
    Static(&'static str),
    /// A horizontally scrolling full-face image
    Slide(&'static str),
    /// An image peeking in from the top edge
    Peek(&'static str),
}

/// The closed set of animation variants.
pub enum Animation {
    Static(StaticAnim),
    Slide(SlideAnim),
    Peek(PeekAnim),
    Face(FaceAnim),
}

impl Animation {
    /// Construct an animation of the given kind from the asset source.
    pub fn build(kind: AnimationKind, assets: &mut dyn AssetSource) -> Result<Self, AssetError> {
        match kind {
            AnimationKind::Face => Ok(Animation::Face(FaceAnim::new(assets)?)),
            AnimationKind::Static(name) => Ok(Animation::Static(StaticAnim::new(assets, name)?)),
            AnimationKind::Slide(name) => Ok(Animation::Slide(SlideAnim::new(assets, name)?)),
            AnimationKind::Peek(name) => Ok(Animation::Peek(PeekAnim::new(assets, name)?)),
        }
    }

    /// Whether this is the steady-state default animation.
    pub fn is_default(&self) -> bool {
        matches!(self, Animation::Face(_))
    }

    /// Prepare the animation for display. May be called more than once.
    pub fn activate(&mut self, surface: &mut dyn PixelSurface) {
        match self {
            Animation::Static(a) => a.activate(surface),
            Animation::Slide(a) => a.activate(surface),
            Animation::Peek(a) => a.activate(surface),
            Animation::Face(a) => a.activate(surface),
        }
    }

    /// Draw the next frame. Returns whether the animation should continue.
    pub fn draw_frame(&mut self, surface: &mut dyn PixelSurface, ctx: &FrameCtx) -> bool {
        match self {
            Animation::Static(a) => a.draw_frame(surface, ctx),
            Animation::Slide(a) => a.draw_frame(surface, ctx),
            Animation::Peek(a) => a.draw_frame(surface, ctx),
            Animation::Face(a) => a.draw_frame(surface, ctx),
        }
    }
}

/// Draw an image at the given offsets.
///
/// Pixels landing outside the surface are clipped unless `wrap` is set, in
/// which case coordinates wrap around the surface edges (euclidean modulo,
/// so negative offsets wrap correctly too).
pub fn draw_image(
    surface: &mut dyn PixelSurface,
    off_x: i16,
    off_y: i16,
    img: &Image,
    wrap: bool,
) {
    let (w, h) = surface.size();
    for x in 0..img.width() {
        let mut xx = x as i32 + off_x as i32;
        if xx < 0 || xx >= w as i32 {
            if wrap {
                xx = xx.rem_euclid(w as i32);
            } else {
                continue;
            }
        }
        for y in 0..img.height() {
            let mut yy = y as i32 + off_y as i32;
            if yy < 0 || yy >= h as i32 {
                if wrap {
                    yy = yy.rem_euclid(h as i32);
                } else {
                    continue;
                }
            }
            surface.set_pixel(xx as u16, yy as u16, img.pixel(x, y));
        }
    }
}

/// Blank every pixel of a surface.
pub fn clear_surface(surface: &mut dyn PixelSurface) {
    let (w, h) = surface.size();
    for y in 0..h {
        for x in 0..w {
            surface.set_pixel(x, y, Rgba::BLANK);
        }
    }
}

/// Fixed image drawn once on activation.
///
/// Never completes on its own; leaving it requires an explicit switch.
pub struct StaticAnim {
    img: Image,
}

impl StaticAnim {
    pub fn new(assets: &mut dyn AssetSource, name: &str) -> Result<Self, AssetError> {
        Ok(Self {
            img: load_checked(assets, ImageKind::Full, name)?,
        })
    }

    pub fn activate(&mut self, surface: &mut dyn PixelSurface) {
        draw_image(surface, 0, 0, &self.img, false);
    }

    pub fn draw_frame(&mut self, _surface: &mut dyn PixelSurface, _ctx: &FrameCtx) -> bool {
        true
    }
}

/// Image scrolling horizontally one pixel per tick, wrapping around.
pub struct SlideAnim {
    img: Image,
    x: u16,
}

impl SlideAnim {
    pub fn new(assets: &mut dyn AssetSource, name: &str) -> Result<Self, AssetError> {
        Ok(Self {
            img: load_checked(assets, ImageKind::Full, name)?,
            x: 0,
        })
    }

    pub fn activate(&mut self, _surface: &mut dyn PixelSurface) {
        self.x = 0;
    }

    pub fn draw_frame(&mut self, surface: &mut dyn PixelSurface, _ctx: &FrameCtx) -> bool {
        let (w, _) = surface.size();
        draw_image(surface, self.x as i16, 0, &self.img, true);
        self.x += 1;
        if self.x >= w {
            self.x = 0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;

    struct SolidAssets;

    impl AssetSource for SolidAssets {
        fn load(&mut self, kind: ImageKind, _name: &str) -> Result<Image, AssetError> {
            let (w, h) = kind.expected_size();
            Ok(Image::filled(w, h, Rgba::opaque(0x10, 0x20, 0x30)))
        }
    }

    fn ctx(tick: u32) -> FrameCtx {
        FrameCtx {
            tick,
            now_ms: tick * 16,
            talking: false,
        }
    }

    #[test]
    fn test_draw_image_clips() {
        let mut fb: FrameBuffer<8, 8> = FrameBuffer::new();
        let img = Image::filled(4, 4, Rgba::opaque(1, 1, 1));
        draw_image(&mut fb, 6, 6, &img, false);
        assert_eq!(fb.pixel(6, 6), Rgba::opaque(1, 1, 1));
        assert_eq!(fb.pixel(7, 7), Rgba::opaque(1, 1, 1));
        // clipped pixels never wrapped to the other side
        assert_eq!(fb.pixel(0, 0), Rgba::BLANK);
    }

    #[test]
    fn test_draw_image_wraps() {
        let mut fb: FrameBuffer<8, 8> = FrameBuffer::new();
        let img = Image::filled(4, 1, Rgba::opaque(2, 2, 2));
        draw_image(&mut fb, 6, 0, &img, true);
        assert_eq!(fb.pixel(6, 0), Rgba::opaque(2, 2, 2));
        assert_eq!(fb.pixel(7, 0), Rgba::opaque(2, 2, 2));
        assert_eq!(fb.pixel(0, 0), Rgba::opaque(2, 2, 2));
        assert_eq!(fb.pixel(1, 0), Rgba::opaque(2, 2, 2));
    }

    #[test]
    fn test_draw_image_wraps_negative_offsets() {
        let mut fb: FrameBuffer<8, 8> = FrameBuffer::new();
        let img = Image::filled(2, 1, Rgba::opaque(3, 3, 3));
        draw_image(&mut fb, -1, 0, &img, true);
        assert_eq!(fb.pixel(7, 0), Rgba::opaque(3, 3, 3));
        assert_eq!(fb.pixel(0, 0), Rgba::opaque(3, 3, 3));
    }

    #[test]
    fn test_static_draws_on_activate_only() {
        let mut fb: FrameBuffer<64, 32> = FrameBuffer::new();
        let mut anim = StaticAnim::new(&mut SolidAssets, "logo").unwrap();
        assert_eq!(fb.pixel(0, 0), Rgba::BLANK);
        anim.activate(&mut fb);
        assert_eq!(fb.pixel(0, 0), Rgba::opaque(0x10, 0x20, 0x30));
        // frames are no-ops and never complete
        for t in 0..100 {
            assert!(anim.draw_frame(&mut fb, &ctx(t)));
        }
    }

    #[test]
    fn test_slide_advances_and_wraps() {
        let mut fb: FrameBuffer<64, 32> = FrameBuffer::new();
        let mut anim = SlideAnim::new(&mut SolidAssets, "scroll").unwrap();
        anim.activate(&mut fb);
        for t in 0..64 {
            assert_eq!(anim.x, t);
            assert!(anim.draw_frame(&mut fb, &ctx(t as u32)));
        }
        // one pixel per tick, modulo surface width
        assert_eq!(anim.x, 0);
    }

    #[test]
    fn test_animation_build_and_default() {
        let mut assets = SolidAssets;
        let anim = Animation::build(AnimationKind::Face, &mut assets).unwrap();
        assert!(anim.is_default());
        let anim = Animation::build(AnimationKind::Slide("scroll"), &mut assets).unwrap();
        assert!(!anim.is_default());
    }
}
