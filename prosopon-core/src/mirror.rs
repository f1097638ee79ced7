//! Mirror compositor
//!
//! Presents one logical draw surface of width `W` over a physical face
//! panel of width `2W`, duplicating every write onto the horizontally
//! mirrored column so the two face halves stay symmetric. Optionally
//! forwards a downmixed copy of each write onto the status panel as a
//! live preview.

use crate::color::{downmix, Rgba};
use crate::config::PreviewConfig;
use crate::surface::{PixelSurface, PresentError};

struct Preview<P> {
    surface: P,
    real_w: u16,
    h: u16,
    config: PreviewConfig,
}

/// Mirroring compositor over a primary face surface.
///
/// Holds no buffering of its own; presentation passes straight through to
/// the wrapped primary surface.
pub struct Mirror<F, P> {
    primary: F,
    real_w: u16,
    w: u16,
    h: u16,
    preview: Option<Preview<P>>,
    /// Whether preview writes are forwarded this tick; the controller
    /// opens the gate only in the idle overlay, when the preview panel is
    /// ready and the frame-skip divisor permits.
    gate: bool,
}

impl<F: PixelSurface, P: PixelSurface> Mirror<F, P> {
    pub fn new(primary: F, preview: Option<P>, config: PreviewConfig) -> Self {
        let (real_w, h) = primary.size();
        let preview = preview.map(|surface| {
            let (pw, ph) = surface.size();
            Preview {
                surface,
                real_w: pw,
                h: ph,
                config,
            }
        });
        Self {
            primary,
            real_w,
            w: real_w / 2,
            h,
            preview,
            gate: false,
        }
    }

    /// Open or close the preview gate for this tick.
    pub fn set_preview_gate(&mut self, open: bool) {
        self.gate = open;
    }

    /// Replace the preview downmix settings.
    pub fn set_preview_config(&mut self, config: PreviewConfig) {
        if let Some(p) = self.preview.as_mut() {
            p.config = config;
        }
    }

    /// The wrapped primary surface.
    pub fn primary(&self) -> &F {
        &self.primary
    }
}

impl<F: PixelSurface, P: PixelSurface> PixelSurface for Mirror<F, P> {
    fn size(&self) -> (u16, u16) {
        (self.w, self.h)
    }

    fn set_pixel(&mut self, x: u16, y: u16, c: Rgba) {
        self.primary.set_pixel(x, y, c);
        self.primary.set_pixel(self.real_w - x - 1, y, c);

        if self.gate {
            if let Some(p) = self.preview.as_mut() {
                // the preview panel may be smaller than the face; clip
                if x < p.real_w && y < p.h {
                    let d = downmix(c, p.config.channel, p.config.cutoff);
                    p.surface.set_pixel(x, y, d);
                    p.surface.set_pixel(p.real_w - x - 1, y, d);
                }
            }
        }
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.primary.present()
    }

    fn can_present_now(&self) -> bool {
        self.primary.can_present_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Channel;
    use crate::surface::FrameBuffer;
    use proptest::prelude::*;

    const W: usize = 128;
    const H: usize = 32;

    fn mirror() -> Mirror<FrameBuffer<W, H>, FrameBuffer<W, 64>> {
        Mirror::new(FrameBuffer::new(), None, PreviewConfig::default())
    }

    #[test]
    fn test_logical_size_is_half_width() {
        let m = mirror();
        assert_eq!(m.size(), (64, 32));
    }

    #[test]
    fn test_set_pixel_mirrors_horizontally() {
        let mut m = mirror();
        let c = Rgba::opaque(1, 2, 3);
        m.set_pixel(5, 7, c);
        assert_eq!(m.primary().pixel(5, 7), c);
        assert_eq!(m.primary().pixel(128 - 5 - 1, 7), c);
    }

    proptest! {
        #[test]
        fn prop_flip_symmetry(x in 0u16..64, y in 0u16..32) {
            let mut m = mirror();
            let c = Rgba::opaque(0xAB, 0xCD, 0xEF);
            m.set_pixel(x, y, c);
            prop_assert_eq!(m.primary().pixel(x, y), c);
            prop_assert_eq!(m.primary().pixel(2 * 64 - x - 1, y), c);
            // flipping twice returns to x
            prop_assert_eq!(2 * 64 - (2 * 64 - x - 1) - 1, x);
        }
    }

    #[test]
    fn test_preview_closed_gate_forwards_nothing() {
        let mut m: Mirror<FrameBuffer<W, H>, FrameBuffer<W, 64>> = Mirror::new(
            FrameBuffer::new(),
            Some(FrameBuffer::new()),
            PreviewConfig::default(),
        );
        m.set_pixel(3, 3, Rgba::opaque(0xFF, 0xFF, 0xFF));
        let blank = m.preview.as_ref().unwrap().surface.pixel(3, 3);
        assert_eq!(blank, Rgba::BLANK);
    }

    #[test]
    fn test_preview_downmix_through_gate() {
        let mut m: Mirror<FrameBuffer<W, H>, FrameBuffer<W, 64>> = Mirror::new(
            FrameBuffer::new(),
            Some(FrameBuffer::new()),
            PreviewConfig {
                channel: Channel::Red,
                cutoff: 0xA0,
                frame_skip: 0,
            },
        );
        m.set_preview_gate(true);

        // dim pixel: off on the preview
        m.set_pixel(1, 1, Rgba::opaque(0x50, 0xFF, 0xFF));
        // bright pixel: red forced fully on
        m.set_pixel(2, 2, Rgba::opaque(0xF0, 0x80, 0x22));

        let p = &m.preview.as_ref().unwrap().surface;
        assert_eq!(p.pixel(1, 1), Rgba::opaque(0, 0, 0));
        assert_eq!(p.pixel(2, 2), Rgba::opaque(0xFF, 0, 0));
        // mirrored on the preview panel too
        assert_eq!(p.pixel(128 - 2 - 1, 2), Rgba::opaque(0xFF, 0, 0));
    }

    #[test]
    fn test_preview_narrower_than_face_clips() {
        let mut m: Mirror<FrameBuffer<W, H>, FrameBuffer<32, 64>> = Mirror::new(
            FrameBuffer::new(),
            Some(FrameBuffer::new()),
            PreviewConfig::default(),
        );
        m.set_preview_gate(true);

        // beyond the preview's width: primary still mirrored, preview untouched
        m.set_pixel(40, 0, Rgba::opaque(0xF0, 0, 0));
        assert_eq!(m.primary().pixel(40, 0), Rgba::opaque(0xF0, 0, 0));
        let p = &m.preview.as_ref().unwrap().surface;
        for x in 0..32 {
            assert_eq!(p.pixel(x, 0), Rgba::BLANK);
        }

        // inside the preview: mirrored around the preview's own width
        m.set_pixel(5, 1, Rgba::opaque(0xF0, 0, 0));
        let p = &m.preview.as_ref().unwrap().surface;
        assert_eq!(p.pixel(5, 1), Rgba::opaque(0xFF, 0, 0));
        assert_eq!(p.pixel(32 - 5 - 1, 1), Rgba::opaque(0xFF, 0, 0));
    }

    #[test]
    fn test_present_delegates_to_primary() {
        let mut m = mirror();
        m.present().unwrap();
        assert_eq!(m.primary().presented(), 1);
        assert!(m.can_present_now());
    }
}
