//! DrawTarget adapter over a pixel surface

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use prosopon_core::color::Rgba;
use prosopon_core::surface::PixelSurface;

/// Adapts a [`PixelSurface`] to an embedded-graphics draw target.
///
/// Out-of-bounds pixels are dropped; drawing itself cannot fail, so the
/// error type is [`Infallible`].
pub struct Canvas<'a, S: ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PixelSurface + ?Sized> Canvas<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self { surface }
    }
}

impl<S: PixelSurface + ?Sized> OriginDimensions for Canvas<'_, S> {
    fn size(&self) -> Size {
        let (w, h) = self.surface.size();
        Size::new(w as u32, h as u32)
    }
}

impl<S: PixelSurface + ?Sized> DrawTarget for Canvas<'_, S> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.surface.size();
        for Pixel(p, c) in pixels {
            if p.x >= 0 && p.y >= 0 && (p.x as u16) < w && (p.y as u16) < h {
                self.surface
                    .set_pixel(p.x as u16, p.y as u16, Rgba::opaque(c.r(), c.g(), c.b()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use prosopon_core::surface::FrameBuffer;

    #[test]
    fn test_rectangle_fill() {
        let mut fb: FrameBuffer<16, 16> = FrameBuffer::new();
        let mut canvas = Canvas::new(&mut fb);
        Rectangle::new(Point::new(2, 3), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(10, 20, 30)))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(fb.pixel(2, 3), Rgba::opaque(10, 20, 30));
        assert_eq!(fb.pixel(5, 4), Rgba::opaque(10, 20, 30));
        assert_eq!(fb.pixel(6, 3), Rgba::BLANK);
        assert_eq!(fb.pixel(2, 5), Rgba::BLANK);
    }

    #[test]
    fn test_out_of_bounds_pixels_dropped() {
        let mut fb: FrameBuffer<8, 8> = FrameBuffer::new();
        let mut canvas = Canvas::new(&mut fb);
        Rectangle::new(Point::new(6, 6), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(fb.pixel(7, 7), Rgba::opaque(0xFF, 0xFF, 0xFF));
        // nothing wrapped around
        assert_eq!(fb.pixel(0, 0), Rgba::BLANK);
    }

    #[test]
    fn test_reports_surface_size() {
        let mut fb: FrameBuffer<24, 10> = FrameBuffer::new();
        let canvas = Canvas::new(&mut fb);
        assert_eq!(canvas.size(), Size::new(24, 10));
    }
}
