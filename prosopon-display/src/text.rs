//! Status panel text grid
//!
//! Lays a monospace character grid over a shared pixel surface using the
//! embedded-graphics 6x10 font. Rows are repainted whole: a background
//! band first, then the glyphs, so stale characters never linger.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use prosopon_core::color::Rgba;
use prosopon_core::surface::{PixelSurface, Shared};
use prosopon_core::text::{TextError, TextPanel};

use crate::canvas::Canvas;

const CELL_W: u32 = 6;
const CELL_H: u32 = 10;
const MAX_COLS: usize = 32;
const MAX_ROWS: usize = 8;
const MIN_COLS: u8 = 15;
const MIN_ROWS: u8 = 4;

/// Character grid renderer over a shared surface.
///
/// The surface is shared with the preview mirror, which paints below the
/// text rows; the grid only ever touches its own row bands.
pub struct TextGrid<S> {
    surface: Shared<S>,
    cols: u8,
    rows: u8,
    cursor_row: u8,
    lines: [heapless::String<MAX_COLS>; MAX_ROWS],
    inverse: [bool; MAX_ROWS],
}

impl<S: PixelSurface> TextGrid<S> {
    /// Build a grid sized to the surface, 6x10 pixels per cell.
    pub fn new(surface: Shared<S>) -> Result<Self, TextError> {
        let (w, h) = surface.size();
        let cols = ((w as u32 / CELL_W) as usize).min(MAX_COLS) as u8;
        let rows = ((h as u32 / CELL_H) as usize).min(MAX_ROWS) as u8;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(TextError::TooSmall);
        }
        Ok(Self {
            surface,
            cols,
            rows,
            cursor_row: 0,
            lines: Default::default(),
            inverse: [false; MAX_ROWS],
        })
    }

    fn store(&mut self, row: u8, text: &str, inverse: bool) {
        let line = &mut self.lines[row as usize];
        line.clear();
        for ch in text.chars().take(self.cols as usize) {
            if line.push(ch).is_err() {
                break;
            }
        }
        self.inverse[row as usize] = inverse;
    }

    fn paint_row(&self, row: u8) {
        let (fg, bg) = if self.inverse[row as usize] {
            (Rgb888::BLACK, Rgb888::WHITE)
        } else {
            (Rgb888::WHITE, Rgb888::BLACK)
        };
        let y0 = row as i32 * CELL_H as i32;
        let band_w = self.cols as u32 * CELL_W;
        let text = &self.lines[row as usize];

        self.surface.with(|s| {
            let mut canvas = Canvas::new(s);
            let _ = Rectangle::new(Point::new(0, y0), Size::new(band_w, CELL_H))
                .into_styled(PrimitiveStyle::with_fill(bg))
                .draw(&mut canvas);
            let style = MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(fg)
                .background_color(bg)
                .build();
            let _ = Text::with_baseline(text, Point::new(0, y0), style, Baseline::Top)
                .draw(&mut canvas);
        });
    }

    fn write_row(&mut self, row: u8, text: &str, inverse: bool) -> Result<(), TextError> {
        if row >= self.rows {
            return Err(TextError::BadRow);
        }
        self.store(row, text, inverse);
        self.paint_row(row);
        Ok(())
    }

    fn scroll_up(&mut self) {
        for i in 1..self.rows as usize {
            self.lines.swap(i - 1, i);
            self.inverse.swap(i - 1, i);
        }
        let last = self.rows as usize - 1;
        self.lines[last].clear();
        self.inverse[last] = false;
        for row in 0..self.rows {
            self.paint_row(row);
        }
    }

    fn advance(&mut self, text: &str, inverse: bool) -> Result<(), TextError> {
        if self.cursor_row >= self.rows {
            self.scroll_up();
            self.cursor_row = self.rows - 1;
        }
        let row = self.cursor_row;
        self.cursor_row += 1;
        self.write_row(row, text, inverse)
    }
}

impl<S: PixelSurface> TextPanel for TextGrid<S> {
    fn size(&self) -> (u8, u8) {
        (self.cols, self.rows)
    }

    fn clear(&mut self) {
        for line in self.lines.iter_mut() {
            line.clear();
        }
        self.inverse = [false; MAX_ROWS];
        self.cursor_row = 0;
        self.surface.with(|s| {
            let (w, h) = s.size();
            for y in 0..h {
                for x in 0..w {
                    s.set_pixel(x, y, Rgba::BLANK);
                }
            }
        });
    }

    fn set_line(&mut self, row: u8, text: &str) -> Result<(), TextError> {
        self.write_row(row, text, false)
    }

    fn set_line_inverse(&mut self, row: u8, text: &str) -> Result<(), TextError> {
        self.write_row(row, text, true)
    }

    fn println(&mut self, text: &str) -> Result<(), TextError> {
        self.advance(text, false)
    }

    fn println_inverse(&mut self, text: &str) -> Result<(), TextError> {
        self.advance(text, true)
    }

    fn set_cursor_row(&mut self, row: u8) {
        self.cursor_row = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prosopon_core::surface::FrameBuffer;

    const WHITE: Rgba = Rgba::opaque(0xFF, 0xFF, 0xFF);

    fn grid() -> (TextGrid<FrameBuffer<128, 64>>, Shared<FrameBuffer<128, 64>>) {
        let surface = Shared::new(FrameBuffer::new());
        let grid = TextGrid::new(surface.clone()).unwrap();
        (grid, surface)
    }

    fn lit_in_cell(s: &Shared<FrameBuffer<128, 64>>, col: u16, row: u16, c: Rgba) -> usize {
        let mut n = 0;
        for dy in 0..10 {
            for dx in 0..6 {
                if s.with(|fb| fb.pixel(col * 6 + dx, row * 10 + dy)) == c {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_grid_dimensions() {
        let (grid, _) = grid();
        assert_eq!(grid.size(), (21, 6));
    }

    #[test]
    fn test_too_small_surface_rejected() {
        let surface = Shared::new(FrameBuffer::<60, 30>::new());
        assert_eq!(TextGrid::new(surface).err(), Some(TextError::TooSmall));
    }

    #[test]
    fn test_set_line_draws_glyphs() {
        let (mut grid, surface) = grid();
        grid.set_line(1, "X").unwrap();

        // some glyph pixels lit in the first cell of row 1
        assert!(lit_in_cell(&surface, 0, 1, WHITE) > 0);
        // the rest of the band stays background
        assert_eq!(lit_in_cell(&surface, 5, 1, WHITE), 0);
    }

    #[test]
    fn test_inverse_line_has_light_background() {
        let (mut grid, surface) = grid();
        grid.set_line_inverse(0, "A").unwrap();

        // an empty cell in an inverse row is fully white
        assert_eq!(lit_in_cell(&surface, 10, 0, WHITE), 60);
        // the glyph cell has dark pixels carved out
        assert!(lit_in_cell(&surface, 0, 0, WHITE) < 60);
    }

    #[test]
    fn test_rewrite_clears_stale_glyphs() {
        let (mut grid, surface) = grid();
        grid.set_line(2, "WWWWW").unwrap();
        grid.set_line(2, "").unwrap();
        for col in 0..5 {
            assert_eq!(lit_in_cell(&surface, col, 2, WHITE), 0);
        }
    }

    #[test]
    fn test_bad_row_rejected() {
        let (mut grid, _) = grid();
        assert_eq!(grid.set_line(6, "x").unwrap_err(), TextError::BadRow);
    }

    #[test]
    fn test_println_advances_and_scrolls() {
        let (mut grid, _) = grid();
        for i in 0..6 {
            grid.println(match i {
                0 => "zero",
                1 => "one",
                2 => "two",
                3 => "three",
                4 => "four",
                _ => "five",
            })
            .unwrap();
        }
        assert_eq!(grid.lines[0].as_str(), "zero");

        // seventh line scrolls everything up one row
        grid.println("six").unwrap();
        assert_eq!(grid.lines[0].as_str(), "one");
        assert_eq!(grid.lines[5].as_str(), "six");
    }

    #[test]
    fn test_clear_blanks_surface() {
        let (mut grid, surface) = grid();
        grid.set_line_inverse(0, "BOOT").unwrap();
        grid.clear();
        assert_eq!(surface.with(|s| s.pixel(0, 0)), Rgba::BLANK);
        assert_eq!(grid.cursor_row, 0);
    }

    #[test]
    fn test_long_text_truncated_to_width() {
        let (mut grid, _) = grid();
        grid.set_line(0, "abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(grid.lines[0].chars().count(), 21);
    }
}
