//! Text panel capability
//!
//! Fixed-grid character output for the status panel: boot log lines, the
//! menu overlay, and idle diagnostics all go through [`TextPanel`]. The
//! glyph rendering itself lives in the display crate; the core only deals
//! in rows of text.

/// Errors writing to a text panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextError {
    /// Panel is smaller than the minimum usable grid
    TooSmall,
    /// Row index beyond the panel's grid
    BadRow,
}

/// A fixed grid of character rows.
///
/// Rows are overwritten whole; text longer than the panel width is
/// truncated, shorter text leaves the rest of the row blank.
pub trait TextPanel {
    /// Grid dimensions as (columns, rows).
    fn size(&self) -> (u8, u8);

    /// Blank every row and reset the cursor to row 0.
    fn clear(&mut self);

    /// Replace the contents of one row.
    fn set_line(&mut self, row: u8, text: &str) -> Result<(), TextError>;

    /// Replace one row, drawn inverse (dark on light).
    fn set_line_inverse(&mut self, row: u8, text: &str) -> Result<(), TextError>;

    /// Write at the cursor row and advance it, scrolling at the bottom.
    fn println(&mut self, text: &str) -> Result<(), TextError>;

    /// Like [`TextPanel::println`] but drawn inverse.
    fn println_inverse(&mut self, text: &str) -> Result<(), TextError>;

    /// Move the cursor used by the println family.
    fn set_cursor_row(&mut self, row: u8);
}

/// Best-effort progress logging onto a text panel.
///
/// Boot-time diagnostics are cosmetic; a panel write failure must never
/// abort initialization, so these swallow errors.
pub trait LogSink {
    fn log(&mut self, text: &str);
    fn log_error(&mut self, text: &str);
}

impl<T: TextPanel + ?Sized> LogSink for T {
    fn log(&mut self, text: &str) {
        let _ = self.println(text);
    }

    fn log_error(&mut self, text: &str) {
        let _ = self.println_inverse(text);
    }
}
