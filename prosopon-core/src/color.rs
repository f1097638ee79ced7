//! Color types and channel math
//!
//! The core works in 8-bit-per-channel RGBA everywhere. The packed 16-bit
//! 5/6/5 format only appears at the asset-loading boundary and is expanded
//! to RGBA before any pixel reaches a surface.

/// 8-bit-per-channel RGBA color.
///
/// Alpha is `0xFF` for opaque draws by convention; the all-zero value is
/// used as "blank" when clearing regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// The blank (cleared) pixel value.
    pub const BLANK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Create an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

/// Color channel selector for the preview downmix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Extract this channel's intensity from a color.
    pub fn intensity(self, c: Rgba) -> u8 {
        match self {
            Channel::Red => c.r,
            Channel::Green => c.g,
            Channel::Blue => c.b,
        }
    }
}

/// Packed 16-bit color, 5 red / 6 green / 5 blue bits.
///
/// Only produced by asset decoders; expanded with [`Rgb565::to_rgba`]
/// before entering the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Expand to 8-bit RGBA by bit replication.
    ///
    /// The top bits of each channel are duplicated into the low bits, so
    /// full-scale channel values expand to exactly `0xFF` rather than
    /// `0xF8`/`0xFC`. Alpha is always opaque.
    pub fn to_rgba(self) -> Rgba {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;

        Rgba {
            r: (r5 << 3) | (r5 >> 2),
            g: (g6 << 2) | (g6 >> 4),
            b: (b5 << 3) | (b5 >> 2),
            a: 0xFF,
        }
    }
}

/// Downmix a full-color pixel to a single-channel thresholded preview.
///
/// Below the cutoff the pixel is off (opaque black); at or above it the
/// selected channel is forced fully on and the others zeroed. This is a
/// deliberate lossy visualization for a low-capability panel, not a
/// color-accurate copy.
pub fn downmix(c: Rgba, channel: Channel, cutoff: u8) -> Rgba {
    if channel.intensity(c) < cutoff {
        return Rgba::opaque(0, 0, 0);
    }
    match channel {
        Channel::Red => Rgba::opaque(0xFF, 0, 0),
        Channel::Green => Rgba::opaque(0, 0xFF, 0),
        Channel::Blue => Rgba::opaque(0, 0, 0xFF),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_full_scale_expands_to_ff() {
        let c = Rgb565(0xFFFF).to_rgba();
        assert_eq!(c, Rgba::opaque(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn test_rgb565_black() {
        let c = Rgb565(0).to_rgba();
        assert_eq!(c, Rgba::opaque(0, 0, 0));
    }

    #[test]
    fn test_rgb565_bit_replication() {
        // Red 0b10000 -> 0b10000_100
        let c = Rgb565(0b10000 << 11).to_rgba();
        assert_eq!(c.r, 0b1000_0100);
        assert_eq!(c.g, 0);
        assert_eq!(c.b, 0);

        // Green 0b100000 -> 0b100000_10
        let c = Rgb565(0b100000 << 5).to_rgba();
        assert_eq!(c.g, 0b1000_0010);
    }

    #[test]
    fn test_rgb565_always_opaque() {
        assert_eq!(Rgb565(0).to_rgba().a, 0xFF);
        assert_eq!(Rgb565(0x1234).to_rgba().a, 0xFF);
    }

    #[test]
    fn test_downmix_below_cutoff_is_off() {
        let c = downmix(Rgba::opaque(0x50, 0x20, 0x90), Channel::Red, 0xA0);
        assert_eq!(c, Rgba::opaque(0, 0, 0));
    }

    #[test]
    fn test_downmix_above_cutoff_forces_channel() {
        let c = downmix(Rgba::opaque(0xF0, 0x80, 0x22), Channel::Red, 0xA0);
        assert_eq!(c, Rgba::opaque(0xFF, 0, 0));
    }

    #[test]
    fn test_downmix_other_channels() {
        let c = downmix(Rgba::opaque(0, 0xC0, 0), Channel::Green, 0xA0);
        assert_eq!(c, Rgba::opaque(0, 0xFF, 0));

        let c = downmix(Rgba::opaque(0, 0, 0xC0), Channel::Blue, 0xA0);
        assert_eq!(c, Rgba::opaque(0, 0, 0xFF));
    }
}
