//! Image assets
//!
//! Decoding and storage of image data are the host's concern; the core
//! only sees decoded RGBA pixel grids through the [`AssetSource`] trait.

use alloc::vec::Vec;

use crate::color::{Rgb565, Rgba};

/// Logical image categories, each with a fixed expected size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageKind {
    Eye,
    Nose,
    Mouth,
    /// Covers one whole logical face half
    Full,
}

impl ImageKind {
    /// Expected image dimensions for this kind.
    pub fn expected_size(self) -> (u16, u16) {
        match self {
            ImageKind::Eye => (24, 12),
            ImageKind::Nose => (12, 12),
            ImageKind::Mouth => (48, 18),
            ImageKind::Full => (64, 32),
        }
    }
}

/// Errors loading an image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// No asset with the requested name
    NotFound,
    /// Asset could not be decoded
    Decode,
    /// Decoded dimensions do not match the requested kind
    BadDimensions,
}

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Build an image from a row-major pixel grid.
    pub fn new(width: u16, height: u16, pixels: Vec<Rgba>) -> Result<Self, AssetError> {
        if pixels.len() != width as usize * height as usize {
            return Err(AssetError::Decode);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a solid-color image.
    pub fn filled(width: u16, height: u16, c: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: alloc::vec![c; width as usize * height as usize],
        }
    }

    /// Expand a packed 5/6/5 pixel grid from an asset decoder.
    pub fn from_rgb565(width: u16, height: u16, pixels: &[u16]) -> Result<Self, AssetError> {
        if pixels.len() != width as usize * height as usize {
            return Err(AssetError::Decode);
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.iter().map(|&p| Rgb565(p).to_rgba()).collect(),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixel at (x, y); blank outside the image.
    pub fn pixel(&self, x: u16, y: u16) -> Rgba {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            Rgba::BLANK
        }
    }
}

/// Source of decoded image assets.
pub trait AssetSource {
    /// Load the named image of the given kind.
    fn load(&mut self, kind: ImageKind, name: &str) -> Result<Image, AssetError>;
}

/// Load an image and validate its dimensions against the kind.
pub fn load_checked(
    source: &mut dyn AssetSource,
    kind: ImageKind,
    name: &str,
) -> Result<Image, AssetError> {
    let img = source.load(kind, name)?;
    if (img.width(), img.height()) != kind.expected_size() {
        return Err(AssetError::BadDimensions);
    }
    Ok(img)
}
