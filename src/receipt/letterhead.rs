//! Letterhead image loading.
//!
//! Only JPEGs are accepted. They are embedded in the PDF as-is, so the file
//! is never decoded; `jpeg-decoder` reads just its frame header.

use jpeg_decoder::{Decoder, PixelFormat};
use std::fs;
use std::path::Path;

use crate::error::{OpsError, OpsResult};

/// Colour model of a letterhead JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterheadColor {
    /// One 8-bit grey channel.
    Gray,
    /// Three 8-bit channels.
    Rgb,
    /// Four 8-bit channels.
    Cmyk,
}

/// A JPEG letterhead ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    /// The JPEG file contents.
    pub jpeg: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Colour model.
    pub color: LetterheadColor,
}

impl Letterhead {
    /// Reads and inspects a JPEG file.
    pub fn load(path: &Path) -> OpsResult<Self> {
        let bytes = fs::read(path).map_err(|e| OpsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_jpeg(bytes)
    }

    /// Inspects JPEG bytes already in memory.
    pub fn from_jpeg(jpeg: Vec<u8>) -> OpsResult<Self> {
        let mut decoder = Decoder::new(jpeg.as_slice());
        decoder
            .read_info()
            .map_err(|e| letterhead_error(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| letterhead_error("no frame header"))?;

        if info.width == 0 || info.height == 0 {
            return Err(letterhead_error("image has zero size"));
        }
        let color = match info.pixel_format {
            PixelFormat::L8 => LetterheadColor::Gray,
            PixelFormat::RGB24 => LetterheadColor::Rgb,
            PixelFormat::CMYK32 => LetterheadColor::Cmyk,
            other => {
                return Err(letterhead_error(format!(
                    "unsupported pixel format {:?}",
                    other
                )));
            }
        };

        Ok(Self {
            width: u32::from(info.width),
            height: u32::from(info.height),
            color,
            jpeg,
        })
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

fn letterhead_error(message: impl Into<String>) -> OpsError {
    OpsError::Receipt {
        message: format!("letterhead: {}", message.into()),
    }
}
