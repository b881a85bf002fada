//! Composite image loading with channel-preserving conversion

use crate::io::error::{Result, ScoreError, malformed_image};
use crate::spatial::mask::BackgroundMode;
use image::DynamicImage;
use ndarray::{Array3, ArrayView2, Axis};
use std::path::Path;

/// Raw composite image as a `(height, width, channels)` byte array
///
/// The channel count of the source file is preserved so that a missing alpha
/// channel is detected instead of being synthesized by conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeImage {
    pixels: Array3<u8>,
}

impl CompositeImage {
    /// Wrap an existing `(height, width, channels)` array
    pub const fn from_array(pixels: Array3<u8>) -> Self {
        Self { pixels }
    }

    /// Load an image file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (`NotFound`)
    /// - The file is not a decodable image (`ImageLoad`)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| ScoreError::from_image_error(path_buf, e))?;
        Self::from_dynamic(img)
    }

    /// Convert a decoded image, keeping 1, 2, 3 or 4 channels as stored
    ///
    /// Wider sample types are narrowed to 8 bits per channel.
    ///
    /// # Errors
    ///
    /// Returns `MalformedImage` if the pixel buffer does not match the image dimensions
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let color = img.color();
        let (width, height) = (img.width() as usize, img.height() as usize);

        let (channels, raw) = match (color.has_color(), color.has_alpha()) {
            (true, true) => (4, img.into_rgba8().into_raw()),
            (true, false) => (3, img.into_rgb8().into_raw()),
            (false, true) => (2, img.into_luma_alpha8().into_raw()),
            (false, false) => (1, img.into_luma8().into_raw()),
        };

        let pixels = Array3::from_shape_vec((height, width, channels), raw)
            .map_err(|e| malformed_image(&format!("pixel buffer shape mismatch: {e}")))?;

        Ok(Self { pixels })
    }

    /// Image dimensions (height, width)
    pub fn dims(&self) -> (usize, usize) {
        let (height, width, _) = self.pixels.dim();
        (height, width)
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }

    /// Index of the alpha channel, present only for gray-alpha and RGBA images
    pub fn alpha_channel(&self) -> Option<usize> {
        match self.channels() {
            2 | 4 => Some(self.channels() - 1),
            _ => None,
        }
    }

    /// Channel that carries the strokes for `mode`
    ///
    /// # Errors
    ///
    /// Returns `MalformedImage` if the image has no channels, or has no alpha
    /// channel when `mode` is transparent
    pub fn channel_index(&self, mode: BackgroundMode) -> Result<usize> {
        match mode {
            BackgroundMode::Opaque if self.channels() > 0 => Ok(0),
            BackgroundMode::Opaque => Err(malformed_image(&"image has no channels")),
            BackgroundMode::Transparent => self.alpha_channel().ok_or_else(|| {
                malformed_image(&format!(
                    "transparent mode requires an alpha channel, image has {} channel(s)",
                    self.channels()
                ))
            }),
        }
    }

    /// View of one channel as a `(height, width)` grid
    pub fn channel(&self, index: usize) -> Option<ArrayView2<'_, u8>> {
        (index < self.channels()).then(|| self.pixels.index_axis(Axis(2), index))
    }
}
