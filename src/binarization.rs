//! Grayscale reduction followed by a global binary threshold.
//!
//! Every function here is pure: the source is only read, the result is a
//! freshly allocated [`BinaryImage`] with the source's dimensions.

use image::{GrayImage, Luma};
use imageproc::map::map_colors;
use log::debug;
use crate::binary_image::{BinaryImage, BACKGROUND, FOREGROUND};
use crate::error::Result;
use crate::grayscale::to_grayscale;
use crate::source::SourceImage;
use crate::threshold::Threshold;

/// A decoded input together with its binarized form.
#[derive(Debug, Clone)]
pub struct Binarized {
    pub original: SourceImage,
    pub binary: BinaryImage,
}

/// Binarize `source`, rejecting thresholds outside `0..=255`.
pub fn binarize(source: &SourceImage, threshold: i64) -> Result<BinaryImage> {
    let threshold = Threshold::try_from(threshold)?;
    Ok(binarize_with(source, threshold))
}

#[must_use]
pub fn binarize_with(source: &SourceImage, threshold: Threshold) -> BinaryImage {
    let gray = to_grayscale(source);
    let binary = binarize_gray(&gray, threshold);
    debug!(
        "Binarized {}x{} image at threshold {}: {} foreground pixels",
        binary.width(),
        binary.height(),
        threshold.value(),
        binary.foreground_count()
    );
    binary
}

/// Map each gray value to 255 if it is strictly above `threshold`, else 0.
#[must_use]
pub fn binarize_gray(gray: &GrayImage, threshold: Threshold) -> BinaryImage {
    BinaryImage::from_gray(map_colors(gray, |pixel: Luma<u8>| {
        Luma([if threshold.is_foreground(pixel.0[0]) {
            FOREGROUND
        } else {
            BACKGROUND
        }])
    }))
}

/// Decode an in-memory JPEG or PNG and binarize it.
///
/// The threshold is checked before decoding; nothing is produced unless both
/// inputs are valid.
pub fn binarize_encoded(bytes: &[u8], threshold: i64) -> Result<Binarized> {
    let threshold = Threshold::try_from(threshold)?;
    let original = SourceImage::decode(bytes)?;
    let binary = binarize_with(&original, threshold);
    Ok(Binarized { original, binary })
}
