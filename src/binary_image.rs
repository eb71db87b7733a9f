use std::path::Path;
use image::{GenericImageView, GrayImage, ImageError, Luma};
use log::debug;
use crate::error::{Error, Result};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Single-channel raster whose pixels are either [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage(GrayImage);

impl BinaryImage {
    /// Callers must only hand over 0/255 pixels.
    pub(crate) fn from_gray(image: GrayImage) -> Self {
        debug_assert!(
            image.iter().all(|&v| v == FOREGROUND || v == BACKGROUND),
            "Binary image must only hold 0 or 255"
        );
        Self(image)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    #[must_use]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == FOREGROUND
    }

    #[must_use]
    pub fn foreground_count(&self) -> u64 {
        self.0.iter().filter(|&&v| v == FOREGROUND).count() as u64
    }

    #[inline]
    #[must_use]
    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_gray(self) -> GrayImage {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    /// Encode to `path`, picking the format from its extension. An existing
    /// file is overwritten.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.0.save(path).map_err(|e| match e {
            ImageError::IoError(e) => Error::Io(e),
            other => Error::Encode(format!("{}: {}", path.display(), other)),
        })?;
        debug!("Saved {}x{} binary image to {}", self.width(), self.height(), path.display());
        Ok(())
    }
}

impl GenericImageView for BinaryImage {
    type Pixel = Luma<u8>;
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
    #[inline]
    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        *self.0.get_pixel(x, y)
    }
}

impl From<BinaryImage> for GrayImage {
    fn from(image: BinaryImage) -> Self {
        image.into_gray()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> BinaryImage {
        BinaryImage::from_gray(GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x + y) % 2 == 0 { FOREGROUND } else { BACKGROUND }])
        }))
    }

    #[test]
    fn counts_foreground() {
        let image = checker(3, 3);
        assert_eq!(image.foreground_count(), 5);
        assert!(image.is_foreground(0, 0));
        assert!(!image.is_foreground(1, 0));
        assert_eq!(GenericImageView::get_pixel(&image, 2, 2), Luma([255]));
    }

    #[test]
    fn png_save_overwrites_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholded_image.png");

        checker(4, 2).save(&path).unwrap();
        let blank = BinaryImage::from_gray(GrayImage::new(2, 2));
        blank.save(&path).unwrap();

        let reloaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(reloaded.dimensions(), (2, 2));
        assert!(reloaded.iter().all(|&v| v == BACKGROUND));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(checker(2, 2).save(&path).is_err());
    }
}
