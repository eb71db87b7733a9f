use std::fs;
use std::path::Path;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use log::debug;
use crate::error::{Error, Result};

/// Storage order of the three interleaved color components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Blue first, as produced by most camera and video capture stacks.
    Bgr,
}

/// A non-empty, row-major, 3-channel 8-bit color raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl SourceImage {
    /// Wrap an interleaved buffer of exactly `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err("image has zero width or height".into());
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or("image dimensions overflow")?;
        if data.len() != expected {
            return Err(Error::InvalidImage(format!(
                "expected {} bytes for a {}x{} image, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_raw(width, height, ChannelOrder::Rgb, image.into_raw())
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        Self::from_rgb(image.to_rgb8())
    }

    /// Decode an encoded JPEG or PNG held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err("empty input".into());
        }
        let format = image::guess_format(bytes)
            .map_err(|e| Error::InvalidImage(format!("unrecognized encoding: {}", e)))?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(Error::InvalidImage(format!(
                "unsupported format {:?}, expected JPEG or PNG",
                format
            )));
        }
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| Error::InvalidImage(format!("failed to decode {:?}: {}", format, e)))?;
        debug!(
            "Decoded {:?} image ({}x{}, {:?})",
            format,
            image.width(),
            image.height(),
            image.color()
        );
        Self::from_dynamic(image)
    }

    /// Read and decode a JPEG or PNG file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| Error::InvalidImage(format!("{}: {}", path.display(), e)))?;
        Self::decode(&bytes)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    #[inline]
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// The pixel at `(x, y)` as `[r, g, b]`, whatever the storage order.
    #[inline]
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        debug_assert!(x < self.width && y < self.height, "Pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 3;
        let p = &self.data[i..i + 3];
        match self.order {
            ChannelOrder::Rgb => [p[0], p[1], p[2]],
            ChannelOrder::Bgr => [p[2], p[1], p[0]],
        }
    }

    #[must_use]
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.rgb_at(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            SourceImage::from_raw(0, 4, ChannelOrder::Rgb, vec![]),
            Err(Error::InvalidImage(_))
        ));
        assert!(matches!(
            SourceImage::from_rgb(RgbImage::new(3, 0)),
            Err(Error::InvalidImage(_))
        ));
    }

    #[test]
    fn rejects_short_buffer() {
        let err = SourceImage::from_raw(2, 2, ChannelOrder::Bgr, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn bgr_pixels_are_read_as_rgb() {
        let image = SourceImage::from_raw(1, 1, ChannelOrder::Bgr, vec![1, 2, 3]).unwrap();
        assert_eq!(image.rgb_at(0, 0), [3, 2, 1]);
        assert_eq!(image.to_rgb_image().get_pixel(0, 0).0, [3, 2, 1]);
    }

    #[test]
    fn decodes_png_in_memory() {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(2, 1, Rgb([200, 100, 50]));
        let image = SourceImage::decode(&encode(&rgb, ImageFormat::Png)).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.order(), ChannelOrder::Rgb);
        assert_eq!(image.rgb_at(2, 1), [200, 100, 50]);
    }

    #[test]
    fn decodes_jpeg_in_memory() {
        let rgb = RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]));
        let image = SourceImage::decode(&encode(&rgb, ImageFormat::Jpeg)).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn rejects_garbage_and_other_formats() {
        assert!(matches!(SourceImage::decode(b""), Err(Error::InvalidImage(_))));
        assert!(matches!(
            SourceImage::decode(b"definitely not an image"),
            Err(Error::InvalidImage(_))
        ));
        let bmp = encode(&RgbImage::new(2, 2), ImageFormat::Bmp);
        assert!(matches!(SourceImage::decode(&bmp), Err(Error::InvalidImage(_))));
    }

    #[test]
    fn truncated_png_is_invalid() {
        let png = encode(&RgbImage::new(16, 16), ImageFormat::Png);
        let result = SourceImage::decode(&png[..png.len() / 2]);
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }

    #[test]
    fn missing_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceImage::open(dir.path().join("nope.png"));
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }
}
