use image::{imageops, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::map::map_colors;
use imageproc::rect::Rect;
use crate::binary_image::BinaryImage;
use crate::error::{Error, Result};
use crate::source::SourceImage;

pub const GUTTER_WIDTH: u32 = 4;
const GUTTER_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

pub trait DrawComparison {
    /// Render `self` on the left and `binary` on the right, split by a grey gutter.
    fn draw_beside(&self, binary: &BinaryImage) -> Result<RgbImage>;
}

impl DrawComparison for SourceImage {
    fn draw_beside(&self, binary: &BinaryImage) -> Result<RgbImage> {
        let (width, height) = self.dimensions();
        if (binary.width(), binary.height()) != (width, height) {
            return Err(Error::InvalidImage(format!(
                "cannot compare {}x{} original with {}x{} result",
                width,
                height,
                binary.width(),
                binary.height()
            )));
        }

        let mut canvas = RgbImage::new(width * 2 + GUTTER_WIDTH, height);
        imageops::replace(&mut canvas, &self.to_rgb_image(), 0, 0);

        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(width as i32, 0).of_size(GUTTER_WIDTH, height),
            GUTTER_COLOR,
        );

        let result = map_colors(binary.as_gray(), |pixel: Luma<u8>| Rgb([pixel.0[0]; 3]));
        imageops::replace(&mut canvas, &result, i64::from(width + GUTTER_WIDTH), 0);

        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarization::binarize;
    use crate::source::ChannelOrder;

    #[test]
    fn places_original_and_result_side_by_side() {
        // One dark and one bright pixel, stored blue first.
        let source =
            SourceImage::from_raw(2, 1, ChannelOrder::Bgr, vec![0, 0, 200, 250, 250, 250]).unwrap();
        let binary = binarize(&source, 127).unwrap();
        let canvas = source.draw_beside(&binary).unwrap();

        assert_eq!(canvas.dimensions(), (2 * 2 + GUTTER_WIDTH, 1));
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 0, 0]);
        assert_eq!(canvas.get_pixel(1, 0).0, [250, 250, 250]);
        assert_eq!(*canvas.get_pixel(2, 0), GUTTER_COLOR);
        assert_eq!(canvas.get_pixel(2 + GUTTER_WIDTH, 0).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(3 + GUTTER_WIDTH, 0).0, [255, 255, 255]);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let a = SourceImage::from_raw(1, 1, ChannelOrder::Rgb, vec![0, 0, 0]).unwrap();
        let b = SourceImage::from_raw(2, 1, ChannelOrder::Rgb, vec![0; 6]).unwrap();
        let binary = binarize(&b, 0).unwrap();
        assert!(a.draw_beside(&binary).is_err());
    }
}
