use image::{GrayImage, Luma};
use crate::source::SourceImage;

// 0.299, 0.587 and 0.114 scaled by 2^14. The sum is exactly 1 << 14, so the
// result never exceeds 255.
const SHIFT: u32 = 14;
const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Perceived brightness of one pixel, rounded half up.
#[inline]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = WEIGHT_R * u32::from(r) + WEIGHT_G * u32::from(g) + WEIGHT_B * u32::from(b);
    ((sum + ROUND) >> SHIFT) as u8
}

/// Collapse a color source to one intensity channel.
#[must_use]
pub fn to_grayscale(source: &SourceImage) -> GrayImage {
    let (width, height) = source.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = source.rgb_at(x, y);
        Luma([luma(r, g, b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelOrder;

    #[test]
    fn neutral_grays_are_preserved() {
        for v in [0u8, 1, 10, 126, 127, 128, 250, 255] {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn primaries_use_luma_weights() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn weights_follow_channel_meaning_not_position() {
        let bgr = SourceImage::from_raw(1, 1, ChannelOrder::Bgr, vec![0, 0, 255]).unwrap();
        let rgb = SourceImage::from_raw(1, 1, ChannelOrder::Rgb, vec![255, 0, 0]).unwrap();
        assert_eq!(to_grayscale(&bgr).get_pixel(0, 0).0, [76]);
        assert_eq!(to_grayscale(&rgb).get_pixel(0, 0).0, [76]);
    }
}
