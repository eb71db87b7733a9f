use std::io::Cursor;
use bilevel::{ChannelOrder, SourceImage};
use image::{ImageFormat, Rgb, RgbImage};

/// Uniform gray image; every channel holds `value`.
pub fn uniform(width: u32, height: u32, value: u8) -> SourceImage {
    SourceImage::from_raw(
        width,
        height,
        ChannelOrder::Bgr,
        vec![value; (width * height * 3) as usize],
    )
    .unwrap()
}

/// Horizontal gradient with varying color so every intensity level appears.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgb([v, v.wrapping_add((y * 7) as u8), 255 - v])
    })
}

pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}
