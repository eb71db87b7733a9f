mod binarization;
mod binary_image;
mod grayscale;
mod source;
mod threshold;
pub mod draw;
pub mod error;

pub use crate::binarization::{binarize, binarize_encoded, binarize_gray, binarize_with, Binarized};
pub use crate::binary_image::{BinaryImage, BACKGROUND, FOREGROUND};
pub use crate::error::{Error, Result};
pub use crate::grayscale::{luma, to_grayscale};
pub use crate::source::{ChannelOrder, SourceImage};
pub use crate::threshold::Threshold;
