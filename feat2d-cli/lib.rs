//! High-level helpers for the `feat2d` binary and examples.

pub mod contrast;

pub use contrast::{ContrastBackend, ContrastConfig};

use feat2d_core::Image;

/// Convert a decoded grayscale image into the pipeline's image type.
pub fn from_luma8(img: &image::GrayImage) -> Image {
    Image::gray8(img.width(), img.height(), img.as_raw().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma8_conversion_keeps_layout() {
        let mut luma = image::GrayImage::new(3, 2);
        luma.put_pixel(2, 1, image::Luma([9]));
        let img = from_luma8(&luma);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert!(img.is_mono8());
        assert_eq!(img.data()[5], 9);
    }
}
