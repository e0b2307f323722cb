use image::{DynamicImage, RgbImage};

/// A decoded image the preprocessor can read from.
///
/// Any imaging library can sit behind this; the crate ships impls for the
/// `image` crate's buffers.
pub trait Raster {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// 8-bit R, G, B at (`x`, `y`). Callers stay within bounds.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];

    /// Copies the raster into an owned RGB buffer.
    fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| image::Rgb(self.rgb(x, y)))
    }
}

impl Raster for RgbImage {
    fn width(&self) -> u32 {
        RgbImage::dimensions(self).0
    }

    fn height(&self) -> u32 {
        RgbImage::dimensions(self).1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }

    fn to_rgb8(&self) -> RgbImage {
        self.clone()
    }
}

impl Raster for DynamicImage {
    fn width(&self) -> u32 {
        image::GenericImageView::dimensions(self).0
    }

    fn height(&self) -> u32 {
        image::GenericImageView::dimensions(self).1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let p = image::GenericImageView::get_pixel(self, x, y).0;
        [p[0], p[1], p[2]]
    }

    fn to_rgb8(&self) -> RgbImage {
        DynamicImage::to_rgb8(self)
    }
}
