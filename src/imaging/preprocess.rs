//! Raster → model input tensor.
//!
//! The source is stretched to exactly 224×224 with bilinear filtering, with
//! no letterboxing or cropping, and each 8-bit channel `v` becomes
//! `v / 255 · 2 − 1`.

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::error::ClassifyError;
use crate::imaging::raster::Raster;
use crate::math::tensor::{Tensor, INPUT_SIZE, TENSOR_LEN};

#[inline]
fn normalize_channel(v: u8) -> f32 {
    v as f32 / 255.0 * 2.0 - 1.0
}

/// Stateless image → tensor converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    pub fn new() -> Self {
        ImagePreprocessor
    }

    /// Decodes encoded image bytes (PNG/JPEG/BMP/GIF) and converts them.
    ///
    /// Undecodable input fails with `ClassifyError::Decode` before any
    /// resizing happens.
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> Result<Tensor, ClassifyError> {
        if bytes.is_empty() {
            return Err(ClassifyError::decode("image payload is empty"));
        }
        let img = image::load_from_memory(bytes).map_err(|e| ClassifyError::decode(e.to_string()))?;
        self.preprocess(&img)
    }

    /// Converts an already decoded raster of any size ≥ 1×1.
    pub fn preprocess<R: Raster + ?Sized>(&self, raster: &R) -> Result<Tensor, ClassifyError> {
        let (w, h) = (raster.width(), raster.height());
        if w == 0 || h == 0 {
            return Err(ClassifyError::decode(format!("image has no pixels ({}x{})", w, h)));
        }

        let rgb = raster.to_rgb8();
        let resized = if (w, h) == (INPUT_SIZE, INPUT_SIZE) {
            rgb
        } else {
            debug!(width = w, height = h, "resizing to {0}x{0}", INPUT_SIZE);
            resize_bilinear(&rgb)
        };

        let mut data = Vec::with_capacity(TENSOR_LEN);
        data.extend(resized.pixels().flat_map(|p| p.0.map(normalize_channel)));

        Tensor::from_vec(data).ok_or_else(|| {
            ClassifyError::decode("resized image did not produce a full input tensor")
        })
    }
}

fn resize_bilinear(rgb: &RgbImage) -> RgbImage {
    imageops::resize(rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    /// Synthetic raster that never materializes unless asked to.
    struct Gradient {
        w: u32,
        h: u32,
    }

    impl Raster for Gradient {
        fn width(&self) -> u32 { self.w }
        fn height(&self) -> u32 { self.h }
        fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
            [(x % 256) as u8, (y % 256) as u8, 128]
        }
    }

    #[test]
    fn normalization_endpoints() {
        assert_eq!(normalize_channel(0), -1.0);
        assert_eq!(normalize_channel(255), 1.0);
        assert!((normalize_channel(128) - 0.003_921_6).abs() < 1e-6);
    }

    #[test]
    fn native_size_keeps_exact_pixels_in_rgb_order() {
        let img = RgbImage::from_fn(224, 224, |x, y| {
            if (x, y) == (3, 5) { Rgb([255, 0, 51]) } else { Rgb([0, 0, 0]) }
        });
        let t = ImagePreprocessor::new().preprocess(&img).unwrap();
        assert_eq!(t.at(3, 5, 0), 1.0);
        assert_eq!(t.at(3, 5, 1), -1.0);
        assert!((t.at(3, 5, 2) - (51.0 / 255.0 * 2.0 - 1.0)).abs() < 1e-6);
        assert_eq!(t.at(5, 3, 0), -1.0);
    }

    #[test]
    fn output_size_independent_of_input_size() {
        let pre = ImagePreprocessor::new();
        for (w, h) in [(1, 1), (10, 10), (4000, 3000), (37, 900)] {
            let t = pre.preprocess(&Gradient { w, h }).unwrap();
            assert_eq!(t.len(), TENSOR_LEN);
            assert_eq!(t.to_bytes().len(), 224 * 224 * 3 * 4, "{w}x{h}");
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let t = ImagePreprocessor::new().preprocess(&Gradient { w: 300, h: 77 }).unwrap();
        assert!(t.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn uniform_image_resizes_to_uniform_tensor() {
        let bytes = png_bytes(RgbImage::from_pixel(50, 20, Rgb([0, 0, 0])));
        let t = ImagePreprocessor::new().preprocess_bytes(&bytes).unwrap();
        assert!(t.as_slice().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn stretches_without_letterboxing() {
        // Left half red, right half blue; a letterboxed resize would put
        // padding rows at the top and bottom.
        let img = RgbImage::from_fn(400, 100, |x, _| {
            if x < 200 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let t = ImagePreprocessor::new().preprocess(&img).unwrap();
        assert!(t.at(10, 0, 0) > 0.9 && t.at(10, 223, 0) > 0.9);
        assert!(t.at(210, 0, 2) > 0.9 && t.at(210, 223, 2) > 0.9);
    }

    #[test]
    fn corrupt_bytes_are_decode_errors() {
        let err = ImagePreprocessor::new()
            .preprocess_bytes(b"\x89PNG\r\n\x1a\nnot really")
            .unwrap_err();
        assert_eq!(err.stage(), crate::error::Stage::Decode);
    }

    #[test]
    fn empty_payload_is_decode_error() {
        let err = ImagePreprocessor::new().preprocess_bytes(&[]).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn zero_sized_raster_rejected() {
        let err = ImagePreprocessor::new().preprocess(&Gradient { w: 0, h: 4 }).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }
}
