use image::{DynamicImage, GrayImage, Luma};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::FeatureVector,
    services::face_detection::FaceDetector,
};

/// Turns a decoded image into face-presence and global luma statistics
#[derive(Clone)]
pub struct ImageFeatureExtractor {
    detector: Arc<dyn FaceDetector>,
}

impl ImageFeatureExtractor {
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    /// Decodes raw image bytes (PNG, JPEG, ...) and extracts features
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> AppResult<FeatureVector> {
        let image = image::load_from_memory(bytes).map_err(|e| AppError::Decode(e.to_string()))?;
        self.extract(&image)
    }

    pub fn extract(&self, image: &DynamicImage) -> AppResult<FeatureVector> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AppError::Decode("image has no pixels".to_string()));
        }

        let luma = bt601_luma(image);
        let face_count = self.detector.count_faces(&luma)?;
        let (brightness, contrast) = luma_statistics(&luma);

        Ok(FeatureVector {
            face_count,
            brightness,
            contrast,
        })
    }
}

/// 8-bit luma with BT.601 weights (0.299, 0.587, 0.114), rounded to nearest.
/// The classifier thresholds are on this scale, not `to_luma8`'s Rec.709.
pub fn bt601_luma(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Mean and population standard deviation of luma over the whole image
pub fn luma_statistics(luma: &GrayImage) -> (f64, f64) {
    let pixels = luma.as_raw();
    if pixels.is_empty() {
        return (0.0, 0.0);
    }

    let n = pixels.len() as f64;
    let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = pixels
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Emotion, services::classifier::EmotionClassifier};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    struct FixedFaces(usize);

    impl FaceDetector for FixedFaces {
        fn count_faces(&self, _luma: &GrayImage) -> AppResult<usize> {
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn extractor(faces: usize) -> ImageFeatureExtractor {
        ImageFeatureExtractor::new(Arc::new(FixedFaces(faces)))
    }

    #[test]
    fn test_uniform_image_has_zero_contrast() {
        let luma = GrayImage::from_pixel(4, 4, Luma([120]));
        let (brightness, contrast) = luma_statistics(&luma);
        assert_eq!(brightness, 120.0);
        assert_eq!(contrast, 0.0);
    }

    #[test]
    fn test_half_black_half_white() {
        let luma = GrayImage::from_fn(2, 1, |x, _| if x == 0 { Luma([0]) } else { Luma([200]) });
        let (brightness, contrast) = luma_statistics(&luma);
        assert_eq!(brightness, 100.0);
        // population std-dev, not sample
        assert_eq!(contrast, 100.0);
    }

    #[test]
    fn test_extract_from_png_bytes() {
        let image = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let features = extractor(1).extract_from_bytes(&bytes).unwrap();
        assert_eq!(features.face_count, 1);
        assert_eq!(features.brightness, 0.0);
        assert_eq!(features.contrast, 0.0);
    }

    #[test]
    fn test_luma_uses_bt601_weights() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        }));
        let luma = bt601_luma(&image);
        assert_eq!(luma.as_raw(), &vec![76, 150, 29]);
    }

    #[test]
    fn test_red_and_green_pixels_classify_as_neutral() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 255, 0])
            }
        }));

        let features = extractor(1).extract(&image).unwrap();
        assert_eq!(features.brightness, 113.0);
        assert_eq!(features.contrast, 37.0);
        assert_eq!(EmotionClassifier::default().classify(&features), Emotion::Neutral);
    }

    #[test]
    fn test_white_stays_at_full_scale() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])));
        let features = extractor(1).extract(&image).unwrap();
        assert_eq!(features.brightness, 255.0);
        assert_eq!(features.contrast, 0.0);
    }

    #[test]
    fn test_zero_faces_is_not_an_error() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([10, 10, 10])));
        let features = extractor(0).extract(&image).unwrap();
        assert_eq!(features.face_count, 0);
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let result = extractor(1).extract_from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }
}
