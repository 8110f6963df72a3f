use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Emotion,
    services::{
        classifier::EmotionClassifier, face_detection::FaceDetector,
        features::ImageFeatureExtractor,
    },
};

/// Image bytes → emotion: feature extraction followed by classification
#[derive(Clone)]
pub struct EmotionAnalyzer {
    extractor: ImageFeatureExtractor,
    classifier: EmotionClassifier,
}

impl EmotionAnalyzer {
    pub fn new(extractor: ImageFeatureExtractor, classifier: EmotionClassifier) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// Analyzer with the default decision thresholds
    pub fn with_detector(detector: Arc<dyn FaceDetector>) -> Self {
        Self::new(
            ImageFeatureExtractor::new(detector),
            EmotionClassifier::default(),
        )
    }

    /// CPU-bound; callers on the async runtime should use `spawn_blocking`
    pub fn classify(&self, image_bytes: &[u8]) -> AppResult<Emotion> {
        let features = self.extractor.extract_from_bytes(image_bytes)?;
        let emotion = self.classifier.classify(&features);

        tracing::info!(
            faces = features.face_count,
            brightness = features.brightness,
            contrast = features.contrast,
            emotion = %emotion,
            "Image classified"
        );

        Ok(emotion)
    }
}
