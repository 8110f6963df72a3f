use crate::models::{Emotion, FeatureVector};

/// Decision thresholds on the 0-255 luma scale. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub happy_min_brightness: f64,
    pub happy_min_contrast: f64,
    pub sad_max_brightness: f64,
    pub sad_max_contrast: f64,
    pub calm_max_contrast: f64,
    pub energetic_min_contrast: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            happy_min_brightness: 150.0,
            happy_min_contrast: 50.0,
            sad_max_brightness: 100.0,
            sad_max_contrast: 30.0,
            calm_max_contrast: 25.0,
            energetic_min_contrast: 60.0,
        }
    }
}

/// Maps image statistics to an emotion with a fixed, ordered decision table
#[derive(Debug, Clone, Default)]
pub struct EmotionClassifier {
    thresholds: Thresholds,
}

impl EmotionClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// First matching rule wins
    pub fn classify(&self, features: &FeatureVector) -> Emotion {
        let t = &self.thresholds;
        let FeatureVector {
            face_count,
            brightness,
            contrast,
        } = *features;

        if face_count == 0 {
            Emotion::Neutral
        } else if brightness > t.happy_min_brightness && contrast > t.happy_min_contrast {
            Emotion::Happy
        } else if brightness < t.sad_max_brightness && contrast < t.sad_max_contrast {
            Emotion::Sad
        } else if contrast < t.calm_max_contrast {
            Emotion::Calm
        } else if contrast > t.energetic_min_contrast {
            Emotion::Energetic
        } else {
            Emotion::Neutral
        }
    }
}
