pub mod analysis;
pub mod catalog;
pub mod classifier;
pub mod face_detection;
pub mod features;
pub mod recommendations;

pub use analysis::EmotionAnalyzer;
pub use catalog::{CatalogClient, DeezerClient};
pub use classifier::{EmotionClassifier, Thresholds};
pub use face_detection::{FaceDetector, RustfaceDetector};
pub use features::ImageFeatureExtractor;
pub use recommendations::{GenreQuery, MoodTable, MoodTerms, RecommendationEngine};
