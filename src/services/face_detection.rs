use image::GrayImage;
use rustface::{ImageData, Model};
use std::{
    fs::File,
    io::{BufReader, Read},
    sync::Arc,
};

use crate::error::{AppError, AppResult};

/// Counts frontal faces in a luma image
pub trait FaceDetector: Send + Sync {
    fn count_faces(&self, luma: &GrayImage) -> AppResult<usize>;

    /// Detector name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Multi-scale sliding-window detector backed by the SeetaFace frontal cascade
#[derive(Clone)]
pub struct RustfaceDetector {
    /// Parsed once; each call clones it into a fresh detector
    model: Arc<Model>,
    min_face_size: u32,
    /// Image pyramid step; 1/1.1 matches a 1.1 scale factor
    pyramid_scale: f32,
    score_threshold: f64,
    window_step: u32,
}

impl RustfaceDetector {
    /// Loads the model file at `model_path`
    pub fn new(model_path: &str) -> AppResult<Self> {
        let file = File::open(model_path).map_err(|e| {
            AppError::Internal(format!("Failed to open face model {}: {}", model_path, e))
        })?;
        let detector = Self::from_reader(BufReader::new(file))?;

        tracing::info!(model = %model_path, "Face detection model loaded");
        Ok(detector)
    }

    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let model = rustface::read_model(reader)
            .map_err(|e| AppError::Internal(format!("Failed to parse face model: {}", e)))?;

        Ok(Self {
            model: Arc::new(model),
            min_face_size: 20,
            pyramid_scale: 1.0 / 1.1,
            score_threshold: 2.0,
            window_step: 4,
        })
    }

    // rustface detectors are stateful (`&mut self` on detect) and not Send,
    // so each call builds its own from the shared model
    fn detector(&self) -> Box<dyn rustface::Detector> {
        let mut detector = rustface::create_detector_with_model(Model::clone(&self.model));
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(self.score_threshold);
        detector.set_pyramid_scale_factor(self.pyramid_scale);
        detector.set_slide_window_step(self.window_step, self.window_step);
        detector
    }
}

impl FaceDetector for RustfaceDetector {
    fn count_faces(&self, luma: &GrayImage) -> AppResult<usize> {
        let mut detector = self.detector();
        let (width, height) = luma.dimensions();
        let image = ImageData::new(luma.as_raw(), width, height);
        let faces = detector.detect(&image);

        tracing::debug!(faces = faces.len(), width, height, "Face detection completed");
        Ok(faces.len())
    }

    fn name(&self) -> &'static str {
        "rustface"
    }
}
