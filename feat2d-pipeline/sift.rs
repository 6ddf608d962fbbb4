//! SIFT backend: intrinsic detector + descriptor, CPU engine only.

use std::sync::Arc;

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::config::SiftConfig;
use crate::engine::{EngineRegistry, FeatureEngine};
use crate::extractor::{FeatureBackend, assert_mono8};

pub struct Sift {
    config: SiftConfig,
    engine: Box<dyn FeatureEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl Sift {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let config = SiftConfig::from_params(params);
        let engine = registry.sift(&config);
        Self {
            config,
            engine,
            registry,
        }
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }
}

impl FeatureBackend for Sift {
    fn name(&self) -> &'static str {
        "SIFT"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.config = SiftConfig::from_params(params);
        self.engine = self.registry.sift(&self.config);
    }

    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        assert_mono8(image);
        self.engine.detect(image, roi)
    }

    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors {
        assert_mono8(image);
        self.engine.compute(image, keypoints)
    }
}
