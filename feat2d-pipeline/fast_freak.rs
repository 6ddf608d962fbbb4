//! FAST detection paired with FREAK descriptors.

use std::sync::Arc;

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::config::FreakConfig;
use crate::engine::{DescriptorEngine, EngineRegistry};
use crate::extractor::{FeatureBackend, assert_mono8};
use crate::fast::Fast;

pub struct FastFreak {
    detector: Fast,
    config: FreakConfig,
    extractor: Box<dyn DescriptorEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl FastFreak {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let detector = Fast::new(params, registry.clone());
        let config = FreakConfig::from_params(params);
        let extractor = registry.freak(&config);
        Self {
            detector,
            config,
            extractor,
            registry,
        }
    }

    pub fn config(&self) -> &FreakConfig {
        &self.config
    }

    pub fn detector(&self) -> &Fast {
        &self.detector
    }
}

impl FeatureBackend for FastFreak {
    fn name(&self) -> &'static str {
        "FAST+FREAK"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.detector.configure(params);
        self.config = FreakConfig::from_params(params);
        self.extractor = self.registry.freak(&self.config);
    }

    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        self.detector.detect(image, roi)
    }

    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors {
        assert_mono8(image);
        self.extractor.compute(image, keypoints)
    }
}
