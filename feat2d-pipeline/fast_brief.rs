//! FAST detection paired with BRIEF descriptors.
//!
//! Composition, not inheritance: the backend holds the shared [`Fast`]
//! detector and its own descriptor engine.

use std::sync::Arc;

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::config::BriefConfig;
use crate::engine::{DescriptorEngine, EngineRegistry};
use crate::extractor::{FeatureBackend, assert_mono8};
use crate::fast::Fast;

pub struct FastBrief {
    detector: Fast,
    config: BriefConfig,
    extractor: Box<dyn DescriptorEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl FastBrief {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let detector = Fast::new(params, registry.clone());
        let config = BriefConfig::from_params(params);
        let extractor = registry.brief(&config);
        Self {
            detector,
            config,
            extractor,
            registry,
        }
    }

    pub fn config(&self) -> &BriefConfig {
        &self.config
    }

    pub fn detector(&self) -> &Fast {
        &self.detector
    }
}

impl FeatureBackend for FastBrief {
    fn name(&self) -> &'static str {
        "FAST+BRIEF"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.detector.configure(params);
        self.config = BriefConfig::from_params(params);
        self.extractor = self.registry.brief(&self.config);
    }

    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        self.detector.detect(image, roi)
    }

    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors {
        assert_mono8(image);
        self.extractor.compute(image, keypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockRegistry;
    use feat2d_core::{ParamValue, params::keys};

    #[test]
    fn configure_reaches_both_halves() {
        let registry = Arc::new(MockRegistry::cpu_only());
        let mut backend = FastBrief::new(&ParamMap::new(), registry);
        assert_eq!(backend.config().bytes, 32);
        assert_eq!(backend.detector().config().threshold, 30);

        let mut map = ParamMap::new();
        map.insert(keys::BRIEF_BYTES.to_string(), ParamValue::Int(64));
        map.insert(keys::FAST_THRESHOLD.to_string(), ParamValue::Int(11));
        backend.configure(&map);
        assert_eq!(backend.config().bytes, 64);
        assert_eq!(backend.detector().config().threshold, 11);
    }

    #[test]
    fn describe_keeps_rows_aligned() {
        let registry = Arc::new(MockRegistry::cpu_only());
        let backend = FastBrief::new(&ParamMap::new(), registry);
        let image = Image::gray8(8, 8, vec![0; 64]);
        let mut kps = vec![Keypoint::new(1.0, 1.0, 0.5), Keypoint::new(2.0, 2.0, 0.7)];
        let rows = backend.describe(&image, &mut kps);
        assert_eq!(rows.rows(), kps.len());
    }
}
