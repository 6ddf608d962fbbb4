//! ORB backend: intrinsic detector + descriptor.

use std::sync::Arc;

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::config::OrbConfig;
use crate::engine::{Engine, EngineRegistry, FeatureEngine, select_engine};
use crate::extractor::{FeatureBackend, assert_mono8};

pub struct Orb {
    config: OrbConfig,
    engine: Engine<dyn FeatureEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl Orb {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let config = OrbConfig::from_params(params);
        let engine = Self::build_engine(&config, &registry);
        Self {
            config,
            engine,
            registry,
        }
    }

    pub fn config(&self) -> &OrbConfig {
        &self.config
    }

    /// Whether the backend currently runs on the accelerated engine.
    pub fn is_accelerated(&self) -> bool {
        self.engine.is_accelerated()
    }

    fn build_engine(
        config: &OrbConfig,
        registry: &Arc<dyn EngineRegistry>,
    ) -> Engine<dyn FeatureEngine> {
        select_engine(
            "ORB",
            config.gpu,
            registry.device_count(),
            || registry.orb_accelerated(config),
            || registry.orb(config),
        )
    }
}

impl FeatureBackend for Orb {
    fn name(&self) -> &'static str {
        "ORB"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.config = OrbConfig::from_params(params);
        self.engine = Self::build_engine(&self.config, &self.registry);
    }

    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        assert_mono8(image);
        self.engine.get().detect(image, roi)
    }

    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors {
        assert_mono8(image);
        self.engine.get().compute(image, keypoints)
    }
}
