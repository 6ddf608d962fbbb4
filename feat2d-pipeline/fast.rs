//! FAST detector component.
//!
//! FAST only detects; it cannot compute descriptors, so it is not a full
//! backend on its own. [`FastBrief`](crate::fast_brief::FastBrief) and
//! [`FastFreak`](crate::fast_freak::FastFreak) pair it with a descriptor
//! engine.

use std::sync::Arc;

use feat2d_core::{Image, Keypoint, ParamMap, Rect};

use crate::config::FastConfig;
use crate::engine::{DetectorEngine, Engine, EngineRegistry, select_engine};
use crate::extractor::assert_mono8;

pub struct Fast {
    config: FastConfig,
    engine: Engine<dyn DetectorEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl Fast {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let config = FastConfig::from_params(params);
        let engine = Self::build_engine(&config, &registry);
        Self {
            config,
            engine,
            registry,
        }
    }

    pub fn config(&self) -> &FastConfig {
        &self.config
    }

    /// Whether the detector currently runs on the accelerated engine.
    pub fn is_accelerated(&self) -> bool {
        self.engine.is_accelerated()
    }

    pub fn configure(&mut self, params: &ParamMap) {
        self.config = FastConfig::from_params(params);
        self.engine = Self::build_engine(&self.config, &self.registry);
    }

    pub fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        assert_mono8(image);
        self.engine.get().detect(image, roi)
    }

    fn build_engine(
        config: &FastConfig,
        registry: &Arc<dyn EngineRegistry>,
    ) -> Engine<dyn DetectorEngine> {
        select_engine(
            "FAST",
            config.gpu,
            registry.device_count(),
            || registry.fast_accelerated(config),
            || registry.fast(config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockRegistry;
    use feat2d_core::{ParamValue, params::keys};

    #[test]
    fn threshold_override_applies() {
        let mut map = ParamMap::new();
        map.insert(keys::FAST_THRESHOLD.to_string(), ParamValue::Int(9));
        let fast = Fast::new(&map, Arc::new(MockRegistry::cpu_only()));
        assert_eq!(fast.config().threshold, 9);
        assert!(fast.config().nonmax_suppression);
    }

    #[test]
    fn accelerated_request_without_device_falls_back() {
        let mut map = ParamMap::new();
        map.insert(keys::FAST_GPU.to_string(), ParamValue::Bool(true));
        let fast = Fast::new(&map, Arc::new(MockRegistry::new(0, true)));
        assert!(!fast.is_accelerated());

        let fast = Fast::new(&map, Arc::new(MockRegistry::new(1, true)));
        assert!(fast.is_accelerated());
    }
}
