//! SURF backend: intrinsic detector + descriptor.

use std::sync::Arc;

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::config::SurfConfig;
use crate::engine::{Engine, EngineRegistry, FeatureEngine, select_engine};
use crate::extractor::{FeatureBackend, assert_mono8};

pub struct Surf {
    config: SurfConfig,
    engine: Engine<dyn FeatureEngine>,
    registry: Arc<dyn EngineRegistry>,
}

impl Surf {
    pub fn new(params: &ParamMap, registry: Arc<dyn EngineRegistry>) -> Self {
        let config = SurfConfig::from_params(params);
        let engine = Self::build_engine(&config, &registry);
        Self {
            config,
            engine,
            registry,
        }
    }

    pub fn config(&self) -> &SurfConfig {
        &self.config
    }

    /// Whether the backend currently runs on the accelerated engine.
    pub fn is_accelerated(&self) -> bool {
        self.engine.is_accelerated()
    }

    fn build_engine(
        config: &SurfConfig,
        registry: &Arc<dyn EngineRegistry>,
    ) -> Engine<dyn FeatureEngine> {
        select_engine(
            "SURF",
            config.gpu_version,
            registry.device_count(),
            || registry.surf_accelerated(config),
            || registry.surf(config),
        )
    }
}

impl FeatureBackend for Surf {
    fn name(&self) -> &'static str {
        "SURF"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.config = SurfConfig::from_params(params);
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

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::engine::mock::MockRegistry;
    use feat2d_core::{ParamValue, params::keys};

    fn gpu_params() -> ParamMap {
        let mut map = ParamMap::new();
        map.insert(keys::SURF_GPU_VERSION.to_string(), ParamValue::Bool(true));
        map
    }

    #[test]
    fn defaults_to_standard_engine() {
        let registry = Arc::new(MockRegistry::cpu_only());
        let surf = Surf::new(&ParamMap::new(), registry);
        assert!(!surf.is_accelerated());
    }

    #[test]
    fn accelerated_when_requested_and_device_present() {
        let registry = Arc::new(MockRegistry::new(1, true));
        let surf = Surf::new(&gpu_params(), registry);
        assert!(surf.is_accelerated());
    }

    #[test]
    fn falls_back_without_devices() {
        let registry = Arc::new(MockRegistry::new(0, true));
        let surf = Surf::new(&gpu_params(), registry);
        assert!(!surf.is_accelerated());
    }

    #[test]
    fn reconfiguration_rebuilds_the_engine() {
        let registry = Arc::new(MockRegistry::new(1, true));
        let mut surf = Surf::new(&ParamMap::new(), registry.clone());
        assert_eq!(registry.standard_builds.load(Ordering::Relaxed), 1);
        assert!(!surf.is_accelerated());

        surf.configure(&gpu_params());
        assert!(surf.is_accelerated());
        assert_eq!(registry.accelerated_builds.load(Ordering::Relaxed), 1);

        surf.configure(&ParamMap::new());
        assert!(!surf.is_accelerated());
        assert_eq!(registry.standard_builds.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn reconfiguration_rederives_tunables_from_defaults() {
        let registry = Arc::new(MockRegistry::cpu_only());
        let mut map = ParamMap::new();
        map.insert(
            keys::SURF_HESSIAN_THRESHOLD.to_string(),
            ParamValue::Float(150.0),
        );
        let mut surf = Surf::new(&map, registry);
        assert_eq!(surf.config().hessian_threshold, 150.0);

        surf.configure(&ParamMap::new());
        assert_eq!(surf.config().hessian_threshold, 600.0);
    }

    #[test]
    #[should_panic(expected = "mono8")]
    fn detect_rejects_multichannel_input() {
        let registry = Arc::new(MockRegistry::cpu_only());
        let surf = Surf::new(&ParamMap::new(), registry);
        let rgb = Image::new(4, 4, 3, 8, vec![0; 48]);
        surf.detect(&rgb, &rgb.full_rect());
    }
}
