//! Capability contracts for the detection/description engines.
//!
//! The pipeline implements no detector or descriptor mathematics. Each
//! backend wraps one engine obtained from an [`EngineRegistry`] and, when
//! requested and available, an accelerated counterpart.

use log::warn;

use feat2d_core::{Descriptors, Image, Keypoint, Rect};

use crate::config::{BriefConfig, FastConfig, FreakConfig, OrbConfig, SiftConfig, SurfConfig};

/// Detects keypoints inside a sub-rectangle of an image.
///
/// Returned positions are relative to the rectangle's origin.
pub trait DetectorEngine: Send {
    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint>;
}

/// Computes fixed-width descriptor rows for a keypoint sequence.
///
/// An engine may drop keypoints it cannot describe (for example too close to
/// the image border); the sequence is mutated so rows stay aligned with it.
pub trait DescriptorEngine: Send {
    fn compute(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors;
}

/// An engine that both detects and describes.
pub trait FeatureEngine: DetectorEngine + DescriptorEngine {}

impl<T: DetectorEngine + DescriptorEngine> FeatureEngine for T {}

/// Which engine variant a backend currently runs on.
///
/// Reconfiguration builds a fresh value and replaces the old one wholesale;
/// an engine is never mutated in place.
pub enum Engine<T: ?Sized> {
    Standard(Box<T>),
    Accelerated(Box<T>),
}

impl<T: ?Sized> Engine<T> {
    pub fn is_accelerated(&self) -> bool {
        matches!(self, Engine::Accelerated(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Engine::Standard(e) | Engine::Accelerated(e) => e,
        }
    }
}

/// Probe for compatible accelerator devices.
///
/// Consulted once per backend reconfiguration; the answer is never cached
/// beyond it.
pub trait AcceleratorProbe {
    fn device_count(&self) -> usize;
}

/// Supplies engine instances for every backend family.
///
/// The accelerated constructors return `None` when the registry carries no
/// accelerated implementation of that family; backends then fall back to the
/// standard engine with a warning.
pub trait EngineRegistry: AcceleratorProbe + Send + Sync {
    fn surf(&self, config: &SurfConfig) -> Box<dyn FeatureEngine>;
    fn surf_accelerated(&self, _config: &SurfConfig) -> Option<Box<dyn FeatureEngine>> {
        None
    }

    fn sift(&self, config: &SiftConfig) -> Box<dyn FeatureEngine>;

    fn orb(&self, config: &OrbConfig) -> Box<dyn FeatureEngine>;
    fn orb_accelerated(&self, _config: &OrbConfig) -> Option<Box<dyn FeatureEngine>> {
        None
    }

    fn fast(&self, config: &FastConfig) -> Box<dyn DetectorEngine>;
    fn fast_accelerated(&self, _config: &FastConfig) -> Option<Box<dyn DetectorEngine>> {
        None
    }

    fn brief(&self, config: &BriefConfig) -> Box<dyn DescriptorEngine>;
    fn freak(&self, config: &FreakConfig) -> Box<dyn DescriptorEngine>;
}

/// Pick the engine variant for one backend family.
///
/// The accelerated engine is used only when the configuration asks for it
/// AND the probe reported a device AND the registry yields one; every other
/// requested-but-unavailable combination warns and falls back.
pub(crate) fn select_engine<T: ?Sized>(
    family: &str,
    requested: bool,
    devices: usize,
    accelerated: impl FnOnce() -> Option<Box<T>>,
    standard: impl FnOnce() -> Box<T>,
) -> Engine<T> {
    if requested && devices > 0 {
        if let Some(engine) = accelerated() {
            return Engine::Accelerated(engine);
        }
    }
    if requested {
        warn!("accelerated {family} engine not available, using the standard engine instead");
    }
    Engine::Standard(standard())
}
