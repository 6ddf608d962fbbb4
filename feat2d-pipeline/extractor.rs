//! Extraction pipeline orchestration.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};

use feat2d_core::{Descriptors, Image, Keypoint, ParamMap, Rect};

use crate::engine::EngineRegistry;
use crate::fast_brief::FastBrief;
use crate::fast_freak::FastFreak;
use crate::limit::limit_keypoints;
use crate::orb::Orb;
use crate::sift::Sift;
use crate::surf::Surf;

/// Interchangeable detector/descriptor strategy.
pub trait FeatureBackend: Send {
    /// Human-readable backend name, used for logging.
    fn name(&self) -> &'static str;

    /// Re-derive every tunable from `params` and rebuild the engines.
    fn configure(&mut self, params: &ParamMap);

    /// Detect keypoints inside `roi`, positions relative to the ROI origin.
    /// The image must be non-empty mono8.
    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint>;

    /// Compute descriptor rows for `keypoints`, dropping any the engine
    /// cannot describe. The image must be non-empty mono8.
    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors;
}

pub(crate) fn assert_mono8(image: &Image) {
    assert!(
        !image.is_empty() && image.is_mono8(),
        "backend requires a non-empty mono8 image, got {}x{} with {} channel(s) at {} bits",
        image.width(),
        image.height(),
        image.channels(),
        image.bit_depth()
    );
}

/// Backend families selectable by a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Surf,
    Sift,
    Orb,
    FastFreak,
    FastBrief,
}

impl FeatureKind {
    /// Stable code used in configuration files.
    pub fn code(self) -> i32 {
        match self {
            FeatureKind::Surf => 0,
            FeatureKind::Sift => 1,
            FeatureKind::Orb => 2,
            FeatureKind::FastFreak => 3,
            FeatureKind::FastBrief => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FeatureKind::Surf),
            1 => Some(FeatureKind::Sift),
            2 => Some(FeatureKind::Orb),
            3 => Some(FeatureKind::FastFreak),
            4 => Some(FeatureKind::FastBrief),
            _ => None,
        }
    }
}

/// Build a backend of the given family.
pub fn create_backend(
    kind: FeatureKind,
    params: &ParamMap,
    registry: Arc<dyn EngineRegistry>,
) -> Box<dyn FeatureBackend> {
    match kind {
        FeatureKind::Surf => Box::new(Surf::new(params, registry)),
        FeatureKind::Sift => Box::new(Sift::new(params, registry)),
        FeatureKind::Orb => Box::new(Orb::new(params, registry)),
        FeatureKind::FastFreak => Box::new(FastFreak::new(params, registry)),
        FeatureKind::FastBrief => Box::new(FastBrief::new(params, registry)),
    }
}

/// The extraction pipeline: backend detection, ROI correction and budget
/// enforcement behind one entry point, descriptor computation behind the
/// other.
///
/// Not thread-safe: a single extractor must not be invoked concurrently.
/// Callers that share one across threads serialize access themselves.
pub struct FeatureExtractor {
    backend: Box<dyn FeatureBackend>,
}

impl FeatureExtractor {
    pub fn new(backend: Box<dyn FeatureBackend>) -> Self {
        Self { backend }
    }

    /// Pipeline over a backend of the given family.
    pub fn for_kind(
        kind: FeatureKind,
        params: &ParamMap,
        registry: Arc<dyn EngineRegistry>,
    ) -> Self {
        Self::new(create_backend(kind, params, registry))
    }

    pub fn backend(&self) -> &dyn FeatureBackend {
        self.backend.as_ref()
    }

    pub fn configure(&mut self, params: &ParamMap) {
        self.backend.configure(params);
    }

    /// Detect up to `max_keypoints` keypoints, optionally restricted to `roi`.
    ///
    /// A degenerate `roi` means the whole image. Positions are reported in
    /// full-image coordinates even when the ROI origin is offset. A missing
    /// or non-mono8 image is a recoverable caller error: it is logged and
    /// yields no keypoints so a bad frame can be skipped.
    pub fn generate_keypoints(
        &self,
        image: &Image,
        max_keypoints: i32,
        roi: &Rect,
    ) -> Vec<Keypoint> {
        if image.is_empty() {
            error!("cannot extract keypoints: image is empty");
            return Vec::new();
        }
        if !image.is_mono8() {
            error!(
                "image format must be mono8, got {} channel(s) at {} bits ({}x{})",
                image.channels(),
                image.bit_depth(),
                image.width(),
                image.height()
            );
            return Vec::new();
        }

        let started = Instant::now();
        let effective_roi = if roi.is_empty() {
            image.full_rect()
        } else {
            *roi
        };
        let mut keypoints = self.backend.detect(image, &effective_roi);
        debug!(
            "{}: extracted {} keypoint(s) in {:.2?}",
            self.backend.name(),
            keypoints.len(),
            started.elapsed()
        );

        limit_keypoints(&mut keypoints, max_keypoints);

        if effective_roi.x > 0 || effective_roi.y > 0 {
            // Report positions in full-image space.
            for kp in keypoints.iter_mut() {
                kp.x += effective_roi.x as f32;
                kp.y += effective_roi.y as f32;
            }
        }

        keypoints
    }

    /// Descriptor computation, delegated untouched to the backend.
    pub fn generate_descriptors(
        &self,
        image: &Image,
        keypoints: &mut Vec<Keypoint>,
    ) -> Descriptors {
        self.backend.describe(image, keypoints)
    }

    /// Detection followed by description in one call.
    pub fn detect_and_describe(
        &self,
        image: &Image,
        max_keypoints: i32,
        roi: &Rect,
    ) -> (Vec<Keypoint>, Descriptors) {
        let mut keypoints = self.generate_keypoints(image, max_keypoints, roi);
        let descriptors = if keypoints.is_empty() {
            Descriptors::empty()
        } else {
            self.generate_descriptors(image, &mut keypoints)
        };
        (keypoints, descriptors)
    }
}
