//! Tunable parameter blocks, one per backend family.
//!
//! `Default` carries the compiled-in values; `from_params` re-derives a block
//! from a parameter map, so absent keys land back on the defaults rather than
//! on whatever the previous configuration held.

use feat2d_core::params::{self, ParamMap, keys};

/// SURF tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfConfig {
    pub hessian_threshold: f64,
    pub octaves: i32,
    pub octave_layers: i32,
    pub extended: bool,
    pub upright: bool,
    /// Keypoint buffer sizing ratio for the accelerated engine.
    pub gpu_keypoints_ratio: f32,
    /// Request the accelerated engine when a device is present.
    pub gpu_version: bool,
}

impl Default for SurfConfig {
    fn default() -> Self {
        Self {
            hessian_threshold: 600.0,
            octaves: 4,
            octave_layers: 2,
            extended: false,
            upright: false,
            gpu_keypoints_ratio: 0.01,
            gpu_version: false,
        }
    }
}

impl SurfConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, keys::SURF_EXTENDED, &mut cfg.extended);
        params::parse(map, keys::SURF_HESSIAN_THRESHOLD, &mut cfg.hessian_threshold);
        params::parse(map, keys::SURF_OCTAVE_LAYERS, &mut cfg.octave_layers);
        params::parse(map, keys::SURF_OCTAVES, &mut cfg.octaves);
        params::parse(map, keys::SURF_UPRIGHT, &mut cfg.upright);
        params::parse(map, keys::SURF_GPU_KEYPOINTS_RATIO, &mut cfg.gpu_keypoints_ratio);
        params::parse(map, keys::SURF_GPU_VERSION, &mut cfg.gpu_version);
        cfg
    }
}

/// SIFT tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct SiftConfig {
    /// 0 keeps every feature the engine finds.
    pub n_features: i32,
    pub n_octave_layers: i32,
    pub contrast_threshold: f64,
    pub edge_threshold: f64,
    pub sigma: f64,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            n_features: 0,
            n_octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
        }
    }
}

impl SiftConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, keys::SIFT_CONTRAST_THRESHOLD, &mut cfg.contrast_threshold);
        params::parse(map, keys::SIFT_EDGE_THRESHOLD, &mut cfg.edge_threshold);
        params::parse(map, keys::SIFT_N_FEATURES, &mut cfg.n_features);
        params::parse(map, keys::SIFT_N_OCTAVE_LAYERS, &mut cfg.n_octave_layers);
        params::parse(map, keys::SIFT_SIGMA, &mut cfg.sigma);
        cfg
    }
}

/// ORB tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbConfig {
    pub n_features: i32,
    pub scale_factor: f32,
    pub n_levels: i32,
    pub edge_threshold: i32,
    pub first_level: i32,
    pub wta_k: i32,
    /// 0 = Harris score, 1 = FAST score.
    pub score_type: i32,
    pub patch_size: i32,
    /// Request the accelerated engine when a device is present.
    pub gpu: bool,
    /// Corner threshold forwarded to the accelerated engine's FAST stage.
    pub fast_threshold: i32,
    /// Non-maximum suppression flag for the accelerated engine's FAST stage.
    pub fast_nonmax_suppression: bool,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            score_type: 0,
            patch_size: 31,
            gpu: false,
            fast_threshold: 30,
            fast_nonmax_suppression: true,
        }
    }
}

impl OrbConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, keys::ORB_N_FEATURES, &mut cfg.n_features);
        params::parse(map, keys::ORB_SCALE_FACTOR, &mut cfg.scale_factor);
        params::parse(map, keys::ORB_N_LEVELS, &mut cfg.n_levels);
        params::parse(map, keys::ORB_EDGE_THRESHOLD, &mut cfg.edge_threshold);
        params::parse(map, keys::ORB_FIRST_LEVEL, &mut cfg.first_level);
        params::parse(map, keys::ORB_WTA_K, &mut cfg.wta_k);
        params::parse(map, keys::ORB_SCORE_TYPE, &mut cfg.score_type);
        params::parse(map, keys::ORB_PATCH_SIZE, &mut cfg.patch_size);
        params::parse(map, keys::ORB_GPU, &mut cfg.gpu);
        params::parse(map, keys::FAST_THRESHOLD, &mut cfg.fast_threshold);
        params::parse(map, keys::FAST_NONMAX_SUPPRESSION, &mut cfg.fast_nonmax_suppression);
        cfg
    }
}

/// FAST tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct FastConfig {
    pub threshold: i32,
    pub nonmax_suppression: bool,
    /// Request the accelerated engine when a device is present.
    pub gpu: bool,
    /// Keypoint buffer sizing ratio for the accelerated engine.
    pub gpu_keypoints_ratio: f64,
}

impl Default for FastConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            nonmax_suppression: true,
            gpu: false,
            gpu_keypoints_ratio: 0.05,
        }
    }
}

impl FastConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, keys::FAST_THRESHOLD, &mut cfg.threshold);
        params::parse(map, keys::FAST_NONMAX_SUPPRESSION, &mut cfg.nonmax_suppression);
        params::parse(map, keys::FAST_GPU, &mut cfg.gpu);
        params::parse(map, keys::FAST_GPU_KEYPOINTS_RATIO, &mut cfg.gpu_keypoints_ratio);
        cfg
    }
}

/// BRIEF tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefConfig {
    /// Descriptor length in bytes: 16, 32 or 64.
    pub bytes: u32,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self { bytes: 32 }
    }
}

impl BriefConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, keys::BRIEF_BYTES, &mut cfg.bytes);
        cfg
    }
}

/// FREAK tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct FreakConfig {
    pub orientation_normalized: bool,
    pub scale_normalized: bool,
    pub pattern_scale: f32,
    pub n_octaves: i32,
}

impl Default for FreakConfig {
    fn default() -> Self {
        Self {
            orientation_normalized: true,
            scale_normalized: true,
            pattern_scale: 22.0,
            n_octaves: 4,
        }
    }
}

impl FreakConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(
            map,
            keys::FREAK_ORIENTATION_NORMALIZED,
            &mut cfg.orientation_normalized,
        );
        params::parse(map, keys::FREAK_SCALE_NORMALIZED, &mut cfg.scale_normalized);
        params::parse(map, keys::FREAK_PATTERN_SCALE, &mut cfg.pattern_scale);
        params::parse(map, keys::FREAK_N_OCTAVES, &mut cfg.n_octaves);
        cfg
    }
}
