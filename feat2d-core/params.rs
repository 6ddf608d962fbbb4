//! Named parameter registry.
//!
//! Backends re-derive every tunable from a [`ParamMap`] on each
//! reconfiguration: keys that are present overwrite the compiled-in default,
//! absent keys leave it untouched. Key strings are stable identifiers shared
//! with the configuration files of the wider mapping system.

use std::collections::HashMap;

use log::warn;

/// A typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Named mapping of parameter keys to typed values.
pub type ParamMap = HashMap<String, ParamValue>;

/// Types a parameter value can be read into.
pub trait FromParam: Sized {
    fn from_param(value: ParamValue) -> Option<Self>;
}

impl FromParam for bool {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromParam for i32 {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromParam for u32 {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => u32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromParam for usize {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => usize::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromParam for f32 {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(f) => Some(f as f32),
            ParamValue::Int(i) => Some(i as f32),
            _ => None,
        }
    }
}

impl FromParam for f64 {
    fn from_param(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(f) => Some(f),
            ParamValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }
}

/// Overwrite `out` with the value stored under `key`, when present.
///
/// Absent keys leave `out` at its current (compiled-in) value. A present key
/// of an incompatible type also leaves it and logs a warning.
pub fn parse<T: FromParam>(map: &ParamMap, key: &str, out: &mut T) {
    if let Some(&value) = map.get(key) {
        match T::from_param(value) {
            Some(v) => *out = v,
            None => warn!("parameter {key} has incompatible value {value:?}, keeping default"),
        }
    }
}

/// Stable key strings for every tunable the backends understand.
pub mod keys {
    pub const FEATURE_TYPE: &str = "Feature/Type";

    pub const SURF_EXTENDED: &str = "SURF/Extended";
    pub const SURF_HESSIAN_THRESHOLD: &str = "SURF/HessianThreshold";
    pub const SURF_OCTAVE_LAYERS: &str = "SURF/OctaveLayers";
    pub const SURF_OCTAVES: &str = "SURF/Octaves";
    pub const SURF_UPRIGHT: &str = "SURF/Upright";
    pub const SURF_GPU_KEYPOINTS_RATIO: &str = "SURF/GpuKeypointsRatio";
    pub const SURF_GPU_VERSION: &str = "SURF/GpuVersion";

    pub const SIFT_CONTRAST_THRESHOLD: &str = "SIFT/ContrastThreshold";
    pub const SIFT_EDGE_THRESHOLD: &str = "SIFT/EdgeThreshold";
    pub const SIFT_N_FEATURES: &str = "SIFT/NFeatures";
    pub const SIFT_N_OCTAVE_LAYERS: &str = "SIFT/NOctaveLayers";
    pub const SIFT_SIGMA: &str = "SIFT/Sigma";

    pub const ORB_N_FEATURES: &str = "ORB/NFeatures";
    pub const ORB_SCALE_FACTOR: &str = "ORB/ScaleFactor";
    pub const ORB_N_LEVELS: &str = "ORB/NLevels";
    pub const ORB_EDGE_THRESHOLD: &str = "ORB/EdgeThreshold";
    pub const ORB_FIRST_LEVEL: &str = "ORB/FirstLevel";
    pub const ORB_WTA_K: &str = "ORB/WTA_K";
    pub const ORB_SCORE_TYPE: &str = "ORB/ScoreType";
    pub const ORB_PATCH_SIZE: &str = "ORB/PatchSize";
    pub const ORB_GPU: &str = "ORB/Gpu";

    pub const FAST_THRESHOLD: &str = "FAST/Threshold";
    pub const FAST_NONMAX_SUPPRESSION: &str = "FAST/NonmaxSuppression";
    pub const FAST_GPU: &str = "FAST/Gpu";
    pub const FAST_GPU_KEYPOINTS_RATIO: &str = "FAST/GpuKeypointsRatio";

    pub const BRIEF_BYTES: &str = "BRIEF/Bytes";

    pub const FREAK_ORIENTATION_NORMALIZED: &str = "FREAK/OrientationNormalized";
    pub const FREAK_SCALE_NORMALIZED: &str = "FREAK/ScaleNormalized";
    pub const FREAK_PATTERN_SCALE: &str = "FREAK/PatternScale";
    pub const FREAK_N_OCTAVES: &str = "FREAK/NOctaves";
}

/// Save a parameter map as pretty TOML.
#[cfg(feature = "serde")]
pub fn save_toml<P: AsRef<std::path::Path>>(
    map: &ParamMap,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let toml = toml::to_string_pretty(map)?;
    std::fs::write(path, toml)?;
    Ok(())
}

/// Load a parameter map from a TOML file.
#[cfg(feature = "serde")]
pub fn load_toml<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<ParamMap, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Save a parameter map as pretty JSON.
#[cfg(feature = "serde")]
pub fn save_json<P: AsRef<std::path::Path>>(
    map: &ParamMap,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(map)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a parameter map from a JSON file.
#[cfg(feature = "serde")]
pub fn load_json<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<ParamMap, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_keeps_default() {
        let map = ParamMap::new();
        let mut threshold = 30i32;
        parse(&map, keys::FAST_THRESHOLD, &mut threshold);
        assert_eq!(threshold, 30);
    }

    #[test]
    fn present_key_overwrites() {
        let mut map = ParamMap::new();
        map.insert(keys::FAST_THRESHOLD.to_string(), ParamValue::Int(12));
        let mut threshold = 30i32;
        parse(&map, keys::FAST_THRESHOLD, &mut threshold);
        assert_eq!(threshold, 12);
    }

    #[test]
    fn type_mismatch_keeps_default() {
        let mut map = ParamMap::new();
        map.insert(keys::FAST_THRESHOLD.to_string(), ParamValue::Bool(true));
        let mut threshold = 30i32;
        parse(&map, keys::FAST_THRESHOLD, &mut threshold);
        assert_eq!(threshold, 30);
    }

    #[test]
    fn floats_accept_integer_values() {
        let mut map = ParamMap::new();
        map.insert(
            keys::SURF_HESSIAN_THRESHOLD.to_string(),
            ParamValue::Int(450),
        );
        let mut hessian = 600.0f64;
        parse(&map, keys::SURF_HESSIAN_THRESHOLD, &mut hessian);
        assert_eq!(hessian, 450.0);
    }

    #[test]
    fn out_of_range_int_keeps_default() {
        let mut map = ParamMap::new();
        map.insert(keys::BRIEF_BYTES.to_string(), ParamValue::Int(-1));
        let mut bytes = 32u32;
        parse(&map, keys::BRIEF_BYTES, &mut bytes);
        assert_eq!(bytes, 32);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_round_trip() {
        let mut map = ParamMap::new();
        map.insert(keys::SURF_GPU_VERSION.to_string(), ParamValue::Bool(true));
        map.insert(keys::ORB_N_FEATURES.to_string(), ParamValue::Int(750));
        map.insert(keys::ORB_SCALE_FACTOR.to_string(), ParamValue::Float(1.5));

        let dir = std::env::temp_dir().join("feat2d_params_roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("params.toml");
        save_toml(&map, &path).unwrap();
        let loaded = load_toml(&path).unwrap();
        assert_eq!(loaded, map);
    }
}
