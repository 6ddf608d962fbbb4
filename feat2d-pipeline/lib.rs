//! Policy layer of the visual feature extraction pipeline.
//!
//! Detection and description mathematics live in external engines behind the
//! [`engine`] capability contracts; this crate decides *where* detection runs
//! (ROI restriction), *how many* keypoints survive (budget enforcement),
//! *which* keypoints are geometrically usable (depth filtering) and *which*
//! backend strategy is active.

pub mod config;
pub mod depth;
pub mod engine;
pub mod extractor;
pub mod fast;
pub mod fast_brief;
pub mod fast_freak;
pub mod limit;
pub mod orb;
pub mod roi;
pub mod sift;
pub mod surf;

pub use config::{BriefConfig, FastConfig, FreakConfig, OrbConfig, SiftConfig, SurfConfig};
pub use depth::{DepthLookup, filter_keypoints_by_depth, filter_keypoints_by_depth_with_descriptors};
pub use engine::{
    AcceleratorProbe, DescriptorEngine, DetectorEngine, Engine, EngineRegistry, FeatureEngine,
};
pub use extractor::{FeatureBackend, FeatureExtractor, FeatureKind, create_backend};
pub use fast::Fast;
pub use fast_brief::FastBrief;
pub use fast_freak::FastFreak;
pub use limit::{limit_keypoints, limit_keypoints_with_descriptors};
pub use orb::Orb;
pub use roi::compute_roi;
pub use sift::Sift;
pub use surf::Surf;
