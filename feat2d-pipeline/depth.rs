//! Depth-aware spatial filtering.
//!
//! Keypoints whose backprojected range is unknown or beyond the usable
//! sensor range carry no reliable geometry and are dropped before matching.

use nalgebra::Point3;
use rayon::prelude::*;

use feat2d_core::{DepthMap, Descriptors, Keypoint, PinholeIntrinsics};

/// Maps a pixel coordinate to a 3-D point under a pinhole projection model.
///
/// Implemented by the registration utility of the wider system. The returned
/// point may be non-finite where the sensor had no reading.
pub trait DepthLookup: Sync {
    fn get_depth(
        &self,
        depth: &DepthMap,
        x: f32,
        y: f32,
        intrinsics: &PinholeIntrinsics,
        smoothing: bool,
    ) -> Point3<f32>;
}

/// Drop keypoints whose backprojected range is non-finite or too far.
pub fn filter_keypoints_by_depth<L: DepthLookup + ?Sized>(
    lookup: &L,
    keypoints: &mut Vec<Keypoint>,
    depth: &DepthMap,
    intrinsics: &PinholeIntrinsics,
    max_depth: f32,
) {
    let mut descriptors = Descriptors::empty();
    filter_keypoints_by_depth_with_descriptors(
        lookup,
        keypoints,
        &mut descriptors,
        depth,
        intrinsics,
        max_depth,
    );
}

/// Same as [`filter_keypoints_by_depth`], also dropping descriptor rows at
/// the matching indices.
///
/// Survivor order is preserved (this is a filter, not a sort). When nothing
/// survives, the descriptors collapse to the explicitly empty container.
///
/// A pass-through when the depth map is empty, either focal length or
/// `max_depth` is non-positive, or supplied descriptor rows do not match the
/// keypoint count.
pub fn filter_keypoints_by_depth_with_descriptors<L: DepthLookup + ?Sized>(
    lookup: &L,
    keypoints: &mut Vec<Keypoint>,
    descriptors: &mut Descriptors,
    depth: &DepthMap,
    intrinsics: &PinholeIntrinsics,
    max_depth: f32,
) {
    let filter_applies = !depth.is_empty()
        && intrinsics.fx > 0.0
        && intrinsics.fy > 0.0
        && max_depth > 0.0
        && (descriptors.rows() == 0 || descriptors.rows() == keypoints.len());
    if !filter_applies {
        return;
    }

    // Smoothed lookups are independent per keypoint; run them in bulk and
    // apply the verdicts in order afterwards.
    let keep: Vec<bool> = keypoints
        .par_iter()
        .map(|kp| {
            let pt = lookup.get_depth(depth, kp.x, kp.y, intrinsics, true);
            pt.z.is_finite() && pt.z < max_depth
        })
        .collect();

    let had_descriptors = descriptors.rows() != 0;
    let mut kept = Vec::with_capacity(keypoints.len());
    let mut kept_rows = Descriptors::with_cols(descriptors.cols());
    for (i, kp) in keypoints.iter().enumerate() {
        if keep[i] {
            kept.push(*kp);
            if had_descriptors {
                kept_rows.push_row(descriptors.row(i));
            }
        }
    }

    *keypoints = kept;
    if had_descriptors {
        *descriptors = if keypoints.is_empty() {
            Descriptors::empty()
        } else {
            kept_rows
        };
    }
}
