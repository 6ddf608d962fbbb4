//! Keypoint budget enforcement.
//!
//! Unbounded detections blow up the matching stages downstream; pruning by
//! response keeps the most distinctive points.

use std::cmp::Ordering;

use log::debug;

use feat2d_core::{Descriptors, Keypoint};

/// Keep only the `max_keypoints` strongest keypoints.
///
/// A no-op when `max_keypoints <= 0` or the budget is not exceeded.
pub fn limit_keypoints(keypoints: &mut Vec<Keypoint>, max_keypoints: i32) {
    let mut descriptors = Descriptors::empty();
    limit_keypoints_with_descriptors(keypoints, &mut descriptors, max_keypoints);
}

/// Keep only the `max_keypoints` strongest keypoints and their rows.
///
/// Keypoints are ranked by the absolute value of their response, strongest
/// first; equal responses keep ascending original order so the outcome is
/// deterministic. Survivors are emitted in rank order, descriptor row `i`
/// staying aligned with keypoint `i` throughout.
///
/// Supplying descriptors whose row count differs from the keypoint count is
/// a broken upstream contract and panics.
pub fn limit_keypoints_with_descriptors(
    keypoints: &mut Vec<Keypoint>,
    descriptors: &mut Descriptors,
    max_keypoints: i32,
) {
    assert!(
        descriptors.rows() == 0 || descriptors.rows() == keypoints.len(),
        "descriptor rows ({}) do not match keypoint count ({})",
        descriptors.rows(),
        keypoints.len()
    );
    if max_keypoints <= 0 || keypoints.len() <= max_keypoints as usize {
        return;
    }

    let max = max_keypoints as usize;
    let removed = keypoints.len() - max;

    let mut order: Vec<usize> = (0..keypoints.len()).collect();
    order.sort_unstable_by(|&a, &b| {
        keypoints[b]
            .response
            .abs()
            .partial_cmp(&keypoints[a].response.abs())
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.truncate(max);

    let kept: Vec<Keypoint> = order.iter().map(|&i| keypoints[i]).collect();
    if descriptors.rows() != 0 {
        let mut kept_rows = Descriptors::with_cols(descriptors.cols());
        for &i in &order {
            kept_rows.push_row(descriptors.row(i));
        }
        *descriptors = kept_rows;
    }
    *keypoints = kept;

    debug!(
        "{} keypoint(s) over budget removed (kept {}), minimum response = {}",
        removed,
        keypoints.len(),
        keypoints.last().map(|kp| kp.response).unwrap_or(0.0)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keypoints_with_responses(responses: &[f32]) -> Vec<Keypoint> {
        responses
            .iter()
            .enumerate()
            .map(|(i, &r)| Keypoint::new(i as f32, i as f32, r))
            .collect()
    }

    #[test]
    fn strongest_three_survive() {
        let mut kps = keypoints_with_responses(&[0.1, 0.9, 0.5, 0.3, 0.7]);
        limit_keypoints(&mut kps, 3);
        let kept: Vec<f32> = kps.iter().map(|kp| kp.response).collect();
        assert_eq!(kept, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn non_positive_budget_is_a_no_op() {
        let original = keypoints_with_responses(&[0.1, 0.9, 0.5]);
        for max in [0, -1] {
            let mut kps = original.clone();
            limit_keypoints(&mut kps, max);
            assert_eq!(kps, original);
        }
    }

    #[test]
    fn budget_not_exceeded_is_a_no_op() {
        let original = keypoints_with_responses(&[0.1, 0.9, 0.5]);
        let mut kps = original.clone();
        limit_keypoints(&mut kps, 3);
        assert_eq!(kps, original);
        limit_keypoints(&mut kps, 10);
        assert_eq!(kps, original);
    }

    #[test]
    fn ranking_uses_absolute_response() {
        let mut kps = keypoints_with_responses(&[-0.8, 0.2, 0.5]);
        limit_keypoints(&mut kps, 2);
        let kept: Vec<f32> = kps.iter().map(|kp| kp.response).collect();
        assert_eq!(kept, vec![-0.8, 0.5]);
    }

    #[test]
    fn ties_keep_ascending_original_order() {
        let mut kps = keypoints_with_responses(&[0.5, 0.5, 0.5, 0.5]);
        limit_keypoints(&mut kps, 2);
        assert_eq!(kps[0].x, 0.0);
        assert_eq!(kps[1].x, 1.0);
    }

    #[test]
    fn descriptor_rows_follow_their_keypoints() {
        let mut kps = keypoints_with_responses(&[0.1, 0.9, 0.5, 0.3, 0.7]);
        let mut rows = Descriptors::with_cols(2);
        for i in 0..kps.len() {
            rows.push_row(&[i as f32, i as f32 + 10.0]);
        }
        limit_keypoints_with_descriptors(&mut kps, &mut rows, 3);
        assert_eq!(rows.rows(), 3);
        // Rows rebuilt in rank order: original indexes 1, 4, 2.
        assert_eq!(rows.row(0), &[1.0, 11.0]);
        assert_eq!(rows.row(1), &[4.0, 14.0]);
        assert_eq!(rows.row(2), &[2.0, 12.0]);
    }

    #[test]
    #[should_panic(expected = "do not match")]
    fn row_count_mismatch_panics() {
        let mut kps = keypoints_with_responses(&[0.1, 0.9]);
        let mut rows = Descriptors::with_cols(2);
        rows.push_row(&[0.0, 0.0]);
        limit_keypoints_with_descriptors(&mut kps, &mut rows, 1);
    }

    proptest! {
        #[test]
        fn output_size_is_min_of_budget_and_input(
            responses in proptest::collection::vec(-1000.0f32..1000.0, 0..200),
            max in 1i32..50,
        ) {
            let mut kps = keypoints_with_responses(&responses);
            limit_keypoints(&mut kps, max);
            prop_assert_eq!(kps.len(), responses.len().min(max as usize));
        }

        #[test]
        fn no_dropped_keypoint_outranks_a_survivor(
            responses in proptest::collection::vec(-1000.0f32..1000.0, 1..200),
            max in 1i32..50,
        ) {
            let mut kps = keypoints_with_responses(&responses);
            limit_keypoints(&mut kps, max);
            let kept: Vec<f32> = kps.iter().map(|kp| kp.response.abs()).collect();
            let weakest_kept = kept.iter().cloned().fold(f32::INFINITY, f32::min);
            let mut dropped = responses.clone();
            for kp in &kps {
                let pos = dropped.iter().position(|&r| r == kp.response).unwrap();
                dropped.remove(pos);
            }
            for r in dropped {
                prop_assert!(r.abs() <= weakest_kept);
            }
        }
    }
}
