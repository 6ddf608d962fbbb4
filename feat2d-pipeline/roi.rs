//! Region-of-interest restriction.

use log::{debug, error};

use feat2d_core::{Image, Rect};

/// Convert four edge-exclusion ratios into a pixel rectangle.
///
/// `ratios` is `[left, right, top, bottom]`, each in `[0, 1)`. A side is
/// trimmed only when its ratio is strictly positive and strictly below
/// `1 - opposite ratio`, which keeps two large opposing ratios from producing
/// an inverted rectangle. Left/top move the origin; right/bottom shrink the
/// extent measured from the moved origin.
///
/// An empty image or a ratio slice that is not exactly four entries long is
/// a malformed request: it is logged and yields the empty rectangle.
pub fn compute_roi(image: &Image, ratios: &[f32]) -> Rect {
    if image.is_empty() || ratios.len() != 4 {
        error!(
            "cannot compute ROI: image is {}x{} and {} ratio(s) were supplied (need 4)",
            image.width(),
            image.height(),
            ratios.len()
        );
        return Rect::default();
    }

    let width = image.width() as f32;
    let height = image.height() as f32;
    let mut roi = image.full_rect();
    debug!("roi ratios = {ratios:?}");

    // left
    if ratios[0] > 0.0 && ratios[0] < 1.0 - ratios[1] {
        roi.x = (width * ratios[0]) as u32;
    }

    // right
    roi.width = image.width() - roi.x;
    if ratios[1] > 0.0 && ratios[1] < 1.0 - ratios[0] {
        roi.width -= (width * ratios[1]) as u32;
    }

    // top
    if ratios[2] > 0.0 && ratios[2] < 1.0 - ratios[3] {
        roi.y = (height * ratios[2]) as u32;
    }

    // bottom
    roi.height = image.height() - roi.y;
    if ratios[3] > 0.0 && ratios[3] < 1.0 - ratios[2] {
        roi.height -= (height * ratios[3]) as u32;
    }

    debug!("roi = {roi:?}");
    roi
}
