//! Local-contrast reference backend.
//!
//! Scores each pixel by the mean absolute difference to its 8-neighborhood
//! and describes keypoints with a mean-normalized intensity patch. It exists
//! so the binary and the examples can exercise the whole pipeline without an
//! external engine; it is not a stand-in for a production detector.

use rayon::prelude::*;

use feat2d_core::params::{self, ParamMap};
use feat2d_core::{Descriptors, Image, Keypoint, Rect};
use feat2d_pipeline::FeatureBackend;

pub const CONTRAST_THRESHOLD: &str = "Contrast/Threshold";
pub const CONTRAST_PATCH_SIZE: &str = "Contrast/PatchSize";

const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Tunables of the reference backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastConfig {
    /// Minimum mean absolute neighbor difference for a keypoint.
    pub threshold: f32,
    /// Side length of the square descriptor patch (odd).
    pub patch_size: usize,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            patch_size: 9,
        }
    }
}

impl ContrastConfig {
    pub fn from_params(map: &ParamMap) -> Self {
        let mut cfg = Self::default();
        params::parse(map, CONTRAST_THRESHOLD, &mut cfg.threshold);
        params::parse(map, CONTRAST_PATCH_SIZE, &mut cfg.patch_size);
        cfg
    }

    /// Effective patch side: odd, at least 3.
    fn effective_patch(&self) -> usize {
        self.patch_size.max(3) | 1
    }
}

pub struct ContrastBackend {
    config: ContrastConfig,
}

impl ContrastBackend {
    pub fn new(params: &ParamMap) -> Self {
        Self {
            config: ContrastConfig::from_params(params),
        }
    }

    pub fn config(&self) -> &ContrastConfig {
        &self.config
    }
}

fn assert_mono8(image: &Image) {
    assert!(
        !image.is_empty() && image.is_mono8(),
        "backend requires a non-empty mono8 image, got {}x{} with {} channel(s) at {} bits",
        image.width(),
        image.height(),
        image.channels(),
        image.bit_depth()
    );
}

impl FeatureBackend for ContrastBackend {
    fn name(&self) -> &'static str {
        "Contrast"
    }

    fn configure(&mut self, params: &ParamMap) {
        self.config = ContrastConfig::from_params(params);
    }

    fn detect(&self, image: &Image, roi: &Rect) -> Vec<Keypoint> {
        assert_mono8(image);

        let data = image.data();
        let width = image.width() as usize;
        let height = image.height() as usize;
        let x0 = roi.x as usize;
        let y0 = roi.y as usize;
        let x1 = ((roi.x + roi.width) as usize).min(width);
        let y1 = ((roi.y + roi.height) as usize).min(height);
        let threshold = self.config.threshold;

        // Skip a one pixel border so the 8-neighborhood always exists.
        let xs = x0.max(1)..x1.min(width.saturating_sub(1));
        let ys = y0.max(1)..y1.min(height.saturating_sub(1));
        if xs.is_empty() || ys.is_empty() {
            return Vec::new();
        }

        let keypoints: Vec<Keypoint> = ys
            .into_par_iter()
            .flat_map_iter(|y| {
                let xs = xs.clone();
                let mut hits = Vec::new();
                for x in xs {
                    let p = data[y * width + x] as f32;
                    let mut diff = 0.0f32;
                    for &(dx, dy) in &NEIGHBORS {
                        let nx = (x as i32 + dx) as usize;
                        let ny = (y as i32 + dy) as usize;
                        diff += (data[ny * width + nx] as f32 - p).abs();
                    }
                    let response = diff / NEIGHBORS.len() as f32;
                    if response > threshold {
                        // Positions relative to the ROI origin, like any engine.
                        hits.push(Keypoint::new((x - x0) as f32, (y - y0) as f32, response));
                    }
                }
                hits
            })
            .collect();
        log::debug!(
            "contrast response above {threshold} at {} pixel(s)",
            keypoints.len()
        );
        keypoints
    }

    fn describe(&self, image: &Image, keypoints: &mut Vec<Keypoint>) -> Descriptors {
        assert_mono8(image);

        let patch = self.config.effective_patch();
        let half = patch / 2;
        let width = image.width() as usize;
        let height = image.height() as usize;
        let data = image.data();

        // Engines may drop keypoints they cannot describe; patches that do
        // not fit inside the image are dropped the same way.
        keypoints.retain(|kp| {
            let x = kp.x.round() as i64;
            let y = kp.y.round() as i64;
            x >= half as i64
                && y >= half as i64
                && x + (half as i64) < width as i64
                && y + (half as i64) < height as i64
        });

        if keypoints.is_empty() {
            return Descriptors::empty();
        }

        let cols = patch * patch;
        let rows: Vec<Vec<f32>> = keypoints
            .par_iter()
            .map(|kp| {
                let cx = kp.x.round() as usize;
                let cy = kp.y.round() as usize;
                let mut row = Vec::with_capacity(cols);
                let mut sum = 0.0f32;
                for dy in 0..patch {
                    for dx in 0..patch {
                        let v = data[(cy + dy - half) * width + (cx + dx - half)] as f32;
                        sum += v;
                        row.push(v);
                    }
                }
                let mean = sum / cols as f32;
                for v in row.iter_mut() {
                    *v -= mean;
                }
                row
            })
            .collect();

        let mut descriptors = Descriptors::with_cols(cols);
        for row in &rows {
            descriptors.push_row(row);
        }
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark frame with a bright square around (cx, cy).
    fn corner_image(width: u32, height: u32, cx: u32, cy: u32) -> Image {
        let mut data = vec![50u8; (width * height) as usize];
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    data[y as usize * width as usize + x as usize] = 255;
                }
            }
        }
        Image::gray8(width, height, data)
    }

    #[test]
    fn uniform_image_has_no_keypoints() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = Image::gray8(32, 32, vec![128; 1024]);
        let kps = backend.detect(&image, &image.full_rect());
        assert!(kps.is_empty());
    }

    #[test]
    fn bright_square_is_detected() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = corner_image(32, 32, 16, 16);
        let kps = backend.detect(&image, &image.full_rect());
        assert!(!kps.is_empty());
        for kp in &kps {
            assert!((kp.x - 16.0).abs() <= 3.0);
            assert!((kp.y - 16.0).abs() <= 3.0);
            assert!(kp.response > 20.0);
        }
    }

    #[test]
    fn detection_is_roi_relative() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = corner_image(64, 64, 40, 40);
        let full = backend.detect(&image, &image.full_rect());
        let roi = Rect::new(30, 30, 34, 34);
        let restricted = backend.detect(&image, &roi);
        assert_eq!(full.len(), restricted.len());
        for (a, b) in full.iter().zip(&restricted) {
            assert_eq!(a.x, b.x + 30.0);
            assert_eq!(a.y, b.y + 30.0);
        }
    }

    #[test]
    fn roi_excludes_outside_detections() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = corner_image(64, 64, 40, 40);
        let roi = Rect::new(0, 0, 20, 20);
        assert!(backend.detect(&image, &roi).is_empty());
    }

    #[test]
    fn describe_drops_border_keypoints_and_aligns_rows() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = corner_image(32, 32, 16, 16);
        let mut kps = vec![
            Keypoint::new(1.0, 1.0, 0.5),
            Keypoint::new(16.0, 16.0, 0.9),
        ];
        let rows = backend.describe(&image, &mut kps);
        assert_eq!(kps.len(), 1);
        assert_eq!(rows.rows(), 1);
        assert_eq!(rows.cols(), 9 * 9);
    }

    #[test]
    fn descriptor_rows_are_mean_normalized() {
        let backend = ContrastBackend::new(&ParamMap::new());
        let image = corner_image(32, 32, 16, 16);
        let mut kps = vec![Keypoint::new(16.0, 16.0, 0.9)];
        let rows = backend.describe(&image, &mut kps);
        let sum: f32 = rows.row(0).iter().sum();
        assert!(sum.abs() < 1e-2);
    }

    #[test]
    fn configure_rederives_tunables() {
        use feat2d_core::ParamValue;

        let mut backend = ContrastBackend::new(&ParamMap::new());
        let mut map = ParamMap::new();
        map.insert(CONTRAST_THRESHOLD.to_string(), ParamValue::Float(35.0));
        backend.configure(&map);
        assert_eq!(backend.config().threshold, 35.0);

        backend.configure(&ParamMap::new());
        assert_eq!(backend.config().threshold, 20.0);
    }
}
