//! Restrict detection to an ROI and cap the keypoint budget on a synthetic frame.

use feat2d_cli::ContrastBackend;
use feat2d_core::{Image, ParamMap};
use feat2d_pipeline::{FeatureExtractor, compute_roi};

fn synthetic_frame(width: u32, height: u32) -> Image {
    let mut data = vec![90u8; (width * height) as usize];
    // Scatter bright blocks over the frame.
    for i in 0..12usize {
        let cx = 20 + (i * 37) % (width as usize - 40);
        let cy = 20 + (i * 53) % (height as usize - 40);
        for dy in 0..4 {
            for dx in 0..4 {
                data[(cy + dy) * width as usize + cx + dx] = 240;
            }
        }
    }
    Image::gray8(width, height, data)
}

fn main() {
    env_logger::init();

    let frame = synthetic_frame(320, 240);
    let extractor = FeatureExtractor::new(Box::new(ContrastBackend::new(&ParamMap::new())));

    // Ignore the outer 10% on the left/right and 20% at the bottom.
    let roi = compute_roi(&frame, &[0.1, 0.1, 0.0, 0.2]);
    println!("effective ROI: {roi:?}");

    for budget in [0, 25, 100] {
        let kps = extractor.generate_keypoints(&frame, budget, &roi);
        println!("budget {budget:>3}: {} keypoints", kps.len());
    }
}
