use std::time::Instant;

use image::{ImageReader, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;

use feat2d_cli::{ContrastBackend, from_luma8};
use feat2d_core::{ParamMap, Rect};
use feat2d_pipeline::FeatureExtractor;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "lenna.png".to_string());
    let max_keypoints: i32 = args
        .next()
        .map(|s| s.parse().expect("max keypoints must be an integer"))
        .unwrap_or(500);

    // Load grayscale image
    let img = ImageReader::open(&path)
        .expect("Image not found")
        .decode()
        .expect("Decode failed")
        .to_luma8();

    let frame = from_luma8(&img);
    let extractor = FeatureExtractor::new(Box::new(ContrastBackend::new(&ParamMap::new())));

    // Time the full pipeline
    let t0 = Instant::now();
    let (kps, descriptors) = extractor.detect_and_describe(&frame, max_keypoints, &Rect::default());
    let elapsed = t0.elapsed();

    println!("Time taken: {:.2?}", elapsed);
    println!("Detected {} keypoints", kps.len());
    println!(
        "Generated {} descriptor rows of width {}",
        descriptors.rows(),
        descriptors.cols()
    );

    // Convert image to RGBA for drawing
    let mut output: RgbaImage = image::DynamicImage::ImageLuma8(img).into_rgba8();

    // Draw red circles at each keypoint
    for kp in &kps {
        draw_hollow_circle_mut(
            &mut output,
            (kp.x as i32, kp.y as i32),
            3,
            Rgba([255, 0, 0, 255]),
        );
    }

    // Save result
    let out_path = format!("{}_keypoints.png", path.trim_end_matches(".png"));
    output
        .save(&out_path)
        .expect("Failed to save output image");
    println!("Saved result image as {out_path}");
}
