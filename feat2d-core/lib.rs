pub mod link;
pub mod params;

pub use params::{ParamMap, ParamValue};

/// Row-major image buffer as delivered by the camera driver.
///
/// Frames may arrive with several channels or a 16-bit depth; the extraction
/// pipeline only accepts non-empty single-channel 8-bit images, so both
/// properties are carried explicitly instead of being baked into the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    bit_depth: u8,
    data: Vec<u8>,
}

impl Image {
    /// Wraps a raw buffer. The buffer length must match the declared layout.
    pub fn new(width: u32, height: u32, channels: u8, bit_depth: u8, data: Vec<u8>) -> Self {
        assert!(
            bit_depth == 8 || bit_depth == 16,
            "unsupported bit depth: {bit_depth}"
        );
        assert!(channels > 0, "image must have at least one channel");
        let expected =
            width as usize * height as usize * channels as usize * (bit_depth as usize / 8);
        assert_eq!(
            data.len(),
            expected,
            "image data length {} does not match {}x{} with {} channels at {} bits",
            data.len(),
            width,
            height,
            channels,
            bit_depth
        );
        Self {
            width,
            height,
            channels,
            bit_depth,
            data,
        }
    }

    /// Single-channel 8-bit image, the native format of the pipeline.
    pub fn gray8(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self::new(width, height, 1, 8, data)
    }

    /// Zero-sized placeholder image.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 1,
            bit_depth: 8,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the image is single-channel 8-bit.
    pub fn is_mono8(&self) -> bool {
        self.channels == 1 && self.bit_depth == 8
    }

    /// Rectangle covering the whole image.
    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Metric depth readings in metres, row-major, registered to an image.
///
/// NaN or non-positive entries mean the sensor had no reading at that pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthMap {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize,
            "depth data length {} does not match {}x{}",
            data.len(),
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Depth at an integer pixel. Panics when out of bounds.
    pub fn at(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// A detected image location with its saliency score.
///
/// Follows the usual image conventions: +x right, +y down, subpixel position
/// in pixels of the full frame. `size`, `angle` and `octave` are detector
/// metadata the policy layer carries through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Detector-specific confidence used to rank keypoints.
    pub response: f32,
    /// Diameter of the meaningful neighborhood, in pixels.
    pub size: f32,
    /// Orientation in radians, or -1.0 when the detector does not compute one.
    pub angle: f32,
    /// Pyramid level the keypoint was detected at.
    pub octave: i32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, response: f32) -> Self {
        Self {
            x,
            y,
            response,
            size: 1.0,
            angle: -1.0,
            octave: 0,
        }
    }
}

/// Fixed-width descriptor rows, order-aligned 1:1 with a keypoint sequence.
///
/// Stored as one row-major matrix. The empty container (`cols == 0`) is
/// distinct from a zero-row container that still remembers its width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptors {
    cols: usize,
    data: Vec<f32>,
}

impl Descriptors {
    /// The explicitly empty container: no rows, no width.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Zero-row container of a known width, ready for `push_row`.
    pub fn with_cols(cols: usize) -> Self {
        Self {
            cols,
            data: Vec::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// One descriptor row. Panics when out of bounds.
    pub fn row(&self, index: usize) -> &[f32] {
        assert!(index < self.rows(), "descriptor row {index} out of bounds");
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    pub fn push_row(&mut self, row: &[f32]) {
        assert!(
            self.cols != 0,
            "cannot push a row into a container without a width"
        );
        assert_eq!(
            row.len(),
            self.cols,
            "descriptor row width {} does not match container width {}",
            row.len(),
            self.cols
        );
        self.data.extend_from_slice(row);
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.cols.max(1))
    }
}

/// Axis-aligned pixel rectangle. The all-zero rectangle means "whole image".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pinhole camera intrinsics in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinholeIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }
}

/// Initialize the global Rayon thread pool. Zero threads means one per core.
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    let n_threads = if n_threads == 0 {
        num_cpus::get().max(1)
    } else {
        n_threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray8_round_trip() {
        let img = Image::gray8(4, 3, vec![7; 12]);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert!(img.is_mono8());
        assert!(!img.is_empty());
        assert_eq!(img.full_rect(), Rect::new(0, 0, 4, 3));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn image_length_mismatch_panics() {
        let _ = Image::gray8(4, 4, vec![0; 15]);
    }

    #[test]
    fn empty_image_is_empty() {
        assert!(Image::empty().is_empty());
        assert!(Image::empty().is_mono8());
    }

    #[test]
    fn rgb_frame_is_not_mono8() {
        let img = Image::new(2, 2, 3, 8, vec![0; 12]);
        assert!(!img.is_mono8());
        assert_eq!(img.channels(), 3);
    }

    #[test]
    fn descriptor_rows_align() {
        let mut desc = Descriptors::with_cols(3);
        desc.push_row(&[1.0, 2.0, 3.0]);
        desc.push_row(&[4.0, 5.0, 6.0]);
        assert_eq!(desc.rows(), 2);
        assert_eq!(desc.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(desc.iter_rows().count(), 2);
    }

    #[test]
    fn empty_descriptors_have_no_width() {
        let desc = Descriptors::empty();
        assert_eq!(desc.cols(), 0);
        assert_eq!(desc.rows(), 0);
        assert!(desc.is_empty());
        assert_eq!(desc.iter_rows().count(), 0);
    }

    #[test]
    #[should_panic(expected = "row width")]
    fn descriptor_width_mismatch_panics() {
        let mut desc = Descriptors::with_cols(4);
        desc.push_row(&[1.0, 2.0]);
    }

    #[test]
    fn zero_rect_means_whole_image() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0, 0, 10, 10).is_empty());
    }

    #[test]
    fn depth_map_lookup() {
        let depth = DepthMap::new(2, 2, vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(depth.at(1, 1), 2.0);
        assert!(!depth.is_empty());
        assert!(DepthMap::empty().is_empty());
    }
}
