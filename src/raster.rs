//! 2-D projection images.
//!
//! Rasterizes two sets of reduced points into a fixed 256×256 two-channel
//! intensity image. The first two coordinates of each point map from
//! [-1, 1] to pixel [0, 255] via `floor((coord + 1) * 128)`; out-of-range
//! coordinates are clamped rather than left to index out of bounds. Each
//! hit adds `256 / total_point_count`, so total ink is constant regardless
//! of how the points split between the sets.

use crate::errors::{EchoError, Result};

pub const IMAGE_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// ProjectionImage
// ---------------------------------------------------------------------------

/// Accumulated two-channel intensity image. Channel 0 holds the first
/// point set, channel 1 the second.
#[derive(Clone, Debug)]
pub struct ProjectionImage {
    /// Two IMAGE_SIZE × IMAGE_SIZE accumulators, row-major; the row index
    /// comes from a point's first coordinate.
    pub channels: [Vec<f64>; 2],
}

impl ProjectionImage {
    /// Rasterize two point sets. Every point needs at least two
    /// components; components past the first two are ignored.
    pub fn from_point_sets(first: &[Vec<f64>], second: &[Vec<f64>]) -> Result<Self> {
        let total = first.len() + second.len();
        if total == 0 {
            return Err(EchoError::Data("no points to rasterize".into()));
        }
        let increment = 256.0 / total as f64;

        let mut channels = [
            vec![0.0f64; IMAGE_SIZE * IMAGE_SIZE],
            vec![0.0f64; IMAGE_SIZE * IMAGE_SIZE],
        ];

        for (channel, points) in channels.iter_mut().zip([first, second]) {
            for point in points {
                if point.len() < 2 {
                    return Err(EchoError::DimensionMismatch { expected: 2, got: point.len() });
                }
                let row = pixel_index(point[0]);
                let col = pixel_index(point[1]);
                channel[row * IMAGE_SIZE + col] += increment;
            }
        }

        Ok(Self { channels })
    }

    pub fn intensity(&self, channel: usize, row: usize, col: usize) -> f64 {
        self.channels[channel][row * IMAGE_SIZE + col]
    }

    /// Encode as a binary PPM (P6). Channel 0 maps to green, channel 1 to
    /// blue; intensities are capped at 255.
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{IMAGE_SIZE} {IMAGE_SIZE}\n255\n").into_bytes();
        for idx in 0..IMAGE_SIZE * IMAGE_SIZE {
            out.push(0);
            out.push(self.channels[0][idx].round().min(255.0) as u8);
            out.push(self.channels[1][idx].round().min(255.0) as u8);
        }
        out
    }
}

/// Map a coordinate in [-1, 1] to a pixel index in [0, 255]. Values
/// outside the range are clamped; coord = 1.0 lands on 255.
fn pixel_index(coord: f64) -> usize {
    let c = coord.clamp(-1.0, 1.0);
    (((c + 1.0) * 128.0).floor() as usize).min(IMAGE_SIZE - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_center() {
        let image = ProjectionImage::from_point_sets(&[vec![0.0, 0.0]], &[]).unwrap();
        assert_eq!(image.intensity(0, 128, 128), 256.0);
    }

    #[test]
    fn test_corner_maps_to_255() {
        let image = ProjectionImage::from_point_sets(&[vec![1.0, 1.0]], &[]).unwrap();
        assert_eq!(image.intensity(0, 255, 255), 256.0);
    }

    #[test]
    fn test_single_point_single_increment() {
        let image = ProjectionImage::from_point_sets(&[vec![0.0, 0.0]], &[]).unwrap();
        let total: f64 = image.channels[0].iter().sum();
        assert_eq!(total, 256.0, "one point, one increment of 256/1");
        assert_eq!(image.channels[1].iter().filter(|v| **v != 0.0).count(), 0);
    }

    #[test]
    fn test_ink_constant_across_set_sizes() {
        let a: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 0.1 - 0.5, 0.0]).collect();
        let b: Vec<Vec<f64>> = (0..6).map(|i| vec![0.0, i as f64 * 0.1]).collect();
        let image = ProjectionImage::from_point_sets(&a, &b).unwrap();
        let total: f64 =
            image.channels[0].iter().sum::<f64>() + image.channels[1].iter().sum::<f64>();
        assert!((total - 256.0).abs() < 1e-9, "total ink = {}", total);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let image =
            ProjectionImage::from_point_sets(&[vec![5.0, -3.0]], &[vec![-1.0, 1.0]]).unwrap();
        assert_eq!(image.intensity(0, 255, 0), 128.0);
        assert_eq!(image.intensity(1, 0, 255), 128.0);
    }

    #[test]
    fn test_short_point_rejected() {
        assert!(matches!(
            ProjectionImage::from_point_sets(&[vec![0.5]], &[]),
            Err(EchoError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_empty_sets_are_data_error() {
        assert!(matches!(
            ProjectionImage::from_point_sets(&[], &[]),
            Err(EchoError::Data(_))
        ));
    }

    #[test]
    fn test_ppm_header_and_size() {
        let image = ProjectionImage::from_point_sets(&[vec![0.0, 0.0]], &[]).unwrap();
        let ppm = image.to_ppm();
        assert!(ppm.starts_with(b"P6\n256 256\n255\n"));
        let header_len = b"P6\n256 256\n255\n".len();
        assert_eq!(ppm.len(), header_len + IMAGE_SIZE * IMAGE_SIZE * 3);
    }
}
