use image::{Rgb, Rgb32FImage};
use imageproc::filter::separable_filter_equal;
use ndarray::Array3;
use tracing::debug;

use crate::core::raster::{FloatRaster, RGB_CHANNELS};

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`gfedcb|abcdefgh|gfedcba`).
#[inline]
pub fn reflect101(mut i: isize, len: usize) -> usize {
    let n = len as isize;
    if n <= 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Normalized 1D Gaussian kernel with radius `round(4 * sigma)`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = ((sigma * 4.0).round() as isize).max(1);
    let coeff = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| ((x * x) as f32 * coeff).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian blur of an RGB raster with reflect-101 borders.
///
/// The raster is padded by the kernel radius with mirrored samples before
/// filtering, so the border clamping inside `imageproc` never reaches the
/// cropped result.
pub fn gaussian_blur(src: &FloatRaster, sigma: f32) -> FloatRaster {
    let (rows, cols, _) = src.dim();
    if rows == 0 || cols == 0 {
        return src.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = kernel.len() / 2;
    debug!("Gaussian blur: sigma={}, kernel={}", sigma, kernel.len());

    let pad = radius as isize;
    let padded = Rgb32FImage::from_fn(
        (cols + 2 * radius) as u32,
        (rows + 2 * radius) as u32,
        |x, y| {
            let sy = reflect101(y as isize - pad, rows);
            let sx = reflect101(x as isize - pad, cols);
            Rgb([src[[sy, sx, 0]], src[[sy, sx, 1]], src[[sy, sx, 2]]])
        },
    );
    let blurred = separable_filter_equal(&padded, kernel.as_slice());

    Array3::from_shape_fn((rows, cols, RGB_CHANNELS), |(y, x, c)| {
        blurred.get_pixel((x + radius) as u32, (y + radius) as u32).0[c]
    })
}

/// Edge-preserving bilateral filter.
///
/// Spatial support is a disc of radius `round(1.5 * sigma_space)`. The color
/// distance between two pixels is the sum of absolute channel differences, so
/// neighbours across an edge wider than a few `sigma_color` get ~zero weight.
pub fn bilateral_filter(src: &FloatRaster, sigma_color: f32, sigma_space: f32) -> FloatRaster {
    let (rows, cols, channels) = src.dim();
    if rows == 0 || cols == 0 {
        return src.clone();
    }

    let radius = ((sigma_space * 1.5).round() as isize).max(1);
    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut taps: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = dy * dy + dx * dx;
            if r2 > radius * radius {
                continue;
            }
            taps.push((dy, dx, (r2 as f32 * space_coeff).exp()));
        }
    }
    debug!(
        "Bilateral filter: sigma_color={}, sigma_space={}, radius={}, taps={}",
        sigma_color,
        sigma_space,
        radius,
        taps.len()
    );

    let samples: Vec<f32> = src.iter().copied().collect();
    let mut out = Array3::<f32>::zeros((rows, cols, channels));
    let mut acc = vec![0.0f32; channels];

    for y in 0..rows {
        for x in 0..cols {
            let center = (y * cols + x) * channels;
            acc.fill(0.0);
            let mut weight_sum = 0.0f32;

            for &(dy, dx, space_weight) in &taps {
                let ny = reflect101(y as isize + dy, rows);
                let nx = reflect101(x as isize + dx, cols);
                let n = (ny * cols + nx) * channels;

                let dist: f32 = (0..channels)
                    .map(|c| (samples[n + c] - samples[center + c]).abs())
                    .sum();
                let w = space_weight * (dist * dist * color_coeff).exp();
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += w * samples[n + c];
                }
                weight_sum += w;
            }

            // The centre tap always has weight 1, so weight_sum >= 1.
            for (c, a) in acc.iter().enumerate() {
                out[[y, x, c]] = a / weight_sum;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn step_edge(rows: usize, cols: usize, low: f32, high: f32) -> FloatRaster {
        Array3::from_shape_fn((rows, cols, 3), |(_, x, _)| if x < cols / 2 { low } else { high })
    }

    #[test]
    fn reflect101_mirrors_without_edge_repeat() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 5), 3);
        assert_eq!(reflect101(-7, 1), 0);
        // Offsets larger than the image bounce until they land inside.
        assert!(reflect101(-9, 3) < 3);
        assert!(reflect101(14, 3) < 3);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(2.0);
        assert_eq!(kernel.len(), 17);
        assert_abs_diff_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        for i in 0..kernel.len() / 2 {
            assert_abs_diff_eq!(kernel[i], kernel[kernel.len() - 1 - i], epsilon = 1e-7);
        }
        assert!(kernel[8] > kernel[7]);
    }

    #[test]
    fn gaussian_blur_keeps_uniform_image() {
        let flat = Array3::from_elem((6, 9, 3), 0.37f32);
        let blurred = gaussian_blur(&flat, 2.0);
        for &v in blurred.iter() {
            assert_abs_diff_eq!(v, 0.37, epsilon = 1e-5);
        }
    }

    #[test]
    fn gaussian_blur_softens_step() {
        let edge = step_edge(4, 20, 0.0, 1.0);
        let blurred = gaussian_blur(&edge, 2.0);
        let left = blurred[[2, 9, 0]];
        let right = blurred[[2, 10, 0]];
        assert!(left > 0.0 && left < 0.5, "left of edge got {}", left);
        assert!(right < 1.0 && right > 0.5, "right of edge got {}", right);
    }

    #[test]
    fn gaussian_blur_mirrors_border_without_repeat() {
        // A single bright column at x = 1 is seen twice from x = 0 under
        // reflect-101 (offsets -1 and +1), and never as an edge repeat.
        let line = Array3::from_shape_fn((5, 12, 3), |(_, x, _)| if x == 1 { 1.0f32 } else { 0.0 });
        let blurred = gaussian_blur(&line, 2.0);
        let kernel = gaussian_kernel(2.0);
        for y in 0..5 {
            for c in 0..3 {
                assert_abs_diff_eq!(blurred[[y, 0, c]], 2.0 * kernel[9], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn bilateral_preserves_hard_edge() {
        let edge = step_edge(12, 24, 0.2, 0.8);
        let filtered = bilateral_filter(&edge, 0.02, 5.0);
        for &(x, expected) in &[(11usize, 0.2f32), (12, 0.8)] {
            for c in 0..3 {
                assert_abs_diff_eq!(filtered[[6, x, c]], expected, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn bilateral_smooths_small_noise() {
        // Alternating +-0.004 ripple, well inside sigma_color.
        let noisy = Array3::from_shape_fn((10, 10, 3), |(y, x, _)| {
            if (x + y) % 2 == 0 { 0.504 } else { 0.496 }
        });
        let filtered = bilateral_filter(&noisy, 0.02, 5.0);
        let before = (noisy[[5, 5, 0]] - 0.5).abs();
        let after = (filtered[[5, 5, 0]] - 0.5).abs();
        assert!(after < before / 2.0, "ripple {} -> {}", before, after);
    }
}
