//! CPU reference kernels for the four beauty filters.
//!
//! Each kernel takes the stage's native parameter and returns a new frame.
//! Output samples are clamped to `[0, 1]`, matching an 8-bit render target.

use crate::frame::Frame;

/// Rec. 709 luma weights used for desaturation.
const LUMINANCE_WEIGHTING: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Gaussian tap weights for the bilateral kernel: centre, then offsets 1..=4.
const BILATERAL_WEIGHTS: [f32; 5] = [0.18, 0.15, 0.12, 0.09, 0.05];

/// Pixel distance between adjacent bilateral taps.
const BILATERAL_TEXEL_SPACING: i64 = 4;

fn clamp_rgb([r, g, b]: [f32; 3]) -> [f32; 3] {
    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
}

/// Add `brightness` to every channel.
pub fn brightness(frame: &Frame, brightness: f32) -> Frame {
    frame.map_pixels(|[r, g, b]| {
        clamp_rgb([r + brightness, g + brightness, b + brightness])
    })
}

/// Scale every channel by `2^exposure` (exposure in stops).
pub fn exposure(frame: &Frame, exposure: f32) -> Frame {
    let gain = 2f32.powf(exposure);
    frame.map_pixels(|[r, g, b]| clamp_rgb([r * gain, g * gain, b * gain]))
}

/// Interpolate between the pixel's luminance (0.0) and its colour (1.0);
/// values above 1.0 push colours further from grey.
pub fn saturation(frame: &Frame, saturation: f32) -> Frame {
    frame.map_pixels(|[r, g, b]| {
        let luma =
            r * LUMINANCE_WEIGHTING[0] + g * LUMINANCE_WEIGHTING[1] + b * LUMINANCE_WEIGHTING[2];
        clamp_rgb([
            luma + (r - luma) * saturation,
            luma + (g - luma) * saturation,
            luma + (b - luma) * saturation,
        ])
    })
}

/// Edge-preserving smoothing, run as a horizontal then a vertical pass.
///
/// Each neighbour's Gaussian weight is scaled down by its colour distance
/// from the centre pixel times `distance_normalization_factor`. A small
/// factor tolerates large colour differences and therefore smooths harder.
pub fn bilateral(frame: &Frame, distance_normalization_factor: f32) -> Frame {
    let factor = distance_normalization_factor.max(0.0);
    let horizontal = bilateral_pass(frame, factor, (1, 0));
    bilateral_pass(&horizontal, factor, (0, 1))
}

fn bilateral_pass(frame: &Frame, factor: f32, (dx, dy): (i64, i64)) -> Frame {
    frame.map_coords(|x, y| {
        let centre = frame.pixel(x, y);
        let mut sum = centre.map(|c| c * BILATERAL_WEIGHTS[0]);
        let mut norm = BILATERAL_WEIGHTS[0];

        for (step, &tap_weight) in BILATERAL_WEIGHTS.iter().enumerate().skip(1) {
            let offset = step as i64 * BILATERAL_TEXEL_SPACING;
            for sign in [-1, 1] {
                let sample = frame.pixel(x + sign * offset * dx, y + sign * offset * dy);
                let distance = (color_distance(centre, sample) * factor).min(1.0);
                let weight = tap_weight * (1.0 - distance);
                norm += weight;
                for (acc, s) in sum.iter_mut().zip(sample) {
                    *acc += s * weight;
                }
            }
        }

        clamp_rgb(sum.map(|c| c / norm))
    })
}

fn color_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
