//! Tone enhancement: denoise, brightness/contrast, then sharpen, all in
//! normalized f32 space. Stage order is fixed: noise is removed before the
//! tone curve can amplify it, and sharpening sees the corrected image.
use tracing::debug;

use crate::core::params::EnhancementOptions;
use crate::core::processing::filters::{bilateral_filter, gaussian_blur};
use crate::core::raster::{FloatRaster, RasterBuffer};
use crate::types::EnhanceOption;

/// Bilateral range sigma, in normalized [0, 1] units.
pub const DENOISE_SIGMA_COLOR: f32 = 0.02;
/// Bilateral spatial sigma, in pixels.
pub const DENOISE_SIGMA_SPACE: f32 = 5.0;
/// Slider value that maps to a factor of exactly 1.0.
pub const SLIDER_NEUTRAL: f32 = 50.0;
/// Slider units per unit of factor change (±25% over 0..=100).
pub const SLIDER_SPAN: f32 = 200.0;
/// Fraction of the brightness factor delta applied as an additive shift.
pub const BRIGHTNESS_SHIFT_GAIN: f32 = 0.25;
/// Contrast pivots around mid-gray.
pub const CONTRAST_PIVOT: f32 = 0.5;
/// Gaussian sigma of the unsharp-mask blur, in pixels.
pub const SHARPEN_SIGMA: f32 = 2.0;
/// Unsharp-mask gain per unit of strength.
pub const SHARPEN_GAIN: f32 = 0.5;

/// `1 + (slider - 50) / 200`. Out-of-range sliders extrapolate linearly.
pub fn slider_factor(value: i32) -> f32 {
    1.0 + (value as f32 - SLIDER_NEUTRAL) / SLIDER_SPAN
}

/// Enhance an RGB raster according to `options`. Pure; the input is untouched.
pub fn enhance(image: &RasterBuffer, options: &EnhancementOptions) -> RasterBuffer {
    if options.options.is_empty() {
        return image.clone();
    }
    debug!(
        "Enhancing {}x{} with {:?}",
        image.width(),
        image.height(),
        options.options
    );

    let mut working = image.to_float();

    if options.has(EnhanceOption::Denoise) {
        working = bilateral_filter(&working, DENOISE_SIGMA_COLOR, DENOISE_SIGMA_SPACE);
    }

    if options.has(EnhanceOption::Brightness) || options.has(EnhanceOption::Contrast) {
        apply_tone(&mut working, options.brightness_val, options.contrast_val);
    }

    if options.has(EnhanceOption::Sharpen) && options.sharpen_val > 0 {
        working = unsharp_mask(&working, options.sharpen_val as f32 / 100.0);
    }

    RasterBuffer::from_float(&working)
}

/// `out = clamp((in - 0.5) * contrast + 0.5 + shift, 0, 1)` where
/// `shift = (brightness - 1) * 0.25`.
pub fn apply_tone(raster: &mut FloatRaster, brightness_val: i32, contrast_val: i32) {
    let brightness_factor = slider_factor(brightness_val);
    let contrast_factor = slider_factor(contrast_val);
    let brightness_shift = (brightness_factor - 1.0) * BRIGHTNESS_SHIFT_GAIN;
    debug!(
        "Tone: contrast_factor={:.4}, brightness_shift={:.4}",
        contrast_factor, brightness_shift
    );

    raster.mapv_inplace(|v| {
        ((v - CONTRAST_PIVOT) * contrast_factor + CONTRAST_PIVOT + brightness_shift).clamp(0.0, 1.0)
    });
}

/// Mild unsharp mask: `in * (1 + 0.5 s) - blur * 0.5 s`. Not clamped here.
pub fn unsharp_mask(raster: &FloatRaster, strength: f32) -> FloatRaster {
    let blur = gaussian_blur(raster, SHARPEN_SIGMA);
    let gain = SHARPEN_GAIN * strength;
    debug!("Unsharp mask: strength={:.2}", strength);
    raster * (1.0 + gain) + blur * (-gain)
}
