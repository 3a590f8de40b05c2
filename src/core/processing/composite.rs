//! Logo compositing: resize relative to the base width, scale alpha by the
//! opacity once, anchor at a corner or the center with a fixed margin and
//! blend with the straight-alpha "over" operator.
use image::DynamicImage;
use tracing::debug;

use crate::core::params::LogoPlacement;
use crate::core::processing::resize::{calculate_logo_dimensions, resize_logo};
use crate::core::raster::{LogoImage, RGB_CHANNELS, RGBA_CHANNELS, RasterBuffer};
use crate::error::Result;
use crate::types::LogoPosition;

/// Distance in pixels between the logo and the nearest image edge(s).
pub const LOGO_MARGIN: i64 = 20;

/// A decoded logo plus where and how strongly to stamp it.
///
/// Decoded once per batch and shared read-only across every base image.
#[derive(Debug, Clone)]
pub struct LogoOverlay {
    pub image: LogoImage,
    pub placement: LogoPlacement,
}

impl LogoOverlay {
    pub fn new(image: LogoImage, placement: LogoPlacement) -> Self {
        Self { image, placement }
    }

    pub fn from_dynamic(image: &DynamicImage, placement: LogoPlacement) -> Self {
        Self::new(LogoImage::from_dynamic(image), placement)
    }
}

/// Top-left destination of the logo. May be negative when the logo is larger
/// than the base; the blend clips whatever falls outside.
pub fn logo_offset(
    position: LogoPosition,
    base_width: usize,
    base_height: usize,
    logo_width: usize,
    logo_height: usize,
) -> (i64, i64) {
    let (bw, bh) = (base_width as i64, base_height as i64);
    let (lw, lh) = (logo_width as i64, logo_height as i64);
    match position {
        LogoPosition::TopLeft => (LOGO_MARGIN, LOGO_MARGIN),
        LogoPosition::TopRight => (bw - lw - LOGO_MARGIN, LOGO_MARGIN),
        LogoPosition::BottomLeft => (LOGO_MARGIN, bh - lh - LOGO_MARGIN),
        LogoPosition::BottomRight => (bw - lw - LOGO_MARGIN, bh - lh - LOGO_MARGIN),
        LogoPosition::Center => ((bw - lw).div_euclid(2), (bh - lh).div_euclid(2)),
    }
}

/// Scale every alpha sample by `opacity` (truncating). No-op for `opacity >= 1`.
pub fn apply_opacity(logo: &mut LogoImage, opacity: f32) {
    if opacity >= 1.0 || opacity.is_nan() {
        return;
    }
    for px in logo.pixels_mut().chunks_exact_mut(RGBA_CHANNELS) {
        px[3] = (px[3] as f32 * opacity).floor().clamp(0.0, 255.0) as u8;
    }
}

/// Straight-alpha "over" blend of `logo` onto an opaque `base` at `(x, y)`.
/// Fully transparent logo pixels leave the base untouched and fully opaque
/// ones replace it exactly.
pub fn alpha_blend(base: &mut RasterBuffer, logo: &LogoImage, x: i64, y: i64) {
    let (bw, bh) = (base.width() as i64, base.height() as i64);
    let (lw, lh) = (logo.width() as i64, logo.height() as i64);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + lw).min(bw);
    let y1 = (y + lh).min(bh);
    if x0 >= x1 || y0 >= y1 {
        debug!("Logo at ({}, {}) lies entirely outside the base", x, y);
        return;
    }

    let base_width = base.width();
    let dst = base.pixels_mut();
    let src = logo.as_bytes();
    for dy in y0..y1 {
        for dx in x0..x1 {
            let s = (((dy - y) * lw + (dx - x)) as usize) * RGBA_CHANNELS;
            let alpha = src[s + 3] as u32;
            if alpha == 0 {
                continue;
            }
            let d = (dy as usize * base_width + dx as usize) * RGB_CHANNELS;
            let inv = 255 - alpha;
            for c in 0..RGB_CHANNELS {
                let blended = (src[s + c] as u32 * alpha + dst[d + c] as u32 * inv + 127) / 255;
                dst[d + c] = blended as u8;
            }
        }
    }
}

/// Composite `overlay` onto a copy of `base`.
pub fn composite(base: &RasterBuffer, overlay: &LogoOverlay) -> Result<RasterBuffer> {
    let placement = overlay.placement;
    let (logo_width, logo_height) = calculate_logo_dimensions(
        base.width(),
        overlay.image.width(),
        overlay.image.height(),
        placement.scale,
    )?;

    // Always a fresh copy, so opacity never compounds on the shared logo.
    let mut logo = resize_logo(&overlay.image, logo_width, logo_height)?;
    apply_opacity(&mut logo, placement.opacity);

    let (x, y) = logo_offset(
        placement.position,
        base.width(),
        base.height(),
        logo_width,
        logo_height,
    );
    debug!(
        "Compositing {}x{} logo at ({}, {}) [{}], opacity={}",
        logo_width, logo_height, x, y, placement.position, placement.opacity
    );

    let mut out = base.clone();
    alpha_blend(&mut out, &logo, x, y);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(position: LogoPosition, opacity: f32, scale: f32) -> LogoPlacement {
        LogoPlacement {
            position,
            opacity,
            scale,
        }
    }

    #[test]
    fn offsets_for_every_position() {
        let cases = [
            (LogoPosition::TopLeft, (20, 20)),
            (LogoPosition::TopRight, (140, 20)),
            (LogoPosition::BottomLeft, (20, 60)),
            (LogoPosition::BottomRight, (140, 60)),
            (LogoPosition::Center, (80, 40)),
        ];
        for (position, expected) in cases {
            assert_eq!(logo_offset(position, 200, 100, 40, 20), expected, "{}", position);
        }
    }

    #[test]
    fn unknown_position_uses_top_right_offset() {
        let position = LogoPosition::from("upper-middle");
        assert_eq!(logo_offset(position, 200, 100, 40, 20), (140, 20));
    }

    #[test]
    fn oversized_logo_gives_negative_offsets() {
        assert_eq!(logo_offset(LogoPosition::BottomRight, 50, 30, 80, 60), (-50, -50));
        assert_eq!(logo_offset(LogoPosition::Center, 50, 30, 81, 61), (-16, -16));
    }

    #[test]
    fn opacity_truncates_alpha() {
        let mut logo = LogoImage::filled(2, 1, [9, 9, 9, 255]);
        apply_opacity(&mut logo, 0.5);
        assert_eq!(logo.pixel(0, 0), [9, 9, 9, 127]);

        let mut full = LogoImage::filled(1, 1, [9, 9, 9, 200]);
        apply_opacity(&mut full, 1.0);
        assert_eq!(full.pixel(0, 0)[3], 200);
    }

    #[test]
    fn opaque_logo_replaces_base_exactly() {
        let base = RasterBuffer::filled(200, 100, [10, 20, 30]);
        let overlay = LogoOverlay::new(
            LogoImage::filled(40, 20, [250, 128, 3, 255]),
            placement(LogoPosition::TopLeft, 1.0, 0.2),
        );
        let out = composite(&base, &overlay).unwrap();
        assert_eq!(out.pixel(20, 20), [250, 128, 3]);
        assert_eq!(out.pixel(59, 39), [250, 128, 3]);
        assert_eq!(out.pixel(19, 20), [10, 20, 30]);
        assert_eq!(out.pixel(60, 39), [10, 20, 30]);
        assert_eq!(out.pixel(20, 40), [10, 20, 30]);
    }

    #[test]
    fn transparent_logo_leaves_base_unchanged() {
        let base = RasterBuffer::filled(120, 80, [33, 66, 99]);
        let overlay = LogoOverlay::new(
            LogoImage::filled(30, 30, [255, 255, 255, 0]),
            placement(LogoPosition::Center, 1.0, 0.25),
        );
        assert_eq!(composite(&base, &overlay).unwrap(), base);
    }

    #[test]
    fn partial_alpha_interpolates() {
        let mut base = RasterBuffer::filled(4, 4, [0, 100, 200]);
        let logo = LogoImage::filled(2, 2, [200, 200, 200, 128]);
        alpha_blend(&mut base, &logo, 1, 1);
        // 200 * 128/255 + dst * 127/255
        assert_eq!(base.pixel(1, 1), [100, 150, 200]);
        assert_eq!(base.pixel(0, 0), [0, 100, 200]);
    }

    #[test]
    fn opacity_is_applied_once_per_call() {
        let base = RasterBuffer::filled(200, 100, [0, 0, 0]);
        let overlay = LogoOverlay::new(
            LogoImage::filled(40, 20, [255, 255, 255, 255]),
            placement(LogoPosition::TopLeft, 0.5, 0.2),
        );
        let first = composite(&base, &overlay).unwrap();
        let second = composite(&base, &overlay).unwrap();
        assert_eq!(first, second);
        // alpha 127 over black
        assert_eq!(first.pixel(30, 30), [127, 127, 127]);
        // Shared logo is never modified.
        assert_eq!(overlay.image.pixel(0, 0)[3], 255);

        let quarter = LogoOverlay::new(
            overlay.image.clone(),
            placement(LogoPosition::TopLeft, 0.25, 0.2),
        );
        assert_ne!(composite(&base, &quarter).unwrap(), first);
    }

    #[test]
    fn clips_logo_hanging_off_the_edge() {
        let mut base = RasterBuffer::filled(10, 10, [0, 0, 0]);
        let logo = LogoImage::filled(6, 6, [255, 0, 0, 255]);
        alpha_blend(&mut base, &logo, -3, 7);
        assert_eq!(base.pixel(0, 7), [255, 0, 0]);
        assert_eq!(base.pixel(2, 9), [255, 0, 0]);
        assert_eq!(base.pixel(3, 9), [0, 0, 0]);
        assert_eq!(base.pixel(0, 6), [0, 0, 0]);

        alpha_blend(&mut base, &logo, 50, -50);
    }

    #[test]
    fn oversized_and_degenerate_logos_do_not_panic() {
        let base = RasterBuffer::filled(30, 20, [5, 5, 5]);
        let big = LogoOverlay::new(
            LogoImage::filled(10, 10, [255, 255, 255, 255]),
            placement(LogoPosition::BottomRight, 1.0, 3.0),
        );
        let out = composite(&base, &big).unwrap();
        assert_eq!(out.width(), 30);

        let zero = LogoOverlay::new(
            LogoImage::filled(10, 10, [255, 255, 255, 255]),
            placement(LogoPosition::Center, 1.0, 0.0),
        );
        let out = composite(&base, &zero).unwrap();
        assert_eq!(out.height(), 20);
    }

    #[test]
    fn runaway_scale_is_an_error_not_an_abort() {
        let base = RasterBuffer::filled(1000, 10, [5, 5, 5]);
        let overlay = LogoOverlay::new(
            LogoImage::filled(10, 10, [255, 255, 255, 255]),
            placement(LogoPosition::TopRight, 1.0, 1.0e6),
        );
        assert!(matches!(
            composite(&base, &overlay),
            Err(crate::error::Error::Resize(_))
        ));
    }
}
