use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use tracing::{debug, info};

use crate::core::raster::LogoImage;
use crate::error::{Error, Result};

/// Upper bound on the resized logo's pixel count (1 GiB of RGBA samples).
pub const MAX_LOGO_PIXELS: usize = 1 << 28;

/// Logo size for a given base width: width is `round(base_width * scale)`,
/// height follows the logo's own aspect ratio. Both are floored at 1 so a
/// zero or negative scale degrades to a single pixel instead of failing.
///
/// Fails with [`Error::Resize`] when a side does not fit in `u32` or the
/// logo would exceed [`MAX_LOGO_PIXELS`].
pub fn calculate_logo_dimensions(
    base_width: usize,
    logo_width: usize,
    logo_height: usize,
    scale: f32,
) -> Result<(usize, usize)> {
    let new_width = scaled_side(base_width as f64 * scale as f64)?;
    let new_height = if logo_width == 0 {
        1
    } else {
        scaled_side(logo_height as f64 * new_width as f64 / logo_width as f64)?
    };
    match new_width.checked_mul(new_height) {
        Some(pixels) if pixels <= MAX_LOGO_PIXELS => Ok((new_width, new_height)),
        _ => Err(Error::Resize(format!(
            "logo of {}x{} at scale {} exceeds {} pixels",
            new_width, new_height, scale, MAX_LOGO_PIXELS
        ))),
    }
}

fn scaled_side(value: f64) -> Result<usize> {
    let rounded = value.round();
    if rounded > u32::MAX as f64 {
        return Err(Error::Resize(format!("logo side {} does not fit in u32", rounded)));
    }
    // NaN and negatives saturate to 0.
    Ok((rounded as usize).max(1))
}

pub fn resize_rgba_image(
    data: &[u8],
    original_cols: usize,
    original_rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> Result<Vec<u8>> {
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        u32::try_from(original_cols).map_err(Error::resize)?,
        u32::try_from(original_rows).map_err(Error::resize)?,
        data.to_vec(),
        PixelType::U8x4,
    )
    .map_err(Error::resize)?;
    let mut dst_image = Image::new(
        u32::try_from(target_cols).map_err(Error::resize)?,
        u32::try_from(target_rows).map_err(Error::resize)?,
        PixelType::U8x4,
    );
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::resize)?;

    Ok(dst_image.into_vec())
}

/// Resize a logo to exactly `target_cols` x `target_rows`.
/// Alpha is premultiplied during filtering so transparent edges do not bleed color.
pub fn resize_logo(logo: &LogoImage, target_cols: usize, target_rows: usize) -> Result<LogoImage> {
    if logo.width() == target_cols && logo.height() == target_rows {
        debug!("Logo already at {}x{}, skipping resize", target_cols, target_rows);
        return Ok(logo.clone());
    }
    if logo.width() == 0 || logo.height() == 0 {
        return Ok(LogoImage::filled(target_cols, target_rows, [0, 0, 0, 0]));
    }

    info!(
        "Resizing logo: {}x{} -> {}x{}",
        logo.width(),
        logo.height(),
        target_cols,
        target_rows
    );
    let resized = resize_rgba_image(
        logo.as_bytes(),
        logo.width(),
        logo.height(),
        target_cols,
        target_rows,
    )?;
    LogoImage::from_vec(target_cols, target_rows, resized).ok_or_else(|| {
        Error::Resize(format!(
            "resizer returned unexpected buffer size for {}x{}",
            target_cols, target_rows
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_is_preserved() {
        assert_eq!(calculate_logo_dimensions(400, 300, 150, 0.25).unwrap(), (100, 50));
        assert_eq!(calculate_logo_dimensions(200, 80, 40, 0.2).unwrap(), (40, 20));
        assert_eq!(calculate_logo_dimensions(1000, 64, 128, 0.1).unwrap(), (100, 200));
    }

    #[test]
    fn dimensions_are_rounded() {
        // 333 * 0.25 = 83.25 -> 83; 50 * 83 / 120 = 34.58 -> 35
        assert_eq!(calculate_logo_dimensions(333, 120, 50, 0.25).unwrap(), (83, 35));
    }

    #[test]
    fn degenerate_scale_is_clamped_to_one_pixel() {
        assert_eq!(calculate_logo_dimensions(400, 300, 150, 0.0).unwrap(), (1, 1));
        assert_eq!(calculate_logo_dimensions(400, 300, 150, -2.0).unwrap(), (1, 1));
        assert_eq!(calculate_logo_dimensions(400, 300, 150, f32::NAN).unwrap(), (1, 1));
        assert_eq!(calculate_logo_dimensions(400, 0, 0, 0.25).unwrap(), (100, 1));
    }

    #[test]
    fn huge_scale_is_rejected_before_allocating() {
        assert!(matches!(
            calculate_logo_dimensions(1000, 10, 10, 1.0e6),
            Err(Error::Resize(_))
        ));
        assert!(matches!(
            calculate_logo_dimensions(1000, 10, 10, f32::INFINITY),
            Err(Error::Resize(_))
        ));
        // Fits in u32 on its own but the area is far past the cap.
        assert!(matches!(
            calculate_logo_dimensions(1000, 10, 10, 100.0),
            Err(Error::Resize(_))
        ));
    }

    #[test]
    fn resize_opaque_logo_keeps_color() {
        let logo = LogoImage::filled(300, 150, [200, 30, 90, 255]);
        let resized = resize_logo(&logo, 100, 50).unwrap();
        assert_eq!((resized.width(), resized.height()), (100, 50));
        let px = resized.pixel(50, 25);
        for (got, want) in px.iter().zip([200u8, 30, 90, 255]) {
            assert!(got.abs_diff(want) <= 1, "{:?}", px);
        }
    }

    #[test]
    fn resize_same_size_is_copy() {
        let logo = LogoImage::filled(7, 5, [1, 2, 3, 4]);
        assert_eq!(resize_logo(&logo, 7, 5).unwrap(), logo);
    }
}
