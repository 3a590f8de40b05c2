//! In-memory raster types shared by every stage.
//!
//! `RasterBuffer` is the 8-bit RGB currency between decode, enhancement,
//! compositing and encode. `LogoImage` carries the RGBA logo. `FloatRaster`
//! is the normalized working buffer used inside the enhancer.
use image::{DynamicImage, RgbImage, RgbaImage};
use ndarray::Array3;

/// Working raster: shape (rows, cols, 3), samples in [0, 1].
pub type FloatRaster = Array3<f32>;

pub const RGB_CHANNELS: usize = 3;
pub const RGBA_CHANNELS: usize = 4;

/// 8-bit, 3-channel, row-major interleaved raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap interleaved RGB samples. Returns `None` if the length does not match.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * RGB_CHANNELS {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Uniform raster filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width * height * RGB_CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Normalize any decoded image to 8-bit RGB: grayscale is expanded,
    /// alpha is dropped and deeper samples are reduced to 8 bits.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let rgb = match image {
            DynamicImage::ImageRgb8(rgb) => rgb.clone(),
            other => other.to_rgb8(),
        };
        Self::from(rgb)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// RGB sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let i = (y * self.width + x) * RGB_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let i = (y * self.width + x) * RGB_CHANNELS;
        self.data[i..i + RGB_CHANNELS].copy_from_slice(&rgb);
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// u8 -> f32 in [0, 1].
    pub fn to_float(&self) -> FloatRaster {
        let mut out = FloatRaster::zeros((self.height, self.width, RGB_CHANNELS));
        for (dst, &src) in out.iter_mut().zip(&self.data) {
            *dst = src as f32 / 255.0;
        }
        out
    }

    /// f32 -> u8: clamp to [0, 1], scale by 255 and round.
    pub fn from_float(raster: &FloatRaster) -> Self {
        let (height, width, _) = raster.dim();
        let data = raster
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }
}

impl From<RgbImage> for RasterBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            data: image.into_raw(),
        }
    }
}

/// 8-bit RGBA logo raster with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LogoImage {
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * RGBA_CHANNELS {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width * height * RGBA_CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let rgba = match image {
            DynamicImage::ImageRgba8(rgba) => rgba.clone(),
            other => other.to_rgba8(),
        };
        Self::from(rgba)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let i = (y * self.width + x) * RGBA_CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl From<RgbaImage> for LogoImage {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            data: image.into_raw(),
        }
    }
}
