//! Decoder chain for uploaded image bytes.
//!
//! The primary decoder is the `image` crate, which covers the common raster
//! formats. With the `heic` feature a libheif-backed decoder is appended as the
//! single fallback for HEIC/HEIF uploads. Each decoder reports a
//! `DecodeOutcome` rather than its library's own error type.
use image::DynamicImage;
use tracing::{debug, info};

use crate::core::raster::{LogoImage, RasterBuffer};
use crate::error::{Error, Result};

/// Result of one decode attempt.
#[derive(Debug)]
pub enum DecodeOutcome {
    Decoded(DynamicImage),
    Failed(String),
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeOutcome::Decoded(_))
    }
}

/// One strategy for turning encoded bytes into pixels.
pub trait RasterDecoder: Send + Sync {
    fn name(&self) -> &'static str;
    fn decode(&self, bytes: &[u8]) -> DecodeOutcome;
}

/// Decodes anything the `image` crate recognises from its magic bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl RasterDecoder for ImageCrateDecoder {
    fn name(&self) -> &'static str {
        "image"
    }

    fn decode(&self, bytes: &[u8]) -> DecodeOutcome {
        match image::load_from_memory(bytes) {
            Ok(img) => DecodeOutcome::Decoded(img),
            Err(e) => DecodeOutcome::Failed(e.to_string()),
        }
    }
}

/// Decodes the primary image of a HEIC/HEIF container through libheif.
#[cfg(feature = "heic")]
#[derive(Debug, Default, Clone, Copy)]
pub struct HeifDecoder;

#[cfg(feature = "heic")]
impl HeifDecoder {
    fn decode_rgb(bytes: &[u8]) -> std::result::Result<DynamicImage, String> {
        use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(bytes).map_err(|e| e.to_string())?;
        let handle = ctx.primary_image_handle().map_err(|e| e.to_string())?;
        let decoded = lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(|e| e.to_string())?;

        let planes = decoded.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| "decoded HEIF image has no interleaved plane".to_string())?;
        let (width, height) = (plane.width, plane.height);
        let row_len = width as usize * 3;

        let mut rgb = Vec::with_capacity(row_len * height as usize);
        for row in plane.data.chunks(plane.stride).take(height as usize) {
            rgb.extend_from_slice(&row[..row_len]);
        }
        image::RgbImage::from_raw(width, height, rgb)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| format!("HEIF plane too small for {}x{}", width, height))
    }
}

#[cfg(feature = "heic")]
impl RasterDecoder for HeifDecoder {
    fn name(&self) -> &'static str {
        "heif"
    }

    fn decode(&self, bytes: &[u8]) -> DecodeOutcome {
        match Self::decode_rgb(bytes) {
            Ok(img) => DecodeOutcome::Decoded(img),
            Err(reason) => DecodeOutcome::Failed(reason),
        }
    }
}

/// Ordered list of decoders; the first success wins.
pub struct DecoderChain {
    decoders: Vec<Box<dyn RasterDecoder>>,
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecoderChain {
    pub fn empty() -> Self {
        Self {
            decoders: Vec::new(),
        }
    }

    /// `image` crate first, then libheif when built with the `heic` feature.
    pub fn standard() -> Self {
        let chain = Self::empty().with(ImageCrateDecoder);
        #[cfg(feature = "heic")]
        let chain = chain.with(HeifDecoder);
        chain
    }

    pub fn with<D: RasterDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Try each decoder in turn. On total failure the reasons are joined.
    pub fn decode(&self, bytes: &[u8]) -> DecodeOutcome {
        let mut reasons = Vec::with_capacity(self.decoders.len());
        for (attempt, decoder) in self.decoders.iter().enumerate() {
            match decoder.decode(bytes) {
                DecodeOutcome::Decoded(img) => {
                    if attempt > 0 {
                        info!("Decoded with fallback decoder '{}'", decoder.name());
                    }
                    return DecodeOutcome::Decoded(img);
                }
                DecodeOutcome::Failed(reason) => {
                    debug!("Decoder '{}' failed: {}", decoder.name(), reason);
                    reasons.push(format!("{}: {}", decoder.name(), reason));
                }
            }
        }
        if reasons.is_empty() {
            reasons.push("no decoders configured".to_string());
        }
        DecodeOutcome::Failed(reasons.join("; "))
    }

    /// Decode and normalize to the 3-channel raster the enhancer expects.
    pub fn decode_raster(&self, name: &str, bytes: &[u8]) -> Result<RasterBuffer> {
        match self.decode(bytes) {
            DecodeOutcome::Decoded(img) => Ok(RasterBuffer::from_dynamic(&img)),
            DecodeOutcome::Failed(reason) => Err(Error::Decode {
                name: name.to_string(),
                reason,
            }),
        }
    }

    /// Decode and normalize to RGBA for use as a logo.
    pub fn decode_logo(&self, name: &str, bytes: &[u8]) -> Result<LogoImage> {
        match self.decode(bytes) {
            DecodeOutcome::Decoded(img) => Ok(LogoImage::from_dynamic(&img)),
            DecodeOutcome::Failed(reason) => Err(Error::Decode {
                name: name.to_string(),
                reason,
            }),
        }
    }
}
