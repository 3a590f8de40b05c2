use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::core::raster::RasterBuffer;
use crate::error::Result;
use crate::types::Compression;

fn compression_type(level: Compression) -> CompressionType {
    match level {
        Compression::Fast => CompressionType::Fast,
        Compression::Default => CompressionType::Default,
        Compression::Best => CompressionType::Best,
    }
}

/// Encode an RGB raster as a lossless 8-bit PNG into `writer`.
pub fn encode_rgb_png<W: Write>(
    writer: W,
    raster: &RasterBuffer,
    compression: Compression,
) -> Result<()> {
    let encoder =
        PngEncoder::new_with_quality(writer, compression_type(compression), FilterType::Adaptive);
    encoder.write_image(
        raster.as_bytes(),
        raster.width() as u32,
        raster.height() as u32,
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

pub fn encode_rgb_png_to_vec(raster: &RasterBuffer, compression: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_rgb_png(&mut out, raster, compression)?;
    Ok(out)
}

pub fn write_rgb_png(output: &Path, raster: &RasterBuffer, compression: Compression) -> Result<()> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    encode_rgb_png(&mut writer, raster, compression)?;
    writer.flush()?;
    debug!(
        "Wrote {}x{} PNG ({}) to {:?}",
        raster.width(),
        raster.height(),
        compression,
        output
    );
    Ok(())
}
