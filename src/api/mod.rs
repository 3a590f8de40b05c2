//! High-level, ergonomic library API: process uploads to PNG files or in-memory
//! buffers, batch helpers with per-image failure reporting, and directory
//! listing. Prefer these entrypoints over the low-level processing modules.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::params::ProcessingParams;
use crate::core::processing::composite::LogoOverlay;
use crate::core::processing::pipeline::process_raster;
use crate::core::raster::RasterBuffer;
use crate::error::{Error, Result};
use crate::io::decode::DecoderChain;
use crate::io::writers::png::{encode_rgb_png_to_vec, write_rgb_png};

/// One submitted file: its client-side name and raw encoded bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// An upload that could not be turned into an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

/// Batch processing report
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Output file names (not paths), in upload order.
    pub processed: Vec<String>,
    /// Uploads without a usable file name.
    pub skipped: usize,
    pub errors: usize,
    pub failures: Vec<ItemFailure>,
}

/// Output name for an upload: directory components are stripped and the
/// extension is replaced by `.png`. Returns `None` for an empty name.
pub fn output_file_name(upload_name: &str) -> Option<String> {
    let base = upload_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = Path::new(base).file_stem()?.to_string_lossy();
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}.png", stem))
}

/// Return the regular files directly inside `input_dir`, sorted by name.
pub fn iterate_input_files(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Enhance (and optionally watermark) an already-decoded raster, returning PNG bytes.
pub fn process_raster_to_png(
    image: &RasterBuffer,
    params: &ProcessingParams,
    logo: Option<&LogoOverlay>,
) -> Result<Vec<u8>> {
    let out = process_raster(image, &params.enhancement, logo)?;
    encode_rgb_png_to_vec(&out, params.compression)
}

/// Decode, process and encode one image entirely in memory.
pub fn process_bytes_to_png(
    name: &str,
    bytes: &[u8],
    params: &ProcessingParams,
    logo: Option<&LogoOverlay>,
) -> Result<Vec<u8>> {
    let raster = DecoderChain::standard().decode_raster(name, bytes)?;
    process_raster_to_png(&raster, params, logo)
}

/// Processes batches of uploads into a fixed output directory.
pub struct BatchProcessor {
    params: ProcessingParams,
    output_dir: PathBuf,
    decoders: DecoderChain,
}

impl BatchProcessor {
    pub fn new(params: ProcessingParams, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            params,
            output_dir: output_dir.into(),
            decoders: DecoderChain::standard(),
        }
    }

    /// Replace the default decoder chain.
    pub fn with_decoders(mut self, decoders: DecoderChain) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Decode a logo once so it can be shared across the whole batch.
    pub fn prepare_logo(&self, logo: &Upload) -> Result<LogoOverlay> {
        let image = self.decoders.decode_logo(&logo.name, &logo.bytes)?;
        info!(
            "Logo '{}' decoded: {}x{}",
            logo.name,
            image.width(),
            image.height()
        );
        Ok(LogoOverlay::new(image, self.params.logo))
    }

    /// Decode, process and write one upload. Returns the written path.
    pub fn process_upload(&self, upload: &Upload, logo: Option<&LogoOverlay>) -> Result<PathBuf> {
        let file_name = output_file_name(&upload.name).ok_or_else(|| Error::InvalidArgument {
            arg: "upload name",
            value: upload.name.clone(),
        })?;
        let raster = self.decoders.decode_raster(&upload.name, &upload.bytes)?;
        info!(
            "Processing '{}' ({}x{})",
            upload.name,
            raster.width(),
            raster.height()
        );

        let out = process_raster(&raster, &self.params.enhancement, logo)?;
        let output_path = self.output_dir.join(file_name);
        write_rgb_png(&output_path, &out, self.params.compression)?;
        Ok(output_path)
    }

    /// Process every upload. A failing image is recorded in the report and the
    /// batch carries on; only setup problems (output dir, logo) abort.
    pub fn process_batch(&self, uploads: &[Upload], logo: Option<&Upload>) -> Result<BatchReport> {
        std::fs::create_dir_all(&self.output_dir).map_err(Error::from)?;

        let overlay = match logo {
            Some(logo) if !logo.name.is_empty() => Some(self.prepare_logo(logo)?),
            _ => None,
        };
        info!(
            "Batch of {} image(s), logo present: {}",
            uploads.len(),
            overlay.is_some()
        );

        let mut report = BatchReport::default();
        let mut written: HashSet<String> = HashSet::new();
        for upload in uploads {
            let Some(file_name) = output_file_name(&upload.name) else {
                info!("Skipping upload without a file name");
                report.skipped += 1;
                continue;
            };
            if written.contains(&file_name) {
                warn!(
                    "'{}' maps to {}, already written earlier in this batch; overwriting",
                    upload.name, file_name
                );
            }

            match self.process_upload(upload, overlay.as_ref()) {
                Ok(path) => {
                    info!("Successfully processed: {} -> {:?}", upload.name, path);
                    if written.insert(file_name.clone()) {
                        report.processed.push(file_name);
                    }
                }
                Err(e) => {
                    warn!("Could not process {}: {}", upload.name, e);
                    report.errors += 1;
                    report.failures.push(ItemFailure {
                        name: upload.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch complete: processed={} skipped={} errors={}",
            report.processed.len(),
            report.skipped,
            report.errors
        );
        Ok(report)
    }
}
