#![doc = r#"
photomark — batch photo enhancement with logo watermarking.

This crate turns uploaded photos into tone-adjusted, optionally denoised and
sharpened PNGs, with an optional logo composited onto each one. It powers the
`photomark` CLI and can be embedded in your own Rust applications (for
example behind an HTTP upload handler).

Pipeline
--------
1. Decode: the `image` crate first, then (with the `heic` feature) libheif as a
   single fallback. Any decoded image is normalized to 8-bit RGB.
2. Enhance, in a fixed order: bilateral denoise, brightness/contrast around
   mid-gray, unsharp-mask sharpen.
3. Composite: the logo is resized to a fraction of the image width (Lanczos3),
   its alpha scaled once by the opacity, anchored 20 px from the chosen edges
   and alpha-blended.
4. Encode: lossless PNG.

Add dependency
--------------
```toml
[dependencies]
photomark = { version = "0.1", features = ["heic"] }
```

Quick start: enhance one raster in memory
-----------------------------------------
```rust
use photomark::{EnhanceOption, EnhancementOptions, RasterBuffer, enhance};

let photo = RasterBuffer::filled(64, 48, [120, 110, 100]);
let options = EnhancementOptions {
    brightness_val: 60,
    contrast_val: 55,
    ..EnhancementOptions::with_options([EnhanceOption::Brightness, EnhanceOption::Contrast])
};
let out = enhance(&photo, &options);
assert_eq!((out.width(), out.height()), (64, 48));
```

Stamp a logo
------------
```rust
use photomark::{LogoImage, LogoOverlay, LogoPlacement, LogoPosition, RasterBuffer, composite};

fn main() -> photomark::Result<()> {
    let photo = RasterBuffer::filled(400, 300, [30, 30, 30]);
    let logo = LogoOverlay::new(
        LogoImage::filled(300, 150, [255, 255, 255, 255]),
        LogoPlacement { position: LogoPosition::BottomRight, opacity: 0.8, scale: 0.25 },
    );
    let stamped = composite(&photo, &logo)?;
    assert_eq!(stamped.width(), 400);
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use photomark::{BatchProcessor, ProcessingParams, Upload};

fn main() -> photomark::Result<()> {
    let params = ProcessingParams::from_json_file(Path::new("params.json"))?;
    let processor = BatchProcessor::new(params, "processed");

    let uploads = vec![
        Upload::from_path(Path::new("IMG_0001.jpg"))?,
        Upload::from_path(Path::new("IMG_0002.heic"))?,
    ];
    let logo = Upload::from_path(Path::new("logo.png"))?;

    let report = processor.process_batch(&uploads, Some(&logo))?;
    println!("processed={:?} errors={}", report.processed, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `photomark::Result<T>`. Within a batch, an image
that fails to decode or encode is recorded in `BatchReport::failures` and the
remaining images are still processed; only setup errors (output directory,
logo decode) abort the batch.

Feature flags
-------------
- `heic`: adds the libheif-backed fallback decoder (needs system libheif).
- `full`: enables every optional feature.

Useful modules
--------------
- [`api`] — high-level entry points and batch processing.
- [`core`](crate::core) — raster types, enhancement and compositing stages.
- [`types`] — enums and the option bitmask (`EnhanceOption`, `EnhanceSet`, `LogoPosition`).
- [`io`] — decoder chain and PNG writer.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::{EnhancementOptions, LogoPlacement, ProcessingParams};
pub use crate::core::raster::{FloatRaster, LogoImage, RasterBuffer};
pub use error::{Error, Result};
pub use types::{Compression, EnhanceOption, EnhanceSet, LogoPosition};

// Stages
pub use crate::core::processing::composite::{LogoOverlay, composite};
pub use crate::core::processing::enhance::enhance;
pub use crate::core::processing::pipeline::process_raster;

// Decoding
pub use io::decode::{DecodeOutcome, DecoderChain, RasterDecoder};

// High-level API re-exports
pub use api::{
    BatchProcessor, BatchReport, ItemFailure, Upload, iterate_input_files, output_file_name,
    process_bytes_to_png, process_raster_to_png,
};
