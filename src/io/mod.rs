//! I/O layer at the edge of the core: the decoder chain that turns uploaded
//! bytes into rasters, and `writers` for lossless PNG output.
pub mod decode;
pub use decode::{DecodeOutcome, DecoderChain, ImageCrateDecoder, RasterDecoder};

pub mod writers;
