use clap::Parser;
use std::path::PathBuf;

use photomark::types::{Compression, EnhanceOption};

#[derive(Parser, Debug)]
#[command(name = "photomark", version, about = "photomark CLI")]
pub struct CliArgs {
    /// Input image file (repeatable)
    #[arg(short, long)]
    pub input: Vec<PathBuf>,

    /// Input directory; every regular file inside is processed
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the processed PNG files
    #[arg(short, long, default_value = "processed")]
    pub output_dir: PathBuf,

    /// Logo image composited onto every output
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Enhancements to apply, comma separated (denoise, brightness, contrast, sharpen)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub options: Vec<EnhanceOption>,

    /// Brightness slider, nominally 0-100 (default 25, 50 is neutral)
    #[arg(long, allow_negative_numbers = true)]
    pub brightness_val: Option<i32>,

    /// Contrast slider, nominally 0-100 (default 25, 50 is neutral)
    #[arg(long, allow_negative_numbers = true)]
    pub contrast_val: Option<i32>,

    /// Sharpen strength, nominally 0-100 (default 25, 0 disables)
    #[arg(long, allow_negative_numbers = true)]
    pub sharpen_val: Option<i32>,

    /// Logo position: top-left, top-right, bottom-left, bottom-right or center.
    /// Anything else falls back to top-right.
    #[arg(long)]
    pub position: Option<String>,

    /// Logo opacity (default 0.8)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Logo width relative to the image width (default 0.25)
    #[arg(long)]
    pub scale: Option<f32>,

    /// PNG compression effort (output is always lossless)
    #[arg(long, value_enum)]
    pub compression: Option<Compression>,

    /// JSON file with processing parameters; explicit flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the batch report as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
