use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use photomark::api::{BatchProcessor, Upload, iterate_input_files};
use photomark::types::LogoPosition;
use photomark::{EnhanceSet, ProcessingParams};

use super::args::CliArgs;
use super::errors::AppError;

/// Start from the config file (or defaults) and apply every flag that was given.
pub fn build_params(args: &CliArgs) -> Result<ProcessingParams, AppError> {
    let mut params = match &args.config {
        Some(path) => {
            info!("Loading parameters from {:?}", path);
            ProcessingParams::from_json_file(path)?
        }
        None => ProcessingParams::default(),
    };

    if !args.options.is_empty() {
        params.enhancement.options = args.options.iter().copied().collect::<EnhanceSet>();
    }
    if let Some(v) = args.brightness_val {
        params.enhancement.brightness_val = v;
    }
    if let Some(v) = args.contrast_val {
        params.enhancement.contrast_val = v;
    }
    if let Some(v) = args.sharpen_val {
        params.enhancement.sharpen_val = v;
    }
    if let Some(position) = &args.position {
        if LogoPosition::parse_strict(position).is_none() {
            warn!(
                "Unrecognized logo position '{}', using {}",
                position,
                LogoPosition::default()
            );
        }
        params.logo.position = LogoPosition::from(position.as_str());
    }
    if let Some(opacity) = args.opacity {
        params.logo.opacity = opacity;
    }
    if let Some(scale) = args.scale {
        params.logo.scale = scale;
    }
    if let Some(compression) = args.compression {
        params.compression = compression;
    }

    Ok(params)
}

fn collect_inputs(args: &CliArgs) -> Result<Vec<PathBuf>, AppError> {
    let mut inputs = args.input.clone();
    if let Some(dir) = &args.input_dir {
        info!("Reading input directory: {:?}", dir);
        inputs.extend(iterate_input_files(dir)?);
    }
    if inputs.is_empty() {
        return Err(AppError::NoInputs);
    }
    Ok(inputs)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let params = build_params(&args)?;
    let inputs = collect_inputs(&args)?;

    let mut uploads = Vec::with_capacity(inputs.len());
    let mut unreadable = Vec::new();
    for path in &inputs {
        match Upload::from_path(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                warn!("Could not read {:?}: {}", path, e);
                unreadable.push(path.display().to_string());
            }
        }
    }
    let logo = args
        .logo
        .as_deref()
        .map(Upload::from_path)
        .transpose()
        .map_err(AppError::from)?;

    info!("Output directory: {:?}", args.output_dir);
    let processor = BatchProcessor::new(params, &args.output_dir);
    let mut report = processor
        .process_batch(&uploads, logo.as_ref())
        .map_err(AppError::from)?;
    for path in unreadable {
        report.errors += 1;
        report.failures.push(photomark::api::ItemFailure {
            name: path,
            reason: "unreadable input file".to_string(),
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(AppError::from)?);
    } else {
        for name in &report.processed {
            println!("{}", processor.output_dir().join(name).display());
        }
        for failure in &report.failures {
            eprintln!("failed: {}: {}", failure.name, failure.reason);
        }
    }

    info!("Processed: {}", report.processed.len());
    info!("Skipped: {}", report.skipped);
    info!("Errors: {}", report.errors);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use photomark::types::{Compression, EnhanceOption};

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("photomark").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let params = build_params(&parse(&["-i", "a.jpg"])).unwrap();
        assert_eq!(params, ProcessingParams::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "-i",
            "a.jpg",
            "--options",
            "denoise,sharpen",
            "--sharpen-val",
            "70",
            "--brightness-val",
            "-20",
            "--position",
            "bottom-left",
            "--opacity",
            "0.5",
            "--compression",
            "fast",
        ]);
        let params = build_params(&args).unwrap();
        assert!(params.enhancement.has(EnhanceOption::Denoise));
        assert!(params.enhancement.has(EnhanceOption::Sharpen));
        assert!(!params.enhancement.has(EnhanceOption::Contrast));
        assert_eq!(params.enhancement.sharpen_val, 70);
        assert_eq!(params.enhancement.brightness_val, -20);
        assert_eq!(params.enhancement.contrast_val, 25);
        assert_eq!(params.logo.position, LogoPosition::BottomLeft);
        assert_eq!(params.logo.opacity, 0.5);
        assert_eq!(params.logo.scale, 0.25);
        assert_eq!(params.compression, Compression::Fast);
    }

    #[test]
    fn unknown_position_becomes_top_right() {
        let params = build_params(&parse(&["--position", "middle"])).unwrap();
        assert_eq!(params.logo.position, LogoPosition::TopRight);
    }

    #[test]
    fn config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("params.json");
        std::fs::write(
            &config,
            r#"{ "enhancement": { "options": ["contrast"], "contrast_val": 80 },
                 "logo": { "position": "center", "scale": 0.1 } }"#,
        )
        .unwrap();
        let args = parse(&["--config", config.to_str().unwrap(), "--scale", "0.3"]);
        let params = build_params(&args).unwrap();
        assert!(params.enhancement.has(EnhanceOption::Contrast));
        assert_eq!(params.enhancement.contrast_val, 80);
        assert_eq!(params.logo.position, LogoPosition::Center);
        assert_eq!(params.logo.scale, 0.3);
    }

    #[test]
    fn no_inputs_is_an_error() {
        assert!(matches!(collect_inputs(&parse(&[])), Err(AppError::NoInputs)));
    }
}
