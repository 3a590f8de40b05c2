use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Compression, EnhanceOption, EnhanceSet, LogoPosition};

/// Default value for every enhancement slider.
pub const DEFAULT_SLIDER: i32 = 25;
/// Default logo opacity.
pub const DEFAULT_OPACITY: f32 = 0.8;
/// Default logo width relative to the base image width.
pub const DEFAULT_SCALE: f32 = 0.25;

/// Which enhancement stages run, plus their slider values.
///
/// Sliders are nominally 0..=100 but are never clamped; they are only read
/// when the matching option is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementOptions {
    pub options: EnhanceSet,
    pub brightness_val: i32,
    pub contrast_val: i32,
    pub sharpen_val: i32,
}

impl Default for EnhancementOptions {
    fn default() -> Self {
        Self {
            options: EnhanceSet::empty(),
            brightness_val: DEFAULT_SLIDER,
            contrast_val: DEFAULT_SLIDER,
            sharpen_val: DEFAULT_SLIDER,
        }
    }
}

impl EnhancementOptions {
    pub fn with_options<I: IntoIterator<Item = EnhanceOption>>(options: I) -> Self {
        Self {
            options: options.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn has(&self, option: EnhanceOption) -> bool {
        self.options.contains(option)
    }
}

/// Logo placement settings, independent of the logo pixels themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPlacement {
    pub position: LogoPosition,
    /// Multiplier applied once to the logo alpha channel.
    pub opacity: f32,
    /// Logo width as a fraction of the base width.
    pub scale: f32,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            position: LogoPosition::TopRight,
            opacity: DEFAULT_OPACITY,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Processing parameters suitable for config files and CLI presets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingParams {
    pub enhancement: EnhancementOptions,
    pub logo: LogoPlacement,
    pub compression: Compression,
}

impl ProcessingParams {
    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = ProcessingParams::default();
        assert!(params.enhancement.options.is_empty());
        assert_eq!(params.enhancement.brightness_val, 25);
        assert_eq!(params.enhancement.contrast_val, 25);
        assert_eq!(params.enhancement.sharpen_val, 25);
        assert_eq!(params.logo.position, LogoPosition::TopRight);
        assert_eq!(params.logo.opacity, 0.8);
        assert_eq!(params.logo.scale, 0.25);
        assert_eq!(params.compression, Compression::Best);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params = ProcessingParams::from_json_str(
            r#"{
                "enhancement": { "options": ["sharpen", "denoise"], "sharpen_val": 60 },
                "logo": { "position": "center" }
            }"#,
        )
        .unwrap();

        assert!(params.enhancement.has(EnhanceOption::Sharpen));
        assert!(params.enhancement.has(EnhanceOption::Denoise));
        assert!(!params.enhancement.has(EnhanceOption::Contrast));
        assert_eq!(params.enhancement.sharpen_val, 60);
        assert_eq!(params.enhancement.brightness_val, 25);
        assert_eq!(params.logo.position, LogoPosition::Center);
        assert_eq!(params.logo.opacity, 0.8);
    }

    #[test]
    fn json_round_trip() {
        let params = ProcessingParams {
            enhancement: EnhancementOptions {
                options: EnhanceSet::from([EnhanceOption::Brightness]),
                brightness_val: 140,
                contrast_val: -10,
                sharpen_val: 0,
            },
            logo: LogoPlacement {
                position: LogoPosition::BottomLeft,
                opacity: 0.5,
                scale: 0.1,
            },
            compression: Compression::Fast,
        };
        let json = params.to_json_string().unwrap();
        assert_eq!(ProcessingParams::from_json_str(&json).unwrap(), params);
    }
}
