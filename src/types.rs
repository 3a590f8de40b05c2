//! Shared types and enums used across photomark.
//! Includes `EnhanceOption` and its bitmask set `EnhanceSet`, `LogoPosition`,
//! and the PNG `Compression` level.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhanceOption {
    Denoise,
    Brightness,
    Contrast,
    Sharpen,
}

impl EnhanceOption {
    pub const ALL: [EnhanceOption; 4] = [
        EnhanceOption::Denoise,
        EnhanceOption::Brightness,
        EnhanceOption::Contrast,
        EnhanceOption::Sharpen,
    ];

    const fn bit(self) -> u8 {
        match self {
            EnhanceOption::Denoise => 1 << 0,
            EnhanceOption::Brightness => 1 << 1,
            EnhanceOption::Contrast => 1 << 2,
            EnhanceOption::Sharpen => 1 << 3,
        }
    }
}

impl std::fmt::Display for EnhanceOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnhanceOption::Denoise => "denoise",
            EnhanceOption::Brightness => "brightness",
            EnhanceOption::Contrast => "contrast",
            EnhanceOption::Sharpen => "sharpen",
        };
        write!(f, "{}", s)
    }
}

/// Set of enabled enhancement stages, stored as a bitmask.
/// Serialized as a list of option names, e.g. `["denoise", "sharpen"]`.
#[derive(Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<EnhanceOption>", into = "Vec<EnhanceOption>")]
pub struct EnhanceSet(u8);

impl EnhanceSet {
    pub const fn empty() -> Self {
        EnhanceSet(0)
    }

    pub fn insert(&mut self, option: EnhanceOption) {
        self.0 |= option.bit();
    }

    pub fn remove(&mut self, option: EnhanceOption) {
        self.0 &= !option.bit();
    }

    pub const fn contains(self, option: EnhanceOption) -> bool {
        self.0 & option.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = EnhanceOption> {
        EnhanceOption::ALL
            .into_iter()
            .filter(move |option| self.contains(*option))
    }
}

impl FromIterator<EnhanceOption> for EnhanceSet {
    fn from_iter<I: IntoIterator<Item = EnhanceOption>>(iter: I) -> Self {
        let mut set = EnhanceSet::empty();
        for option in iter {
            set.insert(option);
        }
        set
    }
}

impl From<Vec<EnhanceOption>> for EnhanceSet {
    fn from(options: Vec<EnhanceOption>) -> Self {
        options.into_iter().collect()
    }
}

impl From<EnhanceSet> for Vec<EnhanceOption> {
    fn from(set: EnhanceSet) -> Self {
        set.iter().collect()
    }
}

impl<const N: usize> From<[EnhanceOption; N]> for EnhanceSet {
    fn from(options: [EnhanceOption; N]) -> Self {
        options.into_iter().collect()
    }
}

impl std::fmt::Debug for EnhanceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Where the logo is anchored on the base image.
///
/// Parsing is lenient: any unrecognized string maps to `TopRight`, which is
/// also the default placement.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogoPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl LogoPosition {
    /// Parse a position name, returning `None` for unrecognized input.
    pub fn parse_strict(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Some(LogoPosition::TopLeft),
            "top-right" => Some(LogoPosition::TopRight),
            "bottom-left" => Some(LogoPosition::BottomLeft),
            "bottom-right" => Some(LogoPosition::BottomRight),
            "center" => Some(LogoPosition::Center),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogoPosition::TopLeft => "top-left",
            LogoPosition::TopRight => "top-right",
            LogoPosition::BottomLeft => "bottom-left",
            LogoPosition::BottomRight => "bottom-right",
            LogoPosition::Center => "center",
        }
    }
}

impl From<&str> for LogoPosition {
    fn from(s: &str) -> Self {
        LogoPosition::parse_strict(s).unwrap_or_default()
    }
}

impl From<String> for LogoPosition {
    fn from(s: String) -> Self {
        LogoPosition::from(s.as_str())
    }
}

impl From<LogoPosition> for String {
    fn from(position: LogoPosition) -> Self {
        position.as_str().to_string()
    }
}

impl std::fmt::Display for LogoPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// PNG compression effort. All levels are lossless.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Fast,
    Default,
    #[default]
    Best,
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::Fast => write!(f, "fast"),
            Compression::Default => write!(f, "default"),
            Compression::Best => write!(f, "best"),
        }
    }
}
