//! Source quality tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality tier of a raw source, as labelled by the metadata provider.
///
/// Labels that are not one of the known resolutions are kept verbatim in
/// [`Quality::Unknown`] so they can still be displayed; they always rank
/// below every known tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    Uhd2160,
    Fhd1080,
    Hd720,
    Sd480,
    Unknown(String),
}

impl Quality {
    /// Ranking weight; higher is better.
    pub fn tier(&self) -> u8 {
        match self {
            Quality::Uhd2160 => 4,
            Quality::Fhd1080 => 3,
            Quality::Hd720 => 2,
            Quality::Sd480 => 1,
            Quality::Unknown(_) => 0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Quality::Uhd2160 => "2160p",
            Quality::Fhd1080 => "1080p",
            Quality::Hd720 => "720p",
            Quality::Sd480 => "480p",
            Quality::Unknown(label) => label,
        }
    }
}

impl From<&str> for Quality {
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "2160p" | "4k" => Quality::Uhd2160,
            "1080p" => Quality::Fhd1080,
            "720p" => Quality::Hd720,
            "480p" => Quality::Sd480,
            _ => Quality::Unknown(label.to_string()),
        }
    }
}

impl From<String> for Quality {
    fn from(label: String) -> Self {
        Quality::from(label.as_str())
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.label().to_string()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
