//! Common types used across the advisory pipeline

use serde::{Deserialize, Serialize};

/// Supported advisory languages
///
/// Advisory templates are authored in English, which is the source language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "english", alias = "source")]
    English,
    #[serde(rename = "kn", alias = "kannada")]
    Kannada,
}

impl Language {
    /// The language advisory templates are written in
    pub const SOURCE: Language = Language::English;

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Kannada => "kn",
        }
    }

    pub fn is_source(&self) -> bool {
        *self == Self::SOURCE
    }
}

impl std::str::FromStr for Language {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" | "source" => Ok(Language::English),
            "kn" | "kannada" => Ok(Language::Kannada),
            _ => Err("Unsupported language. Must be one of: en, kn"),
        }
    }
}

/// Advisory urgency, ordered from least to most urgent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Advisory,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Advisory => write!(f, "advisory"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Advisory category
///
/// Declaration order is the tie-break order used when sorting advisories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisoryCategory {
    Irrigation,
    PestRisk,
    PlantingWindow,
    HarvestTiming,
    General,
}

impl std::fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryCategory::Irrigation => write!(f, "irrigation"),
            AdvisoryCategory::PestRisk => write!(f, "pest-risk"),
            AdvisoryCategory::PlantingWindow => write!(f, "planting-window"),
            AdvisoryCategory::HarvestTiming => write!(f, "harvest-timing"),
            AdvisoryCategory::General => write!(f, "general"),
        }
    }
}
