use serde::{Deserialize, Serialize};

/// How a style ships its glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// One scalable file per glyph, e.g. SVG
    #[serde(alias = "v")]
    Vector,
    /// One file per glyph and per ladder size, e.g. PNG
    #[serde(alias = "r")]
    Raster,
    /// No assets, the system font renders the glyph
    #[serde(alias = "s")]
    System,
}

impl StyleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Vector => "vector",
            StyleKind::Raster => "raster",
            StyleKind::System => "system",
        }
    }

    /// Accepts both the long names and the single letter codes
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vector" | "v" => Some(StyleKind::Vector),
            "raster" | "r" => Some(StyleKind::Raster),
            "system" | "s" => Some(StyleKind::System),
            _ => None,
        }
    }
}

/// Result of checking whether a style's assets are present on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InstallStatus {
    NotInstalled,
    Installed,
    /// Raster style with some ladder sizes missing
    Partial { missing: usize },
}

impl InstallStatus {
    /// Numeric form: `< 0` not installed, `0` installed, `> 0` missing sizes
    pub fn code(&self) -> i32 {
        match self {
            InstallStatus::NotInstalled => -1,
            InstallStatus::Installed => 0,
            InstallStatus::Partial { missing } => i32::try_from(*missing).unwrap_or(i32::MAX),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallStatus::NotInstalled => "not installed",
            InstallStatus::Installed => "installed",
            InstallStatus::Partial { .. } => "partially installed",
        }
    }

    pub fn is_usable(&self) -> bool {
        !matches!(self, InstallStatus::NotInstalled)
    }
}
