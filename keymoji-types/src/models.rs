use serde::{Deserialize, Serialize};

use crate::enums::StyleKind;

/// A named emoji asset set
///
/// Assets live at `<base>/<sub>/<dir>[/<size>]/<identifier>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    /// Directory below the emoji sub directory, usually `<set>/<version>`
    #[serde(default)]
    pub dir: String,
    /// File extension without the dot
    #[serde(default)]
    pub ext: String,
    pub kind: StyleKind,
}

impl Style {
    pub fn new(
        name: impl Into<String>,
        dir: impl Into<String>,
        ext: impl Into<String>,
        kind: StyleKind,
    ) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            ext: ext.into(),
            kind,
        }
    }

    /// The "use the system font" style
    pub fn system() -> Self {
        Self::new("System", "", "", StyleKind::System)
    }

    pub fn is_system(&self) -> bool {
        self.kind == StyleKind::System
    }

    /// A non-system style without a directory or extension cannot locate assets
    pub fn is_well_formed(&self) -> bool {
        self.is_system() || (!self.dir.trim().is_empty() && !self.ext.trim().is_empty())
    }
}

/// One emoji run found in a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMatch {
    /// Hyphen-joined lowercase hex code points, the asset file stem
    pub identifier: String,
    /// The matched text as it appeared in the input
    pub raw: String,
    /// Byte offset of the run in the input
    pub start: usize,
}

impl EmojiMatch {
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCount {
    pub emoji: usize,
    /// Characters left once every emoji run is removed
    pub plain: usize,
}

/// Display size requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRequest {
    pub size: f64,
    /// Replaces the computed size for raster styles when positive
    #[serde(default)]
    pub max_raster_size: u32,
    /// Skip the growth factor applied to inline glyphs
    #[serde(default)]
    pub no_grow: bool,
}

impl SizeRequest {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            max_raster_size: 0,
            no_grow: false,
        }
    }

    pub fn exact(size: u32) -> Self {
        Self {
            size: f64::from(size),
            max_raster_size: size,
            no_grow: true,
        }
    }
}

/// Where the assets for a style and size live, if anywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub use_system: bool,
    /// Directory holding the glyph files, empty when `use_system` is set
    /// before a path could be computed
    pub style_path: String,
    pub effective_size: u32,
}

impl Resolution {
    pub fn system(effective_size: u32) -> Self {
        Self {
            use_system: true,
            style_path: String::new(),
            effective_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub size: f64,
    #[serde(default)]
    pub no_grow: bool,
    #[serde(default)]
    pub max_raster_size: u32,
    /// Keep the original text of runs that are not replaced by an image
    pub include_plain: bool,
    /// Emit `<img>` markup instead of bare paths
    pub as_markup: bool,
}

impl ParseOptions {
    pub fn markup(size: f64) -> Self {
        Self {
            size,
            no_grow: false,
            max_raster_size: 0,
            include_plain: true,
            as_markup: true,
        }
    }

    pub fn single_url(size: f64) -> Self {
        Self {
            size,
            no_grow: false,
            max_raster_size: 0,
            include_plain: false,
            as_markup: false,
        }
    }

    pub fn size_request(&self) -> SizeRequest {
        SizeRequest {
            size: self.size,
            max_raster_size: self.max_raster_size,
            no_grow: self.no_grow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub emoji_count: usize,
    pub plain_count: usize,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_well_formed() {
        assert!(Style::system().is_well_formed());
        assert!(Style::new("Twemoji", "twemoji/13.0.1", "svg", StyleKind::Vector).is_well_formed());
        assert!(!Style::new("Broken", "", "svg", StyleKind::Vector).is_well_formed());
        assert!(!Style::new("Broken", "broken/1", " ", StyleKind::Raster).is_well_formed());
    }

    #[test]
    fn test_style_deserialize_short_kind() {
        let style: Style =
            serde_json::from_str(r#"{"name":"Noto","dir":"noto/15.0","ext":"png","kind":"r"}"#)
                .unwrap();
        assert_eq!(style.kind, StyleKind::Raster);
        assert_eq!(style.dir, "noto/15.0");
    }

    #[test]
    fn test_match_end() {
        let m = EmojiMatch {
            identifier: "1f600".to_string(),
            raw: "😀".to_string(),
            start: 3,
        };
        assert_eq!(m.end(), 7);
    }

    #[test]
    fn test_size_request_from_options() {
        let mut options = ParseOptions::markup(24.0);
        options.no_grow = true;
        let request = options.size_request();
        assert_eq!(request.size, 24.0);
        assert!(request.no_grow);
        assert_eq!(request.max_raster_size, 0);
        assert!(!ParseOptions::single_url(24.0).include_plain);
    }
}
