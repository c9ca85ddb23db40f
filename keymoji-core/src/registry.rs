use std::collections::BTreeMap;

use keymoji_types::{Style, StyleKind};

use crate::error::{Error, Result};

/// Styles known by key, e.g. `"twemoji"`
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: BTreeMap<String, Style>,
}

impl StyleRegistry {
    /// Registry without any style
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// The styles shipped with keymoji
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        // CC-BY-SA 4.0
        registry.insert(
            "openmoji",
            Style::new("OpenMoji", "openmoji/13.0.0", "svg", StyleKind::Vector),
        );
        // CC-BY 4.0
        registry.insert(
            "twemoji",
            Style::new("Twemoji", "twemoji/13.0.1", "svg", StyleKind::Vector),
        );
        // proprietary, not distributed
        registry.insert(
            "whatsapp",
            Style::new("Whatsapp", "whatsapp/2.20.206.24", "png", StyleKind::Raster),
        );
        registry.insert("system", Style::system());
        registry
    }

    /// Add or replace a style
    pub fn insert(&mut self, key: impl Into<String>, style: Style) -> Option<Style> {
        self.styles.insert(key.into().to_lowercase(), style)
    }

    /// Add a style after checking it can locate assets
    pub fn register(&mut self, key: impl Into<String>, style: Style) -> Result<()> {
        let key = key.into();
        if !style.is_well_formed() {
            return Err(Error::InvalidStyle(format!(
                "{} needs a directory and an extension",
                key
            )));
        }
        self.insert(key, style);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Style> {
        self.styles.get(&key.to_lowercase())
    }

    pub fn require(&self, key: &str) -> Result<&Style> {
        self.get(key)
            .ok_or_else(|| Error::UnknownStyle(key.to_string()))
    }

    /// Styles in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.styles.iter().map(|(key, style)| (key.as_str(), style))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
