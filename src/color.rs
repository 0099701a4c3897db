use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use palette::Srgb;
use palette::named;

use crate::data::model::QualityCategory;
use crate::error::ConfigError;

/// `#rrggbb` form understood by plotly.
pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: quality category → marker colour
// ---------------------------------------------------------------------------

/// Maps quality categories to marker colours.
///
/// Labels outside the map get `default_color` and are reported once each.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<QualityCategory, Srgb<u8>>,
    default_color: Srgb<u8>,
    reported: RefCell<BTreeSet<String>>,
}

impl Default for ColorMap {
    /// green / goldenrod / red / gray for the four published categories.
    fn default() -> Self {
        let mapping = BTreeMap::from([
            (QualityCategory::Good, named::GREEN),
            (QualityCategory::Acceptable, named::GOLDENROD),
            (QualityCategory::Contaminated, named::RED),
            (QualityCategory::InsufficientData, named::GRAY),
        ]);
        ColorMap::with_mapping(mapping)
    }
}

impl ColorMap {
    fn with_mapping(mapping: BTreeMap<QualityCategory, Srgb<u8>>) -> Self {
        ColorMap {
            mapping,
            default_color: named::GRAY,
            reported: RefCell::new(BTreeSet::new()),
        }
    }

    /// The built-in map with the given quality label → CSS colour name
    /// pairs overriding (or extending) it.
    pub fn from_names(names: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut mapping = ColorMap::default().mapping;
        for (label, name) in names {
            let color = named::from_str(&name.to_ascii_lowercase()).ok_or_else(|| {
                ConfigError::UnknownColor {
                    label: label.clone(),
                    name: name.clone(),
                }
            })?;
            mapping.insert(QualityCategory::parse(label), color);
        }
        Ok(ColorMap::with_mapping(mapping))
    }

    /// Look up the colour for a given quality category.
    pub fn color_for(&self, quality: &QualityCategory) -> Srgb<u8> {
        match self.mapping.get(quality) {
            Some(c) => *c,
            None => {
                if self.reported.borrow_mut().insert(quality.label().to_string()) {
                    log::warn!(
                        "No colour for quality '{}', using {}",
                        quality,
                        to_hex(self.default_color)
                    );
                }
                self.default_color
            }
        }
    }

    pub fn hex_for(&self, quality: &QualityCategory) -> String {
        to_hex(self.color_for(quality))
    }

    /// Labels that fell back to the default colour so far.
    pub fn unmapped_labels(&self) -> Vec<String> {
        self.reported.borrow().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_matches_css_names() {
        let cm = ColorMap::default();
        assert_eq!(cm.hex_for(&QualityCategory::Good), "#008000");
        assert_eq!(cm.hex_for(&QualityCategory::Acceptable), "#daa520");
        assert_eq!(cm.hex_for(&QualityCategory::Contaminated), "#ff0000");
        assert_eq!(cm.hex_for(&QualityCategory::InsufficientData), "#808080");
        assert!(cm.unmapped_labels().is_empty());
    }

    #[test]
    fn unmapped_label_falls_back_to_gray() {
        let cm = ColorMap::default();
        let odd = QualityCategory::parse("Sin clasificar");
        assert_eq!(cm.hex_for(&odd), "#808080");
        assert_eq!(cm.hex_for(&odd), "#808080");
        assert_eq!(cm.unmapped_labels(), vec!["Sin clasificar".to_string()]);
    }

    #[test]
    fn clone_keeps_mapping_and_reported_labels() {
        let cm = ColorMap::default();
        cm.hex_for(&QualityCategory::parse("Sin clasificar"));
        let copy = cm.clone();
        assert_eq!(copy.hex_for(&QualityCategory::Acceptable), "#daa520");
        assert_eq!(copy.unmapped_labels(), cm.unmapped_labels());
    }

    #[test]
    fn from_names_resolves_and_rejects() {
        let names = BTreeMap::from([
            ("Aceptable".to_string(), "Orange".to_string()),
            ("Sin clasificar".to_string(), "purple".to_string()),
        ]);
        let cm = ColorMap::from_names(&names).unwrap();
        assert_eq!(cm.hex_for(&QualityCategory::Acceptable), "#ffa500");
        assert_eq!(cm.hex_for(&QualityCategory::parse("Sin clasificar")), "#800080");
        // labels not listed keep the built-in colours
        assert_eq!(cm.hex_for(&QualityCategory::Good), "#008000");
        assert_eq!(cm.hex_for(&QualityCategory::Contaminated), "#ff0000");
        assert!(cm.unmapped_labels().is_empty());

        let bad = BTreeMap::from([("Aceptable".to_string(), "not-a-colour".to_string())]);
        assert!(matches!(
            ColorMap::from_names(&bad),
            Err(ConfigError::UnknownColor { .. })
        ));
    }
}
