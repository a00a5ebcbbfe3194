//! Font reference resolution.
//!
//! The editor works with logical family names ("Open Sans"); the rendering
//! service wants a concrete asset reference such as
//! `OpenSans/OpenSans-BoldItalic`.

use crate::elements::FontStyle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the font table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFamilyEntry {
    /// Logical name shown in the editor.
    pub family: String,
    /// Asset folder on the rendering side.
    pub folder: String,
    /// File name stem before the weight suffix.
    pub base_name: String,
}

impl FontFamilyEntry {
    pub fn new(family: &str, folder: &str, base_name: &str) -> Self {
        Self {
            family: family.to_string(),
            folder: folder.to_string(),
            base_name: base_name.to_string(),
        }
    }
}

const BUILTIN_FONTS: &[(&str, &str, &str)] = &[
    ("Roboto", "Roboto", "Roboto"),
    ("Open Sans", "OpenSans", "OpenSans"),
    ("Lato", "Lato", "Lato"),
    ("Montserrat", "Montserrat", "Montserrat"),
    ("Poppins", "Poppins", "Poppins"),
    ("Merriweather", "Merriweather", "Merriweather"),
    ("Playfair Display", "PlayfairDisplay", "PlayfairDisplay"),
    ("Great Vibes", "GreatVibes", "GreatVibes"),
    ("Dancing Script", "DancingScript", "DancingScript"),
];

/// Weight bucket available as a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeightName {
    Regular,
    Light,
    Medium,
    Bold,
}

impl FontWeightName {
    /// Normalize a CSS weight: 300/500/700 and their names map to
    /// Light/Medium/Bold, everything else is Regular.
    pub fn from_css(weight: &str) -> Self {
        match weight.trim().to_ascii_lowercase().as_str() {
            "300" | "light" => FontWeightName::Light,
            "500" | "medium" => FontWeightName::Medium,
            "700" | "bold" => FontWeightName::Bold,
            _ => FontWeightName::Regular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeightName::Regular => "Regular",
            FontWeightName::Light => "Light",
            FontWeightName::Medium => "Medium",
            FontWeightName::Bold => "Bold",
        }
    }

    /// File suffix for this weight, with `Italic` appended when needed.
    pub fn suffix(&self, italic: bool) -> String {
        match (self, italic) {
            (FontWeightName::Regular, true) => "Italic".to_string(),
            (weight, true) => format!("{}Italic", weight.as_str()),
            (weight, false) => weight.as_str().to_string(),
        }
    }
}

impl fmt::Display for FontWeightName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a logical font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Asset reference, or the raw family for unmapped fonts.
    pub reference: String,
    /// Whether the family was found in the table.
    pub mapped: bool,
}

/// Font family lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct FontTable {
    entries: Vec<FontFamilyEntry>,
}

impl Default for FontTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FONTS
                .iter()
                .map(|(family, folder, base)| FontFamilyEntry::new(family, folder, base))
                .collect(),
        }
    }

    /// Built-in table plus extra rows. Extra rows override built-ins with
    /// the same family name.
    pub fn with_extra(extra: &[FontFamilyEntry]) -> Self {
        let mut table = Self::builtin();
        for entry in extra {
            table.insert(entry.clone());
        }
        table
    }

    pub fn insert(&mut self, entry: FontFamilyEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.family.eq_ignore_ascii_case(&entry.family))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[FontFamilyEntry] {
        &self.entries
    }

    /// Case-insensitive lookup by logical family.
    pub fn lookup(&self, family: &str) -> Option<&FontFamilyEntry> {
        let family = family.trim();
        self.entries
            .iter()
            .find(|e| e.family.eq_ignore_ascii_case(family))
    }

    /// Map family, weight and style to an asset reference.
    pub fn resolve(&self, family: &str, weight: &str, style: FontStyle) -> ResolvedFont {
        match self.lookup(family) {
            Some(entry) => {
                let suffix =
                    FontWeightName::from_css(weight).suffix(style == FontStyle::Italic);
                ResolvedFont {
                    reference: format!("{}/{}-{}", entry.folder, entry.base_name, suffix),
                    mapped: true,
                }
            }
            None => {
                log::warn!("Font family '{}' is not mapped, passing it through", family);
                ResolvedFont {
                    reference: family.to_string(),
                    mapped: false,
                }
            }
        }
    }

    /// Recover the logical family from an asset reference. Unknown
    /// references are returned unchanged.
    pub fn family_for_reference(&self, reference: &str) -> String {
        let Some((folder, file)) = reference.split_once('/') else {
            return reference.to_string();
        };
        self.entries
            .iter()
            .find(|e| {
                e.folder == folder
                    && file
                        .strip_prefix(e.base_name.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            })
            .map(|e| e.family.clone())
            .unwrap_or_else(|| reference.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_italic_suffix() {
        let table = FontTable::builtin();
        let font = table.resolve("Roboto", "700", FontStyle::Italic);
        assert_eq!(font.reference, "Roboto/Roboto-BoldItalic");
        assert!(font.mapped);
    }

    #[test]
    fn test_weight_normalization() {
        assert_eq!(FontWeightName::from_css("300"), FontWeightName::Light);
        assert_eq!(FontWeightName::from_css("500"), FontWeightName::Medium);
        assert_eq!(FontWeightName::from_css("bold"), FontWeightName::Bold);
        assert_eq!(FontWeightName::from_css("400"), FontWeightName::Regular);
        assert_eq!(FontWeightName::from_css("900"), FontWeightName::Regular);
        assert_eq!(FontWeightName::Regular.suffix(true), "Italic");
        assert_eq!(FontWeightName::Light.suffix(true), "LightItalic");
        assert_eq!(FontWeightName::Medium.suffix(false), "Medium");
    }

    #[test]
    fn test_unmapped_family_passes_through() {
        let table = FontTable::builtin();
        let font = table.resolve("Comic Neue", "700", FontStyle::Italic);
        assert_eq!(font.reference, "Comic Neue");
        assert!(!font.mapped);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = FontTable::builtin();
        let font = table.resolve("open sans", "400", FontStyle::Normal);
        assert_eq!(font.reference, "OpenSans/OpenSans-Regular");
    }

    #[test]
    fn test_reverse_lookup() {
        let table = FontTable::builtin();
        assert_eq!(table.family_for_reference("PlayfairDisplay/PlayfairDisplay-Italic"), "Playfair Display");
        assert_eq!(table.family_for_reference("Comic Neue"), "Comic Neue");
        assert_eq!(table.family_for_reference("Unknown/Unknown-Bold"), "Unknown/Unknown-Bold");
    }

    #[test]
    fn test_extra_rows_override() {
        let table = FontTable::with_extra(&[
            FontFamilyEntry::new("Roboto", "RobotoFlex", "RobotoFlex"),
            FontFamilyEntry::new("Cinzel", "Cinzel", "Cinzel"),
        ]);
        assert_eq!(
            table.resolve("Roboto", "400", FontStyle::Normal).reference,
            "RobotoFlex/RobotoFlex-Regular"
        );
        assert_eq!(
            table.resolve("Cinzel", "500", FontStyle::Italic).reference,
            "Cinzel/Cinzel-MediumItalic"
        );
    }
}
