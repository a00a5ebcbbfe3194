//! Editor and coordinate-space configuration.
//!
//! The editor-to-document ratio is never hardcoded: callers inject a
//! [`CoordinateConfig`] so the same protocol works for any canvas/document
//! pairing.

use crate::error::ConfigError;
use crate::reconcile::fonts::FontFamilyEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A4 landscape width at 96 dpi.
pub const DEFAULT_EDITOR_WIDTH: f64 = 1123.0;
/// A4 landscape width in typographic points.
pub const DEFAULT_DOCUMENT_WIDTH: f64 = 842.0;
/// Smallest width/height an interactive resize may produce.
pub const DEFAULT_MIN_ELEMENT_SIZE: f64 = 10.0;
/// Upload limit for background and image assets.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Parameters of the editor space <-> document space transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinateConfig {
    /// Canvas width in editor pixels.
    pub editor_width: f64,
    /// Document width in points.
    pub document_width: f64,
    /// Correction applied to signature sizes in the final render.
    pub signature_render_multiplier: f64,
    /// Origin of the asset backend (scheme + host + optional port).
    pub backend_origin: Option<String>,
    /// Relative storage root, used when repairing malformed URLs.
    pub storage_prefix: String,
    /// Extra font families appended to the built-in table.
    pub fonts: Vec<FontFamilyEntry>,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            editor_width: DEFAULT_EDITOR_WIDTH,
            document_width: DEFAULT_DOCUMENT_WIDTH,
            signature_render_multiplier: 1.0,
            backend_origin: None,
            storage_prefix: "storage/".to_string(),
            fonts: Vec::new(),
        }
    }
}

impl CoordinateConfig {
    /// Config where editor and document widths match (`r = 1`).
    pub fn identity() -> Self {
        Self {
            editor_width: DEFAULT_EDITOR_WIDTH,
            document_width: DEFAULT_EDITOR_WIDTH,
            ..Self::default()
        }
    }

    /// Set the backend origin.
    pub fn with_backend_origin(mut self, origin: impl Into<String>) -> Self {
        self.backend_origin = Some(origin.into());
        self
    }

    /// Set both widths.
    pub fn with_widths(mut self, editor_width: f64, document_width: f64) -> Self {
        self.editor_width = editor_width;
        self.document_width = document_width;
        self
    }

    /// Editor-to-document scale ratio `r = W_doc / W_edit`.
    pub fn ratio(&self) -> f64 {
        self.document_width / self.editor_width
    }

    /// Check that the config describes a usable transform.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("editorWidth", self.editor_width),
            ("documentWidth", self.document_width),
            ("signatureRenderMultiplier", self.signature_render_multiplier),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if let Some(origin) = &self.backend_origin {
            match url::Url::parse(origin) {
                Ok(parsed) if parsed.has_host() => {}
                _ => return Err(ConfigError::InvalidOrigin(origin.clone())),
            }
        }
        Ok(())
    }
}

/// Full editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    #[serde(flatten)]
    pub coordinates: CoordinateConfig,
    /// Minimum width/height after an interactive resize.
    pub min_element_size: f64,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            coordinates: CoordinateConfig::default(),
            min_element_size: DEFAULT_MIN_ELEMENT_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl EditorConfig {
    pub fn new(coordinates: CoordinateConfig) -> Self {
        Self {
            coordinates,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Read(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_element_size > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "minElementSize",
                value: self.min_element_size,
            });
        }
        self.coordinates.validate()
    }
}
