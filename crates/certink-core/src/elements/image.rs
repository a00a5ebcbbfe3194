//! Image element and upload format detection.

use super::{ElementBase, ElementId};
use serde::{Deserialize, Serialize};

/// Image format accepted for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// How the displayed size relates to the uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSizeMode {
    /// Locked to the asset's natural size.
    #[default]
    Full,
    /// Freely resizable.
    Custom,
}

/// A raster image placed on the layout. Anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub base: ElementBase,
    /// Absolute URL, resolvable while editing.
    pub image_url: String,
    /// Width in pixels before scale.
    pub width: f64,
    /// Height in pixels before scale.
    pub height: f64,
    #[serde(default)]
    pub image_size_mode: ImageSizeMode,
}

impl ImageElement {
    pub fn new(
        id: ElementId,
        x: f64,
        y: f64,
        image_url: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            base: ElementBase::new(id, x, y),
            image_url: image_url.into(),
            width,
            height,
            image_size_mode: ImageSizeMode::Full,
        }
    }

    pub fn with_size_mode(mut self, mode: ImageSizeMode) -> Self {
        self.image_size_mode = mode;
        self
    }

    /// Apply the asset's natural size once it is known. Only full-mode
    /// images follow it; returns whether the size changed.
    pub fn apply_natural_size(&mut self, width: f64, height: f64) -> bool {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if self.image_size_mode != ImageSizeMode::Full || !usable(width) || !usable(height) {
            return false;
        }
        let changed = (self.width - width).abs() > f64::EPSILON
            || (self.height - height).abs() > f64::EPSILON;
        self.width = width;
        self.height = height;
        changed
    }
}
