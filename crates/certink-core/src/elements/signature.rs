//! Signature element.

use super::{ElementBase, ElementId};
use serde::{Deserialize, Serialize};

/// Fixed signature box width; only `scale` changes the displayed size.
pub const SIGNATURE_WIDTH: f64 = 200.0;
pub const SIGNATURE_HEIGHT: f64 = 80.0;
/// Image reference meaning "no signature uploaded yet".
pub const SIGNATURE_PLACEHOLDER: &str = "{{signature}}";

/// A signature image slot. Anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureElement {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Asset URL or [`SIGNATURE_PLACEHOLDER`].
    #[serde(default = "default_image_url")]
    pub image_url: String,
}

fn default_width() -> f64 {
    SIGNATURE_WIDTH
}

fn default_height() -> f64 {
    SIGNATURE_HEIGHT
}

fn default_image_url() -> String {
    SIGNATURE_PLACEHOLDER.to_string()
}

impl SignatureElement {
    pub fn new(id: ElementId, x: f64, y: f64) -> Self {
        Self {
            base: ElementBase::new(id, x, y),
            width: SIGNATURE_WIDTH,
            height: SIGNATURE_HEIGHT,
            image_url: default_image_url(),
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Whether the slot still carries the placeholder token.
    pub fn is_placeholder(&self) -> bool {
        self.image_url == SIGNATURE_PLACEHOLDER
    }

    /// Reset width/height to the fixed box.
    pub fn pin_size(&mut self) {
        self.width = SIGNATURE_WIDTH;
        self.height = SIGNATURE_HEIGHT;
    }
}
