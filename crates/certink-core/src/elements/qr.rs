//! QR code element. The bitmap itself is rendered downstream.

use super::{ElementBase, ElementId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub width: f64,
    pub height: f64,
    /// Payload to encode; the renderer substitutes a verification link
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl QrCodeElement {
    pub const DEFAULT_SIZE: f64 = 100.0;

    pub fn new(id: ElementId, x: f64, y: f64) -> Self {
        Self {
            base: ElementBase::new(id, x, y),
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}
