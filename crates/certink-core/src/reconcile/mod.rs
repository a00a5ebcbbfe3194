//! Conversion between editor space and document space.
//!
//! Saving scales positions and sizes by `r = documentWidth / editorWidth`,
//! moves text anchors to the left edge, bakes scale into sizes, resolves
//! fonts and relativizes asset URLs. Loading undoes the geometric part so
//! the editor shows the layout where it was authored.

pub mod anchor;
pub mod assets;
pub mod fonts;

use crate::canvas::Layout;
use crate::config::CoordinateConfig;
use crate::elements::{
    Element, ElementBase, ImageElement, QrCodeElement, SIGNATURE_HEIGHT, SIGNATURE_WIDTH,
    ShapeElement, SignatureElement, TextElement,
};
use crate::error::{LayoutError, ValidationError};
use crate::persisted::{
    PersistedBase, PersistedElement, PersistedImage, PersistedLayout, PersistedQrCode,
    PersistedShape, PersistedSignature, PersistedText,
};
use anchor::{anchor_to_left, left_to_anchor};
use assets::{to_absolute_url, to_storage_path};
use fonts::FontTable;

/// Two decimals are enough for editor-space values recovered on load.
fn tidy(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stand-in editor size for persisted dimensions that are not positive.
const MIN_LOADED_SIZE: f64 = 1.0;

fn loaded_size(field: &str, value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("Persisted {} {} is not positive, using {}", field, value, MIN_LOADED_SIZE);
        MIN_LOADED_SIZE
    }
}

/// Applies the save and load transforms for one coordinate config.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: CoordinateConfig,
    fonts: FontTable,
}

impl Reconciler {
    pub fn new(config: &CoordinateConfig) -> Self {
        Self {
            config: config.clone(),
            fonts: FontTable::with_extra(&config.fonts),
        }
    }

    pub fn config(&self) -> &CoordinateConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    fn ratio(&self) -> f64 {
        self.config.ratio()
    }

    fn storage_path(&self, url: &str) -> String {
        to_storage_path(
            url,
            self.config.backend_origin.as_deref(),
            &self.config.storage_prefix,
        )
    }

    /// Storage path to the URL the editor displays.
    pub fn absolute_url(&self, path: &str) -> String {
        to_absolute_url(path, self.config.backend_origin.as_deref())
    }

    /// Position of a top-left anchored element in points.
    fn document_base(&self, base: &ElementBase, left: f64) -> PersistedBase {
        let r = self.ratio();
        PersistedBase {
            id: base.id.clone(),
            x: (left * r).round(),
            y: (base.y * r).round(),
            rotation: base.rotation,
        }
    }

    fn editor_base(&self, base: &PersistedBase, x: f64) -> ElementBase {
        let mut editor = ElementBase::new(base.id.clone(), tidy(x), tidy(base.y / self.ratio()));
        editor.set_rotation(base.rotation);
        editor
    }

    /// Scaled size in points.
    fn document_size(&self, base: &ElementBase, width: f64, height: f64) -> (f64, f64) {
        let r = self.ratio();
        let (sx, sy) = base.effective_scale();
        ((width * sx * r).round(), (height * sy * r).round())
    }

    fn editor_size(&self, width: f64, height: f64) -> (f64, f64) {
        let r = self.ratio();
        (
            loaded_size("width", tidy(width / r)),
            loaded_size("height", tidy(height / r)),
        )
    }

    /// Convert one element to document space.
    pub fn element_to_document(&self, element: &Element) -> PersistedElement {
        let r = self.ratio();
        match element {
            Element::Text(t) => {
                let (sx, sy) = t.base.effective_scale();
                let width = t.width_or_estimate() * sx;
                let left = anchor_to_left(t.base.x, width, t.text_align);
                let font = self
                    .fonts
                    .resolve(&t.font_family, &t.font_weight, t.font_style);
                PersistedElement::Text(PersistedText {
                    base: self.document_base(&t.base, left),
                    text: t.text.clone(),
                    font_size: (t.font_size * sy * r).round(),
                    font_family: font.reference,
                    font_weight: t.font_weight.clone(),
                    font_style: t.font_style,
                    text_align: t.text_align,
                    placeholder_type: t.placeholder_type,
                    width: (width * r).round(),
                })
            }
            Element::Image(i) => {
                let (width, height) = self.document_size(&i.base, i.width, i.height);
                PersistedElement::Image(PersistedImage {
                    base: self.document_base(&i.base, i.base.x),
                    width,
                    height,
                    image_size_mode: i.image_size_mode,
                    resolved_path: self.storage_path(&i.image_url),
                })
            }
            Element::Shape(s) => {
                let (width, height) = self.document_size(&s.base, s.width, s.height);
                PersistedElement::Shape(PersistedShape {
                    base: self.document_base(&s.base, s.base.x),
                    shape_type: s.shape_type,
                    width,
                    height,
                    fill_color: s.fill_color,
                    stroke_color: s.stroke_color,
                    stroke_width: s.stroke_width,
                    border_radius: s.border_radius,
                    opacity: s.opacity,
                })
            }
            Element::QrCode(q) => {
                let (width, height) = self.document_size(&q.base, q.width, q.height);
                PersistedElement::QrCode(PersistedQrCode {
                    base: self.document_base(&q.base, q.base.x),
                    width,
                    height,
                    data: q.data.clone(),
                })
            }
            Element::Signature(s) => {
                let (sx, sy) = s.base.effective_scale();
                let m = self.config.signature_render_multiplier;
                PersistedElement::Signature(PersistedSignature {
                    base: self.document_base(&s.base, s.base.x),
                    width: (s.width * sx * r * m).round(),
                    height: (s.height * sy * r * m).round(),
                    resolved_path: self.storage_path(&s.image_url),
                })
            }
        }
    }

    /// Convert one persisted element back to editor space.
    pub fn element_from_document(&self, element: &PersistedElement) -> Element {
        let r = self.ratio();
        match element {
            PersistedElement::Text(t) => {
                let width = t.width / r;
                let x = left_to_anchor(t.base.x / r, width, t.text_align);
                Element::Text(TextElement {
                    base: self.editor_base(&t.base, x),
                    text: t.text.clone(),
                    font_size: tidy(t.font_size / r),
                    font_family: self.fonts.family_for_reference(&t.font_family),
                    font_weight: if t.font_weight.is_empty() {
                        "400".to_string()
                    } else {
                        t.font_weight.clone()
                    },
                    font_style: t.font_style,
                    text_align: t.text_align,
                    placeholder_type: t.placeholder_type,
                    width: Some(tidy(width)),
                })
            }
            PersistedElement::Image(i) => {
                let (width, height) = self.editor_size(i.width, i.height);
                Element::Image(ImageElement {
                    base: self.editor_base(&i.base, i.base.x / r),
                    image_url: self.absolute_url(&i.resolved_path),
                    width,
                    height,
                    image_size_mode: i.image_size_mode,
                })
            }
            PersistedElement::Shape(s) => {
                let (width, height) = self.editor_size(s.width, s.height);
                Element::Shape(ShapeElement {
                    base: self.editor_base(&s.base, s.base.x / r),
                    shape_type: s.shape_type,
                    width,
                    height,
                    fill_color: s.fill_color,
                    stroke_color: s.stroke_color,
                    stroke_width: s.stroke_width,
                    border_radius: s.border_radius,
                    opacity: s.opacity,
                })
            }
            PersistedElement::QrCode(q) => {
                let (width, height) = self.editor_size(q.width, q.height);
                Element::QrCode(QrCodeElement {
                    base: self.editor_base(&q.base, q.base.x / r),
                    width,
                    height,
                    data: q.data.clone(),
                })
            }
            PersistedElement::Signature(s) => {
                let mut base = self.editor_base(&s.base, s.base.x / r);
                let unit = r * self.config.signature_render_multiplier;
                let sx = s.width / (SIGNATURE_WIDTH * unit);
                let sy = s.height / (SIGNATURE_HEIGHT * unit);
                if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
                    log::warn!("Signature {} has an unusable size, loading it unscaled", base.id);
                } else if (sx - sy).abs() < 0.01 {
                    if (sx - 1.0).abs() >= 0.005 {
                        base.scale = Some(tidy(sx));
                    }
                } else {
                    base.scale_x = Some(tidy(sx));
                    base.scale_y = Some(tidy(sy));
                }
                let mut signature = SignatureElement::new(base.id.clone(), base.x, base.y)
                    .with_image(self.absolute_url(&s.resolved_path));
                signature.base = base;
                Element::Signature(signature)
            }
        }
    }

    /// Validate and convert a whole layout for persistence.
    pub fn save(&self, layout: &Layout) -> Result<PersistedLayout, ValidationError> {
        layout.validate()?;
        let background = layout.background.as_deref().unwrap_or_default();
        let persisted = PersistedLayout {
            name: layout.name.trim().to_string(),
            background: self.storage_path(background),
            elements: layout
                .elements()
                .iter()
                .map(|e| self.element_to_document(e))
                .collect(),
        };
        log::debug!(
            "Converted layout '{}' with {} elements to document space (r = {:.4})",
            persisted.name,
            persisted.elements.len(),
            self.ratio()
        );
        Ok(persisted)
    }

    /// Rebuild an editor layout from its persisted form.
    pub fn load(&self, persisted: &PersistedLayout) -> Result<Layout, LayoutError> {
        let background = if persisted.background.trim().is_empty() {
            None
        } else {
            Some(self.absolute_url(&persisted.background))
        };
        let elements = persisted
            .elements
            .iter()
            .map(|e| self.element_from_document(e))
            .collect();
        let layout = Layout::with_elements(persisted.name.clone(), background, elements)?;
        log::debug!(
            "Loaded layout '{}' with {} elements into editor space",
            layout.name,
            layout.len()
        );
        Ok(layout)
    }
}
