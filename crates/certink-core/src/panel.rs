//! Property panel.
//!
//! The panel holds no state of its own: [`PropertyPanel`] is computed from
//! the selected element whenever it is displayed, and every [`PanelEdit`]
//! is written straight to the element.

use crate::elements::{
    Element, ElementId, FontStyle, ImageSizeMode, PlaceholderType, SerializableColor, ShapeType,
    TextAlign,
};
use crate::error::ValidationError;

/// Per-kind fields shown in the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelDetails {
    Text {
        text: String,
        read_only: bool,
        font_size: f64,
        font_family: String,
        font_weight: String,
        font_style: FontStyle,
        text_align: TextAlign,
        placeholder_type: PlaceholderType,
    },
    Image {
        image_url: String,
        image_size_mode: ImageSizeMode,
    },
    Shape {
        shape_type: ShapeType,
        fill_color: SerializableColor,
        stroke_color: SerializableColor,
        stroke_width: f64,
        border_radius: Option<f64>,
        opacity: Option<f64>,
    },
    QrCode {
        data: Option<String>,
    },
    Signature {
        image_url: String,
        is_placeholder: bool,
    },
}

/// Read-only projection of one element's editable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPanel {
    pub id: ElementId,
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Whether width/height inputs are enabled.
    pub size_editable: bool,
    pub details: PanelDetails,
}

impl PropertyPanel {
    pub fn from_element(element: &Element) -> Self {
        let base = element.base();
        let size = element.size();
        let details = match element {
            Element::Text(t) => PanelDetails::Text {
                text: t.text.clone(),
                read_only: t.is_read_only(),
                font_size: t.font_size,
                font_family: t.font_family.clone(),
                font_weight: t.font_weight.clone(),
                font_style: t.font_style,
                text_align: t.text_align,
                placeholder_type: t.placeholder_type,
            },
            Element::Image(i) => PanelDetails::Image {
                image_url: i.image_url.clone(),
                image_size_mode: i.image_size_mode,
            },
            Element::Shape(s) => PanelDetails::Shape {
                shape_type: s.shape_type,
                fill_color: s.fill_color,
                stroke_color: s.stroke_color,
                stroke_width: s.stroke_width,
                border_radius: s.border_radius,
                opacity: s.opacity,
            },
            Element::QrCode(q) => PanelDetails::QrCode {
                data: q.data.clone(),
            },
            Element::Signature(s) => PanelDetails::Signature {
                image_url: s.image_url.clone(),
                is_placeholder: s.is_placeholder(),
            },
        };
        Self {
            id: base.id.clone(),
            kind: element.kind_name(),
            x: base.x,
            y: base.y,
            rotation: base.rotation,
            scale: base.scale,
            width: size.map(|(w, _)| w),
            height: size.map(|(_, h)| h),
            size_editable: element.is_resizable(),
            details,
        }
    }
}

/// A single field change coming from the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEdit {
    X(f64),
    Y(f64),
    Rotation(f64),
    Scale(f64),
    Width(f64),
    Height(f64),
    Text(String),
    FontSize(f64),
    FontFamily(String),
    FontWeight(String),
    FontStyle(FontStyle),
    TextAlign(TextAlign),
    PlaceholderType(PlaceholderType),
    ImageUrl(String),
    ImageSizeMode(ImageSizeMode),
    ShapeType(ShapeType),
    FillColor(SerializableColor),
    StrokeColor(SerializableColor),
    StrokeWidth(f64),
    BorderRadius(Option<f64>),
    Opacity(Option<f64>),
    QrData(Option<String>),
}

impl PanelEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            PanelEdit::X(_) => "x",
            PanelEdit::Y(_) => "y",
            PanelEdit::Rotation(_) => "rotation",
            PanelEdit::Scale(_) => "scale",
            PanelEdit::Width(_) => "width",
            PanelEdit::Height(_) => "height",
            PanelEdit::Text(_) => "text",
            PanelEdit::FontSize(_) => "fontSize",
            PanelEdit::FontFamily(_) => "fontFamily",
            PanelEdit::FontWeight(_) => "fontWeight",
            PanelEdit::FontStyle(_) => "fontStyle",
            PanelEdit::TextAlign(_) => "textAlign",
            PanelEdit::PlaceholderType(_) => "placeholderType",
            PanelEdit::ImageUrl(_) => "imageUrl",
            PanelEdit::ImageSizeMode(_) => "imageSizeMode",
            PanelEdit::ShapeType(_) => "shapeType",
            PanelEdit::FillColor(_) => "fillColor",
            PanelEdit::StrokeColor(_) => "strokeColor",
            PanelEdit::StrokeWidth(_) => "strokeWidth",
            PanelEdit::BorderRadius(_) => "borderRadius",
            PanelEdit::Opacity(_) => "opacity",
            PanelEdit::QrData(_) => "qrData",
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::InvalidValue {
            field,
            reason: format!("{} is not a number", value),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidValue {
            field,
            reason: format!("must not be negative, got {}", value),
        })
    }
}

/// Write a panel edit to an element.
///
/// Signatures keep their fixed width/height whatever the panel sends.
/// Returns whether the element changed.
pub fn apply_edit(element: &mut Element, edit: PanelEdit) -> Result<bool, ValidationError> {
    let before = element.clone();
    let field = edit.field_name();
    let not_applicable = ValidationError::FieldNotApplicable {
        field,
        kind: element.kind_name(),
    };

    match (edit, &mut *element) {
        (PanelEdit::X(x), el) => el.base_mut().x = finite(field, x)?,
        (PanelEdit::Y(y), el) => el.base_mut().y = finite(field, y)?,
        (PanelEdit::Rotation(r), el) => el.set_rotation(finite(field, r)?),
        (PanelEdit::Scale(s), el) => el.base_mut().scale = Some(positive(field, s)?),

        (PanelEdit::Width(_) | PanelEdit::Height(_), Element::Signature(s)) => {
            log::debug!("Ignoring {} edit on signature {}", field, s.base.id);
        }
        (PanelEdit::Width(_) | PanelEdit::Height(_), Element::Text(_)) => return Err(not_applicable),
        (PanelEdit::Width(_) | PanelEdit::Height(_), Element::Image(i))
            if i.image_size_mode == ImageSizeMode::Full =>
        {
            return Err(ValidationError::InvalidValue {
                field,
                reason: "size follows the image in full mode".to_string(),
            });
        }
        (PanelEdit::Width(w), el) => {
            let w = positive(field, w)?;
            let mut geometry = el.geometry();
            geometry.width = Some(w);
            el.apply_geometry(geometry);
        }
        (PanelEdit::Height(h), el) => {
            let h = positive(field, h)?;
            let mut geometry = el.geometry();
            geometry.height = Some(h);
            el.apply_geometry(geometry);
        }

        (PanelEdit::Text(text), Element::Text(t)) => t.set_text(text)?,
        (PanelEdit::FontSize(size), Element::Text(t)) => {
            t.font_size = positive(field, size)?;
            t.width = None;
        }
        (PanelEdit::FontFamily(family), Element::Text(t)) => {
            t.font_family = family;
            t.width = None;
        }
        (PanelEdit::FontWeight(weight), Element::Text(t)) => {
            t.font_weight = weight;
            t.width = None;
        }
        (PanelEdit::FontStyle(style), Element::Text(t)) => t.font_style = style,
        (PanelEdit::TextAlign(align), Element::Text(t)) => t.text_align = align,
        (PanelEdit::PlaceholderType(kind), Element::Text(t)) => t.set_placeholder(kind),

        (PanelEdit::ImageUrl(url), Element::Image(i)) => i.image_url = url,
        (PanelEdit::ImageUrl(url), Element::Signature(s)) => s.image_url = url,
        (PanelEdit::ImageSizeMode(mode), Element::Image(i)) => i.image_size_mode = mode,

        (PanelEdit::ShapeType(kind), Element::Shape(s)) => s.shape_type = kind,
        (PanelEdit::FillColor(color), Element::Shape(s)) => s.fill_color = color,
        (PanelEdit::StrokeColor(color), Element::Shape(s)) => s.stroke_color = color,
        (PanelEdit::StrokeWidth(width), Element::Shape(s)) => {
            s.stroke_width = non_negative(field, width)?
        }
        (PanelEdit::BorderRadius(radius), Element::Shape(s)) => {
            if s.shape_type != ShapeType::Rectangle {
                return Err(ValidationError::FieldNotApplicable {
                    field,
                    kind: s.shape_type.as_str(),
                });
            }
            s.border_radius = radius.map(|r| non_negative(field, r)).transpose()?;
        }
        (PanelEdit::Opacity(opacity), Element::Shape(s)) => {
            s.opacity = match opacity {
                Some(o) if (0.0..=1.0).contains(&o) => Some(o),
                Some(o) => {
                    return Err(ValidationError::InvalidValue {
                        field,
                        reason: format!("must be within [0, 1], got {}", o),
                    });
                }
                None => None,
            }
        }

        (PanelEdit::QrData(data), Element::QrCode(q)) => q.data = data,

        _ => return Err(not_applicable),
    }

    if let Element::Signature(s) = element {
        s.pin_size();
    }
    Ok(*element != before)
}
