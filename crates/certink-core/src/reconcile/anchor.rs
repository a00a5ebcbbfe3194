//! Text anchor conversion.
//!
//! In the editor a text's `x` is its visual anchor, which depends on the
//! alignment. The document format always stores the left edge.

use crate::elements::TextAlign;

/// Left edge for a visual anchor `x` and a text of width `width`.
pub fn anchor_to_left(x: f64, width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    }
}

/// Visual anchor for a left edge `left` and a text of width `width`.
pub fn left_to_anchor(left: f64, width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => left,
        TextAlign::Center => left + width / 2.0,
        TextAlign::Right => left + width,
    }
}
