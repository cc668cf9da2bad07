// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kumihan_attrs::{AttrValue, Attribute, Rect, Underline};

/// Fixed geometry replacing shaping for an item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeOverride {
    /// Ink rectangle of one placeholder.
    pub ink: Rect,
    /// Logical rectangle of one placeholder; its width is the advance.
    pub logical: Rect,
}

/// The style of an item that affects layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemProperties {
    /// Underline style.
    pub underline: Underline,
    /// Baseline shift.
    pub rise: i32,
    /// Extra space between graphemes.
    pub letter_spacing: i32,
    /// Geometry imposed by a shape attribute.
    pub shape: Option<ShapeOverride>,
}

impl ItemProperties {
    /// Resolves properties from an item's attributes.
    ///
    /// For every property the last matching attribute in slice order wins.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut properties = Self::default();
        for attr in attrs {
            match attr.value() {
                AttrValue::Underline(underline) => properties.underline = *underline,
                AttrValue::Rise(rise) => properties.rise = *rise,
                AttrValue::LetterSpacing(spacing) => properties.letter_spacing = *spacing,
                AttrValue::Shape { ink, logical } => {
                    properties.shape = Some(ShapeOverride {
                        ink: *ink,
                        logical: *logical,
                    });
                }
                _ => {}
            }
        }
        properties
    }
}
