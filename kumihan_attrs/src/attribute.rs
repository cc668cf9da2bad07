// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::ops::Range;

use peniko::Color;

use crate::{Error, Rect};

/// Weight and slant independent description of a font request.
///
/// The layout engine never resolves this itself: it is handed to the shaper as part of each
/// item's analysis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontDesc {
    /// Family name, for example `"Sans"`.
    pub family: Arc<str>,
    /// Size in layout units.
    pub size: i32,
    /// Numeric weight, 400 is regular.
    pub weight: u16,
    /// Slant.
    pub style: FontStyle,
}

impl FontDesc {
    /// A regular-weight upright font of the given family and size.
    pub fn new(family: &str, size: i32) -> Self {
        Self {
            family: Arc::from(family),
            size,
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

/// Font slant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Oblique.
    Oblique,
    /// Italic.
    Italic,
}

/// Underline style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Underline {
    /// No underline.
    #[default]
    None,
    /// A single line just below the baseline.
    Single,
    /// Two lines below the baseline.
    Double,
    /// A single line below the ink of the run, used to mark accelerators.
    Low,
    /// A wavy line used for spelling errors.
    Error,
}

/// The kind of an attribute, without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// See [`AttrValue::FontDesc`].
    FontDesc,
    /// See [`AttrValue::Foreground`].
    Foreground,
    /// See [`AttrValue::Background`].
    Background,
    /// See [`AttrValue::Underline`].
    Underline,
    /// See [`AttrValue::Strikethrough`].
    Strikethrough,
    /// See [`AttrValue::Rise`].
    Rise,
    /// See [`AttrValue::LetterSpacing`].
    LetterSpacing,
    /// See [`AttrValue::Shape`].
    Shape,
    /// See [`AttrValue::Ruby`].
    Ruby,
    /// See [`AttrValue::RubyBase`].
    RubyBase,
    /// See [`AttrValue::RubyText`].
    RubyText,
}

/// An attribute payload.
#[derive(Clone, Debug)]
pub enum AttrValue {
    /// Font used to shape the covered text.
    FontDesc(FontDesc),
    /// Text color.
    Foreground(Color),
    /// Color painted behind the text.
    Background(Color),
    /// Underline style.
    Underline(Underline),
    /// Whether the text is struck through.
    Strikethrough(bool),
    /// Baseline shift in layout units, positive values raise the text.
    Rise(i32),
    /// Extra space between graphemes in layout units.
    LetterSpacing(i32),
    /// Replaces shaping with fixed geometry, one placeholder glyph per character.
    Shape {
        /// Ink rectangle of a single placeholder.
        ink: Rect,
        /// Logical rectangle of a single placeholder; its width is the advance.
        logical: Rect,
    },
    /// Marks a whole ruby group; no line break is allowed inside it.
    Ruby,
    /// Marks the base text of a ruby group.
    RubyBase,
    /// Marks the annotation text of a ruby group.
    RubyText,
}

impl AttrValue {
    /// The kind of this payload.
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::FontDesc(_) => AttrKind::FontDesc,
            Self::Foreground(_) => AttrKind::Foreground,
            Self::Background(_) => AttrKind::Background,
            Self::Underline(_) => AttrKind::Underline,
            Self::Strikethrough(_) => AttrKind::Strikethrough,
            Self::Rise(_) => AttrKind::Rise,
            Self::LetterSpacing(_) => AttrKind::LetterSpacing,
            Self::Shape { .. } => AttrKind::Shape,
            Self::Ruby => AttrKind::Ruby,
            Self::RubyBase => AttrKind::RubyBase,
            Self::RubyText => AttrKind::RubyText,
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::FontDesc(a), Self::FontDesc(b)) => a == b,
            (Self::Foreground(a), Self::Foreground(b))
            | (Self::Background(a), Self::Background(b)) => a.components == b.components,
            (Self::Underline(a), Self::Underline(b)) => a == b,
            (Self::Strikethrough(a), Self::Strikethrough(b)) => a == b,
            (Self::Rise(a), Self::Rise(b)) | (Self::LetterSpacing(a), Self::LetterSpacing(b)) => {
                a == b
            }
            (
                Self::Shape {
                    ink: ink_a,
                    logical: logical_a,
                },
                Self::Shape {
                    ink: ink_b,
                    logical: logical_b,
                },
            ) => ink_a == ink_b && logical_a == logical_b,
            (Self::Ruby, Self::Ruby)
            | (Self::RubyBase, Self::RubyBase)
            | (Self::RubyText, Self::RubyText) => true,
            _ => false,
        }
    }
}

/// A style attribute applied to the half-open byte range `start..end`.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    start: usize,
    end: usize,
    value: AttrValue,
}

impl Attribute {
    /// Creates an attribute covering `range`.
    ///
    /// An empty range is accepted; inserting such an attribute into an [`AttrList`]
    /// is a no-op.
    ///
    /// [`AttrList`]: crate::AttrList
    pub fn new(range: Range<usize>, value: AttrValue) -> Result<Self, Error> {
        if range.start > range.end {
            return Err(Error::invalid_range(range.start, range.end, None));
        }
        Ok(Self {
            start: range.start,
            end: range.end,
            value,
        })
    }

    /// First byte covered.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last byte covered.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The covered byte range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The payload.
    pub fn value(&self) -> &AttrValue {
        &self.value
    }

    /// The kind of the payload.
    pub fn kind(&self) -> AttrKind {
        self.value.kind()
    }

    /// Returns `true` if `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns a copy of this attribute moved to `range`.
    ///
    /// Panics in debug builds if `range.start > range.end`.
    #[must_use]
    pub fn with_range(&self, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "reversed attribute range");
        Self {
            start: range.start,
            end: range.end.max(range.start),
            value: self.value.clone(),
        }
    }

    pub(crate) fn set_start(&mut self, start: usize) {
        self.start = start;
    }

    pub(crate) fn set_end(&mut self, end: usize) {
        self.end = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use peniko::color::palette::css;

    #[test]
    fn colors_compare_by_components() {
        assert_eq!(AttrValue::Foreground(css::RED), AttrValue::Foreground(css::RED));
        assert_ne!(AttrValue::Foreground(css::RED), AttrValue::Foreground(css::BLUE));
        assert_ne!(AttrValue::Foreground(css::RED), AttrValue::Background(css::RED));
    }

    #[test]
    fn void_markers_are_equal_to_themselves() {
        assert_eq!(AttrValue::Ruby, AttrValue::Ruby);
        assert_ne!(AttrValue::RubyBase, AttrValue::RubyText);
        assert_eq!(AttrValue::RubyText.kind(), AttrKind::RubyText);
    }

    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    #[test]
    fn reversed_range_is_rejected() {
        let err = Attribute::new(4..3, AttrValue::Rise(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
        assert_eq!((err.start(), err.end()), (4, 3));
    }
}
