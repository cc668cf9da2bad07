// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis: itemization and per-character break attributes.

mod unicode;

use alloc::vec::Vec;
use core::ops::Range;

use icu_properties::props::Script;
use kumihan_attrs::{AttrKind, AttrList, Attribute, FontDesc};
use smallvec::SmallVec;
use unicode_bidi::{BidiClass, bidi_class};

use crate::ItemProperties;

pub use unicode::UnicodeAnalyzer;

/// Base direction of a paragraph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// The bidi embedding level of a paragraph with this direction.
    pub fn level(self) -> u8 {
        match self {
            Self::Ltr => 0,
            Self::Rtl => 1,
        }
    }

    /// The direction of text at embedding `level`.
    pub fn from_level(level: u8) -> Self {
        if level % 2 == 1 { Self::Rtl } else { Self::Ltr }
    }
}

/// How an item is to be shaped.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Bidi embedding level; odd levels are right to left.
    pub level: u8,
    /// Resolved script.
    pub script: Script,
    /// Font to shape with.
    pub font: FontDesc,
    /// The other attributes covering the item, relative to the item's start.
    pub extra_attrs: SmallVec<[Attribute; 4]>,
}

impl Analysis {
    /// Returns `true` for right-to-left items.
    pub fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }

    /// Direction of the item.
    pub fn direction(&self) -> Direction {
        Direction::from_level(self.level)
    }
}

/// A maximal span of text with uniform [`Analysis`].
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Byte offset into the layout text.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
    /// Length in characters.
    pub num_chars: usize,
    /// Shaping parameters.
    pub analysis: Analysis,
}

impl Item {
    /// The byte range of the item within the layout text.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    /// Splits off the first `split_index` bytes (`split_num_chars` characters) and returns
    /// them as a new item. `self` keeps the remainder.
    ///
    /// Attributes are clipped to each half; those left empty are dropped.
    pub fn split(&mut self, split_index: usize, split_num_chars: usize) -> Self {
        debug_assert!(split_index > 0 && split_index < self.length, "split out of range");
        debug_assert!(
            split_num_chars > 0 && split_num_chars < self.num_chars,
            "split out of range"
        );

        let mut head = Self {
            offset: self.offset,
            length: split_index,
            num_chars: split_num_chars,
            analysis: Analysis {
                extra_attrs: SmallVec::new(),
                ..self.analysis.clone()
            },
        };
        let mut tail_attrs = SmallVec::new();
        for attr in &self.analysis.extra_attrs {
            if attr.start() < split_index {
                head.analysis
                    .extra_attrs
                    .push(attr.with_range(attr.start()..attr.end().min(split_index)));
            }
            if attr.end() > split_index {
                let start = attr.start().max(split_index) - split_index;
                tail_attrs.push(attr.with_range(start..attr.end() - split_index));
            }
        }
        self.analysis.extra_attrs = tail_attrs;
        self.offset += split_index;
        self.length -= split_index;
        self.num_chars -= split_num_chars;
        head
    }

    /// Returns `true` if an attribute of `kind` covers part of the item.
    pub fn has_attr(&self, kind: AttrKind) -> bool {
        self.analysis.extra_attrs.iter().any(|a| a.kind() == kind)
    }

    pub(crate) fn properties(&self) -> ItemProperties {
        ItemProperties::from_attrs(&self.analysis.extra_attrs)
    }
}

/// Break and cursor attributes of the position before a character.
///
/// Arrays of these have one entry per character plus one for the end of the text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogAttr {
    /// A line may be broken before this character.
    pub is_line_break: bool,
    /// Character wrapping may break before this character.
    pub is_char_break: bool,
    /// The cursor may be placed before this character.
    pub is_cursor_position: bool,
    /// The character is whitespace.
    pub is_white: bool,
}

/// Splits text into items and computes break attributes.
pub trait Analyzer {
    /// Itemizes `range` of `text`, one paragraph without its delimiter.
    ///
    /// Items are returned in logical order, cover `range` exactly and carry absolute offsets.
    /// Tabs and U+2028 LINE SEPARATOR must each be returned as an item of their own.
    fn itemize(
        &self,
        text: &str,
        range: Range<usize>,
        attrs: &AttrList,
        default_font: &FontDesc,
        base_dir: Direction,
    ) -> Vec<Item>;

    /// Fills `out`, which holds one entry per character of `text` plus one, with break
    /// attributes.
    fn log_attrs(&self, text: &str, out: &mut [LogAttr]);

    /// The direction of the first strong character of `text`, if any.
    fn find_base_dir(&self, text: &str) -> Option<Direction> {
        text.chars().find_map(|ch| match bidi_class(ch) {
            BidiClass::L => Some(Direction::Ltr),
            BidiClass::R | BidiClass::AL => Some(Direction::Rtl),
            _ => None,
        })
    }

    /// Returns the byte offset of the first paragraph delimiter in `text` and the offset the
    /// next paragraph starts at.
    ///
    /// Without a delimiter both are `text.len()`.
    fn find_paragraph_boundary(&self, text: &str) -> (usize, usize) {
        for (i, ch) in text.char_indices() {
            match ch {
                '\n' | '\u{2029}' => return (i, i + ch.len_utf8()),
                '\r' => {
                    let next = if text[i + 1..].starts_with('\n') { i + 2 } else { i + 1 };
                    return (i, next);
                }
                _ => {}
            }
        }
        (text.len(), text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumihan_attrs::AttrValue;
    use smallvec::smallvec;

    fn item(attrs: SmallVec<[Attribute; 4]>) -> Item {
        Item {
            offset: 10,
            length: 6,
            num_chars: 6,
            analysis: Analysis {
                level: 0,
                script: Script::Latin,
                font: FontDesc::new("Sans", 12),
                extra_attrs: attrs,
            },
        }
    }

    #[test]
    fn split_clips_attributes() {
        let mut tail = item(smallvec![
            Attribute::new(0..2, AttrValue::Rise(1)).unwrap(),
            Attribute::new(1..6, AttrValue::LetterSpacing(3)).unwrap(),
            Attribute::new(4..6, AttrValue::Ruby).unwrap(),
        ]);
        let head = tail.split(3, 3);
        assert_eq!((head.offset, head.length, head.num_chars), (10, 3, 3));
        assert_eq!((tail.offset, tail.length, tail.num_chars), (13, 3, 3));

        let head_ranges: Vec<_> = head.analysis.extra_attrs.iter().map(|a| a.range()).collect();
        assert_eq!(head_ranges, [0..2, 1..3]);
        let tail_ranges: Vec<_> = tail.analysis.extra_attrs.iter().map(|a| a.range()).collect();
        assert_eq!(tail_ranges, [0..3, 1..3]);
        assert!(tail.has_attr(AttrKind::Ruby));
        assert!(!head.has_attr(AttrKind::Ruby));
    }

    #[test]
    fn paragraph_delimiters() {
        let analyzer = UnicodeAnalyzer;
        assert_eq!(analyzer.find_paragraph_boundary("ab\ncd"), (2, 3));
        assert_eq!(analyzer.find_paragraph_boundary("ab\r\ncd"), (2, 4));
        assert_eq!(analyzer.find_paragraph_boundary("ab\r"), (2, 3));
        assert_eq!(analyzer.find_paragraph_boundary("a\u{2029}b"), (1, 4));
        assert_eq!(analyzer.find_paragraph_boundary("abc"), (3, 3));
    }

    #[test]
    fn base_dir_from_first_strong() {
        let analyzer = UnicodeAnalyzer;
        assert_eq!(analyzer.find_base_dir("12 שלום abc"), Some(Direction::Rtl));
        assert_eq!(analyzer.find_base_dir("(abc)"), Some(Direction::Ltr));
        assert_eq!(analyzer.find_base_dir("123 !"), None);
    }
}
