// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::{Direction, GlyphString, Item, ItemProperties, LogAttr};

/// An item together with its glyphs, as placed on a line.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    /// The text span and its analysis.
    pub item: Item,
    /// Shaped glyphs, in visual order.
    pub glyphs: GlyphString,
}

impl Run {
    /// The text of the run.
    pub fn text<'t>(&self, layout_text: &'t str) -> &'t str {
        &layout_text[self.item.range()]
    }

    /// Sum of the glyph advances.
    pub fn width(&self) -> i32 {
        self.glyphs.width()
    }

    /// Layout-relevant style of the run.
    pub fn properties(&self) -> ItemProperties {
        self.item.properties()
    }

    pub(crate) fn is_tab(&self, layout_text: &str) -> bool {
        layout_text[self.item.offset..].starts_with('\t')
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LineData {
    /// Byte offset of the line's first character.
    pub(crate) start_index: usize,
    /// Length in bytes, excluding any paragraph delimiter.
    pub(crate) length: usize,
    pub(crate) is_paragraph_start: bool,
    /// Base direction of the paragraph the line belongs to.
    pub(crate) resolved_dir: Direction,
    /// Runs in visual order.
    pub(crate) runs: Vec<Run>,
}

/// Cached result of breaking the layout text into lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LayoutLines {
    pub(crate) lines: Vec<LineData>,
    /// One entry per character of the layout text plus one.
    pub(crate) log_attrs: Vec<LogAttr>,
}
