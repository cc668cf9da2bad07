// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Range;

use kumihan_attrs::{AttrList, AttrValue, FontDesc, Rect, Underline};

use super::data::{LineData, Run};
use super::Layout;
use super::shape::imposed_extents;
use crate::{Analyzer, Direction, GlyphString, SCALE, Shaper, UnicodeAnalyzer};

pub(crate) mod greedy;

/// Line in a text layout.
pub struct Line<'a, S, A = UnicodeAnalyzer> {
    pub(crate) layout: &'a Layout<S, A>,
    pub(crate) index: usize,
    pub(crate) data: &'a LineData,
}

impl<S, A> Clone for Line<'_, S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for Line<'_, S, A> {}

impl<S, A> fmt::Debug for Line<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("index", &self.index)
            .field("data", self.data)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Shaper, A: Analyzer> Line<'a, S, A> {
    /// Index of the line within the layout.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the first character of the line.
    pub fn start_index(&self) -> usize {
        self.data.start_index
    }

    /// Length of the line in bytes, not counting a paragraph delimiter.
    pub fn length(&self) -> usize {
        self.data.length
    }

    /// Returns the range of text for the line.
    pub fn text_range(&self) -> Range<usize> {
        self.data.start_index..self.data.start_index + self.data.length
    }

    /// The text of the line.
    pub fn text(&self) -> &'a str {
        &self.layout.text[self.text_range()]
    }

    /// Returns `true` for the first line of a paragraph.
    pub fn is_paragraph_start(&self) -> bool {
        self.data.is_paragraph_start
    }

    /// Base direction of the paragraph the line belongs to.
    pub fn direction(&self) -> Direction {
        self.data.resolved_dir
    }

    /// The runs of the line, in visual order.
    pub fn runs(&self) -> &'a [Run] {
        &self.data.runs
    }

    /// Ink and logical extents relative to the left end of the line's baseline.
    pub fn extents(&self) -> (Rect, Rect) {
        line_extents(self.layout, self.data)
    }

    /// The x position of the leading edge of the character at `index`, or its trailing edge
    /// if `trailing`, relative to the left end of the line.
    ///
    /// Indices outside the line map to the line's right end.
    pub fn index_to_x(&self, index: usize, trailing: bool) -> i32 {
        let text = self.layout.text.as_str();
        let mut x = 0;
        for run in self.runs() {
            if run.item.range().contains(&index) {
                return x + run.glyphs.index_to_x(
                    run.text(text),
                    run.item.analysis.is_rtl(),
                    index - run.item.offset,
                    trailing,
                );
            }
            x += run.width();
        }
        x
    }
}

/// Ink and logical extents of a run relative to its baseline origin, including underline and
/// rise.
pub(crate) fn run_extents<S: Shaper, A: Analyzer>(
    layout: &Layout<S, A>,
    run: &Run,
) -> (Rect, Rect) {
    let properties = run.properties();
    let (mut ink, mut logical) = match &properties.shape {
        Some(shape) => imposed_extents(run.item.num_chars, &shape.ink, &shape.logical),
        None => layout
            .shaper
            .glyph_extents(&run.glyphs, &run.item.analysis.font),
    };
    let raw_ink = ink;

    let reach = match properties.underline {
        Underline::None | Underline::Low => None,
        Underline::Error => Some(3 * SCALE),
        Underline::Single => Some(2 * SCALE),
        Underline::Double => Some(4 * SCALE),
    };
    if let Some(reach) = reach {
        ink.height = ink.height.max(reach - ink.y);
        logical.height = logical.height.max(reach - logical.y);
    } else if properties.underline == Underline::Low {
        ink.height += 2 * SCALE;
        logical.height = logical
            .height
            .max(raw_ink.y + raw_ink.height + 2 * SCALE - logical.y);
    }

    if properties.rise != 0 {
        ink.y -= properties.rise;
        logical.y -= properties.rise;
    }
    (ink, logical)
}

pub(crate) fn line_extents<S: Shaper, A: Analyzer>(
    layout: &Layout<S, A>,
    line: &LineData,
) -> (Rect, Rect) {
    if line.runs.is_empty() {
        let font = layout.font_at(line.start_index);
        let (_, logical) = layout.shaper.glyph_extents(&GlyphString::new(), font);
        return (
            Rect::default(),
            Rect {
                x: 0,
                width: 0,
                ..logical
            },
        );
    }

    let mut ink = Rect::default();
    let mut logical = Rect::default();
    let mut x = 0;
    for run in &line.runs {
        let (run_ink, run_logical) = run_extents(layout, run);
        if ink.is_empty() {
            ink = run_ink.translate(x, 0);
        } else if !run_ink.is_empty() {
            ink = ink.union(&run_ink.translate(x, 0));
        }
        let top = logical.y.min(run_logical.y);
        logical.height = logical.bottom().max(run_logical.bottom()) - top;
        logical.y = top;
        x += run_logical.width;
    }
    logical.width = x;
    (ink, logical)
}

/// Font of the text at `index`: the last font attribute covering it, else the layout font.
pub(crate) fn font_at<'a>(
    attrs: &'a AttrList,
    default: &'a FontDesc,
    index: usize,
) -> &'a FontDesc {
    attrs
        .iter()
        .filter(|attr| attr.range().contains(&index))
        .filter_map(|attr| match attr.value() {
            AttrValue::FontDesc(font) => Some(font),
            _ => None,
        })
        .last()
        .unwrap_or(default)
}
