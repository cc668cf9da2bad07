// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph construction that bypasses or adjusts the shaper.

use kumihan_attrs::Rect;

use crate::glyph::{char_index, char_offsets};
use crate::{EMPTY_GLYPH, Glyph, GlyphString, LogAttr, SCALE};

/// One empty glyph per character, each advancing by the imposed logical width.
pub(crate) fn imposed_shape(text: &str, logical: &Rect) -> GlyphString {
    let mut glyphs = GlyphString::new();
    for (index, _) in text.char_indices() {
        glyphs.push(Glyph::new(EMPTY_GLYPH, logical.width), index);
    }
    glyphs
}

/// Extents of `n_chars` imposed placeholders laid side by side.
pub(crate) fn imposed_extents(n_chars: usize, ink: &Rect, logical: &Rect) -> (Rect, Rect) {
    if n_chars == 0 {
        return (Rect::default(), Rect::default());
    }
    let extra = logical
        .width
        .saturating_mul(i32::try_from(n_chars - 1).unwrap_or(i32::MAX));
    let spread = |rect: &Rect| Rect {
        x: rect.x.min(rect.x + extra),
        y: rect.y,
        width: rect.width.max(rect.width + extra),
        height: rect.height,
    };
    (spread(ink), spread(logical))
}

/// A single empty glyph of the given advance, used for tabs.
pub(crate) fn tab_glyphs(width: i32) -> GlyphString {
    let mut glyphs = GlyphString::new();
    glyphs.push(Glyph::new(EMPTY_GLYPH, width), 0);
    glyphs
}

/// Drops a zero-width empty glyph some shapers emit ahead of a cluster.
pub(crate) fn strip_leading_empty(glyphs: &mut GlyphString) {
    let strip = glyphs.len() > 1
        && glyphs
            .glyphs
            .first()
            .is_some_and(|g| g.is_empty() && g.width == 0);
    if strip {
        glyphs.remove(0);
        if let Some(first) = glyphs.glyphs.first_mut() {
            first.is_cluster_start = true;
        }
    }
}

/// Adds `spacing` around every grapheme of a shaped item.
///
/// Half the spacing goes before each grapheme that is not the first of the item and the rest
/// after each grapheme that is not the last. `log_attrs` starts at the item's first character.
pub(crate) fn letter_space(
    glyphs: &mut GlyphString,
    text: &str,
    log_attrs: &[LogAttr],
    rtl: bool,
    spacing: i32,
) {
    let mut space_left = spacing / 2;
    // Keep whole-pixel spacing on pixel boundaries.
    if spacing & (SCALE - 1) == 0 {
        space_left = (space_left + SCALE / 2) & !(SCALE - 1);
    }
    let space_right = spacing - space_left;

    let offsets = char_offsets(text);
    let num_chars = offsets.len();
    let mut spans = glyphs.clusters(text.len());
    if rtl {
        spans.reverse();
    }
    for span in spans {
        let start_char = char_index(&offsets, span.bytes.start);
        let end_char = char_index(&offsets, span.bytes.end);
        if !log_attrs
            .get(start_char)
            .is_some_and(|attr| attr.is_cursor_position)
        {
            continue;
        }
        let lo = span.glyphs.start;
        let hi = span.glyphs.end - 1;
        let g = &mut glyphs.glyphs;
        if rtl {
            if start_char > 0 {
                g[hi].width += space_right;
            }
            if end_char < num_chars {
                g[lo].x_offset += space_left;
                g[lo].width += space_left;
            }
        } else {
            if start_char > 0 {
                g[lo].width += space_left;
                g[lo].x_offset += space_left;
            }
            if end_char < num_chars {
                g[hi].width += space_right;
            }
        }
    }
}
