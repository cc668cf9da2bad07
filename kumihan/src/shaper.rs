// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kumihan_attrs::{FontDesc, Rect};

use crate::{Analysis, EllipsizeMode, GlyphString, Run};

/// Converts text to glyphs and measures them.
///
/// A layout calls its shaper from whichever thread the layout is used on; implementations must
/// either be thread-safe or stay confined to that thread.
pub trait Shaper {
    /// Shapes `text`, a single item, according to `analysis`.
    ///
    /// Glyphs must be returned in visual order with `log_clusters` holding byte offsets into
    /// `text`. Characters the font cannot map should still produce a glyph with a usable
    /// advance.
    fn shape(&self, text: &str, analysis: &Analysis) -> GlyphString;

    /// Returns the ink and logical rectangles of `glyphs` set in `font`, relative to the
    /// baseline origin of the first glyph.
    ///
    /// Called with an empty string to obtain the line height of an empty line.
    fn glyph_extents(&self, glyphs: &GlyphString, font: &FontDesc) -> (Rect, Rect);

    /// Truncates a line to `width` with an ellipsis.
    ///
    /// Invoked on every line, in logical run order, when the layout's [`EllipsizeMode`] is not
    /// [`EllipsizeMode::None`]. The default implementation leaves the runs untouched.
    fn ellipsize(&self, runs: &mut Vec<Run>, text: &str, mode: EllipsizeMode, width: Option<i32>) {
        let _ = (runs, text, mode, width);
    }
}
