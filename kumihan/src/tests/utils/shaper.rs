// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::vec::Vec;

use crate::{Analysis, EMPTY_GLYPH, FontDesc, Glyph, GlyphString, Rect, Shaper};

/// Advance of every spacing character.
pub(crate) const ADVANCE: i32 = 10;
/// Distance from the baseline to the top of a line.
pub(crate) const ASCENT: i32 = 8;
/// Logical height of a line.
pub(crate) const HEIGHT: i32 = 10;

/// A shaper with fixed advances.
///
/// Spaces become empty glyphs, U+2028 and combining marks (U+0300..U+036F) take no space and
/// marks join the cluster of the preceding character. Glyph ids are the code points.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct MonospaceShaper;

impl Shaper for MonospaceShaper {
    fn shape(&self, text: &str, analysis: &Analysis) -> GlyphString {
        let mut clusters: Vec<Vec<(Glyph, usize)>> = Vec::new();
        for (index, ch) in text.char_indices() {
            match ch {
                '\u{300}'..='\u{36f}' => {
                    let mut mark = Glyph::new(u32::from(ch), 0);
                    mark.is_cluster_start = false;
                    match clusters.last_mut() {
                        Some(cluster) => {
                            let start = cluster[0].1;
                            cluster.push((mark, start));
                        }
                        None => clusters.push(std::vec![(Glyph::new(u32::from(ch), 0), index)]),
                    }
                }
                ' ' => clusters.push(std::vec![(Glyph::new(EMPTY_GLYPH, ADVANCE), index)]),
                '\u{2028}' => clusters.push(std::vec![(Glyph::new(EMPTY_GLYPH, 0), index)]),
                _ => clusters.push(std::vec![(Glyph::new(u32::from(ch), ADVANCE), index)]),
            }
        }
        if analysis.is_rtl() {
            clusters.reverse();
        }
        let mut glyphs = GlyphString::new();
        for (glyph, cluster) in clusters.into_iter().flatten() {
            glyphs.push(glyph, cluster);
        }
        glyphs
    }

    fn glyph_extents(&self, glyphs: &GlyphString, _font: &FontDesc) -> (Rect, Rect) {
        let width = glyphs.width();
        let logical = Rect::new(0, -ASCENT, width, HEIGHT);
        let inked = glyphs.glyphs.iter().filter(|g| !g.is_empty()).count();
        let ink = if inked == 0 {
            Rect::default()
        } else {
            Rect::new(0, -ASCENT + 1, width, HEIGHT - 2)
        };
        (ink, logical)
    }
}
