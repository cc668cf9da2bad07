// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph strings.

use alloc::vec::Vec;
use core::ops::Range;

/// Glyph identifier as understood by the [`Shaper`](crate::Shaper).
pub type GlyphId = u32;

/// Identifier of a glyph that draws nothing.
///
/// Shapers map whitespace to it; a trailing empty glyph is allowed to hang past the end of a
/// line and is credited back during justification. Tabs and shape overrides use it too.
pub const EMPTY_GLYPH: GlyphId = 0;

/// A positioned glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Glyph identifier.
    pub id: GlyphId,
    /// Advance in layout units.
    pub width: i32,
    /// Horizontal offset from the pen position.
    pub x_offset: i32,
    /// Vertical offset from the baseline.
    pub y_offset: i32,
    /// Whether this glyph starts a cluster.
    pub is_cluster_start: bool,
}

impl Glyph {
    /// A cluster-starting glyph with the given advance and no offsets.
    pub fn new(id: GlyphId, width: i32) -> Self {
        Self {
            id,
            width,
            x_offset: 0,
            y_offset: 0,
            is_cluster_start: true,
        }
    }

    /// Returns `true` if this is an [`EMPTY_GLYPH`].
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_GLYPH
    }
}

/// A sequence of glyphs in visual order, each mapped back to the byte offset of the cluster it
/// belongs to.
///
/// For right-to-left runs the glyphs are still stored left to right, so the cluster offsets
/// decrease along the string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphString {
    /// The glyphs.
    pub glyphs: Vec<Glyph>,
    /// For each glyph, the byte offset of its cluster within the shaped text.
    pub log_clusters: Vec<usize>,
}

/// A run of glyphs sharing one cluster offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClusterSpan {
    /// Glyph indices, in visual order.
    pub(crate) glyphs: Range<usize>,
    /// Bytes of the shaped text covered by the cluster.
    pub(crate) bytes: Range<usize>,
}

impl GlyphString {
    /// Creates an empty glyph string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `glyph`, belonging to the cluster at byte `cluster`.
    pub fn push(&mut self, glyph: Glyph, cluster: usize) {
        self.glyphs.push(glyph);
        self.log_clusters.push(cluster);
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns `true` if there are no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Sum of all advances.
    pub fn width(&self) -> i32 {
        self.glyphs.iter().map(|g| g.width).sum()
    }

    /// Reverses glyph order, as a shaper does for right-to-left text.
    pub fn reverse(&mut self) {
        self.glyphs.reverse();
        self.log_clusters.reverse();
    }

    /// Removes the glyph at `index` together with its cluster mapping.
    pub fn remove(&mut self, index: usize) -> Glyph {
        self.log_clusters.remove(index);
        self.glyphs.remove(index)
    }

    /// Groups glyphs into clusters, in visual order.
    ///
    /// `text_len` is the byte length of the shaped text; it closes the logically last cluster.
    pub(crate) fn clusters(&self, text_len: usize) -> Vec<ClusterSpan> {
        let mut spans: Vec<ClusterSpan> = Vec::new();
        let mut i = 0;
        while i < self.log_clusters.len() {
            let start = self.log_clusters[i];
            let mut j = i + 1;
            while j < self.log_clusters.len() && self.log_clusters[j] == start {
                j += 1;
            }
            spans.push(ClusterSpan {
                glyphs: i..j,
                bytes: start..start,
            });
            i = j;
        }
        let mut starts: Vec<usize> = spans.iter().map(|s| s.bytes.start).collect();
        starts.sort_unstable();
        starts.dedup();
        for span in &mut spans {
            let ix = starts.partition_point(|&b| b <= span.bytes.start);
            span.bytes.end = starts.get(ix).copied().unwrap_or(text_len).max(span.bytes.start);
        }
        spans
    }

    /// Per-character advances for `text`, the text this string was shaped from.
    ///
    /// Each cluster's advance is split evenly over its characters, with the remainder going to
    /// the first one.
    pub fn logical_widths(&self, text: &str) -> Vec<i32> {
        let offsets = char_offsets(text);
        let mut widths = alloc::vec![0; offsets.len()];
        for span in self.clusters(text.len()) {
            let width: i32 = self.glyphs[span.glyphs].iter().map(|g| g.width).sum();
            let first = char_index(&offsets, span.bytes.start);
            let last = char_index(&offsets, span.bytes.end).max(first + 1);
            let Some(chars) = widths.get_mut(first..last.min(offsets.len())) else {
                continue;
            };
            let count = i32::try_from(chars.len()).unwrap_or(i32::MAX).max(1);
            let share = width / count;
            for w in chars.iter_mut() {
                *w += share;
            }
            if let Some(w) = chars.first_mut() {
                *w += width - share * count;
            }
        }
        widths
    }

    /// For each character of `text`, the advance of its cluster if the character is the
    /// cluster's last one and every glyph of the cluster is empty.
    ///
    /// Breaking a line after such a character lets that cluster hang past the line end.
    pub(crate) fn hangs(&self, text: &str) -> Vec<i32> {
        let offsets = char_offsets(text);
        let mut hangs = alloc::vec![0; offsets.len()];
        for span in self.clusters(text.len()) {
            let Some(width) = empty_width(&self.glyphs[span.glyphs]) else {
                continue;
            };
            let end = char_index(&offsets, span.bytes.end);
            if let Some(hang) = end.checked_sub(1).and_then(|c| hangs.get_mut(c)) {
                *hang = width;
            }
        }
        hangs
    }

    /// The advance of the logically last cluster if all of its glyphs are empty, or 0.
    pub(crate) fn trailing_hang(&self, rtl: bool) -> i32 {
        let cluster = if rtl {
            self.log_clusters.first()
        } else {
            self.log_clusters.last()
        };
        let Some(&cluster) = cluster else {
            return 0;
        };
        let count = if rtl {
            self.log_clusters.iter().take_while(|&&c| c == cluster).count()
        } else {
            self.log_clusters.iter().rev().take_while(|&&c| c == cluster).count()
        };
        let glyphs = if rtl {
            &self.glyphs[..count]
        } else {
            &self.glyphs[self.glyphs.len() - count..]
        };
        empty_width(glyphs).unwrap_or(0)
    }

    /// The x position of the leading or trailing edge of the character at byte `index` of
    /// `text`, measured from the left edge of the string.
    ///
    /// Characters sharing a cluster divide the cluster's advance evenly.
    pub fn index_to_x(&self, text: &str, rtl: bool, index: usize, trailing: bool) -> i32 {
        let spans = self.clusters(text.len());
        let mut left = 0;
        for span in &spans {
            let width: i32 = self.glyphs[span.glyphs.clone()]
                .iter()
                .map(|g| g.width)
                .sum();
            if span.bytes.contains(&index) || (span.bytes.is_empty() && span.bytes.start == index)
            {
                let (start_x, end_x) = if rtl {
                    (left + width, left)
                } else {
                    (left, left + width)
                };
                let cluster = &text[span.bytes.clone()];
                let cluster_chars = i32::try_from(cluster.chars().count())
                    .unwrap_or(i32::MAX)
                    .max(1);
                let before = &text[span.bytes.start..index.min(span.bytes.end)];
                let mut offset = i32::try_from(before.chars().count()).unwrap_or(i32::MAX);
                if trailing {
                    offset += 1;
                }
                return ((cluster_chars - offset) * start_x + offset * end_x) / cluster_chars;
            }
            left += width;
        }
        // Past the last cluster: the logical end edge.
        if rtl { 0 } else { left }
    }
}

/// Total advance of `glyphs` if there are some and all of them are empty.
fn empty_width(glyphs: &[Glyph]) -> Option<i32> {
    (!glyphs.is_empty() && glyphs.iter().all(Glyph::is_empty))
        .then(|| glyphs.iter().map(|g| g.width).sum())
}

/// Byte offsets of every character in `text`.
pub(crate) fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices().map(|(i, _)| i).collect()
}

/// Index of the character at byte `byte`, or the character count if `byte` is the end.
pub(crate) fn char_index(offsets: &[usize], byte: usize) -> usize {
    offsets.partition_point(|&o| o < byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ltr(text: &str, width: i32) -> GlyphString {
        let mut glyphs = GlyphString::new();
        for (i, ch) in text.char_indices() {
            let id = if ch == ' ' { EMPTY_GLYPH } else { u32::from(ch) };
            glyphs.push(Glyph::new(id, width), i);
        }
        glyphs
    }

    #[test]
    fn multi_char_cluster_splits_width() {
        // One glyph for "ab", one for "c".
        let mut glyphs = GlyphString::new();
        glyphs.push(Glyph::new(1, 21), 0);
        glyphs.push(Glyph::new(2, 10), 2);
        assert_eq!(glyphs.logical_widths("abc"), vec![11, 10, 10]);
        assert_eq!(glyphs.index_to_x("abc", false, 1, false), 10);
        assert_eq!(glyphs.index_to_x("abc", false, 1, true), 21);
    }

    #[test]
    fn rtl_index_to_x_mirrors() {
        let mut glyphs = ltr("abc", 10);
        glyphs.reverse();
        // The first logical character is rightmost.
        assert_eq!(glyphs.index_to_x("abc", true, 0, false), 30);
        assert_eq!(glyphs.index_to_x("abc", true, 0, true), 20);
        assert_eq!(glyphs.index_to_x("abc", true, 2, true), 0);
    }

    #[test]
    fn trailing_space_hangs() {
        let glyphs = ltr("ab c ", 10);
        assert_eq!(glyphs.hangs("ab c "), vec![0, 0, 10, 0, 10]);
        assert_eq!(glyphs.trailing_hang(false), 10);
        assert_eq!(ltr("ab", 10).trailing_hang(false), 0);
    }

    #[test]
    fn space_with_mark_does_not_hang_in_either_direction() {
        let text = "a \u{301}";
        let mut glyphs = GlyphString::new();
        glyphs.push(Glyph::new(1, 10), 0);
        glyphs.push(Glyph::new(EMPTY_GLYPH, 10), 1);
        let mut mark = Glyph::new(0x301, 0);
        mark.is_cluster_start = false;
        glyphs.push(mark, 1);
        assert_eq!(glyphs.hangs(text), vec![0, 0, 0]);
        assert_eq!(glyphs.trailing_hang(false), 0);

        glyphs.reverse();
        assert_eq!(glyphs.hangs(text), vec![0, 0, 0]);
        assert_eq!(glyphs.trailing_hang(true), 0);

        let mut rtl_space = ltr("ab ", 10);
        rtl_space.reverse();
        assert_eq!(rtl_space.hangs("ab "), vec![0, 0, 10]);
        assert_eq!(rtl_space.trailing_hang(true), 10);
    }
}
