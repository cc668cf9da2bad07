// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kumihan_attrs::Rect;

use super::data::{LineData, Run};
use super::line::run_extents;
use super::shape::imposed_extents;
use super::{Geometry, Layout, Line, LineGeometry};
use crate::{Analyzer, GlyphString, Shaper, UnicodeAnalyzer};

/// Visual walk over the clusters, runs and lines of a [`Layout`].
///
/// Runs are visited left to right within each line. After the last run of a line the
/// iterator stops once more at the end of the line, where [`run`](Self::run) is `None`.
/// All rectangles are in layout coordinates.
///
/// The iterator borrows the layout, so the layout cannot change while it is alive.
pub struct LayoutIter<'a, S, A = UnicodeAnalyzer> {
    layout: &'a Layout<S, A>,
    lines: &'a [LineData],
    geometry: &'a Geometry,
    line_index: usize,
    /// Equal to the line's run count at the end-of-line stop.
    run_index: usize,
    run_x: i32,
    run_logical: Rect,
    cluster_start: usize,
    next_cluster_start: usize,
    cluster_x: i32,
    cluster_width: i32,
    index: usize,
}

impl<S, A> fmt::Debug for LayoutIter<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutIter")
            .field("line_index", &self.line_index)
            .field("run_index", &self.run_index)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Shaper, A: Analyzer> LayoutIter<'a, S, A> {
    pub(crate) fn new(layout: &'a Layout<S, A>) -> Self {
        let mut iter = Self {
            layout,
            lines: &layout.line_data().lines,
            geometry: layout.geometry(),
            line_index: 0,
            run_index: 0,
            run_x: 0,
            run_logical: Rect::default(),
            cluster_start: 0,
            next_cluster_start: 0,
            cluster_x: 0,
            cluster_width: 0,
            index: 0,
        };
        iter.update_run();
        iter
    }

    fn line_data(&self) -> &'a LineData {
        &self.lines[self.line_index]
    }

    fn line_geometry(&self) -> LineGeometry {
        self.geometry
            .lines
            .get(self.line_index)
            .copied()
            .unwrap_or_default()
    }

    fn update_run(&mut self) {
        let geometry = self.line_geometry();
        if self.run_index == 0 {
            self.run_x = geometry.logical.x;
        } else {
            self.run_x += self.run_logical.width;
        }

        self.cluster_start = 0;
        match self.run() {
            Some(run) => {
                let (_, logical) = run_extents(self.layout, run);
                self.run_logical = logical.translate(self.run_x, geometry.baseline);
                self.cluster_x = self.run_logical.x;
                self.update_cluster(run);
            }
            None => {
                self.run_logical = Rect::new(
                    self.run_x,
                    geometry.logical.y,
                    0,
                    geometry.logical.height,
                );
                self.cluster_x = self.run_x;
                self.next_cluster_start = 0;
                self.cluster_width = 0;
                let line = self.line_data();
                self.index = line.start_index + line.length;
            }
        }
    }

    fn update_cluster(&mut self, run: &Run) {
        let glyphs = &run.glyphs;
        self.next_cluster_start = next_cluster_start(glyphs, self.cluster_start);
        self.cluster_width = glyphs.glyphs[self.cluster_start..self.next_cluster_start]
            .iter()
            .map(|g| g.width)
            .sum();
        let cluster = glyphs
            .log_clusters
            .get(self.cluster_start)
            .copied()
            .unwrap_or(0);
        self.index = run.item.offset + cluster;
    }

    /// Moves to the next cluster, crossing into the next run or line as needed.
    ///
    /// Returns `false` at the end of the layout.
    pub fn next_cluster(&mut self) -> bool {
        let Some(run) = self.run() else {
            return self.next_line();
        };
        if self.next_cluster_start >= run.glyphs.len() {
            return self.next_run();
        }
        self.cluster_start = self.next_cluster_start;
        self.cluster_x += self.cluster_width;
        self.update_cluster(run);
        true
    }

    /// Moves to the next run, or to the end-of-line stop after the last run.
    ///
    /// Returns `false` at the end of the layout.
    pub fn next_run(&mut self) -> bool {
        if self.run().is_none() {
            return self.next_line();
        }
        self.run_index += 1;
        self.update_run();
        true
    }

    /// Moves to the first run of the next line.
    ///
    /// Returns `false` on the last line.
    pub fn next_line(&mut self) -> bool {
        if self.at_last_line() {
            return false;
        }
        self.line_index += 1;
        self.run_index = 0;
        self.update_run();
        true
    }

    /// Byte index of the current cluster, or of the line end at the end-of-line stop.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current line.
    pub fn line(&self) -> Line<'a, S, A> {
        Line {
            layout: self.layout,
            index: self.line_index,
            data: self.line_data(),
        }
    }

    /// The current run, or `None` at the end-of-line stop.
    pub fn run(&self) -> Option<&'a Run> {
        self.line_data().runs.get(self.run_index)
    }

    /// Returns `true` on the last line of the layout.
    pub fn at_last_line(&self) -> bool {
        self.line_index + 1 >= self.lines.len()
    }

    /// Distance from the top of the layout to the current line's baseline.
    pub fn baseline(&self) -> i32 {
        self.line_geometry().baseline
    }

    /// Ink and logical extents of the current cluster.
    pub fn cluster_extents(&self) -> (Rect, Rect) {
        let Some(run) = self.run() else {
            return self.run_extents();
        };
        let logical = Rect::new(
            self.cluster_x,
            self.run_logical.y,
            self.cluster_width,
            self.run_logical.height,
        );
        let properties = run.properties();
        let ink = match &properties.shape {
            Some(shape) => imposed_extents(1, &shape.ink, &shape.logical).0,
            None => {
                let range = self.cluster_start..self.next_cluster_start;
                let glyphs = GlyphString {
                    glyphs: run.glyphs.glyphs[range.clone()].to_vec(),
                    log_clusters: run.glyphs.log_clusters[range].to_vec(),
                };
                self.layout
                    .shaper
                    .glyph_extents(&glyphs, &run.item.analysis.font)
                    .0
            }
        };
        let ink = ink.translate(self.cluster_x, self.baseline() - properties.rise);
        (ink, logical)
    }

    /// Ink and logical extents of the current run.
    ///
    /// At the end-of-line stop both have zero width and the line's vertical extents.
    pub fn run_extents(&self) -> (Rect, Rect) {
        match self.run() {
            Some(run) => {
                let (ink, _) = run_extents(self.layout, run);
                (ink.translate(self.run_x, self.baseline()), self.run_logical)
            }
            None => {
                let line_ink = self.line_geometry().ink;
                let ink = Rect {
                    x: self.run_x,
                    width: 0,
                    ..line_ink
                };
                (ink, self.run_logical)
            }
        }
    }

    /// Ink and logical extents of the current line.
    pub fn line_extents(&self) -> (Rect, Rect) {
        let geometry = self.line_geometry();
        (geometry.ink, geometry.logical)
    }

    /// Vertical span of the current line, including its share of the line spacing.
    ///
    /// Spacing is split evenly between neighboring lines, so consecutive ranges touch.
    pub fn line_yrange(&self) -> (i32, i32) {
        let logical = self.line_geometry().logical;
        let spacing = self.layout.spacing;
        let half = spacing / 2;
        let top = if self.line_index == 0 {
            logical.y
        } else {
            logical.y - half
        };
        let bottom = if self.at_last_line() {
            logical.bottom()
        } else {
            logical.bottom() + spacing - half
        };
        (top, bottom)
    }

    /// Ink and logical extents of the whole layout.
    pub fn layout_extents(&self) -> (Rect, Rect) {
        (self.geometry.ink, self.geometry.logical)
    }
}

/// Index of the glyph starting the cluster after the one at `start`.
fn next_cluster_start(glyphs: &GlyphString, start: usize) -> usize {
    glyphs
        .glyphs
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, g)| g.is_cluster_start)
        .map_or(glyphs.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::next_cluster_start;
    use crate::{Glyph, GlyphString};

    #[test]
    fn clusters_follow_start_flags() {
        let mut glyphs = GlyphString::new();
        glyphs.push(Glyph::new(1, 10), 0);
        let mut mark = Glyph::new(2, 0);
        mark.is_cluster_start = false;
        glyphs.push(mark, 0);
        glyphs.push(Glyph::new(3, 10), 3);
        assert_eq!(next_cluster_start(&glyphs, 0), 2);
        assert_eq!(next_cluster_start(&glyphs, 2), 3);
        assert_eq!(next_cluster_start(&GlyphString::new(), 0), 0);
    }
}
