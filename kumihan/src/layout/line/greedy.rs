// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use kumihan_attrs::AttrKind;

use crate::layout::alignment::{adjust_letter_spacing, justify};
use crate::layout::data::{LayoutLines, LineData, Run};
use crate::layout::reorder::visual_order;
use crate::layout::shape::{imposed_shape, letter_space, strip_leading_empty, tab_glyphs};
use crate::layout::{BreakResult, EllipsizeMode, Layout, WrapMode};
use crate::tabs::tab_stop;
use crate::{Analyzer, Direction, GlyphString, Item, ItemProperties, LogAttr, Shaper};

const LINE_SEPARATOR: char = '\u{2028}';

/// Per-character measurements of a shaped item.
struct Widths {
    /// Advance of every character.
    log: Vec<i32>,
    /// Advance that may hang past the line end when breaking after each character.
    hangs: Vec<i32>,
}

/// The item at the front of the queue, shaped once and consumed across lines.
struct ShapedItem {
    glyphs: GlyphString,
    properties: ItemProperties,
    /// Byte range of the item when it was shaped.
    range: Range<usize>,
    rtl: bool,
    /// Characters already placed on earlier lines.
    offset: usize,
    widths: Option<Widths>,
}

impl ShapedItem {
    fn widths(&mut self, text: &str) -> &Widths {
        self.widths.get_or_insert_with(|| {
            let text = &text[self.range.clone()];
            let mut log = self.glyphs.logical_widths(text);
            // Run-level spacing is split around the item later; charge it to the last character.
            if let Some(last) = log.last_mut() {
                *last += self.properties.letter_spacing;
            }
            Widths {
                log,
                hangs: self.glyphs.hangs(text),
            }
        })
    }
}

/// State saved after every item that contains a break opportunity.
#[derive(Copy, Clone, Debug)]
struct BreakPoint {
    remaining: Option<i32>,
    start_offset: usize,
    /// Runs on the line before the item.
    run_count: usize,
}

/// A ruby base waiting for its annotation.
#[derive(Copy, Clone, Debug)]
struct RubyBase {
    run_index: usize,
    width: i32,
    remaining: Option<i32>,
    start_offset: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Break {
    chars: usize,
    width: i32,
    end_width: i32,
}

struct ParaBreakState {
    /// Remaining items of the paragraph, the first one possibly partly placed already.
    items: VecDeque<Item>,
    base_dir: Direction,
    first_line: bool,
    line_start_index: usize,
    /// Space left on the current line, or `None` when not wrapping.
    remaining: Option<i32>,
    /// Character offset of the first item in `items`.
    start_offset: usize,
    current: Option<ShapedItem>,
}

impl ParaBreakState {
    fn charge(&mut self, width: i32) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = (*remaining - width).max(0);
        }
    }
}

struct Paragraph {
    /// Text of the paragraph without its delimiter.
    range: Range<usize>,
    start_offset: usize,
    dir: Direction,
}

/// Breaks the text of `layout` into paragraphs and lines.
pub(crate) fn break_paragraphs<S: Shaper, A: Analyzer>(layout: &Layout<S, A>) -> LayoutLines {
    let text = layout.text.as_str();
    let analyzer = &layout.analyzer;
    let n_chars = text.chars().count();
    let mut log_attrs = vec![LogAttr::default(); n_chars + 1];

    let mut paragraphs = Vec::new();
    let mut prev_dir = if layout.auto_dir {
        analyzer.find_base_dir(text).unwrap_or(layout.base_dir)
    } else {
        layout.base_dir
    };
    let mut start = 0;
    let mut start_offset = 0;
    loop {
        let (delimiter, next) = if layout.single_paragraph {
            (text.len(), text.len())
        } else {
            let (delimiter, next) = analyzer.find_paragraph_boundary(&text[start..]);
            let delimiter = (start + delimiter).min(text.len());
            let next = (start + next).clamp(delimiter, text.len());
            // A zero-length delimiter would never advance.
            let next = if next == delimiter && delimiter < text.len() {
                delimiter + text[delimiter..].chars().next().map_or(0, char::len_utf8)
            } else {
                next
            };
            (delimiter, next)
        };

        let dir = if layout.auto_dir {
            let dir = analyzer
                .find_base_dir(&text[start..delimiter])
                .unwrap_or(prev_dir);
            prev_dir = dir;
            dir
        } else {
            layout.base_dir
        };

        let para_text = &text[start..next];
        let para_chars = para_text.chars().count();
        let mut para_attrs = vec![LogAttr::default(); para_chars + 1];
        analyzer.log_attrs(para_text, &mut para_attrs);
        // The boundary shared with the previous paragraph keeps its break flags.
        let shared = log_attrs[start_offset];
        para_attrs[0].is_line_break |= shared.is_line_break;
        para_attrs[0].is_char_break |= shared.is_char_break;
        log_attrs[start_offset..=start_offset + para_chars].copy_from_slice(&para_attrs);

        paragraphs.push(Paragraph {
            range: start..delimiter,
            start_offset,
            dir,
        });
        if delimiter == text.len() {
            break;
        }
        start_offset += para_chars;
        start = next;
    }

    let mut lines = Vec::new();
    {
        let breaker = LineBreaker {
            layout,
            log_attrs: &log_attrs,
            n_chars,
        };
        for para in paragraphs {
            let items = analyzer.itemize(
                text,
                para.range.clone(),
                &layout.attrs,
                &layout.font,
                para.dir,
            );
            if items.is_empty() {
                lines.push(LineData {
                    start_index: para.range.start,
                    length: 0,
                    is_paragraph_start: true,
                    resolved_dir: para.dir,
                    runs: Vec::new(),
                });
                continue;
            }
            let mut state = ParaBreakState {
                items: items.into(),
                base_dir: para.dir,
                first_line: true,
                line_start_index: para.range.start,
                remaining: None,
                start_offset: para.start_offset,
                current: None,
            };
            while !state.items.is_empty() {
                lines.push(breaker.process_line(&mut state));
            }
        }
    }

    LayoutLines { lines, log_attrs }
}

struct LineBreaker<'a, S: Shaper, A: Analyzer> {
    layout: &'a Layout<S, A>,
    log_attrs: &'a [LogAttr],
    n_chars: usize,
}

impl<S: Shaper, A: Analyzer> LineBreaker<'_, S, A> {
    fn text(&self) -> &str {
        &self.layout.text
    }

    fn can_break_at(&self, offset: usize, always_wrap_char: bool) -> bool {
        if offset >= self.n_chars {
            return true;
        }
        let wrap = match self.layout.wrap {
            WrapMode::WordChar if always_wrap_char => WrapMode::Char,
            WrapMode::WordChar => WrapMode::Word,
            wrap => wrap,
        };
        let attr = &self.log_attrs[offset];
        match wrap {
            WrapMode::Char => attr.is_char_break,
            _ => attr.is_line_break,
        }
    }

    fn can_break_in(
        &self,
        start_offset: usize,
        num_chars: usize,
        allow_break_at_start: bool,
    ) -> bool {
        let first = if allow_break_at_start { 0 } else { 1 };
        (first..num_chars).any(|i| self.can_break_at(start_offset + i, false))
    }

    /// A tab advances to the first stop past the current line width.
    fn shape_tab(&self, runs: &[Run]) -> GlyphString {
        let current: i32 = runs.iter().map(Run::width).sum();
        let tabs = self.layout.tabs.as_ref();
        for index in 0.. {
            let stop = tab_stop(tabs, index, || self.layout.default_tab_width());
            if stop > current {
                return tab_glyphs(stop - current);
            }
            if stop == i32::MAX {
                break;
            }
        }
        tab_glyphs(0)
    }

    fn shape_run(
        &self,
        runs: &[Run],
        item: &Item,
        properties: &ItemProperties,
        start_offset: usize,
    ) -> GlyphString {
        let text = &self.text()[item.range()];
        if text.starts_with('\t') {
            return self.shape_tab(runs);
        }
        let mut glyphs = match &properties.shape {
            Some(shape) => imposed_shape(text, &shape.logical),
            None => self.layout.shaper.shape(text, &item.analysis),
        };
        strip_leading_empty(&mut glyphs);
        if properties.letter_spacing != 0 && !glyphs.is_empty() {
            let log_attrs = self.log_attrs.get(start_offset..).unwrap_or_default();
            letter_space(
                &mut glyphs,
                text,
                log_attrs,
                item.analysis.is_rtl(),
                properties.letter_spacing,
            );
            // Everything after the last glyph for now; redistributed once the line is done.
            if let Some(last) = glyphs.glyphs.last_mut() {
                last.width += properties.letter_spacing;
            }
        }
        glyphs
    }

    fn insert_run(
        &self,
        state: &mut ParaBreakState,
        runs: &mut Vec<Run>,
        item: Item,
        glyphs: Option<GlyphString>,
        properties: &ItemProperties,
    ) {
        let glyphs = match glyphs {
            Some(glyphs) => glyphs,
            None => self.shape_run(runs, &item, properties, state.start_offset),
        };
        state.start_offset += item.num_chars;
        runs.push(Run { item, glyphs });
    }

    /// Places what is left of an item whole, reusing its glyphs when nothing was split off.
    fn insert_whole(
        &self,
        state: &mut ParaBreakState,
        runs: &mut Vec<Run>,
        item: Item,
        shaped: ShapedItem,
    ) {
        let properties = shaped.properties;
        let is_tab = self.text()[item.offset..].starts_with('\t');
        let glyphs = (shaped.offset == 0 && !is_tab).then_some(shaped.glyphs);
        self.insert_run(state, runs, item, glyphs, &properties);
    }

    /// Places as much of the front item as fits on the line.
    ///
    /// With `force_fit`, something is placed even if it overflows. With `no_break_at_end`,
    /// the item is never placed whole.
    fn process_item(
        &self,
        state: &mut ParaBreakState,
        runs: &mut Vec<Run>,
        force_fit: bool,
        no_break_at_end: bool,
    ) -> BreakResult {
        let Some(mut item) = state.items.pop_front() else {
            return BreakResult::AllFit;
        };
        let text = self.layout.text.as_str();
        let (mut shaped, new_item) = match state.current.take() {
            Some(shaped) => (shaped, false),
            None => {
                let properties = item.properties();
                let glyphs = self.shape_run(runs, &item, &properties, state.start_offset);
                let shaped = ShapedItem {
                    glyphs,
                    properties,
                    range: item.range(),
                    rtl: item.analysis.is_rtl(),
                    offset: 0,
                    widths: None,
                };
                (shaped, true)
            }
        };

        if text[item.offset..].starts_with(LINE_SEPARATOR) {
            self.insert_whole(state, runs, item, shaped);
            return BreakResult::LineSeparator;
        }
        if state.remaining.is_none() && !no_break_at_end {
            self.insert_whole(state, runs, item, shaped);
            return BreakResult::AllFit;
        }
        let limit = state.remaining.unwrap_or(i32::MAX);

        let n = item.num_chars;
        let offset = shaped.offset;
        let (mut width, hang) = if new_item {
            let width = shaped.glyphs.width() + shaped.properties.letter_spacing;
            (width, shaped.glyphs.trailing_hang(shaped.rtl))
        } else {
            let widths = shaped.widths(text);
            let width = widths.log[offset..offset + n].iter().sum();
            let hang = n
                .checked_sub(1)
                .and_then(|last| widths.hangs.get(offset + last))
                .copied()
                .unwrap_or(0);
            (width, hang)
        };
        if item.has_attr(AttrKind::RubyBase) {
            width = 0;
        }
        let end_width = if width > 0 { width - hang } else { width };

        let line_empty = runs.is_empty();
        if (end_width <= limit || (n == 1 && line_empty)) && !no_break_at_end {
            state.charge(width);
            self.insert_whole(state, runs, item, shaped);
            return BreakResult::AllFit;
        }

        let ruby = item.has_attr(AttrKind::Ruby);
        let start_offset = state.start_offset;
        let initial = Break {
            chars: n,
            width,
            end_width,
        };
        let widths = shaped.widths(text);
        let log = &widths.log[offset..offset + n];
        let hangs = &widths.hangs[offset..offset + n];
        let search = |always_wrap_char: bool| {
            find_break(log, hangs, initial, limit, line_empty, |k| {
                self.can_break_at(start_offset + k, always_wrap_char)
                    && (k > 0 || !line_empty)
                    && !ruby
            })
        };
        let mut best = search(false);
        if self.layout.wrap == WrapMode::WordChar && force_fit && best.end_width > limit {
            log::debug!("no word break fits at char {start_offset}, retrying with char breaks");
            best = search(true);
        }

        if !force_fit && best.end_width > limit {
            state.items.push_front(item);
            return BreakResult::NoneFit;
        }

        state.charge(best.width);
        if best.chars == n {
            self.insert_whole(state, runs, item, shaped);
            BreakResult::AllFit
        } else if best.chars == 0 {
            state.items.push_front(item);
            state.current = Some(shaped);
            BreakResult::EmptyFit
        } else {
            let split_index = text[item.range()]
                .char_indices()
                .nth(best.chars)
                .map_or(item.length, |(index, _)| index);
            let head = item.split(split_index, best.chars);
            shaped.offset += best.chars;
            let properties = shaped.properties;
            state.current = Some(shaped);
            self.insert_run(state, runs, head, None, &properties);
            state.items.push_front(item);
            BreakResult::SomeFit
        }
    }

    fn process_line(&self, state: &mut ParaBreakState) -> LineData {
        let layout = self.layout;
        state.remaining = match layout.width {
            Some(width) if layout.ellipsize == EllipsizeMode::None => {
                let indent = layout.indent;
                let width = if state.first_line && indent >= 0 {
                    width - indent
                } else if !state.first_line && indent < 0 {
                    width + indent
                } else {
                    width
                };
                Some(width.max(0))
            }
            _ => None,
        };

        let start_index = state.line_start_index;
        let mut runs: Vec<Run> = Vec::new();
        let mut break_point: Option<BreakPoint> = None;
        let mut ruby_base: Option<RubyBase> = None;
        let mut separator = false;

        while let Some(item) = state.items.front() {
            let old_num_chars = item.num_chars;
            let old_start = state.start_offset;
            let old_remaining = state.remaining;
            let line_has_runs = !runs.is_empty();
            let is_ruby_base = item.has_attr(AttrKind::RubyBase);
            let annotation = item.has_attr(AttrKind::RubyText).then(|| item.clone());

            let result = self.process_item(state, &mut runs, break_point.is_none(), false);
            log::trace!("item at char {old_start} ({old_num_chars} chars): {result:?}");

            let base = ruby_base.take();
            if is_ruby_base {
                if result == BreakResult::AllFit {
                    ruby_base = runs.len().checked_sub(1).map(|run_index| RubyBase {
                        run_index,
                        width: runs[run_index].width(),
                        remaining: old_remaining,
                        start_offset: old_start,
                    });
                }
            } else if let (Some(annotation), Some(base)) = (annotation, base) {
                if self.fit_ruby_text(state, &mut runs, base, annotation, result) {
                    break;
                }
            }

            match result {
                BreakResult::AllFit => {
                    if self.can_break_in(old_start, old_num_chars, line_has_runs) {
                        break_point = Some(BreakPoint {
                            remaining: old_remaining,
                            start_offset: old_start,
                            run_count: runs.len().saturating_sub(1),
                        });
                    }
                }
                BreakResult::SomeFit | BreakResult::EmptyFit => break,
                BreakResult::NoneFit => {
                    let Some(point) = break_point else {
                        break;
                    };
                    log::debug!(
                        "backing off to break opportunity at char {}",
                        point.start_offset
                    );
                    while runs.len() > point.run_count {
                        if let Some(run) = runs.pop() {
                            state.items.push_front(run.item);
                        }
                    }
                    state.current = None;
                    state.start_offset = point.start_offset;
                    state.remaining = point.remaining;
                    let result = self.process_item(state, &mut runs, true, true);
                    log::trace!("break reprocessed at char {}: {result:?}", point.start_offset);
                    break;
                }
                BreakResult::LineSeparator => {
                    separator = true;
                    break;
                }
            }
        }

        let length = runs.iter().map(|run| run.item.length).sum();
        let last_line = state.items.is_empty() || separator;
        let mut line = LineData {
            start_index,
            length,
            is_paragraph_start: state.first_line,
            resolved_dir: state.base_dir,
            runs,
        };
        self.postprocess(&mut line, state.remaining, last_line);
        state.first_line = false;
        state.line_start_index += line.length;
        line
    }

    /// Widens the narrower of a ruby base and its annotation to match the other.
    ///
    /// Returns `true` if the group was moved back to the queue, ending the line.
    fn fit_ruby_text(
        &self,
        state: &mut ParaBreakState,
        runs: &mut Vec<Run>,
        base: RubyBase,
        text_item: Item,
        result: BreakResult,
    ) -> bool {
        // A group that starts the line stays on it.
        let can_rewind = base.run_index > 0;
        if result != BreakResult::AllFit {
            if !can_rewind {
                return false;
            }
            // A line separator was placed whole; otherwise the annotation, or what is left
            // of it, is back at the front of the queue.
            if result != BreakResult::LineSeparator {
                state.items.pop_front();
            }
            rewind_ruby(state, runs, base, text_item);
            return true;
        }

        let Some(text_width) = runs.last().map(Run::width) else {
            return false;
        };
        let diff = base.width - text_width;
        if diff > 0 {
            if can_rewind && state.remaining.is_some_and(|r| r < diff) {
                log::debug!("ruby group at char {} does not fit", base.start_offset);
                rewind_ruby(state, runs, base, text_item);
                return true;
            }
            state.charge(diff);
            if let Some(run) = runs.last_mut() {
                stretch(&mut run.glyphs, diff);
            }
        } else if diff < 0 {
            if let Some(run) = runs.get_mut(base.run_index) {
                stretch(&mut run.glyphs, -diff);
            }
        }
        false
    }

    fn postprocess(&self, line: &mut LineData, remaining: Option<i32>, last_line: bool) {
        let layout = self.layout;
        let text = self.text();

        if layout.ellipsize != EllipsizeMode::None {
            layout
                .shaper
                .ellipsize(&mut line.runs, text, layout.ellipsize, layout.width);
        }

        let levels: Vec<u8> = line.runs.iter().map(|run| run.item.analysis.level).collect();
        let mut logical: Vec<Option<Run>> = core::mem::take(&mut line.runs)
            .into_iter()
            .map(Some)
            .collect();
        line.runs = visual_order(&levels)
            .into_iter()
            .filter_map(|index| logical.get_mut(index).and_then(Option::take))
            .collect();

        adjust_letter_spacing(&mut line.runs, text, line.resolved_dir);

        if layout.justify && !last_line {
            justify(&mut line.runs, text, line.resolved_dir, remaining);
        }
    }
}

/// Moves a ruby base and its annotation back to the queue and restores the line state from
/// before the base.
fn rewind_ruby(state: &mut ParaBreakState, runs: &mut Vec<Run>, base: RubyBase, text_item: Item) {
    let mut removed = runs.split_off(base.run_index.min(runs.len())).into_iter();
    state.items.push_front(text_item);
    if let Some(base_run) = removed.next() {
        state.items.push_front(base_run.item);
    }
    state.current = None;
    state.remaining = base.remaining;
    state.start_offset = base.start_offset;
}

/// Spreads `extra` over the glyphs, centering each glyph in its widened advance.
fn stretch(glyphs: &mut GlyphString, extra: i32) {
    let Ok(count) = i32::try_from(glyphs.len()) else {
        return;
    };
    if count == 0 {
        return;
    }
    let share = extra / count;
    for (index, glyph) in glyphs.glyphs.iter_mut().enumerate() {
        let add = if index == 0 {
            extra - share * (count - 1)
        } else {
            share
        };
        glyph.width += add;
        glyph.x_offset += add / 2;
    }
}

/// Scans break candidates from the end of the item towards its start.
///
/// Returns the first candidate whose width without hanging space fits `limit`, or the
/// smallest candidate if none does, or `initial` if there are no candidates.
fn find_break(
    widths: &[i32],
    hangs: &[i32],
    initial: Break,
    limit: i32,
    line_empty: bool,
    breakable: impl Fn(usize) -> bool,
) -> Break {
    let mut best = initial;
    let mut width = initial.width;
    for k in (0..widths.len()).rev() {
        width -= widths[k];
        if !breakable(k) {
            continue;
        }
        let end_width = k.checked_sub(1).map_or(width, |prev| width - hangs[prev]);
        best = Break {
            chars: k,
            width,
            end_width,
        };
        if end_width <= limit || (k == 1 && line_empty) {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial(widths: &[i32]) -> Break {
        let width = widths.iter().sum();
        Break {
            chars: widths.len(),
            width,
            end_width: width,
        }
    }

    #[test]
    fn find_break_takes_last_fitting_candidate() {
        // "ab cd ef": breaks before 'c' and 'e'.
        let widths = [10; 8];
        let hangs = [0, 0, 10, 0, 0, 10, 0, 0];
        let found = find_break(&widths, &hangs, initial(&widths), 55, true, |k| k == 3 || k == 6);
        assert_eq!(
            found,
            Break {
                chars: 6,
                width: 60,
                end_width: 50
            }
        );
    }

    #[test]
    fn find_break_falls_back_to_smallest_candidate() {
        let widths = [10; 8];
        let hangs = [0; 8];
        let found = find_break(&widths, &hangs, initial(&widths), 5, true, |k| k == 3 || k == 6);
        assert_eq!(found.chars, 3);
        let none = find_break(&widths, &hangs, initial(&widths), 5, true, |_| false);
        assert_eq!(none, initial(&widths));
    }

    #[test]
    fn stretch_centers_extra_space() {
        let mut glyphs = GlyphString::new();
        glyphs.push(crate::Glyph::new(1, 10), 0);
        glyphs.push(crate::Glyph::new(2, 10), 1);
        stretch(&mut glyphs, 7);
        let geometry: Vec<(i32, i32)> = glyphs
            .glyphs
            .iter()
            .map(|g| (g.width, g.x_offset))
            .collect();
        assert_eq!(geometry, [(14, 2), (13, 1)]);
    }
}
