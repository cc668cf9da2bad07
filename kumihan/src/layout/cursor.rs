// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor placement and visual cursor motion.

use alloc::vec;
use alloc::vec::Vec;

use kumihan_attrs::Rect;

use super::Layout;
use super::data::LineData;
use crate::glyph::{char_index, char_offsets};
use crate::{Analyzer, Direction, Error, Shaper};

/// Where a visual cursor move ended up.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CursorMotion {
    /// The cursor moved off the start of the first line.
    BeforeStart,
    /// The cursor moved off the end of the last line.
    AfterEnd,
    /// The cursor is `trailing` characters past the character at byte `index`.
    ///
    /// `trailing` is non-zero only at the end of a line, where the position after the last
    /// grapheme is expressed relative to that grapheme's first character.
    At { index: usize, trailing: usize },
}

impl<S: Shaper, A: Analyzer> Layout<S, A> {
    /// Returns the strong and weak cursor rectangles for an insertion point at byte `index`.
    ///
    /// The strong cursor is where text in the line's direction would be inserted, the weak
    /// cursor where text of the opposite direction would go. Both rectangles have zero
    /// width and span the line's logical height, in layout coordinates.
    pub fn cursor_positions(&self, index: usize) -> Result<(Rect, Rect), Error> {
        self.check_index(index)?;
        let line = self.index_to_line(index);
        let rect = self
            .geometry()
            .lines
            .get(line.index)
            .map(|geometry| geometry.logical)
            .unwrap_or_default();
        let data = line.data;
        let dir = data.resolved_dir;
        let end = data.start_index + data.length;
        // Indices inside a paragraph delimiter sit at the end of the line before it.
        let index = index.min(end);

        // Trailing edge of the character before the cursor.
        let (dir1, x1) = if index == data.start_index {
            let x = if dir == Direction::Ltr { 0 } else { rect.width };
            (dir, x)
        } else {
            let prev = prev_char_boundary(&self.text, index);
            (char_direction(data, prev), line.index_to_x(prev, true))
        };
        // Leading edge of the character after it.
        let x2 = if index < end {
            line.index_to_x(index, false)
        } else if dir == Direction::Ltr {
            rect.width
        } else {
            0
        };

        let (strong_x, weak_x) = if dir1 == dir { (x1, x2) } else { (x2, x1) };
        let caret = |x: i32| Rect::new(rect.x + x, rect.y, 0, rect.height);
        Ok((caret(strong_x), caret(weak_x)))
    }

    /// Moves a cursor one grapheme to the right (`direction > 0`) or left, in visual order.
    ///
    /// `old_trailing` counts characters past `old_index`, as returned by a previous move.
    /// Moving across a paragraph boundary counts as an extra position. `strong` selects which
    /// of the two cursors of [`cursor_positions`](Self::cursor_positions) is moved.
    pub fn move_cursor_visually(
        &self,
        strong: bool,
        old_index: usize,
        old_trailing: usize,
        direction: i32,
    ) -> Result<CursorMotion, Error> {
        self.check_index(old_index)?;
        let text = self.text.as_str();
        let lines = &self.line_data().lines;
        let log_attrs = &self.line_data().log_attrs;
        let forward = direction > 0;

        let mut line_index = self.index_to_line(old_index).index;
        let mut index = old_index;
        for _ in 0..old_trailing {
            match text[index..].chars().next() {
                Some(ch) => index += ch.len_utf8(),
                None => return Err(Error::invalid_trailing(old_index, text.len())),
            }
        }

        let mut line = &lines[line_index];
        let index = index.min(line.start_index + line.length);
        let vis2log = self.vis2log(line, strong);
        let n_vis = vis2log.len() - 1;
        let log2vis = log2vis(&vis2log, line.length);
        let mut vis_pos = to_isize(log2vis[index - line.start_index]);

        let off_left = vis_pos == 0 && !forward;
        let off_right = vis_pos == to_isize(n_vis) && forward;
        let mut vis2log = vis2log;
        if off_left || off_right {
            let ltr = line.resolved_dir == Direction::Ltr;
            let off_start = if off_left { ltr } else { !ltr };
            let paragraph_boundary = if off_start {
                let Some(prev) = line_index.checked_sub(1) else {
                    return Ok(CursorMotion::BeforeStart);
                };
                line_index = prev;
                line = &lines[line_index];
                line.start_index + line.length != index
            } else {
                if line_index + 1 >= lines.len() {
                    return Ok(CursorMotion::AfterEnd);
                }
                line_index += 1;
                line = &lines[line_index];
                line.start_index != index
            };
            vis2log = self.vis2log(line, strong);
            let n = to_isize(vis2log.len() - 1);
            let extra = isize::from(paragraph_boundary);
            vis_pos = if forward { -extra } else { n + extra };
        }

        let n_vis = to_isize(vis2log.len() - 1);
        let start_offset = text[..line.start_index].chars().count();
        let line_text = &text[line.start_index..line.start_index + line.length];
        let offsets = char_offsets(line_text);
        let step = if forward { 1 } else { -1 };
        let mut log_pos;
        loop {
            vis_pos += step;
            let byte = vis2log[clamp_pos(vis_pos, n_vis)];
            log_pos = char_index(&offsets, byte);
            let at_cursor = log_attrs
                .get(start_offset + log_pos)
                .is_some_and(|attr| attr.is_cursor_position);
            if vis_pos <= 0 || vis_pos >= n_vis || at_cursor {
                break;
            }
        }

        let mut new_index = line.start_index + vis2log[clamp_pos(vis_pos, n_vis)];
        let mut trailing = 0;
        if new_index == line.start_index + line.length && line.length > 0 {
            loop {
                log_pos = log_pos.saturating_sub(1);
                new_index = prev_char_boundary(text, new_index);
                trailing += 1;
                let at_cursor = log_attrs
                    .get(start_offset + log_pos)
                    .is_some_and(|attr| attr.is_cursor_position);
                if log_pos == 0 || at_cursor {
                    break;
                }
            }
        }
        Ok(CursorMotion::At {
            index: new_index,
            trailing,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index > self.text.len() {
            return Err(Error::index_out_of_bounds(index, self.text.len()));
        }
        if !self.text.is_char_boundary(index) {
            return Err(Error::not_on_char_boundary(index, self.text.len()));
        }
        Ok(())
    }

    /// For each visual cursor slot of `line`, from left to right, the line-relative byte
    /// offset it stands for.
    ///
    /// At a direction change the slot belongs to whichever side the cursor direction prefers.
    pub(crate) fn vis2log(&self, line: &LineData, strong: bool) -> Vec<usize> {
        let text = self.text.as_str();
        let len = line.length;
        let n_chars = text[line.start_index..line.start_index + len].chars().count();
        let mut result = vec![0; n_chars + 1];
        let mut set = |slot: usize, byte: usize| {
            if let Some(entry) = result.get_mut(slot) {
                *entry = byte;
            }
        };

        let resolved = line.resolved_dir;
        let cursor_dir = if strong { resolved } else { opposite(resolved) };
        if resolved == cursor_dir {
            set(0, if resolved == Direction::Ltr { 0 } else { len });
        }

        let mut prev_dir = resolved;
        let mut pos = 0;
        for run in &line.runs {
            let relative = run.item.offset.saturating_sub(line.start_index);
            let mut bytes: Vec<usize> = text[run.item.range()]
                .char_indices()
                .map(|(i, _)| relative + i)
                .collect();
            bytes.push(relative + run.item.length);
            let n = bytes.len() - 1;
            let run_dir = run.item.analysis.direction();

            if run_dir == Direction::Ltr {
                if cursor_dir == Direction::Ltr || prev_dir == run_dir {
                    set(pos, bytes[0]);
                }
                for (i, &byte) in bytes.iter().enumerate().take(n).skip(1) {
                    set(pos + i, byte);
                }
                if cursor_dir == Direction::Ltr {
                    set(pos + n, bytes[n]);
                }
            } else {
                if cursor_dir == Direction::Rtl {
                    set(pos + n, bytes[0]);
                }
                for (i, &byte) in bytes.iter().enumerate().take(n).skip(1) {
                    set(pos + n - i, byte);
                }
                if cursor_dir == Direction::Rtl || prev_dir == run_dir {
                    set(pos, bytes[n]);
                }
            }
            pos += n;
            prev_dir = run_dir;
        }

        if cursor_dir == resolved || prev_dir == resolved {
            set(pos, if resolved == Direction::Ltr { len } else { 0 });
        }
        result
    }
}

/// Inverts a visual map: for each line-relative byte offset, its visual slot.
fn log2vis(vis2log: &[usize], line_length: usize) -> Vec<usize> {
    let mut result = vec![0; line_length + 1];
    for (slot, &byte) in vis2log.iter().enumerate() {
        if let Some(entry) = result.get_mut(byte) {
            *entry = slot;
        }
    }
    result
}

fn char_direction(line: &LineData, index: usize) -> Direction {
    line.runs
        .iter()
        .find(|run| run.item.range().contains(&index))
        .map_or(line.resolved_dir, |run| run.item.analysis.direction())
}

fn opposite(dir: Direction) -> Direction {
    match dir {
        Direction::Ltr => Direction::Rtl,
        Direction::Rtl => Direction::Ltr,
    }
}

fn prev_char_boundary(text: &str, index: usize) -> usize {
    text[..index]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

fn clamp_pos(pos: isize, n_vis: isize) -> usize {
    usize::try_from(pos.clamp(0, n_vis)).unwrap_or(0)
}
