// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kumihan_attrs::AttrKind;

use super::data::Run;
use crate::Direction;

fn adjust_final_space(run: &mut Run, adjustment: i32) {
    if let Some(glyph) = run.glyphs.glyphs.last_mut() {
        glyph.width += adjustment;
    }
}

/// Moves letter spacing that shaping put after each run's last grapheme so that it is split
/// around the run, and trims it at the line ends and next to tabs.
///
/// Space trimmed next to a tab is added to the following tab so that tab stops stay aligned.
/// `runs` must be in visual order.
pub(crate) fn adjust_letter_spacing(runs: &mut [Run], text: &str, dir: Direction) {
    // Tab widths accumulate in logical order, so walk right-to-left lines from the right.
    let reversed = dir == Direction::Rtl && runs.iter().any(|run| run.is_tab(text));
    if reversed {
        runs.reverse();
    }

    let tabs: Vec<bool> = runs.iter().map(|run| run.is_tab(text)).collect();
    let mut tab_adjustment = 0;
    for i in 0..runs.len() {
        if tabs[i] {
            adjust_final_space(&mut runs[i], tab_adjustment);
            tab_adjustment = 0;
            continue;
        }
        let before = i.checked_sub(1);
        let after = Some(i + 1).filter(|&j| j < runs.len());
        let (visual_last, visual_next) = if reversed {
            (after, before)
        } else {
            (before, after)
        };

        let spacing = runs[i].properties().letter_spacing;
        let adjustment = spacing / 2;
        match visual_last {
            Some(j) if !tabs[j] => adjust_final_space(&mut runs[j], adjustment),
            _ => tab_adjustment += adjustment,
        }
        match visual_next {
            Some(j) if !tabs[j] => adjust_final_space(&mut runs[i], -adjustment),
            _ => {
                adjust_final_space(&mut runs[i], -spacing);
                tab_adjustment += spacing - adjustment;
            }
        }
    }

    if reversed {
        runs.reverse();
    }
}

/// Spreads `remaining` over the glyphs after the last tab, widening all but the last glyph.
///
/// Right-to-left lines and ruby runs are left alone. A trailing empty glyph gives its own
/// advance to the pool since it would otherwise hang past the line end.
pub(crate) fn justify(runs: &mut [Run], text: &str, dir: Direction, remaining: Option<i32>) {
    if dir == Direction::Rtl {
        return;
    }
    let Some(mut remaining) = remaining.filter(|&r| r > 0) else {
        return;
    };

    let mut slots: Vec<(usize, usize)> = Vec::new();
    let mut last = None;
    for (run_index, run) in runs.iter().enumerate() {
        if run.is_tab(text) {
            slots.clear();
        }
        if run.item.has_attr(AttrKind::RubyBase) || run.item.has_attr(AttrKind::RubyText) {
            continue;
        }
        for glyph_index in 0..run.glyphs.len() {
            slots.push((run_index, glyph_index));
            last = Some((run_index, glyph_index));
        }
    }

    let Some((run_index, glyph_index)) = last else {
        return;
    };
    let trailing = runs[run_index].glyphs.glyphs[glyph_index];
    if trailing.is_empty() {
        remaining += trailing.width;
    }
    let Some(gaps) = slots.len().checked_sub(1).filter(|&n| n > 0) else {
        return;
    };
    for (&(run_index, glyph_index), delta) in slots.iter().zip(distribute(remaining, gaps)) {
        runs[run_index].glyphs.glyphs[glyph_index].width += delta;
    }
}

/// Splits `total` into `parts` shares that differ by at most one, larger shares first.
pub(crate) fn distribute(mut total: i32, parts: usize) -> Vec<i32> {
    let mut shares = Vec::with_capacity(parts);
    for left in (1..=parts).rev() {
        let left = i32::try_from(left).unwrap_or(i32::MAX);
        let share = (total + left - 1) / left;
        shares.push(share);
        total -= share;
    }
    shares
}
