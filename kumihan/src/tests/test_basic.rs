// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::vec::Vec;

use crate::{
    Alignment, Analysis, AttrList, AttrValue, Attribute, EllipsizeMode, FontDesc, GlyphString,
    Layout, Rect, Run, SCALE, Shaper,
};

use super::utils::{HEIGHT, MonospaceShaper, layout, line_texts, run_widths};

#[test]
fn empty_text_has_one_line() {
    let layout = layout("");
    assert_eq!(layout.line_count(), 1);
    let line = layout.line(0).unwrap();
    assert_eq!(line.length(), 0);
    assert!(line.is_paragraph_start());
    assert_eq!(layout.extents().1, Rect::new(0, 0, 0, HEIGHT));
}

#[test]
fn paragraph_delimiters_end_lines() {
    let layout = layout("a\nb\r\nc\u{2029}");
    assert_eq!(line_texts(&layout), ["a", "b", "c", ""]);
    let starts: Vec<usize> = layout.lines().map(|line| line.start_index()).collect();
    assert_eq!(starts, [0, 2, 5, 9]);
    assert!(layout.lines().all(|line| line.is_paragraph_start()));
}

#[test]
fn lines_cover_the_text() {
    let text = "one two\r\nthree four five\n\nsix";
    let mut layout = layout(text);
    layout.set_width(Some(60));
    let covered: usize = layout.lines().map(|line| line.length()).sum();
    // Three delimiters: "\r\n" and two "\n".
    assert_eq!(covered + 4, text.len());
    for pair in layout.lines().collect::<Vec<_>>().windows(2) {
        assert!(pair[0].text_range().end <= pair[1].start_index());
    }
}

#[test]
fn single_paragraph_mode_keeps_delimiters() {
    let mut layout = layout("a\nb");
    layout.set_single_paragraph_mode(true);
    assert_eq!(line_texts(&layout), ["a\nb"]);
}

#[test]
fn line_separator_forces_a_break() {
    let layout = layout("ab\u{2028}cd");
    assert_eq!(line_texts(&layout), ["ab\u{2028}", "cd"]);
    assert!(!layout.line(1).unwrap().is_paragraph_start());
}

#[test]
fn relayout_is_identical() {
    let mut layout = layout("The quick brown fox jumps");
    layout.set_width(Some(100));
    let first: Vec<_> = layout.lines().map(|line| line.runs().to_vec()).collect();
    layout.set_text("The quick brown fox jumps");
    let second: Vec<_> = layout.lines().map(|line| line.runs().to_vec()).collect();
    assert_eq!(first, second);
}

#[test]
fn extents_include_spacing() {
    let mut layout = layout("a\nbcd");
    layout.set_spacing(4);
    let (_, logical) = layout.extents();
    assert_eq!(logical, Rect::new(0, 0, 30, 2 * HEIGHT + 4));
    assert_eq!(layout.size(), (30, 24));
}

#[test]
fn alignment_offsets_lines() {
    let mut layout = layout("ab");
    layout.set_width(Some(100));
    layout.set_alignment(Alignment::Right);
    assert_eq!(layout.iter().line_extents().1.x, 80);
    layout.set_alignment(Alignment::Center);
    assert_eq!(layout.iter().line_extents().1.x, 40);
}

#[test]
fn alignment_without_width_uses_widest_line() {
    let mut layout = layout("abcd\nab");
    layout.set_alignment(Alignment::Right);
    let mut iter = layout.iter();
    assert_eq!(iter.line_extents().1.x, 0);
    assert!(iter.next_line());
    assert_eq!(iter.line_extents().1.x, 20);
}

#[test]
fn indent_applies_to_first_or_other_lines() {
    let mut layout = layout("ab");
    layout.set_width(Some(100));
    layout.set_indent(20);
    assert_eq!(layout.iter().line_extents().1.x, 20);

    let mut hanging = super::utils::layout("aaaa bbbb");
    hanging.set_width(Some(60));
    hanging.set_indent(-20);
    assert_eq!(line_texts(&hanging), ["aaaa ", "bbbb"]);
    let mut iter = hanging.iter();
    assert_eq!(iter.line_extents().1.x, 0);
    assert!(iter.next_line());
    assert_eq!(iter.line_extents().1.x, 20);
}

#[test]
fn justify_spreads_space_except_on_last_line() {
    let mut layout = layout("aaa bbb ccc");
    layout.set_width(Some(85));
    layout.set_justify(true);
    assert_eq!(line_texts(&layout), ["aaa bbb ", "ccc"]);
    let glyphs: Vec<i32> = layout.line(0).unwrap().runs()[0]
        .glyphs
        .glyphs
        .iter()
        .map(|g| g.width)
        .collect();
    // 5 units left plus the hanging trailing space, spread over the seven gaps.
    assert_eq!(glyphs, [13, 12, 12, 12, 12, 12, 12, 10]);
    assert_eq!(run_widths(&layout, 1), [30]);
}

#[test]
fn unbreakable_ruby_group_overflows_on_one_line() {
    let mut layout = layout("abcdefghij");
    let mut attrs = AttrList::new();
    attrs.insert(Attribute::new(0..10, AttrValue::Ruby).unwrap());
    layout.set_attributes(attrs).unwrap();
    layout.set_width(Some(1));
    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.line(0).unwrap().length(), 10);
}

#[test]
fn setters_invalidate_lines() {
    let mut layout = layout("aaa bbb");
    assert_eq!(layout.line_count(), 1);
    layout.set_width(Some(40));
    assert_eq!(layout.line_count(), 2);
    layout.set_width(None);
    assert_eq!(layout.line_count(), 1);
}

/// Drops the glyphs that overflow the width from the end of the line.
struct Truncating;

impl Shaper for Truncating {
    fn shape(&self, text: &str, analysis: &Analysis) -> GlyphString {
        MonospaceShaper.shape(text, analysis)
    }

    fn glyph_extents(&self, glyphs: &GlyphString, font: &FontDesc) -> (Rect, Rect) {
        MonospaceShaper.glyph_extents(glyphs, font)
    }

    fn ellipsize(
        &self,
        runs: &mut Vec<Run>,
        _text: &str,
        mode: EllipsizeMode,
        width: Option<i32>,
    ) {
        assert_eq!(mode, EllipsizeMode::End, "only end ellipsizing is configured");
        let Some(mut remaining) = width else {
            return;
        };
        for run in runs.iter_mut() {
            let mut keep = 0;
            for glyph in &run.glyphs.glyphs {
                if glyph.width > remaining {
                    break;
                }
                remaining -= glyph.width;
                keep += 1;
            }
            run.glyphs.glyphs.truncate(keep);
            run.glyphs.log_clusters.truncate(keep);
        }
    }
}

#[test]
fn ellipsize_keeps_one_line_and_calls_the_shaper() {
    let mut layout = Layout::new(Truncating);
    layout.set_text("aaa bbb ccc");
    layout.set_width(Some(40));
    assert_eq!(layout.line_count(), 3);
    layout.set_ellipsize(EllipsizeMode::End);
    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.line(0).unwrap().extents().1.width, 40);
}

#[test]
fn default_font_reaches_the_shaper() {
    let mut layout = layout("abc");
    let line = layout.line(0).unwrap();
    assert_eq!(
        line.runs()[0].item.analysis.font,
        FontDesc::new("Sans", 10 * SCALE)
    );
    let serif = FontDesc::new("Serif", 12 * SCALE);
    layout.set_font(serif.clone());
    let line = layout.line(0).unwrap();
    assert_eq!(line.runs()[0].item.analysis.font, serif);
}
