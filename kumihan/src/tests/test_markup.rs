// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{AttrList, AttrValue, Attribute, ErrorKind, Underline};

use super::utils::{TagParser, layout, run_widths};

#[test]
fn markup_sets_text_and_attributes() {
    let mut layout = layout("");
    layout.set_markup(&TagParser, "a<u>b</u>c").unwrap();
    assert_eq!(layout.text(), "abc");
    assert_eq!(layout.attributes().len(), 1);
    let line = layout.line(0).unwrap();
    assert_eq!(line.runs().len(), 3);
    assert_eq!(line.runs()[1].properties().underline, Underline::Single);
    assert_eq!(line.runs()[0].properties().underline, Underline::None);
}

#[test]
fn failed_markup_leaves_layout_untouched() {
    let mut layout = layout("keep");
    let err = layout.set_markup(&TagParser, "a<u>b").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Markup);
    assert_eq!(err.markup_error().map(|e| e.offset()), Some(5));
    assert_eq!(err.text_len(), 4);
    assert_eq!(layout.text(), "keep");

    let err = layout.set_markup(&TagParser, "<x>a</x>").unwrap_err();
    assert_eq!(err.index(), Some(0));
    assert_eq!(layout.text(), "keep");
}

#[test]
fn attributes_are_validated_against_the_text() {
    let mut layout = layout("abc");
    let mut attrs = AttrList::new();
    attrs.insert(Attribute::new(0..10, AttrValue::Strikethrough(true)).unwrap());
    let err = layout.set_attributes(attrs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Attributes);
    assert!(err.attributes_error().is_some());
    assert!(layout.attributes().is_empty());
}

#[test]
fn shorter_text_clips_attributes() {
    let mut layout = layout("");
    layout.set_markup(&TagParser, "<s>a</s>b<u>cd</u>").unwrap();
    layout.set_text("abc");
    let ranges: Vec<_> = layout.attributes().iter().map(Attribute::range).collect();
    assert_eq!(ranges, [0..1, 2..3]);
    assert_eq!(layout.line(0).unwrap().runs().len(), 3);

    layout.set_text("a");
    let ranges: Vec<_> = layout.attributes().iter().map(Attribute::range).collect();
    assert_eq!(ranges, [0..1]);

    layout.set_markup(&TagParser, "a<u>b</u>").unwrap();
    layout.set_text("é");
    assert!(layout.attributes().is_empty());
}

#[test]
fn letter_spacing_is_split_around_runs() {
    let mut layout = layout("");
    layout.set_markup(&TagParser, "<sp>ab</sp>c").unwrap();
    // 4 between "a" and "b", half of 4 between "b" and "c", nothing at the line end.
    assert_eq!(run_widths(&layout, 0), [26, 10]);
    let glyphs = &layout.line(0).unwrap().runs()[0].glyphs.glyphs;
    assert_eq!(glyphs[1].x_offset, 2);
}
