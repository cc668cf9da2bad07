// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use icu_properties::CodePointMapData;
use icu_properties::props::Script;
use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter};
use kumihan_attrs::{AttrList, AttrSegmentsWorkspace, AttrValue, FontDesc};
use smallvec::SmallVec;
use unicode_bidi::{BidiInfo, Level};

use super::{Analysis, Analyzer, Direction, Item, LogAttr};
use crate::glyph::{char_index, char_offsets};

/// An [`Analyzer`] backed by the Unicode bidi algorithm, ICU4X segmentation and script data.
///
/// Items are split wherever the embedding level, the resolved script or the set of attributes
/// changes. Common and inherited characters take the script of the text before them, or at
/// the start of a paragraph the first script that follows.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnicodeAnalyzer;

fn isolated(ch: char) -> bool {
    matches!(ch, '\t' | '\u{2028}')
}

fn is_real_script(script: Script) -> bool {
    script != Script::Common && script != Script::Inherited
}

impl Analyzer for UnicodeAnalyzer {
    fn itemize(
        &self,
        text: &str,
        range: Range<usize>,
        attrs: &AttrList,
        default_font: &FontDesc,
        base_dir: Direction,
    ) -> Vec<Item> {
        let mut items = Vec::new();
        let para = &text[range.clone()];
        if para.is_empty() {
            return items;
        }

        let base_level = match base_dir {
            Direction::Ltr => Level::ltr(),
            Direction::Rtl => Level::rtl(),
        };
        let levels = BidiInfo::new(para, Some(base_level)).levels;

        let script_data = CodePointMapData::<Script>::new();
        let mut script = para
            .chars()
            .map(|ch| script_data.get(ch))
            .find(|s| is_real_script(*s))
            .unwrap_or(Script::Common);
        let scripts: Vec<Script> = para
            .chars()
            .map(|ch| {
                let s = script_data.get(ch);
                if is_real_script(s) {
                    script = s;
                }
                script
            })
            .collect();

        let mut workspace = AttrSegmentsWorkspace::new();
        let mut segments = workspace.segments(attrs, range.clone());
        let mut char_ix = 0;
        while let Some(segment) = segments.next() {
            let font = segments
                .active()
                .filter_map(|attr| match attr.value() {
                    AttrValue::FontDesc(desc) => Some(desc),
                    _ => None,
                })
                .last()
                .unwrap_or(default_font);

            let mut current: Option<Item> = None;
            let mut prev_isolated = false;
            for (byte, ch) in text[segment.clone()].char_indices() {
                let offset = segment.start + byte;
                let level = levels[offset - range.start].number();
                let script = scripts[char_ix];
                char_ix += 1;

                let starts_item = match &current {
                    None => true,
                    Some(item) => {
                        prev_isolated
                            || isolated(ch)
                            || item.analysis.level != level
                            || item.analysis.script != script
                    }
                };
                prev_isolated = isolated(ch);
                if starts_item {
                    items.extend(current.take());
                    current = Some(Item {
                        offset,
                        length: 0,
                        num_chars: 0,
                        analysis: Analysis {
                            level,
                            script,
                            font: font.clone(),
                            extra_attrs: SmallVec::new(),
                        },
                    });
                }
                if let Some(item) = current.as_mut() {
                    item.length += ch.len_utf8();
                    item.num_chars += 1;
                }
            }
            items.extend(current.take());
        }

        // Items never straddle an attribute boundary, so every attribute touching an item
        // covers all of it.
        for item in &mut items {
            let item_range = item.range();
            let attrs = attrs
                .iter()
                .filter(|a| a.start() < item_range.end && a.end() > item_range.start)
                .filter(|a| !matches!(a.value(), AttrValue::FontDesc(_)));
            for attr in attrs {
                let start = attr.start().max(item_range.start) - item_range.start;
                let end = attr.end().min(item_range.end) - item_range.start;
                item.analysis.extra_attrs.push(attr.with_range(start..end));
            }
        }
        items
    }

    fn log_attrs(&self, text: &str, out: &mut [LogAttr]) {
        let offsets = char_offsets(text);
        debug_assert_eq!(out.len(), offsets.len() + 1, "one entry per character plus one");

        for (attr, ch) in out.iter_mut().zip(text.chars()) {
            *attr = LogAttr {
                is_white: ch.is_whitespace(),
                ..LogAttr::default()
            };
        }
        if let Some(end) = out.get_mut(offsets.len()) {
            *end = LogAttr::default();
        }

        let lines = LineSegmenter::new_for_non_complex_scripts(LineBreakOptions::default());
        for boundary in lines.segment_str(text).filter(|&b| b > 0) {
            if let Some(attr) = out.get_mut(char_index(&offsets, boundary)) {
                attr.is_line_break = true;
            }
        }

        let graphemes = GraphemeClusterSegmenter::new();
        for boundary in graphemes.segment_str(text) {
            if let Some(attr) = out.get_mut(char_index(&offsets, boundary)) {
                attr.is_cursor_position = true;
                attr.is_char_break = boundary > 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumihan_attrs::{Attribute, Underline};

    fn itemize(text: &str, attrs: &AttrList, dir: Direction) -> Vec<Item> {
        UnicodeAnalyzer.itemize(text, 0..text.len(), attrs, &FontDesc::new("Sans", 12), dir)
    }

    fn ranges(items: &[Item]) -> Vec<Range<usize>> {
        items.iter().map(Item::range).collect()
    }

    #[test]
    fn single_script_is_one_item() {
        let items = itemize("hello world", &AttrList::new(), Direction::Ltr);
        assert_eq!(ranges(&items), [0..11]);
        assert_eq!(items[0].num_chars, 11);
        assert_eq!(items[0].analysis.script, Script::Latin);
    }

    #[test]
    fn bidi_levels_split_items() {
        // "ab " then two Hebrew letters.
        let text = "ab אב";
        let items = itemize(text, &AttrList::new(), Direction::Ltr);
        assert_eq!(ranges(&items), [0..3, 3..7]);
        assert_eq!(items[1].analysis.level, 1);
        assert_eq!(items[1].analysis.script, Script::Hebrew);
    }

    #[test]
    fn tabs_and_line_separators_are_isolated() {
        let items = itemize("a\tb\u{2028}c", &AttrList::new(), Direction::Ltr);
        assert_eq!(ranges(&items), [0..1, 1..2, 2..3, 3..6, 6..7]);
    }

    #[test]
    fn attributes_split_and_are_item_relative() {
        let mut attrs = AttrList::new();
        attrs.change(Attribute::new(2..4, AttrValue::Underline(Underline::Single)).unwrap());
        attrs.change(
            Attribute::new(4..6, AttrValue::FontDesc(FontDesc::new("Serif", 20))).unwrap(),
        );
        let items = itemize("abcdef", &attrs, Direction::Ltr);
        assert_eq!(ranges(&items), [0..2, 2..4, 4..6]);
        assert_eq!(items[1].analysis.extra_attrs[0].range(), 0..2);
        assert_eq!(&*items[2].analysis.font.family, "Serif");
        assert!(items[2].analysis.extra_attrs.is_empty());
    }

    #[test]
    fn spanning_attribute_is_rebased_per_item() {
        let mut attrs = AttrList::new();
        attrs.change(Attribute::new(1..7, AttrValue::Underline(Underline::Single)).unwrap());
        let items = itemize("ab אב", &attrs, Direction::Ltr);
        assert_eq!(ranges(&items), [0..1, 1..3, 3..7]);
        assert!(items[0].analysis.extra_attrs.is_empty());
        assert_eq!(items[1].analysis.extra_attrs[0].range(), 0..2);
        assert_eq!(items[2].analysis.extra_attrs[0].range(), 0..4);
    }

    #[test]
    fn leading_common_takes_following_script() {
        let items = itemize("12 abc", &AttrList::new(), Direction::Ltr);
        assert_eq!(ranges(&items), [0..6]);
        assert_eq!(items[0].analysis.script, Script::Latin);
    }

    #[test]
    fn log_attrs_mark_breaks() {
        let text = "ab cd";
        let mut attrs = [LogAttr::default(); 6];
        UnicodeAnalyzer.log_attrs(text, &mut attrs);
        let breaks: Vec<bool> = attrs.iter().map(|a| a.is_line_break).collect();
        assert_eq!(breaks, [false, false, false, true, false, true]);
        assert!(attrs.iter().all(|a| a.is_cursor_position));
        assert!(!attrs[0].is_char_break);
        assert!(attrs[1].is_char_break);
        assert!(attrs[2].is_white);
    }
}
