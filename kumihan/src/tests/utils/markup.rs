// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::format;
use std::string::String;
use std::vec::Vec;

use crate::{
    AttrList, AttrValue, Attribute, MarkupError, MarkupParser, ParsedMarkup, Underline,
};

/// Parses `<tag>text</tag>` markup with a handful of fixed tags.
///
/// `u` underlines, `s` strikes through, `sp` adds 4 units of letter spacing, and `ruby`,
/// `rb`, `rt` mark ruby groups, bases and annotations.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct TagParser;

fn tag_value(name: &str) -> Option<AttrValue> {
    Some(match name {
        "u" => AttrValue::Underline(Underline::Single),
        "s" => AttrValue::Strikethrough(true),
        "sp" => AttrValue::LetterSpacing(4),
        "ruby" => AttrValue::Ruby,
        "rb" => AttrValue::RubyBase,
        "rt" => AttrValue::RubyText,
        _ => return None,
    })
}

impl MarkupParser for TagParser {
    fn parse(&self, markup: &str) -> Result<ParsedMarkup, MarkupError> {
        let mut text = String::new();
        let mut attrs = AttrList::new();
        let mut open: Vec<(&str, usize)> = Vec::new();
        let mut pos = 0;
        while let Some(lt) = markup[pos..].find('<').map(|i| pos + i) {
            text.push_str(&markup[pos..lt]);
            let gt = markup[lt..]
                .find('>')
                .map(|i| lt + i)
                .ok_or_else(|| MarkupError::new("unterminated tag", lt))?;
            let tag = &markup[lt + 1..gt];
            if let Some(name) = tag.strip_prefix('/') {
                match open.pop() {
                    Some((open_name, start)) if open_name == name => {
                        let value = tag_value(name)
                            .ok_or_else(|| MarkupError::new(format!("unknown tag `{name}`"), lt))?;
                        let attr = Attribute::new(start..text.len(), value)
                            .map_err(|err| MarkupError::new(format!("{err}"), lt))?;
                        attrs.insert(attr);
                    }
                    _ => return Err(MarkupError::new(format!("unexpected `</{name}>`"), lt)),
                }
            } else {
                if tag_value(tag).is_none() {
                    return Err(MarkupError::new(format!("unknown tag `{tag}`"), lt));
                }
                open.push((tag, text.len()));
            }
            pos = gt + 1;
        }
        text.push_str(&markup[pos..]);
        if let Some((name, _)) = open.last() {
            return Err(MarkupError::new(format!("unclosed `<{name}>`"), markup.len()));
        }
        Ok(ParsedMarkup { text, attrs })
    }
}
