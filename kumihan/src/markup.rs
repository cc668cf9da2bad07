// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

use kumihan_attrs::AttrList;

/// Plain text and attributes produced from marked-up input.
///
/// Attribute ranges are byte offsets into `text`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedMarkup {
    /// The text with all markup removed.
    pub text: String,
    /// The attributes the markup described.
    pub attrs: AttrList,
}

/// A markup diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupError {
    message: String,
    offset: usize,
}

impl MarkupError {
    /// Creates a diagnostic for the markup byte `offset`.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    /// Human-readable description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset into the markup where the problem was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "markup error at byte {}: {}", self.offset, self.message)
    }
}

impl core::error::Error for MarkupError {}

/// Turns marked-up input into text and attributes.
///
/// Used by [`Layout::set_markup`](crate::Layout::set_markup).
pub trait MarkupParser {
    /// Parses `markup`.
    fn parse(&self, markup: &str) -> Result<ParsedMarkup, MarkupError>;
}
