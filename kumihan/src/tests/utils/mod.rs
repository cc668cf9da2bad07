// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod markup;
mod shaper;

use std::string::String;
use std::vec::Vec;

use crate::Layout;

pub(crate) use markup::TagParser;
pub(crate) use shaper::{ADVANCE, ASCENT, HEIGHT, MonospaceShaper};

pub(crate) type TestLayout = Layout<MonospaceShaper>;

/// A layout of `text` set with [`MonospaceShaper`].
pub(crate) fn layout(text: &str) -> TestLayout {
    let mut layout = Layout::new(MonospaceShaper);
    layout.set_text(text);
    layout
}

/// The text of every line.
pub(crate) fn line_texts(layout: &TestLayout) -> Vec<String> {
    layout.lines().map(|line| line.text().into()).collect()
}

/// The advance of every run of line `index`, in visual order.
pub(crate) fn run_widths(layout: &TestLayout, index: usize) -> Vec<i32> {
    layout
        .line(index)
        .map(|line| line.runs().iter().map(|run| run.width()).collect())
        .unwrap_or_default()
}
