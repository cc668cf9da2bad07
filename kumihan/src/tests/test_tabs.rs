// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::TabArray;

use super::utils::{ADVANCE, layout, run_widths};

#[test]
fn default_stops_are_eight_spaces_apart() {
    let layout = layout("a\tb");
    assert_eq!(run_widths(&layout, 0), [ADVANCE, 8 * ADVANCE - ADVANCE, ADVANCE]);
}

#[test]
fn explicit_stops_then_repeat_last_gap() {
    let mut layout = layout("a\tb\tc\td");
    layout.set_tabs(Some(TabArray::new([30, 50], false)));
    assert_eq!(run_widths(&layout, 0), [10, 20, 10, 10, 10, 10, 10]);
}

#[test]
fn pixel_stops_are_scaled() {
    let mut layout = layout("\ta");
    layout.set_tabs(Some(TabArray::new([1], true)));
    assert_eq!(run_widths(&layout, 0), [crate::SCALE, ADVANCE]);
}

#[test]
fn tab_after_wrap_measures_from_line_start() {
    let mut layout = layout("aaaa bb\tc");
    layout.set_width(Some(60));
    layout.set_tabs(Some(TabArray::new([30], false)));
    assert_eq!(layout.line_count(), 2);
    // "bb" is 20 wide, so the tab reaches the first stop at 30.
    assert_eq!(run_widths(&layout, 1), [20, 10, 10]);
}
