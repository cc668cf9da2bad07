// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Rect;

use super::utils::{ASCENT, HEIGHT, layout};

fn cluster_indices(layout: &super::utils::TestLayout) -> Vec<usize> {
    let mut iter = layout.iter();
    let mut indices = vec![iter.index()];
    while iter.next_cluster() {
        indices.push(iter.index());
    }
    indices
}

#[test]
fn visits_clusters_then_line_end() {
    let layout = layout("ab cd");
    assert_eq!(cluster_indices(&layout), [0, 1, 2, 3, 4, 5]);

    let mut iter = layout.iter();
    assert!(iter.next_cluster());
    assert_eq!(iter.cluster_extents().1, Rect::new(10, 0, 10, HEIGHT));
    assert_eq!(iter.baseline(), ASCENT);
}

#[test]
fn rtl_clusters_in_visual_order() {
    let layout = layout("אב");
    assert_eq!(cluster_indices(&layout), [2, 0, 4]);
}

#[test]
fn marks_share_a_cluster() {
    let layout = layout("e\u{301}x");
    assert_eq!(cluster_indices(&layout), [0, 3, 4]);
}

#[test]
fn runs_and_line_end_stop() {
    let layout = layout("ab\tc");
    let mut iter = layout.iter();
    let mut runs = vec![];
    loop {
        runs.push((iter.index(), iter.run().map(|run| run.item.length)));
        if !iter.next_run() {
            break;
        }
    }
    assert_eq!(runs, [(0, Some(2)), (2, Some(1)), (3, Some(1)), (4, None)]);
}

#[test]
fn run_extents_accumulate_along_the_line() {
    let layout = layout("ab\tc");
    let mut iter = layout.iter();
    assert_eq!(iter.run_extents().1, Rect::new(0, 0, 20, HEIGHT));
    assert!(iter.next_run());
    assert_eq!(iter.run_extents().1, Rect::new(20, 0, 60, HEIGHT));
    assert!(iter.next_run());
    assert!(iter.next_run());
    assert_eq!(iter.run().map(|run| run.item.offset), None);
    assert_eq!(iter.run_extents().1, Rect::new(90, 0, 0, HEIGHT));
}

#[test]
fn lines_and_spacing() {
    let mut layout = layout("ab\ncd");
    layout.set_spacing(4);
    let mut iter = layout.iter();
    assert!(!iter.at_last_line());
    assert_eq!(iter.line().text(), "ab");
    assert_eq!(iter.baseline(), ASCENT);
    assert_eq!(iter.line_yrange(), (0, HEIGHT + 2));

    assert!(iter.next_line());
    assert!(iter.at_last_line());
    assert_eq!(iter.index(), 3);
    assert_eq!(iter.baseline(), HEIGHT + 4 + ASCENT);
    assert_eq!(iter.line_yrange(), (HEIGHT + 2, 2 * HEIGHT + 4));
    assert_eq!(iter.layout_extents(), layout.extents());
    assert!(!iter.next_line());
}
