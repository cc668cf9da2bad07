// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical to visual run ordering.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// Returns the visual order of runs with the given embedding levels.
///
/// Element `i` of the result is the logical index of the run displayed `i`th from the left.
pub(crate) fn visual_order(levels: &[u8]) -> Vec<usize> {
    let indices: Vec<usize> = (0..levels.len()).collect();
    reorder(levels, &indices).into()
}

fn reorder(levels: &[u8], indices: &[usize]) -> VecDeque<usize> {
    let mut result = VecDeque::with_capacity(indices.len());
    let Some(min_level) = indices.iter().map(|&i| levels[i]).min() else {
        return result;
    };
    let rtl = min_level % 2 == 1;
    let place = |result: &mut VecDeque<usize>, nested: VecDeque<usize>| {
        if rtl {
            for index in nested.into_iter().rev() {
                result.push_front(index);
            }
        } else {
            result.extend(nested);
        }
    };

    let mut level_start = 0;
    for (i, &index) in indices.iter().enumerate() {
        if levels[index] != min_level {
            continue;
        }
        if i > level_start {
            place(&mut result, reorder(levels, &indices[level_start..i]));
        }
        if rtl {
            result.push_front(index);
        } else {
            result.push_back(index);
        }
        level_start = i + 1;
    }
    if indices.len() > level_start {
        place(&mut result, reorder(levels, &indices[level_start..]));
    }
    result
}
