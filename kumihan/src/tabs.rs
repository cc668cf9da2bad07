// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::SCALE;

/// Explicit tab stop positions, all left-aligned.
///
/// Stops past the end of the array repeat the gap between the last two positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabArray {
    positions: Vec<i32>,
    in_pixels: bool,
}

impl TabArray {
    /// Creates a tab array. With `in_pixels`, positions are device pixels rather than layout
    /// units.
    pub fn new(positions: impl IntoIterator<Item = i32>, in_pixels: bool) -> Self {
        Self {
            positions: positions.into_iter().collect(),
            in_pixels,
        }
    }

    /// The stop positions as given.
    pub fn positions(&self) -> &[i32] {
        &self.positions
    }

    /// Whether positions are in device pixels.
    pub fn in_pixels(&self) -> bool {
        self.in_pixels
    }

    /// Number of explicit stops.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no explicit stops.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn position(&self, index: usize) -> i32 {
        let pos = self.positions.get(index).copied().unwrap_or(0);
        if self.in_pixels { pos * SCALE } else { pos }
    }
}

/// Position of tab stop `index` in layout units.
///
/// `default_width` is only evaluated when extrapolation needs it.
pub(crate) fn tab_stop(
    tabs: Option<&TabArray>,
    index: usize,
    default_width: impl FnOnce() -> i32,
) -> i32 {
    let Some(tabs) = tabs.filter(|t| !t.is_empty()) else {
        return default_width().saturating_mul(to_i32(index));
    };
    let n = tabs.len();
    if index < n {
        return tabs.position(index);
    }
    let last = tabs.position(n - 1);
    let next_to_last = if n > 1 { tabs.position(n - 2) } else { 0 };
    let gap = if last > next_to_last {
        last - next_to_last
    } else {
        default_width()
    };
    last.saturating_add(gap.saturating_mul(to_i32(index - n + 1)))
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stops_are_multiples() {
        assert_eq!(tab_stop(None, 0, || 80), 0);
        assert_eq!(tab_stop(None, 3, || 80), 240);
    }

    #[test]
    fn explicit_stops_extrapolate_last_gap() {
        let tabs = TabArray::new([30, 100], false);
        assert_eq!(tab_stop(Some(&tabs), 0, || unreachable!()), 30);
        assert_eq!(tab_stop(Some(&tabs), 1, || unreachable!()), 100);
        assert_eq!(tab_stop(Some(&tabs), 3, || unreachable!()), 240);
    }

    #[test]
    fn non_increasing_stops_fall_back_to_default_gap() {
        let tabs = TabArray::new([50, 50], false);
        assert_eq!(tab_stop(Some(&tabs), 2, || 8), 58);
        let single = TabArray::new([2], true);
        assert_eq!(tab_stop(Some(&single), 0, || 8), 2 * SCALE);
        assert_eq!(tab_stop(Some(&single), 1, || 8), 4 * SCALE);
    }
}
