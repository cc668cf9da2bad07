// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute-based segmentation for [`AttrList`].
//!
//! Given a list whose attributes overlap freely, this module produces non-overlapping,
//! contiguous byte ranges and a view of the attributes active over each of them.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{AttrList, Attribute};

/// Reusable allocation workspace for attribute segmentation.
///
/// Reusing a workspace amortizes setup allocations when segmenting many paragraphs.
#[derive(Clone, Debug, Default)]
pub struct AttrSegmentsWorkspace {
    boundaries: Vec<usize>,
    /// `(position, attribute index)`, sorted by position.
    start_events: Vec<(usize, usize)>,
    /// `(position, attribute index)`, sorted by position.
    end_events: Vec<(usize, usize)>,
    /// Indices of active attributes, ascending.
    active: Vec<usize>,
}

impl AttrSegmentsWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment `range` of the text `list` applies to.
    ///
    /// Attributes are clipped to `range`; those that do not intersect it are ignored.
    pub fn segments<'w, 'a>(
        &'w mut self,
        list: &'a AttrList,
        range: Range<usize>,
    ) -> AttrSegments<'w, 'a> {
        self.boundaries.clear();
        self.start_events.clear();
        self.end_events.clear();
        self.active.clear();

        self.boundaries.push(range.start);
        self.boundaries.push(range.end);
        for (index, attr) in list.iter().enumerate() {
            let start = attr.start().max(range.start);
            let end = attr.end().min(range.end);
            if start >= end {
                continue;
            }
            self.boundaries.push(start);
            self.boundaries.push(end);
            self.start_events.push((start, index));
            self.end_events.push((end, index));
        }
        self.boundaries.sort_unstable();
        self.boundaries.dedup();
        self.start_events.sort_unstable();
        self.end_events.sort_unstable();

        AttrSegments {
            list,
            workspace: self,
            index: 0,
            next_start: 0,
            next_end: 0,
        }
    }
}

/// Iterator over contiguous attribute segments of an [`AttrList`].
///
/// Each yielded item is a non-empty, non-overlapping byte range. The attributes active over
/// the yielded range are exposed through [`AttrSegments::active`].
///
/// ```
/// use kumihan_attrs::{AttrList, AttrSegmentsWorkspace, AttrValue, Attribute};
///
/// let mut list = AttrList::new();
/// list.insert(Attribute::new(0..2, AttrValue::Rise(1)).unwrap());
/// list.insert(Attribute::new(1..5, AttrValue::LetterSpacing(4)).unwrap());
///
/// let mut workspace = AttrSegmentsWorkspace::new();
/// let mut segments = workspace.segments(&list, 0..5);
///
/// assert_eq!(segments.next(), Some(0..1));
/// assert_eq!(segments.active().count(), 1);
/// assert_eq!(segments.next(), Some(1..2));
/// assert_eq!(segments.active().count(), 2);
/// assert_eq!(segments.next(), Some(2..5));
/// assert_eq!(segments.next(), None);
/// ```
#[derive(Debug)]
pub struct AttrSegments<'w, 'a> {
    list: &'a AttrList,
    workspace: &'w mut AttrSegmentsWorkspace,
    index: usize,
    next_start: usize,
    next_end: usize,
}

impl<'a> AttrSegments<'_, 'a> {
    fn update_active(&mut self, position: usize) {
        let ws = &mut *self.workspace;
        while let Some(&(pos, id)) = ws.end_events.get(self.next_end) {
            if pos > position {
                break;
            }
            if let Ok(ix) = ws.active.binary_search(&id) {
                ws.active.remove(ix);
            }
            self.next_end += 1;
        }
        while let Some(&(pos, id)) = ws.start_events.get(self.next_start) {
            if pos > position {
                break;
            }
            if let Err(ix) = ws.active.binary_search(&id) {
                ws.active.insert(ix, id);
            }
            self.next_start += 1;
        }
    }

    /// The attributes active over the most recently yielded segment, in list order.
    ///
    /// Before the first call to [`Iterator::next`] and after exhaustion this is empty.
    pub fn active(&self) -> impl Iterator<Item = &'a Attribute> + '_ {
        let list = self.list;
        self.workspace
            .active
            .iter()
            .filter_map(move |&id| list.as_slice().get(id))
    }
}

impl Iterator for AttrSegments<'_, '_> {
    type Item = Range<usize>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .workspace
            .boundaries
            .len()
            .saturating_sub(self.index + 1);
        (remaining, Some(remaining))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.index + 1 < self.workspace.boundaries.len() {
            let start = self.workspace.boundaries[self.index];
            let end = self.workspace.boundaries[self.index + 1];
            self.update_active(start);
            self.index += 1;
            debug_assert!(start < end, "boundaries are sorted + deduped");
            return Some(start..end);
        }
        self.workspace.active.clear();
        None
    }
}

impl ExactSizeIterator for AttrSegments<'_, '_> {}
