// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::{AttrKind, Attribute, Endpoint, Error};

/// Returns the first attribute of `kind` in `attrs`, in slice order.
///
/// Per-item attribute lists are kept in itemization order rather than by start index, so the
/// result is the first one encountered, not necessarily the one with the lowest start.
pub fn get_first_of_kind(attrs: &[Attribute], kind: AttrKind) -> Option<&Attribute> {
    attrs.iter().find(|attr| attr.kind() == kind)
}

/// An ordered collection of attributes, sorted by start index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttrList {
    attrs: Vec<Attribute>,
}

impl AttrList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of attributes in the list.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if the list holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate over the attributes in list order.
    pub fn iter(&self) -> core::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// The attributes as a slice, in list order.
    pub fn as_slice(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Returns the first attribute of `kind` in list order.
    pub fn get_first_of_kind(&self, kind: AttrKind) -> Option<&Attribute> {
        get_first_of_kind(&self.attrs, kind)
    }

    /// Inserts `attr` after every attribute with the same start index.
    ///
    /// No merging takes place; see [`AttrList::change`].
    pub fn insert(&mut self, attr: Attribute) {
        let ix = self.attrs.partition_point(|a| a.start() <= attr.start());
        self.attrs.insert(ix, attr);
    }

    /// Inserts `attr` before every attribute with the same start index.
    pub fn insert_before(&mut self, attr: Attribute) {
        let ix = self.attrs.partition_point(|a| a.start() < attr.start());
        self.attrs.insert(ix, attr);
    }

    /// Inserts `attr`, merging it with equal neighbors and clipping different values of the
    /// same kind that it overlaps.
    ///
    /// After any sequence of `change` calls, touching or overlapping attributes of the same
    /// kind and value form a single entry, and attributes of the same kind with different
    /// values never overlap: the newest one wins. Empty attributes are dropped.
    pub fn change(&mut self, attr: Attribute) {
        let start = attr.start();
        let end = attr.end();
        if start == end {
            return;
        }

        // Find the insertion point, resolving overlaps with earlier entries on the way.
        let mut i = 0;
        let anchor = loop {
            if i == self.attrs.len() || self.attrs[i].start() > start {
                self.attrs.insert(i, attr);
                break i;
            }
            let existing = &self.attrs[i];
            if existing.kind() == attr.kind() && existing.end() >= start {
                if existing.value() == attr.value() {
                    if existing.end() >= end {
                        // Already covered.
                        return;
                    }
                    self.attrs[i].set_end(end);
                    break i;
                }
                if existing.end() > end {
                    let tail = existing.with_range(end..existing.end());
                    // The tail starts after `start`, so it lands past `i`.
                    self.insert(tail);
                }
                if self.attrs[i].start() == start {
                    self.attrs[i] = attr;
                    break i;
                }
                self.attrs[i].set_end(start);
            }
            i += 1;
        };

        // Absorb or trim the same-kind entries that follow.
        let mut j = anchor + 1;
        while j < self.attrs.len() {
            if self.attrs[j].start() > end {
                break;
            }
            let (head, rest) = self.attrs.split_at_mut(j);
            let merged = &mut head[anchor];
            let next = &mut rest[0];
            if next.kind() != merged.kind() {
                j += 1;
                continue;
            }
            if next.end() <= merged.end() || next.value() == merged.value() {
                merged.set_end(end.max(next.end()));
                self.attrs.remove(j);
                continue;
            }
            // Different value sticking out past the new entry: trim its start, then move it
            // forward so start indices stay sorted.
            let new_start = merged.end();
            next.set_start(new_start);
            let mut k = j + 1;
            while k < self.attrs.len() && self.attrs[k].start() < new_start {
                k += 1;
            }
            if k != j + 1 {
                let moved = self.attrs.remove(j);
                self.attrs.insert(k - 1, moved);
                continue;
            }
            j += 1;
        }
    }

    /// Removes every attribute matching `predicate` and returns them as a new list, in
    /// their original order.
    pub fn filter(&mut self, mut predicate: impl FnMut(&Attribute) -> bool) -> Self {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.attrs.len());
        for attr in self.attrs.drain(..) {
            if predicate(&attr) {
                taken.push(attr);
            } else {
                kept.push(attr);
            }
        }
        self.attrs = kept;
        Self { attrs: taken }
    }

    /// Fits the list to `text`.
    ///
    /// Offsets past the text are clamped to its length. Attributes left empty, or with an
    /// endpoint that is not on a character boundary, are removed and returned in order.
    pub fn clip(&mut self, text: &str) -> Self {
        let len = text.len();
        for attr in &mut self.attrs {
            if attr.end() > len {
                attr.set_start(attr.start().min(len));
                attr.set_end(len);
            }
        }
        self.filter(|attr| {
            attr.start() >= attr.end()
                || !text.is_char_boundary(attr.start())
                || !text.is_char_boundary(attr.end())
        })
    }

    /// Checks that every attribute lies within `text` and on character boundaries.
    pub fn validate(&self, text: &str) -> Result<(), Error> {
        let len = text.len();
        for attr in &self.attrs {
            let (start, end) = (attr.start(), attr.end());
            if start > len || end > len {
                return Err(Error::invalid_bounds(start, end, len));
            }
            if !text.is_char_boundary(start) {
                return Err(Error::not_on_char_boundary(
                    text,
                    start,
                    end,
                    Endpoint::Start,
                    start,
                ));
            }
            if !text.is_char_boundary(end) {
                return Err(Error::not_on_char_boundary(
                    text,
                    start,
                    end,
                    Endpoint::End,
                    end,
                ));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AttrList {
    type Item = &'a Attribute;
    type IntoIter = core::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Attribute> for AttrList {
    /// Builds a list by calling [`AttrList::change`] for every attribute.
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut list = Self::new();
        for attr in iter {
            list.change(attr);
        }
        list
    }
}
