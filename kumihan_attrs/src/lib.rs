// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style attributes and the interval-merging attribute list consumed by `kumihan`.
//!
//! An [`AttrList`] holds [`Attribute`]s sorted by start index. Inserting through
//! [`AttrList::change`] keeps the list canonical: touching or overlapping entries of the same
//! kind and value are merged, and a new value of an existing kind clips or splits whatever it
//! overlaps.
//!
//! ```
//! use kumihan_attrs::{AttrList, AttrValue, Attribute, Underline};
//!
//! let mut list = AttrList::new();
//! list.change(Attribute::new(0..5, AttrValue::Underline(Underline::Single)).unwrap());
//! list.change(Attribute::new(3..8, AttrValue::Underline(Underline::Single)).unwrap());
//!
//! assert_eq!(list.len(), 1);
//! assert_eq!(list.iter().next().unwrap().range(), 0..8);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Forwarded to `peniko`.
//! - `libm`: Use `libm` for the floating point math `peniko` needs without `std`.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("kumihan_attrs requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

mod attr_list;
mod attribute;
mod error;
mod rect;
mod segments;

pub use crate::attr_list::{AttrList, get_first_of_kind};
pub use crate::attribute::{AttrKind, AttrValue, Attribute, FontDesc, FontStyle, Underline};
pub use crate::error::{BoundaryInfo, Endpoint, Error, ErrorKind};
pub use crate::rect::Rect;
pub use crate::segments::{AttrSegments, AttrSegmentsWorkspace};
