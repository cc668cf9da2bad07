// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout over shaped glyph runs.
//!
//! Kumihan takes text plus an [`AttrList`], splits it into paragraphs and items, shapes each
//! item through a caller-provided [`Shaper`] and greedily breaks the result into lines. Each
//! finished line is reordered for bidirectional text, has its letter spacing redistributed and
//! is optionally justified. The result can be queried line by line, walked with a
//! [`LayoutIter`], or used for cursor placement and visual cursor motion.
//!
//! All geometry is in integer layout units; see [`SCALE`].
//!
//! ```
//! use kumihan::{Analysis, FontDesc, Glyph, GlyphString, Layout, Rect, Shaper};
//!
//! struct Fixed;
//!
//! impl Shaper for Fixed {
//!     fn shape(&self, text: &str, _analysis: &Analysis) -> GlyphString {
//!         let mut glyphs = GlyphString::new();
//!         for (index, ch) in text.char_indices() {
//!             glyphs.push(Glyph::new(u32::from(ch), 10), index);
//!         }
//!         glyphs
//!     }
//!
//!     fn glyph_extents(&self, glyphs: &GlyphString, _font: &FontDesc) -> (Rect, Rect) {
//!         let rect = Rect::new(0, -8, glyphs.width(), 10);
//!         (rect, rect)
//!     }
//! }
//!
//! let mut layout = Layout::new(Fixed);
//! layout.set_text("one two three");
//! layout.set_width(Some(80));
//! assert_eq!(layout.line_count(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Forwarded to `kumihan_attrs` and `peniko`.
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
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("kumihan requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

mod analysis;
mod error;
mod glyph;
mod layout;
mod markup;
mod properties;
mod shaper;
mod tabs;
mod units;

#[cfg(test)]
mod tests;

pub use kumihan_attrs;
pub use kumihan_attrs::{
    AttrKind, AttrList, AttrValue, Attribute, FontDesc, FontStyle, Rect, Underline,
};

pub use icu_properties::props::Script;
pub use peniko::Color;

pub use crate::analysis::{Analysis, Analyzer, Direction, Item, LogAttr, UnicodeAnalyzer};
pub use crate::error::{Error, ErrorKind};
pub use crate::glyph::{EMPTY_GLYPH, Glyph, GlyphId, GlyphString};
pub use crate::layout::{
    Alignment, BreakResult, CursorMotion, EllipsizeMode, Layout, LayoutIter, Line, Run,
    WrapMode,
};
pub use crate::markup::{MarkupError, MarkupParser, ParsedMarkup};
pub use crate::properties::{ItemProperties, ShapeOverride};
pub use crate::shaper::Shaper;
pub use crate::tabs::TabArray;
pub use crate::units::{SCALE, from_pixels, pixels};
