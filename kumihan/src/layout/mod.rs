// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout types.

mod alignment;
mod cursor;
mod iter;
mod line;
mod reorder;
mod shape;

pub(crate) mod data;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;

use kumihan_attrs::{AttrList, FontDesc, Rect};
use smallvec::SmallVec;

use self::data::{LayoutLines, LineData};
use self::line::greedy::break_paragraphs;
use self::line::line_extents;
use crate::{
    Analysis, Analyzer, Direction, Error, LogAttr, MarkupParser, SCALE, Script, Shaper, TabArray,
    UnicodeAnalyzer,
};

pub use cursor::CursorMotion;
pub use data::Run;
pub use iter::LayoutIter;
pub use line::Line;

/// Where lines may be broken when they do not fit the layout width.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum WrapMode {
    /// Break at word boundaries only.
    #[default]
    Word,
    /// Break between any two graphemes.
    Char,
    /// Break at word boundaries, falling back to graphemes for words wider than a line.
    WordChar,
}

/// Horizontal alignment of lines within the layout width.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum Alignment {
    /// Align content to the left edge.
    #[default]
    Left,
    /// Center each line.
    Center,
    /// Align content to the right edge.
    Right,
}

/// Where an ellipsis replaces text that does not fit.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum EllipsizeMode {
    /// Lines are wrapped instead.
    #[default]
    None,
    /// Omit characters at the start of the line.
    Start,
    /// Omit characters in the middle of the line.
    Middle,
    /// Omit characters at the end of the line.
    End,
}

/// Outcome of fitting one item onto the current line.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BreakResult {
    /// Nothing of the item fits.
    NoneFit,
    /// A prefix of the item fits; the rest stays queued.
    SomeFit,
    /// The whole item fits.
    AllFit,
    /// The line must end before the item, which stays queued.
    EmptyFit,
    /// The item is a forced line separator.
    LineSeparator,
}

/// Position of a line in layout coordinates.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) struct LineGeometry {
    /// Distance from the layout top to the line's baseline.
    pub(crate) baseline: i32,
    pub(crate) ink: Rect,
    pub(crate) logical: Rect,
}

#[derive(Clone, Default, PartialEq, Debug)]
pub(crate) struct Geometry {
    pub(crate) ink: Rect,
    pub(crate) logical: Rect,
    pub(crate) lines: Vec<LineGeometry>,
}

/// Text layout.
///
/// Holds text, attributes and configuration. Lines are computed lazily on the first query
/// and discarded by every setter.
#[derive(Clone)]
pub struct Layout<S, A = UnicodeAnalyzer> {
    pub(crate) text: String,
    pub(crate) attrs: AttrList,
    pub(crate) font: FontDesc,
    pub(crate) width: Option<i32>,
    pub(crate) indent: i32,
    pub(crate) spacing: i32,
    pub(crate) wrap: WrapMode,
    pub(crate) alignment: Alignment,
    pub(crate) justify: bool,
    pub(crate) auto_dir: bool,
    pub(crate) base_dir: Direction,
    pub(crate) single_paragraph: bool,
    pub(crate) tabs: Option<TabArray>,
    pub(crate) ellipsize: EllipsizeMode,
    pub(crate) shaper: S,
    pub(crate) analyzer: A,
    lines: OnceCell<LayoutLines>,
    geometry: OnceCell<Geometry>,
    tab_width: OnceCell<i32>,
}

impl<S, A> fmt::Debug for Layout<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("text", &self.text)
            .field("attrs", &self.attrs)
            .field("font", &self.font)
            .field("width", &self.width)
            .field("wrap", &self.wrap)
            .field("alignment", &self.alignment)
            .field("justify", &self.justify)
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl<S: Shaper> Layout<S> {
    /// Creates an empty layout that shapes through `shaper` and analyzes text with the
    /// [`UnicodeAnalyzer`].
    pub fn new(shaper: S) -> Self {
        Self::with_analyzer(shaper, UnicodeAnalyzer)
    }
}

impl<S: Shaper, A: Analyzer> Layout<S, A> {
    /// Creates an empty layout with a custom text analyzer.
    pub fn with_analyzer(shaper: S, analyzer: A) -> Self {
        Self {
            text: String::new(),
            attrs: AttrList::new(),
            font: FontDesc::new("Sans", 10 * SCALE),
            width: None,
            indent: 0,
            spacing: 0,
            wrap: WrapMode::Word,
            alignment: Alignment::Left,
            justify: false,
            auto_dir: true,
            base_dir: Direction::Ltr,
            single_paragraph: false,
            tabs: None,
            ellipsize: EllipsizeMode::None,
            shaper,
            analyzer,
            lines: OnceCell::new(),
            geometry: OnceCell::new(),
            tab_width: OnceCell::new(),
        }
    }

    fn invalidate(&mut self) {
        self.lines = OnceCell::new();
        self.geometry = OnceCell::new();
        self.tab_width = OnceCell::new();
    }

    /// Returns the text of the layout.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    ///
    /// Attributes reaching past the new text are clipped to it. Those that end up empty or
    /// split a character are removed.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.into();
        let dropped = self.attrs.clip(&self.text);
        if !dropped.is_empty() {
            log::debug!(
                "dropped {} attributes that do not fit the new text",
                dropped.len()
            );
        }
        self.invalidate();
    }

    /// Returns the attributes of the layout.
    pub fn attributes(&self) -> &AttrList {
        &self.attrs
    }

    /// Replaces the attributes.
    ///
    /// Fails without changing the layout if an attribute does not fit the text.
    pub fn set_attributes(&mut self, attrs: AttrList) -> Result<(), Error> {
        attrs
            .validate(&self.text)
            .map_err(|err| Error::attributes(err, self.text.len()))?;
        self.attrs = attrs;
        self.invalidate();
        Ok(())
    }

    /// Replaces text and attributes with the output of `parser`.
    ///
    /// Either both are replaced or, on error, neither is.
    pub fn set_markup<P: MarkupParser + ?Sized>(
        &mut self,
        parser: &P,
        markup: &str,
    ) -> Result<(), Error> {
        let parsed = parser
            .parse(markup)
            .map_err(|err| Error::markup(err, self.text.len()))?;
        parsed
            .attrs
            .validate(&parsed.text)
            .map_err(|err| Error::attributes(err, parsed.text.len()))?;
        self.text = parsed.text;
        self.attrs = parsed.attrs;
        self.invalidate();
        Ok(())
    }

    /// Returns the font used where no font attribute applies.
    pub fn font(&self) -> &FontDesc {
        &self.font
    }

    /// Sets the font used where no font attribute applies.
    pub fn set_font(&mut self, font: FontDesc) {
        self.font = font;
        self.invalidate();
    }

    /// Returns the wrap width, or `None` if lines are not wrapped.
    pub fn width(&self) -> Option<i32> {
        self.width
    }

    /// Sets the width lines are wrapped to, in layout units.
    pub fn set_width(&mut self, width: Option<i32>) {
        if self.width != width {
            self.width = width;
            self.invalidate();
        }
    }

    /// Returns the paragraph indent.
    pub fn indent(&self) -> i32 {
        self.indent
    }

    /// Sets the indent of the first line of each paragraph, or of all other lines when
    /// negative.
    pub fn set_indent(&mut self, indent: i32) {
        if self.indent != indent {
            self.indent = indent;
            self.invalidate();
        }
    }

    /// Returns the space between lines.
    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Sets the space between lines.
    pub fn set_spacing(&mut self, spacing: i32) {
        if self.spacing != spacing {
            self.spacing = spacing;
            self.invalidate();
        }
    }

    /// Returns the wrap mode.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Sets where lines may be broken.
    pub fn set_wrap_mode(&mut self, wrap: WrapMode) {
        if self.wrap != wrap {
            self.wrap = wrap;
            self.invalidate();
        }
    }

    /// Returns the alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Sets how lines are aligned.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.alignment != alignment {
            self.alignment = alignment;
            self.invalidate();
        }
    }

    /// Returns whether lines are justified.
    pub fn justify(&self) -> bool {
        self.justify
    }

    /// Sets whether every line but the last of each paragraph is stretched to the width.
    pub fn set_justify(&mut self, justify: bool) {
        if self.justify != justify {
            self.justify = justify;
            self.invalidate();
        }
    }

    /// Returns whether paragraph directions are detected from the text.
    pub fn auto_dir(&self) -> bool {
        self.auto_dir
    }

    /// Sets whether each paragraph takes its direction from its first strong character.
    ///
    /// When enabled, left and right alignment are swapped for paragraphs whose direction is
    /// opposite to the base direction.
    pub fn set_auto_dir(&mut self, auto_dir: bool) {
        if self.auto_dir != auto_dir {
            self.auto_dir = auto_dir;
            self.invalidate();
        }
    }

    /// Returns the base direction.
    pub fn base_dir(&self) -> Direction {
        self.base_dir
    }

    /// Sets the direction of paragraphs without a detected direction.
    pub fn set_base_dir(&mut self, dir: Direction) {
        if self.base_dir != dir {
            self.base_dir = dir;
            self.invalidate();
        }
    }

    /// Returns whether paragraph delimiters are treated as ordinary characters.
    pub fn single_paragraph_mode(&self) -> bool {
        self.single_paragraph
    }

    /// Sets whether the whole text is laid out as one paragraph.
    pub fn set_single_paragraph_mode(&mut self, single: bool) {
        if self.single_paragraph != single {
            self.single_paragraph = single;
            self.invalidate();
        }
    }

    /// Returns the tab stops, or `None` for the default stops.
    pub fn tabs(&self) -> Option<&TabArray> {
        self.tabs.as_ref()
    }

    /// Sets the tab stops; `None` restores stops every eight spaces.
    pub fn set_tabs(&mut self, tabs: Option<TabArray>) {
        self.tabs = tabs;
        self.invalidate();
    }

    /// Returns the ellipsize mode.
    pub fn ellipsize(&self) -> EllipsizeMode {
        self.ellipsize
    }

    /// Sets the ellipsize mode. Lines are not wrapped while it is active.
    pub fn set_ellipsize(&mut self, mode: EllipsizeMode) {
        if self.ellipsize != mode {
            self.ellipsize = mode;
            self.invalidate();
        }
    }

    /// Returns the shaper.
    pub fn shaper(&self) -> &S {
        &self.shaper
    }

    pub(crate) fn line_data(&self) -> &LayoutLines {
        self.lines.get_or_init(|| break_paragraphs(self))
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_data().lines.len()
    }

    /// Returns the line at `index`, or `None` past the last line.
    pub fn line(&self, index: usize) -> Option<Line<'_, S, A>> {
        Some(Line {
            layout: self,
            index,
            data: self.line_data().lines.get(index)?,
        })
    }

    /// Returns an iterator over the lines.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_, S, A>> + Clone {
        self.line_data()
            .lines
            .iter()
            .enumerate()
            .map(move |(index, data)| Line {
                layout: self,
                index,
                data,
            })
    }

    /// Returns the logical attributes of every character, plus one entry for the end of the
    /// text.
    pub fn log_attrs(&self) -> &[LogAttr] {
        &self.line_data().log_attrs
    }

    /// Returns the line containing the byte `index`.
    ///
    /// An index inside a paragraph delimiter belongs to the line before it, and an index past
    /// the end to the last line.
    pub fn index_to_line(&self, index: usize) -> Line<'_, S, A> {
        let lines = &self.line_data().lines;
        let mut found = 0;
        for (i, line) in lines.iter().enumerate() {
            if line.start_index > index {
                break;
            }
            found = i;
            if line.start_index + line.length > index {
                break;
            }
        }
        Line {
            layout: self,
            index: found,
            data: &lines[found],
        }
    }

    /// Returns an iterator over the clusters, runs and lines of the layout.
    pub fn iter(&self) -> LayoutIter<'_, S, A> {
        LayoutIter::new(self)
    }

    /// Ink and logical extents of the layout, relative to its top left corner.
    pub fn extents(&self) -> (Rect, Rect) {
        let geometry = self.geometry();
        (geometry.ink, geometry.logical)
    }

    /// Logical width and height of the layout.
    pub fn size(&self) -> (i32, i32) {
        let (_, logical) = self.extents();
        (logical.width, logical.height)
    }

    pub(crate) fn geometry(&self) -> &Geometry {
        self.geometry.get_or_init(|| self.compute_geometry())
    }

    fn compute_geometry(&self) -> Geometry {
        let lines = &self.line_data().lines;
        let extents: Vec<(Rect, Rect)> = lines
            .iter()
            .map(|line| line_extents(self, line))
            .collect();

        let need_width = lines
            .iter()
            .any(|line| self.line_alignment(line) != Alignment::Left);
        let width = match self.width {
            Some(width) => width,
            None if need_width => extents
                .iter()
                .map(|(_, logical)| logical.width)
                .max()
                .unwrap_or(0),
            None => 0,
        };

        let mut geometry = Geometry::default();
        let mut y = 0;
        for (i, (line, (ink, logical))) in lines.iter().zip(extents).enumerate() {
            let x = self.x_offset(line, width, logical.width);
            let line_ink = Rect {
                x: ink.x + x,
                y: y - logical.y + ink.y,
                ..ink
            };
            let line_logical = Rect {
                x: logical.x + x,
                y,
                ..logical
            };

            if i == 0 {
                geometry.ink = line_ink;
                geometry.logical = line_logical;
            } else {
                geometry.ink = geometry.ink.union(&line_ink);
                let total = &mut geometry.logical;
                let left = total.x.min(line_logical.x);
                total.width = total.right().max(line_logical.right()) - left;
                total.x = left;
                total.height += line_logical.height;
            }
            if i + 1 < lines.len() {
                geometry.logical.height += self.spacing;
            }

            geometry.lines.push(LineGeometry {
                baseline: y - logical.y,
                ink: line_ink,
                logical: line_logical,
            });
            y += line_logical.height + self.spacing;
        }
        geometry
    }

    /// Alignment of `line`, mirrored for lines running against the base direction.
    fn line_alignment(&self, line: &LineData) -> Alignment {
        if self.auto_dir && line.resolved_dir != self.base_dir {
            match self.alignment {
                Alignment::Left => Alignment::Right,
                Alignment::Right => Alignment::Left,
                Alignment::Center => Alignment::Center,
            }
        } else {
            self.alignment
        }
    }

    fn x_offset(&self, line: &LineData, layout_width: i32, line_width: i32) -> i32 {
        let alignment = self.line_alignment(line);
        let mut x = match alignment {
            Alignment::Left => 0,
            Alignment::Center => return (layout_width - line_width) / 2,
            Alignment::Right => layout_width - line_width,
        };
        let indent = if line.is_paragraph_start {
            self.indent.max(0)
        } else {
            -self.indent.min(0)
        };
        if alignment == Alignment::Left {
            x += indent;
        } else {
            x -= indent;
        }
        x
    }

    /// Width of eight spaces in the font at the start of the text.
    pub(crate) fn default_tab_width(&self) -> i32 {
        *self.tab_width.get_or_init(|| {
            let analysis = Analysis {
                level: 0,
                script: Script::Common,
                font: self.font_at(0).clone(),
                extra_attrs: SmallVec::new(),
            };
            let width = self.shaper.shape("        ", &analysis).width();
            if width > 0 { width } else { 50 * SCALE }
        })
    }

    pub(crate) fn font_at(&self, index: usize) -> &FontDesc {
        line::font_at(&self.attrs, &self.font, index)
    }
}
