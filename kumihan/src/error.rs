// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::MarkupError;

/// Error returned by [`Layout`](crate::Layout) operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the context of the failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,

    /// Offending byte index, for index-related errors.
    index: Option<usize>,

    /// Length of the layout text at the time of the call.
    len: usize,

    /// Underlying cause.
    source: Option<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Markup(MarkupError),
    Attributes(kumihan_attrs::Error),
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending byte index, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The length in bytes of the text the call was checked against.
    pub fn text_len(&self) -> usize {
        self.len
    }

    /// The parser diagnostic for [`ErrorKind::Markup`].
    pub fn markup_error(&self) -> Option<&MarkupError> {
        match &self.source {
            Some(Source::Markup(err)) => Some(err),
            _ => None,
        }
    }

    /// The attribute validation failure for [`ErrorKind::Attributes`].
    pub fn attributes_error(&self) -> Option<&kumihan_attrs::Error> {
        match &self.source {
            Some(Source::Attributes(err)) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn markup(err: MarkupError, len: usize) -> Self {
        Self {
            kind: ErrorKind::Markup,
            index: Some(err.offset()),
            len,
            source: Some(Source::Markup(err)),
        }
    }

    pub(crate) fn attributes(err: kumihan_attrs::Error, len: usize) -> Self {
        Self {
            kind: ErrorKind::Attributes,
            index: None,
            len,
            source: Some(Source::Attributes(err)),
        }
    }

    pub(crate) fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::IndexOutOfBounds,
            index: Some(index),
            len,
            source: None,
        }
    }

    pub(crate) fn not_on_char_boundary(index: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::NotOnCharBoundary,
            index: Some(index),
            len,
            source: None,
        }
    }

    pub(crate) fn invalid_trailing(index: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidTrailing,
            index: Some(index),
            len,
            source: None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let index = self.index.unwrap_or_default();
        match (&self.source, self.kind) {
            (Some(Source::Markup(err)), _) => write!(f, "{err}"),
            (Some(Source::Attributes(err)), _) => write!(f, "invalid attribute list: {err}"),
            (None, ErrorKind::IndexOutOfBounds) => {
                write!(f, "index {index} out of bounds for len {}", self.len)
            }
            (None, ErrorKind::NotOnCharBoundary) => {
                write!(f, "index {index} not on UTF-8 boundary")
            }
            (None, ErrorKind::InvalidTrailing) => {
                write!(f, "trailing count at index {index} moves past the end of the text")
            }
            (None, kind) => write!(f, "{kind:?}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.source {
            Some(Source::Markup(err)) => Some(err),
            Some(Source::Attributes(err)) => Some(err),
            None => None,
        }
    }
}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The markup parser rejected its input. The layout was left unchanged.
    Markup,

    /// An attribute list did not fit the layout text.
    Attributes,

    /// A byte index was past the end of the text.
    IndexOutOfBounds,

    /// A byte index was not on a UTF-8 character boundary.
    NotOnCharBoundary,

    /// A trailing character count moved past the end of the text.
    InvalidTrailing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use core::error::Error as _;

    #[test]
    fn markup_error_keeps_diagnostic() {
        let err = Error::markup(MarkupError::new("unclosed <rt>", 12), 0);
        assert_eq!(err.kind(), ErrorKind::Markup);
        assert_eq!(err.index(), Some(12));
        assert_eq!(err.markup_error().unwrap().message(), "unclosed <rt>");
        assert!(err.source().is_some());
        assert!(format!("{err}").contains("byte 12"));
    }

    #[test]
    fn index_error_reports_len() {
        let err = Error::index_out_of_bounds(9, 4);
        assert_eq!(err.text_len(), 4);
        assert!(format!("{err}").contains("len 4"));
        assert!(err.source().is_none());
    }
}
