use std::ops::Range;

use crate::symbols::Symbol;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'source> {
    /// End of input.
    Eoi,
    /// A run of digits with at most one decimal point, e.g. `3.14`.
    Number(&'source str),
    /// A single character that is not part of any known spelling, e.g. `x` or `?`.
    Letter(&'source str),
    /// Verbatim text, either from a quoted literal (`"..."`) or from the bracketed argument of
    /// `text` and `color`. The quotes or brackets are not included.
    Text(&'source str),
    /// An entry of the symbol table.
    Symbol(Symbol),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn zero_width(at: usize) -> Self {
        Span { start: at, end: at }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token together with its span in the input string.
#[derive(Debug, Clone, Copy)]
pub struct TokSpan<'source>(Token<'source>, Span);

impl<'source> TokSpan<'source> {
    #[inline]
    pub const fn new(token: Token<'source>, span: Span) -> Self {
        TokSpan(token, span)
    }

    #[inline]
    pub fn token(&self) -> &Token<'source> {
        &self.0
    }

    #[inline]
    pub fn into_token(self) -> Token<'source> {
        self.0
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.1
    }
}
