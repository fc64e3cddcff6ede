use std::fmt;

use memchr::memmem::Finder;

use asciimath_core::{MathDisplay, ParseError};

use crate::html_entities::replace_html_entities;

/// A 1-based line and column in the HTML input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Locate the byte offset `at` within `source`. Columns count characters, not bytes.
    fn of(source: &str, at: usize) -> Self {
        let before = &source.as_bytes()[..at.min(source.len())];
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |newline| newline + 1);
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug)]
pub enum ReplaceErrorKind {
    /// An opening delimiter without a closing one.
    UnclosedDelimiter,
    /// An opening delimiter inside a formula.
    NestedDelimiters,
    /// An inline formula closed by a block delimiter or vice versa. Holds the offset of the
    /// closing delimiter.
    MismatchedDelimiters(usize),
    /// The formula failed to convert. Also holds the formula with HTML entities decoded.
    Formula(Box<ParseError>, String),
}

/// An error that stops the replacement of formulas in an HTML document.
#[derive(Debug)]
pub struct ReplaceError<'source> {
    pub offset: usize,
    pub kind: ReplaceErrorKind,
    source: &'source str,
}

impl ReplaceError<'_> {
    pub fn location(&self) -> Location {
        Location::of(self.source, self.offset)
    }
}

impl fmt::Display for ReplaceError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.location();
        match &self.kind {
            ReplaceErrorKind::UnclosedDelimiter => write!(f, "Unclosed delimiter on {at}."),
            ReplaceErrorKind::NestedDelimiters => {
                write!(f, "Formulas cannot contain an opening delimiter ({at}).")
            }
            ReplaceErrorKind::MismatchedDelimiters(close) => write!(
                f,
                "Formula opened on {at} is closed by the other kind of delimiter on {}.",
                Location::of(self.source, *close)
            ),
            ReplaceErrorKind::Formula(err, formula) => {
                write!(f, "Formula '{formula}' on {at} failed to convert:\n{err}")
            }
        }
    }
}

impl std::error::Error for ReplaceError<'_> {}

/// The opening and closing delimiter of one display mode.
struct Delimiter<'args> {
    open: Finder<'args>,
    close: Finder<'args>,
}

impl<'args> Delimiter<'args> {
    fn new((open, close): (&'args str, &'args str)) -> Self {
        Delimiter {
            open: Finder::new(open),
            close: Finder::new(close),
        }
    }

    fn finder(&self, side: Side) -> &Finder<'args> {
        match side {
            Side::Open => &self.open,
            Side::Close => &self.close,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Open,
    Close,
}

/// Finds AsciiMath formulas between delimiters in HTML and replaces them.
pub struct Replacer<'args> {
    inline: Delimiter<'args>,
    block: Delimiter<'args>,
    /// Whether inline and block formulas end with the same delimiter.
    shared_close: bool,
    /// Skip delimiters that are preceded by a backslash.
    skip_escaped: bool,
    /// Leave failed formulas untouched instead of aborting.
    keep_failed: bool,
    /// Scratch space for formulas with HTML entities decoded.
    decoded: String,
}

impl<'args> Replacer<'args> {
    pub fn new(
        inline_delim: (&'args str, &'args str),
        block_delim: (&'args str, &'args str),
        ignore_escaped_delim: bool,
        continue_on_error: bool,
    ) -> Self {
        Replacer {
            shared_close: inline_delim.1 == block_delim.1,
            inline: Delimiter::new(inline_delim),
            block: Delimiter::new(block_delim),
            skip_escaped: ignore_escaped_delim,
            keep_failed: continue_on_error,
            decoded: String::new(),
        }
    }

    fn delimiter(&self, display: MathDisplay) -> &Delimiter<'args> {
        match display {
            MathDisplay::Inline => &self.inline,
            MathDisplay::Block => &self.block,
        }
    }

    /// Replace every delimited formula in `input`.
    ///
    /// `convert` appends the replacement for one formula to the buffer. It receives the
    /// formula with HTML entities decoded.
    pub fn replace<'source, F>(
        &mut self,
        input: &'source str,
        mut convert: F,
    ) -> Result<String, ReplaceError<'source>>
    where
        F: FnMut(&mut String, &str, MathDisplay) -> Result<(), Box<ParseError>>,
    {
        let error = |offset, kind| ReplaceError {
            offset,
            kind,
            source: input,
        };
        let mut output = String::with_capacity(input.len());
        let mut rest_start = 0;

        while let Some((display, open_at)) = self.find(input, rest_start, Side::Open) {
            output.push_str(&input[rest_start..open_at]);
            let delimiter = self.delimiter(display);
            let content_start = open_at + delimiter.open.needle().len();

            let Some((close_display, close_at)) = self.find(input, content_start, Side::Close)
            else {
                return Err(error(open_at, ReplaceErrorKind::UnclosedDelimiter));
            };
            if !self.shared_close && close_display != display {
                return Err(error(
                    open_at,
                    ReplaceErrorKind::MismatchedDelimiters(close_at),
                ));
            }
            let end = close_at + self.delimiter(close_display).close.needle().len();

            let content = &input[content_start..close_at];
            if let Some((_, nested_at)) = self.find(content, 0, Side::Open) {
                return Err(error(
                    content_start + nested_at,
                    ReplaceErrorKind::NestedDelimiters,
                ));
            }

            let formula = replace_html_entities(&mut self.decoded, content);
            if let Err(err) = convert(&mut output, formula, display) {
                if !self.keep_failed {
                    let formula = formula.to_string();
                    return Err(error(
                        content_start,
                        ReplaceErrorKind::Formula(err, formula),
                    ));
                }
                tracing::warn!(offset = content_start, error = %err, "keeping formula that failed");
                output.push_str(&input[open_at..end]);
            }
            rest_start = end;
        }

        output.push_str(&input[rest_start..]);
        Ok(output)
    }

    /// Find the first delimiter of either display mode at or after `from`.
    ///
    /// Block delimiters win when both start at the same position, so that a block delimiter
    /// which extends the inline one is recognized.
    fn find(&self, input: &str, from: usize, side: Side) -> Option<(MathDisplay, usize)> {
        let haystack = &input.as_bytes()[from..];
        let inline = self.find_unescaped(haystack, self.inline.finder(side));
        let block = self.find_unescaped(haystack, self.block.finder(side));
        let (display, at) = match (inline, block) {
            (Some(i), Some(b)) if i < b => (MathDisplay::Inline, i),
            (_, Some(b)) => (MathDisplay::Block, b),
            (Some(i), None) => (MathDisplay::Inline, i),
            (None, None) => return None,
        };
        Some((display, from + at))
    }

    fn find_unescaped(&self, haystack: &[u8], finder: &Finder<'_>) -> Option<usize> {
        let mut from = 0;
        loop {
            let at = from + finder.find(&haystack[from..])?;
            if !(self.skip_escaped && at > 0 && haystack[at - 1] == b'\\') {
                return Some(at);
            }
            from = at + finder.needle().len();
        }
    }
}
