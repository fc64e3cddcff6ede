use std::fmt::{self, Write};
use std::ops::Range;

use mathml_renderer::html_utils::{escape_double_quoted_html_attribute, escape_html_content};
use strum_macros::IntoStaticStr;

use crate::MathDisplay;

/// Represents an error that occurred during AsciiMath parsing.
///
/// The range is the byte span of the offending part of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub Range<usize>, pub ParseErrorKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// A closing bracket without an open bracket, a closing bracket of the wrong kind, or an
    /// open bracket that is never closed.
    #[strum(serialize = "Unbalanced bracket.")]
    UnbalancedBracket,
    /// A quoted text literal (or a bracketed `text` argument) that is never closed.
    #[strum(serialize = "Unterminated text literal.")]
    UnterminatedText,
    /// A second subscript or a second superscript on the same base.
    #[strum(serialize = "Duplicate subscript or superscript on the same base.")]
    ExtraneousModifier,
    /// The input ended where an operand was expected.
    #[strum(serialize = "Expected an operand but reached end of input.")]
    UnexpectedEndOfInput,
    /// A closing bracket, `^`, `_` or `/` where an operand was expected.
    #[strum(serialize = "Expected an operand.")]
    MissingOperand,
    /// The input is nested too deeply.
    #[strum(serialize = "Nesting limit exceeded. Please simplify your equation.")]
    RecursionLimitExceeded,
}

impl ParseErrorKind {
    /// Returns the error message as a string.
    #[inline]
    pub fn string(self) -> &'static str {
        self.into()
    }
}

impl ParseError {
    /// The byte offset in the input at which the error was detected.
    #[inline]
    pub fn offset(&self) -> usize {
        self.0.start
    }

    #[inline]
    pub fn kind(&self) -> ParseErrorKind {
        self.1
    }

    /// Format a parse error as an HTML snippet.
    ///
    /// # Arguments
    /// - `source`: The original AsciiMath input that caused the error.
    /// - `display`: The display mode of the equation (inline or block).
    /// - `css_class`: An optional CSS class to apply to the error element. If `None`,
    ///   defaults to `"asciimath-error"`.
    pub fn to_html(&self, source: &str, display: MathDisplay, css_class: Option<&str>) -> String {
        let tag = match display {
            MathDisplay::Inline => "span",
            MathDisplay::Block => "p",
        };
        let mut html = String::with_capacity(source.len() + 96);
        html.push('<');
        html.push_str(tag);
        html.push_str(r#" class=""#);
        escape_double_quoted_html_attribute(&mut html, css_class.unwrap_or("asciimath-error"));
        // Writing to a `String` cannot fail.
        let _ = write!(html, r#"" title="{}: "#, self.offset());
        escape_double_quoted_html_attribute(&mut html, self.1.string());
        html.push_str(r#""><code>"#);
        escape_html_content(&mut html, source);
        let _ = write!(html, "</code></{tag}>");
        html
    }

    pub fn error_message(&self) -> String {
        self.1.string().to_string()
    }
}

#[cfg(feature = "ariadne")]
impl ParseError {
    /// Convert this error into an [`ariadne::Report`] for pretty-printing.
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match self.1 {
            ParseErrorKind::UnbalancedBracket => "unbalanced bracket",
            ParseErrorKind::UnterminatedText => "text starts here",
            ParseErrorKind::ExtraneousModifier => "duplicate",
            ParseErrorKind::UnexpectedEndOfInput => "expected an operand here",
            ParseErrorKind::MissingOperand => "expected an operand, found this",
            ParseErrorKind::RecursionLimitExceeded => "limit exceeded",
        };

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, self.0.start..self.0.start))
            .with_config(config)
            .with_message(self.1.string())
            .with_label(Label::new((source_name, self.0.clone())).with_message(label_msg))
            .finish()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.start, self.1.string())
    }
}

impl std::error::Error for ParseError {}
