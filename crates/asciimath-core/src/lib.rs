//! Convert AsciiMath to MathML.
//!
//! AsciiMath is a lightweight notation for mathematics that reads close to how formulas are
//! typed in plain text, e.g. `sum_(i=1)^n i^2 = (n(n+1)(2n+1))/6`.
//!
//! # Usage
//!
//! For the default configuration, call [`convert`] directly:
//!
//! ```rust
//! use asciimath_core::{convert, MathDisplay};
//!
//! let mathml = convert("a^2", MathDisplay::Block).unwrap();
//! assert_eq!(mathml, r#"<math display="block"><msup><mi>a</mi><mn>2</mn></msup></math>"#);
//! ```
//!
//! Otherwise, create an [`AsciiMathToMathML`] converter from an [`AsciiMathConfig`]:
//!
//! ```rust
//! use asciimath_core::{AsciiMathConfig, AsciiMathToMathML, MathDisplay, PrettyPrint};
//!
//! let config = AsciiMathConfig {
//!     pretty_print: PrettyPrint::Always,
//!     ..Default::default()
//! };
//! let converter = AsciiMathToMathML::new(config);
//! let mathml = converter.convert("1/2", MathDisplay::Inline).unwrap();
//! println!("{}", mathml);
//! ```
//!
//! # Features
//!
//! - `serde`: With this feature, `AsciiMathConfig` implements serde's `Deserialize` and
//!   `Serialize`.
//! - `ariadne`: With this feature, [`ParseError::to_report`] turns an error into an
//!   `ariadne` report.
//!
mod error;
mod lexer;
mod matrix;
mod parser;
mod symbols;
mod token;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mathml_renderer::{
    arena::Arena,
    ast::{MathMLEmitter, Node},
    fmt::nested_indent,
};

pub use self::error::{ParseError, ParseErrorKind};
use self::{lexer::Lexer, parser::Parser};

/// Display mode for the equations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MathDisplay {
    /// For equations that are part of a line of text.
    Inline,
    /// For equations that are set apart on their own line.
    #[default]
    Block,
}

/// Configuration for pretty-printing the MathML output.
///
/// Pretty-printing means that newlines and indentation is added to the MathML output, to make it
/// easier to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum PrettyPrint {
    /// Never pretty print.
    #[default]
    Never,
    /// Always pretty print.
    Always,
    /// Pretty print for block equations only.
    Auto,
}

/// Configuration object for the AsciiMath to MathML conversion.
///
/// # Example usage
///
/// ```rust
/// use asciimath_core::{AsciiMathConfig, PrettyPrint};
///
/// // Default values
/// let config = AsciiMathConfig::default();
///
/// // Pretty-printed output with the MathML namespace
/// let config = AsciiMathConfig {
///     pretty_print: PrettyPrint::Auto,
///     xml_namespace: true,
///     ..Default::default()
/// };
/// ```
///
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct AsciiMathConfig {
    /// A configuration for pretty-printing the MathML output. See [`PrettyPrint`] for details.
    pub pretty_print: PrettyPrint,
    /// If `true`, include `xmlns="http://www.w3.org/1998/Math/MathML"` in the `<math>` tag.
    pub xml_namespace: bool,
    /// If `true`, wrap the MathML output in `<semantics>` tags with an
    /// `<annotation encoding="text/x-asciimath">` child containing the original source.
    pub annotation: bool,
}

/// A converter that transforms AsciiMath into MathML.
///
/// The converter holds no state besides its configuration, so one instance can be shared
/// between threads.
#[derive(Debug, Default)]
pub struct AsciiMathToMathML {
    config: AsciiMathConfig,
}

impl AsciiMathToMathML {
    /// Create a new converter with the given configuration.
    pub fn new(config: AsciiMathConfig) -> Self {
        Self { config }
    }

    /// Convert AsciiMath text to MathML.
    ///
    /// The second argument specifies whether it is an inline or a block equation.
    ///
    /// ```rust
    /// use asciimath_core::{AsciiMathToMathML, MathDisplay};
    ///
    /// let converter = AsciiMathToMathML::default();
    /// let mathml = converter.convert("sqrt(x^2+1)", MathDisplay::Inline).unwrap();
    /// println!("{}", mathml);
    ///
    /// let err = converter.convert("(a", MathDisplay::Block).unwrap_err();
    /// assert_eq!(err.offset(), 0);
    /// ```
    ///
    pub fn convert(&self, text: &str, display: MathDisplay) -> Result<String, Box<ParseError>> {
        let arena = Arena::new();
        let ast = parse(text, &arena)?;

        let mut emitter = MathMLEmitter::new();
        emitter.push_str("<math");
        if self.config.xml_namespace {
            emitter.push_str(" xmlns=\"http://www.w3.org/1998/Math/MathML\"");
        }
        emitter.push_str(match display {
            MathDisplay::Block => " display=\"block\"",
            MathDisplay::Inline => " display=\"inline\"",
        });
        emitter.push_str(">");

        let pretty_print = matches!(self.config.pretty_print, PrettyPrint::Always)
            || (matches!(self.config.pretty_print, PrettyPrint::Auto)
                && display == MathDisplay::Block);

        let base_indent = if pretty_print { 1 } else { 0 };
        // We ignore the results of `emit` here, because the only possible error is a formatting
        // error when writing to the string, and `String`'s `write_str` never returns an error.
        if self.config.annotation {
            let child_indent = nested_indent(base_indent);
            emitter.new_line(base_indent);
            emitter.push_str("<semantics>");
            match ast.as_slice() {
                [node] => {
                    let _ = emitter.emit(node, child_indent);
                }
                nodes => {
                    let _ = emitter.emit(&Node::Row(nodes), child_indent);
                }
            }
            emitter.new_line(child_indent);
            emitter.push_str("<annotation encoding=\"text/x-asciimath\">");
            emitter.push_escaped(text);
            emitter.push_str("</annotation>");
            emitter.new_line(base_indent);
            emitter.push_str("</semantics>");
        } else {
            for node in ast {
                let _ = emitter.emit(node, base_indent);
            }
        }
        if pretty_print {
            emitter.push_str("\n");
        }
        emitter.push_str("</math>");

        let output = emitter.into_inner();
        tracing::trace!(len = output.len(), "rendered MathML");
        Ok(output)
    }
}

/// Convert AsciiMath text to MathML with the default configuration.
///
/// ```rust
/// use asciimath_core::{convert, MathDisplay};
///
/// let mathml = convert("1/2", MathDisplay::Block).unwrap();
/// assert_eq!(mathml, r#"<math display="block"><mfrac><mn>1</mn><mn>2</mn></mfrac></math>"#);
/// ```
#[inline]
pub fn convert(text: &str, display: MathDisplay) -> Result<String, Box<ParseError>> {
    AsciiMathToMathML::default().convert(text, display)
}

fn parse<'arena, 'source>(
    text: &'source str,
    arena: &'arena Arena,
) -> Result<Vec<&'arena Node<'arena>>, Box<ParseError>>
where
    'source: 'arena,
{
    let mut tokens = Vec::new();
    if let Err(err) = Lexer::new(text).tokenize_into(&mut tokens) {
        // A stray or mismatched closing bracket before the failure is reported instead.
        parser::check_closing_brackets(&tokens)?;
        return Err(err);
    }
    tracing::debug!(?tokens, "lexed input");
    let nodes = Parser::new(tokens, arena)?.parse()?;
    tracing::debug!(?nodes, "parsed input");
    Ok(nodes)
}

static_assertions::assert_impl_all!(AsciiMathToMathML: Send, Sync);
static_assertions::assert_impl_all!(ParseError: Send, Sync);
