use std::fmt::Write;

use crate::attribute::{ColumnLine, MathVariant, Notation, ScriptPlacement};
use crate::fmt::{nested_indent, new_line_and_indent};
use crate::html_utils::{escape_double_quoted_html_attribute, escape_html_content};

/// AST node
#[derive(Debug)]
pub enum Node<'arena> {
    /// `<mn>`
    Number(&'arena str),
    /// `<mi>`: single letters, Greek letters, function names and characters without a meaning
    /// of their own.
    Identifier(&'arena str),
    /// `<mo>`
    Operator(&'arena str),
    /// `<mtext>`. The content is escaped when emitted.
    Text(&'arena str),
    /// A word like "and" with a space on either side.
    SpacedText(&'arena str),
    Row(&'arena [&'arena Node<'arena>]),
    /// A bracketed group. `None` stands for an invisible bracket (`{:` and `:}`).
    Fenced {
        open: Option<&'static str>,
        close: Option<&'static str>,
        content: &'arena [&'arena Node<'arena>],
    },
    /// Content between two operators, without a surrounding row (`abs`, `floor`, ...).
    Delimited {
        open: &'static str,
        close: &'static str,
        content: &'arena Node<'arena>,
    },
    SubSup {
        base: &'arena Node<'arena>,
        sub: Option<&'arena Node<'arena>>,
        sup: Option<&'arena Node<'arena>>,
        placement: ScriptPlacement,
    },
    Fraction {
        num: &'arena Node<'arena>,
        den: &'arena Node<'arena>,
    },
    /// A square root if there is no index.
    Root {
        index: Option<&'arena Node<'arena>>,
        radicand: &'arena Node<'arena>,
    },
    /// Accents, horizontal braces and `overset`/`underset`.
    Decorated {
        base: &'arena Node<'arena>,
        over: Option<&'arena Node<'arena>>,
        under: Option<&'arena Node<'arena>>,
    },
    Enclosed {
        notation: Notation,
        content: &'arena Node<'arena>,
    },
    Styled {
        variant: MathVariant,
        content: &'arena Node<'arena>,
    },
    Colored {
        color: &'arena str,
        content: &'arena Node<'arena>,
    },
    Matrix {
        open: Option<&'static str>,
        close: Option<&'static str>,
        /// Rows of cells, where every cell is a sequence of nodes.
        rows: &'arena [&'arena [&'arena [&'arena Node<'arena>]]],
        column_lines: &'arena [ColumnLine],
    },
}

macro_rules! writeln_indent {
    ($buf:expr, $indent:expr, $($tail:tt)+) => {
        new_line_and_indent($buf, $indent);
        write!($buf, $($tail)+)?
    };
}

pub struct MathMLEmitter {
    s: String,
}

impl MathMLEmitter {
    #[inline]
    pub fn new() -> Self {
        Self { s: String::new() }
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.s
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.s.push_str(s);
    }

    /// Append `text` with `&`, `<` and `>` escaped.
    #[inline]
    pub fn push_escaped(&mut self, text: &str) {
        escape_html_content(&mut self.s, text);
    }

    #[inline]
    pub fn new_line(&mut self, indent_num: usize) {
        new_line_and_indent(&mut self.s, indent_num);
    }

    /// Write `node` as MathML.
    ///
    /// `base_indent` is the nesting level used for pretty-printing; with `0`, everything is
    /// written on one line without any whitespace between elements.
    pub fn emit(&mut self, node: &Node<'_>, base_indent: usize) -> std::fmt::Result {
        // Get the base indent out of the way.
        new_line_and_indent(&mut self.s, base_indent);

        match node {
            Node::Number(number) => write!(self.s, "<mn>{number}</mn>")?,
            Node::Identifier(ident) => write!(self.s, "<mi>{ident}</mi>")?,
            Node::Operator(op) => write!(self.s, "<mo>{op}</mo>")?,
            Node::Text(text) => {
                self.s.push_str("<mtext>");
                escape_html_content(&mut self.s, text);
                self.s.push_str("</mtext>");
            }
            Node::SpacedText(word) => {
                let child_indent = nested_indent(base_indent);
                write!(self.s, "<mrow>")?;
                writeln_indent!(&mut self.s, child_indent, "<mspace width=\"1ex\"/>");
                writeln_indent!(&mut self.s, child_indent, "<mtext>{word}</mtext>");
                writeln_indent!(&mut self.s, child_indent, "<mspace width=\"1ex\"/>");
                writeln_indent!(&mut self.s, base_indent, "</mrow>");
            }
            Node::Row(nodes) => self.emit_element("mrow", nodes, base_indent)?,
            Node::Fenced {
                open,
                close,
                content,
            } => {
                let child_indent = nested_indent(base_indent);
                write!(self.s, "<mrow>")?;
                self.emit_fence(*open, child_indent)?;
                for node in content.iter() {
                    self.emit(node, child_indent)?;
                }
                self.emit_fence(*close, child_indent)?;
                writeln_indent!(&mut self.s, base_indent, "</mrow>");
            }
            Node::Delimited {
                open,
                close,
                content,
            } => {
                write!(self.s, "<mo>{open}</mo>")?;
                self.emit(content, base_indent)?;
                writeln_indent!(&mut self.s, base_indent, "<mo>{close}</mo>");
            }
            Node::SubSup {
                base,
                sub,
                sup,
                placement,
            } => self.emit_scripts(base, *sub, *sup, *placement, base_indent)?,
            Node::Fraction { num, den } => self.emit_element("mfrac", &[*num, *den], base_indent)?,
            Node::Root {
                index: None,
                radicand,
            } => self.emit_element("msqrt", &[*radicand], base_indent)?,
            Node::Root {
                index: Some(index),
                radicand,
            } => self.emit_element("mroot", &[*radicand, *index], base_indent)?,
            Node::Decorated { base, over, under } => match (*under, *over) {
                (Some(under), Some(over)) => {
                    self.emit_element("munderover", &[*base, under, over], base_indent)?
                }
                (Some(under), None) => self.emit_element("munder", &[*base, under], base_indent)?,
                (None, Some(over)) => self.emit_element("mover", &[*base, over], base_indent)?,
                (None, None) => self.emit_element("mrow", &[*base], base_indent)?,
            },
            Node::Enclosed { notation, content } => {
                write!(
                    self.s,
                    "<menclose notation=\"{}\">",
                    <&str>::from(notation)
                )?;
                self.emit(content, nested_indent(base_indent))?;
                writeln_indent!(&mut self.s, base_indent, "</menclose>");
            }
            Node::Styled { variant, content } => {
                write!(
                    self.s,
                    "<mstyle mathvariant=\"{}\">",
                    <&str>::from(variant)
                )?;
                self.emit(content, nested_indent(base_indent))?;
                writeln_indent!(&mut self.s, base_indent, "</mstyle>");
            }
            Node::Colored { color, content } => {
                self.s.push_str("<mstyle mathcolor=\"");
                escape_double_quoted_html_attribute(&mut self.s, color);
                self.s.push_str("\">");
                self.emit(content, nested_indent(base_indent))?;
                writeln_indent!(&mut self.s, base_indent, "</mstyle>");
            }
            Node::Matrix {
                open,
                close,
                rows,
                column_lines,
            } => self.emit_matrix(*open, *close, rows, column_lines, base_indent)?,
        };
        Ok(())
    }

    /// Write an element whose children are all nodes.
    ///
    /// The caller has already taken care of the line break in front of the opening tag.
    fn emit_element(
        &mut self,
        name: &str,
        children: &[&Node<'_>],
        base_indent: usize,
    ) -> std::fmt::Result {
        let child_indent = nested_indent(base_indent);
        write!(self.s, "<{name}>")?;
        for child in children.iter() {
            self.emit(child, child_indent)?;
        }
        writeln_indent!(&mut self.s, base_indent, "</{name}>");
        Ok(())
    }

    fn emit_fence(&mut self, fence: Option<&str>, indent: usize) -> std::fmt::Result {
        if let Some(fence) = fence {
            writeln_indent!(&mut self.s, indent, "<mo>{fence}</mo>");
        }
        Ok(())
    }

    fn emit_scripts(
        &mut self,
        base: &Node<'_>,
        sub: Option<&Node<'_>>,
        sup: Option<&Node<'_>>,
        placement: ScriptPlacement,
        base_indent: usize,
    ) -> std::fmt::Result {
        let name = match (placement, sub.is_some(), sup.is_some()) {
            (_, false, false) => return self.emit_element("mrow", &[base], base_indent),
            (ScriptPlacement::Attached, true, false) => "msub",
            (ScriptPlacement::Attached, false, true) => "msup",
            (ScriptPlacement::Attached, true, true) => "msubsup",
            (_, true, false) => "munder",
            (_, false, true) => "mover",
            (_, true, true) => "munderover",
        };
        let child_indent = nested_indent(base_indent);
        write!(self.s, "<{name}>")?;
        if let ScriptPlacement::Stacked(position) = placement {
            let wrapper = position.element();
            writeln_indent!(&mut self.s, child_indent, "<{wrapper}>");
            self.emit(base, nested_indent(child_indent))?;
            writeln_indent!(&mut self.s, child_indent, "</{wrapper}>");
        } else {
            self.emit(base, child_indent)?;
        }
        if let Some(sub) = sub {
            self.emit(sub, child_indent)?;
        }
        if let Some(sup) = sup {
            self.emit(sup, child_indent)?;
        }
        writeln_indent!(&mut self.s, base_indent, "</{name}>");
        Ok(())
    }

    fn emit_matrix(
        &mut self,
        open: Option<&str>,
        close: Option<&str>,
        rows: &[&[&[&Node<'_>]]],
        column_lines: &[ColumnLine],
        base_indent: usize,
    ) -> std::fmt::Result {
        let child_indent = nested_indent(base_indent);
        let row_indent = nested_indent(child_indent);
        let cell_indent = nested_indent(row_indent);
        let content_indent = nested_indent(cell_indent);

        write!(self.s, "<mrow>")?;
        self.emit_fence(open, child_indent)?;
        writeln_indent!(&mut self.s, child_indent, "<mtable columnlines=\"");
        for (i, line) in column_lines.iter().enumerate() {
            if i > 0 {
                self.s.push(' ');
            }
            self.s.push_str(<&str>::from(line));
        }
        self.s.push_str("\">");
        for row in rows.iter() {
            writeln_indent!(&mut self.s, row_indent, "<mtr>");
            for cell in row.iter() {
                writeln_indent!(&mut self.s, cell_indent, "<mtd>");
                for node in cell.iter() {
                    self.emit(node, content_indent)?;
                }
                writeln_indent!(&mut self.s, cell_indent, "</mtd>");
            }
            writeln_indent!(&mut self.s, row_indent, "</mtr>");
        }
        writeln_indent!(&mut self.s, child_indent, "</mtable>");
        self.emit_fence(close, child_indent)?;
        writeln_indent!(&mut self.s, base_indent, "</mrow>");
        Ok(())
    }
}

impl Default for MathMLEmitter {
    fn default() -> Self {
        Self::new()
    }
}
