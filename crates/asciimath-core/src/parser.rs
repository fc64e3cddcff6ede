use std::mem;

use mathml_renderer::{
    arena::Arena,
    ast::Node,
    attribute::{Notation, Position, ScriptPlacement},
};

use crate::{
    error::{ParseError, ParseErrorKind},
    matrix,
    symbols::{Fence, Symbol},
    token::{Span, TokSpan, Token},
};

pub(super) type ParseResult<T> = Result<T, Box<ParseError>>;

/// How deeply operands may be nested before parsing is aborted.
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

/// What a parsed operand implies for the placement of scripts attached to it.
#[derive(Debug, Clone, Copy)]
enum ScriptHint {
    Attached,
    /// Large operators like `sum` take their scripts as limits.
    Limits,
    /// `obrace` and `ubrace` stack a script on the side of the brace.
    Brace(Position),
}

pub(crate) struct Parser<'arena, 'source> {
    tokens: Vec<TokSpan<'source>>,
    pos: usize,
    /// Returned by `peek` and `next` once the tokens are used up.
    end: TokSpan<'source>,
    arena: &'arena Arena,
    depth: usize,
    /// Operands read for the symbol currently being parsed.
    operands_read: usize,
}

impl<'arena, 'source> Parser<'arena, 'source>
where
    'source: 'arena, // The reference to the source string will live as long as the arena.
{
    /// Create a parser for the given tokens.
    ///
    /// Bracket balance is checked here, so that a mismatched bracket is always reported as such,
    /// no matter what else is wrong with the input.
    pub(crate) fn new(tokens: Vec<TokSpan<'source>>, arena: &'arena Arena) -> ParseResult<Self> {
        check_brackets(&tokens)?;
        let end_offset = tokens.last().map_or(0, |tokspan| tokspan.span().end());
        Ok(Parser {
            tokens,
            pos: 0,
            end: TokSpan::new(Token::Eoi, Span::zero_width(end_offset)),
            arena,
            depth: 0,
            operands_read: 0,
        })
    }

    #[inline]
    fn peek(&self) -> &TokSpan<'source> {
        self.tokens.get(self.pos).unwrap_or(&self.end)
    }

    #[inline]
    fn next(&mut self) -> TokSpan<'source> {
        let tokspan = *self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tokspan
    }

    /// Put the node onto the heap in the arena and return a reference to it.
    #[inline]
    fn commit(&self, node: Node<'arena>) -> &'arena Node<'arena> {
        self.arena.push(node)
    }

    pub(crate) fn parse(&mut self) -> ParseResult<Vec<&'arena Node<'arena>>> {
        let nodes = self.parse_sequence()?;
        let tokspan = self.next();
        if !matches!(tokspan.token(), Token::Eoi) {
            return Err(error(tokspan.span(), ParseErrorKind::UnbalancedBracket));
        }
        Ok(nodes)
    }

    /// Parse expressions until the end of the input or a closing bracket.
    ///
    /// The end token is not consumed.
    fn parse_sequence(&mut self) -> ParseResult<Vec<&'arena Node<'arena>>> {
        let mut nodes = Vec::new();
        while !matches!(
            self.peek().token(),
            Token::Eoi | Token::Symbol(Symbol::Close(_))
        ) {
            nodes.push(self.parse_fraction()?);
        }
        Ok(nodes)
    }

    /// Parse a term, and if it is followed by `/`, the denominator of a fraction.
    ///
    /// Fractions are right-associative: `a/b/c` is `a/(b/c)`.
    fn parse_fraction(&mut self) -> ParseResult<&'arena Node<'arena>> {
        let num = self.parse_term()?;
        if !matches!(self.peek().token(), Token::Symbol(Symbol::Slash)) {
            return Ok(num);
        }
        let slash = self.next();
        let den = self.nested(slash.span(), Self::parse_fraction)?;
        Ok(self.commit(Node::Fraction {
            num: self.braceless(num),
            den: self.braceless(den),
        }))
    }

    /// Run `f` one level deeper, or fail if that would exceed the nesting limit.
    fn nested<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(error(span, ParseErrorKind::RecursionLimitExceeded));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parse an operand together with the sub- and superscript that follow it.
    fn parse_term(&mut self) -> ParseResult<&'arena Node<'arena>> {
        let (base, hint) = self.parse_simple()?;
        let mut sub = None;
        let mut sup = None;
        loop {
            let slot = match self.peek().token() {
                Token::Symbol(Symbol::Underscore) => &mut sub,
                Token::Symbol(Symbol::Circumflex) => &mut sup,
                _ => break,
            };
            let modifier = self.next();
            if slot.is_some() {
                return Err(error(
                    modifier.span(),
                    ParseErrorKind::ExtraneousModifier,
                ));
            }
            *slot = Some(self.parse_simple()?.0);
        }
        if sub.is_none() && sup.is_none() {
            return Ok(base);
        }

        let placement = match hint {
            ScriptHint::Limits => ScriptPlacement::Limits,
            ScriptHint::Brace(Position::Under) if sub.is_some() => {
                ScriptPlacement::Stacked(Position::Under)
            }
            ScriptHint::Brace(Position::Over) if sup.is_some() => {
                ScriptPlacement::Stacked(Position::Over)
            }
            _ => ScriptPlacement::Attached,
        };
        // Limits don't need brackets to show what belongs to them.
        if !matches!(placement, ScriptPlacement::Attached) {
            sub = sub.map(|node| self.braceless(node));
            sup = sup.map(|node| self.braceless(node));
        }
        Ok(self.commit(Node::SubSup {
            base,
            sub,
            sup,
            placement,
        }))
    }

    fn parse_simple(&mut self) -> ParseResult<(&'arena Node<'arena>, ScriptHint)> {
        let tokspan = self.next();
        self.nested(tokspan.span(), |parser| parser.parse_token(tokspan))
    }

    /// Parse an operand of a function like `sqrt` or `frac`.
    #[inline]
    fn parse_operand(&mut self) -> ParseResult<&'arena Node<'arena>> {
        let node = self.parse_simple()?.0;
        self.operands_read += 1;
        Ok(self.braceless(node))
    }

    /// Parse the given token into a node.
    fn parse_token(
        &mut self,
        tokspan: TokSpan<'source>,
    ) -> ParseResult<(&'arena Node<'arena>, ScriptHint)> {
        let span = tokspan.span();
        let node = match tokspan.into_token() {
            Token::Eoi => return Err(error(span, ParseErrorKind::UnexpectedEndOfInput)),
            Token::Number(number) => Node::Number(number),
            Token::Letter(letter) => Node::Identifier(letter),
            Token::Text(text) => Node::Text(text),
            Token::Symbol(symbol) => {
                // Operands of nested symbols are counted separately.
                let outer = mem::take(&mut self.operands_read);
                let parsed = self.parse_symbol(symbol, span);
                let read = mem::replace(&mut self.operands_read, outer);
                debug_assert!(
                    parsed.is_err() || read == symbol.arity(),
                    "{symbol:?} read {read} operands"
                );
                return parsed;
            }
        };
        Ok((self.commit(node), ScriptHint::Attached))
    }

    /// Parse a symbol table entry, reading as many operands as its arity.
    fn parse_symbol(
        &mut self,
        symbol: Symbol,
        span: Span,
    ) -> ParseResult<(&'arena Node<'arena>, ScriptHint)> {
        let mut hint = ScriptHint::Attached;
        let node = match symbol {
            Symbol::Ident(ident) => Node::Identifier(ident),
            Symbol::Op(op) => Node::Operator(op),
            Symbol::BigOp(op) => {
                hint = ScriptHint::Limits;
                Node::Operator(op)
            }
            Symbol::Spaced(word) => Node::SpacedText(word),
            Symbol::Open(fence) => return Ok((self.parse_group(fence)?, hint)),
            Symbol::Close(_) | Symbol::Circumflex | Symbol::Underscore | Symbol::Slash => {
                return Err(error(span, ParseErrorKind::MissingOperand));
            }
            Symbol::Accent(glyph, position) => self.decorate(glyph, position)?,
            Symbol::Brace(glyph, position) => {
                hint = ScriptHint::Brace(position);
                self.decorate(glyph, position)?
            }
            Symbol::Delimit(open, close) => Node::Delimited {
                open,
                close,
                content: self.parse_operand()?,
            },
            Symbol::Sqrt => Node::Root {
                index: None,
                radicand: self.parse_operand()?,
            },
            Symbol::Cancel => Node::Enclosed {
                notation: Notation::UpDiagonalStrike,
                content: self.parse_operand()?,
            },
            Symbol::Style(variant) => Node::Styled {
                variant,
                content: self.parse_operand()?,
            },
            Symbol::Text => Node::Text(self.parse_text_argument()?),
            Symbol::Color => {
                let color = self.parse_text_argument()?;
                Node::Colored {
                    color,
                    content: self.parse_operand()?,
                }
            }
            Symbol::Frac => {
                let num = self.parse_operand()?;
                let den = self.parse_operand()?;
                Node::Fraction { num, den }
            }
            Symbol::Root => {
                let index = self.parse_row_operand()?;
                let radicand = self.parse_row_operand()?;
                Node::Root {
                    index: Some(index),
                    radicand,
                }
            }
            Symbol::Overset => {
                let over = self.parse_row_operand()?;
                let base = self.parse_row_operand()?;
                Node::Decorated {
                    base,
                    over: Some(over),
                    under: None,
                }
            }
            Symbol::Underset => {
                let under = self.parse_row_operand()?;
                let base = self.parse_row_operand()?;
                Node::Decorated {
                    base,
                    over: None,
                    under: Some(under),
                }
            }
        };
        Ok((self.commit(node), hint))
    }

    /// Put an accent or a brace over or under the next operand.
    fn decorate(&mut self, glyph: &'static str, position: Position) -> ParseResult<Node<'arena>> {
        let base = self.parse_operand()?;
        let mark = Some(self.commit(Node::Operator(glyph)));
        Ok(match position {
            Position::Over => Node::Decorated {
                base,
                over: mark,
                under: None,
            },
            Position::Under => Node::Decorated {
                base,
                over: None,
                under: mark,
            },
        })
    }

    /// The argument of `text` and `color`, which the lexer has already read verbatim.
    fn parse_text_argument(&mut self) -> ParseResult<&'source str> {
        let tokspan = self.next();
        let span = tokspan.span();
        match tokspan.into_token() {
            Token::Text(text) => {
                self.operands_read += 1;
                Ok(text)
            }
            Token::Eoi => Err(error(span, ParseErrorKind::UnexpectedEndOfInput)),
            _ => Err(error(span, ParseErrorKind::MissingOperand)),
        }
    }

    /// Parse the content of a bracket group, whose opening bracket has already been consumed.
    fn parse_group(&mut self, open: Fence) -> ParseResult<&'arena Node<'arena>> {
        let content = self.parse_sequence()?;
        let tokspan = self.next();
        let Token::Symbol(Symbol::Close(close)) = tokspan.into_token() else {
            return Err(error(tokspan.span(), ParseErrorKind::UnbalancedBracket));
        };
        let open = open.open_glyph();
        let close = close.close_glyph();
        if let Some(matrix) = matrix::try_build(self.arena, &content, open, close) {
            return Ok(matrix);
        }
        Ok(self.commit(Node::Fenced {
            open,
            close,
            content: self.arena.push_slice(&content),
        }))
    }

    /// Drop the brackets around an operand, keeping its content together in a row.
    fn braceless(&self, node: &'arena Node<'arena>) -> &'arena Node<'arena> {
        match node {
            Node::Fenced { content, .. } => self.commit(Node::Row(*content)),
            _ => node,
        }
    }

    /// Parse an operand that is always rendered as a row.
    fn parse_row_operand(&mut self) -> ParseResult<&'arena Node<'arena>> {
        let node = self.parse_simple()?.0;
        self.operands_read += 1;
        Ok(match node {
            Node::Fenced { content, .. } => self.commit(Node::Row(*content)),
            Node::Row(_) => node,
            _ => self.commit(Node::Row(self.arena.push_slice(&[node]))),
        })
    }
}

#[inline]
fn error(span: Span, kind: ParseErrorKind) -> Box<ParseError> {
    Box::new(ParseError(span.into(), kind))
}

/// Verify that every closing bracket matches the innermost open bracket, and that no bracket
/// is left open.
fn check_brackets(tokens: &[TokSpan<'_>]) -> ParseResult<()> {
    match check_closing_brackets(tokens)?.last() {
        Some((_, span)) => Err(error(*span, ParseErrorKind::UnbalancedBracket)),
        None => Ok(()),
    }
}

/// Verify that every closing bracket matches the innermost open bracket.
///
/// Returns the brackets that are still open at the end of `tokens`, innermost last.
pub(crate) fn check_closing_brackets(tokens: &[TokSpan<'_>]) -> ParseResult<Vec<(Fence, Span)>> {
    let mut stack = Vec::new();
    for tokspan in tokens {
        match tokspan.token() {
            Token::Symbol(Symbol::Open(fence)) => stack.push((*fence, tokspan.span())),
            Token::Symbol(Symbol::Close(close)) => match stack.pop() {
                Some((open, _)) if open.is_closed_by(*close) => {}
                _ => return Err(error(tokspan.span(), ParseErrorKind::UnbalancedBracket)),
            },
            _ => {}
        }
    }
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use mathml_renderer::ast::MathMLEmitter;

    use super::*;
    use crate::lexer::Lexer;

    fn render(problem: &str) -> String {
        let tokens = Lexer::new(problem).tokenize().unwrap();
        let arena = Arena::new();
        let nodes = Parser::new(tokens, &arena).unwrap().parse().unwrap();
        let mut emitter = MathMLEmitter::new();
        for node in nodes {
            emitter.emit(node, 0).unwrap();
        }
        emitter.into_inner()
    }

    fn parse_err(problem: &str) -> ParseError {
        let tokens = Lexer::new(problem).tokenize().unwrap();
        let arena = Arena::new();
        match Parser::new(tokens, &arena).and_then(|mut parser| parser.parse()) {
            Ok(_) => panic!("expected an error for {problem:?}"),
            Err(err) => *err,
        }
    }

    #[test]
    fn scripts_in_either_order() {
        assert_snapshot!(render("x_1^2"), @"<msubsup><mi>x</mi><mn>1</mn><mn>2</mn></msubsup>");
        assert_snapshot!(render("x^2_1"), @"<msubsup><mi>x</mi><mn>1</mn><mn>2</mn></msubsup>");
    }

    #[test]
    fn attached_scripts_keep_brackets() {
        assert_snapshot!(render("e^(i pi)"), @"<msup><mi>e</mi><mrow><mo>(</mo><mi>i</mi><mi>&#x3C0;</mi><mo>)</mo></mrow></msup>");
    }

    #[test]
    fn limits_drop_brackets() {
        assert_snapshot!(render("sum_(i=1)^n"), @"<munderover><mo>&#x2211;</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow><mi>n</mi></munderover>");
    }

    #[test]
    fn fraction_takes_adjacent_terms() {
        assert_snapshot!(render("a+b/c"), @"<mi>a</mi><mo>+</mo><mfrac><mi>b</mi><mi>c</mi></mfrac>");
    }

    #[test]
    fn fraction_is_right_associative() {
        assert_snapshot!(render("a/b/c"), @"<mfrac><mi>a</mi><mfrac><mi>b</mi><mi>c</mi></mfrac></mfrac>");
    }

    #[test]
    fn fraction_of_scripted_terms() {
        assert_snapshot!(render("x^2/y_1"), @"<mfrac><msup><mi>x</mi><mn>2</mn></msup><msub><mi>y</mi><mn>1</mn></msub></mfrac>");
    }

    #[test]
    fn frac_function() {
        assert_snapshot!(render("frac(a)(b)"), @"<mfrac><mrow><mi>a</mi></mrow><mrow><mi>b</mi></mrow></mfrac>");
    }

    #[test]
    fn sqrt_binds_to_next_simple() {
        assert_snapshot!(render("sqrt x y"), @"<msqrt><mi>x</mi></msqrt><mi>y</mi>");
    }

    #[test]
    fn root_operands_are_rows() {
        assert_snapshot!(render("root 3 x"), @"<mroot><mrow><mi>x</mi></mrow><mrow><mn>3</mn></mrow></mroot>");
    }

    #[test]
    fn overset_and_underset() {
        assert_snapshot!(render("overset(a)(=)"), @"<mover><mrow><mo>=</mo></mrow><mrow><mi>a</mi></mrow></mover>");
        assert_snapshot!(render("underset a b"), @"<munder><mrow><mi>b</mi></mrow><mrow><mi>a</mi></mrow></munder>");
    }

    #[test]
    fn accents() {
        assert_snapshot!(render("hat x"), @"<mover><mi>x</mi><mo>^</mo></mover>");
        assert_snapshot!(render("ul(ab)"), @"<munder><mrow><mi>a</mi><mi>b</mi></mrow><mo>&#x332;</mo></munder>");
    }

    #[test]
    fn delimited() {
        assert_snapshot!(render("abs(x)"), @"<mo>|</mo><mrow><mi>x</mi></mrow><mo>|</mo>");
    }

    #[test]
    fn cancel_style_and_color() {
        assert_snapshot!(render("cancel x"), @r#"<menclose notation="updiagonalstrike"><mi>x</mi></menclose>"#);
        assert_snapshot!(render("bb A"), @r#"<mstyle mathvariant="bold"><mi>A</mi></mstyle>"#);
        assert_snapshot!(render("color(red)(x)"), @r#"<mstyle mathcolor="red"><mrow><mi>x</mi></mrow></mstyle>"#);
    }

    #[test]
    fn text_function() {
        assert_snapshot!(render("text(a < b)"), @"<mtext>a &lt; b</mtext>");
    }

    #[test]
    fn spaced_words() {
        assert_snapshot!(render("x and y"), @r#"<mi>x</mi><mrow><mspace width="1ex"/><mtext>and</mtext><mspace width="1ex"/></mrow><mi>y</mi>"#);
    }

    #[test]
    fn invisible_brackets() {
        assert_snapshot!(render("{:x:}"), @"<mrow><mi>x</mi></mrow>");
    }

    #[test]
    fn unbalanced_brackets() {
        let err = parse_err("(a]");
        assert_eq!(err.0, 2..3);
        assert_eq!(err.1, ParseErrorKind::UnbalancedBracket);

        let err = parse_err("a)");
        assert_eq!(err.0, 1..2);
        assert_eq!(err.1, ParseErrorKind::UnbalancedBracket);

        let err = parse_err("((a)");
        assert_eq!(err.0, 0..1);
        assert_eq!(err.1, ParseErrorKind::UnbalancedBracket);
    }

    #[test]
    fn brackets_are_checked_first() {
        // The `^` without an operand comes first, but the bracket wins.
        let err = parse_err("^ (");
        assert_eq!(err.1, ParseErrorKind::UnbalancedBracket);
    }

    #[test]
    fn duplicate_scripts() {
        let err = parse_err("x^1^2");
        assert_eq!(err.0, 3..4);
        assert_eq!(err.1, ParseErrorKind::ExtraneousModifier);

        let err = parse_err("x_1^2_3");
        assert_eq!(err.0, 5..6);
        assert_eq!(err.1, ParseErrorKind::ExtraneousModifier);
    }

    #[test]
    fn missing_operands() {
        let err = parse_err("sqrt");
        assert_eq!(err.0, 4..4);
        assert_eq!(err.1, ParseErrorKind::UnexpectedEndOfInput);

        let err = parse_err("x^");
        assert_eq!(err.1, ParseErrorKind::UnexpectedEndOfInput);

        let err = parse_err("(sqrt)");
        assert_eq!(err.0, 5..6);
        assert_eq!(err.1, ParseErrorKind::MissingOperand);

        let err = parse_err("/2");
        assert_eq!(err.0, 0..1);
        assert_eq!(err.1, ParseErrorKind::MissingOperand);

        let err = parse_err("frac a");
        assert_eq!(err.1, ParseErrorKind::UnexpectedEndOfInput);

        let err = parse_err("text x");
        assert_eq!(err.0, 5..6);
        assert_eq!(err.1, ParseErrorKind::MissingOperand);
    }

    #[test]
    fn nesting_limit() {
        let deep = "(".repeat(MAX_NESTING_DEPTH + 1) + &")".repeat(MAX_NESTING_DEPTH + 1);
        let err = parse_err(&deep);
        assert_eq!(err.1, ParseErrorKind::RecursionLimitExceeded);

        let shallow = "(".repeat(MAX_NESTING_DEPTH - 1) + &")".repeat(MAX_NESTING_DEPTH - 1);
        let tokens = Lexer::new(&shallow).tokenize().unwrap();
        let arena = Arena::new();
        assert!(Parser::new(tokens, &arena).unwrap().parse().is_ok());
    }

    #[test]
    fn operands_follow_symbol_arity() {
        // Parsing checks the operand count of every symbol against the table in debug builds.
        for problem in [
            "hat x",
            "ubrace(a+b)_n",
            "abs x",
            "sqrt sqrt x",
            "cancel(x)",
            "bb A",
            "text(a b)",
            "color(red) x",
            "frac(sqrt x)(hat y)",
            "root 3 x",
            "overset a b",
            "underset(a)(frac 1 2)",
            "sum_a^b (c, d)",
        ] {
            render(problem);
        }
    }

    #[test]
    fn long_fraction_chain() {
        let chain = vec!["x"; 1000].join("/");
        let err = parse_err(&chain);
        assert_eq!(err.1, ParseErrorKind::RecursionLimitExceeded);
    }
}
