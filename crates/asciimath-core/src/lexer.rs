use std::mem;
use std::str::CharIndices;

use crate::error::{ParseError, ParseErrorKind};
use crate::symbols::{self, Symbol};
use crate::token::{Span, TokSpan, Token};

/// Lexer
pub(crate) struct Lexer<'source> {
    input: CharIndices<'source>,
    peek: (usize, Option<char>),
    input_string: &'source str,
    input_length: usize,
    /// Set after `text` and `color`, whose bracketed argument is read verbatim.
    raw_argument: bool,
}

impl<'source> Lexer<'source> {
    pub(crate) fn new(input: &'source str) -> Self {
        let mut lexer = Lexer {
            input: input.char_indices(),
            peek: (0, None),
            input_string: input,
            input_length: input.len(),
            raw_argument: false,
        };
        lexer.read_char(); // Initialize `peek`.
        lexer
    }

    /// Lex the whole input. The last token is always `Token::Eoi`.
    #[cfg(test)]
    pub(crate) fn tokenize(self) -> Result<Vec<TokSpan<'source>>, Box<ParseError>> {
        let mut tokens = Vec::new();
        self.tokenize_into(&mut tokens)?;
        Ok(tokens)
    }

    /// Lex the whole input into `tokens`, ending with `Token::Eoi`.
    ///
    /// On error, `tokens` holds everything that was lexed before the failure.
    pub(crate) fn tokenize_into(
        mut self,
        tokens: &mut Vec<TokSpan<'source>>,
    ) -> Result<(), Box<ParseError>> {
        loop {
            let tokspan = self.next_token()?;
            let is_end = matches!(tokspan.token(), Token::Eoi);
            tokens.push(tokspan);
            if is_end {
                return Ok(());
            }
        }
    }

    /// One character progresses.
    fn read_char(&mut self) -> (usize, Option<char>) {
        mem::replace(
            &mut self.peek,
            self.input
                .next()
                .map(|(idx, ch)| (idx, Some(ch)))
                .unwrap_or((self.input_length, None)),
        )
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek.1.is_some_and(char::is_whitespace) {
            self.read_char();
        }
    }

    /// Read a run of digits with an optional fractional part.
    ///
    /// A decimal point only belongs to the number if a digit follows it.
    fn read_number(&mut self, start: usize) -> &'source str {
        while self.peek.1.is_some_and(|ch| ch.is_ascii_digit()) {
            self.read_char();
        }
        if self.peek.1 == Some('.')
            && self
                .input_string
                .as_bytes()
                .get(self.peek.0 + 1)
                .is_some_and(u8::is_ascii_digit)
        {
            self.read_char(); // Discard the decimal point.
            while self.peek.1.is_some_and(|ch| ch.is_ascii_digit()) {
                self.read_char();
            }
        }
        // We got `start` and `end` from `CharIndices`, so they are valid bounds.
        &self.input_string[start..self.peek.0]
    }

    /// Read everything up to the next `closing` character.
    ///
    /// `open_loc` is the position of the opening quote or bracket, which has already been
    /// consumed. Returns the content and the position after the closing character.
    fn read_verbatim(
        &mut self,
        open_loc: usize,
        closing: u8,
    ) -> Result<(&'source str, usize), Box<ParseError>> {
        let start = self.peek.0;
        // `closing` is ASCII, so it can't match inside a multi-byte character.
        let Some(len) = memchr::memchr(closing, &self.input_string.as_bytes()[start..]) else {
            return Err(Box::new(ParseError(
                open_loc..self.input_length,
                ParseErrorKind::UnterminatedText,
            )));
        };
        let close_loc = start + len;
        self.skip_bytes(close_loc, 1);
        Ok((&self.input_string[start..close_loc], close_loc + 1))
    }

    /// Consume the characters of a symbol spelling that is `len` bytes long.
    fn skip_bytes(&mut self, start: usize, len: usize) {
        while self.peek.0 < start + len && self.peek.1.is_some() {
            self.read_char();
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<TokSpan<'source>, Box<ParseError>> {
        self.skip_whitespace();

        if mem::take(&mut self.raw_argument) {
            let closing = match self.peek.1 {
                Some('(') => Some(b')'),
                Some('[') => Some(b']'),
                Some('{') => Some(b'}'),
                _ => None,
            };
            if let Some(closing) = closing {
                let (loc, _) = self.read_char();
                let (text, end) = self.read_verbatim(loc, closing)?;
                return Ok(TokSpan::new(Token::Text(text), Span::new(loc, end)));
            }
        }

        let (loc, Some(ch)) = self.peek else {
            return Ok(TokSpan::new(
                Token::Eoi,
                Span::zero_width(self.input_length),
            ));
        };

        if ch == '"' {
            self.read_char();
            let (text, end) = self.read_verbatim(loc, b'"')?;
            return Ok(TokSpan::new(Token::Text(text), Span::new(loc, end)));
        }

        if ch.is_ascii_digit() {
            let number = self.read_number(loc);
            return Ok(TokSpan::new(
                Token::Number(number),
                Span::new(loc, self.peek.0),
            ));
        }

        if let Some((symbol, len)) = symbols::longest_match(&self.input_string[loc..]) {
            self.skip_bytes(loc, len);
            if matches!(symbol, Symbol::Text | Symbol::Color) {
                self.raw_argument = true;
            }
            return Ok(TokSpan::new(Token::Symbol(symbol), Span::new(loc, loc + len)));
        }

        self.read_char();
        let end = loc + ch.len_utf8();
        Ok(TokSpan::new(
            Token::Letter(&self.input_string[loc..end]),
            Span::new(loc, end),
        ))
    }
}
