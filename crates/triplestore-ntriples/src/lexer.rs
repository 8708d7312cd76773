//! Rune-level N-Triples scanner.
//!
//! Terminators in N-Triples are context sensitive: an IRI may contain `>`
//! and a literal may contain `"`. Each reader therefore looks past a
//! candidate terminator at the next non-blank rune before deciding whether
//! the token really ends there.

use crate::error::{NTriplesError, NTriplesResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Unknown,
    Iri,
    BlankNode,
    Eof,
    Whitespace,
    FullStop,
    Literal,
    Datatype,
    LangTag,
    Comment,
    LineFeed,
}

impl TokenKind {
    /// Kinds the parser passes over without changing statement state.
    pub fn is_skippable(self) -> bool {
        matches!(
            self,
            Self::Unknown | Self::Whitespace | Self::Comment | Self::LineFeed
        )
    }
}

/// A token together with its raw text.
///
/// The text borrows from the input. Escape sequences are not interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub const EOF: Token<'static> = Token {
        kind: TokenKind::Eof,
        text: "",
    };
    pub const WHITESPACE: Token<'static> = Token {
        kind: TokenKind::Whitespace,
        text: " ",
    };
    pub const FULL_STOP: Token<'static> = Token {
        kind: TokenKind::FullStop,
        text: ".",
    };
    pub const LINE_FEED: Token<'static> = Token {
        kind: TokenKind::LineFeed,
        text: "\n",
    };

    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    pub fn iri(text: &'a str) -> Self {
        Self::new(TokenKind::Iri, text)
    }

    pub fn blank_node(text: &'a str) -> Self {
        Self::new(TokenKind::BlankNode, text)
    }

    pub fn literal(text: &'a str) -> Self {
        Self::new(TokenKind::Literal, text)
    }

    pub fn datatype(text: &'a str) -> Self {
        Self::new(TokenKind::Datatype, text)
    }

    pub fn lang_tag(text: &'a str) -> Self {
        Self::new(TokenKind::LangTag, text)
    }

    pub fn comment(text: &'a str) -> Self {
        Self::new(TokenKind::Comment, text)
    }
}

/// Single-pass scanner over one line or a whole document.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the next rune.
    index: usize,
    /// Width of the most recently read rune; zero after end of input.
    width: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            index: 0,
            width: 0,
            line: 1,
        }
    }

    /// Lex raw bytes that start on the given 1-based line.
    ///
    /// Malformed UTF-8 is rejected up front with the line and byte offset
    /// of the first bad sequence.
    pub fn from_bytes(input: &'a [u8], line: usize) -> NTriplesResult<Self> {
        match std::str::from_utf8(input) {
            Ok(text) => Ok(Self::new(text).starting_at_line(line)),
            Err(e) => {
                let offset = e.valid_up_to();
                let newlines = input[..offset].iter().filter(|b| **b == b'\n').count();
                Err(NTriplesError::InvalidUtf8 {
                    line: line + newlines,
                    offset,
                })
            }
        }
    }

    pub fn starting_at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Current 1-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> NTriplesResult<Token<'a>> {
        let Some(current) = self.read_rune() else {
            return Ok(Token::EOF);
        };

        let token = match current {
            '<' => Token::iri(self.read_iri()),
            '_' => {
                let found = self.read_rune();
                if found != Some(':') {
                    return Err(NTriplesError::InvalidBlankNode {
                        line: self.line,
                        found,
                    });
                }
                Token::blank_node(self.read_blank_node())
            }
            ' ' => Token::WHITESPACE,
            '.' => Token::FULL_STOP,
            '\n' => Token::LINE_FEED,
            '"' => Token::literal(self.read_string_literal()),
            '@' => Token::lang_tag(self.read_blank_node()),
            '^' => return self.read_datatype(),
            '#' => Token::comment(self.read_comment()),
            _ => Token::new(TokenKind::Unknown, self.last_rune()),
        };
        Ok(token)
    }

    /// Collect every token up to, but excluding, end of input.
    pub fn tokenize(mut self) -> NTriplesResult<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn read_rune(&mut self) -> Option<char> {
        match self.input[self.index..].chars().next() {
            Some(c) => {
                self.width = c.len_utf8();
                self.index += self.width;
                if c == '\n' {
                    self.line += 1;
                }
                Some(c)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }

    /// Push back the rune returned by the last `read_rune`.
    fn unread_rune(&mut self) {
        if self.width == 0 {
            return;
        }
        self.index -= self.width;
        if self.input[self.index..].starts_with('\n') {
            self.line -= 1;
        }
        self.width = 0;
    }

    fn peek_non_blank(&self) -> Option<char> {
        self.input[self.index..]
            .chars()
            .find(|c| *c != ' ' && *c != '\t')
    }

    /// Text from `start` up to, but excluding, the last rune read.
    fn extract_from(&self, start: usize) -> &'a str {
        &self.input[start..self.index - self.width]
    }

    fn last_rune(&self) -> &'a str {
        &self.input[self.index - self.width..self.index]
    }

    /// Reads after the opening `<`. Yields `""` if no terminating `>` is found.
    fn read_iri(&mut self) -> &'a str {
        let start = self.index;
        loop {
            match self.read_rune() {
                None => return "",
                Some('>') => {
                    if matches!(
                        self.peek_non_blank(),
                        None | Some('<' | '"' | '.' | '_')
                    ) {
                        return self.extract_from(start);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Reads after the opening `"`. Yields `""` if unterminated.
    fn read_string_literal(&mut self) -> &'a str {
        let start = self.index;
        loop {
            match self.read_rune() {
                None => return "",
                Some('"') => {
                    if matches!(self.peek_non_blank(), None | Some('.' | '^' | '@')) {
                        return self.extract_from(start);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Reads a blank-node label after `_:`, or a language tag after `@`.
    ///
    /// A space or tab ends the label when the next significant rune opens
    /// an IRI or closes the statement.
    fn read_blank_node(&mut self) -> &'a str {
        let start = self.index;
        loop {
            match self.read_rune() {
                None => return "",
                Some(' ' | '\t') => {
                    if matches!(self.peek_non_blank(), None | Some('<' | '.')) {
                        return self.extract_from(start);
                    }
                }
                Some('.') => {
                    if matches!(self.peek_non_blank(), None | Some('#' | '\n')) {
                        let label = self.extract_from(start);
                        self.unread_rune();
                        return label;
                    }
                }
                Some('<') => {
                    let label = self.extract_from(start);
                    self.unread_rune();
                    return label;
                }
                Some(_) => {}
            }
        }
    }

    /// Reads after the first `^`: expects `^<iri>`.
    fn read_datatype(&mut self) -> NTriplesResult<Token<'a>> {
        for expected in ['^', '<'] {
            match self.read_rune() {
                None => return Ok(Token::EOF),
                Some(c) if c == expected => {}
                Some(found) => {
                    return Err(NTriplesError::InvalidDatatype {
                        line: self.line,
                        expected,
                        found,
                    })
                }
            }
        }
        Ok(Token::datatype(self.read_iri()))
    }

    /// Reads after `#` up to the next linefeed, which is left unread.
    fn read_comment(&mut self) -> &'a str {
        let start = self.index;
        loop {
            match self.read_rune() {
                None => return self.extract_from(start),
                Some('\n') => {
                    let text = self.extract_from(start);
                    self.unread_rune();
                    return text;
                }
                Some(_) => {}
            }
        }
    }
}
