//! Line-oriented N-Triples parser.
//!
//! Each input line is lexed on its own. Lines that are blank or hold only
//! a comment are skipped; every other line must contain at least one
//! complete statement.

use std::io::{BufRead, BufReader, Read};

use tracing::debug;
use triplestore_types::{Decoder, Literal, Object, Triple, XsdType, BLANK_NODE_PREFIX};

use crate::error::{NTriplesError, NTriplesResult};
use crate::lexer::{Lexer, TokenKind};

/// Parser over any buffered reader.
#[derive(Debug)]
pub struct Parser<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Parse the whole input, failing on the first malformed statement.
    pub fn parse(&mut self) -> NTriplesResult<Vec<Triple>> {
        let mut triples = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| NTriplesError::Read {
                    line: self.line + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            self.line += 1;

            let content = trim_line_end(&buf);
            if is_skippable_line(content) {
                continue;
            }

            let text = Lexer::from_bytes(content, self.line)?;
            parse_statements(text, &mut triples)?;
        }

        debug!(
            triples = triples.len(),
            lines = self.line,
            "parsed n-triples input"
        );
        Ok(triples)
    }
}

/// Parse an in-memory N-Triples document.
pub fn parse_str(input: &str) -> NTriplesResult<Vec<Triple>> {
    Parser::new(input.as_bytes()).parse()
}

/// [`Decoder`] over any reader holding an N-Triples document.
#[derive(Debug)]
pub struct NTriplesDecoder<R> {
    reader: R,
}

impl<R: Read> NTriplesDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> Decoder for NTriplesDecoder<R> {
    type Error = NTriplesError;

    fn decode(&mut self) -> NTriplesResult<Vec<Triple>> {
        Parser::new(BufReader::new(&mut self.reader)).parse()
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Blank lines and lines holding only a comment.
fn is_skippable_line(line: &[u8]) -> bool {
    match line.iter().position(|b| !b.is_ascii_whitespace()) {
        None => true,
        Some(first) => line[first] == b'#',
    }
}

enum Node<'a> {
    Iri(&'a str),
    BlankNode(&'a str),
    Literal(&'a str),
}

/// Per-statement parser state, reset after every full stop.
#[derive(Default)]
struct Statement<'a> {
    count: usize,
    subject: Option<Node<'a>>,
    predicate: &'a str,
    object: Option<Node<'a>>,
    datatype: Option<&'a str>,
    lang: Option<&'a str>,
}

impl<'a> Statement<'a> {
    fn push(&mut self, node: Node<'a>, line: usize) -> NTriplesResult<()> {
        self.count += 1;
        match (self.count, node) {
            (2, Node::BlankNode(_)) => return Err(NTriplesError::BlankNodePredicate { line }),
            (1, node) => self.subject = Some(node),
            (2, Node::Iri(pred)) => self.predicate = pred,
            (3, node) => self.object = Some(node),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, line: usize) -> NTriplesResult<Triple> {
        let count = self.count;
        let (Some(subject), Some(object)) = (self.subject, self.object) else {
            return Err(NTriplesError::MissingElement { line, count });
        };

        let subject = match subject {
            Node::BlankNode(label) => format!("{BLANK_NODE_PREFIX}{label}"),
            Node::Iri(id) | Node::Literal(id) => id.to_string(),
        };

        let object = match object {
            Node::Iri(id) => Object::resource(id),
            Node::BlankNode(label) => Object::blank_node(label),
            Node::Literal(value) => match (self.datatype, self.lang) {
                (Some(datatype), _) => Literal::new(XsdType::from_tag(datatype), value).into(),
                (None, Some(lang)) => Object::lang_string(value, lang),
                (None, None) => Object::string(value),
            },
        };

        Ok(Triple::new(subject, self.predicate, object))
    }
}

/// Parse every statement on one lexed line.
fn parse_statements(mut lexer: Lexer<'_>, out: &mut Vec<Triple>) -> NTriplesResult<()> {
    let line = lexer.line();
    let mut statement = Statement::default();
    let mut emitted = 0usize;
    let mut last = "";

    loop {
        let token = lexer.next_token()?;
        match token.kind {
            TokenKind::Eof => break,
            kind if kind.is_skippable() => continue,
            TokenKind::Iri => statement.push(Node::Iri(token.text), line)?,
            TokenKind::BlankNode => statement.push(Node::BlankNode(token.text), line)?,
            TokenKind::Literal => {
                if statement.count != 2 {
                    return Err(NTriplesError::MisplacedLiteral {
                        line,
                        token: token.text.to_string(),
                        count: statement.count,
                    });
                }
                statement.push(Node::Literal(token.text), line)?;
            }
            TokenKind::LangTag => {
                if statement.count != 3 || !matches!(statement.object, Some(Node::Literal(_))) {
                    return Err(NTriplesError::MisplacedLangTag {
                        line,
                        token: token.text.to_string(),
                    });
                }
                statement.lang = Some(token.text);
            }
            TokenKind::Datatype => statement.datatype = Some(token.text),
            TokenKind::FullStop => {
                if statement.count != 3 {
                    return Err(NTriplesError::MissingElement {
                        line,
                        count: statement.count,
                    });
                }
                out.push(std::mem::take(&mut statement).finish(line)?);
                emitted += 1;
            }
            _ => continue,
        }
        last = token.text;
    }

    if statement.count > 0 {
        return Err(NTriplesError::WrongElementCount {
            line,
            token: last.to_string(),
            count: statement.count,
        });
    }
    if emitted == 0 {
        return Err(NTriplesError::NoTriple { line });
    }
    Ok(())
}
