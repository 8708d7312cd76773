use std::io::Write;

use tracing::debug;
use triplestore_types::{is_blank_node, Encoder, Object, Triple, XsdType};

use crate::context::Context;
use crate::error::{NTriplesError, NTriplesResult};

/// Writes triples as N-Triples, one statement per line.
///
/// Literal values are written raw. A value containing a linefeed, or a `"`
/// followed by `.`, `^` or `@`, does not parse back to the same triple.
#[derive(Debug)]
pub struct NTriplesEncoder<W> {
    writer: W,
    context: Option<Context>,
}

impl<W: Write> NTriplesEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            context: None,
        }
    }

    /// Encoder that expands prefixes and base-relative identifiers and
    /// percent-encodes reserved IRI characters.
    pub fn with_context(writer: W, context: Context) -> Self {
        Self {
            writer,
            context: Some(context),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for NTriplesEncoder<W> {
    type Error = NTriplesError;

    fn encode(&mut self, triples: &[Triple]) -> NTriplesResult<()> {
        let mut line = String::new();
        for triple in triples {
            line.clear();
            write_statement(&mut line, triple, self.context.as_ref());
            self.writer.write_all(line.as_bytes())?;
        }
        self.writer.flush()?;
        debug!(count = triples.len(), "encoded n-triples");
        Ok(())
    }
}

/// Render one triple as an N-Triples statement, including the trailing
/// ` .\n`.
pub fn encode_triple(triple: &Triple, context: Option<&Context>) -> String {
    let mut out = String::new();
    write_statement(&mut out, triple, context);
    out
}

fn write_statement(out: &mut String, triple: &Triple, context: Option<&Context>) {
    write_node(out, triple.subject(), context);
    out.push(' ');
    write_node(out, triple.predicate(), context);
    out.push(' ');

    match triple.object() {
        Object::Resource(id) => write_node(out, id, context),
        Object::Literal(lit) => {
            out.push('"');
            out.push_str(lit.value());
            out.push('"');
            if let Some(lang) = lit.lang() {
                out.push('@');
                out.push_str(lang);
            } else if lit.datatype() != &XsdType::String {
                out.push_str("^^<");
                out.push_str(&lit.datatype().iri());
                out.push('>');
            }
        }
    }

    out.push_str(" .\n");
}

fn write_node(out: &mut String, id: &str, context: Option<&Context>) {
    if is_blank_node(id) {
        out.push_str(id);
        return;
    }
    out.push('<');
    match context {
        Some(ctx) => out.push_str(&ctx.resolve(id)),
        None => out.push_str(id),
    }
    out.push('>');
}
