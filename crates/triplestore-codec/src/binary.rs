use std::io::{Read, Write};

use bytes::BytesMut;
use tracing::debug;
use triplestore_types::{Decoder, Encoder, Triple};

use crate::error::{CodecError, CodecResult};
use crate::wire::{encode_record, RecordReader, WireConfig};

/// Blocking binary encoder.
///
/// Each record is assembled in memory and written with a single
/// `write_all`, so a record that fails the size check writes nothing.
#[derive(Debug)]
pub struct BinaryEncoder<W> {
    writer: W,
    config: WireConfig,
    buf: BytesMut,
}

impl<W: Write> BinaryEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, WireConfig::default())
    }

    pub fn with_config(writer: W, config: WireConfig) -> Self {
        Self {
            writer,
            config,
            buf: BytesMut::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for BinaryEncoder<W> {
    type Error = CodecError;

    fn encode(&mut self, triples: &[Triple]) -> CodecResult<()> {
        for triple in triples {
            self.buf.clear();
            encode_record(triple, &self.config, &mut self.buf)?;
            self.writer.write_all(&self.buf)?;
        }
        self.writer.flush()?;
        debug!(count = triples.len(), "encoded binary triples");
        Ok(())
    }
}

/// Blocking binary decoder; reads until end of input.
#[derive(Debug)]
pub struct BinaryDecoder<R> {
    reader: R,
    config: WireConfig,
}

impl<R: Read> BinaryDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, WireConfig::default())
    }

    pub fn with_config(reader: R, config: WireConfig) -> Self {
        Self { reader, config }
    }
}

impl<R: Read> Decoder for BinaryDecoder<R> {
    type Error = CodecError;

    fn decode(&mut self) -> CodecResult<Vec<Triple>> {
        let mut triples = Vec::new();
        let mut records = RecordReader::new(&mut self.reader, self.config);
        while let Some(triple) = records.read_next()? {
            triples.push(triple);
        }
        debug!(count = triples.len(), "decoded binary triples");
        Ok(triples)
    }
}
