//! Channel-fed binary encoding and decoding on the tokio runtime.
//!
//! Both directions take a [`CancellationToken`]. Every await point selects
//! on it, so a cancelled operation finishes after at most one pending read,
//! write or channel operation.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use triplestore_types::Triple;

use crate::error::{CodecError, CodecResult};
use crate::wire::{
    encode_record, into_string, object_fields, object_from_parts, unexpected_eof, Field,
    WireConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    /// Capacity of the decoder's output channel.
    pub channel_capacity: usize,
    pub wire: WireConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            wire: WireConfig::default(),
        }
    }
}

/// Writes triples to an async sink as they arrive on a channel.
#[derive(Debug)]
pub struct BinaryStreamEncoder<W> {
    writer: W,
    config: WireConfig,
}

impl<W: AsyncWrite + Unpin> BinaryStreamEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, WireConfig::default())
    }

    pub fn with_config(writer: W, config: WireConfig) -> Self {
        Self { writer, config }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encode until `triples` closes or `cancel` fires.
    ///
    /// Cancellation is not an error. A missing channel is an empty stream.
    /// The writer is flushed only when the channel closes. After a cancel,
    /// records already written may still sit in a buffered writer, and the
    /// last one may be partial if the cancel interrupted its write; flush
    /// the writer from [`into_inner`](Self::into_inner) to keep them.
    pub async fn encode(
        &mut self,
        cancel: &CancellationToken,
        triples: Option<mpsc::Receiver<Triple>>,
    ) -> CodecResult<()> {
        let Some(mut triples) = triples else {
            return Ok(());
        };

        let mut buf = BytesMut::new();
        let mut count = 0usize;
        loop {
            let triple = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(count, "stream encode cancelled");
                    return Ok(());
                }
                next = triples.recv() => match next {
                    Some(triple) => triple,
                    None => break,
                },
            };

            buf.clear();
            encode_record(&triple, &self.config, &mut buf)?;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(count, "stream encode cancelled");
                    return Ok(());
                }
                written = self.writer.write_all(&buf) => written?,
            }
            count += 1;
        }

        self.writer.flush().await?;
        debug!(count, "stream encode finished");
        Ok(())
    }
}

/// Decodes records from an async source on a background task.
#[derive(Debug)]
pub struct BinaryStreamDecoder<R> {
    reader: R,
    config: StreamConfig,
}

impl<R> BinaryStreamDecoder<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, StreamConfig::default())
    }

    pub fn with_config(reader: R, config: StreamConfig) -> Self {
        Self { reader, config }
    }

    /// Spawn the decoding task and return its output channel.
    ///
    /// The channel yields triples in record order. A decode error is sent
    /// as the last item. The channel closes at end of input, after an
    /// error, or once `cancel` fires.
    pub fn decode(self, cancel: CancellationToken) -> mpsc::Receiver<CodecResult<Triple>> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let wire = self.config.wire;
        let mut reader = self.reader;

        tokio::spawn(async move {
            let mut count = 0usize;
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = read_record(&mut reader, &wire) => next,
                };
                let (item, last) = match next {
                    Ok(None) => break,
                    Ok(Some(triple)) => (Ok(triple), false),
                    Err(e) => (Err(e), true),
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sent = tx.send(item) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
                if last {
                    break;
                }
                count += 1;
            }
            debug!(count, cancelled = cancel.is_cancelled(), "stream decode finished");
        });

        rx
    }
}

/// Async counterpart of the blocking record reader.
async fn read_record<R: AsyncRead + Unpin>(
    reader: &mut R,
    config: &WireConfig,
) -> CodecResult<Option<Triple>> {
    let Some(subject) = read_string(reader, config, Field::Subject, true).await? else {
        return Ok(None);
    };
    let predicate = require_string(reader, config, Field::Predicate).await?;

    let tag = reader.read_u8().await.map_err(|source| CodecError::Field {
        field: Field::ObjectTag,
        source,
    })?;
    let fields = object_fields(tag).ok_or(CodecError::UnknownObjectTag(tag))?;

    let first = require_string(reader, config, fields[0]).await?;
    let second = match fields.get(1) {
        Some(field) => require_string(reader, config, *field).await?,
        None => String::new(),
    };

    Ok(Some(Triple::new(
        subject,
        predicate,
        object_from_parts(tag, first, second),
    )))
}

async fn require_string<R: AsyncRead + Unpin>(
    reader: &mut R,
    config: &WireConfig,
    field: Field,
) -> CodecResult<String> {
    read_string(reader, config, field, false)
        .await?
        .ok_or_else(|| unexpected_eof(field))
}

async fn read_string<R: AsyncRead + Unpin>(
    reader: &mut R,
    config: &WireConfig,
    field: Field,
    allow_eof: bool,
) -> CodecResult<Option<String>> {
    let width = config.width.bytes();
    let mut prefix = [0u8; 4];

    let first = reader
        .read(&mut prefix[..1])
        .await
        .map_err(|source| CodecError::Field { field, source })?;
    if first == 0 {
        return if allow_eof {
            Ok(None)
        } else {
            Err(unexpected_eof(field))
        };
    }
    reader
        .read_exact(&mut prefix[1..width])
        .await
        .map_err(|source| CodecError::Field { field, source })?;

    let len = config.width.decode(&prefix[..width]);
    let mut data = Vec::new();
    (&mut *reader)
        .take(len as u64)
        .read_to_end(&mut data)
        .await
        .map_err(|source| CodecError::Field { field, source })?;
    if data.len() < len {
        return Err(unexpected_eof(field));
    }
    into_string(data, field).map(Some)
}
