//! Concurrent decoding of several independent sources into one triple set.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Span};
use triplestore_types::{Decoder, Triple};

use crate::error::{BoxError, CodecError, CodecResult};

/// One input of a dataset decode.
pub enum DatasetSource {
    File(PathBuf),
    Reader(Box<dyn Read + Send>),
}

impl DatasetSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// File name used in error reports. Anonymous readers have none.
    pub fn name(&self) -> Option<String> {
        match self {
            Self::File(path) => Some(path.display().to_string()),
            Self::Reader(_) => None,
        }
    }

    fn open(self) -> io::Result<Box<dyn Read + Send>> {
        match self {
            Self::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            Self::Reader(reader) => Ok(reader),
        }
    }
}

impl fmt::Debug for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// Runs one decoder per source on the blocking pool and merges the results.
///
/// `factory` builds the decoder for each source, so any [`Decoder`] works
/// here, binary or N-Triples.
pub struct DatasetDecoder<F> {
    factory: Arc<F>,
    sources: Vec<DatasetSource>,
}

impl<F, D> DatasetDecoder<F>
where
    F: Fn(Box<dyn Read + Send>) -> D + Send + Sync + 'static,
    D: Decoder,
{
    pub fn new(factory: F, sources: Vec<DatasetSource>) -> Self {
        Self {
            factory: Arc::new(factory),
            sources,
        }
    }

    pub fn push(&mut self, source: DatasetSource) {
        self.sources.push(source);
    }

    /// Decode every source and concatenate the triples in arrival order.
    ///
    /// The first failing source aborts the whole call. Workers still
    /// running at that point see the `done` token and drop their results.
    pub async fn decode(self) -> CodecResult<Vec<Triple>> {
        let total = self.sources.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let done = CancellationToken::new();
        let _done_guard = done.clone().drop_guard();
        let (tx, mut rx) = mpsc::channel::<CodecResult<Vec<Triple>>>(total);

        for source in self.sources {
            let tx = tx.clone();
            let done = done.clone();
            let factory = Arc::clone(&self.factory);
            let span = Span::current();

            tokio::spawn(async move {
                let name = source.name();
                let worker = tokio::task::spawn_blocking(move || -> Result<Vec<Triple>, BoxError> {
                    let _entered = span.enter();
                    let mut decoder = factory(source.open()?);
                    Ok(decoder.decode()?)
                })
                .await;

                let result = match worker.map_err(BoxError::from).and_then(|r| r) {
                    Ok(triples) => Ok(triples),
                    Err(err) => {
                        warn!(
                            source = name.as_deref().unwrap_or("<reader>"),
                            error = %err,
                            "dataset source failed"
                        );
                        Err(match name {
                            Some(name) => CodecError::Source { name, source: err },
                            None => CodecError::Worker(err),
                        })
                    }
                };

                tokio::select! {
                    biased;
                    _ = done.cancelled() => {}
                    _ = tx.send(result) => {}
                }
            });
        }
        drop(tx);

        let mut triples = Vec::new();
        while let Some(result) = rx.recv().await {
            triples.append(&mut result?);
        }
        debug!(sources = total, count = triples.len(), "dataset decoded");
        Ok(triples)
    }
}

impl<F> fmt::Debug for DatasetDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetDecoder")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}
