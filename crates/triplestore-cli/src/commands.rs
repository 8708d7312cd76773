use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use colored::Colorize;
use tracing::{debug, info};
use triplestore_codec::{BinaryDecoder, BinaryEncoder, DatasetDecoder, DatasetSource, WireConfig};
use triplestore_ntriples::{Context, NTriplesDecoder, NTriplesEncoder};
use triplestore_store::{dot, InMemoryStore, TripleStore};
use triplestore_types::{Decoder, Encoder, Triple};

use crate::cli::{Cli, InputFormat, OutputFormat};

/// What a conversion did, reported on stderr with `--verbose`.
#[derive(Debug)]
pub struct Summary {
    pub inputs: usize,
    pub decoded: usize,
    pub written: usize,
    pub elapsed: Duration,
}

impl Summary {
    pub fn print(&self) {
        eprintln!(
            "{} {} triples from {} input(s), {} written in {:.2?}",
            "✓".green().bold(),
            self.decoded.to_string().bold(),
            self.inputs,
            self.written.to_string().bold(),
            self.elapsed,
        );
    }
}

/// Decode every input, optionally deduplicate, and encode to `out`.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<Summary> {
    let started = Instant::now();
    let wire = WireConfig::new(cli.width.into());

    let mut triples = match cli.in_format {
        InputFormat::Bin => {
            decode_inputs(&cli.inputs, cli.sequential, move |r| {
                BinaryDecoder::with_config(r, wire)
            })
            .await?
        }
        InputFormat::Ntriples => {
            decode_inputs(&cli.inputs, cli.sequential, NTriplesDecoder::new).await?
        }
    };
    let decoded = triples.len();
    info!(inputs = cli.inputs.len(), triples = decoded, "inputs decoded");

    if cli.dedup {
        let store = InMemoryStore::new();
        store.add(&triples);
        triples = store.snapshot().triples().cloned().collect();
        debug!(before = decoded, after = triples.len(), "deduplicated");
    }

    match cli.out_format {
        OutputFormat::Ntriples => {
            let context = load_context(&cli)?;
            let mut encoder = if context.is_empty() {
                NTriplesEncoder::new(&mut *out)
            } else {
                NTriplesEncoder::with_context(&mut *out, context)
            };
            encoder.encode(&triples).context("write n-triples")?;
        }
        OutputFormat::Bin => {
            BinaryEncoder::with_config(&mut *out, wire)
                .encode(&triples)
                .context("write binary")?;
        }
        OutputFormat::Json => {
            for triple in &triples {
                serde_json::to_writer(&mut *out, triple).context("write json")?;
                writeln!(out)?;
            }
            out.flush()?;
        }
        OutputFormat::Dot => {
            let predicate = cli
                .predicate
                .as_deref()
                .context("--predicate is required for dot output")?;
            dot::write_dot(out, predicate, &triples).context("write dot")?;
        }
    }

    Ok(Summary {
        inputs: cli.inputs.len(),
        decoded,
        written: triples.len(),
        elapsed: started.elapsed(),
    })
}

async fn decode_inputs<F, D>(
    inputs: &[PathBuf],
    sequential: bool,
    factory: F,
) -> anyhow::Result<Vec<Triple>>
where
    F: Fn(Box<dyn Read + Send>) -> D + Send + Sync + 'static,
    D: Decoder,
{
    if !sequential {
        let sources = inputs.iter().cloned().map(DatasetSource::file).collect();
        return Ok(DatasetDecoder::new(factory, sources).decode().await?);
    }

    let inputs = inputs.to_vec();
    tokio::task::spawn_blocking(move || decode_in_order(&inputs, &factory))
        .await
        .context("sequential decode worker")?
}

/// Decode `inputs` one after another on the calling thread.
fn decode_in_order<F, D>(inputs: &[PathBuf], factory: &F) -> anyhow::Result<Vec<Triple>>
where
    F: Fn(Box<dyn Read + Send>) -> D,
    D: Decoder,
{
    let mut triples = Vec::new();
    for path in inputs {
        let file = File::open(path)
            .with_context(|| format!("open input file '{}'", path.display()))?;
        let mut decoder = factory(Box::new(BufReader::new(file)));
        let mut decoded = decoder
            .decode()
            .with_context(|| format!("decode '{}'", path.display()))?;
        debug!(input = %path.display(), triples = decoded.len(), "input decoded");
        triples.append(&mut decoded);
    }
    Ok(triples)
}

/// Context file first, then `--base` and `--prefix` on top.
fn load_context(cli: &Cli) -> anyhow::Result<Context> {
    let mut context = match &cli.context {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read context file '{}'", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parse context file '{}'", path.display()))?
        }
        None => Context::new(),
    };

    let mut flags = Context::new();
    if let Some(base) = &cli.base {
        flags = flags.with_base(base.clone());
    }
    for (name, iri) in &cli.prefixes {
        flags = flags.with_prefix(name.clone(), iri.clone());
    }
    context = context.merge(flags);
    Ok(context)
}
