use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Parser;
use triplestore_cli::cli::Cli;
use triplestore_cli::commands;
use triplestore_codec::{BinaryDecoder, BinaryEncoder, LengthWidth, WireConfig};
use triplestore_ntriples::{parse_str, Context, NTriplesEncoder};
use triplestore_store::{InMemoryStore, TripleStore};
use triplestore_types::{Decoder, Encoder, Triple};

const SAMPLE: &str = r#"# people
<http://example.org/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/bob> .
<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> "Alice" .
<http://example.org/bob> <http://xmlns.com/foaf/0.1/age> "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
<http://example.org/bob> <http://xmlns.com/foaf/0.1/nick> "bobby"@en .
_:anon <http://xmlns.com/foaf/0.1/knows> <http://example.org/alice> .
"#;

fn sample() -> Vec<Triple> {
    parse_str(SAMPLE).unwrap()
}

fn write_binary(dir: &Path, name: &str, triples: &[Triple]) -> PathBuf {
    let mut enc = BinaryEncoder::new(Vec::new());
    enc.encode(triples).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, enc.into_inner()).unwrap();
    path
}

async fn run(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["triplestore"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    commands::run(cli, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

// --- Library pipeline ---

#[test]
fn parse_store_snapshot_encode() {
    let triples = sample();
    assert_eq!(triples.len(), 5);

    let store = InMemoryStore::new();
    store.add(&triples);
    store.add(&triples[..2]);
    let graph = store.snapshot();
    assert_eq!(graph.count(), 5);
    assert_eq!(graph.with_subject("http://example.org/alice").len(), 2);
    assert_eq!(graph.with_predicate("http://xmlns.com/foaf/0.1/knows").len(), 2);

    let mut enc = NTriplesEncoder::new(Vec::new());
    let snapshot: Vec<Triple> = graph.triples().cloned().collect();
    enc.encode(&snapshot).unwrap();
    let text = String::from_utf8(enc.into_inner()).unwrap();

    let reparsed: HashSet<Triple> = parse_str(&text).unwrap().into_iter().collect();
    assert_eq!(reparsed, triples.into_iter().collect());
}

#[test]
fn ntriples_to_binary_and_back() {
    let triples = sample();
    let mut enc = BinaryEncoder::new(Vec::new());
    enc.encode(&triples).unwrap();
    let bytes = enc.into_inner();

    let decoded = BinaryDecoder::new(bytes.as_slice()).decode().unwrap();
    assert_eq!(decoded, triples);
    assert!(decoded[4].subject().starts_with("_:"));
}

#[test]
fn context_prefixes_output() {
    let triples = parse_str("<ex:alice> <ex:knows> <bob> .\n").unwrap();
    let context = Context::new()
        .with_prefix("ex", "http://example.org/")
        .with_base("http://base.org/");
    let mut enc = NTriplesEncoder::with_context(Vec::new(), context);
    enc.encode(&triples).unwrap();
    assert_eq!(
        String::from_utf8(enc.into_inner()).unwrap(),
        "<http://example.org/alice> <http://example.org/knows> <http://base.org/bob> .\n"
    );
}

// --- CLI ---

#[tokio::test]
async fn converts_concurrent_binary_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let triples = sample();
    let a = write_binary(dir.path(), "a.bin", &triples[..3]);
    let b = write_binary(dir.path(), "b.bin", &triples[3..]);
    let inputs = format!("{},{}", a.display(), b.display());

    let out = run(&["--in", &inputs]).await.unwrap();
    let parsed: HashSet<Triple> = parse_str(&out).unwrap().into_iter().collect();
    assert_eq!(parsed, triples.into_iter().collect());
}

#[tokio::test]
async fn sequential_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let triples = sample();
    let a = write_binary(dir.path(), "a.bin", &triples[..2]);
    let b = write_binary(dir.path(), "b.bin", &triples[2..]);

    let out = run(&[
        "--in",
        a.to_str().unwrap(),
        "--in",
        b.to_str().unwrap(),
        "--sequential",
    ])
    .await
    .unwrap();
    assert_eq!(parse_str(&out).unwrap(), triples);
}

#[tokio::test]
async fn dedup_drops_repeated_triples() {
    let dir = tempfile::tempdir().unwrap();
    let triples = sample();
    let a = write_binary(dir.path(), "a.bin", &triples);
    let b = write_binary(dir.path(), "b.bin", &triples);
    let inputs = format!("{},{}", a.display(), b.display());

    let plain = run(&["--in", &inputs]).await.unwrap();
    assert_eq!(plain.lines().count(), 10);

    let deduped = run(&["--in", &inputs, "--dedup"]).await.unwrap();
    assert_eq!(deduped.lines().count(), 5);
}

#[tokio::test]
async fn ntriples_input_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.nt");
    std::fs::write(&path, SAMPLE).unwrap();

    let out = run(&[
        "--in",
        path.to_str().unwrap(),
        "--in-format",
        "ntriples",
        "--out-format",
        "json",
    ])
    .await
    .unwrap();

    let decoded: Vec<Triple> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(decoded, sample());
}

#[tokio::test]
async fn dot_output_for_predicate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_binary(dir.path(), "in.bin", &sample());

    let out = run(&[
        "--in",
        path.to_str().unwrap(),
        "--out-format",
        "dot",
        "--predicate",
        "http://xmlns.com/foaf/0.1/knows",
    ])
    .await
    .unwrap();
    assert_eq!(
        out,
        "digraph \"http://xmlns.com/foaf/0.1/knows\" {\n  \
         \"_:anon\" -> \"http://example.org/alice\";\n  \
         \"http://example.org/alice\" -> \"http://example.org/bob\";\n}\n"
    );
}

#[tokio::test]
async fn binary_round_trip_with_narrow_width() {
    let dir = tempfile::tempdir().unwrap();
    let narrow = WireConfig::new(LengthWidth::U16);
    let mut enc = BinaryEncoder::with_config(Vec::new(), narrow);
    enc.encode(&sample()).unwrap();
    let path = dir.path().join("in.bin");
    std::fs::write(&path, enc.into_inner()).unwrap();

    let cli = Cli::try_parse_from([
        "triplestore",
        "--in",
        path.to_str().unwrap(),
        "--out-format",
        "bin",
        "--width",
        "u16",
    ])
    .unwrap();
    let mut out = Vec::new();
    commands::run(cli, &mut out).await.unwrap();

    let decoded = BinaryDecoder::with_config(out.as_slice(), narrow)
        .decode()
        .unwrap();
    assert_eq!(decoded, sample());
}

#[tokio::test]
async fn context_file_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.nt");
    std::fs::write(&input, "<ex:a> <ex:p> <rel> .\n").unwrap();
    let context = dir.path().join("ctx.toml");
    std::fs::write(
        &context,
        "base = \"http://file.org/\"\n\n[prefixes]\nex = \"http://example.org/\"\n",
    )
    .unwrap();

    let out = run(&[
        "--in",
        input.to_str().unwrap(),
        "--in-format",
        "ntriples",
        "--context",
        context.to_str().unwrap(),
        "--base",
        "http://flag.org/",
    ])
    .await
    .unwrap();
    assert_eq!(
        out,
        "<http://example.org/a> <http://example.org/p> <http://flag.org/rel> .\n"
    );
}

#[tokio::test]
async fn corrupt_input_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_binary(dir.path(), "good.bin", &sample());
    let bad = dir.path().join("broken.bin");
    let mut bytes = std::fs::read(&good).unwrap();
    bytes.truncate(bytes.len() - 1);
    std::fs::write(&bad, bytes).unwrap();
    let inputs = format!("{},{}", good.display(), bad.display());

    let err = run(&["--in", &inputs]).await.unwrap_err();
    assert!(format!("{err:#}").contains("broken.bin"));
}

#[tokio::test(flavor = "current_thread")]
async fn sequential_corrupt_input_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_binary(dir.path(), "first.bin", &sample());
    let bad = dir.path().join("second.bin");
    let mut bytes = std::fs::read(&good).unwrap();
    bytes.truncate(bytes.len() - 1);
    std::fs::write(&bad, bytes).unwrap();
    let inputs = format!("{},{}", good.display(), bad.display());

    let err = run(&["--in", &inputs, "--sequential"]).await.unwrap_err();
    assert!(format!("{err:#}").contains("second.bin"));
}
