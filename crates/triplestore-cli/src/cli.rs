use std::path::PathBuf;

use clap::Parser;
use triplestore_codec::LengthWidth;

#[derive(Parser, Debug)]
#[command(
    name = "triplestore",
    about = "Decode triples from binary or N-Triples files and re-encode them on stdout",
    version,
)]
pub struct Cli {
    /// Input file paths (repeatable or comma-separated)
    #[arg(long = "in", value_name = "FILE", value_delimiter = ',', required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value = "bin")]
    pub in_format: InputFormat,

    #[arg(long, default_value = "ntriples")]
    pub out_format: OutputFormat,

    /// Predicate whose edges are drawn (dot output)
    #[arg(long, required_if_eq("out_format", "dot"))]
    pub predicate: Option<String>,

    /// Decode inputs one after another instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Base IRI for relative identifiers in N-Triples output
    #[arg(long, value_name = "IRI")]
    pub base: Option<String>,

    /// Prefix mapping for N-Triples output
    #[arg(long = "prefix", value_name = "NAME=IRI", value_parser = parse_prefix)]
    pub prefixes: Vec<(String, String)>,

    /// TOML file with `base` and `[prefixes]`; flags override it
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Load into a store and emit its snapshot, dropping duplicates
    #[arg(long)]
    pub dedup: bool,

    /// Length prefix width of the binary format
    #[arg(long, default_value = "u32")]
    pub width: Width,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Bin,
    Ntriples,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Ntriples,
    Bin,
    /// One JSON object per line
    Json,
    /// Graphviz digraph of one predicate
    Dot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Width {
    U16,
    U32,
}

impl From<Width> for LengthWidth {
    fn from(width: Width) -> Self {
        match width {
            Width::U16 => LengthWidth::U16,
            Width::U32 => LengthWidth::U32,
        }
    }
}

fn parse_prefix(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, iri)) if !name.is_empty() && !iri.is_empty() => {
            Ok((name.to_owned(), iri.to_owned()))
        }
        _ => Err(format!("expected NAME=IRI, got '{s}'")),
    }
}
