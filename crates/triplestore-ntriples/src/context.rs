use std::borrow::Cow;
use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use triplestore_types::{is_blank_node, XSD_NAMESPACE};

/// Characters that may not appear raw inside an N-Triples IRI.
const IRI_RESERVED: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'<')
    .add(b'>')
    .add(b'"')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'`');

/// Prefix and base configuration applied to identifiers on output.
///
/// Loadable from TOML:
///
/// ```toml
/// base = "http://example.org/"
///
/// [prefixes]
/// foaf = "http://xmlns.com/foaf/0.1/"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub base: Option<String>,
    pub prefixes: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the usual RDF vocabulary prefixes.
    pub fn rdf() -> Self {
        Self::new()
            .with_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#")
            .with_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#")
            .with_prefix("xsd", XSD_NAMESPACE)
            .with_prefix("owl", "http://www.w3.org/2002/07/owl#")
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_prefix(mut self, name: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(name.into(), iri.into());
        self
    }

    /// Overlay `other` onto `self`; values set in `other` win.
    pub fn merge(mut self, other: Context) -> Self {
        if other.base.is_some() {
            self.base = other.base;
        }
        self.prefixes.extend(other.prefixes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.prefixes.is_empty()
    }

    /// Resolve a prefixed name or base-relative identifier to a full IRI.
    ///
    /// Blank nodes and absolute identifiers without a known prefix are
    /// returned unchanged.
    pub fn expand<'a>(&self, id: &'a str) -> Cow<'a, str> {
        if is_blank_node(id) {
            return Cow::Borrowed(id);
        }
        if let Some((prefix, local)) = id.split_once(':') {
            if let Some(iri) = self.prefixes.get(prefix) {
                return Cow::Owned(format!("{iri}{local}"));
            }
        }
        match &self.base {
            Some(base) if !has_scheme(id) => Cow::Owned(format!("{base}{id}")),
            _ => Cow::Borrowed(id),
        }
    }

    /// Expand `id` and percent-encode characters reserved in IRIs.
    pub fn resolve(&self, id: &str) -> String {
        let expanded = self.expand(id);
        if is_blank_node(&expanded) {
            return expanded.into_owned();
        }
        escape_iri(&expanded)
    }
}

/// Percent-encode reserved ASCII characters, leaving other text untouched.
pub fn escape_iri(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut buf = [0u8; 4];
    for c in id.chars() {
        if c.is_ascii() {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), IRI_RESERVED));
        } else {
            out.push(c);
        }
    }
    out
}

/// `scheme ":"` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(id: &str) -> bool {
    let Some((scheme, _)) = id.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
