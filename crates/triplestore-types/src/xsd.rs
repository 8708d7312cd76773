use std::fmt;

use serde::{Deserialize, Serialize};

/// XML Schema datatypes namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Datatype of a literal.
///
/// The four named variants are the datatypes the model can interpret. Any
/// other datatype token is kept verbatim in [`XsdType::Other`] so that it
/// survives a round trip through either wire format.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum XsdType {
    String,
    Boolean,
    Integer,
    DateTime,
    Other(String),
}

impl XsdType {
    /// Short type tag, as written in the binary format and identity keys.
    pub fn tag(&self) -> &str {
        match self {
            Self::String => "xsd:string",
            Self::Boolean => "xsd:boolean",
            Self::Integer => "xsd:integer",
            Self::DateTime => "xsd:dateTime",
            Self::Other(tag) => tag,
        }
    }

    /// Full datatype IRI, as written after `^^` in N-Triples.
    pub fn iri(&self) -> String {
        match self {
            Self::Other(tag) => tag.clone(),
            known => format!("{XSD_NAMESPACE}{}", &known.tag()[4..]),
        }
    }

    /// Resolve a short tag (`xsd:integer`) or a full IRI into a datatype.
    ///
    /// Anything unrecognised becomes [`XsdType::Other`] holding the input.
    pub fn from_tag(tag: &str) -> Self {
        let local = tag
            .strip_prefix(XSD_NAMESPACE)
            .or_else(|| tag.strip_prefix("xsd:"));
        match local {
            Some("string") => Self::String,
            Some("boolean") => Self::Boolean,
            Some("integer") => Self::Integer,
            Some("dateTime") => Self::DateTime,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// Returns `true` for the four datatypes the model can interpret.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Debug for XsdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XsdType({})", self.tag())
    }
}

impl fmt::Display for XsdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for XsdType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<XsdType> for String {
    fn from(ty: XsdType) -> Self {
        ty.tag().to_string()
    }
}
