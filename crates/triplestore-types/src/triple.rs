use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::TypeResult;
use crate::literal::ToLiteral;
use crate::object::Object;

/// Canonical identity of a triple: `<subject><predicate>` followed by the
/// object key.
///
/// Two triples are equal iff their keys are equal. Raw field values are not
/// escaped, so a subject containing `><` can in principle collide with a
/// different split of the same characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripleKey(String);

impl TripleKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subject–predicate–object fact.
#[derive(Clone, Serialize, Deserialize)]
pub struct Triple {
    subject: String,
    predicate: String,
    object: Object,
}

impl Triple {
    /// Create a triple from its three parts.
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Start building a triple from its subject and predicate.
    ///
    /// ```
    /// use triplestore_types::Triple;
    ///
    /// let t = Triple::build("one", "two").integer_literal(42);
    /// assert_eq!(t.object().parse_integer().unwrap(), 42);
    /// ```
    pub fn build(subject: impl Into<String>, predicate: impl Into<String>) -> TripleBuilder {
        TripleBuilder {
            subject: subject.into(),
            predicate: predicate.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Canonical identity of the triple. Equal keys mean equal triples.
    pub fn key(&self) -> TripleKey {
        TripleKey(format!(
            "<{}><{}>{}",
            self.subject,
            self.predicate,
            self.object.key()
        ))
    }

    /// Split the triple into subject, predicate and object.
    pub fn into_parts(self) -> (String, String, Object) {
        (self.subject, self.predicate, self.object)
    }
}

impl PartialEq for Triple {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Triple {}

impl Hash for Triple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triple({})", self.key())
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().as_str())
    }
}

/// Builder returned by [`Triple::build`]; each terminal method picks the
/// object variant.
#[derive(Clone, Debug)]
pub struct TripleBuilder {
    subject: String,
    predicate: String,
}

impl TripleBuilder {
    pub fn object(self, object: Object) -> Triple {
        Triple {
            subject: self.subject,
            predicate: self.predicate,
            object,
        }
    }

    pub fn resource(self, id: impl Into<String>) -> Triple {
        self.object(Object::resource(id))
    }

    pub fn blank_node(self, label: impl AsRef<str>) -> Triple {
        self.object(Object::blank_node(label))
    }

    pub fn string_literal(self, value: impl Into<String>) -> Triple {
        self.object(Object::string(value))
    }

    pub fn boolean_literal(self, value: bool) -> Triple {
        self.object(Object::boolean(value))
    }

    pub fn integer_literal(self, value: i64) -> Triple {
        self.object(Object::integer(value))
    }

    pub fn date_time_literal<Tz: chrono::TimeZone>(self, value: &DateTime<Tz>) -> Triple {
        self.object(Object::date_time(value))
    }

    pub fn lang_literal(self, value: impl Into<String>, lang: impl Into<String>) -> Triple {
        self.object(Object::lang_string(value, lang))
    }

    pub fn literal_from<T: ToLiteral + ?Sized>(self, value: &T) -> Triple {
        self.object(Object::literal_from(value))
    }

    /// Literal object from a runtime-typed value; fails on unsupported types.
    pub fn literal_from_any(self, value: &dyn std::any::Any) -> TypeResult<Triple> {
        Ok(self.object(Object::from_any(value)?))
    }
}
