use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::literal::{Literal, NativeValue, ToLiteral};

/// Prefix marking a blank-node identifier.
pub const BLANK_NODE_PREFIX: &str = "_:";

/// Returns `true` if `id` is a blank-node identifier (`_:label`).
pub fn is_blank_node(id: &str) -> bool {
    id.starts_with(BLANK_NODE_PREFIX)
}

/// The object position of a triple: a reference to another entity or a
/// typed literal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    Resource(String),
    Literal(Literal),
}

impl Object {
    /// Resource object naming `id`.
    pub fn resource(id: impl Into<String>) -> Self {
        Self::Resource(id.into())
    }

    /// Resource pointing at the blank node `_:label`.
    pub fn blank_node(label: impl AsRef<str>) -> Self {
        Self::Resource(format!("{BLANK_NODE_PREFIX}{}", label.as_ref()))
    }

    /// Plain `xsd:string` literal object.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::string(value))
    }

    /// `xsd:boolean` literal object.
    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::boolean(value))
    }

    /// `xsd:integer` literal object.
    pub fn integer(value: i64) -> Self {
        Self::Literal(Literal::integer(value))
    }

    /// `xsd:dateTime` literal object, normalised to UTC.
    pub fn date_time<Tz: chrono::TimeZone>(value: &DateTime<Tz>) -> Self {
        Self::Literal(Literal::date_time(value))
    }

    /// Language-tagged string literal object.
    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal(Literal::lang_string(value, lang))
    }

    /// Literal object from any value with a static [`ToLiteral`] conversion.
    pub fn literal_from<T: ToLiteral + ?Sized>(value: &T) -> Self {
        Self::Literal(value.to_literal())
    }

    /// Literal object from a value whose type is only known at runtime.
    ///
    /// Supports text, booleans, machine integers and UTC or fixed-offset
    /// timestamps, including timestamps behind `Box`, `Arc` or a static
    /// reference. Anything else is [`TypeError::UnsupportedLiteral`].
    pub fn from_any(value: &dyn Any) -> TypeResult<Self> {
        fn try_as<T: ToLiteral + 'static>(value: &dyn Any) -> Option<Object> {
            value.downcast_ref::<T>().map(Object::literal_from)
        }

        macro_rules! dispatch {
            ($($ty:ty),* $(,)?) => {
                $(
                    if let Some(obj) = try_as::<$ty>(value) {
                        return Ok(obj);
                    }
                )*
            };
        }

        dispatch!(
            String,
            &'static str,
            bool,
            i8,
            i16,
            i32,
            i64,
            isize,
            u8,
            u16,
            u32,
            u64,
            usize,
            DateTime<Utc>,
            DateTime<FixedOffset>,
            Box<DateTime<Utc>>,
            Arc<DateTime<Utc>>,
            &'static DateTime<Utc>,
        );

        Err(TypeError::UnsupportedLiteral(format!("{:?}", value.type_id())))
    }

    /// The resource identifier, if this object is a resource.
    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Self::Resource(id) => Some(id),
            Self::Literal(_) => None,
        }
    }

    /// The literal, if this object is a literal.
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Resource(_) => None,
        }
    }

    /// Returns `true` for literal objects.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns `true` for resources naming a blank node.
    pub fn is_blank_node(&self) -> bool {
        self.resource_id().is_some_and(is_blank_node)
    }

    /// Identity-key fragment: `<id>` for resources, the literal key otherwise.
    pub fn key(&self) -> String {
        match self {
            Self::Resource(id) => format!("<{id}>"),
            Self::Literal(lit) => lit.key(),
        }
    }

    fn require_literal(&self) -> TypeResult<&Literal> {
        self.literal().ok_or(TypeError::NotALiteral)
    }

    pub fn parse_string(&self) -> TypeResult<&str> {
        self.require_literal()?.as_str()
    }

    pub fn parse_boolean(&self) -> TypeResult<bool> {
        self.require_literal()?.as_boolean()
    }

    pub fn parse_integer(&self) -> TypeResult<i64> {
        self.require_literal()?.as_integer()
    }

    pub fn parse_date_time(&self) -> TypeResult<DateTime<Utc>> {
        self.require_literal()?.as_date_time()
    }

    /// Decode the literal into whichever native value its datatype names.
    pub fn parse_literal(&self) -> TypeResult<NativeValue> {
        self.require_literal()?.to_native()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.key())
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::XsdType;

    #[test]
    fn resource_accessors() {
        let obj = Object::resource("dbpedia:Bonobo");
        assert_eq!(obj.resource_id(), Some("dbpedia:Bonobo"));
        assert!(obj.literal().is_none());
        assert!(!obj.is_literal());
    }

    #[test]
    fn literal_accessors() {
        let obj = Object::string("rdf");
        let lit = obj.literal().expect("literal");
        assert_eq!(lit.value(), "rdf");
        assert_eq!(lit.datatype(), &XsdType::String);
        assert!(obj.resource_id().is_none());
    }

    #[test]
    fn blank_node_is_prefixed_resource() {
        let obj = Object::blank_node("anon");
        assert_eq!(obj.resource_id(), Some("_:anon"));
        assert!(obj.is_blank_node());
        assert!(!Object::resource("anon").is_blank_node());
    }

    #[test]
    fn from_any_supported_types() {
        assert_eq!(Object::from_any(&true).unwrap(), Object::boolean(true));
        assert_eq!(Object::from_any(&5i32).unwrap(), Object::integer(5));
        assert_eq!(Object::from_any(&5i64).unwrap(), Object::integer(5));
        assert_eq!(
            Object::from_any(&String::from("any")).unwrap(),
            Object::string("any")
        );
        assert_eq!(Object::from_any(&"any").unwrap(), Object::string("any"));

        let now = Utc::now();
        assert_eq!(Object::from_any(&now).unwrap(), Object::date_time(&now));
        assert_eq!(
            Object::from_any(&Box::new(now)).unwrap(),
            Object::date_time(&now)
        );
    }

    #[test]
    fn from_any_unsupported_type() {
        let err = Object::from_any(&1.5f64).unwrap_err();
        assert!(matches!(err, TypeError::UnsupportedLiteral(_)));
    }

    #[test]
    fn parse_on_resource_is_not_a_literal() {
        let obj = Object::resource("x");
        assert_eq!(obj.parse_integer(), Err(TypeError::NotALiteral));
    }

    #[test]
    fn parse_round_trips() {
        assert_eq!(Object::integer(123).parse_integer().unwrap(), 123);
        assert!(Object::boolean(true).parse_boolean().unwrap());
        assert_eq!(Object::string("rdf").parse_string().unwrap(), "rdf");

        let now = Utc::now();
        assert_eq!(Object::date_time(&now).parse_date_time().unwrap(), now);
        assert_eq!(
            Object::date_time(&now).parse_literal().unwrap(),
            NativeValue::DateTime(now)
        );
    }

    #[test]
    fn lang_string_parses_as_string() {
        let obj = Object::lang_string("chat", "fr");
        assert_eq!(obj.parse_string().unwrap(), "chat");
    }

    #[test]
    fn keys() {
        assert_eq!(Object::resource("x").key(), "<x>");
        assert_eq!(Object::boolean(false).key(), "\"false\"^^xsd:boolean");
    }

    #[test]
    fn serde_roundtrip() {
        let obj = Object::lang_string("chat", "fr");
        let json = serde_json::to_string(&obj).unwrap();
        let back: Object = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obj);
    }
}
