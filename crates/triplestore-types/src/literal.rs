use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::xsd::XsdType;

/// A typed scalar value in canonical lexical form.
///
/// The value is always stored as a string: `"true"`/`"false"` for booleans,
/// decimal digits for integers, RFC 3339 UTC for date-times. A language tag
/// is only ever present on `xsd:string` literals.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    datatype: XsdType,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
}

impl Literal {
    /// Create a literal with an explicit datatype and lexical value.
    ///
    /// The value is taken as-is; no validation against the datatype is done.
    pub fn new(datatype: XsdType, value: impl Into<String>) -> Self {
        Self {
            datatype,
            value: value.into(),
            lang: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(XsdType::String, value)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(XsdType::Boolean, value.to_string())
    }

    pub fn integer(value: i64) -> Self {
        Self::new(XsdType::Integer, value.to_string())
    }

    /// Date-time literal, normalised to UTC.
    pub fn date_time<Tz: chrono::TimeZone>(value: &DateTime<Tz>) -> Self {
        let utc = value.with_timezone(&Utc);
        Self::new(
            XsdType::DateTime,
            utc.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }

    /// String literal carrying a language tag (`"chat"@fr`).
    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            datatype: XsdType::String,
            value: value.into(),
            lang: Some(lang.into()),
        }
    }

    pub fn datatype(&self) -> &XsdType {
        &self.datatype
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Identity-key fragment: `"value"^^tag` or `"value"@lang`.
    pub fn key(&self) -> String {
        match &self.lang {
            Some(lang) => format!("\"{}\"@{}", self.value, lang),
            None => format!("\"{}\"^^{}", self.value, self.datatype.tag()),
        }
    }

    fn expect_type(&self, expected: XsdType) -> TypeResult<()> {
        if self.datatype != expected {
            return Err(TypeError::TypeMismatch {
                expected,
                actual: self.datatype.clone(),
            });
        }
        Ok(())
    }

    fn invalid(&self, reason: impl ToString) -> TypeError {
        TypeError::InvalidValue {
            datatype: self.datatype.clone(),
            value: self.value.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn as_str(&self) -> TypeResult<&str> {
        self.expect_type(XsdType::String)?;
        Ok(&self.value)
    }

    pub fn as_boolean(&self) -> TypeResult<bool> {
        self.expect_type(XsdType::Boolean)?;
        self.value.parse().map_err(|e| self.invalid(e))
    }

    pub fn as_integer(&self) -> TypeResult<i64> {
        self.expect_type(XsdType::Integer)?;
        self.value.parse().map_err(|e| self.invalid(e))
    }

    pub fn as_date_time(&self) -> TypeResult<DateTime<Utc>> {
        self.expect_type(XsdType::DateTime)?;
        DateTime::parse_from_rfc3339(&self.value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| self.invalid(e))
    }

    /// Interpret the literal according to its declared datatype.
    pub fn to_native(&self) -> TypeResult<NativeValue> {
        match &self.datatype {
            XsdType::String => Ok(NativeValue::String(self.value.clone())),
            XsdType::Boolean => self.as_boolean().map(NativeValue::Boolean),
            XsdType::Integer => self.as_integer().map(NativeValue::Integer),
            XsdType::DateTime => self.as_date_time().map(NativeValue::DateTime),
            XsdType::Other(tag) => Err(TypeError::UnsupportedLiteral(tag.clone())),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Literal({})", self.key())
    }
}

/// A literal decoded into its native Rust value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    DateTime(DateTime<Utc>),
}

/// Conversion of a native value into a typed literal.
pub trait ToLiteral {
    fn to_literal(&self) -> Literal;
}

impl ToLiteral for str {
    fn to_literal(&self) -> Literal {
        Literal::string(self)
    }
}

impl ToLiteral for String {
    fn to_literal(&self) -> Literal {
        Literal::string(self.as_str())
    }
}

impl ToLiteral for bool {
    fn to_literal(&self) -> Literal {
        Literal::boolean(*self)
    }
}

macro_rules! integer_to_literal {
    ($($ty:ty),*) => {
        $(
            impl ToLiteral for $ty {
                fn to_literal(&self) -> Literal {
                    Literal::new(XsdType::Integer, self.to_string())
                }
            }
        )*
    };
}

integer_to_literal!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToLiteral for DateTime<Utc> {
    fn to_literal(&self) -> Literal {
        Literal::date_time(self)
    }
}

impl ToLiteral for DateTime<FixedOffset> {
    fn to_literal(&self) -> Literal {
        Literal::date_time(self)
    }
}

impl<T: ToLiteral + ?Sized> ToLiteral for &T {
    fn to_literal(&self) -> Literal {
        (**self).to_literal()
    }
}

impl<T: ToLiteral + ?Sized> ToLiteral for Box<T> {
    fn to_literal(&self) -> Literal {
        (**self).to_literal()
    }
}

impl<T: ToLiteral + ?Sized> ToLiteral for Arc<T> {
    fn to_literal(&self) -> Literal {
        (**self).to_literal()
    }
}
