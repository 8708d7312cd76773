//! Mapping of plain Rust structs onto triples.
//!
//! A struct describes itself through [`Record::fields`], an explicit table
//! of `(predicate, value)` entries. The [`record!`](crate::record!) macro
//! writes that table for the common case.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

use crate::object::{Object, BLANK_NODE_PREFIX};
use crate::triple::Triple;

/// A type that can be flattened into triples.
pub trait Record {
    fn fields(&self) -> Vec<Field<'_>>;
}

/// One entry of a record's field table.
pub struct Field<'a> {
    pub predicate: String,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn value(predicate: impl Into<String>, value: &'a dyn Any) -> Self {
        Self {
            predicate: predicate.into(),
            value: FieldValue::Value(value),
        }
    }

    pub fn embedded(
        predicate: impl Into<String>,
        record: &'a dyn Record,
        subject: EmbedSubject,
    ) -> Self {
        Self {
            predicate: predicate.into(),
            value: FieldValue::Embedded(record, subject),
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.value {
            FieldValue::Value(_) => "value".to_string(),
            FieldValue::Embedded(_, subject) => format!("embedded({subject:?})"),
        };
        f.debug_struct("Field")
            .field("predicate", &self.predicate)
            .field("kind", &kind)
            .finish()
    }
}

pub enum FieldValue<'a> {
    /// A scalar converted with [`Object::from_any`].
    Value(&'a dyn Any),
    /// A nested record.
    Embedded(&'a dyn Record, EmbedSubject),
}

/// Which subject the triples of an embedded record hang off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbedSubject {
    /// Flatten into the parent's subject; the field predicate is unused.
    Parent,
    /// Use a fixed identifier, linked from the parent by the field predicate.
    Fixed(String),
    /// Use a new blank node, linked from the parent by the field predicate.
    Fresh,
}

/// Produce one triple per supported field of `record`, recursing into
/// embedded records.
///
/// Fields whose runtime type has no literal form are skipped, as are `None`
/// options.
pub fn triples_from_record(subject: &str, record: &dyn Record) -> Vec<Triple> {
    let mut out = Vec::new();
    collect(subject, record, &mut out);
    out
}

fn collect(subject: &str, record: &dyn Record, out: &mut Vec<Triple>) {
    for field in record.fields() {
        match field.value {
            FieldValue::Value(value) => {
                if let Some(object) = field_object(value) {
                    out.push(Triple::new(subject, field.predicate, object));
                }
            }
            FieldValue::Embedded(nested, EmbedSubject::Parent) => {
                collect(subject, nested, out);
            }
            FieldValue::Embedded(nested, EmbedSubject::Fixed(id)) => {
                out.push(Triple::new(subject, field.predicate, Object::resource(&id)));
                collect(&id, nested, out);
            }
            FieldValue::Embedded(nested, EmbedSubject::Fresh) => {
                let id = format!("{BLANK_NODE_PREFIX}{}", Uuid::now_v7().simple());
                out.push(Triple::new(subject, field.predicate, Object::resource(&id)));
                collect(&id, nested, out);
            }
        }
    }
}

fn field_object(value: &dyn Any) -> Option<Object> {
    if let Ok(object) = Object::from_any(value) {
        return Some(object);
    }

    macro_rules! optional {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(opt) = value.downcast_ref::<Option<$ty>>() {
                    return opt.as_ref().and_then(|v| Object::from_any(v).ok());
                }
            )*
        };
    }

    optional!(
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
    );

    None
}

/// Implement [`Record`] for a struct by listing its fields.
///
/// Plain fields map to a predicate; a field followed by a parenthesised
/// [`EmbedSubject`] is treated as a nested record.
///
/// ```
/// use triplestore_types::{record, triples_from_record, EmbedSubject};
///
/// struct Address { city: String }
/// struct Person { name: String, age: u32, address: Address }
///
/// record!(Address { city => "city" });
/// record!(Person {
///     name => "name",
///     age => "age",
///     address => "address" (EmbedSubject::Fixed("addr".into())),
/// });
///
/// let p = Person { name: "Ann".into(), age: 30, address: Address { city: "Oslo".into() } };
/// assert_eq!(triples_from_record("ann", &p).len(), 4);
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident => $pred:literal $(($embed:expr))?),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::record::Field<'_>> {
                ::std::vec![$($crate::record!(@field self, $field, $pred $(, $embed)?)),*]
            }
        }
    };
    (@field $self:ident, $field:ident, $pred:literal) => {
        $crate::record::Field::value($pred, &$self.$field)
    };
    (@field $self:ident, $field:ident, $pred:literal, $embed:expr) => {
        $crate::record::Field::embedded($pred, &$self.$field, $embed)
    };
}
