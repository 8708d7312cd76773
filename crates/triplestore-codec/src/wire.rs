//! Record layout shared by the blocking and streaming codecs.
//!
//! Every record is big-endian:
//!
//! ```text
//! [len][subject][len][predicate][tag: u8][object...]
//!
//! tag 0  resource          [len][id]
//! tag 1  typed literal     [len][datatype tag][len][value]
//! tag 2  language literal  [len][lang][len][value]
//! ```
//!
//! The width of `len` comes from [`WireConfig`] and is not recorded in the
//! stream, so both ends must agree on it.

use std::fmt;
use std::io::{self, Read};

use bytes::{BufMut, BytesMut};
use triplestore_types::{Literal, Object, Triple, XsdType};

use crate::error::{CodecError, CodecResult};

pub const TAG_RESOURCE: u8 = 0;
pub const TAG_LITERAL: u8 = 1;
pub const TAG_LANG_LITERAL: u8 = 2;

/// Record field, used to say where encoding or decoding failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Subject,
    Predicate,
    ObjectTag,
    Resource,
    Datatype,
    Language,
    Value,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::ObjectTag => "object type",
            Self::Resource => "resource",
            Self::Datatype => "literal type",
            Self::Language => "language tag",
            Self::Value => "literal value",
        };
        f.write_str(name)
    }
}

/// Size of the length prefix in front of every string field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthWidth {
    U16,
    #[default]
    U32,
}

impl LengthWidth {
    pub fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest field length the prefix can express.
    pub fn max(self) -> usize {
        match self {
            Self::U16 => u16::MAX as usize,
            Self::U32 => u32::MAX as usize,
        }
    }

    pub(crate) fn decode(self, prefix: &[u8]) -> usize {
        prefix
            .iter()
            .take(self.bytes())
            .fold(0usize, |acc, b| (acc << 8) | *b as usize)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WireConfig {
    pub width: LengthWidth,
}

impl WireConfig {
    pub fn new(width: LengthWidth) -> Self {
        Self { width }
    }
}

/// Append one encoded record to `buf`.
///
/// On error `buf` is left exactly as it was.
pub fn encode_record(triple: &Triple, config: &WireConfig, buf: &mut BytesMut) -> CodecResult<()> {
    let start = buf.len();
    let result = write_record(triple, config, buf);
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

fn write_record(triple: &Triple, config: &WireConfig, buf: &mut BytesMut) -> CodecResult<()> {
    put_field(buf, config, Field::Subject, triple.subject().as_bytes())?;
    put_field(buf, config, Field::Predicate, triple.predicate().as_bytes())?;

    match triple.object() {
        Object::Resource(id) => {
            buf.put_u8(TAG_RESOURCE);
            put_field(buf, config, Field::Resource, id.as_bytes())?;
        }
        Object::Literal(lit) => match lit.lang() {
            Some(lang) => {
                buf.put_u8(TAG_LANG_LITERAL);
                put_field(buf, config, Field::Language, lang.as_bytes())?;
                put_field(buf, config, Field::Value, lit.value().as_bytes())?;
            }
            None => {
                buf.put_u8(TAG_LITERAL);
                put_field(buf, config, Field::Datatype, lit.datatype().tag().as_bytes())?;
                put_field(buf, config, Field::Value, lit.value().as_bytes())?;
            }
        },
    }
    Ok(())
}

fn put_field(buf: &mut BytesMut, config: &WireConfig, field: Field, data: &[u8]) -> CodecResult<()> {
    let max = config.width.max();
    if data.len() > max {
        return Err(CodecError::TooLarge {
            field,
            size: data.len(),
            max,
        });
    }
    match config.width {
        LengthWidth::U16 => buf.put_u16(data.len() as u16),
        LengthWidth::U32 => buf.put_u32(data.len() as u32),
    }
    buf.put_slice(data);
    Ok(())
}

pub(crate) fn into_string(bytes: Vec<u8>, field: Field) -> CodecResult<String> {
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { field })
}

pub(crate) fn unexpected_eof(field: Field) -> CodecError {
    CodecError::Field {
        field,
        source: io::Error::new(io::ErrorKind::UnexpectedEof, "stream ended mid-record"),
    }
}

/// Build the object from its tag and the two fields that follow it.
///
/// `second` is unused for resources.
pub(crate) fn object_from_parts(tag: u8, first: String, second: String) -> Object {
    match tag {
        TAG_RESOURCE => Object::Resource(first),
        TAG_LANG_LITERAL => Object::lang_string(second, first),
        _ => Literal::new(XsdType::from_tag(&first), second).into(),
    }
}

const RESOURCE_FIELDS: &[Field] = &[Field::Resource];
const LITERAL_FIELDS: &[Field] = &[Field::Datatype, Field::Value];
const LANG_LITERAL_FIELDS: &[Field] = &[Field::Language, Field::Value];

/// Fields following `tag`, or `None` for an unknown tag.
pub(crate) fn object_fields(tag: u8) -> Option<&'static [Field]> {
    match tag {
        TAG_RESOURCE => Some(RESOURCE_FIELDS),
        TAG_LITERAL => Some(LITERAL_FIELDS),
        TAG_LANG_LITERAL => Some(LANG_LITERAL_FIELDS),
        _ => None,
    }
}

/// Blocking reader for one record at a time.
pub(crate) struct RecordReader<'a, R> {
    reader: &'a mut R,
    config: WireConfig,
}

impl<'a, R: Read> RecordReader<'a, R> {
    pub(crate) fn new(reader: &'a mut R, config: WireConfig) -> Self {
        Self { reader, config }
    }

    /// Read the next record; `Ok(None)` on a clean end of input.
    pub(crate) fn read_next(&mut self) -> CodecResult<Option<Triple>> {
        let Some(subject) = self.read_string(Field::Subject, true)? else {
            return Ok(None);
        };
        let predicate = self.require_string(Field::Predicate)?;

        let mut tag = [0u8; 1];
        self.reader
            .read_exact(&mut tag)
            .map_err(|source| CodecError::Field {
                field: Field::ObjectTag,
                source,
            })?;
        let tag = tag[0];
        let fields = object_fields(tag).ok_or(CodecError::UnknownObjectTag(tag))?;

        let first = self.require_string(fields[0])?;
        let second = match fields.get(1) {
            Some(field) => self.require_string(*field)?,
            None => String::new(),
        };

        Ok(Some(Triple::new(
            subject,
            predicate,
            object_from_parts(tag, first, second),
        )))
    }

    fn require_string(&mut self, field: Field) -> CodecResult<String> {
        self.read_string(field, false)?
            .ok_or_else(|| unexpected_eof(field))
    }

    /// `allow_eof` lets a clean end of input before the first prefix byte
    /// through as `None`.
    fn read_string(&mut self, field: Field, allow_eof: bool) -> CodecResult<Option<String>> {
        let width = self.config.width.bytes();
        let mut prefix = [0u8; 4];

        let first = read_some(self.reader, &mut prefix[..1])
            .map_err(|source| CodecError::Field { field, source })?;
        if first == 0 {
            return if allow_eof {
                Ok(None)
            } else {
                Err(unexpected_eof(field))
            };
        }
        self.reader
            .read_exact(&mut prefix[1..width])
            .map_err(|source| CodecError::Field { field, source })?;

        let len = self.config.width.decode(&prefix[..width]);
        let mut data = Vec::new();
        (&mut *self.reader)
            .take(len as u64)
            .read_to_end(&mut data)
            .map_err(|source| CodecError::Field { field, source })?;
        if data.len() < len {
            return Err(unexpected_eof(field));
        }
        into_string(data, field).map(Some)
    }
}

/// `Read::read`, retrying on `Interrupted`.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(triple: &Triple, config: WireConfig) -> CodecResult<BytesMut> {
        let mut buf = BytesMut::new();
        encode_record(triple, &config, &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn resource_layout() {
        let triple = Triple::build("s", "p").resource("o");
        let buf = encode(&triple, WireConfig::new(LengthWidth::U16)).unwrap();
        assert_eq!(
            &buf[..],
            &[0, 1, b's', 0, 1, b'p', TAG_RESOURCE, 0, 1, b'o'][..]
        );
    }

    #[test]
    fn literal_layout_uses_type_tag_string() {
        let triple = Triple::build("s", "p").integer_literal(7);
        let buf = encode(&triple, WireConfig::default()).unwrap();
        let mut expected = vec![0, 0, 0, 1, b's', 0, 0, 0, 1, b'p', TAG_LITERAL, 0, 0, 0, 11];
        expected.extend_from_slice(b"xsd:integer");
        expected.extend_from_slice(&[0, 0, 0, 1, b'7']);
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn lang_literal_layout() {
        let triple = Triple::build("s", "p").lang_literal("chat", "fr");
        let buf = encode(&triple, WireConfig::new(LengthWidth::U16)).unwrap();
        let mut expected = vec![0, 1, b's', 0, 1, b'p', TAG_LANG_LITERAL, 0, 2, b'f', b'r', 0, 4];
        expected.extend_from_slice(b"chat");
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn oversized_field_leaves_buffer_untouched() {
        let config = WireConfig::new(LengthWidth::U16);
        let mut buf = BytesMut::new();
        encode_record(&Triple::build("a", "b").resource("c"), &config, &mut buf).unwrap();
        let before = buf.clone();

        let big = "x".repeat(65_540);
        let err = encode_record(&Triple::build("s", &big).resource("o"), &config, &mut buf)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::TooLarge {
                field: Field::Predicate,
                size: 65_540,
                max: 65_535
            }
        ));
        assert_eq!(buf, before);
    }

    #[test]
    fn length_width_bounds() {
        assert_eq!(LengthWidth::U16.max(), 65_535);
        assert_eq!(LengthWidth::U32.max(), 4_294_967_295);
        assert_eq!(LengthWidth::default(), LengthWidth::U32);
        assert_eq!(LengthWidth::U32.decode(&[0, 1, 0, 4]), 65_540);
    }

    #[test]
    fn reader_round_trip_and_clean_eof() {
        let config = WireConfig::default();
        let mut buf = BytesMut::new();
        let triples = vec![
            Triple::build("s", "p").resource("o"),
            Triple::build("s", "p").lang_literal("hi", "en"),
        ];
        for t in &triples {
            encode_record(t, &config, &mut buf).unwrap();
        }

        let mut input = &buf[..];
        let mut reader = RecordReader::new(&mut input, config);
        assert_eq!(reader.read_next().unwrap(), Some(triples[0].clone()));
        assert_eq!(reader.read_next().unwrap(), Some(triples[1].clone()));
        assert_eq!(reader.read_next().unwrap(), None);
    }

    #[test]
    fn partial_subject_length_is_an_error() {
        let mut input: &[u8] = &[0, 0];
        let err = RecordReader::new(&mut input, WireConfig::default())
            .read_next()
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Field {
                field: Field::Subject,
                ..
            }
        ));
    }

    #[test]
    fn unknown_tag() {
        let mut input: &[u8] = &[0, 1, b's', 0, 1, b'p', 9];
        let err = RecordReader::new(&mut input, WireConfig::new(LengthWidth::U16))
            .read_next()
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownObjectTag(9)));
    }

    #[test]
    fn invalid_utf8_names_field() {
        let mut input: &[u8] = &[0, 1, b's', 0, 1, 0xff];
        let err = RecordReader::new(&mut input, WireConfig::new(LengthWidth::U16))
            .read_next()
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidUtf8 {
                field: Field::Predicate
            }
        ));
    }
}
