//! Binary wire format for triples.
//!
//! Records are length-prefixed and carry no header, see [`wire`] for the
//! layout.
//!
//! # Key Types
//!
//! - [`BinaryEncoder`] / [`BinaryDecoder`] -- blocking codec over `Write`/`Read`
//! - [`BinaryStreamEncoder`] / [`BinaryStreamDecoder`] -- channel-fed tokio
//!   variants with cancellation
//! - [`DatasetDecoder`] -- fans any [`Decoder`](triplestore_types::Decoder)
//!   out over several sources
//! - [`WireConfig`] -- length prefix width shared by both ends

pub mod binary;
pub mod dataset;
pub mod error;
pub mod stream;
pub mod wire;

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use dataset::{DatasetDecoder, DatasetSource};
pub use error::{BoxError, CodecError, CodecResult};
pub use stream::{BinaryStreamDecoder, BinaryStreamEncoder, StreamConfig};
pub use wire::{encode_record, Field, LengthWidth, WireConfig};
