use crate::triple::Triple;

/// Writes triples to some underlying sink.
pub trait Encoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn encode(&mut self, triples: &[Triple]) -> Result<(), Self::Error>;
}

/// Reads every triple from some underlying source.
pub trait Decoder {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode until the source is exhausted.
    fn decode(&mut self) -> Result<Vec<Triple>, Self::Error>;
}
