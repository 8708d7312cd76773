//! Library half of the `triplestore` binary, split out so the conversion
//! pipeline can be driven from tests.

pub mod cli;
pub mod commands;
