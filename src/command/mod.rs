//! Byte-level output: the append-only command builder and the finished
//! command it produces.

pub mod builder;

pub use builder::{CommandBuilder, EncodedCommand};
