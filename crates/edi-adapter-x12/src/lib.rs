//! # edi-adapter-x12
//!
//! Schema-driven ANSI ASC X12 decoder/encoder and envelope handling.
//!
//! Decoding tokenizes interchange text, then drives the ISA/GS/ST envelope
//! state machine to build an [`edi_ir::Interchange`]. Encoding walks the
//! tree back out in protocol order, computing trailer counts and assigning
//! missing control numbers. Every segment goes through the [`FieldCodec`]
//! and the definitions held by an [`edi_schema::SpecCatalog`].

pub mod codec;
pub mod config;
pub mod field;
pub mod parser;
pub mod syntax;
pub mod writer;

pub use codec::X12Codec;
pub use config::CodecConfig;
pub use field::FieldCodec;
pub use parser::HierarchyParser;
pub use syntax::{Segment, Separators, tokenize};
pub use writer::HierarchyWriter;

use thiserror::Error;

/// Errors that can occur when configuring or encoding X12
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema error: {0}")]
    Schema(#[from] edi_schema::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
