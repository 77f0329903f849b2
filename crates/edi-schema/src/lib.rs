//! # edi-schema
//!
//! Schema model, loader, and catalog merge logic for X12.
//!
//! A caller supplies a document schema (one entry per transaction-set
//! identifier, plus optional segment overrides). The [`SpecCatalog`] merges
//! it over the built-in envelope definitions (ISA, GS, ST, SE, GE, IEA) once,
//! and is read-only afterwards so it can be shared between threads.

pub mod catalog;
pub mod envelope;
pub mod format;
pub mod loader;
pub mod model;

pub use catalog::{DocumentLayout, SpecCatalog};
pub use format::FormatSpec;
pub use loader::SchemaLoader;
pub use model::{
    DocumentSpec, FieldDefinition, Schema, SchemaEntry, SectionKind, SegmentDefinition,
    Structure, WidthRule,
};

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Invalid format pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
