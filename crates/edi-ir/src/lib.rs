#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # edi-ir
//!
//! Record tree for ANSI ASC X12 interchanges.
//!
//! A decoded interchange is a strict hierarchy: one [`Interchange`] (ISA/IEA)
//! holds [`FunctionalGroup`]s (GS/GE), each holding [`TransactionSet`]s
//! (ST/SE). A transaction set carries its payload in three sections: a
//! header and a footer keyed by segment tag, and an ordered list of
//! [`DetailLoop`]s for the repeating detail group. Every segment is stored
//! as [`Fields`], a name → value map.

/// Field maps and the well-known envelope field names.
pub mod fields;
/// Path-based lookup into a record tree.
pub mod traversal;
/// Interchange, group, transaction set and loop containers.
pub mod tree;

/// Field map type and envelope field names.
pub use fields::{CONTROL_NUMBER, Fields, IDENTIFIER_CODE, TOTAL};
/// Traversal entry points for tree walking and path lookup.
pub use traversal::{Selection, Visitor, walk};
/// Record tree containers.
pub use tree::{DetailLoop, FunctionalGroup, Interchange, Section, TransactionSet};

use thiserror::Error;

/// Errors that can occur when navigating the record tree
#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found at path: {path}")]
    NodeNotFound { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build a node-not-found error with path context.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for record tree operations.
pub type Result<T> = std::result::Result<T, Error>;
