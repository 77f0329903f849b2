//! Record tree containers for the Intermediate Representation
#![allow(clippy::must_use_candidate)] // Accessors and constructors are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::fields::{CONTROL_NUMBER, Fields, IDENTIFIER_CODE, non_empty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Segments of a header or footer section, keyed by segment tag
pub type Section = BTreeMap<String, Fields>;

/// An ISA/IEA-bounded interchange, the unit of one decode or encode call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interchange {
    /// Decoded ISA fields
    #[serde(default, rename = "ISA")]
    pub isa: Fields,

    /// Functional groups in document order
    #[serde(default, rename = "GS")]
    pub groups: Vec<FunctionalGroup>,
}

/// A GS/GE-bounded collection of transaction sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalGroup {
    /// Decoded GS fields
    #[serde(default, rename = "fields")]
    pub gs: Fields,

    /// Transaction sets in document order
    #[serde(default, rename = "ST")]
    pub sets: Vec<TransactionSet>,
}

/// An ST/SE-bounded business document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSet {
    /// Decoded ST fields, including `identifier_code` and `control_number`
    #[serde(default, rename = "fields")]
    pub st: Fields,

    /// Header segments keyed by tag
    #[serde(default)]
    pub header: Section,

    /// Repetitions of the detail segment group
    #[serde(default, rename = "detail")]
    pub detail_loops: Vec<DetailLoop>,

    /// Footer segments keyed by tag
    #[serde(default)]
    pub footer: Section,
}

/// One repetition of a transaction set's detail segment group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailLoop {
    /// Detail segments keyed by tag
    pub segments: BTreeMap<String, Fields>,
}

impl Interchange {
    /// Create an interchange from its ISA fields
    pub fn new(isa: Fields) -> Self {
        Self {
            isa,
            groups: Vec::new(),
        }
    }

    /// Append a functional group
    pub fn with_group(mut self, group: FunctionalGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Interchange control number, if one is assigned
    pub fn control_number(&self) -> Option<&str> {
        non_empty(&self.isa, CONTROL_NUMBER)
    }

    /// Total number of transaction sets across all groups
    pub fn set_count(&self) -> usize {
        self.groups.iter().map(|group| group.sets.len()).sum()
    }
}

impl FunctionalGroup {
    /// Create a group from its GS fields
    pub fn new(gs: Fields) -> Self {
        Self {
            gs,
            sets: Vec::new(),
        }
    }

    /// Append a transaction set
    pub fn with_set(mut self, set: TransactionSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Group control number, if one is assigned
    pub fn control_number(&self) -> Option<&str> {
        non_empty(&self.gs, CONTROL_NUMBER)
    }
}

impl TransactionSet {
    /// Create a transaction set from its ST fields
    pub fn new(st: Fields) -> Self {
        Self {
            st,
            ..Self::default()
        }
    }

    /// Identifier selecting the document schema (e.g. `850`)
    pub fn identifier_code(&self) -> &str {
        self.st.get(IDENTIFIER_CODE).map_or("", String::as_str)
    }

    /// Set control number, if one is assigned
    pub fn control_number(&self) -> Option<&str> {
        non_empty(&self.st, CONTROL_NUMBER)
    }

    /// Store a header segment
    pub fn with_header(mut self, tag: impl Into<String>, fields: Fields) -> Self {
        self.header.insert(tag.into(), fields);
        self
    }

    /// Append a detail loop
    pub fn with_loop(mut self, detail: DetailLoop) -> Self {
        self.detail_loops.push(detail);
        self
    }

    /// Store a footer segment
    pub fn with_footer(mut self, tag: impl Into<String>, fields: Fields) -> Self {
        self.footer.insert(tag.into(), fields);
        self
    }
}

impl DetailLoop {
    /// Create an empty loop
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a segment in this loop
    pub fn with_segment(mut self, tag: impl Into<String>, fields: Fields) -> Self {
        self.segments.insert(tag.into(), fields);
        self
    }

    /// Whether a segment with this tag already occurs in the loop
    pub fn contains(&self, tag: &str) -> bool {
        self.segments.contains_key(tag)
    }

    /// Fields stored under a tag
    pub fn get(&self, tag: &str) -> Option<&Fields> {
        self.segments.get(tag)
    }

    /// Store a segment in place
    pub fn insert(&mut self, tag: impl Into<String>, fields: Fields) {
        self.segments.insert(tag.into(), fields);
    }

    /// Whether the loop holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
