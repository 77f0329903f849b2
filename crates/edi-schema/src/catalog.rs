//! Immutable catalog of segment definitions and document layouts
//!
//! Built once per codec: the built-in envelope definitions are copied, the
//! caller's schema is applied over them by key, and each document's
//! tag → section lookup is computed up front. Nothing is mutated after
//! construction.

use crate::envelope;
use crate::model::{DocumentSpec, Schema, SchemaEntry, SectionKind, SegmentDefinition};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// A document spec with its precomputed section lookup
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    spec: DocumentSpec,
    sections: HashMap<String, SectionKind>,
}

/// Merged, read-only view of envelope definitions and document layouts
#[derive(Debug, Clone)]
pub struct SpecCatalog {
    segments: BTreeMap<String, SegmentDefinition>,
    documents: BTreeMap<String, DocumentLayout>,
}

impl DocumentLayout {
    /// Index a document spec
    ///
    /// A tag listed in more than one section belongs to the first of
    /// header, detail, footer that lists it.
    pub fn new(spec: DocumentSpec) -> Self {
        let mut sections = HashMap::new();
        for kind in [SectionKind::Header, SectionKind::Detail, SectionKind::Footer] {
            for tag in spec.structure.tags(kind) {
                sections.entry(tag.clone()).or_insert(kind);
            }
        }
        Self { spec, sections }
    }

    pub fn spec(&self) -> &DocumentSpec {
        &self.spec
    }

    /// Section a payload tag belongs to, if the layout knows it
    pub fn section_of(&self, tag: &str) -> Option<SectionKind> {
        self.sections.get(tag).copied()
    }

    /// Tags of a section in emission order
    pub fn tags(&self, section: SectionKind) -> &[String] {
        self.spec.structure.tags(section)
    }

    /// Segment definition declared by this document
    pub fn segment(&self, tag: &str) -> Option<&SegmentDefinition> {
        self.spec.segments.get(tag)
    }
}

impl SpecCatalog {
    /// Merge a caller schema over the built-in envelope definitions
    pub fn new(schema: Schema) -> Self {
        let mut segments = envelope::defaults().clone();
        let mut documents = BTreeMap::new();

        for (key, entry) in schema.entries {
            match entry {
                SchemaEntry::Segment(segment) => {
                    if segments.insert(key.clone(), segment).is_some() {
                        debug!(tag = %key, "Schema overrides built-in segment definition");
                    }
                }
                SchemaEntry::Document(spec) => {
                    documents.insert(key, DocumentLayout::new(spec));
                }
            }
        }

        info!(
            segments = segments.len(),
            documents = documents.len(),
            "Built spec catalog"
        );

        Self {
            segments,
            documents,
        }
    }

    /// Catalog-wide segment definition (envelope or override)
    pub fn segment(&self, tag: &str) -> Option<&SegmentDefinition> {
        self.segments.get(tag)
    }

    /// Layout for a transaction-set identifier
    pub fn document(&self, identifier: &str) -> Option<&DocumentLayout> {
        self.documents.get(identifier)
    }

    /// Definition for a payload tag: the document's own, else catalog-wide
    pub fn payload_segment<'a>(
        &'a self,
        layout: &'a DocumentLayout,
        tag: &str,
    ) -> Option<&'a SegmentDefinition> {
        layout.segment(tag).or_else(|| self.segment(tag))
    }

    /// Known transaction-set identifiers
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl Default for SpecCatalog {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}
