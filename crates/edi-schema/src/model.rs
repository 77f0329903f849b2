//! Schema model definitions
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

use crate::format::FormatSpec;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A caller-supplied schema document
///
/// Keys are transaction-set identifiers (`850`) mapping to a
/// [`DocumentSpec`], or segment tags (`ISA`) mapping to a
/// [`SegmentDefinition`] that overrides the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub entries: BTreeMap<String, SchemaEntry>,
}

/// One top-level entry of a schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaEntry {
    /// `{definition: [...]}`
    Segment(SegmentDefinition),
    /// `{segments: {...}, structure: {...}}`
    Document(DocumentSpec),
}

/// Layout of one transaction set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Segment definitions keyed by tag
    #[serde(default)]
    pub segments: BTreeMap<String, SegmentDefinition>,
    /// Section membership and emission order
    #[serde(default)]
    pub structure: Structure,
}

/// Tags of a transaction set grouped by section, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub detail: Vec<String>,
    #[serde(default)]
    pub footer: Vec<String>,
}

/// Section of a transaction set a payload segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Detail,
    Footer,
}

/// Definition of a segment: its fields in element order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    pub definition: Vec<FieldDefinition>,
}

/// Definition of one element of a segment
///
/// A definition without a name is a positional filler: its element is
/// discarded on decode and rendered from the static value on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Static/default value
    #[serde(
        default,
        deserialize_with = "deserialize_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,

    /// Exact rendered width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,

    /// Minimum rendered width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,

    /// Truncation length applied before rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
}

/// Padding rule selected for a field at encode time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthRule {
    /// Pad to exactly this many characters
    Bytes(usize),
    /// Pad to at least this many characters
    Min(usize),
    /// Leave the value as is
    Unpadded,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction-set layout
    pub fn with_document(mut self, identifier: impl Into<String>, document: DocumentSpec) -> Self {
        self.entries
            .insert(identifier.into(), SchemaEntry::Document(document));
        self
    }

    /// Add or override a segment definition
    pub fn with_segment(mut self, tag: impl Into<String>, segment: SegmentDefinition) -> Self {
        self.entries.insert(tag.into(), SchemaEntry::Segment(segment));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentSpec {
    pub fn new(structure: Structure) -> Self {
        Self {
            segments: BTreeMap::new(),
            structure,
        }
    }

    pub fn with_segment(mut self, tag: impl Into<String>, segment: SegmentDefinition) -> Self {
        self.segments.insert(tag.into(), segment);
        self
    }
}

impl Structure {
    pub fn new<H, D, F>(header: H, detail: D, footer: F) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            detail: detail.into_iter().map(Into::into).collect(),
            footer: footer.into_iter().map(Into::into).collect(),
        }
    }

    /// Tags of one section in emission order
    pub fn tags(&self, section: SectionKind) -> &[String] {
        match section {
            SectionKind::Header => &self.header,
            SectionKind::Detail => &self.detail,
            SectionKind::Footer => &self.footer,
        }
    }
}

impl SegmentDefinition {
    pub fn new(definition: Vec<FieldDefinition>) -> Self {
        Self { definition }
    }

    /// Definitions for the named fields `names`, in order
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(FieldDefinition::named).collect())
    }

    pub fn len(&self) -> usize {
        self.definition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_empty()
    }
}

impl FieldDefinition {
    /// A named field with no width or format rules
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An unnamed positional filler
    pub fn filler() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.bytes = Some(bytes);
        self
    }

    pub fn with_min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = Some(format);
        self
    }

    /// Padding rule for a value of `len` characters
    ///
    /// Precedence: explicit bytes, then min when the value is shorter,
    /// then none.
    pub fn width_rule(&self, len: usize) -> WidthRule {
        match (self.bytes, self.min) {
            (Some(bytes), _) => WidthRule::Bytes(bytes),
            (None, Some(min)) if len < min => WidthRule::Min(min),
            _ => WidthRule::Unpadded,
        }
    }
}

/// Accept strings, numbers and booleans for `value`, normalized to text
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Boolean(bool),
    }

    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Boolean(b) => b.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_rule_precedence() {
        let both = FieldDefinition::named("id").with_bytes(6).with_min(4);
        assert_eq!(both.width_rule(2), WidthRule::Bytes(6));
        assert_eq!(both.width_rule(10), WidthRule::Bytes(6));

        let min = FieldDefinition::named("id").with_min(4);
        assert_eq!(min.width_rule(2), WidthRule::Min(4));
        assert_eq!(min.width_rule(4), WidthRule::Unpadded);
        assert_eq!(min.width_rule(9), WidthRule::Unpadded);

        assert_eq!(FieldDefinition::filler().width_rule(0), WidthRule::Unpadded);
    }

    #[test]
    fn test_structure_tags() {
        let structure = Structure::new(["BEG", "REF"], ["PO1"], ["CTT"]);
        assert_eq!(structure.tags(SectionKind::Header), ["BEG", "REF"]);
        assert_eq!(structure.tags(SectionKind::Detail), ["PO1"]);
        assert_eq!(structure.tags(SectionKind::Footer), ["CTT"]);
    }

    #[test]
    fn test_entry_shapes() {
        let json = r#"{
            "ISA": {"definition": [{"name": "control_number", "format": "%09d"}]},
            "850": {
                "segments": {"BEG": {"definition": [{"name": "purpose"}, {}]}},
                "structure": {"header": ["BEG"]}
            }
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();

        match &schema.entries["ISA"] {
            SchemaEntry::Segment(segment) => {
                assert_eq!(segment.len(), 1);
                assert_eq!(segment.definition[0].format.as_ref().unwrap().as_str(), "%09d");
            }
            other => panic!("Expected segment entry, got {other:?}"),
        }

        match &schema.entries["850"] {
            SchemaEntry::Document(document) => {
                assert_eq!(document.structure.header, vec!["BEG"]);
                assert!(document.structure.detail.is_empty());
                let beg = &document.segments["BEG"];
                assert_eq!(beg.definition[0].name.as_deref(), Some("purpose"));
                assert_eq!(beg.definition[1], FieldDefinition::filler());
            }
            other => panic!("Expected document entry, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_values_normalized() {
        let json = r#"[{"value": 5}, {"value": "00"}, {"value": true}, {"value": null}]"#;
        let fields: Vec<FieldDefinition> = serde_json::from_str(json).unwrap();
        assert_eq!(fields[0].value.as_deref(), Some("5"));
        assert_eq!(fields[1].value.as_deref(), Some("00"));
        assert_eq!(fields[2].value.as_deref(), Some("true"));
        assert_eq!(fields[3].value, None);
    }

    #[test]
    fn test_builders() {
        let schema = Schema::new()
            .with_segment("GS", SegmentDefinition::named(["a", "b"]))
            .with_document("810", DocumentSpec::default());
        assert!(!schema.is_empty());
        assert!(matches!(schema.entries["GS"], SchemaEntry::Segment(_)));
        assert!(matches!(schema.entries["810"], SchemaEntry::Document(_)));
    }
}
