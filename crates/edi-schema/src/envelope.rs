//! Built-in envelope segment definitions (ISA, GS, ST, SE, GE, IEA)
//!
//! These are merged under every caller schema. A schema entry with the same
//! tag replaces the built-in definition as a whole.

use crate::format::FormatSpec;
use crate::model::{FieldDefinition, SegmentDefinition};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const ISA: &str = "ISA";
pub const IEA: &str = "IEA";
pub const GS: &str = "GS";
pub const GE: &str = "GE";
pub const ST: &str = "ST";
pub const SE: &str = "SE";

/// Envelope tags in nesting order
pub const ENVELOPE_TAGS: [&str; 6] = [ISA, GS, ST, SE, GE, IEA];

static DEFAULTS: LazyLock<BTreeMap<String, SegmentDefinition>> = LazyLock::new(|| {
    BTreeMap::from([
        (ISA.to_string(), isa()),
        (GS.to_string(), gs()),
        (ST.to_string(), st()),
        (SE.to_string(), se()),
        (GE.to_string(), ge()),
        (IEA.to_string(), iea()),
    ])
});

/// The process-wide default envelope definitions
pub fn defaults() -> &'static BTreeMap<String, SegmentDefinition> {
    &DEFAULTS
}

/// Whether a tag is one of the envelope segments
pub fn is_envelope_tag(tag: &str) -> bool {
    ENVELOPE_TAGS.contains(&tag)
}

fn text(name: &str, bytes: usize) -> FieldDefinition {
    FieldDefinition::named(name).with_bytes(bytes)
}

fn isa() -> SegmentDefinition {
    SegmentDefinition::new(vec![
        text("authorization_qualifier", 2).with_value("00"),
        text("authorization_information", 10),
        text("security_qualifier", 2).with_value("00"),
        text("security_information", 10),
        text("sender_qualifier", 2).with_value("ZZ"),
        text("sender_id", 15),
        text("receiver_qualifier", 2).with_value("ZZ"),
        text("receiver_id", 15),
        text("date", 6),
        text("time", 4),
        text("standards_identifier", 1).with_value("U"),
        text("version_number", 5).with_value("00401"),
        text("control_number", 9).with_format(FormatSpec::zero_padded(9)),
        text("acknowledgment_requested", 1).with_value("0"),
        text("usage_indicator", 1).with_value("P"),
        text("component_separator", 1).with_value(">"),
    ])
}

fn gs() -> SegmentDefinition {
    SegmentDefinition::new(vec![
        FieldDefinition::named("functional_identifier_code"),
        FieldDefinition::named("sender_code"),
        FieldDefinition::named("receiver_code"),
        FieldDefinition::named("date"),
        FieldDefinition::named("time"),
        FieldDefinition::named("control_number"),
        FieldDefinition::named("agency_code").with_value("X"),
        FieldDefinition::named("version_code").with_value("004010"),
    ])
}

fn st() -> SegmentDefinition {
    SegmentDefinition::new(vec![
        FieldDefinition::named("identifier_code"),
        FieldDefinition::named("control_number").with_format(FormatSpec::zero_padded(4)),
    ])
}

fn se() -> SegmentDefinition {
    SegmentDefinition::new(vec![
        FieldDefinition::named("total"),
        FieldDefinition::named("control_number").with_format(FormatSpec::zero_padded(4)),
    ])
}

fn ge() -> SegmentDefinition {
    SegmentDefinition::named(["total", "control_number"])
}

fn iea() -> SegmentDefinition {
    SegmentDefinition::new(vec![
        FieldDefinition::named("total"),
        FieldDefinition::named("control_number").with_format(FormatSpec::zero_padded(9)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_envelope_tags_defined() {
        for tag in ENVELOPE_TAGS {
            assert!(defaults().contains_key(tag), "missing default for {tag}");
            assert!(is_envelope_tag(tag));
        }
        assert!(!is_envelope_tag("BEG"));
    }

    #[test]
    fn test_isa_is_fixed_width() {
        let isa = &defaults()[ISA];
        assert_eq!(isa.len(), 16);
        assert!(isa.definition.iter().all(|field| field.bytes.is_some()));
        let width: usize = isa.definition.iter().filter_map(|field| field.bytes).sum();
        assert_eq!(width, 86);
    }

    #[test]
    fn test_trailers_carry_total_and_control_number() {
        for tag in [SE, GE, IEA] {
            let names: Vec<&str> = defaults()[tag]
                .definition
                .iter()
                .filter_map(|field| field.name.as_deref())
                .collect();
            assert_eq!(names, vec!["total", "control_number"], "{tag}");
        }
    }
}
