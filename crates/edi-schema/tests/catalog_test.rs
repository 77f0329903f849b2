use anyhow::Result;
use edi_schema::envelope::{self, GS, ISA, ST};
use edi_schema::{SchemaLoader, SectionKind, SpecCatalog, WidthRule};
use std::io::Write;
use tempfile::NamedTempFile;

const SCHEMA_JSON: &str = r#"{
  "ST": {
    "definition": [
      {"name": "identifier_code"},
      {"name": "control_number", "format": "%09d"}
    ]
  },
  "N1": {
    "definition": [{"name": "entity"}, {"name": "name", "max": 35}]
  },
  "810": {
    "segments": {
      "BIG": {"definition": [{"name": "date"}, {"name": "invoice_number"}]},
      "IT1": {"definition": [{"name": "line"}, {"name": "quantity", "min": 3}, {"value": 1}]},
      "TDS": {"definition": [{"name": "amount", "format": "%.2f"}]}
    },
    "structure": {
      "header": ["BIG", "N1"],
      "detail": ["IT1"],
      "footer": ["TDS", "IT1"]
    }
  }
}"#;

fn catalog_from_file() -> Result<SpecCatalog> {
    let mut file = NamedTempFile::with_suffix(".json")?;
    file.write_all(SCHEMA_JSON.as_bytes())?;
    let schema = SchemaLoader::new().load_from_file(file.path())?;
    Ok(SpecCatalog::new(schema))
}

#[test]
fn test_overrides_replace_only_their_key() -> Result<()> {
    let catalog = catalog_from_file()?;

    let st = catalog.segment(ST).expect("ST defined");
    assert_eq!(
        st.definition[1].format.as_ref().map(|f| f.as_str()),
        Some("%09d")
    );
    assert_eq!(catalog.segment(ISA), envelope::defaults().get(ISA));
    assert_eq!(catalog.segment(GS), envelope::defaults().get(GS));

    // the shared defaults are untouched
    let default_st = &envelope::defaults()[ST];
    assert_eq!(
        default_st.definition[1].format.as_ref().map(|f| f.as_str()),
        Some("%04d")
    );
    Ok(())
}

#[test]
fn test_document_layout_sections() -> Result<()> {
    let catalog = catalog_from_file()?;
    let layout = catalog.document("810").expect("810 defined");

    assert_eq!(layout.section_of("BIG"), Some(SectionKind::Header));
    assert_eq!(layout.section_of("IT1"), Some(SectionKind::Detail));
    assert_eq!(layout.section_of("TDS"), Some(SectionKind::Footer));
    assert_eq!(layout.section_of("ZZZ"), None);
    assert_eq!(layout.tags(SectionKind::Footer), ["TDS", "IT1"]);
    Ok(())
}

#[test]
fn test_catalog_wide_segment_used_by_documents() -> Result<()> {
    let catalog = catalog_from_file()?;
    let layout = catalog.document("810").expect("810 defined");

    let n1 = catalog.payload_segment(layout, "N1").expect("N1 resolved from catalog");
    assert_eq!(n1.definition[1].max, Some(35));
    assert!(layout.segment("N1").is_none());
    Ok(())
}

#[test]
fn test_numeric_static_value_normalized() -> Result<()> {
    let catalog = catalog_from_file()?;
    let layout = catalog.document("810").expect("810 defined");
    let it1 = layout.segment("IT1").expect("IT1 defined");

    assert_eq!(it1.definition[2].name, None);
    assert_eq!(it1.definition[2].value.as_deref(), Some("1"));
    assert_eq!(it1.definition[1].width_rule(1), WidthRule::Min(3));
    Ok(())
}

#[test]
fn test_invalid_format_rejected_at_load() {
    let result = SchemaLoader::new().load_from_json(
        r#"{"850": {"segments": {"BEG": {"definition": [{"name": "n", "format": "%q"}]}}}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_identifiers() -> Result<()> {
    let catalog = catalog_from_file()?;
    assert_eq!(catalog.identifiers().collect::<Vec<_>>(), vec!["810"]);
    assert_eq!(SpecCatalog::default().identifiers().count(), 0);
    Ok(())
}
