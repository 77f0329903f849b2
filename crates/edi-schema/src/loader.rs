//! Schema document loader (JSON or YAML)

use crate::model::Schema;
use crate::{Error, Result};
use std::path::Path;
use tracing::{info, trace};

/// Loads schema documents from strings or files
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a schema from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load_from_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        let schema = if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)?
        } else {
            self.load_from_json(&content)?
        };

        info!(
            path = %path.display(),
            entries = schema.entries.len(),
            "Loaded schema"
        );
        Ok(schema)
    }

    /// Load a schema from JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {}", e)))
    }

    /// Load a schema from YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaEntry;
    use std::io::Write;

    const YAML: &str = r#"
"850":
  segments:
    BEG:
      definition:
        - name: purpose
        - name: type
        - name: po_number
          max: 22
    PO1:
      definition:
        - name: line
          format: "%03d"
        - name: quantity
        - name: unit
          value: EA
        - {}
  structure:
    header: [BEG]
    detail: [PO1]
    footer: []
ST:
  definition:
    - name: identifier_code
    - name: control_number
      min: 4
"#;

    #[test]
    fn test_load_yaml() {
        let schema = SchemaLoader::new().load_from_yaml(YAML).unwrap();
        assert_eq!(schema.entries.len(), 2);

        let SchemaEntry::Document(po) = &schema.entries["850"] else {
            panic!("Expected document entry for 850");
        };
        assert_eq!(po.structure.detail, vec!["PO1"]);
        let po1 = &po.segments["PO1"];
        assert_eq!(po1.len(), 4);
        assert_eq!(po1.definition[0].format.as_ref().unwrap().render("7"), "007");
        assert_eq!(po1.definition[2].value.as_deref(), Some("EA"));
        assert!(po1.definition[3].name.is_none());
        assert_eq!(po.segments["BEG"].definition[2].max, Some(22));

        let SchemaEntry::Segment(st) = &schema.entries["ST"] else {
            panic!("Expected segment entry for ST");
        };
        assert_eq!(st.definition[1].min, Some(4));
    }

    #[test]
    fn test_load_json() {
        let json = r#"{"810": {"segments": {}, "structure": {"header": ["BIG"]}}}"#;
        let schema = SchemaLoader::new().load_from_json(json).unwrap();
        assert!(matches!(schema.entries["810"], SchemaEntry::Document(_)));
    }

    #[test]
    fn test_invalid_documents() {
        let loader = SchemaLoader::new();
        assert!(matches!(
            loader.load_from_json("{not json"),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            loader.load_from_yaml("ST: [1, 2"),
            Err(Error::InvalidFormat(_))
        ));

        let bad_pattern = r#"{"ST": {"definition": [{"name": "x", "format": "%q"}]}}"#;
        assert!(loader.load_from_json(bad_pattern).is_err());
    }

    #[test]
    fn test_load_from_file_by_extension() {
        let loader = SchemaLoader::new();

        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(YAML.as_bytes()).unwrap();
        let schema = loader.load_from_file(yaml.path()).unwrap();
        assert!(schema.entries.contains_key("850"));

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(br#"{"850": {"structure": {"detail": ["PO1"]}}}"#)
            .unwrap();
        let schema = loader.load_from_file(json.path()).unwrap();
        assert!(schema.entries.contains_key("850"));
    }

    #[test]
    fn test_missing_file() {
        let result = SchemaLoader::new().load_from_file(Path::new("/nonexistent/schema.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
