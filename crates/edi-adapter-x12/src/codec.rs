//! Decode/encode facade over one shared catalog

use crate::config::CodecConfig;
use crate::field::FieldCodec;
use crate::parser::HierarchyParser;
use crate::syntax::tokenize;
use crate::writer::HierarchyWriter;
use crate::Result;
use edi_ir::Interchange;
use edi_schema::SpecCatalog;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A configured X12 codec
///
/// Immutable after construction. Clones share the catalog, so a codec can
/// be handed to several threads and used concurrently.
#[derive(Debug, Clone)]
pub struct X12Codec {
    catalog: Arc<SpecCatalog>,
    codec: FieldCodec,
    debug: bool,
}

impl X12Codec {
    /// Build a codec from configuration, loading the schema if needed
    pub fn new(config: &CodecConfig) -> Result<Self> {
        let schema = config.resolve_schema()?;
        let catalog = SpecCatalog::new(schema);
        info!(
            documents = catalog.identifiers().count(),
            terminator = %config.terminator,
            separator = %config.separator,
            "Created X12 codec"
        );
        Ok(Self::from_catalog(Arc::new(catalog), config))
    }

    /// Build a codec over an existing catalog; the config's schema fields are ignored
    pub fn from_catalog(catalog: Arc<SpecCatalog>, config: &CodecConfig) -> Self {
        let codec = FieldCodec::new(config.separators())
            .new_lines(config.new_lines)
            .truncate_null(config.truncate_null);
        Self {
            catalog,
            codec,
            debug: config.debug,
        }
    }

    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    /// Decode interchange text into a record tree
    ///
    /// Never fails: malformed or unknown input is skipped.
    pub fn decode(&self, input: &str) -> Interchange {
        let segments = tokenize(input, self.codec.separators());
        debug!(segments = segments.len(), "Tokenized input");
        HierarchyParser::new(&self.catalog, self.codec)
            .debug(self.debug)
            .parse(&segments)
    }

    /// Encode a record tree into interchange text
    pub fn encode(&self, interchange: &Interchange) -> Result<String> {
        HierarchyWriter::new(&self.catalog, self.codec)
            .debug(self.debug)
            .write(interchange)
    }

    /// Read and decode a file
    pub fn decode_file(&self, path: &Path) -> Result<Interchange> {
        let input = std::fs::read_to_string(path)?;
        info!(path = %path.display(), bytes = input.len(), "Decoding file");
        Ok(self.decode(&input))
    }

    /// Encode a record tree and write it to a file
    pub fn encode_to_file(&self, interchange: &Interchange, path: &Path) -> Result<()> {
        let output = self.encode(interchange)?;
        std::fs::write(path, &output)?;
        info!(path = %path.display(), bytes = output.len(), "Wrote interchange");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use edi_schema::{DocumentSpec, Schema, SegmentDefinition, Structure};

    fn config() -> CodecConfig {
        CodecConfig::new().with_spec(
            Schema::new().with_document(
                "850",
                DocumentSpec::new(Structure::new(["BEG"], ["PO1"], ["CTT"]))
                    .with_segment("BEG", SegmentDefinition::named(["purpose", "type"]))
                    .with_segment("PO1", SegmentDefinition::named(["line", "quantity"]))
                    .with_segment("CTT", SegmentDefinition::named(["count"])),
            ),
        )
    }

    #[test]
    fn test_new_requires_schema() {
        assert!(matches!(
            X12Codec::new(&CodecConfig::new()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_decode_then_encode() {
        let codec = X12Codec::new(&config().truncate_null(true)).unwrap();
        let input = "GS*PO*S*R*20210101*1200*7*X*004010~ST*850*0001~BEG*00*SA~PO1*1*5~PO1*2*3~CTT*2~SE*6*0001~GE*1*7~";
        let interchange = codec.decode(input);

        assert_eq!(interchange.groups.len(), 1);
        assert_eq!(interchange.groups[0].sets[0].detail_loops.len(), 2);

        let output = codec.encode(&interchange).unwrap();
        assert!(output.contains(
            "ST*850*0001~BEG*00*SA~PO1*1*5~PO1*2*3~CTT*2~SE*6*0001~GE*1*7~"
        ));
    }

    #[test]
    fn test_custom_delimiters_and_new_lines() {
        let codec = X12Codec::new(&config().terminator('\'').separator('|').new_lines(true)).unwrap();
        let interchange = codec.decode("GS|PO'ST|850|0001'BEG|00|SA'SE|3|0001'GE|1|1'");
        assert_eq!(interchange.groups[0].sets[0].header["BEG"]["type"], "SA");

        let output = codec.encode(&interchange).unwrap();
        assert!(output.contains("ST|850|0001'\nBEG|00|SA'\nSE|3|0001'\n"));
    }

    #[test]
    fn test_file_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.x12");
        let codec = X12Codec::new(&config()).unwrap();

        let interchange = codec.decode("GS*PO~ST*850*0001~BEG*00*SA~SE*3*0001~GE*1*1~");
        codec.encode_to_file(&interchange, &path).unwrap();
        let reread = codec.decode_file(&path).unwrap();
        assert_eq!(reread.groups[0].sets, interchange.groups[0].sets);

        assert!(matches!(
            codec.decode_file(&dir.path().join("missing.x12")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_clones_share_catalog() {
        let codec = X12Codec::new(&config()).unwrap();
        let clone = codec.clone();
        assert!(std::ptr::eq(codec.catalog(), clone.catalog()));
    }
}
